// crates/af_spatial/src/numerics/gradient/mod.rs

//! 梯度重构
//!
//! 三种可选格式的封闭集合，经 [`GradientMethod`] 接口多态调用：
//! - [`ConstantGradient`]: 零梯度（一阶）
//! - [`GreenGaussGradient`]: Green-Gauss 面积分
//! - [`LeastSquaresGradient`]: 加权最小二乘

mod constant;
mod green_gauss;
mod least_squares;
mod traits;

pub use constant::ConstantGradient;
pub use green_gauss::GreenGaussGradient;
pub use least_squares::LeastSquaresGradient;
pub use traits::{GradientMethod, GradientStorage};

use crate::types::GradientKind;

/// 按配置创建梯度计算器
pub fn create_gradient_method(
    kind: GradientKind,
    parallel: bool,
    parallel_threshold: usize,
) -> Box<dyn GradientMethod> {
    match kind {
        GradientKind::None => Box::new(ConstantGradient::new()),
        GradientKind::GreenGauss => {
            Box::new(GreenGaussGradient::new().with_parallel(parallel, parallel_threshold))
        }
        GradientKind::LeastSquares => {
            Box::new(LeastSquaresGradient::new().with_parallel(parallel, parallel_threshold))
        }
    }
}
