// crates/af_spatial/src/numerics/gradient/constant.rs

//! 常量重构
//!
//! 梯度恒为零，格式退化为一阶。

use super::traits::{GradientMethod, GradientStorage};
use crate::adapter::SpatialMesh;
use crate::geometry::GeometryCache;
use crate::state::Vars;

/// 常量重构（零梯度）
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantGradient;

impl ConstantGradient {
    /// 创建新实例
    pub fn new() -> Self {
        Self
    }
}

impl GradientMethod for ConstantGradient {
    fn compute_gradients(
        &self,
        mesh: &SpatialMesh,
        _geom: &GeometryCache,
        _u: &[Vars],
        _ug: &[Vars],
        output: &mut GradientStorage,
    ) {
        if output.len() != mesh.n_cells() {
            output.resize(mesh.n_cells());
        }
        output.reset();
    }

    fn name(&self) -> &'static str {
        "Constant"
    }
}
