// crates/af_spatial/src/numerics/limiter/mod.rs

//! 梯度限制器
//!
//! 五种可选变体的封闭集合，经 [`FaceLimiter`] 接口多态调用：
//! - [`NoLimiter`]: 原样线性外推
//! - [`BarthJespersen`]: 经典 TVD 限制
//! - [`Venkatakrishnan`]: 光滑限制
//! - [`VanAlbada`]: 面向面的 MUSCL 限制
//! - [`WenoLimiter`]: 梯度加权混合

mod barth_jespersen;
mod none;
mod traits;
mod van_albada;
mod venkatakrishnan;
mod weno;

pub use barth_jespersen::BarthJespersen;
pub use none::NoLimiter;
pub use traits::FaceLimiter;
pub use van_albada::VanAlbada;
pub use venkatakrishnan::Venkatakrishnan;
pub use weno::WenoLimiter;

use crate::types::LimiterKind;

/// 按配置创建限制器
///
/// `venkat_k` 仅 Venkatakrishnan 变体消费。
pub fn create_limiter(kind: LimiterKind, venkat_k: f64) -> Box<dyn FaceLimiter> {
    match kind {
        LimiterKind::None => Box::new(NoLimiter::new()),
        LimiterKind::Weno => Box::new(WenoLimiter::new()),
        LimiterKind::VanAlbada => Box::new(VanAlbada::new()),
        LimiterKind::BarthJespersen => Box::new(BarthJespersen::new()),
        LimiterKind::Venkatakrishnan => Box::new(Venkatakrishnan::new(venkat_k)),
    }
}
