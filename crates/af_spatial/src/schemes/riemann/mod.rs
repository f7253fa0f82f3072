// crates/af_spatial/src/schemes/riemann/mod.rs

//! 数值通量格式
//!
//! 五种可选格式的封闭集合，经 [`RiemannSolver`] 接口多态调用：
//! - [`VanLeerFlux`]: 通量矢量分裂（雅可比精确）
//! - [`RoeFlux`]: 通量差分分裂（雅可比冻结 Roe 平均）
//! - [`HllFlux`]: 双波模型（雅可比冻结波速）
//! - [`HllcFlux`]: 含接触波的三波模型（雅可比委托 HLL 线性化）
//! - [`LlfFlux`]: 局部 Lax-Friedrichs（雅可比精确到 max 切换点）

mod hll;
mod hllc;
mod llf;
mod roe;
mod traits;
mod van_leer;

pub use hll::HllFlux;
pub use hllc::HllcFlux;
pub use llf::LlfFlux;
pub use roe::RoeFlux;
pub use traits::{FaceFlux, RiemannSolver};
pub use van_leer::VanLeerFlux;

use crate::physics::GasModel;
use crate::types::FluxSchemeKind;

/// 按配置创建黎曼求解器
pub fn create_riemann_solver(kind: FluxSchemeKind, gas: GasModel) -> Box<dyn RiemannSolver> {
    match kind {
        FluxSchemeKind::VanLeer => Box::new(VanLeerFlux::new(gas)),
        FluxSchemeKind::Roe => Box::new(RoeFlux::new(gas)),
        FluxSchemeKind::Hll => Box::new(HllFlux::new(gas)),
        FluxSchemeKind::Hllc => Box::new(HllcFlux::new(gas)),
        FluxSchemeKind::Llf => Box::new(LlfFlux::new(gas)),
    }
}

// ============================================================
// 测试
// ============================================================
