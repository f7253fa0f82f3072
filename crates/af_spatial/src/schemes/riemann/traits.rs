// crates/af_spatial/src/schemes/riemann/traits.rs

//! 黎曼求解器统一接口
//!
//! 每个格式提供两个入口：
//! - [`RiemannSolver::flux`]: 面数值通量（符号约定为沿法向离开 owner 单元）
//! - [`RiemannSolver::jacobian`]: 通量对左右状态的解析线性化
//!
//! 雅可比可与通量格式不一致（外层做非精确 Newton 时常用更廉价的
//! 线性化），一致性要求只有一条：左右状态相同时，两个雅可比之和
//! 等于精确物理通量雅可比。

use glam::DVec2;

use crate::physics::GasModel;
use crate::state::{Block, ConservedState, Vars, NVARS};

/// 黎曼求解结果通量
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceFlux {
    /// 各守恒分量的面通量
    pub flux: Vars,
    /// 界面最大波速（时间步估计用）
    pub max_wave_speed: f64,
}

impl FaceFlux {
    /// 零通量
    pub const ZERO: Self = Self {
        flux: [0.0; NVARS],
        max_wave_speed: 0.0,
    };

    /// 创建通量
    pub fn new(flux: Vars, max_wave_speed: f64) -> Self {
        Self {
            flux,
            max_wave_speed,
        }
    }

    /// 数值有效性检查
    pub fn is_valid(&self) -> bool {
        self.flux.iter().all(|v| v.is_finite())
            && self.max_wave_speed.is_finite()
            && self.max_wave_speed >= 0.0
    }
}

/// 黎曼求解器 trait
pub trait RiemannSolver: Send + Sync {
    /// 求解器名称
    fn name(&self) -> &'static str;

    /// 面数值通量
    ///
    /// # 参数
    /// - `left`/`right`: 界面两侧状态
    /// - `normal`: 单位法向量（由 left 指向 right）
    fn flux(&self, left: &ConservedState, right: &ConservedState, normal: DVec2) -> FaceFlux;

    /// 通量雅可比 (∂F/∂u_left, ∂F/∂u_right)
    fn jacobian(
        &self,
        left: &ConservedState,
        right: &ConservedState,
        normal: DVec2,
        dfdl: &mut Block,
        dfdr: &mut Block,
    );
}

// ============================================================
// 原始量及其对守恒量的导数
// ============================================================

/// 界面一侧的原始量与导数包
///
/// 把 ρ, v, p, c, vn 以及它们对守恒量的导数一次算好，
/// 供 Van Leer / LLF 的解析雅可比复用。
#[derive(Debug, Clone, Copy)]
pub(crate) struct PrimPack {
    pub rho: f64,
    pub vx: f64,
    pub vy: f64,
    pub p: f64,
    pub c: f64,
    pub vn: f64,
    pub q2: f64,
    /// ∂u/∂U, ∂v/∂U
    pub d_vx: Vars,
    pub d_vy: Vars,
    /// ∂p/∂U
    pub d_p: Vars,
    /// ∂c/∂U
    pub d_c: Vars,
    /// ∂vn/∂U
    pub d_vn: Vars,
}

impl PrimPack {
    /// 由守恒状态展开
    pub fn new(gas: &GasModel, u: &ConservedState, normal: DVec2) -> Self {
        let g = gas.gamma();
        let rho = u.rho;
        let vel = u.velocity();
        let (vx, vy) = (vel.x, vel.y);
        let q2 = vx * vx + vy * vy;
        let p = gas.pressure(u);
        let c = (g * p / rho).sqrt();
        let vn = vx * normal.x + vy * normal.y;

        let d_vx = [-vx / rho, 1.0 / rho, 0.0, 0.0];
        let d_vy = [-vy / rho, 0.0, 1.0 / rho, 0.0];
        let d_p = [
            0.5 * (g - 1.0) * q2,
            -(g - 1.0) * vx,
            -(g - 1.0) * vy,
            g - 1.0,
        ];
        // c² = γp/ρ → ∂c = (γ/(2c)) (∂p·ρ - p·∂ρ)/ρ²
        let mut d_c = [0.0; NVARS];
        for j in 0..NVARS {
            let d_rho = if j == 0 { 1.0 } else { 0.0 };
            d_c[j] = g / (2.0 * c) * (d_p[j] * rho - p * d_rho) / (rho * rho);
        }
        let d_vn = [-vn / rho, normal.x / rho, normal.y / rho, 0.0];

        Self {
            rho,
            vx,
            vy,
            p,
            c,
            vn,
            q2,
            d_vx,
            d_vy,
            d_p,
            d_c,
            d_vn,
        }
    }

    /// 谱半径 |vn| + c 的导数
    pub fn d_spectral_radius(&self) -> Vars {
        let s = self.vn.signum();
        let mut out = [0.0; NVARS];
        for j in 0..NVARS {
            out[j] = s * self.d_vn[j] + self.d_c[j];
        }
        out
    }
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_flux_zero() {
        let flux = FaceFlux::ZERO;
        assert_eq!(flux.flux, [0.0; NVARS]);
        assert!(flux.is_valid());
    }

    #[test]
    fn test_face_flux_invalid_nan() {
        let flux = FaceFlux::new([f64::NAN, 0.0, 0.0, 0.0], 1.0);
        assert!(!flux.is_valid());
        let flux = FaceFlux::new([0.0; NVARS], -1.0);
        assert!(!flux.is_valid());
    }

    #[test]
    fn test_prim_pack_derivatives_fd() {
        // 导数包与有限差分对比
        let gas = GasModel::new(1.4);
        let n = DVec2::new(0.8, -0.6);
        let u = gas.conserved_from_primitive(1.2, DVec2::new(0.5, -0.2), 0.9);
        let pack = PrimPack::new(&gas, &u, n);

        let eps = 1e-7;
        for j in 0..NVARS {
            let mut pert = u.to_vars();
            pert[j] += eps;
            let up = ConservedState::from_vars(pert);
            let pp = PrimPack::new(&gas, &up, n);

            assert!(((pp.p - pack.p) / eps - pack.d_p[j]).abs() < 1e-5, "d_p[{}]", j);
            assert!(((pp.c - pack.c) / eps - pack.d_c[j]).abs() < 1e-5, "d_c[{}]", j);
            assert!(((pp.vn - pack.vn) / eps - pack.d_vn[j]).abs() < 1e-5, "d_vn[{}]", j);
            assert!(((pp.vx - pack.vx) / eps - pack.d_vx[j]).abs() < 1e-5, "d_vx[{}]", j);
        }
    }

    #[test]
    fn test_spectral_radius_derivative_fd() {
        let gas = GasModel::new(1.4);
        let n = DVec2::new(0.0, 1.0);
        let u = gas.conserved_from_primitive(1.1, DVec2::new(0.3, 0.6), 1.2);
        let pack = PrimPack::new(&gas, &u, n);
        let d = pack.d_spectral_radius();

        let base = gas.spectral_radius(&u, n);
        let eps = 1e-7;
        for j in 0..NVARS {
            let mut pert = u.to_vars();
            pert[j] += eps;
            let sp = gas.spectral_radius(&ConservedState::from_vars(pert), n);
            assert!(((sp - base) / eps - d[j]).abs() < 1e-5, "分量 {}", j);
        }
    }
}
