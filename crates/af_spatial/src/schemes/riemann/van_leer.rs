// crates/af_spatial/src/schemes/riemann/van_leer.rs

//! Van Leer 通量矢量分裂
//!
//! F = F⁺(U_L) + F⁻(U_R)。亚音速时按法向马赫数多项式分裂，
//! 超音速时整支取物理通量或零。分裂满足 F⁺(u) + F⁻(u) ≡ F(u)，
//! 因此雅可比（逐支精确求导）在相同状态下之和为精确物理雅可比。
//!
//! # 参考文献
//!
//! van Leer, B. (1982). "Flux-vector splitting for the Euler equations".
//! Lecture Notes in Physics 170.

use glam::DVec2;

use super::traits::{FaceFlux, PrimPack, RiemannSolver};
use crate::physics::GasModel;
use crate::state::{Block, ConservedState, Vars, NVARS};

/// Van Leer 通量
#[derive(Debug, Clone, Copy)]
pub struct VanLeerFlux {
    gas: GasModel,
}

/// 分裂方向
#[derive(Clone, Copy, PartialEq)]
enum Side {
    Plus,
    Minus,
}

impl VanLeerFlux {
    /// 创建求解器
    pub fn new(gas: GasModel) -> Self {
        Self { gas }
    }

    /// 单支分裂通量
    fn split_flux(&self, u: &ConservedState, normal: DVec2, side: Side) -> Vars {
        let g = self.gas.gamma();
        let pack = PrimPack::new(&self.gas, u, normal);
        let m = pack.vn / pack.c;

        match side {
            Side::Plus => {
                if m >= 1.0 {
                    return self.gas.physical_flux(u, normal);
                }
                if m <= -1.0 {
                    return [0.0; NVARS];
                }
            }
            Side::Minus => {
                if m <= -1.0 {
                    return self.gas.physical_flux(u, normal);
                }
                if m >= 1.0 {
                    return [0.0; NVARS];
                }
            }
        }

        let s = match side {
            Side::Plus => 1.0,
            Side::Minus => -1.0,
        };
        // fa = ±ρc(M±1)²/4
        let fa = s * pack.rho * pack.c * (m + s) * (m + s) * 0.25;
        let w_energy = ((g - 1.0) * pack.vn + s * 2.0 * pack.c).powi(2) / (2.0 * (g * g - 1.0))
            + 0.5 * (pack.q2 - pack.vn * pack.vn);
        [
            fa,
            fa * (pack.vx + normal.x * (s * 2.0 * pack.c - pack.vn) / g),
            fa * (pack.vy + normal.y * (s * 2.0 * pack.c - pack.vn) / g),
            fa * w_energy,
        ]
    }

    /// 单支分裂通量的精确雅可比
    fn split_jacobian(&self, u: &ConservedState, normal: DVec2, side: Side) -> Block {
        let g = self.gas.gamma();
        let pack = PrimPack::new(&self.gas, u, normal);
        let m = pack.vn / pack.c;

        match side {
            Side::Plus => {
                if m >= 1.0 {
                    return self.gas.flux_jacobian(u, normal);
                }
                if m <= -1.0 {
                    return [[0.0; NVARS]; NVARS];
                }
            }
            Side::Minus => {
                if m <= -1.0 {
                    return self.gas.flux_jacobian(u, normal);
                }
                if m >= 1.0 {
                    return [[0.0; NVARS]; NVARS];
                }
            }
        }

        let s = match side {
            Side::Plus => 1.0,
            Side::Minus => -1.0,
        };

        // dM/dU
        let mut d_m = [0.0; NVARS];
        for j in 0..NVARS {
            d_m[j] = pack.d_vn[j] / pack.c - pack.vn / (pack.c * pack.c) * pack.d_c[j];
        }

        let fa = s * pack.rho * pack.c * (m + s) * (m + s) * 0.25;
        let mut d_fa = [0.0; NVARS];
        for j in 0..NVARS {
            let d_rho = if j == 0 { 1.0 } else { 0.0 };
            d_fa[j] = s
                * (pack.c * (m + s) * (m + s) * 0.25 * d_rho
                    + pack.rho * (m + s) * (m + s) * 0.25 * pack.d_c[j]
                    + pack.rho * pack.c * (m + s) * 0.5 * d_m[j]);
        }

        let w = [
            1.0,
            pack.vx + normal.x * (s * 2.0 * pack.c - pack.vn) / g,
            pack.vy + normal.y * (s * 2.0 * pack.c - pack.vn) / g,
            ((g - 1.0) * pack.vn + s * 2.0 * pack.c).powi(2) / (2.0 * (g * g - 1.0))
                + 0.5 * (pack.q2 - pack.vn * pack.vn),
        ];

        let mut d_w = [[0.0; NVARS]; NVARS];
        for j in 0..NVARS {
            d_w[1][j] = pack.d_vx[j] + normal.x / g * (s * 2.0 * pack.d_c[j] - pack.d_vn[j]);
            d_w[2][j] = pack.d_vy[j] + normal.y / g * (s * 2.0 * pack.d_c[j] - pack.d_vn[j]);
            d_w[3][j] = ((g - 1.0) * pack.vn + s * 2.0 * pack.c) / (g * g - 1.0)
                * ((g - 1.0) * pack.d_vn[j] + s * 2.0 * pack.d_c[j])
                + pack.vx * pack.d_vx[j]
                + pack.vy * pack.d_vy[j]
                - pack.vn * pack.d_vn[j];
        }

        let mut out = [[0.0; NVARS]; NVARS];
        for i in 0..NVARS {
            for j in 0..NVARS {
                out[i][j] = d_fa[j] * w[i] + fa * d_w[i][j];
            }
        }
        out
    }
}

impl RiemannSolver for VanLeerFlux {
    fn name(&self) -> &'static str {
        "VanLeer"
    }

    fn flux(&self, left: &ConservedState, right: &ConservedState, normal: DVec2) -> FaceFlux {
        let fp = self.split_flux(left, normal, Side::Plus);
        let fm = self.split_flux(right, normal, Side::Minus);
        let mut flux = [0.0; NVARS];
        for k in 0..NVARS {
            flux[k] = fp[k] + fm[k];
        }
        let max_speed = self
            .gas
            .spectral_radius(left, normal)
            .max(self.gas.spectral_radius(right, normal));
        FaceFlux::new(flux, max_speed)
    }

    fn jacobian(
        &self,
        left: &ConservedState,
        right: &ConservedState,
        normal: DVec2,
        dfdl: &mut Block,
        dfdr: &mut Block,
    ) {
        *dfdl = self.split_jacobian(left, normal, Side::Plus);
        *dfdr = self.split_jacobian(right, normal, Side::Minus);
    }
}

// ============================================================
// 测试
// ============================================================
