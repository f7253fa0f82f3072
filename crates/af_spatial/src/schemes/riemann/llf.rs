// crates/af_spatial/src/schemes/riemann/llf.rs

//! 局部 Lax-Friedrichs (Rusanov) 通量
//!
//! F = ½(F_L + F_R)·n − ½λ(U_R − U_L)，λ 取两侧谱半径的较大者。
//! 雅可比把 λ 对状态的依赖也线性化，除 max 切换点外为精确导数。

use glam::DVec2;

use super::traits::{FaceFlux, PrimPack, RiemannSolver};
use crate::physics::GasModel;
use crate::state::{Block, ConservedState, NVARS};

/// 局部 Lax-Friedrichs 通量
#[derive(Debug, Clone, Copy)]
pub struct LlfFlux {
    gas: GasModel,
}

impl LlfFlux {
    /// 创建求解器
    pub fn new(gas: GasModel) -> Self {
        Self { gas }
    }
}

impl RiemannSolver for LlfFlux {
    fn name(&self) -> &'static str {
        "LLF"
    }

    fn flux(&self, left: &ConservedState, right: &ConservedState, normal: DVec2) -> FaceFlux {
        let fl = self.gas.physical_flux(left, normal);
        let fr = self.gas.physical_flux(right, normal);
        let lambda = self
            .gas
            .spectral_radius(left, normal)
            .max(self.gas.spectral_radius(right, normal));

        let ul = left.to_vars();
        let ur = right.to_vars();
        let mut flux = [0.0; NVARS];
        for k in 0..NVARS {
            flux[k] = 0.5 * (fl[k] + fr[k]) - 0.5 * lambda * (ur[k] - ul[k]);
        }
        FaceFlux::new(flux, lambda)
    }

    fn jacobian(
        &self,
        left: &ConservedState,
        right: &ConservedState,
        normal: DVec2,
        dfdl: &mut Block,
        dfdr: &mut Block,
    ) {
        let al = self.gas.flux_jacobian(left, normal);
        let ar = self.gas.flux_jacobian(right, normal);
        let sr_l = self.gas.spectral_radius(left, normal);
        let sr_r = self.gas.spectral_radius(right, normal);
        let lambda = sr_l.max(sr_r);

        let ul = left.to_vars();
        let ur = right.to_vars();

        for i in 0..NVARS {
            for j in 0..NVARS {
                let id = if i == j { 1.0 } else { 0.0 };
                dfdl[i][j] = 0.5 * (al[i][j] + lambda * id);
                dfdr[i][j] = 0.5 * (ar[i][j] - lambda * id);
            }
        }

        // λ 随取大侧状态变化的秩一修正
        let du: [f64; NVARS] = std::array::from_fn(|k| ur[k] - ul[k]);
        if sr_l >= sr_r {
            let d_lambda = PrimPack::new(&self.gas, left, normal).d_spectral_radius();
            for i in 0..NVARS {
                for j in 0..NVARS {
                    dfdl[i][j] -= 0.5 * du[i] * d_lambda[j];
                }
            }
        } else {
            let d_lambda = PrimPack::new(&self.gas, right, normal).d_spectral_radius();
            for i in 0..NVARS {
                for j in 0..NVARS {
                    dfdr[i][j] -= 0.5 * du[i] * d_lambda[j];
                }
            }
        }
    }
}

// ============================================================
// 测试
// ============================================================
