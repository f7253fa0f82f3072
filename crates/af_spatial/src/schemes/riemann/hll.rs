// crates/af_spatial/src/schemes/riemann/hll.rs

//! HLL 近似黎曼求解器
//!
//! 双波模型，波速用 Einfeldt 估计（两侧特征速度与 Roe 平均取极值），
//! 对强激波鲁棒但抹平接触间断。
//!
//! 雅可比冻结波速估计（S_L、S_R 不对状态求导），
//! 亚音速分支对 HLL 公式逐项线性化。

use glam::DVec2;

use super::roe::roe_average;
use super::traits::{FaceFlux, RiemannSolver};
use crate::physics::GasModel;
use crate::state::{Block, ConservedState, NVARS};

/// HLL 通量
#[derive(Debug, Clone, Copy)]
pub struct HllFlux {
    gas: GasModel,
}

impl HllFlux {
    /// 创建求解器
    pub fn new(gas: GasModel) -> Self {
        Self { gas }
    }

    /// Einfeldt 波速估计
    pub(crate) fn wave_speeds(
        &self,
        left: &ConservedState,
        right: &ConservedState,
        normal: DVec2,
    ) -> (f64, f64) {
        let vn_l = left.normal_velocity(normal);
        let vn_r = right.normal_velocity(normal);
        let c_l = self.gas.sound_speed(left);
        let c_r = self.gas.sound_speed(right);
        let avg = roe_average(&self.gas, left, right, normal);

        (
            (vn_l - c_l).min(avg.vn - avg.c),
            (vn_r + c_r).max(avg.vn + avg.c),
        )
    }
}

impl RiemannSolver for HllFlux {
    fn name(&self) -> &'static str {
        "HLL"
    }

    fn flux(&self, left: &ConservedState, right: &ConservedState, normal: DVec2) -> FaceFlux {
        let (sl, sr) = self.wave_speeds(left, right, normal);
        let max_speed = sl.abs().max(sr.abs());

        if sl >= 0.0 {
            return FaceFlux::new(self.gas.physical_flux(left, normal), max_speed);
        }
        if sr <= 0.0 {
            return FaceFlux::new(self.gas.physical_flux(right, normal), max_speed);
        }

        let fl = self.gas.physical_flux(left, normal);
        let fr = self.gas.physical_flux(right, normal);
        let ul = left.to_vars();
        let ur = right.to_vars();
        let inv = 1.0 / (sr - sl);

        let mut flux = [0.0; NVARS];
        for k in 0..NVARS {
            flux[k] = (sr * fl[k] - sl * fr[k] + sl * sr * (ur[k] - ul[k])) * inv;
        }
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
        let (sl, sr) = self.wave_speeds(left, right, normal);

        if sl >= 0.0 {
            *dfdl = self.gas.flux_jacobian(left, normal);
            *dfdr = [[0.0; NVARS]; NVARS];
            return;
        }
        if sr <= 0.0 {
            *dfdl = [[0.0; NVARS]; NVARS];
            *dfdr = self.gas.flux_jacobian(right, normal);
            return;
        }

        let al = self.gas.flux_jacobian(left, normal);
        let ar = self.gas.flux_jacobian(right, normal);
        let inv = 1.0 / (sr - sl);
        for i in 0..NVARS {
            for j in 0..NVARS {
                let id = if i == j { 1.0 } else { 0.0 };
                dfdl[i][j] = (sr * al[i][j] - sl * sr * id) * inv;
                dfdr[i][j] = (-sl * ar[i][j] + sl * sr * id) * inv;
            }
        }
    }
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::block_zero;

    fn gas() -> GasModel {
        GasModel::new(1.4)
    }

    #[test]
    fn test_consistency_identical_states() {
        let g = gas();
        let solver = HllFlux::new(g);
        let u = g.conserved_from_primitive(1.0, DVec2::new(0.3, 0.2), 1.0);
        let n = DVec2::new(0.6, 0.8);
        let f = solver.flux(&u, &u, n);
        let phys = g.physical_flux(&u, n);
        for k in 0..NVARS {
            assert!((f.flux[k] - phys[k]).abs() < 1e-13);
        }
    }

    #[test]
    fn test_supersonic_branches() {
        let g = gas();
        let solver = HllFlux::new(g);
        // 右行超音速：取左物理通量
        let ul = g.conserved_from_primitive(1.0, DVec2::new(3.0, 0.0), 1.0);
        let ur = g.conserved_from_primitive(0.9, DVec2::new(2.8, 0.0), 0.9);
        let f = solver.flux(&ul, &ur, DVec2::X);
        let phys = g.physical_flux(&ul, DVec2::X);
        for k in 0..NVARS {
            assert!((f.flux[k] - phys[k]).abs() < 1e-12);
        }
        // 左行超音速：取右物理通量
        let ul = g.conserved_from_primitive(1.0, DVec2::new(-3.0, 0.0), 1.0);
        let ur = g.conserved_from_primitive(0.9, DVec2::new(-2.8, 0.0), 0.9);
        let f = solver.flux(&ul, &ur, DVec2::X);
        let phys = g.physical_flux(&ur, DVec2::X);
        for k in 0..NVARS {
            assert!((f.flux[k] - phys[k]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_wave_speeds_bracket() {
        let g = gas();
        let solver = HllFlux::new(g);
        let ul = g.conserved_from_primitive(1.0, DVec2::ZERO, 1.0);
        let ur = g.conserved_from_primitive(0.125, DVec2::ZERO, 0.1);
        let (sl, sr) = solver.wave_speeds(&ul, &ur, DVec2::X);
        assert!(sl < 0.0 && sr > 0.0);
        assert!(sl <= -g.sound_speed(&ul) + 1e-12);
    }

    #[test]
    fn test_jacobian_sum_consistency() {
        let g = gas();
        let solver = HllFlux::new(g);
        let u = g.conserved_from_primitive(1.1, DVec2::new(0.2, -0.3), 0.9);
        let n = DVec2::new(0.0, 1.0);
        let mut dl = block_zero();
        let mut dr = block_zero();
        solver.jacobian(&u, &u, n, &mut dl, &mut dr);
        let a = g.flux_jacobian(&u, n);
        for i in 0..NVARS {
            for j in 0..NVARS {
                assert!((dl[i][j] + dr[i][j] - a[i][j]).abs() < 1e-11);
            }
        }
    }

    #[test]
    fn test_jacobian_frozen_speed_fd_agreement() {
        // 冻结波速的线性化：对小扰动仍应接近差分导数
        let g = gas();
        let solver = HllFlux::new(g);
        let ul = g.conserved_from_primitive(1.0, DVec2::new(0.3, 0.0), 1.0);
        let ur = g.conserved_from_primitive(0.998, DVec2::new(0.301, 0.0), 0.997);
        let n = DVec2::X;

        let mut dl = block_zero();
        let mut dr = block_zero();
        solver.jacobian(&ul, &ur, n, &mut dl, &mut dr);

        let base = solver.flux(&ul, &ur, n).flux;
        let eps = 1e-7;
        for j in 0..NVARS {
            let mut pert = ul.to_vars();
            pert[j] += eps;
            let fp = solver.flux(&ConservedState::from_vars(pert), &ur, n).flux;
            for i in 0..NVARS {
                let fd = (fp[i] - base[i]) / eps;
                // 波速导数被冻结，只要求 1e-2 量级的吻合
                assert!((dl[i][j] - fd).abs() < 5e-2, "dL[{}][{}]: {} vs {}", i, j, dl[i][j], fd);
            }
        }
    }
}
