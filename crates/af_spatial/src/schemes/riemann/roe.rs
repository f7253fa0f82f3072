// crates/af_spatial/src/schemes/riemann/roe.rs

//! Roe 通量差分分裂
//!
//! F = ½(F_L + F_R)·n − ½|Ã|(U_R − U_L)，Ã 为 Roe 平均态上的
//! 通量雅可比。声波特征值做 Harten 熵修正。
//!
//! 雅可比冻结 Roe 平均（|Ã| 不对状态求导）：
//! dF/dU_L = ½(A(U_L) + |Ã|)，dF/dU_R = ½(A(U_R) − |Ã|)。
//! 这是非精确 Newton 的标准线性化；相同状态下两者之和仍为精确雅可比。
//!
//! # 参考文献
//!
//! Roe, P.L. (1981). "Approximate Riemann solvers, parameter vectors,
//! and difference schemes". JCP 43.

use glam::DVec2;

use super::traits::{FaceFlux, RiemannSolver};
use crate::physics::GasModel;
use crate::state::{Block, ConservedState, Vars, NVARS};

/// Harten 熵修正阈值系数（乘以 Roe 平均声速）
const ENTROPY_FIX_RATIO: f64 = 0.1;

/// Roe 平均态
#[derive(Debug, Clone, Copy)]
pub(crate) struct RoeAverage {
    /// 平均密度 √(ρ_L ρ_R)
    pub rho: f64,
    /// 平均速度
    pub vx: f64,
    pub vy: f64,
    /// 平均总焓
    pub h: f64,
    /// 平均声速
    pub c: f64,
    /// 平均法向速度
    pub vn: f64,
}

/// 计算 Roe 平均
pub(crate) fn roe_average(
    gas: &GasModel,
    left: &ConservedState,
    right: &ConservedState,
    normal: DVec2,
) -> RoeAverage {
    let g = gas.gamma();
    let sl = left.rho.sqrt();
    let sr = right.rho.sqrt();
    let inv = 1.0 / (sl + sr);

    let vl = left.velocity();
    let vr = right.velocity();
    let hl = (left.en + gas.pressure(left)) / left.rho;
    let hr = (right.en + gas.pressure(right)) / right.rho;

    let vx = (sl * vl.x + sr * vr.x) * inv;
    let vy = (sl * vl.y + sr * vr.y) * inv;
    let h = (sl * hl + sr * hr) * inv;
    let q2 = vx * vx + vy * vy;
    let c = ((g - 1.0) * (h - 0.5 * q2)).sqrt();

    RoeAverage {
        rho: sl * sr,
        vx,
        vy,
        h,
        c,
        vn: vx * normal.x + vy * normal.y,
    }
}

/// Roe 通量
#[derive(Debug, Clone, Copy)]
pub struct RoeFlux {
    gas: GasModel,
}

impl RoeFlux {
    /// 创建求解器
    pub fn new(gas: GasModel) -> Self {
        Self { gas }
    }

    /// Harten 熵修正后的特征值绝对值
    #[inline]
    fn fixed_abs(lambda: f64, delta: f64) -> f64 {
        if lambda.abs() < delta {
            0.5 * (lambda * lambda / delta + delta)
        } else {
            lambda.abs()
        }
    }

    /// 耗散项 |Ã|·Δu
    fn dissipation(&self, avg: &RoeAverage, du: &Vars, normal: DVec2) -> Vars {
        let g = self.gas.gamma();
        let (nx, ny) = (normal.x, normal.y);
        let q2 = avg.vx * avg.vx + avg.vy * avg.vy;

        // 原始量跳跃（由守恒量跳跃在 Roe 态上线性化）
        let d_rho = du[0];
        let d_vx = (du[1] - avg.vx * du[0]) / avg.rho;
        let d_vy = (du[2] - avg.vy * du[0]) / avg.rho;
        let d_p = (g - 1.0)
            * (du[3] - avg.vx * du[1] - avg.vy * du[2] + 0.5 * q2 * du[0]);
        let d_vn = d_vx * nx + d_vy * ny;

        // 声波做熵修正，线性波取绝对值
        let delta = ENTROPY_FIX_RATIO * avg.c;
        let l1 = Self::fixed_abs(avg.vn - avg.c, delta);
        let l2 = avg.vn.abs();
        let l4 = Self::fixed_abs(avg.vn + avg.c, delta);

        let c2 = avg.c * avg.c;
        let a1 = (d_p - avg.rho * avg.c * d_vn) / (2.0 * c2);
        let a2 = d_rho - d_p / c2;
        let a4 = (d_p + avg.rho * avg.c * d_vn) / (2.0 * c2);

        let r1 = [
            1.0,
            avg.vx - avg.c * nx,
            avg.vy - avg.c * ny,
            avg.h - avg.c * avg.vn,
        ];
        let r2 = [1.0, avg.vx, avg.vy, 0.5 * q2];
        let r4 = [
            1.0,
            avg.vx + avg.c * nx,
            avg.vy + avg.c * ny,
            avg.h + avg.c * avg.vn,
        ];
        // 剪切波贡献（与熵波共享特征值 vn）
        let shear = [
            0.0,
            d_vx - d_vn * nx,
            d_vy - d_vn * ny,
            avg.vx * d_vx + avg.vy * d_vy - avg.vn * d_vn,
        ];

        let mut out = [0.0; NVARS];
        for k in 0..NVARS {
            out[k] = l1 * a1 * r1[k] + l2 * (a2 * r2[k] + avg.rho * shear[k]) + l4 * a4 * r4[k];
        }
        out
    }

    /// |Ã| 矩阵（按列作用单位跳跃得到）
    fn abs_roe_matrix(&self, avg: &RoeAverage, normal: DVec2) -> Block {
        let mut out = [[0.0; NVARS]; NVARS];
        for j in 0..NVARS {
            let mut e = [0.0; NVARS];
            e[j] = 1.0;
            let col = self.dissipation(avg, &e, normal);
            for i in 0..NVARS {
                out[i][j] = col[i];
            }
        }
        out
    }
}

impl RiemannSolver for RoeFlux {
    fn name(&self) -> &'static str {
        "Roe"
    }

    fn flux(&self, left: &ConservedState, right: &ConservedState, normal: DVec2) -> FaceFlux {
        let fl = self.gas.physical_flux(left, normal);
        let fr = self.gas.physical_flux(right, normal);
        let avg = roe_average(&self.gas, left, right, normal);

        let ul = left.to_vars();
        let ur = right.to_vars();
        let du: Vars = std::array::from_fn(|k| ur[k] - ul[k]);
        let diss = self.dissipation(&avg, &du, normal);

        let mut flux = [0.0; NVARS];
        for k in 0..NVARS {
            flux[k] = 0.5 * (fl[k] + fr[k]) - 0.5 * diss[k];
        }
        FaceFlux::new(flux, avg.vn.abs() + avg.c)
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
        let avg = roe_average(&self.gas, left, right, normal);
        let abs_a = self.abs_roe_matrix(&avg, normal);

        for i in 0..NVARS {
            for j in 0..NVARS {
                dfdl[i][j] = 0.5 * (al[i][j] + abs_a[i][j]);
                dfdr[i][j] = 0.5 * (ar[i][j] - abs_a[i][j]);
            }
        }
    }
}

// ============================================================
// 测试
// ============================================================
