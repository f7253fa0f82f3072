// crates/af_spatial/src/engine/matrix_free.rs

//! 矩阵自由雅可比-向量乘积
//!
//! 不物化雅可比，用一次前向差分近似方向导数：
//!
//! ```text
//! δ = ε/‖v‖
//! (∂R/∂u)·v ≈ (R(u + δv) − R(u)) / δ
//! ```
//!
//! ε 默认取 √(机器精度)/10。‖v‖ 为零时乘积按零处理（除零防护）。
//! 另提供仿射组合 a·(Jv) + b·w 与质量/时间项 面积/Δt·v 的叠加，
//! 供外层隐式迭代直接构造 shifted 算子。

use crate::state::ConservedState;

use super::residual::EulerSpatial;

/// 零方向判据
const ZERO_NORM_TOL: f64 = 1e-30;

/// 矩阵自由雅可比算子
pub struct MatrixFreeJacobian<'a> {
    spatial: &'a EulerSpatial,
    eps: f64,
}

impl<'a> MatrixFreeJacobian<'a> {
    /// 创建算子，扰动尺度取默认值 √ε_mach/10
    pub fn new(spatial: &'a EulerSpatial) -> Self {
        Self {
            spatial,
            eps: f64::EPSILON.sqrt() / 10.0,
        }
    }

    /// 自定义扰动尺度
    pub fn with_epsilon(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// 扰动尺度
    pub fn epsilon(&self) -> f64 {
        self.eps
    }

    /// 方向导数 (∂R/∂u)·v
    ///
    /// # 参数
    /// - `u`: 基准状态场
    /// - `res_base`: 已算好的基准残差 R(u)
    /// - `v`: 方向向量
    /// - `out`: 输出乘积
    pub fn product(
        &self,
        u: &[ConservedState],
        res_base: &[ConservedState],
        v: &[ConservedState],
        out: &mut [ConservedState],
    ) {
        let n_cells = self.spatial.n_cells();
        debug_assert_eq!(u.len(), n_cells);
        debug_assert_eq!(res_base.len(), n_cells);
        debug_assert_eq!(v.len(), n_cells);
        debug_assert_eq!(out.len(), n_cells);

        let norm = l2_norm(v);
        if norm < ZERO_NORM_TOL {
            out.fill(ConservedState::ZERO);
            return;
        }

        let delta = self.eps / norm;
        let perturbed: Vec<ConservedState> =
            u.iter().zip(v.iter()).map(|(s, d)| *s + *d * delta).collect();

        let mut res_pert = vec![ConservedState::ZERO; n_cells];
        self.spatial.compute_residual(&perturbed, &mut res_pert, None);

        let inv_delta = 1.0 / delta;
        for cell in 0..n_cells {
            out[cell] = (res_pert[cell] - res_base[cell]) * inv_delta;
        }
    }

    /// 仿射组合 a·(Jv) + b·w
    #[allow(clippy::too_many_arguments)]
    pub fn affine_product(
        &self,
        u: &[ConservedState],
        res_base: &[ConservedState],
        v: &[ConservedState],
        a: f64,
        b: f64,
        w: &[ConservedState],
        out: &mut [ConservedState],
    ) {
        self.product(u, res_base, v, out);
        for cell in 0..out.len() {
            out[cell] = out[cell] * a + w[cell] * b;
        }
    }

    /// 含质量/时间项的乘积 面积/Δt·v + (∂R/∂u)·v
    ///
    /// 隐式伪时间迭代的 shifted 算子动作。
    pub fn shifted_product(
        &self,
        u: &[ConservedState],
        res_base: &[ConservedState],
        v: &[ConservedState],
        timesteps: &[f64],
        out: &mut [ConservedState],
    ) {
        self.product(u, res_base, v, out);
        for cell in 0..out.len() {
            let mass = self.spatial.mesh().cell_area(cell) / timesteps[cell];
            out[cell] += v[cell] * mass;
        }
    }
}

/// 状态场的 L2 范数（所有分量展平）
fn l2_norm(v: &[ConservedState]) -> f64 {
    v.iter()
        .map(|s| {
            let a = s.to_vars();
            a.iter().map(|x| x * x).sum::<f64>()
        })
        .sum::<f64>()
        .sqrt()
}

// ============================================================
// 测试
// ============================================================
