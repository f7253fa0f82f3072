// crates/af_spatial/src/numerics/limiter/weno.rs

//! WENO 型梯度限制
//!
//! 不截断梯度，而是把本单元与面邻居的候选梯度按光滑度指示子
//! 非线性加权混合，再做线性外推：
//!
//! ```text
//! w_k = λ_k / (β_k + ε)^p,  β_k = |∇u_k|²
//! ∇u_blend = Σ w_k ∇u_k / Σ w_k
//! ```
//!
//! 中心（本单元）权重 λ = 1000，邻居 λ = 1，p = 4，ε = 1e-5。
//! 光滑区混合梯度趋于本单元梯度（保持二阶），大梯度候选被压制。

use rayon::prelude::*;

use super::traits::{extrapolate_with_factors, FaceLimiter};
use crate::adapter::SpatialMesh;
use crate::geometry::GeometryCache;
use crate::numerics::gradient::GradientStorage;
use crate::state::{Vars, NVARS};

/// 中心候选权重
const CENTRAL_WEIGHT: f64 = 1000.0;
/// 光滑度指示子幂次
const POWER: i32 = 4;
/// 光滑度指示子保护项
const EPSILON: f64 = 1e-5;

/// WENO 型限制器
#[derive(Debug, Clone, Copy, Default)]
pub struct WenoLimiter;

impl WenoLimiter {
    /// 创建新实例
    pub fn new() -> Self {
        Self
    }

    /// 单元的混合梯度
    fn blended_gradient(
        &self,
        mesh: &SpatialMesh,
        grad: &GradientStorage,
        cell: usize,
    ) -> (Vars, Vars) {
        let mut gx = [0.0; NVARS];
        let mut gy = [0.0; NVARS];

        for k in 0..NVARS {
            let mut acc_x = 0.0;
            let mut acc_y = 0.0;
            let mut acc_w = 0.0;

            let mut add = |candidate: usize, lambda: f64| {
                let cx = grad.grad_x[candidate][k];
                let cy = grad.grad_y[candidate][k];
                let beta = cx * cx + cy * cy;
                let w = lambda / (beta + EPSILON).powi(POWER);
                acc_x += w * cx;
                acc_y += w * cy;
                acc_w += w;
            };

            add(cell, CENTRAL_WEIGHT);
            for face in mesh.cell_faces(cell) {
                if let Some(neighbor) = mesh.face_opposite(face, cell) {
                    add(neighbor, 1.0);
                }
            }

            gx[k] = acc_x / acc_w;
            gy[k] = acc_y / acc_w;
        }
        (gx, gy)
    }
}

impl FaceLimiter for WenoLimiter {
    fn compute_face_values(
        &self,
        mesh: &SpatialMesh,
        geom: &GeometryCache,
        u: &[Vars],
        _ug: &[Vars],
        grad: &GradientStorage,
        uleft: &mut [Vars],
        uright: &mut [Vars],
    ) {
        // 先算混合梯度，再按无限制线性外推
        let blended_pairs: Vec<(Vars, Vars)> = (0..mesh.n_cells())
            .into_par_iter()
            .map(|cell| self.blended_gradient(mesh, grad, cell))
            .collect();
        let mut blended = GradientStorage::new(mesh.n_cells());
        for (cell, (gx, gy)) in blended_pairs.into_iter().enumerate() {
            blended.set(cell, gx, gy);
        }

        let alpha = vec![[1.0; NVARS]; mesh.n_cells()];
        extrapolate_with_factors(mesh, geom, u, &blended, &alpha, uleft, uright);
    }

    fn name(&self) -> &'static str {
        "WENO"
    }
}

// ============================================================
// 测试
// ============================================================
