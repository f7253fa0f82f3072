// crates/af_spatial/src/numerics/limiter/venkatakrishnan.rs

//! Venkatakrishnan 限制器
//!
//! 光滑限制函数替代 Barth-Jespersen 的硬性 min，避免限制因子
//! 不可微导致的收敛停滞。ε² = (K·h)³，h 取单元特征尺度 √面积。
//!
//! # K 参数选择
//! - 0.1-0.3: 强限制，激波主导流动
//! - 0.3-1.0: 中等限制，通用场景
//! - 1.0-5.0: 弱限制，光滑流动
//!
//! # 参考文献
//!
//! Venkatakrishnan, V. (1993). "On the accuracy of limiters and
//! convergence to steady state solutions". AIAA Paper 93-0880.

use rayon::prelude::*;

use super::traits::{extrapolate_with_factors, neighbor_extrema, FaceLimiter};
use crate::adapter::SpatialMesh;
use crate::geometry::GeometryCache;
use crate::numerics::gradient::GradientStorage;
use crate::state::{Vars, NVARS};

/// Venkatakrishnan 限制器
#[derive(Debug, Clone, Copy)]
pub struct Venkatakrishnan {
    /// K 参数，控制限制强度
    k: f64,
    /// 判零容差
    tol: f64,
}

impl Default for Venkatakrishnan {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl Venkatakrishnan {
    /// 创建限制器
    ///
    /// # 参数
    /// - `k`: K 参数
    pub fn new(k: f64) -> Self {
        Self { k, tol: 1e-12 }
    }

    /// K 参数
    pub fn k(&self) -> f64 {
        self.k
    }

    /// 光滑限制函数
    ///
    /// x 为外推增量 Δf，y 为允许增量 Δ±，返回 α ∈ [0, 1]。
    #[inline]
    fn phi(&self, x: f64, y: f64, eps2: f64) -> f64 {
        if x.abs() < self.tol {
            return 1.0;
        }
        let x2 = x * x;
        let y2 = y * y;
        let numerator = (y2 + eps2) * x + 2.0 * x2 * y;
        let denominator = y2 + 2.0 * x2 + x * y + eps2;
        if denominator.abs() < self.tol {
            return 1.0;
        }
        (numerator / denominator / x).clamp(0.0, 1.0)
    }

    /// 单元限制因子（逐分量）
    fn cell_factors(
        &self,
        mesh: &SpatialMesh,
        geom: &GeometryCache,
        u: &[Vars],
        ug: &[Vars],
        grad: &GradientStorage,
        cell: usize,
    ) -> Vars {
        let (umin, umax) = neighbor_extrema(mesh, u, ug, cell);
        let rc = geom.cell_centroid(cell);
        let kh = self.k * mesh.cell_area(cell).sqrt();
        let eps2 = kh * kh * kh;
        let mut alpha: Vars = [1.0; NVARS];

        for face in mesh.cell_faces(cell) {
            for gp in geom.gauss_points(face) {
                let (dx, dy) = (gp.x - rc.x, gp.y - rc.y);
                for k in 0..NVARS {
                    let delta = grad.directional(cell, k, dx, dy);
                    let allowed = if delta >= 0.0 {
                        umax[k] - u[cell][k]
                    } else {
                        umin[k] - u[cell][k]
                    };
                    alpha[k] = alpha[k].min(self.phi(delta, allowed, eps2));
                }
            }
        }
        alpha
    }
}

impl FaceLimiter for Venkatakrishnan {
    fn compute_face_values(
        &self,
        mesh: &SpatialMesh,
        geom: &GeometryCache,
        u: &[Vars],
        ug: &[Vars],
        grad: &GradientStorage,
        uleft: &mut [Vars],
        uright: &mut [Vars],
    ) {
        let alpha: Vec<Vars> = (0..mesh.n_cells())
            .into_par_iter()
            .map(|cell| self.cell_factors(mesh, geom, u, ug, grad, cell))
            .collect();
        extrapolate_with_factors(mesh, geom, u, grad, &alpha, uleft, uright);
    }

    fn name(&self) -> &'static str {
        "Venkatakrishnan"
    }
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::gradient::{GradientMethod, GreenGaussGradient};
    use crate::types::GhostCentroidPolicy;
    use af_mesh::RectMeshBuilder;
    use std::sync::Arc;

    #[test]
    fn test_phi_range() {
        let lim = Venkatakrishnan::new(0.3);
        let eps2 = 1e-6;
        for &(x, y) in &[(0.5, 1.0), (1.0, 0.5), (2.0, 0.1), (-1.0, -0.3), (1e-14, 1.0)] {
            let phi = lim.phi(x, y, eps2);
            assert!((0.0..=1.0).contains(&phi), "phi({}, {}) = {}", x, y, phi);
        }
    }

    #[test]
    fn test_phi_mild_gradient_near_one() {
        // 允许增量远大于外推增量时几乎不限制
        let lim = Venkatakrishnan::new(0.3);
        let phi = lim.phi(0.01, 1.0, 1e-6);
        assert!(phi > 0.99, "phi = {}", phi);
    }

    #[test]
    fn test_phi_strong_gradient_limited() {
        // 外推增量远超允许增量时强限制
        let lim = Venkatakrishnan::new(0.3);
        let phi = lim.phi(10.0, 0.1, 1e-9);
        assert!(phi < 0.05, "phi = {}", phi);
    }

    #[test]
    fn test_factors_in_unit_interval() {
        let mesh = SpatialMesh::new(Arc::new(
            RectMeshBuilder::new(5, 4, 5.0, 4.0).build().unwrap(),
        ));
        let geom = GeometryCache::new(&mesh, GhostCentroidPolicy::MidpointReflection);
        let u: Vec<Vars> = mesh
            .cells()
            .map(|c| {
                let rc = geom.cell_centroid(c);
                [(3.0 * rc.x).sin() + (2.0 * rc.y).cos(); NVARS]
            })
            .collect();
        let mut ug = vec![[0.0; NVARS]; mesh.n_faces()];
        for face in mesh.boundary_faces() {
            ug[face] = u[mesh.face_owner(face)];
        }
        let mut grad = GradientStorage::new(mesh.n_cells());
        GreenGaussGradient::new().compute_gradients(&mesh, &geom, &u, &ug, &mut grad);

        let lim = Venkatakrishnan::new(0.3);
        for cell in mesh.cells() {
            let alpha = lim.cell_factors(&mesh, &geom, &u, &ug, &grad, cell);
            for k in 0..NVARS {
                assert!((0.0..=1.0).contains(&alpha[k]));
            }
        }
    }
}
