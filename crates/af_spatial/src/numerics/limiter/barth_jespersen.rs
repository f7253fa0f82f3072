// crates/af_spatial/src/numerics/limiter/barth_jespersen.rs

//! Barth-Jespersen 限制器
//!
//! 经典 TVD 限制器：对每个单元取所有面外推增量的最严格限制因子，
//! 保证限制后的面值严格落在单元与面邻居平均值的范围内。
//!
//! # 参考文献
//!
//! Barth, T.J. and Jespersen, D.C. (1989). "The design and application
//! of upwind schemes on unstructured meshes". AIAA Paper 89-0366.

use rayon::prelude::*;

use super::traits::{extrapolate_with_factors, neighbor_extrema, FaceLimiter};
use crate::adapter::SpatialMesh;
use crate::geometry::GeometryCache;
use crate::numerics::gradient::GradientStorage;
use crate::state::{Vars, NVARS};

/// Barth-Jespersen 限制器
#[derive(Debug, Clone, Copy)]
pub struct BarthJespersen {
    /// 梯度判零容差
    eps: f64,
}

impl Default for BarthJespersen {
    fn default() -> Self {
        Self { eps: 1e-12 }
    }
}

impl BarthJespersen {
    /// 创建新实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建具有自定义容差的限制器
    pub fn with_tolerance(eps: f64) -> Self {
        Self { eps }
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
        let mut alpha: Vars = [1.0; NVARS];

        for face in mesh.cell_faces(cell) {
            for gp in geom.gauss_points(face) {
                let (dx, dy) = (gp.x - rc.x, gp.y - rc.y);
                for k in 0..NVARS {
                    let delta = grad.directional(cell, k, dx, dy);
                    let phi = if delta > self.eps {
                        ((umax[k] - u[cell][k]) / delta).min(1.0)
                    } else if delta < -self.eps {
                        ((umin[k] - u[cell][k]) / delta).min(1.0)
                    } else {
                        1.0
                    };
                    alpha[k] = alpha[k].min(phi);
                }
            }
        }
        alpha
    }
}

impl FaceLimiter for BarthJespersen {
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
        "BarthJespersen"
    }
}

// ============================================================
// 测试
// ============================================================
