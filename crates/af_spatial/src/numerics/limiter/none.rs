// crates/af_spatial/src/numerics/limiter/none.rs

//! 无限制器
//!
//! 原样线性外推到面 Gauss 点，不做任何限制。

use super::traits::{extrapolate_with_factors, FaceLimiter};
use crate::adapter::SpatialMesh;
use crate::geometry::GeometryCache;
use crate::numerics::gradient::GradientStorage;
use crate::state::{Vars, NVARS};

/// 无限制器
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLimiter;

impl NoLimiter {
    /// 创建新实例
    pub fn new() -> Self {
        Self
    }
}

impl FaceLimiter for NoLimiter {
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
        let alpha = vec![[1.0; NVARS]; mesh.n_cells()];
        extrapolate_with_factors(mesh, geom, u, grad, &alpha, uleft, uright);
    }

    fn name(&self) -> &'static str {
        "NoLimiter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GhostCentroidPolicy;
    use af_mesh::RectMeshBuilder;
    use std::sync::Arc;

    #[test]
    fn test_zero_gradient_gives_cell_average() {
        let mesh = SpatialMesh::new(Arc::new(
            RectMeshBuilder::new(3, 2, 3.0, 2.0).build().unwrap(),
        ));
        let geom = GeometryCache::new(&mesh, GhostCentroidPolicy::MidpointReflection);
        let u: Vec<Vars> = (0..mesh.n_cells()).map(|c| [c as f64; NVARS]).collect();
        let ug = vec![[0.0; NVARS]; mesh.n_faces()];
        let grad = GradientStorage::new(mesh.n_cells());

        let mut uleft = vec![[0.0; NVARS]; mesh.n_faces()];
        let mut uright = vec![[0.0; NVARS]; mesh.n_faces()];
        NoLimiter::new().compute_face_values(&mesh, &geom, &u, &ug, &grad, &mut uleft, &mut uright);

        // 零梯度时面值与单元平均逐位相等（一阶还原）
        for face in mesh.faces() {
            assert_eq!(uleft[face], u[mesh.face_owner(face)]);
        }
        for face in mesh.interior_faces() {
            assert_eq!(uright[face], u[mesh.face_neighbor(face).unwrap()]);
        }
    }
}
