// crates/af_spatial/src/numerics/limiter/van_albada.rs

//! Van Albada 限制器
//!
//! 面向面的 MUSCL 型限制：对每个内部面，用中心差分 (u_j - u_i)
//! 与上风差分 (2∇u·r - (u_j - u_i)) 的 van Albada 比值平滑限制，
//! κ = 1/3。边界面退化为一阶（面值取单元平均）。
//!
//! ```text
//! u_f,i = u_i + φ/4 [(1-κφ)Δ⁻ + (1+κφ)Δ⁺]
//! φ = max(0, (2Δ⁻Δ⁺ + ε) / ((Δ⁻)² + (Δ⁺)² + ε))
//! ```

use rayon::prelude::*;

use super::traits::FaceLimiter;
use crate::adapter::SpatialMesh;
use crate::geometry::GeometryCache;
use crate::numerics::gradient::GradientStorage;
use crate::state::{Vars, NVARS};

/// MUSCL κ 参数
const KAPPA: f64 = 1.0 / 3.0;

/// Van Albada 限制器
#[derive(Debug, Clone, Copy)]
pub struct VanAlbada {
    /// 分母保护项
    eps: f64,
}

impl Default for VanAlbada {
    fn default() -> Self {
        Self { eps: 1e-12 }
    }
}

impl VanAlbada {
    /// 创建新实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 单侧 MUSCL 外推
    ///
    /// `central` 为中心差分 (沿 owner→neighbor 方向)，
    /// `upwind` 为上风差分 2∇u·r - central。
    #[inline]
    fn muscl_value(&self, cell_value: f64, upwind: f64, central: f64) -> f64 {
        let phi = (2.0 * upwind * central + self.eps)
            / (upwind * upwind + central * central + self.eps);
        let phi = phi.max(0.0);
        cell_value + 0.25 * phi * ((1.0 - KAPPA * phi) * upwind + (1.0 + KAPPA * phi) * central)
    }
}

impl FaceLimiter for VanAlbada {
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
        let nb = mesh.n_boundary_faces();

        // 边界面：一阶
        uleft[..nb].par_iter_mut().enumerate().for_each(|(face, ul)| {
            *ul = u[mesh.face_owner(face)];
        });

        // 内部面：两侧 MUSCL 外推
        let interior: Vec<(Vars, Vars)> = (nb..mesh.n_faces())
            .into_par_iter()
            .map(|face| {
                let i = mesh.face_owner(face);
                let j = mesh.face_neighbor(face).expect("内部面缺少 neighbor");
                let r = geom.cell_centroid(j) - geom.cell_centroid(i);

                let mut left = u[i];
                let mut right = u[j];
                for k in 0..NVARS {
                    let central = u[j][k] - u[i][k];
                    let upwind_i = 2.0 * grad.directional(i, k, r.x, r.y) - central;
                    let upwind_j = 2.0 * grad.directional(j, k, r.x, r.y) - central;
                    left[k] = self.muscl_value(u[i][k], upwind_i, central);
                    // 右侧沿 -r 方向外推，差分同号取负
                    right[k] = self.muscl_value(u[j][k], -upwind_j, -central);
                }
                (left, right)
            })
            .collect();

        for (idx, (left, right)) in interior.into_iter().enumerate() {
            uleft[nb + idx] = left;
            uright[nb + idx] = right;
        }
    }

    fn name(&self) -> &'static str {
        "VanAlbada"
    }
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GhostCentroidPolicy;
    use af_mesh::RectMeshBuilder;
    use std::sync::Arc;

    fn setup() -> (SpatialMesh, GeometryCache) {
        let mesh = SpatialMesh::new(Arc::new(
            RectMeshBuilder::new(4, 1, 4.0, 1.0).build().unwrap(),
        ));
        let geom = GeometryCache::new(&mesh, GhostCentroidPolicy::MidpointReflection);
        (mesh, geom)
    }

    #[test]
    fn test_linear_field_reduces_to_midpoint() {
        // 线性场 u = x：Δ⁻ = Δ⁺，φ = 1，外推值为面上精确值
        let (mesh, geom) = setup();
        let u: Vec<Vars> = mesh
            .cells()
            .map(|c| [geom.cell_centroid(c).x; NVARS])
            .collect();
        let ug = vec![[0.0; NVARS]; mesh.n_faces()];
        let mut grad = GradientStorage::new(mesh.n_cells());
        for cell in mesh.cells() {
            grad.set(cell, [1.0; NVARS], [0.0; NVARS]);
        }

        let nf = mesh.n_faces();
        let mut ul = vec![[0.0; NVARS]; nf];
        let mut ur = vec![[0.0; NVARS]; nf];
        VanAlbada::new().compute_face_values(&mesh, &geom, &u, &ug, &grad, &mut ul, &mut ur);

        for face in mesh.interior_faces() {
            let x_face = mesh.face_midpoint(face).x;
            assert!((ul[face][0] - x_face).abs() < 1e-9, "面 {}: {} vs {}", face, ul[face][0], x_face);
            assert!((ur[face][0] - x_face).abs() < 1e-9);
        }
    }

    #[test]
    fn test_extremum_strongly_limited() {
        // u = (0, 10, 0, 10): 振荡场，外推不应放大振幅
        let (mesh, geom) = setup();
        let values = [0.0, 10.0, 0.0, 10.0];
        let u: Vec<Vars> = (0..4).map(|c| [values[c]; NVARS]).collect();
        let ug = vec![[0.0; NVARS]; mesh.n_faces()];
        let mut grad = GradientStorage::new(mesh.n_cells());

        let nf = mesh.n_faces();
        let mut ul = vec![[0.0; NVARS]; nf];
        let mut ur = vec![[0.0; NVARS]; nf];
        VanAlbada::new().compute_face_values(&mesh, &geom, &u, &ug, &grad, &mut ul, &mut ur);

        for face in mesh.interior_faces() {
            assert!(ul[face][0] >= -1e-9 && ul[face][0] <= 10.0 + 1e-9);
            assert!(ur[face][0] >= -1e-9 && ur[face][0] <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn test_boundary_first_order() {
        let (mesh, geom) = setup();
        let u: Vec<Vars> = (0..4).map(|c| [c as f64; NVARS]).collect();
        let ug = vec![[0.0; NVARS]; mesh.n_faces()];
        let mut grad = GradientStorage::new(mesh.n_cells());
        for cell in mesh.cells() {
            grad.set(cell, [5.0; NVARS], [5.0; NVARS]);
        }

        let nf = mesh.n_faces();
        let mut ul = vec![[0.0; NVARS]; nf];
        let mut ur = vec![[0.0; NVARS]; nf];
        VanAlbada::new().compute_face_values(&mesh, &geom, &u, &ug, &grad, &mut ul, &mut ur);

        for face in mesh.boundary_faces() {
            assert_eq!(ul[face], u[mesh.face_owner(face)]);
        }
    }
}
