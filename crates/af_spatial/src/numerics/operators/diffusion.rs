// crates/af_spatial/src/numerics/operators/diffusion.rs

//! 模型标量扩散算子
//!
//! 求解 -∇·(μ∇u) = f 的空间离散，作为与 Euler 离散同构的
//! 标量模型问题：同一网格契约、同一残差/雅可比/时间步界接口，
//! 块退化为 1×1 标量。
//!
//! 面法向导数取两点差分 (u_邻 - u_本)/距离；边界为 Dirichlet，
//! 以面中点处的给定值参与差分。正交网格上对线性场精确。

use std::sync::Arc;

use af_mesh::FlowMesh;
use glam::DVec2;

use crate::adapter::SpatialMesh;
use crate::geometry::GeometryCache;
use crate::types::{ConfigError, GhostCentroidPolicy};

/// 标量扩散空间离散
pub struct ScalarDiffusion {
    mesh: SpatialMesh,
    geom: GeometryCache,
    /// 扩散系数 μ
    mu: f64,
    /// Dirichlet 边界值 g(x)
    boundary_value: Box<dyn Fn(DVec2) -> f64 + Send + Sync>,
    /// 源项 f(x)
    source: Box<dyn Fn(DVec2) -> f64 + Send + Sync>,
}

impl ScalarDiffusion {
    /// 创建标量扩散离散
    pub fn new(
        mesh: Arc<FlowMesh>,
        mu: f64,
        boundary_value: Box<dyn Fn(DVec2) -> f64 + Send + Sync>,
        source: Box<dyn Fn(DVec2) -> f64 + Send + Sync>,
    ) -> Result<Self, ConfigError> {
        if !(mu > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "mu",
                constraint: "mu > 0",
            });
        }
        let mesh = SpatialMesh::new(mesh);
        let geom = GeometryCache::new(&mesh, GhostCentroidPolicy::MidpointReflection);
        Ok(Self {
            mesh,
            geom,
            mu,
            boundary_value,
            source,
        })
    }

    /// 网格视图
    pub fn mesh(&self) -> &SpatialMesh {
        &self.mesh
    }

    /// 面两点差分的距离
    fn face_distance(&self, face: usize) -> f64 {
        let owner = self.mesh.face_owner(face);
        match self.mesh.face_neighbor(face) {
            Some(neighbor) => {
                (self.geom.cell_centroid(neighbor) - self.geom.cell_centroid(owner)).length()
            }
            None => (self.mesh.face_midpoint(face) - self.geom.cell_centroid(owner)).length(),
        }
    }

    /// 面对侧的场值（边界取 Dirichlet 值）
    fn face_opposite_value(&self, face: usize, u: &[f64]) -> f64 {
        match self.mesh.face_neighbor(face) {
            Some(neighbor) => u[neighbor],
            None => (self.boundary_value)(self.mesh.face_midpoint(face)),
        }
    }

    /// 计算残差与可选的扩散时间步界
    ///
    /// R_i = Σ_f (-μ ∂u/∂n)·len - f_i·A_i，owner 侧取 `+`、
    /// neighbor 侧取 `-`，与 Euler 残差同一符号约定。
    pub fn compute_residual(
        &self,
        u: &[f64],
        residual: &mut [f64],
        timesteps: Option<&mut [f64]>,
    ) {
        let n_cells = self.mesh.n_cells();
        debug_assert_eq!(u.len(), n_cells);
        debug_assert_eq!(residual.len(), n_cells);

        residual.fill(0.0);
        let mut integ = vec![0.0; n_cells];

        for face in self.mesh.faces() {
            let owner = self.mesh.face_owner(face);
            let length = self.mesh.face_length(face);
            let dist = self.face_distance(face);
            let other = self.face_opposite_value(face, u);

            // 向外扩散通量 -μ (u_对侧 - u_本)/dist
            let flux = -self.mu * (other - u[owner]) / dist * length;
            residual[owner] += flux;
            integ[owner] += self.mu * length / dist;

            if let Some(neighbor) = self.mesh.face_neighbor(face) {
                residual[neighbor] -= flux;
                integ[neighbor] += self.mu * length / dist;
            }
        }

        for cell in self.mesh.cells() {
            let rc = self.geom.cell_centroid(cell);
            residual[cell] -= (self.source)(rc) * self.mesh.cell_area(cell);
        }

        if let Some(timesteps) = timesteps {
            for (cell, dt) in timesteps.iter_mut().enumerate() {
                *dt = self.mesh.cell_area(cell) / integ[cell];
            }
        }
    }

    /// 组装标量三对角块（对角/下/上）雅可比
    ///
    /// 与 Euler 的块约定一致退化到标量：
    /// L_f = -len·∂F/∂u_owner，U_f = +len·∂F/∂u_neighbor，
    /// 对角累加 -L、-U。
    pub fn compute_jacobian(&self, diagonal: &mut [f64], lower: &mut [f64], upper: &mut [f64]) {
        let nb = self.mesh.n_boundary_faces();
        debug_assert_eq!(diagonal.len(), self.mesh.n_cells());
        debug_assert_eq!(lower.len(), self.mesh.n_interior_faces());
        debug_assert_eq!(upper.len(), self.mesh.n_interior_faces());

        diagonal.fill(0.0);

        for face in self.mesh.faces() {
            let owner = self.mesh.face_owner(face);
            let length = self.mesh.face_length(face);
            let coeff = self.mu * length / self.face_distance(face);

            match self.mesh.face_neighbor(face) {
                Some(neighbor) => {
                    let iface = face - nb;
                    // ∂F/∂u_owner = +coeff/len·len = +coeff, ∂F/∂u_ngb = -coeff
                    lower[iface] = -coeff;
                    upper[iface] = -coeff;
                    diagonal[owner] += coeff;
                    diagonal[neighbor] += coeff;
                }
                None => {
                    // 边界值固定，只进 owner 对角
                    diagonal[owner] += coeff;
                }
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
    use af_mesh::RectMeshBuilder;

    fn setup(
        boundary: impl Fn(DVec2) -> f64 + Send + Sync + 'static,
        source: impl Fn(DVec2) -> f64 + Send + Sync + 'static,
    ) -> ScalarDiffusion {
        let mesh = Arc::new(RectMeshBuilder::new(4, 4, 4.0, 4.0).build().unwrap());
        ScalarDiffusion::new(mesh, 1.0, Box::new(boundary), Box::new(source)).unwrap()
    }

    #[test]
    fn test_invalid_mu_rejected() {
        let mesh = Arc::new(RectMeshBuilder::new(2, 2, 1.0, 1.0).build().unwrap());
        assert!(matches!(
            ScalarDiffusion::new(mesh, 0.0, Box::new(|_| 0.0), Box::new(|_| 0.0)),
            Err(ConfigError::InvalidParameter { name: "mu", .. })
        ));
    }

    #[test]
    fn test_uniform_field_zero_residual() {
        let op = setup(|_| 3.0, |_| 0.0);
        let u = vec![3.0; op.mesh().n_cells()];
        let mut residual = vec![9.9; op.mesh().n_cells()];
        op.compute_residual(&u, &mut residual, None);
        for r in &residual {
            assert!(r.abs() < 1e-13);
        }
    }

    #[test]
    fn test_linear_field_zero_residual_on_cartesian() {
        // 两点差分对线性场精确（正交网格），Dirichlet 值取同一线性函数
        let op = setup(|p| 2.0 * p.x - p.y, |_| 0.0);
        let u: Vec<f64> = op
            .mesh()
            .cells()
            .map(|c| {
                let rc = op.geom.cell_centroid(c);
                2.0 * rc.x - rc.y
            })
            .collect();
        let mut residual = vec![0.0; op.mesh().n_cells()];
        op.compute_residual(&u, &mut residual, None);
        for (cell, r) in residual.iter().enumerate() {
            assert!(r.abs() < 1e-11, "单元 {}: {}", cell, r);
        }
    }

    #[test]
    fn test_source_enters_residual() {
        let op = setup(|_| 0.0, |_| 2.0);
        let u = vec![0.0; op.mesh().n_cells()];
        let mut residual = vec![0.0; op.mesh().n_cells()];
        op.compute_residual(&u, &mut residual, None);
        // 单元面积 1，残差含 -f·A = -2
        // 内部单元无扩散贡献 (u 均匀)，残差恰为 -2
        for r in &residual {
            assert!((r + 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_jacobian_matches_finite_difference() {
        let op = setup(|p| p.x, |p| (p.x * 0.7).sin());
        let n_cells = op.mesh().n_cells();
        let n_if = op.mesh().n_interior_faces();

        let mut diagonal = vec![0.0; n_cells];
        let mut lower = vec![0.0; n_if];
        let mut upper = vec![0.0; n_if];
        op.compute_jacobian(&mut diagonal, &mut lower, &mut upper);

        let u: Vec<f64> = (0..n_cells).map(|c| (c as f64 * 0.37).sin()).collect();
        let mut base = vec![0.0; n_cells];
        op.compute_residual(&u, &mut base, None);

        let eps = 1e-6;
        let nb = op.mesh().n_boundary_faces();
        for j in 0..n_cells {
            let mut pert = u.clone();
            pert[j] += eps;
            let mut res = vec![0.0; n_cells];
            op.compute_residual(&pert, &mut res, None);

            // 对角项
            let fd_diag = (res[j] - base[j]) / eps;
            assert!(
                (diagonal[j] - fd_diag).abs() < 1e-6,
                "对角 {}: {} vs {}",
                j,
                diagonal[j],
                fd_diag
            );

            // 越过内部面的非对角项
            for face in op.mesh().interior_faces() {
                let owner = op.mesh().face_owner(face);
                let neighbor = op.mesh().face_neighbor(face).unwrap();
                let iface = face - nb;
                if owner == j {
                    let fd = (res[neighbor] - base[neighbor]) / eps;
                    assert!((lower[iface] - fd).abs() < 1e-6, "下块 {}", iface);
                }
                if neighbor == j {
                    let fd = (res[owner] - base[owner]) / eps;
                    assert!((upper[iface] - fd).abs() < 1e-6, "上块 {}", iface);
                }
            }
        }
    }

    #[test]
    fn test_timestep_bound_positive() {
        let op = setup(|_| 0.0, |_| 0.0);
        let u = vec![0.0; op.mesh().n_cells()];
        let mut residual = vec![0.0; op.mesh().n_cells()];
        let mut dtm = vec![0.0; op.mesh().n_cells()];
        op.compute_residual(&u, &mut residual, Some(&mut dtm));
        for dt in &dtm {
            assert!(dt.is_finite() && *dt > 0.0);
        }
    }
}
