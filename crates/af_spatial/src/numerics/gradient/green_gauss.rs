// crates/af_spatial/src/numerics/gradient/green_gauss.rs

//! Green-Gauss 梯度计算
//!
//! 使用 Green 定理将体积分转化为面积分:
//! ∇φ ≈ (1/A) ∮ φ·n dS
//!
//! 面值取两侧单元平均的算术平均；边界面以幽灵平均参与，
//! 与内部面使用同一公式。

use rayon::prelude::*;

use super::traits::{GradientMethod, GradientStorage};
use crate::adapter::SpatialMesh;
use crate::geometry::GeometryCache;
use crate::state::{Vars, NVARS};

/// Green-Gauss 梯度计算器
#[derive(Debug, Clone)]
pub struct GreenGaussGradient {
    /// 是否启用并行
    parallel: bool,
    /// 并行阈值（单元数）
    parallel_threshold: usize,
}

impl Default for GreenGaussGradient {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 1000,
        }
    }
}

impl GreenGaussGradient {
    /// 创建新实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置并行开关与阈值
    pub fn with_parallel(mut self, parallel: bool, threshold: usize) -> Self {
        self.parallel = parallel;
        self.parallel_threshold = threshold;
        self
    }

    /// 计算单个单元的梯度
    fn compute_cell_gradient(
        &self,
        cell: usize,
        mesh: &SpatialMesh,
        u: &[Vars],
        ug: &[Vars],
    ) -> (Vars, Vars) {
        let area = mesh.cell_area(cell);
        let mut gx = [0.0; NVARS];
        let mut gy = [0.0; NVARS];

        for face in mesh.cell_faces(cell) {
            let normal = mesh.face_normal(face);
            let length = mesh.face_length(face);
            // owner 侧法向朝外，neighbor 侧取反号
            let sign = if mesh.face_owner(face) == cell { 1.0 } else { -1.0 };
            let ds_x = sign * normal.x * length;
            let ds_y = sign * normal.y * length;

            let other: &Vars = match mesh.face_opposite(face, cell) {
                Some(neighbor) => &u[neighbor],
                None => &ug[face],
            };

            for k in 0..NVARS {
                let phi_face = 0.5 * (u[cell][k] + other[k]);
                gx[k] += ds_x * phi_face;
                gy[k] += ds_y * phi_face;
            }
        }

        for k in 0..NVARS {
            gx[k] /= area;
            gy[k] /= area;
        }
        (gx, gy)
    }
}

impl GradientMethod for GreenGaussGradient {
    fn compute_gradients(
        &self,
        mesh: &SpatialMesh,
        _geom: &GeometryCache,
        u: &[Vars],
        ug: &[Vars],
        output: &mut GradientStorage,
    ) {
        let n_cells = mesh.n_cells();
        if output.len() != n_cells {
            output.resize(n_cells);
        }

        if self.parallel && n_cells >= self.parallel_threshold {
            let grads: Vec<(Vars, Vars)> = (0..n_cells)
                .into_par_iter()
                .map(|cell| self.compute_cell_gradient(cell, mesh, u, ug))
                .collect();
            for (cell, (gx, gy)) in grads.into_iter().enumerate() {
                output.set(cell, gx, gy);
            }
        } else {
            for cell in 0..n_cells {
                let (gx, gy) = self.compute_cell_gradient(cell, mesh, u, ug);
                output.set(cell, gx, gy);
            }
        }
    }

    fn name(&self) -> &'static str {
        "Green-Gauss"
    }
}

// ============================================================
// 测试
// ============================================================
