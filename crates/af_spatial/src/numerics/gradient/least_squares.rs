// crates/af_spatial/src/numerics/gradient/least_squares.rs

//! 加权最小二乘梯度计算
//!
//! 通过最小化加权最小二乘误差来计算梯度:
//! min Σ w_j (φ_j - φ_i - ∇φ_i · r_ij)²
//!
//! 权取邻居距离平方的倒数。对 2D 情况求解 2×2 法方程：
//! [a11 a12] [∂φ/∂x]   [b1]
//! [a12 a22] [∂φ/∂y] = [b2]
//!
//! 边界面以幽灵形心处的幽灵平均作为邻居参与。
//! 法方程接近奇异（邻居近共线）时回退为零梯度并记录警告，
//! 该回退行为是文档化且被测试覆盖的策略。

use rayon::prelude::*;

use super::traits::{GradientMethod, GradientStorage};
use crate::adapter::SpatialMesh;
use crate::geometry::GeometryCache;
use crate::state::{Vars, NVARS};

/// 加权最小二乘梯度计算器
#[derive(Debug, Clone)]
pub struct LeastSquaresGradient {
    /// 行列式奇异判据
    det_min: f64,
    /// 是否启用并行
    parallel: bool,
    /// 并行阈值
    parallel_threshold: usize,
}

impl Default for LeastSquaresGradient {
    fn default() -> Self {
        Self {
            det_min: 1e-12,
            parallel: true,
            parallel_threshold: 1000,
        }
    }
}

impl LeastSquaresGradient {
    /// 创建新实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置奇异判据
    pub fn with_det_min(mut self, det_min: f64) -> Self {
        self.det_min = det_min;
        self
    }

    /// 设置并行开关与阈值
    pub fn with_parallel(mut self, parallel: bool, threshold: usize) -> Self {
        self.parallel = parallel;
        self.parallel_threshold = threshold;
        self
    }

    /// 计算单个单元的梯度；法方程奇异时返回零梯度
    fn compute_cell_gradient(
        &self,
        cell: usize,
        mesh: &SpatialMesh,
        geom: &GeometryCache,
        u: &[Vars],
        ug: &[Vars],
    ) -> (Vars, Vars) {
        let rc = geom.cell_centroid(cell);
        let mut a11 = 0.0;
        let mut a12 = 0.0;
        let mut a22 = 0.0;
        let mut b1 = [0.0; NVARS];
        let mut b2 = [0.0; NVARS];

        for face in mesh.cell_faces(cell) {
            let (other_centroid, other_value) = match mesh.face_opposite(face, cell) {
                Some(neighbor) => (geom.cell_centroid(neighbor), &u[neighbor]),
                None => (geom.ghost_centroid(face), &ug[face]),
            };

            let dx = other_centroid.x - rc.x;
            let dy = other_centroid.y - rc.y;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq < 1e-20 {
                continue;
            }

            // 距离平方反比加权
            let w = 1.0 / dist_sq;
            a11 += w * dx * dx;
            a12 += w * dx * dy;
            a22 += w * dy * dy;
            for k in 0..NVARS {
                let dphi = other_value[k] - u[cell][k];
                b1[k] += w * dx * dphi;
                b2[k] += w * dy * dphi;
            }
        }

        let det = a11 * a22 - a12 * a12;
        if det.abs() < self.det_min {
            // 邻居近共线：回退零梯度（该单元退化为一阶）
            log::warn!("单元 {} 最小二乘法方程接近奇异 (det = {:.3e})，回退零梯度", cell, det);
            return ([0.0; NVARS], [0.0; NVARS]);
        }

        let inv = 1.0 / det;
        let mut gx = [0.0; NVARS];
        let mut gy = [0.0; NVARS];
        for k in 0..NVARS {
            let x1 = (a22 * b1[k] - a12 * b2[k]) * inv;
            let x2 = (a11 * b2[k] - a12 * b1[k]) * inv;
            if x1.is_finite() && x2.is_finite() {
                gx[k] = x1;
                gy[k] = x2;
            }
        }
        (gx, gy)
    }
}

impl GradientMethod for LeastSquaresGradient {
    fn compute_gradients(
        &self,
        mesh: &SpatialMesh,
        geom: &GeometryCache,
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
                .map(|cell| self.compute_cell_gradient(cell, mesh, geom, u, ug))
                .collect();
            for (cell, (gx, gy)) in grads.into_iter().enumerate() {
                output.set(cell, gx, gy);
            }
        } else {
            for cell in 0..n_cells {
                let (gx, gy) = self.compute_cell_gradient(cell, mesh, geom, u, ug);
                output.set(cell, gx, gy);
            }
        }
    }

    fn name(&self) -> &'static str {
        "Weighted-Least-Squares"
    }
}

// ============================================================
// 测试
// ============================================================
