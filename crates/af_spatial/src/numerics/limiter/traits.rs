// crates/af_spatial/src/numerics/limiter/traits.rs

//! 限制器 trait 与公共辅助
//!
//! 限制器把单元平均 + 梯度转化为每个面两侧的外推状态
//! (uleft, uright)，在 Gauss 点取值：
//!
//! ```text
//! q_face = q_cell + α · (∇q · r)
//! ```
//!
//! 其中 r 是单元形心到 Gauss 点的向量，α ∈ [0, 1] 为限制因子。
//! 边界面只写 uleft；uright 由边界状态合成器随后覆盖。
//! 边界面的幽灵平均以邻居身份参与极值与限制因子的计算。

use rayon::prelude::*;

use crate::adapter::SpatialMesh;
use crate::geometry::GeometryCache;
use crate::numerics::gradient::GradientStorage;
use crate::state::{Vars, NVARS};

/// 梯度限制器 trait
///
/// 对全部面计算左右外推状态。实现必须满足：
/// 局部单调的线性场退化为未限制的线性外推。
pub trait FaceLimiter: Send + Sync {
    /// 计算所有面的左右面值
    ///
    /// # 参数
    /// - `u`: 单元平均（按单元索引）
    /// - `ug`: 幽灵平均（按面索引，仅边界块有效）
    /// - `grad`: 单元梯度
    /// - `uleft`/`uright`: 输出面值（长度为面总数）
    #[allow(clippy::too_many_arguments)]
    fn compute_face_values(
        &self,
        mesh: &SpatialMesh,
        geom: &GeometryCache,
        u: &[Vars],
        ug: &[Vars],
        grad: &GradientStorage,
        uleft: &mut [Vars],
        uright: &mut [Vars],
    );

    /// 限制器名称
    fn name(&self) -> &'static str;
}

/// 单元及其面邻居（含幽灵）的逐分量极值
pub(crate) fn neighbor_extrema(
    mesh: &SpatialMesh,
    u: &[Vars],
    ug: &[Vars],
    cell: usize,
) -> (Vars, Vars) {
    let mut umin = u[cell];
    let mut umax = u[cell];
    for face in mesh.cell_faces(cell) {
        let other: &Vars = match mesh.face_opposite(face, cell) {
            Some(neighbor) => &u[neighbor],
            None => &ug[face],
        };
        for k in 0..NVARS {
            umin[k] = umin[k].min(other[k]);
            umax[k] = umax[k].max(other[k]);
        }
    }
    (umin, umax)
}

/// 按单元限制因子做线性外推，写出全部面值
///
/// `alpha` 为每单元每分量的限制因子；边界面只写 uleft。
pub(crate) fn extrapolate_with_factors(
    mesh: &SpatialMesh,
    geom: &GeometryCache,
    u: &[Vars],
    grad: &GradientStorage,
    alpha: &[Vars],
    uleft: &mut [Vars],
    uright: &mut [Vars],
) {
    let nb = mesh.n_boundary_faces();

    uleft.par_iter_mut().enumerate().for_each(|(face, ul)| {
        let owner = mesh.face_owner(face);
        *ul = extrapolate_cell(geom, u, grad, alpha, owner, face);
    });

    uright[nb..].par_iter_mut().enumerate().for_each(|(i, ur)| {
        let face = nb + i;
        // 内部面必有 neighbor
        let neighbor = mesh.face_neighbor(face).expect("内部面缺少 neighbor");
        *ur = extrapolate_cell(geom, u, grad, alpha, neighbor, face);
    });
}

/// 单侧外推到面 Gauss 点
#[inline]
pub(crate) fn extrapolate_cell(
    geom: &GeometryCache,
    u: &[Vars],
    grad: &GradientStorage,
    alpha: &[Vars],
    cell: usize,
    face: usize,
) -> Vars {
    let rc = geom.cell_centroid(cell);
    let gp = geom.gauss_points(face)[0];
    let (dx, dy) = (gp.x - rc.x, gp.y - rc.y);
    let mut out = u[cell];
    for k in 0..NVARS {
        out[k] += alpha[cell][k] * grad.directional(cell, k, dx, dy);
    }
    out
}

// ============================================================
// 测试
// ============================================================
