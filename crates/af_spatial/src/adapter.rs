// crates/af_spatial/src/adapter.rs

//! 网格适配层
//!
//! 将 [`af_mesh::FlowMesh`] 适配为空间离散所需的只读接口。
//!
//! # 设计原则
//!
//! 1. **零拷贝**: `Arc` 共享冻结网格，不复制数据
//! 2. **索引转换**: 统一 `u32`/`usize`，边界哨兵转 `Option`
//! 3. **面排序**: 边界块 `[0, n_boundary_faces)` 在前，
//!    由 `FlowMesh::assemble` 保证，本层直接依赖

use std::sync::Arc;

use af_mesh::{FlowMesh, INVALID_CELL};
use glam::DVec2;

/// 空间离散网格视图
///
/// 包装冻结网格，供残差/雅可比组装与重构、限制器查询。
/// 可安全地在并行求值间共享。
#[derive(Debug, Clone)]
pub struct SpatialMesh {
    inner: Arc<FlowMesh>,
}

impl SpatialMesh {
    /// 从共享冻结网格创建
    pub fn new(inner: Arc<FlowMesh>) -> Self {
        Self { inner }
    }

    /// 内部冻结网格
    pub fn inner(&self) -> &FlowMesh {
        &self.inner
    }

    // =========================================================
    // 基本统计
    // =========================================================

    /// 节点数量
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.inner.n_nodes
    }

    /// 单元数量
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.inner.n_cells
    }

    /// 面总数
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.inner.n_faces
    }

    /// 边界面数量
    #[inline]
    pub fn n_boundary_faces(&self) -> usize {
        self.inner.n_boundary_faces
    }

    /// 内部面数量
    #[inline]
    pub fn n_interior_faces(&self) -> usize {
        self.inner.n_interior_faces()
    }

    // =========================================================
    // 范围迭代
    // =========================================================

    /// 边界面索引范围 `[0, n_boundary_faces)`
    #[inline]
    pub fn boundary_faces(&self) -> std::ops::Range<usize> {
        0..self.inner.n_boundary_faces
    }

    /// 内部面索引范围 `[n_boundary_faces, n_faces)`
    #[inline]
    pub fn interior_faces(&self) -> std::ops::Range<usize> {
        self.inner.n_boundary_faces..self.inner.n_faces
    }

    /// 单元索引范围
    #[inline]
    pub fn cells(&self) -> std::ops::Range<usize> {
        0..self.inner.n_cells
    }

    /// 面索引范围
    #[inline]
    pub fn faces(&self) -> std::ops::Range<usize> {
        0..self.inner.n_faces
    }

    // =========================================================
    // 面访问
    // =========================================================

    /// 面 owner 单元
    #[inline]
    pub fn face_owner(&self, face: usize) -> usize {
        self.inner.face_owner[face] as usize
    }

    /// 面 neighbor 单元（边界面为 None）
    #[inline]
    pub fn face_neighbor(&self, face: usize) -> Option<usize> {
        let n = self.inner.face_neighbor[face];
        if n == INVALID_CELL {
            None
        } else {
            Some(n as usize)
        }
    }

    /// 是否边界面
    #[inline]
    pub fn is_boundary_face(&self, face: usize) -> bool {
        face < self.inner.n_boundary_faces
    }

    /// 面单位法向量（owner 指向 neighbor/域外）
    #[inline]
    pub fn face_normal(&self, face: usize) -> DVec2 {
        self.inner.face_normal[face]
    }

    /// 面长度
    #[inline]
    pub fn face_length(&self, face: usize) -> f64 {
        self.inner.face_length[face]
    }

    /// 面边界标记（内部面为 -1）
    #[inline]
    pub fn face_marker(&self, face: usize) -> i32 {
        self.inner.face_marker[face]
    }

    /// 面中点
    #[inline]
    pub fn face_midpoint(&self, face: usize) -> DVec2 {
        self.inner.face_midpoint(face)
    }

    /// 面两端节点坐标
    #[inline]
    pub fn face_endpoints(&self, face: usize) -> (DVec2, DVec2) {
        let [a, b] = self.inner.face_nodes[face];
        (self.inner.node_xy[a as usize], self.inner.node_xy[b as usize])
    }

    // =========================================================
    // 单元访问
    // =========================================================

    /// 单元面积
    #[inline]
    pub fn cell_area(&self, cell: usize) -> f64 {
        self.inner.cell_area[cell]
    }

    /// 单元的关联面
    #[inline]
    pub fn cell_faces(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        self.inner.cell_faces(cell).iter().map(|&f| f as usize)
    }

    /// 单元的节点
    #[inline]
    pub fn cell_nodes(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        self.inner.cell_nodes(cell).iter().map(|&n| n as usize)
    }

    /// 节点坐标
    #[inline]
    pub fn node_xy(&self, node: usize) -> DVec2 {
        self.inner.node_xy[node]
    }

    /// 面的对侧单元（给定一侧，求另一侧；边界面返回 None）
    #[inline]
    pub fn face_opposite(&self, face: usize, cell: usize) -> Option<usize> {
        let owner = self.face_owner(face);
        if owner == cell {
            self.face_neighbor(face)
        } else {
            Some(owner)
        }
    }
}

// ============================================================
// 测试
// ============================================================
