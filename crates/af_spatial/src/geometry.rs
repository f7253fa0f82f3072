// crates/af_spatial/src/geometry.rs

//! 几何缓存
//!
//! 构造时一次算好、此后只读的派生几何量：
//! - 实单元形心（节点坐标平均）
//! - 边界幽灵单元形心（按 [`GhostCentroidPolicy`] 反射）
//! - 每面等距 Gauss 积分点
//!
//! 退化面由网格组装阶段拒绝，本模块不再检查。

use glam::DVec2;

use crate::adapter::SpatialMesh;
use crate::types::GhostCentroidPolicy;

/// 每面 Gauss 积分点数
pub const NGAUSS: usize = 1;

/// 几何缓存
#[derive(Debug, Clone)]
pub struct GeometryCache {
    /// 实单元形心
    cell_centroid: Vec<DVec2>,
    /// 边界幽灵单元形心 (按边界面索引)
    ghost_centroid: Vec<DVec2>,
    /// 每面 Gauss 点
    gauss_points: Vec<[DVec2; NGAUSS]>,
    /// 生效的幽灵形心策略
    policy: GhostCentroidPolicy,
}

impl GeometryCache {
    /// 由网格构建几何缓存
    pub fn new(mesh: &SpatialMesh, policy: GhostCentroidPolicy) -> Self {
        let cell_centroid: Vec<DVec2> = mesh
            .cells()
            .map(|cell| {
                let mut acc = DVec2::ZERO;
                let mut count = 0usize;
                for node in mesh.cell_nodes(cell) {
                    acc += mesh.node_xy(node);
                    count += 1;
                }
                acc / count as f64
            })
            .collect();

        let ghost_centroid: Vec<DVec2> = mesh
            .boundary_faces()
            .map(|face| {
                let rc = cell_centroid[mesh.face_owner(face)];
                match policy {
                    GhostCentroidPolicy::MidpointReflection => {
                        2.0 * mesh.face_midpoint(face) - rc
                    }
                    GhostCentroidPolicy::FaceReflection => {
                        // 形心向面所在直线投影后反射
                        let (p1, p2) = mesh.face_endpoints(face);
                        let t = (p2 - p1).normalize();
                        let foot = p1 + t * (rc - p1).dot(t);
                        2.0 * foot - rc
                    }
                }
            })
            .collect();

        // Gauss 点沿面均匀分布: s = (ig+1)/(NGAUSS+1)
        let gauss_points: Vec<[DVec2; NGAUSS]> = mesh
            .faces()
            .map(|face| {
                let (p1, p2) = mesh.face_endpoints(face);
                std::array::from_fn(|ig| {
                    let s = (ig + 1) as f64 / (NGAUSS + 1) as f64;
                    p1 + s * (p2 - p1)
                })
            })
            .collect();

        Self {
            cell_centroid,
            ghost_centroid,
            gauss_points,
            policy,
        }
    }

    /// 单元形心
    #[inline]
    pub fn cell_centroid(&self, cell: usize) -> DVec2 {
        self.cell_centroid[cell]
    }

    /// 边界幽灵形心（按边界面索引，面须位于边界块内）
    #[inline]
    pub fn ghost_centroid(&self, bface: usize) -> DVec2 {
        self.ghost_centroid[bface]
    }

    /// 面 Gauss 点
    #[inline]
    pub fn gauss_points(&self, face: usize) -> &[DVec2; NGAUSS] {
        &self.gauss_points[face]
    }

    /// 生效的幽灵形心策略
    #[inline]
    pub fn policy(&self) -> GhostCentroidPolicy {
        self.policy
    }
}

// ============================================================
// 测试
// ============================================================
