// crates/af_mesh/src/frozen.rs

//! 冻结网格
//!
//! 只读 SoA 布局的非结构网格，组装后不可修改。
//!
//! # 设计要点
//!
//! 1. **SoA 布局**: 面/单元数据按数组存放，利于缓存与并行遍历
//! 2. **只读**: `assemble` 之后所有字段视为冻结
//! 3. **边界面在前**: 面数组先边界块后内部块，排序在组装时校验
//! 4. **邻接派生**: 单元→面邻接由 owner/neighbor 数组在组装时推出

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// 无效单元哨兵值（`face_neighbor` 中表示边界面）
pub const INVALID_CELL: u32 = u32::MAX;

/// 面长度容差，低于该值视为退化面
const LENGTH_TOL: f64 = 1e-14;

/// 组装 [`FlowMesh`] 的原始数组
///
/// 由网格生成器或外部转换器填充，经 [`FlowMesh::assemble`] 校验后冻结。
#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    /// 节点坐标
    pub node_xy: Vec<DVec2>,
    /// 单元节点索引 (压缩格式: offsets)
    pub cell_node_offsets: Vec<usize>,
    /// 单元节点索引列表
    pub cell_node_indices: Vec<u32>,
    /// 单元面积
    pub cell_area: Vec<f64>,
    /// 面两端节点
    pub face_nodes: Vec<[u32; 2]>,
    /// 面 owner 单元
    pub face_owner: Vec<u32>,
    /// 面 neighbor 单元 (INVALID_CELL 表示边界面)
    pub face_neighbor: Vec<u32>,
    /// 面单位法向量（由 owner 指向 neighbor / 域外）
    pub face_normal: Vec<DVec2>,
    /// 面长度
    pub face_length: Vec<f64>,
    /// 面边界标记 (内部面为 -1)
    pub face_marker: Vec<i32>,
    /// 边界面数量（边界块 `[0, n_boundary_faces)` 在前）
    pub n_boundary_faces: usize,
}

/// 冻结网格
///
/// 空间离散核心消费的只读网格结构。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowMesh {
    /// 节点数量
    pub n_nodes: usize,
    /// 节点坐标
    pub node_xy: Vec<DVec2>,

    /// 单元数量
    pub n_cells: usize,
    /// 单元面积
    pub cell_area: Vec<f64>,
    /// 单元节点索引 (压缩格式)
    pub cell_node_offsets: Vec<usize>,
    /// 单元节点索引列表
    pub cell_node_indices: Vec<u32>,
    /// 单元面索引 (压缩格式，组装时派生)
    pub cell_face_offsets: Vec<usize>,
    /// 单元面索引列表
    pub cell_face_indices: Vec<u32>,

    /// 面总数
    pub n_faces: usize,
    /// 边界面数量
    pub n_boundary_faces: usize,
    /// 面两端节点
    pub face_nodes: Vec<[u32; 2]>,
    /// 面 owner 单元
    pub face_owner: Vec<u32>,
    /// 面 neighbor 单元 (INVALID_CELL 表示边界面)
    pub face_neighbor: Vec<u32>,
    /// 面单位法向量
    pub face_normal: Vec<DVec2>,
    /// 面长度
    pub face_length: Vec<f64>,
    /// 面边界标记 (内部面为 -1)
    pub face_marker: Vec<i32>,
}

impl FlowMesh {
    /// 由原始数组组装冻结网格
    ///
    /// 校验网格契约并派生单元→面邻接：
    /// - 数组长度互相一致
    /// - 所有索引在范围内
    /// - 边界面块在前（`face_neighbor` 哨兵与 `n_boundary_faces` 一致）
    /// - 面长度为正（退化面在此拒绝，而非下游）
    /// - 单元面积为正
    /// - 法向量归一化（偏差超出容差则报错）
    pub fn assemble(raw: RawMesh) -> Result<Self, MeshError> {
        let n_nodes = raw.node_xy.len();
        let n_cells = raw.cell_area.len();
        let n_faces = raw.face_owner.len();

        check_len("cell_node_offsets", raw.cell_node_offsets.len(), n_cells + 1)?;
        check_len("face_nodes", raw.face_nodes.len(), n_faces)?;
        check_len("face_neighbor", raw.face_neighbor.len(), n_faces)?;
        check_len("face_normal", raw.face_normal.len(), n_faces)?;
        check_len("face_length", raw.face_length.len(), n_faces)?;
        check_len("face_marker", raw.face_marker.len(), n_faces)?;

        for (cell, &area) in raw.cell_area.iter().enumerate() {
            if !(area > 0.0) || !area.is_finite() {
                return Err(MeshError::NonPositiveArea { cell, area });
            }
        }

        for (i, &node) in raw.cell_node_indices.iter().enumerate() {
            if node as usize >= n_nodes {
                return Err(MeshError::IndexOutOfRange {
                    context: "cell_node_indices",
                    index: i,
                    limit: n_nodes,
                });
            }
        }

        let mut face_normal = raw.face_normal;
        for face in 0..n_faces {
            let owner = raw.face_owner[face] as usize;
            if owner >= n_cells {
                return Err(MeshError::IndexOutOfRange {
                    context: "face_owner",
                    index: face,
                    limit: n_cells,
                });
            }
            let neighbor = raw.face_neighbor[face];
            if neighbor != INVALID_CELL && neighbor as usize >= n_cells {
                return Err(MeshError::IndexOutOfRange {
                    context: "face_neighbor",
                    index: face,
                    limit: n_cells,
                });
            }

            // 边界面在前的排序不变量
            let is_boundary = neighbor == INVALID_CELL;
            if is_boundary != (face < raw.n_boundary_faces) {
                return Err(MeshError::BoundaryOrdering { face });
            }

            let length = raw.face_length[face];
            if !(length > LENGTH_TOL) || !length.is_finite() {
                return Err(MeshError::DegenerateFace { face, length });
            }

            let nlen = face_normal[face].length();
            if !((nlen - 1.0).abs() < 1e-8) {
                if nlen < LENGTH_TOL || !nlen.is_finite() {
                    return Err(MeshError::InvalidNormal { face, length: nlen });
                }
                face_normal[face] /= nlen;
            }

            for &node in &raw.face_nodes[face] {
                if node as usize >= n_nodes {
                    return Err(MeshError::IndexOutOfRange {
                        context: "face_nodes",
                        index: face,
                        limit: n_nodes,
                    });
                }
            }
        }

        // 派生单元→面邻接 (两遍计数法)
        let mut counts = vec![0usize; n_cells];
        for face in 0..n_faces {
            counts[raw.face_owner[face] as usize] += 1;
            let neighbor = raw.face_neighbor[face];
            if neighbor != INVALID_CELL {
                counts[neighbor as usize] += 1;
            }
        }
        let mut cell_face_offsets = vec![0usize; n_cells + 1];
        for cell in 0..n_cells {
            cell_face_offsets[cell + 1] = cell_face_offsets[cell] + counts[cell];
        }
        let mut cell_face_indices = vec![0u32; cell_face_offsets[n_cells]];
        let mut cursor = cell_face_offsets.clone();
        for face in 0..n_faces {
            let owner = raw.face_owner[face] as usize;
            cell_face_indices[cursor[owner]] = face as u32;
            cursor[owner] += 1;
            let neighbor = raw.face_neighbor[face];
            if neighbor != INVALID_CELL {
                cell_face_indices[cursor[neighbor as usize]] = face as u32;
                cursor[neighbor as usize] += 1;
            }
        }

        Ok(Self {
            n_nodes,
            node_xy: raw.node_xy,
            n_cells,
            cell_area: raw.cell_area,
            cell_node_offsets: raw.cell_node_offsets,
            cell_node_indices: raw.cell_node_indices,
            cell_face_offsets,
            cell_face_indices,
            n_faces,
            n_boundary_faces: raw.n_boundary_faces,
            face_nodes: raw.face_nodes,
            face_owner: raw.face_owner,
            face_neighbor: raw.face_neighbor,
            face_normal,
            face_length: raw.face_length,
            face_marker: raw.face_marker,
        })
    }

    /// 单元的节点索引
    #[inline]
    pub fn cell_nodes(&self, cell: usize) -> &[u32] {
        &self.cell_node_indices[self.cell_node_offsets[cell]..self.cell_node_offsets[cell + 1]]
    }

    /// 单元的关联面索引
    #[inline]
    pub fn cell_faces(&self, cell: usize) -> &[u32] {
        &self.cell_face_indices[self.cell_face_offsets[cell]..self.cell_face_offsets[cell + 1]]
    }

    /// 面中点（两端节点平均）
    #[inline]
    pub fn face_midpoint(&self, face: usize) -> DVec2 {
        let [a, b] = self.face_nodes[face];
        0.5 * (self.node_xy[a as usize] + self.node_xy[b as usize])
    }

    /// 内部面数量
    #[inline]
    pub fn n_interior_faces(&self) -> usize {
        self.n_faces - self.n_boundary_faces
    }
}

fn check_len(context: &'static str, actual: usize, expected: usize) -> Result<(), MeshError> {
    if actual != expected {
        return Err(MeshError::LengthMismatch {
            context,
            expected,
            actual,
        });
    }
    Ok(())
}

// ============================================================
// 测试
// ============================================================
