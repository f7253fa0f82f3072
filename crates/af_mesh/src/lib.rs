// crates/af_mesh/src/lib.rs

//! 网格协作方接口
//!
//! 空间离散核心以只读方式查询网格，本 crate 提供：
//! - [`FlowMesh`]: 冻结的 SoA 网格结构（单元、面、节点及其邻接关系）
//! - [`RawMesh`]: 组装 `FlowMesh` 的原始数组输入
//! - [`generation`]: 测试与验证用的简单结构化网格生成器
//!
//! 网格的拓扑构建与文件读写不在本 crate 范围内；`FlowMesh` 即
//! 求解器与网格之间的全部契约。
//!
//! # 面排序不变量
//!
//! 面数组分为两段：边界面块 `[0, n_boundary_faces)` 在前，
//! 内部面块 `[n_boundary_faces, n_faces)` 在后。
//! 所有下游组件都依赖这一排序。

pub mod error;
pub mod frozen;
pub mod generation;

pub use error::MeshError;
pub use frozen::{FlowMesh, RawMesh, INVALID_CELL};
pub use generation::{AnnulusMeshBuilder, PeriodicRectMeshBuilder, RectMarkers, RectMeshBuilder};
