// crates/af_mesh/src/error.rs

//! 网格契约错误类型

use thiserror::Error;

/// 网格组装/校验错误
///
/// `FlowMesh::assemble` 在构建时即拒绝违反契约的输入，
/// 下游数值组件因此无需再做防御性检查。
#[derive(Debug, Clone, Error)]
pub enum MeshError {
    /// 退化面（长度低于容差）
    #[error("退化面 {face}: 面长度 {length:.3e} 低于容差")]
    DegenerateFace {
        /// 面索引
        face: usize,
        /// 实测长度
        length: f64,
    },

    /// 非正单元面积
    #[error("单元 {cell} 面积非正: {area:.3e}")]
    NonPositiveArea {
        /// 单元索引
        cell: usize,
        /// 实测面积
        area: f64,
    },

    /// 索引越界
    #[error("{context}: 索引 {index} 超出范围 (上限 {limit})")]
    IndexOutOfRange {
        /// 出错的数组说明
        context: &'static str,
        /// 越界索引
        index: usize,
        /// 合法上限（不含）
        limit: usize,
    },

    /// 数组长度不一致
    #[error("{context}: 期望长度 {expected}, 实际 {actual}")]
    LengthMismatch {
        /// 出错的数组说明
        context: &'static str,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 违反边界面在前的排序不变量
    #[error("面 {face} 违反边界面在前排序: 边界块内出现内部面或反之")]
    BoundaryOrdering {
        /// 违例面索引
        face: usize,
    },

    /// 法向量长度异常（无法归一化）
    #[error("面 {face} 法向量长度 {length:.3e} 无法归一化")]
    InvalidNormal {
        /// 面索引
        face: usize,
        /// 法向量模长
        length: f64,
    },
}
