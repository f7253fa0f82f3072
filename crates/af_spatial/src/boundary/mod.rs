// crates/af_spatial/src/boundary/mod.rs

//! 边界条件
//!
//! - [`BcKind`] / [`BoundaryCondition`] / [`BoundaryTable`]: 标记映射配置
//! - [`GhostStateSynthesizer`]: 按面合成幽灵状态

mod ghost;
mod types;

pub use ghost::GhostStateSynthesizer;
pub use types::{BcKind, BoundaryCondition, BoundaryTable};
