// crates/af_spatial/src/engine/mod.rs

//! 引擎核心：残差组装、雅可比组装与矩阵自由算子

mod accumulator;
mod jacobian;
mod matrix_free;
mod residual;

pub use accumulator::AtomicResidualAccumulator;
pub use jacobian::{BlockEntry, BlockMatrixAssembler, BlockTripletMatrix, FaceBlockJacobian};
pub use matrix_free::MatrixFreeJacobian;
pub use residual::{EulerSpatial, InitialField};
