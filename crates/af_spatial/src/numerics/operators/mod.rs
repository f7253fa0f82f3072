// crates/af_spatial/src/numerics/operators/mod.rs

//! 模型算子

mod diffusion;

pub use diffusion::ScalarDiffusion;
