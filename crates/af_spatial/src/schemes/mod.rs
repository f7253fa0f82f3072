// crates/af_spatial/src/schemes/mod.rs

//! 数值格式

pub mod riemann;

pub use riemann::{
    create_riemann_solver, FaceFlux, HllFlux, HllcFlux, LlfFlux, RiemannSolver, RoeFlux,
    VanLeerFlux,
};
