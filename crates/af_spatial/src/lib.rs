// crates/af_spatial/src/lib.rs

//! 空间离散核心
//!
//! 非结构网格上可压 Euler 方程（及标量扩散模型方程）的
//! 单元中心有限体积空间离散，供外层伪时间/Newton 迭代与
//! 外部稀疏线性求解器消费，包括：
//! - 网格适配层 (adapter) 与几何缓存 (geometry)
//! - 梯度重构与限制器 (numerics)
//! - 边界幽灵状态合成 (boundary)
//! - 数值通量格式 (schemes)
//! - 残差/雅可比组装与矩阵自由算子 (engine)
//! - 后处理诊断 (diagnostics)
//!
//! # Trait 抽象
//!
//! - [`GradientMethod`]: 梯度重构接口
//! - [`FaceLimiter`]: 面值限制接口
//! - [`RiemannSolver`]: 数值通量接口
//! - [`BlockMatrixAssembler`]: 块稀疏雅可比组装接口
//!
//! 本核心不推进时间、不解线性系统、不做网格分区或文件 I/O；
//! 每次求值是输入状态场的纯函数。

pub mod adapter;
pub mod boundary;
pub mod diagnostics;
pub mod engine;
pub mod geometry;
pub mod numerics;
pub mod physics;
pub mod schemes;
pub mod state;
pub mod types;

// 重导出常用类型
pub use adapter::SpatialMesh;
pub use boundary::{BcKind, BoundaryCondition, BoundaryTable, GhostStateSynthesizer};
pub use engine::{
    AtomicResidualAccumulator, BlockEntry, BlockMatrixAssembler, BlockTripletMatrix,
    EulerSpatial, FaceBlockJacobian, InitialField, MatrixFreeJacobian,
};
pub use geometry::{GeometryCache, NGAUSS};
pub use numerics::gradient::{
    ConstantGradient, GradientMethod, GradientStorage, GreenGaussGradient, LeastSquaresGradient,
};
pub use numerics::limiter::{
    BarthJespersen, FaceLimiter, NoLimiter, VanAlbada, Venkatakrishnan, WenoLimiter,
};
pub use numerics::operators::ScalarDiffusion;
pub use physics::{GasModel, VortexParams};
pub use schemes::riemann::{
    FaceFlux, HllFlux, HllcFlux, LlfFlux, RiemannSolver, RoeFlux, VanLeerFlux,
};
pub use state::{Block, ConservedState, Vars, NVARS};
pub use types::{
    ConfigError, FarFieldPolicy, FluxSchemeKind, FreeStreamConfig, GhostCentroidPolicy,
    GradientKind, LimiterKind, SpatialConfig,
};
