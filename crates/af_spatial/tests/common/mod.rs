// crates/af_spatial/tests/common/mod.rs

//! 集成测试公共设施
//!
//! 网格/配置装配与一个极简的显式伪时间推进器。
//! 推进器扮演外层求解器协作方的角色，仅测试使用。

#![allow(dead_code)]

use std::sync::Arc;

use af_mesh::{AnnulusMeshBuilder, FlowMesh, RectMarkers, RectMeshBuilder};
use af_spatial::{
    BcKind, BoundaryCondition, ConservedState, EulerSpatial, FreeStreamConfig, SpatialConfig,
    NVARS,
};

/// 上下滑移壁、左右远场的通道网格
pub fn channel_mesh(nx: usize, ny: usize) -> Arc<FlowMesh> {
    Arc::new(
        RectMeshBuilder::new(nx, ny, 2.0, 1.0)
            .with_markers(RectMarkers {
                left: 4,
                right: 4,
                bottom: 2,
                top: 2,
            })
            .build()
            .unwrap(),
    )
}

/// 通道算例配置（马赫 0.5，零攻角）
pub fn channel_config() -> SpatialConfig {
    let mut config = SpatialConfig::new(
        FreeStreamConfig::new(0.5, 0.0),
        vec![
            BoundaryCondition::new(2, BcKind::SlipWall),
            BoundaryCondition::new(4, BcKind::FarField),
        ],
    );
    config.parallel_threshold = 1;
    config
}

/// 全远场的矩形网格与配置（攻角非零的来流保持用）
pub fn farfield_box(nx: usize, ny: usize, alpha: f64) -> (Arc<FlowMesh>, SpatialConfig) {
    let mesh = Arc::new(
        RectMeshBuilder::new(nx, ny, 1.0, 1.0)
            .with_markers(RectMarkers {
                left: 4,
                right: 4,
                bottom: 4,
                top: 4,
            })
            .build()
            .unwrap(),
    );
    let mut config = SpatialConfig::new(
        FreeStreamConfig::new(0.5, alpha),
        vec![BoundaryCondition::new(4, BcKind::FarField)],
    );
    config.parallel_threshold = 1;
    (mesh, config)
}

/// 超音速涡算例：四分之一圆环网格与配置
///
/// 内外弧滑移壁，θ=π/2 边解析入流，θ=0 边外推出流。
/// 来流取马赫 1，使 s∞ = 1/γ 恰为涡旋的精确熵，
/// 熵误差即离散误差。
pub fn vortex_case(nr: usize, nt: usize) -> (Arc<FlowMesh>, SpatialConfig) {
    let mesh = Arc::new(
        AnnulusMeshBuilder::new(nr, nt, 1.0, 1.384)
            .with_markers(2, 2, 10, 5)
            .build()
            .unwrap(),
    );
    let mut config = SpatialConfig::new(
        FreeStreamConfig::new(1.0, 0.0),
        vec![
            BoundaryCondition::new(2, BcKind::SlipWall),
            BoundaryCondition::new(5, BcKind::Extrapolation),
            BoundaryCondition::new(10, BcKind::SupersonicVortexInflow),
        ],
    );
    config.parallel_threshold = 1;
    (mesh, config)
}

/// 残差场的 L2 范数
pub fn residual_norm(residual: &[ConservedState]) -> f64 {
    residual
        .iter()
        .map(|r| (0..NVARS).map(|k| r.comp(k) * r.comp(k)).sum::<f64>())
        .sum::<f64>()
        .sqrt()
}

/// SSP-RK2 显式伪时间推进到（相对）稳态
///
/// du/dt = -R(u)/A，局部时间步。返回 (最终残差范数, 用掉的迭代数)。
pub fn pseudo_time_march(
    spatial: &EulerSpatial,
    u: &mut [ConservedState],
    cfl: f64,
    max_iters: usize,
    rel_tol: f64,
) -> (f64, usize) {
    let n = spatial.n_cells();
    let mut residual = vec![ConservedState::ZERO; n];
    let mut dtm = vec![0.0; n];
    let mut stage = vec![ConservedState::ZERO; n];
    let mut initial_norm = None;
    let mut norm = f64::INFINITY;

    for iter in 0..max_iters {
        spatial.compute_residual(u, &mut residual, Some(&mut dtm));
        norm = residual_norm(&residual);
        let init = *initial_norm.get_or_insert(norm.max(1e-300));
        if norm <= rel_tol * init {
            return (norm, iter);
        }

        // 第一阶段
        for cell in 0..n {
            let scale = cfl * dtm[cell] / spatial.mesh().cell_area(cell);
            stage[cell] = u[cell] - residual[cell] * scale;
        }
        // 第二阶段
        spatial.compute_residual(&stage, &mut residual, None);
        for cell in 0..n {
            let scale = cfl * dtm[cell] / spatial.mesh().cell_area(cell);
            u[cell] = (u[cell] + stage[cell] - residual[cell] * scale) * 0.5;
        }
    }
    (norm, max_iters)
}
