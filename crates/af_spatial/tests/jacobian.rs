// crates/af_spatial/tests/jacobian.rs

//! 守恒性与雅可比一致性端到端测试
//!
//! 周期（环面）网格没有边界面，适合两类校验：
//! - 守恒：所有内部面通量一加一减，残差总和望远镜式归零
//! - 雅可比：组装算子与矩阵自由差分乘积在方向导数意义下一致

use std::sync::Arc;

use af_mesh::PeriodicRectMeshBuilder;
use af_spatial::{
    ConservedState, EulerSpatial, FaceBlockJacobian, FluxSchemeKind, FreeStreamConfig,
    GradientKind, MatrixFreeJacobian, SpatialConfig, NVARS,
};
use glam::DVec2;

fn periodic_spatial(flux: FluxSchemeKind, nx: usize, ny: usize) -> EulerSpatial {
    let mesh = Arc::new(
        PeriodicRectMeshBuilder::new(nx, ny, nx as f64, ny as f64)
            .build()
            .unwrap(),
    );
    let mut config = SpatialConfig::new(FreeStreamConfig::new(0.5, 0.0), Vec::new());
    config.gradient = GradientKind::None;
    config.inviscid_flux = flux;
    config.jacobian_flux = flux;
    config.parallel_threshold = 1;
    EulerSpatial::new(mesh, &config).unwrap()
}

/// 亚音速光滑场
fn smooth_field(spatial: &EulerSpatial) -> Vec<ConservedState> {
    spatial
        .mesh()
        .cells()
        .map(|cell| {
            let rc = spatial.geometry().cell_centroid(cell);
            spatial.gas().conserved_from_primitive(
                1.0 + 0.06 * (0.9 * rc.x).sin() * (0.7 * rc.y).cos(),
                DVec2::new(0.35 + 0.04 * (0.8 * rc.y).sin(), 0.1 * (0.6 * rc.x).cos()),
                1.0 + 0.05 * (0.5 * (rc.x + rc.y)).sin(),
            )
        })
        .collect()
}

/// 确定性伪随机方向
fn random_direction(n_cells: usize, seed: u64, scale: f64) -> Vec<ConservedState> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((state >> 33) as f64) / (u32::MAX as f64) - 0.5
    };
    (0..n_cells)
        .map(|_| ConservedState::new(next(), next(), next(), next()) * scale)
        .collect()
}

#[test]
fn conservation_telescoping_all_schemes() {
    for scheme in [
        FluxSchemeKind::VanLeer,
        FluxSchemeKind::Roe,
        FluxSchemeKind::Hll,
        FluxSchemeKind::Hllc,
        FluxSchemeKind::Llf,
    ] {
        let spatial = periodic_spatial(scheme, 5, 4);
        let u = smooth_field(&spatial);
        let mut residual = vec![ConservedState::ZERO; spatial.n_cells()];
        spatial.compute_residual(&u, &mut residual, None);

        let mut total = ConservedState::ZERO;
        for r in &residual {
            total += *r;
        }
        for k in 0..NVARS {
            assert!(
                total.comp(k).abs() < 1e-11,
                "{:?}: 分量 {} 总和 {}",
                scheme,
                k,
                total.comp(k)
            );
        }
    }
}

#[test]
fn conservation_telescoping_second_order() {
    let mesh = Arc::new(PeriodicRectMeshBuilder::new(4, 4, 4.0, 4.0).build().unwrap());
    let mut config = SpatialConfig::new(FreeStreamConfig::new(0.5, 0.0), Vec::new());
    config.gradient = GradientKind::GreenGauss;
    config.limiter = af_spatial::LimiterKind::BarthJespersen;
    config.parallel_threshold = 1;
    let spatial = EulerSpatial::new(mesh, &config).unwrap();

    let u = smooth_field(&spatial);
    let mut residual = vec![ConservedState::ZERO; spatial.n_cells()];
    spatial.compute_residual(&u, &mut residual, None);

    let mut total = ConservedState::ZERO;
    for r in &residual {
        total += *r;
    }
    for k in 0..NVARS {
        assert!(total.comp(k).abs() < 1e-11, "分量 {} 总和 {}", k, total.comp(k));
    }
}

/// 雅可比有限差分校验：‖J·v − 矩阵自由乘积‖/‖v‖ 足够小
fn assert_jacobian_agreement(flux: FluxSchemeKind, tol: f64) {
    let spatial = periodic_spatial(flux, 4, 4);
    let u = smooth_field(&spatial);
    let n_cells = spatial.n_cells();

    let mut jac = FaceBlockJacobian::new();
    spatial.compute_jacobian(&u, &mut jac);

    let mut res_base = vec![ConservedState::ZERO; n_cells];
    spatial.compute_residual(&u, &mut res_base, None);
    let mf = MatrixFreeJacobian::new(&spatial);

    for seed in [7u64, 1234, 98765] {
        let v = random_direction(n_cells, seed, 0.1);
        let norm_v = v
            .iter()
            .map(|s| (0..NVARS).map(|k| s.comp(k) * s.comp(k)).sum::<f64>())
            .sum::<f64>()
            .sqrt();

        let mut assembled = vec![ConservedState::ZERO; n_cells];
        jac.apply(&v, &mut assembled);
        let mut product = vec![ConservedState::ZERO; n_cells];
        mf.product(&u, &res_base, &v, &mut product);

        let mut diff = 0.0f64;
        for cell in 0..n_cells {
            for k in 0..NVARS {
                diff += (assembled[cell].comp(k) - product[cell].comp(k)).powi(2);
            }
        }
        let diff = diff.sqrt() / norm_v;
        assert!(
            diff < tol,
            "{:?}: 相对偏差 {} (种子 {})",
            flux,
            diff,
            seed
        );
    }
}

#[test]
fn jacobian_matches_matrix_free_llf() {
    // LLF 的雅可比为精确导数，偏差只剩差分截断
    assert_jacobian_agreement(FluxSchemeKind::Llf, 1e-5);
}

#[test]
fn jacobian_matches_matrix_free_van_leer() {
    // Van Leer 分裂通量光滑且逐支精确求导
    assert_jacobian_agreement(FluxSchemeKind::VanLeer, 1e-5);
}

#[test]
fn jacobian_zero_direction_guard() {
    let spatial = periodic_spatial(FluxSchemeKind::Roe, 3, 3);
    let u = smooth_field(&spatial);
    let mut res = vec![ConservedState::ZERO; spatial.n_cells()];
    spatial.compute_residual(&u, &mut res, None);

    let v = vec![ConservedState::ZERO; spatial.n_cells()];
    let mut out = vec![ConservedState::new(1.0, 1.0, 1.0, 1.0); spatial.n_cells()];
    MatrixFreeJacobian::new(&spatial).product(&u, &res, &v, &mut out);
    for o in &out {
        assert_eq!(*o, ConservedState::ZERO);
    }
}

#[test]
fn frozen_jacobian_still_consistent_direction() {
    // Roe/HLL/HLLC 的冻结雅可比并非精确导数，但对光滑小扰动
    // 应与矩阵自由乘积同量级同方向（非精确 Newton 的工作前提）
    for flux in [FluxSchemeKind::Roe, FluxSchemeKind::Hll, FluxSchemeKind::Hllc] {
        let spatial = periodic_spatial(flux, 4, 3);
        let u = smooth_field(&spatial);
        let n_cells = spatial.n_cells();

        let mut jac = FaceBlockJacobian::new();
        spatial.compute_jacobian(&u, &mut jac);
        let mut res_base = vec![ConservedState::ZERO; n_cells];
        spatial.compute_residual(&u, &mut res_base, None);

        let v = random_direction(n_cells, 31, 0.05);
        let mut assembled = vec![ConservedState::ZERO; n_cells];
        jac.apply(&v, &mut assembled);
        let mut product = vec![ConservedState::ZERO; n_cells];
        MatrixFreeJacobian::new(&spatial).product(&u, &res_base, &v, &mut product);

        let dot: f64 = (0..n_cells)
            .map(|c| (0..NVARS).map(|k| assembled[c].comp(k) * product[c].comp(k)).sum::<f64>())
            .sum();
        let na: f64 = (0..n_cells)
            .map(|c| (0..NVARS).map(|k| assembled[c].comp(k).powi(2)).sum::<f64>())
            .sum::<f64>()
            .sqrt();
        let np: f64 = (0..n_cells)
            .map(|c| (0..NVARS).map(|k| product[c].comp(k).powi(2)).sum::<f64>())
            .sum::<f64>()
            .sqrt();

        let cosine = dot / (na * np);
        assert!(cosine > 0.95, "{:?}: 方向余弦 {}", flux, cosine);
        let ratio = na / np;
        assert!(ratio > 0.5 && ratio < 2.0, "{:?}: 范数比 {}", flux, ratio);
    }
}
