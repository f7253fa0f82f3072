// crates/af_spatial/tests/vortex.rs

//! 超音速涡制造解端到端测试
//!
//! Krivodonova-Berger 四分之一圆环算例：解析入流 + 滑移壁 + 外推出流，
//! 以显式伪时间推进到稳态后测熵误差。熵误差应随网格加密下降，
//! 且二阶重构比一阶更准。

mod common;

use af_spatial::{
    diagnostics, ConservedState, EulerSpatial, FluxSchemeKind, GradientKind, InitialField,
    LimiterKind,
};
use common::{pseudo_time_march, vortex_case};

fn converge_and_measure(nr: usize, nt: usize, second_order: bool) -> f64 {
    let (mesh, mut config) = vortex_case(nr, nt);
    config.inviscid_flux = FluxSchemeKind::Roe;
    if second_order {
        config.gradient = GradientKind::GreenGauss;
        config.limiter = LimiterKind::Venkatakrishnan;
        config.venkat_k = 2.0;
    } else {
        config.gradient = GradientKind::None;
    }
    let spatial = EulerSpatial::new(mesh, &config).unwrap();

    let mut u = vec![ConservedState::ZERO; spatial.n_cells()];
    spatial.initialize_unknowns(InitialField::SupersonicVortex, &mut u);

    let cfl = if second_order { 0.3 } else { 0.4 };
    let (final_norm, _iters) = pseudo_time_march(&spatial, &mut u, cfl, 8000, 1e-6);
    assert!(final_norm.is_finite(), "伪时间推进发散");
    for s in &u {
        assert!(s.is_physical(), "推进产生非物理状态");
    }

    diagnostics::entropy_error(
        spatial.mesh(),
        spatial.gas(),
        &spatial.free_stream(),
        &u,
    )
}

#[test]
fn entropy_error_decreases_under_refinement_first_order() {
    let coarse = converge_and_measure(4, 8, false);
    let fine = converge_and_measure(8, 16, false);

    assert!(coarse > 0.0 && fine > 0.0);
    assert!(
        fine < coarse,
        "加密未降低熵误差: 粗 {} vs 细 {}",
        coarse,
        fine
    );
    // 一阶格式的渐近收敛比为 2；粗网格上放宽到 1.25
    let ratio = coarse / fine;
    assert!(ratio > 1.25, "收敛比 {} 过低 (粗 {}, 细 {})", ratio, coarse, fine);
}

#[test]
fn second_order_more_accurate_than_first() {
    let first = converge_and_measure(4, 8, false);
    let second = converge_and_measure(4, 8, true);
    assert!(
        second < first,
        "二阶重构未提升精度: 一阶 {} vs 二阶 {}",
        first,
        second
    );
}

#[test]
fn exact_initialization_has_small_entropy_error() {
    // 闭式解初值本身的熵误差只含单元平均误差，应远小于推进后的离散误差量级
    let (mesh, config) = vortex_case(8, 16);
    let spatial = EulerSpatial::new(mesh, &config).unwrap();
    let mut u = vec![ConservedState::ZERO; spatial.n_cells()];
    spatial.initialize_unknowns(InitialField::SupersonicVortex, &mut u);
    let err = diagnostics::entropy_error(
        spatial.mesh(),
        spatial.gas(),
        &spatial.free_stream(),
        &u,
    );
    assert!(err < 1e-10, "初值熵误差 {}", err);
}

#[test]
fn inflow_matches_closed_form_along_boundary() {
    // 入流边幽灵状态与闭式解一致（半径取面中点模长）
    let (mesh, config) = vortex_case(4, 8);
    let spatial = EulerSpatial::new(mesh, &config).unwrap();
    let gas = *spatial.gas();
    let params = af_spatial::VortexParams::default();

    for face in spatial.mesh().boundary_faces() {
        if spatial.mesh().face_marker(face) != 10 {
            continue;
        }
        let interior = gas.conserved_from_primitive(1.0, glam::DVec2::ZERO, 1.0);
        let ghost = spatial.compute_boundary_state(face, &interior);
        let r = spatial.mesh().face_midpoint(face).length();
        let expected = af_spatial::physics::vortex_state(&gas, &params, r);
        assert!((ghost.rho - expected.rho).abs() < 1e-13);
        assert!((ghost.mx - expected.mx).abs() < 1e-13);
        assert!((ghost.en - expected.en).abs() < 1e-13);
    }
}

#[test]
fn untested_characteristic_far_field_flagged_variant_runs() {
    // 未验证的特征型远场分支可选且可运行（仅烟雾测试，不断言物理量）
    let (mesh, mut config) = vortex_case(4, 6);
    config.far_field_policy = af_spatial::FarFieldPolicy::CharacteristicGated;
    config.boundaries = vec![
        af_spatial::BoundaryCondition::new(2, af_spatial::BcKind::SlipWall),
        af_spatial::BoundaryCondition::new(5, af_spatial::BcKind::FarField),
        af_spatial::BoundaryCondition::new(10, af_spatial::BcKind::SupersonicVortexInflow),
    ];
    let spatial = EulerSpatial::new(mesh, &config).unwrap();
    let mut u = vec![ConservedState::ZERO; spatial.n_cells()];
    spatial.initialize_unknowns(InitialField::SupersonicVortex, &mut u);
    let mut residual = vec![ConservedState::ZERO; spatial.n_cells()];
    spatial.compute_residual(&u, &mut residual, None);
    for r in &residual {
        assert!(r.rho.is_finite());
    }
}
