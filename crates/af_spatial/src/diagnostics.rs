// crates/af_spatial/src/diagnostics.rs

//! 诊断输出
//!
//! 面向诊断协作方的后处理字段：单元/节点上的密度、马赫数、
//! 压力与速度，以及相对自由来流的熵误差（网格收敛阶研究用）。
//! 本模块只读状态场，不做任何文件输出。

use glam::DVec2;

use crate::adapter::SpatialMesh;
use crate::physics::GasModel;
use crate::state::ConservedState;

/// 单元中心后处理字段
#[derive(Debug, Clone, Default)]
pub struct FlowFields {
    /// 密度
    pub density: Vec<f64>,
    /// 马赫数
    pub mach: Vec<f64>,
    /// 压力
    pub pressure: Vec<f64>,
    /// 速度
    pub velocity: Vec<DVec2>,
}

/// 单元中心字段
pub fn cell_fields(gas: &GasModel, u: &[ConservedState]) -> FlowFields {
    let mut fields = FlowFields {
        density: Vec::with_capacity(u.len()),
        mach: Vec::with_capacity(u.len()),
        pressure: Vec::with_capacity(u.len()),
        velocity: Vec::with_capacity(u.len()),
    };
    for s in u {
        fields.density.push(s.rho);
        fields.mach.push(gas.mach(s));
        fields.pressure.push(gas.pressure(s));
        fields.velocity.push(s.velocity());
    }
    fields
}

/// 节点字段（面积加权平均到网格节点）
pub fn nodal_fields(mesh: &SpatialMesh, gas: &GasModel, u: &[ConservedState]) -> FlowFields {
    let n_nodes = mesh.n_nodes();
    let mut averaged = vec![ConservedState::ZERO; n_nodes];
    let mut area_sum = vec![0.0; n_nodes];

    for cell in mesh.cells() {
        let area = mesh.cell_area(cell);
        for node in mesh.cell_nodes(cell) {
            averaged[node] += u[cell] * area;
            area_sum[node] += area;
        }
    }
    for node in 0..n_nodes {
        averaged[node] = averaged[node] * (1.0 / area_sum[node]);
    }

    cell_fields(gas, &averaged)
}

/// 相对自由来流的熵误差
///
/// s = p/ρ^γ，误差取 (s - s∞)/s∞ 的面积加权 L2 范数。
/// 等熵算例（如超音速涡）随网格加密按重构阶收敛。
pub fn entropy_error(
    mesh: &SpatialMesh,
    gas: &GasModel,
    free_stream: &ConservedState,
    u: &[ConservedState],
) -> f64 {
    let g = gas.gamma();
    let s_inf = gas.pressure(free_stream) / free_stream.rho.powf(g);

    let mut error = 0.0;
    for cell in mesh.cells() {
        let s = gas.pressure(&u[cell]) / u[cell].rho.powf(g);
        let rel = (s - s_inf) / s_inf;
        error += rel * rel * mesh.cell_area(cell);
    }
    let error = error.sqrt();

    let h = 1.0 / (mesh.n_cells() as f64).sqrt();
    log::debug!("熵误差: log10(h) = {:.4}, log10(err) = {:.6}", h.log10(), error.log10());

    error
}

// ============================================================
// 测试
// ============================================================
