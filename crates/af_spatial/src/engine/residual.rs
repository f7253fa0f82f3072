// crates/af_spatial/src/engine/residual.rs

//! 残差组装器
//!
//! [`EulerSpatial`] 是空间离散的编排者：构造时按配置实例化
//! 通量/重构/限制器策略并校验边界映射，此后每次求值都是
//! 输入状态场的纯函数。
//!
//! 一次残差求值的状态机：
//! 1. 清零累加器
//! 2. 边界面把 owner 单元平均拷入左状态
//! 3. 合成幽灵平均 → 重构梯度 → 限制后的面值（可按原始变量重构）
//! 4. 边界面右状态用幽灵状态覆盖
//! 5. 逐面算通量乘以面长，owner 侧 `+`、实单元 neighbor 侧 `-`
//!    散加进残差，同时累加波速积分 (|vn|+c)·len
//! 6. 需要时写出每单元局部时间步界 面积/波速积分

use std::sync::Arc;

use af_mesh::FlowMesh;
use glam::DVec2;
use rayon::prelude::*;

use super::accumulator::AtomicResidualAccumulator;
use crate::adapter::SpatialMesh;
use crate::boundary::{BoundaryTable, GhostStateSynthesizer};
use crate::geometry::GeometryCache;
use crate::numerics::gradient::{create_gradient_method, GradientMethod, GradientStorage};
use crate::numerics::limiter::{create_limiter, FaceLimiter};
use crate::physics::{vortex_state, vortex_velocity_direction, GasModel, VortexParams};
use crate::schemes::riemann::{create_riemann_solver, RiemannSolver};
use crate::state::{ConservedState, Vars, NVARS};
use crate::types::{ConfigError, SpatialConfig};

/// 初始场类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialField {
    /// 全场取自由来流
    FreeStream,
    /// 超音速涡闭式解（半径取单元形心距原点距离，方向沿顺时针切向）
    SupersonicVortex,
}

/// Euler 方程空间离散
pub struct EulerSpatial {
    pub(crate) mesh: SpatialMesh,
    pub(crate) geom: GeometryCache,
    pub(crate) gas: GasModel,
    /// 自由来流参考状态
    pub(crate) free_stream: ConservedState,
    pub(crate) synthesizer: GhostStateSynthesizer,
    /// 残差用数值通量
    flux: Box<dyn RiemannSolver>,
    /// 雅可比用数值通量
    pub(crate) jac_flux: Box<dyn RiemannSolver>,
    gradient: Box<dyn GradientMethod>,
    limiter: Box<dyn FaceLimiter>,
    reconstruct_primitive: bool,
    pub(crate) parallel: bool,
    pub(crate) parallel_threshold: usize,
}

impl EulerSpatial {
    /// 按配置构造空间离散
    ///
    /// 未知格式名、重复/未映射边界标记、非法参数都在这里失败。
    pub fn new(mesh: Arc<FlowMesh>, config: &SpatialConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let gas = GasModel::new(config.gamma);
        let mesh = SpatialMesh::new(mesh);
        let geom = GeometryCache::new(&mesh, config.ghost_policy);

        let table = BoundaryTable::from_conditions(&config.boundaries)?;
        let free_stream = gas.free_stream_state(&config.free_stream);
        let synthesizer = GhostStateSynthesizer::new(
            &mesh,
            &table,
            gas,
            free_stream,
            config.free_stream.mach,
            config.far_field_policy,
        )?;

        let flux = create_riemann_solver(config.inviscid_flux, gas);
        let jac_flux = create_riemann_solver(config.jacobian_flux, gas);
        let gradient =
            create_gradient_method(config.gradient, config.parallel, config.parallel_threshold);
        let limiter = create_limiter(config.limiter, config.venkat_k);

        log::info!(
            "EulerSpatial: 残差通量 {}，雅可比通量 {}，重构 {}，限制器 {}",
            flux.name(),
            jac_flux.name(),
            gradient.name(),
            limiter.name()
        );

        Ok(Self {
            mesh,
            geom,
            gas,
            free_stream,
            synthesizer,
            flux,
            jac_flux,
            gradient,
            limiter,
            reconstruct_primitive: config.reconstruct_primitive,
            parallel: config.parallel,
            parallel_threshold: config.parallel_threshold,
        })
    }

    /// 网格视图
    pub fn mesh(&self) -> &SpatialMesh {
        &self.mesh
    }

    /// 几何缓存
    pub fn geometry(&self) -> &GeometryCache {
        &self.geom
    }

    /// 气体模型
    pub fn gas(&self) -> &GasModel {
        &self.gas
    }

    /// 自由来流参考状态
    pub fn free_stream(&self) -> ConservedState {
        self.free_stream
    }

    /// 单元数量
    pub fn n_cells(&self) -> usize {
        self.mesh.n_cells()
    }

    /// 填充初始状态场
    pub fn initialize_unknowns(&self, init: InitialField, u: &mut [ConservedState]) {
        debug_assert_eq!(u.len(), self.mesh.n_cells());
        match init {
            InitialField::FreeStream => u.fill(self.free_stream),
            InitialField::SupersonicVortex => {
                let params = VortexParams::default();
                for (cell, out) in u.iter_mut().enumerate() {
                    let rc = self.geom.cell_centroid(cell);
                    let state = vortex_state(&self.gas, &params, rc.length());
                    let dir = vortex_velocity_direction(rc.x, rc.y);
                    // 闭式解给出 +x 流向的动量，旋到局部切向
                    *out = ConservedState {
                        rho: state.rho,
                        mx: state.mx * dir.x,
                        my: state.mx * dir.y,
                        en: state.en,
                    };
                }
            }
        }
    }

    /// 单个边界面的幽灵状态
    pub fn compute_boundary_state(
        &self,
        bface: usize,
        interior: &ConservedState,
    ) -> ConservedState {
        self.synthesizer.compute(
            bface,
            interior,
            self.mesh.face_normal(bface),
            self.mesh.face_midpoint(bface),
        )
    }

    /// 守恒量 → 重构工作变量
    #[inline]
    fn to_work(&self, u: &ConservedState) -> Vars {
        if self.reconstruct_primitive {
            let (rho, vel, p) = self.gas.primitive(u);
            [rho, vel.x, vel.y, p]
        } else {
            u.to_vars()
        }
    }

    /// 重构工作变量 → 守恒量
    #[inline]
    fn from_work(&self, w: &Vars) -> ConservedState {
        if self.reconstruct_primitive {
            self.gas
                .conserved_from_primitive(w[0], DVec2::new(w[1], w[2]), w[3])
        } else {
            ConservedState::from_vars(*w)
        }
    }

    /// 计算全部面的左右状态
    ///
    /// 左状态来自 owner 侧重构，内部面右状态来自 neighbor 侧重构，
    /// 边界面右状态为合成的幽灵状态。一阶（重构 NONE）时左右状态
    /// 逐位等于相邻单元平均。
    pub fn compute_face_states(
        &self,
        u: &[ConservedState],
    ) -> (Vec<ConservedState>, Vec<ConservedState>) {
        let nf = self.mesh.n_faces();
        let nb = self.mesh.n_boundary_faces();

        let mut uleft = vec![ConservedState::ZERO; nf];
        let mut uright = vec![ConservedState::ZERO; nf];

        // 边界面左状态：owner 单元平均
        for face in self.mesh.boundary_faces() {
            uleft[face] = u[self.mesh.face_owner(face)];
        }

        // 幽灵单元平均（重构的边界模板）
        let mut ghost_avg = vec![ConservedState::ZERO; nf];
        for face in self.mesh.boundary_faces() {
            ghost_avg[face] = self.compute_boundary_state(face, &uleft[face]);
        }

        // 重构与限制在工作变量上进行
        let w: Vec<Vars> = u.iter().map(|s| self.to_work(s)).collect();
        let mut wg = vec![[0.0; NVARS]; nf];
        for face in self.mesh.boundary_faces() {
            wg[face] = self.to_work(&ghost_avg[face]);
        }

        let mut grads = GradientStorage::new(self.mesh.n_cells());
        self.gradient
            .compute_gradients(&self.mesh, &self.geom, &w, &wg, &mut grads);

        let mut wl = vec![[0.0; NVARS]; nf];
        let mut wr = vec![[0.0; NVARS]; nf];
        self.limiter
            .compute_face_values(&self.mesh, &self.geom, &w, &wg, &grads, &mut wl, &mut wr);

        for face in 0..nf {
            uleft[face] = self.from_work(&wl[face]);
        }
        for face in nb..nf {
            uright[face] = self.from_work(&wr[face]);
        }

        // 边界面右状态：由限制后的左面值合成幽灵状态
        for face in self.mesh.boundary_faces() {
            uright[face] = self.compute_boundary_state(face, &uleft[face]);
        }

        (uleft, uright)
    }

    /// 计算残差与可选的局部时间步界
    ///
    /// 残差零初始化后按面累加：owner 得 `+F·len`，实单元 neighbor
    /// 得 `-F·len`。`timesteps` 给定时写出 面积/Σ(|vn|+c)·len。
    /// 输入状态场只读；并发求值共享 `self` 是安全的。
    pub fn compute_residual(
        &self,
        u: &[ConservedState],
        residual: &mut [ConservedState],
        timesteps: Option<&mut [f64]>,
    ) {
        let n_cells = self.mesh.n_cells();
        debug_assert_eq!(u.len(), n_cells);
        debug_assert_eq!(residual.len(), n_cells);

        let (uleft, uright) = self.compute_face_states(u);
        let acc = AtomicResidualAccumulator::new(n_cells);

        let process = |face: usize| {
            let normal = self.mesh.face_normal(face);
            let length = self.mesh.face_length(face);
            let owner = self.mesh.face_owner(face);

            let ff = self.flux.flux(&uleft[face], &uright[face], normal);
            let mut scaled = ff.flux;
            for value in scaled.iter_mut() {
                *value *= length;
            }

            acc.add_flux(owner, &scaled, 1.0);
            acc.add_wave_speed(owner, self.gas.spectral_radius(&uleft[face], normal) * length);

            if let Some(neighbor) = self.mesh.face_neighbor(face) {
                acc.add_flux(neighbor, &scaled, -1.0);
                acc.add_wave_speed(
                    neighbor,
                    self.gas.spectral_radius(&uright[face], normal) * length,
                );
            }
        };

        let nf = self.mesh.n_faces();
        if self.parallel && nf >= self.parallel_threshold {
            (0..nf).into_par_iter().for_each(process);
        } else {
            (0..nf).for_each(process);
        }

        acc.write_residual(residual);

        if let Some(timesteps) = timesteps {
            debug_assert_eq!(timesteps.len(), n_cells);
            for (cell, dt) in timesteps.iter_mut().enumerate() {
                *dt = self.mesh.cell_area(cell) / acc.wave_integral(cell);
            }
        }
    }
}

// ============================================================
// 测试
// ============================================================
