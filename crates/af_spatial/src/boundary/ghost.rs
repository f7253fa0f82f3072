// crates/af_spatial/src/boundary/ghost.rs

//! 幽灵状态合成器
//!
//! 按边界面的标记把内部状态映射为外部（幽灵）状态，
//! 使边界面可复用与内部面相同的数值通量。
//!
//! 每个面的幽灵状态只依赖该面自身的内部状态与常量，
//! 不读写其它面的结果，可安全并行、顺序无关地调用。

use glam::DVec2;

use super::types::{BcKind, BoundaryTable};
use crate::adapter::SpatialMesh;
use crate::physics::{vortex_state, GasModel, VortexParams};
use crate::state::ConservedState;
use crate::types::{ConfigError, FarFieldPolicy};

/// 幽灵状态合成器
///
/// 构造时把每个边界面的标记解析为具体边界条件并缓存；
/// 解析失败（未映射标记）立即报配置错误。
pub struct GhostStateSynthesizer {
    gas: GasModel,
    /// 自由来流参考状态
    free_stream: ConservedState,
    /// 来流马赫数（壁面温度状态方程用）
    mach: f64,
    far_field_policy: FarFieldPolicy,
    vortex: VortexParams,
    /// 每个边界面解析后的边界条件
    face_kinds: Vec<BcKind>,
}

impl GhostStateSynthesizer {
    /// 创建合成器并解析全部边界面
    pub fn new(
        mesh: &SpatialMesh,
        table: &BoundaryTable,
        gas: GasModel,
        free_stream: ConservedState,
        mach: f64,
        far_field_policy: FarFieldPolicy,
    ) -> Result<Self, ConfigError> {
        let mut face_kinds = Vec::with_capacity(mesh.n_boundary_faces());
        for face in mesh.boundary_faces() {
            let marker = mesh.face_marker(face);
            match table.resolve(marker) {
                Some(kind) => face_kinds.push(kind),
                None => return Err(ConfigError::UnmappedBoundaryMarker { marker, face }),
            }
        }

        if far_field_policy == FarFieldPolicy::CharacteristicGated {
            log::warn!("选用了按法向马赫数分支的远场变体；该分支未经算例验证");
        }

        Ok(Self {
            gas,
            free_stream,
            mach,
            far_field_policy,
            vortex: VortexParams::default(),
            face_kinds,
        })
    }

    /// 边界面解析后的边界条件
    #[inline]
    pub fn face_kind(&self, bface: usize) -> BcKind {
        self.face_kinds[bface]
    }

    /// 合成幽灵状态
    ///
    /// # 参数
    /// - `bface`: 边界面索引（须位于边界块内）
    /// - `interior`: 该面内侧状态（单元平均或限制后的面值）
    /// - `normal`: 面外法向量
    /// - `face_mid`: 面中点（解析入流取半径用）
    pub fn compute(
        &self,
        bface: usize,
        interior: &ConservedState,
        normal: DVec2,
        face_mid: DVec2,
    ) -> ConservedState {
        match self.face_kinds[bface] {
            BcKind::SlipWall => self.slip_wall(interior, normal),
            BcKind::IsothermalWall { wall_temperature } => {
                self.isothermal_wall(interior, wall_temperature)
            }
            BcKind::AdiabaticWall => self.adiabatic_wall(interior),
            BcKind::FarField => self.far_field(interior, normal),
            BcKind::Extrapolation => *interior,
            BcKind::SupersonicVortexInflow => vortex_state(&self.gas, &self.vortex, face_mid.length()),
            // 周期配对在网格层完成，这里只透传内部状态
            BcKind::Periodic => *interior,
        }
    }

    /// 滑移壁：法向动量镜像，密度与总能不变
    fn slip_wall(&self, interior: &ConservedState, normal: DVec2) -> ConservedState {
        let vn = interior.normal_velocity(normal);
        ConservedState {
            rho: interior.rho,
            mx: interior.mx - 2.0 * vn * normal.x * interior.rho,
            my: interior.my - 2.0 * vn * normal.y * interior.rho,
            en: interior.en,
        }
    }

    /// 等温壁：速度反号，总能由壁温重算
    fn isothermal_wall(&self, interior: &ConservedState, wall_temperature: f64) -> ConservedState {
        // 无量纲状态方程 p = ρT/(γM∞²)
        let p_ghost = interior.rho * wall_temperature / (self.gas.gamma() * self.mach * self.mach);
        let kinetic = 0.5 * (interior.mx * interior.mx + interior.my * interior.my) / interior.rho;
        ConservedState {
            rho: interior.rho,
            mx: -interior.mx,
            my: -interior.my,
            en: p_ghost / (self.gas.gamma() - 1.0) + kinetic,
        }
    }

    /// 绝热壁：速度反号，温度取内部值
    fn adiabatic_wall(&self, interior: &ConservedState) -> ConservedState {
        let p = self.gas.pressure(interior);
        let kinetic = 0.5 * (interior.mx * interior.mx + interior.my * interior.my) / interior.rho;
        ConservedState {
            rho: interior.rho,
            mx: -interior.mx,
            my: -interior.my,
            en: p / (self.gas.gamma() - 1.0) + kinetic,
        }
    }

    /// 远场：默认无条件取自由来流
    fn far_field(&self, interior: &ConservedState, normal: DVec2) -> ConservedState {
        match self.far_field_policy {
            FarFieldPolicy::FreeStream => self.free_stream,
            FarFieldPolicy::CharacteristicGated => {
                // 未验证分支：法向马赫数低于 1 取来流，否则取内部
                let vn = interior.normal_velocity(normal);
                let mn = vn / self.gas.sound_speed(interior);
                if mn < 1.0 {
                    self.free_stream
                } else {
                    *interior
                }
            }
        }
    }
}

// ============================================================
// 测试
// ============================================================
