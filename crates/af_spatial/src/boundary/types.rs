// crates/af_spatial/src/boundary/types.rs

//! 边界条件类型定义
//!
//! 边界条件按网格的面标记 id 配置：每个标记映射到一种
//! [`BcKind`]。所有边界面的标记必须在构造期解析成功，
//! 未映射的标记立即报 [`crate::types::ConfigError`]，
//! 而不是留下未初始化的幽灵状态。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::ConfigError;

/// 边界条件种类
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BcKind {
    /// 无滑移不可穿透壁（无粘滑移壁）
    ///
    /// 法向动量镜像反转，密度与总能不变。
    SlipWall,

    /// 等温壁
    ///
    /// 幽灵速度取内部反号（壁面平均速度为零），
    /// 总能由给定壁温经状态方程重算。
    IsothermalWall {
        /// 壁面温度（以来流温度无量纲化）
        wall_temperature: f64,
    },

    /// 绝热壁
    ///
    /// 幽灵速度取内部反号，温度取内部值（法向热流为零的近似）。
    AdiabaticWall,

    /// 远场 / 进出流
    ///
    /// 行为由 [`crate::types::FarFieldPolicy`] 选定。
    FarField,

    /// 零梯度外推
    Extrapolation,

    /// 超音速涡解析入流
    ///
    /// 幽灵状态取面半径处的 Krivodonova-Berger 闭式解。
    SupersonicVortexInflow,

    /// 周期边界
    ///
    /// 面配对属网格层职责；本核心只透传已配对的内部状态。
    Periodic,
}

/// 单条边界条件配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCondition {
    /// 网格面标记 id
    pub marker: i32,
    /// 边界条件种类
    pub kind: BcKind,
}

impl BoundaryCondition {
    /// 创建配置项
    pub fn new(marker: i32, kind: BcKind) -> Self {
        Self { marker, kind }
    }
}

/// 标记 → 边界条件查找表
#[derive(Debug, Clone, Default)]
pub struct BoundaryTable {
    kinds: HashMap<i32, BcKind>,
}

impl BoundaryTable {
    /// 由配置列表构建，拒绝重复标记
    pub fn from_conditions(conditions: &[BoundaryCondition]) -> Result<Self, ConfigError> {
        let mut kinds = HashMap::with_capacity(conditions.len());
        for bc in conditions {
            if kinds.insert(bc.marker, bc.kind).is_some() {
                return Err(ConfigError::DuplicateBoundaryMarker { marker: bc.marker });
            }
        }
        Ok(Self { kinds })
    }

    /// 查找标记对应的边界条件
    #[inline]
    pub fn resolve(&self, marker: i32) -> Option<BcKind> {
        self.kinds.get(&marker).copied()
    }

    /// 配置的条目数
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

// ============================================================
// 测试
// ============================================================
