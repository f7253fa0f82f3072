// crates/af_spatial/src/types.rs

//! 配置类型与错误定义
//!
//! 空间离散的全部配置在构造时一次给定，此后不可变：
//! - 残差与雅可比各自的数值通量格式
//! - 梯度重构与限制器
//! - 自由来流参考状态
//! - 边界标记到边界条件的映射（见 [`crate::boundary`]）
//!
//! 所有配置名称解析在构造期失败即报错，绝不静默回退。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boundary::BoundaryCondition;

// ============================================================
// 格式枚举
// ============================================================

/// 数值通量格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FluxSchemeKind {
    /// Van Leer 通量矢量分裂
    VanLeer,
    /// Roe 通量差分分裂（Harten 熵修正）
    #[default]
    Roe,
    /// HLL 近似黎曼求解器（Einfeldt 波速）
    Hll,
    /// HLLC 近似黎曼求解器
    Hllc,
    /// 局部 Lax-Friedrichs
    Llf,
}

impl FluxSchemeKind {
    /// 由控制文件关键字解析
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "VANLEER" => Ok(Self::VanLeer),
            "ROE" => Ok(Self::Roe),
            "HLL" => Ok(Self::Hll),
            "HLLC" => Ok(Self::Hllc),
            "LLF" => Ok(Self::Llf),
            other => Err(ConfigError::UnknownFluxScheme {
                name: other.to_string(),
            }),
        }
    }

    /// 格式名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::VanLeer => "VANLEER",
            Self::Roe => "ROE",
            Self::Hll => "HLL",
            Self::Hllc => "HLLC",
            Self::Llf => "LLF",
        }
    }
}

/// 梯度重构格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GradientKind {
    /// 常量重构（零梯度，格式退化为一阶）
    None,
    /// Green-Gauss 面积分
    #[default]
    GreenGauss,
    /// 加权最小二乘（逆距离平方权）
    LeastSquares,
}

impl GradientKind {
    /// 由控制文件关键字解析
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "NONE" => Ok(Self::None),
            "GREENGAUSS" => Ok(Self::GreenGauss),
            "LEASTSQUARES" => Ok(Self::LeastSquares),
            other => Err(ConfigError::UnknownGradientScheme {
                name: other.to_string(),
            }),
        }
    }

    /// 格式名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::GreenGauss => "GREENGAUSS",
            Self::LeastSquares => "LEASTSQUARES",
        }
    }
}

/// 梯度限制器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LimiterKind {
    /// 不限制（线性外推）
    #[default]
    None,
    /// WENO 型梯度混合
    Weno,
    /// Van Albada (面向面的 MUSCL, κ=1/3)
    VanAlbada,
    /// Barth-Jespersen
    BarthJespersen,
    /// Venkatakrishnan (光滑限制)
    Venkatakrishnan,
}

impl LimiterKind {
    /// 由控制文件关键字解析
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "NONE" => Ok(Self::None),
            "WENO" => Ok(Self::Weno),
            "VANALBADA" => Ok(Self::VanAlbada),
            "BARTHJESPERSEN" => Ok(Self::BarthJespersen),
            "VENKATAKRISHNAN" => Ok(Self::Venkatakrishnan),
            other => Err(ConfigError::UnknownLimiter {
                name: other.to_string(),
            }),
        }
    }

    /// 限制器名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Weno => "WENO",
            Self::VanAlbada => "VANALBADA",
            Self::BarthJespersen => "BARTHJESPERSEN",
            Self::Venkatakrishnan => "VENKATAKRISHNAN",
        }
    }
}

/// 幽灵单元形心生成策略
///
/// 两种策略互斥，构造时选定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GhostCentroidPolicy {
    /// 关于面中点反射: rcg = 2*m - rc (默认)
    #[default]
    MidpointReflection,
    /// 关于面所在直线反射
    FaceReflection,
}

/// 远场边界策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FarFieldPolicy {
    /// 无条件取自由来流状态（经验证的默认行为）
    #[default]
    FreeStream,
    /// 按法向马赫数分支的特征型变体
    ///
    /// 继承自原始实现中未经验证的分支，仅为对照保留；
    /// 选用时构造期会发出警告日志。
    CharacteristicGated,
}

// ============================================================
// 自由来流
// ============================================================

/// 自由来流参考参数
///
/// 参考速度取 1（速度无量纲化到来流速度），
/// 因而来流压力为 ρ∞/(γ M∞²)。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FreeStreamConfig {
    /// 来流马赫数
    pub mach: f64,
    /// 攻角（弧度）
    pub alpha: f64,
    /// 来流密度
    pub density: f64,
    /// 来流温度（粘性壁条件参考，无量纲恒为 1）
    pub temperature: f64,
    /// 雷诺数（粘性算例配置；无粘路径不消费）
    pub reynolds: f64,
    /// 普朗特数（粘性算例配置；无粘路径不消费）
    pub prandtl: f64,
}

impl FreeStreamConfig {
    /// 以马赫数与攻角（弧度）创建，其余取无量纲默认值
    pub fn new(mach: f64, alpha: f64) -> Self {
        Self {
            mach,
            alpha,
            density: 1.0,
            temperature: 1.0,
            reynolds: 0.0,
            prandtl: 0.0,
        }
    }
}

// ============================================================
// 空间离散配置
// ============================================================

/// 空间离散配置
///
/// 构造 [`crate::engine::EulerSpatial`] 的全部输入；构造后不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialConfig {
    /// 比热比 γ
    pub gamma: f64,
    /// 残差用数值通量
    pub inviscid_flux: FluxSchemeKind,
    /// 雅可比用数值通量（可与残差不同，冻结雅可比属有意设计）
    pub jacobian_flux: FluxSchemeKind,
    /// 梯度重构格式
    pub gradient: GradientKind,
    /// 限制器
    pub limiter: LimiterKind,
    /// 以原始变量 (ρ, u, v, p) 而非守恒变量做重构
    pub reconstruct_primitive: bool,
    /// 幽灵单元形心策略
    pub ghost_policy: GhostCentroidPolicy,
    /// 远场边界策略
    pub far_field_policy: FarFieldPolicy,
    /// Venkatakrishnan 限制器 K 参数
    pub venkat_k: f64,
    /// 是否并行
    pub parallel: bool,
    /// 并行阈值（面数低于该值走串行）
    pub parallel_threshold: usize,
    /// 自由来流
    pub free_stream: FreeStreamConfig,
    /// 边界标记映射
    pub boundaries: Vec<BoundaryCondition>,
}

impl SpatialConfig {
    /// 以默认数值参数创建
    pub fn new(free_stream: FreeStreamConfig, boundaries: Vec<BoundaryCondition>) -> Self {
        Self {
            gamma: 1.4,
            inviscid_flux: FluxSchemeKind::default(),
            jacobian_flux: FluxSchemeKind::default(),
            gradient: GradientKind::default(),
            limiter: LimiterKind::default(),
            reconstruct_primitive: false,
            ghost_policy: GhostCentroidPolicy::default(),
            far_field_policy: FarFieldPolicy::default(),
            venkat_k: 0.3,
            parallel: true,
            parallel_threshold: 1000,
            free_stream,
            boundaries,
        }
    }

    /// 参数校验
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gamma > 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "gamma",
                constraint: "gamma > 1",
            });
        }
        if !(self.free_stream.mach > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "mach",
                constraint: "mach > 0",
            });
        }
        if !(self.free_stream.density > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "density",
                constraint: "density > 0",
            });
        }
        if !(self.venkat_k > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "venkat_k",
                constraint: "venkat_k > 0",
            });
        }
        Ok(())
    }
}

// ============================================================
// 配置错误
// ============================================================

/// 配置错误
///
/// 全部在构造期触发；数值计算路径不产生此类错误。
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// 未知通量格式名
    #[error("未知通量格式: {name}")]
    UnknownFluxScheme {
        /// 输入的格式名
        name: String,
    },

    /// 未知梯度格式名
    #[error("未知梯度重构格式: {name}")]
    UnknownGradientScheme {
        /// 输入的格式名
        name: String,
    },

    /// 未知限制器名
    #[error("未知限制器: {name}")]
    UnknownLimiter {
        /// 输入的限制器名
        name: String,
    },

    /// 边界面标记未映射到任何边界条件
    #[error("边界面 {face} 的标记 {marker} 未配置任何边界条件")]
    UnmappedBoundaryMarker {
        /// 标记值
        marker: i32,
        /// 首个违例面
        face: usize,
    },

    /// 重复的边界标记
    #[error("边界标记 {marker} 被配置了多次")]
    DuplicateBoundaryMarker {
        /// 标记值
        marker: i32,
    },

    /// 参数越界
    #[error("参数 {name} 非法: 须满足 {constraint}")]
    InvalidParameter {
        /// 参数名
        name: &'static str,
        /// 约束说明
        constraint: &'static str,
    },
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flux_scheme_from_name() {
        assert_eq!(FluxSchemeKind::from_name("ROE").unwrap(), FluxSchemeKind::Roe);
        assert_eq!(
            FluxSchemeKind::from_name("VANLEER").unwrap(),
            FluxSchemeKind::VanLeer
        );
        assert!(matches!(
            FluxSchemeKind::from_name("UPWIND"),
            Err(ConfigError::UnknownFluxScheme { .. })
        ));
    }

    #[test]
    fn test_gradient_from_name() {
        assert_eq!(
            GradientKind::from_name("LEASTSQUARES").unwrap(),
            GradientKind::LeastSquares
        );
        assert!(GradientKind::from_name("CUBIC").is_err());
    }

    #[test]
    fn test_limiter_from_name() {
        assert_eq!(
            LimiterKind::from_name("VENKATAKRISHNAN").unwrap(),
            LimiterKind::Venkatakrishnan
        );
        assert!(LimiterKind::from_name("SUPERBEE").is_err());
    }

    #[test]
    fn test_name_roundtrip() {
        for kind in [
            FluxSchemeKind::VanLeer,
            FluxSchemeKind::Roe,
            FluxSchemeKind::Hll,
            FluxSchemeKind::Hllc,
            FluxSchemeKind::Llf,
        ] {
            assert_eq!(FluxSchemeKind::from_name(kind.name()).unwrap(), kind);
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = SpatialConfig::new(FreeStreamConfig::new(0.5, 0.0), Vec::new());
        assert!(config.validate().is_ok());

        config.gamma = 0.9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "gamma", .. })
        ));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = SpatialConfig::new(FreeStreamConfig::new(2.0, 0.1), Vec::new());
        let text = serde_json::to_string(&config).unwrap();
        let back: SpatialConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.inviscid_flux, config.inviscid_flux);
        assert!((back.free_stream.mach - 2.0).abs() < 1e-15);
    }
}
