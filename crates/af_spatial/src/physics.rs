// crates/af_spatial/src/physics.rs

//! 理想气体模型与物理通量
//!
//! 提供状态方程、物理法向通量及其精确雅可比，
//! 以及 Krivodonova-Berger 超音速涡算例的闭式解。
//!
//! 无量纲约定：密度以自由来流密度、速度以自由来流速度为参考，
//! 因此压力满足 p∞ = ρ∞ / (γ M∞²)，温度满足 T = γ M∞² p / ρ。

use glam::DVec2;

use crate::state::{Block, ConservedState, Vars};
use crate::types::FreeStreamConfig;

/// 理想气体模型
///
/// 缓存比热比 γ，所有热力学量由守恒状态按需推出。
#[derive(Debug, Clone, Copy)]
pub struct GasModel {
    gamma: f64,
}

impl GasModel {
    /// 创建气体模型
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    /// 比热比 γ
    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// 压力 p = (γ-1)(E - |m|²/(2ρ))
    #[inline]
    pub fn pressure(&self, u: &ConservedState) -> f64 {
        (self.gamma - 1.0) * (u.en - 0.5 * (u.mx * u.mx + u.my * u.my) / u.rho)
    }

    /// 声速 c = √(γp/ρ)
    #[inline]
    pub fn sound_speed(&self, u: &ConservedState) -> f64 {
        (self.gamma * self.pressure(u) / u.rho).sqrt()
    }

    /// 马赫数 |v|/c
    #[inline]
    pub fn mach(&self, u: &ConservedState) -> f64 {
        u.velocity().length() / self.sound_speed(u)
    }

    /// 谱半径 |v·n| + c（局部时间步界与 LLF 耗散用）
    #[inline]
    pub fn spectral_radius(&self, u: &ConservedState, normal: DVec2) -> f64 {
        u.normal_velocity(normal).abs() + self.sound_speed(u)
    }

    /// 由原始变量 (ρ, v, p) 组装守恒状态
    #[inline]
    pub fn conserved_from_primitive(&self, rho: f64, vel: DVec2, p: f64) -> ConservedState {
        ConservedState {
            rho,
            mx: rho * vel.x,
            my: rho * vel.y,
            en: p / (self.gamma - 1.0) + 0.5 * rho * vel.length_squared(),
        }
    }

    /// 拆出原始变量 (ρ, v, p)
    #[inline]
    pub fn primitive(&self, u: &ConservedState) -> (f64, DVec2, f64) {
        (u.rho, u.velocity(), self.pressure(u))
    }

    /// 由自由来流参数组装守恒参考状态
    ///
    /// 参考速度为 1，来流压力 p∞ = ρ∞/(γ M∞²)。
    pub fn free_stream_state(&self, fs: &FreeStreamConfig) -> ConservedState {
        let vel = DVec2::new(fs.alpha.cos(), fs.alpha.sin());
        let p = fs.density / (self.gamma * fs.mach * fs.mach);
        self.conserved_from_primitive(fs.density, vel, p)
    }

    /// 物理法向通量 F(u)·n
    pub fn physical_flux(&self, u: &ConservedState, normal: DVec2) -> Vars {
        let vn = u.normal_velocity(normal);
        let p = self.pressure(u);
        [
            u.rho * vn,
            u.mx * vn + p * normal.x,
            u.my * vn + p * normal.y,
            (u.en + p) * vn,
        ]
    }

    /// 物理法向通量的精确雅可比 A = ∂(F·n)/∂u
    pub fn flux_jacobian(&self, u: &ConservedState, normal: DVec2) -> Block {
        let g = self.gamma;
        let (nx, ny) = (normal.x, normal.y);
        let vel = u.velocity();
        let (vx, vy) = (vel.x, vel.y);
        let vn = vx * nx + vy * ny;
        let q2 = vx * vx + vy * vy;
        let phi = 0.5 * (g - 1.0) * q2;
        let p = self.pressure(u);
        let h = (u.en + p) / u.rho;

        [
            [0.0, nx, ny, 0.0],
            [
                phi * nx - vx * vn,
                vn + (2.0 - g) * vx * nx,
                vx * ny - (g - 1.0) * vy * nx,
                (g - 1.0) * nx,
            ],
            [
                phi * ny - vy * vn,
                vy * nx - (g - 1.0) * vx * ny,
                vn + (2.0 - g) * vy * ny,
                (g - 1.0) * ny,
            ],
            [
                (phi - h) * vn,
                h * nx - (g - 1.0) * vx * vn,
                h * ny - (g - 1.0) * vy * vn,
                g * vn,
            ],
        ]
    }
}

// ============================================================
// 超音速涡闭式解
// ============================================================

/// 超音速涡算例参数
///
/// Krivodonova & Berger, "High-order accurate implementation of solid
/// wall boundary conditions in curved geometries", JCP 211 (2006).
#[derive(Debug, Clone, Copy)]
pub struct VortexParams {
    /// 内半径处马赫数
    pub mach_inner: f64,
    /// 内半径
    pub r_inner: f64,
    /// 内半径处密度
    pub rho_inner: f64,
}

impl Default for VortexParams {
    fn default() -> Self {
        Self {
            mach_inner: 2.25,
            r_inner: 1.0,
            rho_inner: 1.0,
        }
    }
}

/// 半径 r 处的超音速涡状态
///
/// 返回以面/单元局部 +x 方向为流向的守恒状态；
/// 调用方负责旋转到实际切向（见 [`vortex_velocity_direction`]）。
pub fn vortex_state(gas: &GasModel, params: &VortexParams, r: f64) -> ConservedState {
    let g = gas.gamma();
    let (mi, ri, rhoi) = (params.mach_inner, params.r_inner, params.rho_inner);

    let factor = 1.0 + (g - 1.0) * 0.5 * mi * mi * (1.0 - ri * ri / (r * r));
    let rho = rhoi * factor.powf(1.0 / (g - 1.0));
    let ci = rhoi.powf(g - 1.0).sqrt();
    let v = ci * mi * ri / r;
    let p = rho.powf(g) / g;

    ConservedState {
        rho,
        mx: rho * v,
        my: 0.0,
        en: p / (g - 1.0) + 0.5 * rho * v * v,
    }
}

/// 点 (x, y) 处顺时针涡旋的单位切向方向
///
/// 流动绕原点顺时针旋转：在 y 轴正半轴处指向 +x，
/// 在 x 轴正半轴处指向 -y。
#[inline]
pub fn vortex_velocity_direction(x: f64, y: f64) -> DVec2 {
    let theta = y.atan2(x) - std::f64::consts::FRAC_PI_2;
    DVec2::new(theta.cos(), theta.sin())
}

// ============================================================
// 测试
// ============================================================
