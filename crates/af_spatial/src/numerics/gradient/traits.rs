// crates/af_spatial/src/numerics/gradient/traits.rs

//! 梯度计算 trait 和存储类型
//!
//! 梯度场按求值重算，不跨调用保留。存储为 SoA 布局：
//! 每个单元存 NVARS 个分量在 x/y 两个方向的偏导。

use crate::adapter::SpatialMesh;
use crate::geometry::GeometryCache;
use crate::state::{Vars, NVARS};

// ============================================================
// 梯度存储
// ============================================================

/// 状态场梯度存储 (SoA 布局)
#[derive(Debug, Clone, Default)]
pub struct GradientStorage {
    /// x 方向梯度分量
    pub grad_x: Vec<Vars>,
    /// y 方向梯度分量
    pub grad_y: Vec<Vars>,
}

impl GradientStorage {
    /// 创建指定大小的存储
    pub fn new(n: usize) -> Self {
        Self {
            grad_x: vec![[0.0; NVARS]; n],
            grad_y: vec![[0.0; NVARS]; n],
        }
    }

    /// 获取单元梯度 (x, y 分量数组)
    #[inline]
    pub fn get(&self, cell: usize) -> (Vars, Vars) {
        (self.grad_x[cell], self.grad_y[cell])
    }

    /// 设置单元梯度
    #[inline]
    pub fn set(&mut self, cell: usize, gx: Vars, gy: Vars) {
        self.grad_x[cell] = gx;
        self.grad_y[cell] = gy;
    }

    /// 单变量方向导数 ∇u_k · d
    #[inline]
    pub fn directional(&self, cell: usize, var: usize, dx: f64, dy: f64) -> f64 {
        self.grad_x[cell][var] * dx + self.grad_y[cell][var] * dy
    }

    /// 重置为零
    pub fn reset(&mut self) {
        self.grad_x.fill([0.0; NVARS]);
        self.grad_y.fill([0.0; NVARS]);
    }

    /// 调整大小
    pub fn resize(&mut self, n: usize) {
        self.grad_x.resize(n, [0.0; NVARS]);
        self.grad_y.resize(n, [0.0; NVARS]);
    }

    /// 存储大小
    pub fn len(&self) -> usize {
        self.grad_x.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.grad_x.is_empty()
    }
}

// ============================================================
// 梯度方法 trait
// ============================================================

/// 梯度计算方法 trait
///
/// 由单元平均与边界幽灵平均重构各分量的单元梯度。
/// `u` 按单元索引，`ug` 按边界面索引。
pub trait GradientMethod: Send + Sync {
    /// 计算全场梯度
    fn compute_gradients(
        &self,
        mesh: &SpatialMesh,
        geom: &GeometryCache,
        u: &[Vars],
        ug: &[Vars],
        output: &mut GradientStorage,
    );

    /// 方法名称
    fn name(&self) -> &'static str;
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_set_get() {
        let mut storage = GradientStorage::new(3);
        assert_eq!(storage.len(), 3);

        storage.set(1, [1.0, 2.0, 3.0, 4.0], [0.5, 0.5, 0.5, 0.5]);
        let (gx, gy) = storage.get(1);
        assert_eq!(gx[2], 3.0);
        assert_eq!(gy[3], 0.5);

        storage.reset();
        assert_eq!(storage.get(1).0, [0.0; NVARS]);
    }

    #[test]
    fn test_directional() {
        let mut storage = GradientStorage::new(1);
        storage.set(0, [1.0, 0.0, 0.0, 0.0], [2.0, 0.0, 0.0, 0.0]);
        // ∇u_0 = (1, 2), d = (3, 4) → 11
        assert!((storage.directional(0, 0, 3.0, 4.0) - 11.0).abs() < 1e-14);
    }
}
