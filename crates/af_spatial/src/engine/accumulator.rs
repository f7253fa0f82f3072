// crates/af_spatial/src/engine/accumulator.rs

//! 残差累加器
//!
//! 面循环并行时，两个面可能同时更新同一单元的残差与波速积分，
//! 这里用 AtomicU64 上的 compare-exchange 循环实现浮点原子加，
//! 保证散加结果与面处理顺序无关（浮点舍入顺序除外）。

use std::sync::atomic::{AtomicU64, Ordering};

use crate::state::{ConservedState, Vars, NVARS};

/// 原子残差累加器
///
/// 每个单元持有 NVARS 个残差分量与一个波速积分 Σ(|vn|+c)·len。
pub struct AtomicResidualAccumulator {
    n_cells: usize,
    /// 残差分量 (n_cells × NVARS, 行优先)
    components: Vec<AtomicU64>,
    /// 波速积分
    wave_integral: Vec<AtomicU64>,
}

impl AtomicResidualAccumulator {
    /// 创建累加器（零初始化）
    pub fn new(n_cells: usize) -> Self {
        Self {
            n_cells,
            components: (0..n_cells * NVARS)
                .map(|_| AtomicU64::new(0.0f64.to_bits()))
                .collect(),
            wave_integral: (0..n_cells)
                .map(|_| AtomicU64::new(0.0f64.to_bits()))
                .collect(),
        }
    }

    /// 单元数量
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    /// 浮点原子加 (compare-exchange 循环)
    #[inline]
    fn atomic_add(atomic: &AtomicU64, val: f64) {
        let mut old = atomic.load(Ordering::Relaxed);
        loop {
            let new = (f64::from_bits(old) + val).to_bits();
            match atomic.compare_exchange_weak(old, new, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(x) => old = x,
            }
        }
    }

    /// 向单元残差累加（线程安全）
    ///
    /// `sign` 为 +1（owner 侧）或 -1（neighbor 侧）。
    #[inline]
    pub fn add_flux(&self, cell: usize, flux: &Vars, sign: f64) {
        for k in 0..NVARS {
            Self::atomic_add(&self.components[cell * NVARS + k], sign * flux[k]);
        }
    }

    /// 向单元波速积分累加（线程安全）
    #[inline]
    pub fn add_wave_speed(&self, cell: usize, value: f64) {
        Self::atomic_add(&self.wave_integral[cell], value);
    }

    /// 导出残差
    pub fn write_residual(&self, residual: &mut [ConservedState]) {
        debug_assert_eq!(residual.len(), self.n_cells);
        for (cell, out) in residual.iter_mut().enumerate() {
            let mut vars = [0.0; NVARS];
            for k in 0..NVARS {
                vars[k] = f64::from_bits(self.components[cell * NVARS + k].load(Ordering::Relaxed));
            }
            *out = ConservedState::from_vars(vars);
        }
    }

    /// 读出单元波速积分
    #[inline]
    pub fn wave_integral(&self, cell: usize) -> f64 {
        f64::from_bits(self.wave_integral[cell].load(Ordering::Relaxed))
    }
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zeroed() {
        let acc = AtomicResidualAccumulator::new(3);
        assert_eq!(acc.n_cells(), 3);
        let mut res = vec![ConservedState::new(1.0, 1.0, 1.0, 1.0); 3];
        acc.write_residual(&mut res);
        for r in &res {
            assert_eq!(*r, ConservedState::ZERO);
        }
        assert_eq!(acc.wave_integral(0), 0.0);
    }

    #[test]
    fn test_signed_accumulation() {
        let acc = AtomicResidualAccumulator::new(2);
        let flux = [1.0, 2.0, 3.0, 4.0];
        // owner 得正，neighbor 得负
        acc.add_flux(0, &flux, 1.0);
        acc.add_flux(1, &flux, -1.0);

        let mut res = vec![ConservedState::ZERO; 2];
        acc.write_residual(&mut res);
        assert!((res[0].mx - 2.0).abs() < 1e-14);
        assert!((res[1].mx + 2.0).abs() < 1e-14);
        // 两单元贡献相消
        let total = res[0] + res[1];
        assert_eq!(total, ConservedState::ZERO);
    }

    #[test]
    fn test_wave_integral_accumulation() {
        let acc = AtomicResidualAccumulator::new(1);
        acc.add_wave_speed(0, 1.5);
        acc.add_wave_speed(0, 2.5);
        assert!((acc.wave_integral(0) - 4.0).abs() < 1e-14);
    }

    #[test]
    fn test_concurrent_scatter_add() {
        // 多线程向同一单元散加，结果与串行一致
        use std::sync::Arc;
        let acc = Arc::new(AtomicResidualAccumulator::new(1));
        let n_threads = 8;
        let n_iters = 1000;

        let handles: Vec<_> = (0..n_threads)
            .map(|_| {
                let acc = Arc::clone(&acc);
                std::thread::spawn(move || {
                    for _ in 0..n_iters {
                        acc.add_flux(0, &[1.0, 0.5, -0.25, 2.0], 1.0);
                        acc.add_wave_speed(0, 0.5);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut res = vec![ConservedState::ZERO; 1];
        acc.write_residual(&mut res);
        let total = (n_threads * n_iters) as f64;
        assert!((res[0].rho - total).abs() < 1e-9);
        assert!((res[0].my + 0.25 * total).abs() < 1e-9);
        assert!((acc.wave_integral(0) - 0.5 * total).abs() < 1e-9);
    }
}
