// crates/af_spatial/src/engine/jacobian.rs

//! 雅可比组装器
//!
//! 组装残差对状态场的块稀疏线性化 ∂R/∂u。一份组装代码写在
//! [`BlockMatrixAssembler`] 接口上，两个后端：
//! - [`FaceBlockJacobian`]: 对角/下/上三组块数组（自有格式）
//! - [`BlockTripletMatrix`]: 行/列块三元组，供外部稀疏矩阵按块插入
//!
//! # 块约定
//!
//! 面 f 的通量以 `+F·len` 进 owner 残差、`-F·len` 进 neighbor 残差，故
//!
//! ```text
//! L_f = -len·∂F/∂u_owner     放在 (neighbor 行, owner 列)
//! U_f = +len·∂F/∂u_neighbor  放在 (owner 行, neighbor 列)
//! D_owner    -= L_f,  D_neighbor -= U_f
//! ```
//!
//! 组装出的算子正是残差的导数，与矩阵自由乘积同号可比。
//! 边界面只把对内部状态的通量导数计入 owner 对角块；
//! 幽灵状态对内部状态的依赖不展开（继承的近似，见 DESIGN.md）。

use crate::state::{
    block_mul_vars, block_neg, block_scale, block_zero, Block, ConservedState, NVARS,
};

use super::residual::EulerSpatial;

/// 块稀疏矩阵组装接口
///
/// 组装按面顺序进行；外部矩阵的插入语义与 PETSc 的
/// ADD_VALUES/INSERT_VALUES 习惯对应：对角块累加，上下块整块写入。
pub trait BlockMatrixAssembler {
    /// 开始一次组装，给定维度并清零
    fn begin(&mut self, n_cells: usize, n_interior_faces: usize);

    /// 向单元对角块累加
    fn add_diagonal(&mut self, cell: usize, block: &Block);

    /// 写入内部面的下块 L_f（neighbor 行、owner 列）
    fn set_lower(&mut self, interior_face: usize, owner: usize, neighbor: usize, block: &Block);

    /// 写入内部面的上块 U_f（owner 行、neighbor 列）
    fn set_upper(&mut self, interior_face: usize, owner: usize, neighbor: usize, block: &Block);
}

// ============================================================
// 后端一：面索引块数组
// ============================================================

/// 对角/下/上块数组形式的雅可比
#[derive(Debug, Clone, Default)]
pub struct FaceBlockJacobian {
    n_cells: usize,
    /// 对角块（每单元一个）
    pub diagonal: Vec<Block>,
    /// 下块（每内部面一个）
    pub lower: Vec<Block>,
    /// 上块（每内部面一个）
    pub upper: Vec<Block>,
    /// 内部面的 (owner, neighbor)
    face_cells: Vec<(u32, u32)>,
}

impl FaceBlockJacobian {
    /// 创建空矩阵
    pub fn new() -> Self {
        Self::default()
    }

    /// 单元数量
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    /// 矩阵-向量乘积 y = (∂R/∂u)·v
    pub fn apply(&self, v: &[ConservedState], out: &mut [ConservedState]) {
        debug_assert_eq!(v.len(), self.n_cells);
        debug_assert_eq!(out.len(), self.n_cells);

        for cell in 0..self.n_cells {
            let prod = block_mul_vars(&self.diagonal[cell], &v[cell].to_vars());
            out[cell] = ConservedState::from_vars(prod);
        }
        for (iface, &(owner, neighbor)) in self.face_cells.iter().enumerate() {
            let (owner, neighbor) = (owner as usize, neighbor as usize);
            // (owner 行, neighbor 列) = U_f; (neighbor 行, owner 列) = L_f
            let up = block_mul_vars(&self.upper[iface], &v[neighbor].to_vars());
            let lo = block_mul_vars(&self.lower[iface], &v[owner].to_vars());
            out[owner] += ConservedState::from_vars(up);
            out[neighbor] += ConservedState::from_vars(lo);
        }
    }
}

impl BlockMatrixAssembler for FaceBlockJacobian {
    fn begin(&mut self, n_cells: usize, n_interior_faces: usize) {
        self.n_cells = n_cells;
        self.diagonal.clear();
        self.diagonal.resize(n_cells, block_zero());
        self.lower.clear();
        self.lower.resize(n_interior_faces, block_zero());
        self.upper.clear();
        self.upper.resize(n_interior_faces, block_zero());
        self.face_cells.clear();
        self.face_cells.resize(n_interior_faces, (0, 0));
    }

    fn add_diagonal(&mut self, cell: usize, block: &Block) {
        for i in 0..NVARS {
            for j in 0..NVARS {
                self.diagonal[cell][i][j] += block[i][j];
            }
        }
    }

    fn set_lower(&mut self, interior_face: usize, owner: usize, neighbor: usize, block: &Block) {
        self.lower[interior_face] = *block;
        self.face_cells[interior_face] = (owner as u32, neighbor as u32);
    }

    fn set_upper(&mut self, interior_face: usize, owner: usize, neighbor: usize, block: &Block) {
        self.upper[interior_face] = *block;
        self.face_cells[interior_face] = (owner as u32, neighbor as u32);
    }
}

// ============================================================
// 后端二：行/列块三元组
// ============================================================

/// 一条块插入记录
#[derive(Debug, Clone, Copy)]
pub struct BlockEntry {
    /// 块行（单元索引）
    pub row: usize,
    /// 块列（单元索引）
    pub col: usize,
    /// 块值
    pub block: Block,
    /// true 表示累加语义（对角贡献），false 表示整块写入
    pub additive: bool,
}

/// 面向外部稀疏矩阵的块三元组收集器
///
/// 把组装产生的每次块插入原样记录，供调用方转发给
/// 任意行/列布局的外部稀疏矩阵。
#[derive(Debug, Clone, Default)]
pub struct BlockTripletMatrix {
    entries: Vec<BlockEntry>,
}

impl BlockTripletMatrix {
    /// 创建空收集器
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部插入记录
    pub fn entries(&self) -> &[BlockEntry] {
        &self.entries
    }
}

impl BlockMatrixAssembler for BlockTripletMatrix {
    fn begin(&mut self, _n_cells: usize, _n_interior_faces: usize) {
        self.entries.clear();
    }

    fn add_diagonal(&mut self, cell: usize, block: &Block) {
        self.entries.push(BlockEntry {
            row: cell,
            col: cell,
            block: *block,
            additive: true,
        });
    }

    fn set_lower(&mut self, _interior_face: usize, owner: usize, neighbor: usize, block: &Block) {
        self.entries.push(BlockEntry {
            row: neighbor,
            col: owner,
            block: *block,
            additive: false,
        });
    }

    fn set_upper(&mut self, _interior_face: usize, owner: usize, neighbor: usize, block: &Block) {
        self.entries.push(BlockEntry {
            row: owner,
            col: neighbor,
            block: *block,
            additive: false,
        });
    }
}

// ============================================================
// 组装
// ============================================================

impl EulerSpatial {
    /// 组装残差的块稀疏雅可比 ∂R/∂u
    ///
    /// 使用构造时选定的雅可比通量格式；与残差通量不同时，
    /// 得到的是冻结（近似）雅可比，供非精确 Newton 使用。
    /// 组装对面串行：外部矩阵后端的插入不假定线程安全。
    pub fn compute_jacobian(&self, u: &[ConservedState], assembler: &mut dyn BlockMatrixAssembler) {
        let nb = self.mesh.n_boundary_faces();
        assembler.begin(self.mesh.n_cells(), self.mesh.n_interior_faces());

        // 边界面：幽灵视作常量，只差通量对内部状态的导数
        for face in self.mesh.boundary_faces() {
            let owner = self.mesh.face_owner(face);
            let normal = self.mesh.face_normal(face);
            let length = self.mesh.face_length(face);

            let ghost = self.compute_boundary_state(face, &u[owner]);
            let mut dfdl = block_zero();
            let mut dfdr = block_zero();
            self.jac_flux
                .jacobian(&u[owner], &ghost, normal, &mut dfdl, &mut dfdr);

            block_scale(&mut dfdl, length);
            // D_owner -= L_f, L_f = -len·∂F/∂u_owner
            assembler.add_diagonal(owner, &dfdl);
        }

        // 内部面：上下块 + 两端对角
        for face in self.mesh.interior_faces() {
            let owner = self.mesh.face_owner(face);
            let neighbor = self.mesh.face_neighbor(face).expect("内部面缺少 neighbor");
            let normal = self.mesh.face_normal(face);
            let length = self.mesh.face_length(face);

            let mut dfdl = block_zero();
            let mut dfdr = block_zero();
            self.jac_flux
                .jacobian(&u[owner], &u[neighbor], normal, &mut dfdl, &mut dfdr);
            block_scale(&mut dfdl, length);
            block_scale(&mut dfdr, length);

            let iface = face - nb;
            let lower = block_neg(&dfdl);
            assembler.set_lower(iface, owner, neighbor, &lower);
            assembler.set_upper(iface, owner, neighbor, &dfdr);

            // D_owner -= L_f, D_neighbor -= U_f
            assembler.add_diagonal(owner, &dfdl);
            assembler.add_diagonal(neighbor, &block_neg(&dfdr));
        }
    }
}

// ============================================================
// 测试
// ============================================================
