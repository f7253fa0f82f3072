// crates/af_mesh/src/generation.rs

//! 网格生成模块
//!
//! 提供简单的结构化网格生成工具，用于测试和验证：
//!
//! - [`RectMeshBuilder`]: 矩形四边形网格
//! - [`PeriodicRectMeshBuilder`]: 双向周期（环面拓扑）矩形网格，无边界面
//! - [`AnnulusMeshBuilder`]: 四分之一圆环网格（超音速涡验证算例域）
//!
//! # 使用示例
//!
//! ```
//! use af_mesh::generation::{RectMeshBuilder, RectMarkers};
//!
//! let mesh = RectMeshBuilder::new(4, 2, 4.0, 2.0)
//!     .with_markers(RectMarkers { left: 4, right: 4, bottom: 2, top: 2 })
//!     .build()
//!     .unwrap();
//! assert_eq!(mesh.n_cells, 8);
//! ```

use glam::DVec2;

use crate::error::MeshError;
use crate::frozen::{FlowMesh, RawMesh, INVALID_CELL};

/// 矩形网格四条边的边界标记
#[derive(Debug, Clone, Copy)]
pub struct RectMarkers {
    /// 左边界 (x = x0)
    pub left: i32,
    /// 右边界 (x = x0 + lx)
    pub right: i32,
    /// 下边界 (y = y0)
    pub bottom: i32,
    /// 上边界 (y = y0 + ly)
    pub top: i32,
}

impl Default for RectMarkers {
    fn default() -> Self {
        Self {
            left: 0,
            right: 0,
            bottom: 0,
            top: 0,
        }
    }
}

/// 矩形结构化网格生成器
///
/// 生成 `nx × ny` 个四边形单元，节点按行主序排列。
#[derive(Debug, Clone)]
pub struct RectMeshBuilder {
    nx: usize,
    ny: usize,
    lx: f64,
    ly: f64,
    x0: f64,
    y0: f64,
    markers: RectMarkers,
}

impl RectMeshBuilder {
    /// 创建矩形网格生成器
    ///
    /// # 参数
    /// - `nx`/`ny`: 两个方向的单元数
    /// - `lx`/`ly`: 两个方向的域长度
    pub fn new(nx: usize, ny: usize, lx: f64, ly: f64) -> Self {
        Self {
            nx,
            ny,
            lx,
            ly,
            x0: 0.0,
            y0: 0.0,
            markers: RectMarkers::default(),
        }
    }

    /// 设置原点
    pub fn with_origin(mut self, x0: f64, y0: f64) -> Self {
        self.x0 = x0;
        self.y0 = y0;
        self
    }

    /// 设置边界标记
    pub fn with_markers(mut self, markers: RectMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// 构建网格
    pub fn build(&self) -> Result<FlowMesh, MeshError> {
        let (nx, ny) = (self.nx, self.ny);
        let dx = self.lx / nx as f64;
        let dy = self.ly / ny as f64;
        let node = |i: usize, j: usize| (j * (nx + 1) + i) as u32;
        let cell = |i: usize, j: usize| (j * nx + i) as u32;

        let mut raw = RawMesh::default();

        for j in 0..=ny {
            for i in 0..=nx {
                raw.node_xy
                    .push(DVec2::new(self.x0 + i as f64 * dx, self.y0 + j as f64 * dy));
            }
        }

        raw.cell_node_offsets.push(0);
        for j in 0..ny {
            for i in 0..nx {
                raw.cell_node_indices.extend_from_slice(&[
                    node(i, j),
                    node(i + 1, j),
                    node(i + 1, j + 1),
                    node(i, j + 1),
                ]);
                raw.cell_node_offsets.push(raw.cell_node_indices.len());
                raw.cell_area.push(dx * dy);
            }
        }

        // 边界面在前：下、右、上、左
        for i in 0..nx {
            push_face(
                &mut raw,
                [node(i, 0), node(i + 1, 0)],
                cell(i, 0),
                INVALID_CELL,
                DVec2::new(0.0, -1.0),
                dx,
                self.markers.bottom,
            );
        }
        for j in 0..ny {
            push_face(
                &mut raw,
                [node(nx, j), node(nx, j + 1)],
                cell(nx - 1, j),
                INVALID_CELL,
                DVec2::new(1.0, 0.0),
                dy,
                self.markers.right,
            );
        }
        for i in 0..nx {
            push_face(
                &mut raw,
                [node(i, ny), node(i + 1, ny)],
                cell(i, ny - 1),
                INVALID_CELL,
                DVec2::new(0.0, 1.0),
                dx,
                self.markers.top,
            );
        }
        for j in 0..ny {
            push_face(
                &mut raw,
                [node(0, j), node(0, j + 1)],
                cell(0, j),
                INVALID_CELL,
                DVec2::new(-1.0, 0.0),
                dy,
                self.markers.left,
            );
        }
        raw.n_boundary_faces = raw.face_owner.len();

        // 内部面：竖直向 (owner 在左)，水平向 (owner 在下)
        for j in 0..ny {
            for i in 0..nx - 1 {
                push_face(
                    &mut raw,
                    [node(i + 1, j), node(i + 1, j + 1)],
                    cell(i, j),
                    cell(i + 1, j),
                    DVec2::new(1.0, 0.0),
                    dy,
                    -1,
                );
            }
        }
        for j in 0..ny - 1 {
            for i in 0..nx {
                push_face(
                    &mut raw,
                    [node(i, j + 1), node(i + 1, j + 1)],
                    cell(i, j),
                    cell(i, j + 1),
                    DVec2::new(0.0, 1.0),
                    dx,
                    -1,
                );
            }
        }

        FlowMesh::assemble(raw)
    }
}

/// 双向周期矩形网格生成器（环面拓扑）
///
/// 所有面均为内部面，`x = 0/lx` 与 `y = 0/ly` 缝合。
/// 周期缝两侧单元形心的几何间距与物理间距不符，
/// 因此该网格仅用于一阶格式的守恒性与雅可比校验测试。
#[derive(Debug, Clone)]
pub struct PeriodicRectMeshBuilder {
    nx: usize,
    ny: usize,
    lx: f64,
    ly: f64,
}

impl PeriodicRectMeshBuilder {
    /// 创建周期矩形网格生成器
    pub fn new(nx: usize, ny: usize, lx: f64, ly: f64) -> Self {
        Self { nx, ny, lx, ly }
    }

    /// 构建网格
    pub fn build(&self) -> Result<FlowMesh, MeshError> {
        let (nx, ny) = (self.nx, self.ny);
        let dx = self.lx / nx as f64;
        let dy = self.ly / ny as f64;
        let node = |i: usize, j: usize| (j * (nx + 1) + i) as u32;
        let cell = |i: usize, j: usize| (j * nx + i) as u32;

        let mut raw = RawMesh::default();
        for j in 0..=ny {
            for i in 0..=nx {
                raw.node_xy.push(DVec2::new(i as f64 * dx, j as f64 * dy));
            }
        }
        raw.cell_node_offsets.push(0);
        for j in 0..ny {
            for i in 0..nx {
                raw.cell_node_indices.extend_from_slice(&[
                    node(i, j),
                    node(i + 1, j),
                    node(i + 1, j + 1),
                    node(i, j + 1),
                ]);
                raw.cell_node_offsets.push(raw.cell_node_indices.len());
                raw.cell_area.push(dx * dy);
            }
        }
        raw.n_boundary_faces = 0;

        // 竖直向内部面，i = nx-1 时回绕到 i = 0
        for j in 0..ny {
            for i in 0..nx {
                push_face(
                    &mut raw,
                    [node(i + 1, j), node(i + 1, j + 1)],
                    cell(i, j),
                    cell((i + 1) % nx, j),
                    DVec2::new(1.0, 0.0),
                    dy,
                    -1,
                );
            }
        }
        // 水平向内部面，j = ny-1 时回绕到 j = 0
        for j in 0..ny {
            for i in 0..nx {
                push_face(
                    &mut raw,
                    [node(i, j + 1), node(i + 1, j + 1)],
                    cell(i, j),
                    cell(i, (j + 1) % ny),
                    DVec2::new(0.0, 1.0),
                    dx,
                    -1,
                );
            }
        }

        FlowMesh::assemble(raw)
    }
}

/// 四分之一圆环网格生成器
///
/// 角向范围 θ ∈ [0, π/2]，径向范围 [r_inner, r_outer]。
/// 这是 Krivodonova-Berger 超音速涡算例的计算域：
/// 流动顺时针旋转，自 θ = π/2 边（y 轴）流入，自 θ = 0 边（x 轴）流出。
#[derive(Debug, Clone)]
pub struct AnnulusMeshBuilder {
    nr: usize,
    nt: usize,
    r_inner: f64,
    r_outer: f64,
    /// 内圆弧标记 (r = r_inner)
    pub marker_inner: i32,
    /// 外圆弧标记 (r = r_outer)
    pub marker_outer: i32,
    /// 入流边标记 (θ = π/2)
    pub marker_inflow: i32,
    /// 出流边标记 (θ = 0)
    pub marker_outflow: i32,
}

impl AnnulusMeshBuilder {
    /// 创建圆环网格生成器
    ///
    /// # 参数
    /// - `nr`: 径向单元数
    /// - `nt`: 角向单元数
    pub fn new(nr: usize, nt: usize, r_inner: f64, r_outer: f64) -> Self {
        Self {
            nr,
            nt,
            r_inner,
            r_outer,
            marker_inner: 2,
            marker_outer: 2,
            marker_inflow: 10,
            marker_outflow: 5,
        }
    }

    /// 设置边界标记 (内弧, 外弧, 入流, 出流)
    pub fn with_markers(mut self, inner: i32, outer: i32, inflow: i32, outflow: i32) -> Self {
        self.marker_inner = inner;
        self.marker_outer = outer;
        self.marker_inflow = inflow;
        self.marker_outflow = outflow;
        self
    }

    /// 构建网格
    pub fn build(&self) -> Result<FlowMesh, MeshError> {
        let (nr, nt) = (self.nr, self.nt);
        let dr = (self.r_outer - self.r_inner) / nr as f64;
        let dt = std::f64::consts::FRAC_PI_2 / nt as f64;
        let node = |k: usize, m: usize| (m * (nr + 1) + k) as u32;
        let cell = |k: usize, m: usize| (m * nr + k) as u32;

        let mut raw = RawMesh::default();
        for m in 0..=nt {
            let theta = m as f64 * dt;
            for k in 0..=nr {
                let r = self.r_inner + k as f64 * dr;
                raw.node_xy.push(DVec2::new(r * theta.cos(), r * theta.sin()));
            }
        }

        raw.cell_node_offsets.push(0);
        let mut centroids = Vec::with_capacity(nr * nt);
        for m in 0..nt {
            for k in 0..nr {
                let quad = [node(k, m), node(k + 1, m), node(k + 1, m + 1), node(k, m + 1)];
                raw.cell_node_indices.extend_from_slice(&quad);
                raw.cell_node_offsets.push(raw.cell_node_indices.len());
                let pts: Vec<DVec2> = quad.iter().map(|&n| raw.node_xy[n as usize]).collect();
                raw.cell_area.push(polygon_area(&pts));
                centroids.push(pts.iter().sum::<DVec2>() / 4.0);
            }
        }

        let nodes = raw.node_xy.clone();
        let mut push_oriented =
            |raw: &mut RawMesh, a: u32, b: u32, owner: u32, neighbor: u32, marker: i32| {
                let p1 = nodes[a as usize];
                let p2 = nodes[b as usize];
                let length = (p2 - p1).length();
                let (normal, _) = outward_normal(p1, p2, centroids[owner as usize]);
                push_face(raw, [a, b], owner, neighbor, normal, length, marker);
            };

        // 边界面在前：内弧、外弧、入流边、出流边
        for m in 0..nt {
            push_oriented(
                &mut raw,
                node(0, m),
                node(0, m + 1),
                cell(0, m),
                INVALID_CELL,
                self.marker_inner,
            );
        }
        for m in 0..nt {
            push_oriented(
                &mut raw,
                node(nr, m),
                node(nr, m + 1),
                cell(nr - 1, m),
                INVALID_CELL,
                self.marker_outer,
            );
        }
        for k in 0..nr {
            push_oriented(
                &mut raw,
                node(k, nt),
                node(k + 1, nt),
                cell(k, nt - 1),
                INVALID_CELL,
                self.marker_inflow,
            );
        }
        for k in 0..nr {
            push_oriented(
                &mut raw,
                node(k, 0),
                node(k + 1, 0),
                cell(k, 0),
                INVALID_CELL,
                self.marker_outflow,
            );
        }
        raw.n_boundary_faces = raw.face_owner.len();

        // 内部面：角向分界 (owner 在低 θ 侧)，径向分界 (owner 在内侧)
        for m in 1..nt {
            for k in 0..nr {
                push_oriented(
                    &mut raw,
                    node(k, m),
                    node(k + 1, m),
                    cell(k, m - 1),
                    cell(k, m),
                    -1,
                );
            }
        }
        for m in 0..nt {
            for k in 1..nr {
                push_oriented(
                    &mut raw,
                    node(k, m),
                    node(k, m + 1),
                    cell(k - 1, m),
                    cell(k, m),
                    -1,
                );
            }
        }

        FlowMesh::assemble(raw)
    }
}

/// 追加一个面
fn push_face(
    raw: &mut RawMesh,
    nodes: [u32; 2],
    owner: u32,
    neighbor: u32,
    normal: DVec2,
    length: f64,
    marker: i32,
) {
    raw.face_nodes.push(nodes);
    raw.face_owner.push(owner);
    raw.face_neighbor.push(neighbor);
    raw.face_normal.push(normal);
    raw.face_length.push(length);
    raw.face_marker.push(marker);
}

/// 多边形面积 (shoelace)
fn polygon_area(pts: &[DVec2]) -> f64 {
    let n = pts.len();
    let mut acc = 0.0;
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        acc += a.x * b.y - b.x * a.y;
    }
    0.5 * acc.abs()
}

/// 由面两端点与 owner 形心确定指向 owner 外侧的单位法向量
fn outward_normal(p1: DVec2, p2: DVec2, owner_centroid: DVec2) -> (DVec2, f64) {
    let t = p2 - p1;
    let length = t.length();
    let mut n = DVec2::new(t.y, -t.x) / length;
    let mid = 0.5 * (p1 + p2);
    if n.dot(mid - owner_centroid) < 0.0 {
        n = -n;
    }
    (n, length)
}

// ============================================================
// 测试
// ============================================================
