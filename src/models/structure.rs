//! # 结构数据模型
//!
//! 定义统一的结构表示：周期性晶体（来自 CIF）与分子（来自 XYZ，包裹在合成盒子中）。
//! 结构读入后不再修改。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `xas/`, `writers/` 使用
//! - 使用 `nalgebra` 做坐标变换

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 占据判定为满占据的容差
const FULL_OCCUPANCY_TOL: f64 = 1e-6;

/// 合成盒子的最小边长 (Å)
const MIN_BOX_EDGE: f64 = 1.0;

/// 晶格参数表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let alpha_rad = alpha.to_radians();
        let beta_rad = beta.to_radians();
        let gamma_rad = gamma.to_radians();

        let cos_alpha = alpha_rad.cos();
        let cos_beta = beta_rad.cos();
        let cos_gamma = gamma_rad.cos();
        let sin_gamma = gamma_rad.sin();

        let a_vec = [a, 0.0, 0.0];
        let b_vec = [b * cos_gamma, b * sin_gamma, 0.0];

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();
        let c_vec = [c1, c2, c3];

        Lattice {
            matrix: [a_vec, b_vec, c_vec],
        }
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let a_vec = self.row(0);
        let b_vec = self.row(1);
        let c_vec = self.row(2);

        let (a, b, c) = (a_vec.norm(), b_vec.norm(), c_vec.norm());

        let alpha = (b_vec.dot(&c_vec) / (b * c)).acos().to_degrees();
        let beta = (a_vec.dot(&c_vec) / (a * c)).acos().to_degrees();
        let gamma = (a_vec.dot(&b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积
    pub fn volume(&self) -> f64 {
        self.as_matrix().determinant()
    }

    /// 行向量矩阵
    pub fn as_matrix(&self) -> Matrix3<f64> {
        let m = self.matrix;
        Matrix3::new(
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
        )
    }

    fn row(&self, i: usize) -> Vector3<f64> {
        Vector3::from(self.matrix[i])
    }

    /// 分数坐标 -> 笛卡尔坐标 (cart = L^T * frac)
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        let v = self.as_matrix().transpose() * Vector3::from(frac);
        [v.x, v.y, v.z]
    }

    /// 倒格矢长度 |b*_i|（不含 2π），用于确定周期像的搜索范围
    pub fn reciprocal_lengths(&self) -> Option<[f64; 3]> {
        let inv = self.as_matrix().try_inverse()?;
        // inv 的列向量即倒格矢
        Some([
            inv.column(0).norm(),
            inv.column(1).norm(),
            inv.column(2).norm(),
        ])
    }
}

/// 位点的元素占据分布，按出现顺序保存 (元素, 占据率)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub occupancies: Vec<(String, f64)>,
}

impl Species {
    /// 满占据的单一元素
    pub fn element(symbol: impl Into<String>) -> Self {
        Species {
            occupancies: vec![(symbol.into(), 1.0)],
        }
    }

    pub fn new(occupancies: Vec<(String, f64)>) -> Self {
        Species { occupancies }
    }

    /// 是否为单一元素满占据
    pub fn is_ordered(&self) -> bool {
        self.occupancies.len() == 1 && (self.occupancies[0].1 - 1.0).abs() < FULL_OCCUPANCY_TOL
    }

    /// 包含的元素（保持顺序）
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.occupancies.iter().map(|(el, _)| el.as_str())
    }

    /// 第一个（主）元素
    pub fn primary(&self) -> &str {
        self.occupancies
            .first()
            .map(|(el, _)| el.as_str())
            .unwrap_or("X")
    }

    /// 给定元素的占据率
    pub fn occupancy_of(&self, element: &str) -> Option<f64> {
        self.occupancies
            .iter()
            .find(|(el, _)| el == element)
            .map(|(_, occ)| *occ)
    }

    /// 合并另一位点的分布（同一位置上的无序原子）
    pub fn merge(&mut self, other: &Species) {
        for (el, occ) in &other.occupancies {
            match self.occupancies.iter_mut().find(|(e, _)| e == el) {
                Some(entry) => entry.1 += occ,
                None => self.occupancies.push((el.clone(), *occ)),
            }
        }
    }
}

/// 满占据输出元素符号，否则输出 "Fe:0.500, Ni:0.500"
impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ordered() {
            return write!(f, "{}", self.occupancies[0].0);
        }
        let parts: Vec<String> = self
            .occupancies
            .iter()
            .map(|(el, occ)| format!("{}:{:.3}", el, occ))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// 结构中的一个位点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub species: Species,

    /// 分数坐标 [x, y, z]
    pub frac: [f64; 3],

    /// 笛卡尔坐标 (Å)
    pub cart: [f64; 3],

    /// 可选：CIF 原子标签
    pub label: Option<String>,
}

impl Site {
    pub fn new(species: Species, frac: [f64; 3], lattice: &Lattice) -> Self {
        Site {
            species,
            frac,
            cart: lattice.frac_to_cart(frac),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// 结构的周期性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Periodicity {
    /// 晶体（CIF），近邻搜索考虑周期像
    Periodic,
    /// 分子（XYZ），盒子仅为合成外壳
    Molecular,
}

/// 原子结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    /// 结构名称（通常为文件名主干）
    pub name: String,

    pub lattice: Lattice,

    pub sites: Vec<Site>,

    pub periodicity: Periodicity,

    /// CIF 中的 `_chemical_formula_sum`
    pub formula: Option<String>,

    /// CIF 中的 H-M 空间群符号
    pub space_group: Option<String>,
}

impl Structure {
    pub fn new(
        name: impl Into<String>,
        lattice: Lattice,
        sites: Vec<Site>,
        periodicity: Periodicity,
    ) -> Self {
        Structure {
            name: name.into(),
            lattice,
            sites,
            periodicity,
            formula: None,
            space_group: None,
        }
    }

    pub fn is_periodic(&self) -> bool {
        self.periodicity == Periodicity::Periodic
    }

    /// 所有位点均为满占据单一元素
    pub fn is_ordered(&self) -> bool {
        self.sites.iter().all(|s| s.species.is_ordered())
    }

    /// 结构中出现的元素（按首次出现顺序）
    pub fn elements(&self) -> Vec<String> {
        let mut elements: Vec<String> = Vec::new();
        for site in &self.sites {
            for el in site.species.elements() {
                if !elements.iter().any(|e| e == el) {
                    elements.push(el.to_string());
                }
            }
        }
        elements
    }

    /// 无序位点的分布（去重）
    pub fn disordered_species(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for site in self.sites.iter().filter(|s| !s.species.is_ordered()) {
            let s = site.species.to_string();
            if !out.contains(&s) {
                out.push(s);
            }
        }
        out
    }

    /// 计算化学式
    pub fn formula_from_sites(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for site in &self.sites {
            *counts.entry(site.species.primary()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// 分子中的原子（笛卡尔坐标）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoleculeAtom {
    pub element: String,
    pub position: [f64; 3],
}

/// XYZ 文件中的一帧
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Molecule {
    pub name: String,
    pub comment: String,
    pub atoms: Vec<MoleculeAtom>,
}

impl Molecule {
    /// 将分子包裹进合成的正交盒子
    ///
    /// 盒子边长取各方向坐标跨度（不小于 1 Å），角度 90°。盒子只是为了复用近邻搜索，
    /// 不代表物理晶胞；结构标记为 `Molecular`，不会生成周期像。
    pub fn to_structure(&self) -> Structure {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for atom in &self.atoms {
            for k in 0..3 {
                min[k] = min[k].min(atom.position[k]);
                max[k] = max[k].max(atom.position[k]);
            }
        }

        let mut edges = [MIN_BOX_EDGE; 3];
        for k in 0..3 {
            let extent = max[k] - min[k];
            if extent.is_finite() && extent > MIN_BOX_EDGE {
                edges[k] = extent;
            }
        }

        let lattice = Lattice::from_parameters(edges[0], edges[1], edges[2], 90.0, 90.0, 90.0);

        let sites = self
            .atoms
            .iter()
            .map(|atom| {
                let p = atom.position;
                Site {
                    species: Species::element(atom.element.clone()),
                    frac: [p[0] / edges[0], p[1] / edges[1], p[2] / edges[2]],
                    cart: p,
                    label: None,
                }
            })
            .collect();

        Structure::new(self.name.clone(), lattice, sites, Periodicity::Molecular)
    }
}
