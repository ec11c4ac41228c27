//! # 吸收位点与团簇原子模型
//!
//! ## 依赖关系
//! - 被 `xas/` 产生，被 `writers/` 与 `commands/` 消费
//! - 使用 `models/structure.rs` 的 `Species`

use super::structure::Species;
use serde::Serialize;
use std::fmt;

/// 位点的对称性标记
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SiteSymmetry {
    /// Wyckoff 标记，如 "4a"
    Wyckoff(String),
    /// 非周期结构没有对称性
    None,
}

impl fmt::Display for SiteSymmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSymmetry::Wyckoff(w) => write!(f, "{}", w),
            SiteSymmetry::None => write!(f, "-"),
        }
    }
}

/// 一个对称不等价的候选吸收位点
#[derive(Debug, Clone, Serialize)]
pub struct AbsorbingSite {
    /// 在候选列表中的下标（用于选择位点）
    pub index: usize,

    /// 在全部轨道中的下标（FDMNES `Absorber` 关键字使用 orbit + 1）
    pub orbit: usize,

    /// 物种标签，如 "Fe"、"Fe:0.500, Ni:0.500" 或分子中的 "Fe0"
    pub species: String,

    /// 分数坐标（保留 4 位小数）；分子为 None
    pub frac_coords: Option<[f64; 3]>,

    pub symmetry: SiteSymmetry,

    /// 笛卡尔坐标 (Å，保留 4 位小数)
    pub cart_coords: [f64; 3],

    /// 吸收元素在该位点的占据率
    pub occupancy: f64,

    /// 在结构位点列表中的下标
    pub structure_index: usize,
}

impl AbsorbingSite {
    pub fn is_fully_occupied(&self) -> bool {
        (self.occupancy - 1.0).abs() < 1e-6
    }
}

/// 团簇中原子的元素信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ClusterSpecies {
    /// 吸收原子本身
    Absorber(String),
    /// 满占据单一元素
    Ordered(String),
    /// 部分占据：保留完整分布，由各输出格式自行抽样
    Disordered(Species),
}

impl ClusterSpecies {
    pub fn from_species(species: &Species) -> Self {
        if species.is_ordered() {
            ClusterSpecies::Ordered(species.primary().to_string())
        } else {
            ClusterSpecies::Disordered(species.clone())
        }
    }

    /// 输出标签："Fe(abs)"、"O" 或分布字符串
    pub fn tag(&self) -> String {
        match self {
            ClusterSpecies::Absorber(el) => format!("{}(abs)", el),
            ClusterSpecies::Ordered(el) => el.clone(),
            ClusterSpecies::Disordered(sp) => sp.to_string(),
        }
    }

    /// 主元素符号
    pub fn primary(&self) -> &str {
        match self {
            ClusterSpecies::Absorber(el) | ClusterSpecies::Ordered(el) => el,
            ClusterSpecies::Disordered(sp) => sp.primary(),
        }
    }

    pub fn is_absorber(&self) -> bool {
        matches!(self, ClusterSpecies::Absorber(_))
    }
}

/// 吸收原子周围球内的一个原子
#[derive(Debug, Clone, Serialize)]
pub struct ClusterAtom {
    pub species: ClusterSpecies,

    /// 相对吸收原子的笛卡尔位移 (Å)
    pub position: [f64; 3],

    /// 到吸收原子的距离 (Å，保留 5 位小数)
    pub distance: f64,

    /// 在结构位点列表中的下标
    pub structure_index: usize,
}
