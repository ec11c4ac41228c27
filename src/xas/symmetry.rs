//! # 对称性分析
//!
//! 调用 `moyo` 将周期性结构的位点划分为对称轨道，并给出空间群号与 Wyckoff 标记。
//! 不同的占据分布映射为不同的类型号，因此无序位点只会与分布完全相同的位点等价。
//!
//! ## 依赖关系
//! - 被 `xas/sites.rs` 与 `writers/fdmnes.rs` 使用
//! - 使用 `moyo`, `nalgebra`

use crate::error::{Result, XasError};
use crate::models::Structure;

use moyo::base::{AngleTolerance, Cell, Lattice};
use moyo::data::Setting;
use moyo::MoyoDataset;
use nalgebra::Vector3;

/// 对称性搜索的距离容差 (Å)
pub const SYMPREC: f64 = 1e-2;

/// 一个对称轨道
#[derive(Debug, Clone)]
pub struct Orbit {
    /// 轨道内全部位点（结构位点下标，升序）
    pub members: Vec<usize>,

    /// 代表位点：分数坐标 (|x|, |y|, |z|) 字典序最小者
    pub representative: usize,

    /// 多重度 + Wyckoff 字母，如 "4a"
    pub wyckoff: String,
}

/// 对称性分析结果
#[derive(Debug, Clone)]
pub struct SymmetryAnalysis {
    /// 国际空间群号
    pub number: i32,

    /// 按首个成员下标排序的轨道
    pub orbits: Vec<Orbit>,
}

/// 对周期性结构做对称性分析
pub fn analyze(structure: &Structure) -> Result<SymmetryAnalysis> {
    if structure.sites.is_empty() {
        return Err(XasError::Symmetry("Structure has no sites".to_string()));
    }

    // 以占据分布的字符串表示作为类型键
    let mut compositions: Vec<String> = Vec::new();
    let mut numbers = Vec::with_capacity(structure.sites.len());
    let mut positions = Vec::with_capacity(structure.sites.len());

    for site in &structure.sites {
        let key = site.species.to_string();
        let id = match compositions.iter().position(|c| *c == key) {
            Some(id) => id,
            None => {
                compositions.push(key);
                compositions.len() - 1
            }
        };
        numbers.push(id as i32 + 1);
        positions.push(Vector3::new(site.frac[0], site.frac[1], site.frac[2]));
    }

    let cell = Cell::new(
        Lattice::new(structure.lattice.as_matrix()),
        positions,
        numbers,
    );

    let dataset = MoyoDataset::new(
        &cell,
        SYMPREC,
        AngleTolerance::Default,
        Setting::Spglib,
        true,
    )
    .map_err(|e| XasError::Symmetry(format!("moyo symmetry search failed: {:?}", e)))?;

    let mut orbits: Vec<Orbit> = Vec::new();
    let mut orbit_keys: Vec<usize> = Vec::new();

    for (i, &key) in dataset.orbits.iter().enumerate() {
        match orbit_keys.iter().position(|&k| k == key) {
            Some(pos) => orbits[pos].members.push(i),
            None => {
                orbit_keys.push(key);
                orbits.push(Orbit {
                    members: vec![i],
                    representative: i,
                    wyckoff: String::new(),
                });
            }
        }
    }

    for orbit in &mut orbits {
        orbit.representative = pick_representative(structure, &orbit.members);
        let letter = dataset
            .wyckoffs
            .get(orbit.members[0])
            .copied()
            .unwrap_or('?');
        orbit.wyckoff = format!("{}{}", orbit.members.len(), letter);
    }

    log::debug!(
        "{}: space group {}, {} orbits from {} sites",
        structure.name,
        dataset.number,
        orbits.len(),
        structure.sites.len()
    );

    Ok(SymmetryAnalysis {
        number: dataset.number,
        orbits,
    })
}

/// 选出 (|x|, |y|, |z|) 字典序最小的成员，相同时取下标较小者
fn pick_representative(structure: &Structure, members: &[usize]) -> usize {
    let key = |i: usize| {
        let f = structure.sites[i].frac;
        [f[0].abs(), f[1].abs(), f[2].abs()]
    };

    let mut best = members[0];
    for &m in &members[1..] {
        let (a, b) = (key(m), key(best));
        let ordering = a[0]
            .total_cmp(&b[0])
            .then(a[1].total_cmp(&b[1]))
            .then(a[2].total_cmp(&b[2]));
        if ordering == std::cmp::Ordering::Less {
            best = m;
        }
    }
    best
}
