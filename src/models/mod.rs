//! # 数据模型模块
//!
//! 定义结构、吸收位点和团簇原子的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `xas/`, `writers/` 和 `commands/` 使用
//! - 子模块: structure, site, elements

pub mod elements;
pub mod site;
pub mod structure;

pub use site::{AbsorbingSite, ClusterAtom, ClusterSpecies, SiteSymmetry};
pub use structure::{Lattice, Molecule, MoleculeAtom, Periodicity, Site, Species, Structure};
