//! # 吸收位点模型
//!
//! 给定结构与吸收元素：
//! 1. 枚举对称不等价的候选吸收位点
//! 2. 选择其中一个位点
//! 3. 提取该位点周围按距离排序的原子团簇
//!
//! 结果由 `writers/` 写成 FDMNES / FEFF 输入文件。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`, `parsers/`
//! - 子模块: symmetry, sites, cluster, occupancy, session

pub mod cluster;
pub mod occupancy;
pub mod session;
pub mod sites;
pub mod symmetry;

pub use occupancy::OccupancySampler;
pub use session::SiteSession;
