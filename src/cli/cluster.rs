//! # cluster 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/cluster.rs`

use super::structure::StructureArgs;
use clap::Args;
use std::path::PathBuf;

/// cluster 子命令参数
#[derive(Args, Debug)]
pub struct ClusterArgs {
    #[command(flatten)]
    pub structure: StructureArgs,

    /// Cluster radius in Å (rounded up to 0.01 Å)
    #[arg(short, long, default_value_t = 2.5)]
    pub radius: f64,

    /// Write the cluster as an XYZ file
    #[arg(long)]
    pub xyz: Option<PathBuf>,

    /// Maximum number of atoms to print (0 = all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
}
