//! # sites 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/sites.rs`

use super::structure::StructureArgs;
use clap::Args;
use std::path::PathBuf;

/// sites 子命令参数
#[derive(Args, Debug)]
pub struct SitesArgs {
    #[command(flatten)]
    pub structure: StructureArgs,

    /// Also save the site table as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
