//! # batch 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/batch.rs`

use crate::config::CONFIG_FILE_NAME;
use crate::writers::manifest::MANIFEST_NAME;
use clap::Args;
use std::path::PathBuf;

/// batch 子命令参数
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// CIF files and/or directories containing CIF files
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Absorbing element: symbol (Fe) or atomic number (26)
    #[arg(short, long)]
    pub absorber: String,

    /// Batch configuration file
    #[arg(short, long, env = "XASGEN_CONFIG", default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Manifest file to (re)create; an existing one is archived first
    #[arg(short, long, default_value = MANIFEST_NAME)]
    pub manifest: PathBuf,

    // ─────────────────────────────────────────────────────────────
    // 文件收集参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for files inside directories (comma-separated)
    #[arg(long, default_value = "*.cif,*.CIF")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(long, default_value_t = false)]
    pub recursive: bool,
}
