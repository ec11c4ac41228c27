//! # fdmnes 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/fdmnes.rs`

use super::structure::StructureArgs;
use clap::Args;
use std::path::PathBuf;

/// fdmnes 子命令参数
#[derive(Args, Debug)]
pub struct FdmnesArgs {
    #[command(flatten)]
    pub structure: StructureArgs,

    /// Calculation radius in Å
    #[arg(short, long, default_value_t = 6.0)]
    pub radius: f64,

    /// Job name; the input file is written as <NAME>.txt
    #[arg(short, long, default_value = "job_inp")]
    pub name: String,

    /// Directory holding fdmfile.txt (default: a fresh temporary directory)
    #[arg(long)]
    pub parent: Option<PathBuf>,

    /// Directory for the input file (default: same as --parent)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the SCF method only (omit the `green` keyword)
    #[arg(long, default_value_t = false)]
    pub no_green: bool,

    /// Custom template with {key} placeholders
    #[arg(long)]
    pub template: Option<PathBuf>,
}
