//! # feff 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/feff.rs`

use super::structure::StructureArgs;
use clap::Args;
use std::path::PathBuf;

/// feff 子命令参数
#[derive(Args, Debug)]
pub struct FeffArgs {
    #[command(flatten)]
    pub structure: StructureArgs,

    /// RPATH radius in Å
    #[arg(short, long, default_value_t = 6.0)]
    pub radius: f64,

    /// Absorption edge (K, L1, L2, L3, ...)
    #[arg(short, long, default_value = "K")]
    pub edge: String,

    /// SIG2 value in Å² (the SIG2 card is commented out when omitted)
    #[arg(long)]
    pub sig2: Option<f64>,

    /// DEBYE card: temperature and Debye temperature in K
    #[arg(long, num_args = 2, value_names = ["TEMP", "THETA_D"])]
    pub debye: Option<Vec<f64>>,

    /// Prefix for the SCF and FMS cards ("*" comments them out)
    #[arg(long, default_value = "*", allow_hyphen_values = true)]
    pub feff_comment: String,

    /// Random seed for resolving partial occupancies
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output directory for feff.inp (default: a fresh temporary directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Custom template with {key} placeholders
    #[arg(long)]
    pub template: Option<PathBuf>,
}
