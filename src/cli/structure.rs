//! # 结构输入的公共参数
//!
//! 被 `sites`, `cluster`, `fdmnes`, `feff` 共用。

use clap::Args;
use std::path::PathBuf;

/// 结构文件与吸收原子
#[derive(Args, Debug, Clone)]
pub struct StructureArgs {
    /// Input structure file (.cif or .xyz)
    pub input: PathBuf,

    /// Absorbing element: symbol (Fe) or atomic number (26)
    #[arg(short, long)]
    pub absorber: String,

    /// Frame index for multi-frame XYZ files
    #[arg(long)]
    pub frame: Option<usize>,

    /// Index of the absorbing site (see `xasgen sites`)
    #[arg(short, long, default_value_t = 0)]
    pub site: usize,
}
