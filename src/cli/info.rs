//! # info 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/info.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 光谱图格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PlotFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
}

impl PlotFormat {
    /// 由文件扩展名推断，未知扩展名按 PNG 处理
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => PlotFormat::Svg,
            _ => PlotFormat::Png,
        }
    }
}

/// info 子命令参数
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// FDMNES output file (the input must contain the `Header` keyword)
    pub input: PathBuf,

    /// Plot the spectrum (.png or .svg)
    #[arg(short, long)]
    pub plot: Option<PathBuf>,

    /// Plot format (default: inferred from the --plot extension)
    #[arg(long, value_enum)]
    pub format: Option<PlotFormat>,

    /// Export the spectrum as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Title for the plot (default: file name)
    #[arg(long)]
    pub title: Option<String>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_plot_format_from_path() {
        assert_eq!(PlotFormat::from_path(Path::new("a.SVG")), PlotFormat::Svg);
        assert_eq!(PlotFormat::from_path(Path::new("a.png")), PlotFormat::Png);
        assert_eq!(PlotFormat::from_path(Path::new("spectrum")), PlotFormat::Png);
    }
}
