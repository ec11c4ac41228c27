//! # 进度条
//!
//! `batch` 命令逐个写输入文件时的 `indicatif` 进度条。

use indicatif::{ProgressBar, ProgressStyle};

/// 按文件计数的进度条，`message` 显示在右侧
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style.progress_chars("#>-"));
    pb.set_message(message.to_string());
    pb
}
