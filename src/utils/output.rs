//! # 终端输出样式
//!
//! 所有命令共用的彩色状态前缀与标题栏。
//! 诊断信息走 `log`，这里只负责面向用户的结果行。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `batch/runner.rs` 使用
//! - 使用 `colored` crate

use colored::Colorize;
use std::path::Path;

pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 错误写到 stderr
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 写出文件后的结果行：`[OK] <what> -> <path>`
pub fn print_written(what: &str, path: &Path) {
    println!(
        "{} {} {} {}",
        "[OK]".green().bold(),
        what,
        "->".cyan(),
        path.display().to_string().bold()
    );
}

/// 命令标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {} {}", "xasgen".cyan().bold(), title.bold());
    println!("{}\n", line.dimmed());
}

pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}
