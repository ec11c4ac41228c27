//! # xasgen - X 射线吸收谱输入生成工具
//!
//! 从 CIF / XYZ 结构生成 FDMNES 与 FEFF 输入文件，统一成单一可执行文件。
//!
//! ## 子命令
//! - `sites`   - 列出对称不等价的吸收位点
//! - `cluster` - 吸收原子周围的团簇
//! - `fdmnes`  - 写 FDMNES 输入并更新 fdmfile.txt
//! - `feff`    - 写 FEFF 输入 (feff.inp)
//! - `batch`   - 由配置文件批量生成 FDMNES 输入与清单
//! - `info`    - 读取 FDMNES 输出头部与光谱
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (CIF / XYZ / FDMNES 输出解析)
//!   │     ├── xas/       (对称性、吸收位点、团簇)
//!   │     ├── writers/   (FDMNES / FEFF / XYZ / 清单)
//!   │     ├── batch/     (文件收集与批处理)
//!   │     └── spectrum/  (光谱绘图与导出)
//!   ├── config.rs   (批处理配置)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod error;
mod models;
mod parsers;
mod spectrum;
mod utils;
mod writers;
mod xas;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = commands::run(cli.command) {
        log::debug!("{:?}", e);
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
