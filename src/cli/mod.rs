//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `sites`: 列出候选吸收位点
//! - `cluster`: 显示/导出吸收原子周围的团簇
//! - `fdmnes`: 生成 FDMNES 输入文件
//! - `feff`: 生成 FEFF 输入文件
//! - `batch`: 由配置文件批量生成基于 CIF 的 FDMNES 输入与清单
//! - `info`: 读取 FDMNES 输出的头部信息与光谱
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: structure, sites, cluster, fdmnes, feff, batch, info

pub mod batch;
pub mod cluster;
pub mod fdmnes;
pub mod feff;
pub mod info;
pub mod sites;
pub mod structure;

use clap::{Parser, Subcommand};

/// xasgen - X 射线吸收谱输入文件生成工具
#[derive(Parser)]
#[command(name = "xasgen")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Generate FDMNES and FEFF inputs from CIF and XYZ structures", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print debug diagnostics (RUST_LOG overrides)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// List symmetry-distinct absorbing sites of an element
    Sites(sites::SitesArgs),

    /// Show the cluster of atoms around an absorbing site
    Cluster(cluster::ClusterArgs),

    /// Write an FDMNES input file and register it in fdmfile.txt
    Fdmnes(fdmnes::FdmnesArgs),

    /// Write a FEFF input file (feff.inp)
    Feff(feff::FeffArgs),

    /// Generate CIF-based FDMNES inputs and a fresh fdmfile.txt from a config file
    Batch(batch::BatchArgs),

    /// Read edge energy, Z and Fermi level from an FDMNES output file
    Info(info::InfoArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_feff_args() {
        let cli = Cli::try_parse_from([
            "xasgen", "feff", "Fe2O3.cif", "-a", "Fe", "--site", "1", "--debye", "300", "450",
            "--seed", "7", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Feff(args) => {
                assert_eq!(args.structure.absorber, "Fe");
                assert_eq!(args.structure.site, 1);
                assert_eq!(args.debye, Some(vec![300.0, 450.0]));
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.edge, "K");
            }
            _ => panic!("expected feff command"),
        }
    }
}
