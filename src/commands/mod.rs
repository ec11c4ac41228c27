//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `xas/`, `writers/`, `parsers/`, `utils/`
//! - 子模块: sites, cluster, fdmnes, feff, batch, info

pub mod batch;
pub mod cluster;
pub mod fdmnes;
pub mod feff;
pub mod info;
pub mod sites;

use crate::cli::structure::StructureArgs;
use crate::cli::Commands;
use crate::error::Result;
use crate::utils::output;
use crate::xas::SiteSession;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Sites(args) => sites::execute(args),
        Commands::Cluster(args) => cluster::execute(args),
        Commands::Fdmnes(args) => fdmnes::execute(args),
        Commands::Feff(args) => feff::execute(args),
        Commands::Batch(args) => batch::execute(args),
        Commands::Info(args) => info::execute(args),
    }
}

/// 打开结构文件，按参数选择帧与位点
pub(crate) fn open_session(args: &StructureArgs) -> Result<SiteSession> {
    let mut session = SiteSession::open(&args.input, &args.absorber)?;

    if let Some(frame) = args.frame {
        session.set_frame(frame)?;
    }
    session.set_site(args.site)?;

    let site = session.selected_site();
    output::print_info(&format!(
        "'{}': absorber {} at site {} ({}, {})",
        args.input.display(),
        session.absorber(),
        site.index,
        site.species,
        site.symmetry
    ));
    if !site.is_fully_occupied() {
        output::print_warning(&format!(
            "Site {} is partially occupied by {} ({:.3})",
            site.index,
            session.absorber(),
            site.occupancy
        ));
    }

    Ok(session)
}
