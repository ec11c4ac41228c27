//! # fdmnes 子命令实现
//!
//! ## 依赖关系
//! - 使用 `cli/fdmnes.rs` 定义的 FdmnesArgs
//! - 使用 `writers/fdmnes.rs`

use super::open_session;
use crate::cli::fdmnes::FdmnesArgs;
use crate::error::{Result, XasError};
use crate::utils::output;
use crate::writers::fdmnes::{write_fdmnes, FdmnesOptions};

/// 执行 fdmnes 命令
pub fn execute(args: FdmnesArgs) -> Result<()> {
    output::print_header("FDMNES Input Generation");

    let session = open_session(&args.structure)?;
    let options = options_from_args(&args)?;

    if !options.green {
        output::print_info("Green method disabled, using SCF with finite differences");
    }

    let written = write_fdmnes(&session, &options)?;

    output::print_written("FDMNES input", &written.input_path);
    output::print_written("Manifest", &written.manifest_path);
    output::print_done("FDMNES input ready");
    Ok(())
}

fn options_from_args(args: &FdmnesArgs) -> Result<FdmnesOptions> {
    if args.name.trim().is_empty() || args.name.contains(|c: char| c == '/' || c == '\\') {
        return Err(XasError::InvalidArgument(format!(
            "Job name must be a plain file stem, got '{}'",
            args.name
        )));
    }

    Ok(FdmnesOptions {
        radius: args.radius,
        green: !args.no_green,
        name: args.name.clone(),
        parent_dir: args.parent.clone(),
        output_dir: args.output.clone(),
        template: args.template.clone(),
    })
}
