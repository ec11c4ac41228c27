//! # feff 子命令实现
//!
//! ## 依赖关系
//! - 使用 `cli/feff.rs` 定义的 FeffArgs
//! - 使用 `writers/feff.rs`

use super::open_session;
use crate::cli::feff::FeffArgs;
use crate::error::{Result, XasError};
use crate::utils::output;
use crate::writers::feff::{write_feff, FeffOptions};

/// 执行 feff 命令
pub fn execute(args: FeffArgs) -> Result<()> {
    output::print_header("FEFF Input Generation");

    let session = open_session(&args.structure)?;
    let options = options_from_args(&args)?;

    if !session.structure().is_ordered() {
        output::print_warning(&format!(
            "Disordered sites ({}) resolved by random draw{}",
            session.structure().disordered_species().join("; "),
            match options.seed {
                Some(seed) => format!(" (seed {})", seed),
                None => String::new(),
            }
        ));
    }

    let path = write_feff(&session, &options)?;

    output::print_written("FEFF input", &path);
    output::print_done("FEFF input ready");
    Ok(())
}

fn options_from_args(args: &FeffArgs) -> Result<FeffOptions> {
    let debye = match args.debye.as_deref() {
        None => None,
        Some([temperature, theta]) => Some((*temperature, *theta)),
        Some(other) => {
            return Err(XasError::InvalidArgument(format!(
                "--debye expects 2 values, got {}",
                other.len()
            )))
        }
    };

    if let Some(sig2) = args.sig2 {
        if sig2.is_nan() || sig2 < 0.0 {
            return Err(XasError::InvalidArgument(format!(
                "SIG2 must be non-negative, got {}",
                sig2
            )));
        }
    }

    Ok(FeffOptions {
        radius: args.radius,
        edge: args.edge.trim().to_uppercase(),
        feff_comment: args.feff_comment.clone(),
        sig2: args.sig2,
        debye,
        seed: args.seed,
        parent_dir: args.output.clone(),
        template: args.template.clone(),
    })
}
