//! # 基于 CIF 的 FDMNES 批处理输入
//!
//! 由 `BatchConfig` 驱动：输入文件直接通过 `Cif_file` 引用 CIF，
//! 吸收原子用 `Z_absorber` 指定，由 FDMNES 自行处理对称性。
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 使用
//! - 使用 `config.rs`

use super::write_text;
use crate::config::BatchConfig;
use crate::error::Result;

use std::path::{Path, PathBuf};

/// 默认能量范围
pub const RANGE_DEFAULT: &str = "-30.0 0.1 70.0 1.0 100";

/// 任务名：`<name>_<Z>`
pub fn job_name(name: &str, z_absorber: u32) -> String {
    format!("{}_{}", name, z_absorber)
}

/// Unix 目标时统一使用 `/` 分隔
pub fn target_path(path: &Path, unix: bool) -> String {
    let s = path.display().to_string();
    if unix {
        s.replace('\\', "/")
    } else {
        s
    }
}

/// 渲染输入文本
pub fn render_cif_input(name: &str, cif_path: &Path, z_absorber: u32, conf: &BatchConfig) -> String {
    let outpath = target_path(
        &Path::new(&conf.output_dir).join(job_name(name, z_absorber)),
        conf.unix,
    );

    let mut out = String::new();
    out.push_str("! FDMNES input file generated by xasgen\n\n");
    out.push_str("header\n\n");
    out.push_str(&format!("filout\n{}\n\n", outpath));
    out.push_str(&format!("range\n{}\n\n", RANGE_DEFAULT));
    out.push_str(&format!("radius\n{}\n\n", conf.radius));

    if conf.quadrupole {
        out.push_str("quadrupole\n\n");
    }
    if conf.density {
        out.push_str("density\n\n");
    }
    if conf.scf {
        out.push_str("SCF\n\n");
    }
    if conf.green {
        out.push_str("green\n\n");
    }
    if conf.oxide {
        out.push_str("Rpotmax\n15\n\nFull_atom\n\n");
    }

    out.push_str(&format!(
        "Z_absorber\n{}\n\nCif_file\n{}\n\nend",
        z_absorber,
        target_path(cif_path, conf.unix)
    ));
    out
}

/// 写入 `<INPUT_DIR>/<name>_<Z>.txt`，返回写入路径
pub fn write_cif_input(
    name: &str,
    cif_path: &Path,
    z_absorber: u32,
    conf: &BatchConfig,
) -> Result<PathBuf> {
    let path = conf
        .input_dir
        .join(format!("{}.txt", job_name(name, z_absorber)));
    write_text(&path, &render_cif_input(name, cif_path, z_absorber, conf))?;
    log::info!("Written FDMNES input -> {}", path.display());
    Ok(path)
}
