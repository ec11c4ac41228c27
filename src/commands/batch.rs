//! # batch 子命令实现
//!
//! 按 `fdmgen-config.txt` 为一组 CIF 文件生成 FDMNES 输入（`Cif_file` 方式），
//! 归档旧的 `fdmfile.txt` 并写出新清单。
//!
//! ## 流程
//! 1. 读取配置、解析吸收元素的原子序数
//! 2. 收集 CIF 文件并打印化学式/空间群
//! 3. 逐个写出 `<INPUT_DIR>/<name>_<Z>.txt`
//! 4. 归档旧清单，写入新清单
//!
//! ## 依赖关系
//! - 使用 `cli/batch.rs` 定义的 BatchArgs
//! - 使用 `config.rs`, `batch/`, `writers/fdmgen.rs`, `writers/manifest.rs`

use crate::batch::{BatchResult, BatchRunner, FileCollector, ProcessResult};
use crate::cli::batch::BatchArgs;
use crate::config::BatchConfig;
use crate::error::{Result, XasError};
use crate::models::elements::{atomic_number, resolve_element};
use crate::parsers::cif::read_cif_summary;
use crate::utils::output;
use crate::writers::fdmgen::{target_path, write_cif_input};
use crate::writers::manifest::{archive_existing, Manifest};

use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// CIF 概要表格行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "Space group")]
    space_group: String,
}

/// 执行 batch 命令
pub fn execute(args: BatchArgs) -> Result<()> {
    output::print_header("FDMNES Batch Generation");

    let config = BatchConfig::from_file(&args.config)?;
    output::print_info(&format!(
        "Config '{}': INPUT_DIR '{}', OUTPUT_DIR '{}', RADIUS {}",
        args.config.display(),
        config.input_dir.display(),
        config.output_dir,
        config.radius
    ));

    let absorber = resolve_element(&args.absorber)?;
    let z = atomic_number(absorber).ok_or_else(|| XasError::UnknownElement(absorber.to_string()))?;

    let files = FileCollector::new(args.inputs.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} CIF files, absorber {} (Z = {})", files.len(), absorber, z));
    print_summary(&files);

    if let Some(archived) = archive_existing(&args.manifest)? {
        output::print_info(&format!(
            "Previous manifest archived as '{}'",
            archived.display()
        ));
    }

    // 详细日志会打乱进度条
    let mut runner = BatchRunner::new("Writing inputs");
    if log::log_enabled!(log::Level::Info) {
        runner = runner.quiet();
    }
    let result = generate(&runner, &files, z, &config);

    let manifest = Manifest::new(result.outputs.clone());
    if manifest.is_empty() {
        output::print_warning("No input was written, the manifest will be empty");
    }
    manifest.write(&args.manifest)?;

    // 打印统计
    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {}/{} written, {} skipped, {} failed",
        result.success,
        result.total(),
        result.skipped,
        result.failed
    ));

    for path in &result.skipped_files {
        output::print_warning(&format!("Skipped (no usable file name): {}", path));
    }

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    output::print_done(&format!(
        "Manifest '{}' lists {} inputs",
        args.manifest.display(),
        manifest.len()
    ));
    Ok(())
}

/// 逐个写出输入文件，成功项的输出为清单中的路径
fn generate(runner: &BatchRunner, files: &[PathBuf], z: u32, config: &BatchConfig) -> BatchResult {
    runner.run(files, |file| {
        let path_str = file.display().to_string();
        let Some(name) = file.file_stem().and_then(|s| s.to_str()) else {
            return ProcessResult::Skipped(path_str);
        };

        match write_cif_input(name, file, z, config) {
            Ok(input) => ProcessResult::Success(target_path(&input, config.unix)),
            Err(e) => ProcessResult::Failed(path_str, e.to_string()),
        }
    })
}

fn print_summary(files: &[PathBuf]) {
    let rows: Vec<SummaryRow> = files.iter().map(|f| summary_row(f)).collect();
    println!("{}", Table::new(&rows));
}

fn summary_row(file: &Path) -> SummaryRow {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    match read_cif_summary(file) {
        Ok(summary) => SummaryRow {
            file: name,
            formula: summary.formula.unwrap_or_else(|| "-".to_string()),
            space_group: summary.space_group.unwrap_or_else(|| "-".to_string()),
        },
        Err(e) => {
            log::warn!("Cannot read CIF header of {}: {}", file.display(), e);
            SummaryRow {
                file: name,
                formula: "?".to_string(),
                space_group: "?".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn config(input_dir: PathBuf) -> BatchConfig {
        BatchConfig {
            unix: true,
            input_dir,
            output_dir: "out".to_string(),
            radius: "6.0".to_string(),
            green: false,
            scf: true,
            quadrupole: false,
            density: false,
            oxide: false,
        }
    }

    #[test]
    fn test_generate_writes_inputs_in_order() {
        let dir = tempdir().unwrap();
        let files = vec![dir.path().join("b.cif"), dir.path().join("a.cif")];
        for f in &files {
            fs::write(f, "data_x\n").unwrap();
        }
        let conf = config(dir.path().join("inputs"));

        let result = generate(&BatchRunner::new("test").quiet(), &files, 26, &conf);

        assert_eq!(result.success, 2);
        assert_eq!(result.failed, 0);
        assert!(result.outputs[0].ends_with("inputs/b_26.txt"));
        assert!(result.outputs[1].ends_with("inputs/a_26.txt"));
        assert!(dir.path().join("inputs").join("a_26.txt").is_file());

        let deck = fs::read_to_string(dir.path().join("inputs").join("b_26.txt")).unwrap();
        assert!(deck.contains("Z_absorber\n26"));
    }

    #[test]
    fn test_generate_skips_paths_without_stem() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.cif");
        fs::write(&good, "data_x\n").unwrap();
        let files = vec![PathBuf::from(".."), good];
        let conf = config(dir.path().join("inputs"));

        let result = generate(&BatchRunner::new("test").quiet(), &files, 26, &conf);

        assert_eq!(result.total(), 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.skipped_files, vec![".."]);
        assert_eq!(result.failed, 0);

        let manifest = Manifest::new(result.outputs);
        assert_eq!(manifest.len(), 1);
        assert!(!manifest.is_empty());
    }

    #[test]
    fn test_summary_row_fallbacks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.cif");
        fs::write(&path, "data_x\n_chemical_formula_sum 'Fe2 O3'\n").unwrap();

        let row = summary_row(&path);
        assert_eq!(row.file, "x.cif");
        assert_eq!(row.formula, "Fe2 O3");
        assert_eq!(row.space_group, "-");

        let missing = summary_row(&dir.path().join("missing.cif"));
        assert_eq!(missing.formula, "?");
    }
}
