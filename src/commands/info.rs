//! # info 子命令实现
//!
//! 读取 FDMNES 输出的吸收边能量、吸收原子 Z 与费米能级，
//! 可选绘制光谱或导出 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/info.rs` 定义的 InfoArgs
//! - 使用 `parsers/fdmnes_out.rs`, `spectrum/`

use crate::cli::info::{InfoArgs, PlotFormat};
use crate::error::Result;
use crate::models::elements;
use crate::parsers::fdmnes_out::parse_fdmnes_output;
use crate::spectrum::{export, plot};
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Tabled)]
struct InfoRow {
    #[tabled(rename = "Quantity")]
    quantity: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// 执行 info 命令
pub fn execute(args: InfoArgs) -> Result<()> {
    output::print_header("FDMNES Output Info");

    let spectrum = parse_fdmnes_output(&args.input)?;

    let element = elements::symbol(spectrum.z).unwrap_or("?");
    let mut rows = vec![
        InfoRow {
            quantity: "E_edge (eV)",
            value: format!("{}", spectrum.e_edge),
        },
        InfoRow {
            quantity: "Z",
            value: format!("{} ({})", spectrum.z, element),
        },
        InfoRow {
            quantity: "E_Fermi (eV)",
            value: format!("{}", spectrum.e_fermi),
        },
        InfoRow {
            quantity: "Points",
            value: spectrum.data.len().to_string(),
        },
    ];
    if let Some((e_min, e_max)) = spectrum.energy_range() {
        rows.push(InfoRow {
            quantity: "Energy range (eV)",
            value: format!("{:.2} .. {:.2}", e_min, e_max),
        });
    }
    println!("{}", Table::new(&rows));

    if let Some(ref csv_path) = args.csv {
        export::to_csv(&spectrum, csv_path)?;
        output::print_written("Spectrum CSV", csv_path);
    }

    if let Some(ref plot_path) = args.plot {
        let format = args.format.unwrap_or_else(|| PlotFormat::from_path(plot_path));
        let title = args.title.clone().unwrap_or_else(|| spectrum.name.clone());
        plot::generate_spectrum_plot(
            &spectrum,
            plot_path,
            &title,
            args.width,
            args.height,
            format == PlotFormat::Svg,
        )?;
        output::print_written("Spectrum plot", plot_path);
    }

    Ok(())
}
