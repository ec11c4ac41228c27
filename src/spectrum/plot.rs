//! # 光谱图表生成
//!
//! 使用 `plotters` 绘制 FDMNES 吸收谱，支持 PNG 与 SVG 输出。
//! 费米能级以虚线标出。
//!
//! ## 依赖关系
//! - 被 `commands/info.rs` 调用
//! - 使用 `spectrum::Spectrum`

use crate::error::{Result, XasError};
use crate::spectrum::Spectrum;

use plotters::prelude::*;
use std::path::Path;

/// 生成光谱图
pub fn generate_spectrum_plot(
    spectrum: &Spectrum,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if spectrum.data.is_empty() {
        return Err(XasError::InvalidArgument(format!(
            "Spectrum '{}' has no data points to plot",
            spectrum.name
        )));
    }

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_spectrum_chart(&root, spectrum, title)?;
        root.present().map_err(|e| XasError::Other(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_spectrum_chart(&root, spectrum, title)?;
        root.present().map_err(|e| XasError::Other(e.to_string()))?;
    }
    Ok(())
}

fn draw_spectrum_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    spectrum: &Spectrum,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| XasError::Other(format!("{:?}", e)))?;

    let (x_min, x_max) = spectrum.energy_range().unwrap_or((-10.0, 50.0));
    let y_max = spectrum.max_mu().unwrap_or(1.0).max(1e-6) * 1.1;
    let y_min = spectrum
        .data
        .iter()
        .map(|(_, mu)| *mu)
        .fold(0.0_f64, f64::min);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| XasError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("E - E0 (eV)")
        .y_desc("μ (arb. units)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| XasError::Other(format!("{:?}", e)))?;

    let line_color = RGBColor(0, 102, 204);
    chart
        .draw_series(LineSeries::new(
            spectrum.data.iter().copied(),
            line_color.stroke_width(2),
        ))
        .map_err(|e| XasError::Other(format!("{:?}", e)))?;

    // 费米能级
    if spectrum.e_fermi >= x_min && spectrum.e_fermi <= x_max {
        let fermi_color = RGBColor(204, 51, 0);
        chart
            .draw_series(DashedLineSeries::new(
                vec![(spectrum.e_fermi, y_min), (spectrum.e_fermi, y_max)],
                6,
                4,
                fermi_color.stroke_width(1),
            ))
            .map_err(|e| XasError::Other(format!("{:?}", e)))?;
    }

    let info_text = format!("E_edge = {:.2} eV, Z = {}", spectrum.e_edge, spectrum.z);
    chart
        .draw_series(std::iter::once(Text::new(
            info_text,
            (x_min + 0.05 * (x_max - x_min), y_max * 0.95),
            ("sans-serif", 14).into_font().color(&BLACK),
        )))
        .map_err(|e| XasError::Other(format!("{:?}", e)))?;

    Ok(())
}
