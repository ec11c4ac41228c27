//! # sites 子命令实现
//!
//! 列出吸收元素的对称不等价位点，可选导出 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/sites.rs` 定义的 SitesArgs
//! - 使用 `xas/session.rs`

use super::open_session;
use crate::cli::sites::SitesArgs;
use crate::error::{Result, XasError};
use crate::models::AbsorbingSite;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 位点表格行
#[derive(Debug, Clone, Tabled)]
struct SiteRow {
    #[tabled(rename = "Site")]
    index: usize,
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "Wyckoff")]
    wyckoff: String,
    #[tabled(rename = "Fractional")]
    frac: String,
    #[tabled(rename = "Cartesian (Å)")]
    cart: String,
    #[tabled(rename = "Occ.")]
    occupancy: String,
}

impl From<&AbsorbingSite> for SiteRow {
    fn from(site: &AbsorbingSite) -> Self {
        SiteRow {
            index: site.index,
            species: site.species.clone(),
            wyckoff: site.symmetry.to_string(),
            frac: site
                .frac_coords
                .map(format_coords)
                .unwrap_or_else(|| "-".to_string()),
            cart: format_coords(site.cart_coords),
            occupancy: format!("{:.3}", site.occupancy),
        }
    }
}

fn format_coords(c: [f64; 3]) -> String {
    format!("{:.4} {:.4} {:.4}", c[0], c[1], c[2])
}

/// 执行 sites 命令
pub fn execute(args: SitesArgs) -> Result<()> {
    output::print_header("Absorbing Sites");

    let session = open_session(&args.structure)?;
    let structure = session.structure();

    if let Some(symmetry) = session.symmetry() {
        let formula = structure
            .formula
            .clone()
            .unwrap_or_else(|| structure.formula_from_sites());
        output::print_info(&format!(
            "{} ({}), V = {:.3} Å³, {} sites",
            formula,
            structure.space_group.as_deref().unwrap_or("?"),
            structure.lattice.volume().abs(),
            structure.sites.len()
        ));
        output::print_info(&format!(
            "Space group #{} ({} orbits), elements: {}",
            symmetry.number,
            symmetry.orbits.len(),
            session.elements().join(", ")
        ));
    } else {
        output::print_info(&format!(
            "Molecule '{}', frame {}/{}, {} atoms",
            structure.name,
            session.frame() + 1,
            session.frame_count(),
            structure.sites.len()
        ));
    }

    let rows: Vec<SiteRow> = session.sites().iter().map(SiteRow::from).collect();
    println!("{}", Table::new(&rows));

    if let Some(ref csv_path) = args.csv {
        write_sites_csv(session.sites(), csv_path)?;
        output::print_written("Site table", csv_path);
    }

    Ok(())
}

/// 保存位点表到 CSV
fn write_sites_csv(sites: &[AbsorbingSite], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "site", "species", "wyckoff", "frac_x", "frac_y", "frac_z", "x", "y", "z", "occupancy",
    ])?;

    for site in sites {
        let frac: [String; 3] = match site.frac_coords {
            Some(f) => f.map(|v| format!("{:.4}", v)),
            None => Default::default(),
        };
        let [fx, fy, fz] = frac;
        wtr.write_record([
            site.index.to_string(),
            site.species.clone(),
            site.symmetry.to_string(),
            fx,
            fy,
            fz,
            format!("{:.4}", site.cart_coords[0]),
            format!("{:.4}", site.cart_coords[1]),
            format!("{:.4}", site.cart_coords[2]),
            format!("{:.4}", site.occupancy),
        ])?;
    }

    wtr.flush().map_err(|e| XasError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
