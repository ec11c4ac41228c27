//! # cluster 子命令实现
//!
//! 显示吸收原子周围的团簇（按距离排序），可选写出 XYZ。
//!
//! ## 依赖关系
//! - 使用 `cli/cluster.rs` 定义的 ClusterArgs
//! - 使用 `xas/session.rs`, `writers/xyz.rs`

use super::open_session;
use crate::cli::cluster::ClusterArgs;
use crate::error::Result;
use crate::models::ClusterAtom;
use crate::utils::output;
use crate::writers::xyz::{cluster_elements, round_up_radius, write_cluster_xyz};

use tabled::{Table, Tabled};

/// 团簇表格行
#[derive(Debug, Clone, Tabled)]
struct ClusterRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "Atom")]
    atom: usize,
    #[tabled(rename = "x (Å)")]
    x: String,
    #[tabled(rename = "y (Å)")]
    y: String,
    #[tabled(rename = "z (Å)")]
    z: String,
    #[tabled(rename = "Distance (Å)")]
    distance: String,
}

fn cluster_rows(cluster: &[ClusterAtom], limit: usize) -> Vec<ClusterRow> {
    let count = if limit == 0 { cluster.len() } else { limit };
    cluster
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, atom)| ClusterRow {
            rank: i,
            species: atom.species.tag(),
            atom: atom.structure_index,
            x: format!("{:.4}", atom.position[0]),
            y: format!("{:.4}", atom.position[1]),
            z: format!("{:.4}", atom.position[2]),
            distance: format!("{:.5}", atom.distance),
        })
        .collect()
}

/// 执行 cluster 命令
pub fn execute(args: ClusterArgs) -> Result<()> {
    output::print_header("Absorber Cluster");

    let session = open_session(&args.structure)?;
    let radius = round_up_radius(args.radius);
    let cluster = session.cluster(radius)?;

    output::print_info(&format!(
        "{} atoms within {:.2} Å, elements: {}",
        cluster.len(),
        radius,
        cluster_elements(&cluster).join(", ")
    ));

    let rows = cluster_rows(&cluster, args.limit);
    println!("{}", Table::new(&rows));
    if rows.len() < cluster.len() {
        output::print_info(&format!("... and {} more", cluster.len() - rows.len()));
    }

    if let Some(ref path) = args.xyz {
        write_cluster_xyz(&cluster, path)?;
        output::print_written("Cluster XYZ", path);
    }

    Ok(())
}
