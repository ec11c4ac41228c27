//! # 团簇 XYZ 导出
//!
//! 将吸收原子周围的团簇写成 XYZ 文本，便于用外部查看器检查局域结构。
//! 无序位点写入其第一个元素。

use super::write_text;
use crate::error::Result;
use crate::models::ClusterAtom;

use std::path::Path;

/// 半径向上取整到 0.01 Å
pub fn round_up_radius(radius: f64) -> f64 {
    (radius * 100.0).ceil() / 100.0
}

/// 团簇的 XYZ 文本（吸收原子在首行）
pub fn cluster_to_xyz(cluster: &[ClusterAtom]) -> String {
    let mut out = format!("{}\n\n", cluster.len());
    for atom in cluster {
        let [x, y, z] = atom.position;
        out.push_str(&format!(
            "{} {:.6} {:.6} {:.6}\n",
            atom.species.primary(),
            x,
            y,
            z
        ));
    }
    out
}

/// 团簇中出现的元素（字母序）
pub fn cluster_elements(cluster: &[ClusterAtom]) -> Vec<String> {
    let mut elements: Vec<String> = cluster
        .iter()
        .map(|a| a.species.primary().to_string())
        .collect();
    elements.sort();
    elements.dedup();
    elements
}

pub fn write_cluster_xyz(cluster: &[ClusterAtom], path: &Path) -> Result<()> {
    write_text(path, &cluster_to_xyz(cluster))?;
    log::info!("Written cluster ({} atoms) -> {}", cluster.len(), path.display());
    Ok(())
}
