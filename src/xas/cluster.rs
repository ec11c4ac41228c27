//! # 团簇提取
//!
//! 以吸收位点为中心，收集半径内的全部原子（周期性结构包含周期像），
//! 吸收原子排在首位，其余按距离稳定排序。
//!
//! ## 依赖关系
//! - 被 `xas/session.rs`, `writers/` 使用
//! - 使用 `models/structure.rs`, `models/site.rs`

use super::sites::round_to;
use crate::error::{Result, XasError};
use crate::models::{ClusterAtom, ClusterSpecies, Structure};

/// 位移各分量均小于此值 (Å) 的原子视为吸收原子本身
pub const ABSORBER_TOLERANCE: f64 = 0.01;

/// 距离保留的小数位数
const DISTANCE_DECIMALS: i32 = 5;

/// 团簇半径上限 (Å)
pub const MAX_RADIUS: f64 = 100.0;

/// 周期像数量上限，防止极小晶胞配大半径
const MAX_IMAGES: i64 = 1_000_000;

/// 提取 `center` 位点周围半径 `radius` (Å) 内的团簇
pub fn extract_cluster(
    structure: &Structure,
    center: usize,
    absorber: &str,
    radius: f64,
) -> Result<Vec<ClusterAtom>> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(XasError::InvalidArgument(format!(
            "Cluster radius must be a non-negative number, got {}",
            radius
        )));
    }
    if radius > MAX_RADIUS {
        return Err(XasError::InvalidArgument(format!(
            "Cluster radius {} Å exceeds the {} Å limit",
            radius, MAX_RADIUS
        )));
    }

    let origin = structure
        .sites
        .get(center)
        .ok_or(XasError::SiteIndexOutOfRange {
            index: center,
            count: structure.sites.len(),
        })?
        .cart;

    let images = image_offsets(structure, radius)?;

    let mut found: Vec<ClusterAtom> = Vec::new();
    for (index, site) in structure.sites.iter().enumerate() {
        for image in &images {
            let cart = if structure.is_periodic() {
                let f = site.frac;
                structure.lattice.frac_to_cart([
                    f[0] + image[0],
                    f[1] + image[1],
                    f[2] + image[2],
                ])
            } else {
                site.cart
            };

            let position = [
                cart[0] - origin[0],
                cart[1] - origin[1],
                cart[2] - origin[2],
            ];
            let distance = (position[0].powi(2) + position[1].powi(2) + position[2].powi(2)).sqrt();
            if distance > radius && !is_at_origin(&position) {
                continue;
            }

            found.push(ClusterAtom {
                species: ClusterSpecies::from_species(&site.species),
                position,
                distance: round_to(distance, DISTANCE_DECIMALS),
                structure_index: index,
            });
        }
    }

    let absorber_pos = found
        .iter()
        .position(|atom| is_at_origin(&atom.position))
        .ok_or_else(|| XasError::Other("Absorbing atom not found in its own cluster".to_string()))?;

    let mut head = found.remove(absorber_pos);
    head.species = ClusterSpecies::Absorber(absorber.to_string());
    head.position = [0.0; 3];
    head.distance = 0.0;

    // sort_by 是稳定排序，距离相同时保留枚举顺序
    found.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let mut cluster = Vec::with_capacity(found.len() + 1);
    cluster.push(head);
    cluster.extend(found);

    log::debug!(
        "Cluster around site {} (r = {:.3} Å): {} atoms",
        center,
        radius,
        cluster.len()
    );
    Ok(cluster)
}

fn is_at_origin(position: &[f64; 3]) -> bool {
    position.iter().all(|c| c.abs() < ABSORBER_TOLERANCE)
}

/// 需要遍历的晶格平移；分子只有零平移
fn image_offsets(structure: &Structure, radius: f64) -> Result<Vec<[f64; 3]>> {
    if !structure.is_periodic() {
        return Ok(vec![[0.0; 3]]);
    }

    let reciprocal = structure
        .lattice
        .reciprocal_lengths()
        .ok_or_else(|| XasError::InvalidArgument("Lattice is singular".to_string()))?;

    let range: Vec<i64> = reciprocal
        .iter()
        .map(|b| (radius * b).ceil() as i64 + 1)
        .collect();

    let count: i64 = range.iter().map(|n| 2 * n + 1).product();
    if count > MAX_IMAGES {
        return Err(XasError::InvalidArgument(format!(
            "Radius {} Å needs {} lattice images for this cell (limit {})",
            radius, count, MAX_IMAGES
        )));
    }

    let mut offsets = Vec::new();
    for i in -range[0]..=range[0] {
        for j in -range[1]..=range[1] {
            for k in -range[2]..=range[2] {
                offsets.push([i as f64, j as f64, k as f64]);
            }
        }
    }
    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lattice, Molecule, MoleculeAtom, Periodicity, Site, Species};
    use approx::assert_relative_eq;

    fn cubic_with_neighbours() -> Structure {
        let lattice = Lattice::from_parameters(10.0, 10.0, 10.0, 90.0, 90.0, 90.0);
        let sites = vec![
            Site::new(Species::element("O"), [0.0, 0.0, 0.29], &lattice),
            Site::new(Species::element("Fe"), [0.0, 0.0, 0.0], &lattice),
            Site::new(Species::element("O"), [0.1, 0.0, 0.0], &lattice),
            Site::new(Species::element("O"), [0.0, 0.2, 0.0], &lattice),
        ];
        Structure::new("cubic", lattice, sites, Periodicity::Periodic)
    }

    #[test]
    fn test_cubic_neighbours_sorted() {
        let s = cubic_with_neighbours();
        let cluster = extract_cluster(&s, 1, "Fe", 3.0).unwrap();
        let distances: Vec<f64> = cluster.iter().map(|a| a.distance).collect();
        assert_eq!(distances.len(), 4);
        assert_eq!(distances[0], 0.0);
        assert_relative_eq!(distances[1], 1.0, epsilon = 1e-9);
        assert_relative_eq!(distances[2], 2.0, epsilon = 1e-9);
        assert_relative_eq!(distances[3], 2.9, epsilon = 1e-9);
        assert_eq!(cluster[0].species.tag(), "Fe(abs)");
        assert_eq!(cluster[3].structure_index, 0);
    }

    #[test]
    fn test_zero_radius_keeps_absorber() {
        let s = cubic_with_neighbours();
        let cluster = extract_cluster(&s, 1, "Fe", 0.0).unwrap();
        assert_eq!(cluster.len(), 1);
        assert!(matches!(cluster[0].species, ClusterSpecies::Absorber(_)));
        assert_eq!(cluster[0].distance, 0.0);
    }

    #[test]
    fn test_invalid_radius() {
        let s = cubic_with_neighbours();
        assert!(matches!(
            extract_cluster(&s, 1, "Fe", -1.0),
            Err(XasError::InvalidArgument(_))
        ));
        assert!(extract_cluster(&s, 1, "Fe", f64::NAN).is_err());
    }

    #[test]
    fn test_periodic_images_included() {
        // 简单立方，a = 2.5：6 个最近邻都是吸收原子自身的周期像
        let lattice = Lattice::from_parameters(2.5, 2.5, 2.5, 90.0, 90.0, 90.0);
        let sites = vec![Site::new(Species::element("Cu"), [0.0, 0.0, 0.0], &lattice)];
        let s = Structure::new("sc", lattice, sites, Periodicity::Periodic);

        let cluster = extract_cluster(&s, 0, "Cu", 3.0).unwrap();
        assert_eq!(cluster.len(), 7);
        assert!(cluster[1..]
            .iter()
            .all(|a| (a.distance - 2.5).abs() < 1e-9 && a.species.tag() == "Cu"));
    }

    #[test]
    fn test_tied_distances_reproducible() {
        // fcc：12 个等距最近邻，6 个等距次近邻
        let lattice = Lattice::from_parameters(3.6, 3.6, 3.6, 90.0, 90.0, 90.0);
        let sites = vec![
            Site::new(Species::element("Cu"), [0.0, 0.0, 0.0], &lattice),
            Site::new(Species::element("Cu"), [0.5, 0.5, 0.0], &lattice),
            Site::new(Species::element("Cu"), [0.5, 0.0, 0.5], &lattice),
            Site::new(Species::element("Cu"), [0.0, 0.5, 0.5], &lattice),
        ];
        let s = Structure::new("Cu", lattice, sites, Periodicity::Periodic);

        let first = extract_cluster(&s, 0, "Cu", 4.0).unwrap();
        let second = extract_cluster(&s, 0, "Cu", 4.0).unwrap();
        assert_eq!(first.len(), 19);

        let key = |c: &[ClusterAtom]| -> Vec<(usize, [f64; 3], f64)> {
            c.iter()
                .map(|a| (a.structure_index, a.position, a.distance))
                .collect()
        };
        assert_eq!(key(&first), key(&second));

        for pair in first.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        assert!(first[1..13]
            .iter()
            .all(|a| (a.distance - 3.6 / 2f64.sqrt()).abs() < 1e-4));
    }

    #[test]
    fn test_radius_limits() {
        let s = cubic_with_neighbours();
        assert!(matches!(
            extract_cluster(&s, 1, "Fe", 1e5),
            Err(XasError::InvalidArgument(_))
        ));
        assert!(extract_cluster(&s, 1, "Fe", MAX_RADIUS).is_ok());

        // 0.1 Å 晶胞在 50 Å 半径下需要约 10⁹ 个周期像
        let lattice = Lattice::from_parameters(0.1, 0.1, 0.1, 90.0, 90.0, 90.0);
        let sites = vec![Site::new(Species::element("H"), [0.0, 0.0, 0.0], &lattice)];
        let tiny = Structure::new("tiny", lattice, sites, Periodicity::Periodic);
        assert!(matches!(
            extract_cluster(&tiny, 0, "H", 50.0),
            Err(XasError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_smaller_radius_is_subset() {
        let lattice = Lattice::from_parameters(4.2, 4.2, 4.2, 90.0, 90.0, 90.0);
        let sites = vec![
            Site::new(Species::element("Ni"), [0.0, 0.0, 0.0], &lattice),
            Site::new(Species::element("O"), [0.5, 0.0, 0.0], &lattice),
            Site::new(Species::element("O"), [0.0, 0.5, 0.0], &lattice),
            Site::new(Species::element("O"), [0.0, 0.0, 0.5], &lattice),
            Site::new(Species::element("Ni"), [0.5, 0.5, 0.0], &lattice),
        ];
        let s = Structure::new("NiO", lattice, sites, Periodicity::Periodic);

        let small = extract_cluster(&s, 0, "Ni", 3.5).unwrap();
        let large = extract_cluster(&s, 0, "Ni", 6.0).unwrap();
        assert!(small.len() < large.len());

        for atom in &small {
            assert!(large.iter().any(|b| b.structure_index == atom.structure_index
                && b.distance == atom.distance
                && b.position == atom.position));
        }
        // 较小团簇是较大团簇的前缀
        for (a, b) in small.iter().zip(large.iter()) {
            assert_eq!(a.distance, b.distance);
        }
    }

    #[test]
    fn test_molecule_has_no_images() {
        let mol = Molecule {
            name: "co".to_string(),
            comment: String::new(),
            atoms: vec![
                MoleculeAtom {
                    element: "C".to_string(),
                    position: [0.0, 0.0, 0.0],
                },
                MoleculeAtom {
                    element: "O".to_string(),
                    position: [1.13, 0.0, 0.0],
                },
            ],
        };
        let s = mol.to_structure();
        let cluster = extract_cluster(&s, 1, "O", 10.0).unwrap();
        assert_eq!(cluster.len(), 2);
        assert_eq!(cluster[0].species.tag(), "O(abs)");
        assert_relative_eq!(cluster[1].position[0], -1.13, epsilon = 1e-12);
        assert_eq!(cluster[1].distance, 1.13);
    }

    #[test]
    fn test_disordered_neighbour_kept() {
        let lattice = Lattice::from_parameters(3.0, 3.0, 3.0, 90.0, 90.0, 90.0);
        let mixed = Species::new(vec![("Fe".to_string(), 0.5), ("Ni".to_string(), 0.5)]);
        let sites = vec![
            Site::new(Species::element("O"), [0.0, 0.0, 0.0], &lattice),
            Site::new(mixed.clone(), [0.5, 0.5, 0.5], &lattice),
        ];
        let s = Structure::new("mixed", lattice, sites, Periodicity::Periodic);
        let cluster = extract_cluster(&s, 0, "O", 2.7).unwrap();
        assert_eq!(cluster.len(), 9);
        assert_eq!(cluster[1].species, ClusterSpecies::Disordered(mixed));
    }
}
