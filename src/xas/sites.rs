//! # 吸收位点枚举
//!
//! 周期性结构：每个对称轨道取一个代表位点，保留包含吸收元素的轨道。
//! 分子：每个原子自成一个轨道，保留吸收元素的原子。
//!
//! ## 依赖关系
//! - 被 `xas/session.rs` 使用
//! - 使用 `xas/symmetry.rs`

use super::symmetry::{self, SymmetryAnalysis};
use crate::error::{Result, XasError};
use crate::models::{AbsorbingSite, SiteSymmetry, Structure};

/// 保留 n 位小数
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn round3(v: [f64; 3], decimals: i32) -> [f64; 3] {
    [
        round_to(v[0], decimals),
        round_to(v[1], decimals),
        round_to(v[2], decimals),
    ]
}

/// 枚举结构中吸收元素的候选位点
///
/// 没有匹配位点时返回 `SiteNotFound`，因此成功结果总是非空。
pub fn enumerate_sites(structure: &Structure, absorber: &str) -> Result<Vec<AbsorbingSite>> {
    enumerate_with_symmetry(structure, absorber).map(|(_, sites)| sites)
}

/// 同 [`enumerate_sites`]，同时返回周期性结构的对称性分析（分子为 `None`）
pub fn enumerate_with_symmetry(
    structure: &Structure,
    absorber: &str,
) -> Result<(Option<SymmetryAnalysis>, Vec<AbsorbingSite>)> {
    let (analysis, sites) = if structure.is_periodic() {
        let analysis = symmetry::analyze(structure)?;
        let sites = periodic_sites(structure, &analysis, absorber);
        (Some(analysis), sites)
    } else {
        (None, molecular_sites(structure, absorber))
    };

    if sites.is_empty() {
        return Err(XasError::SiteNotFound {
            absorber: absorber.to_string(),
        });
    }

    log::debug!(
        "{}: {} candidate {} site(s)",
        structure.name,
        sites.len(),
        absorber
    );
    Ok((analysis, sites))
}

/// 基于已有对称性分析枚举周期性结构的候选位点
fn periodic_sites(
    structure: &Structure,
    analysis: &SymmetryAnalysis,
    absorber: &str,
) -> Vec<AbsorbingSite> {
    let mut out = Vec::new();

    for (orbit_index, orbit) in analysis.orbits.iter().enumerate() {
        let site = &structure.sites[orbit.representative];
        let Some(occupancy) = site.species.occupancy_of(absorber) else {
            continue;
        };
        log::debug!(
            "Orbit {} ({}): representative {} '{}'",
            orbit_index,
            orbit.wyckoff,
            orbit.representative,
            site.label.as_deref().unwrap_or("-")
        );

        out.push(AbsorbingSite {
            index: out.len(),
            orbit: orbit_index,
            species: site.species.to_string(),
            frac_coords: Some(round3(site.frac, 4)),
            symmetry: SiteSymmetry::Wyckoff(orbit.wyckoff.clone()),
            cart_coords: round3(site.cart, 4),
            occupancy,
            structure_index: orbit.representative,
        });
    }

    out
}

fn molecular_sites(structure: &Structure, absorber: &str) -> Vec<AbsorbingSite> {
    structure
        .sites
        .iter()
        .enumerate()
        .filter(|(_, site)| site.species.primary() == absorber)
        .enumerate()
        .map(|(k, (i, site))| AbsorbingSite {
            index: k,
            orbit: i,
            species: format!("{}{}", absorber, k),
            frac_coords: None,
            symmetry: SiteSymmetry::None,
            cart_coords: round3(site.cart, 4),
            occupancy: 1.0,
            structure_index: i,
        })
        .collect()
}

/// 按下标选择候选位点
pub fn select_site(sites: &[AbsorbingSite], index: usize) -> Result<&AbsorbingSite> {
    sites.get(index).ok_or(XasError::SiteIndexOutOfRange {
        index,
        count: sites.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lattice, Molecule, MoleculeAtom, Periodicity, Site, Species};

    fn perovskite() -> Structure {
        // SrTiO3: Sr 1a, Ti 1b, O 3c
        let lattice = Lattice::from_parameters(3.905, 3.905, 3.905, 90.0, 90.0, 90.0);
        let sites = vec![
            Site::new(Species::element("Sr"), [0.0, 0.0, 0.0], &lattice),
            Site::new(Species::element("Ti"), [0.5, 0.5, 0.5], &lattice),
            Site::new(Species::element("O"), [0.5, 0.5, 0.0], &lattice),
            Site::new(Species::element("O"), [0.5, 0.0, 0.5], &lattice),
            Site::new(Species::element("O"), [0.0, 0.5, 0.5], &lattice),
        ];
        Structure::new("SrTiO3", lattice, sites, Periodicity::Periodic)
    }

    #[test]
    fn test_one_candidate_per_orbit() {
        let s = perovskite();
        let sites = enumerate_sites(&s, "O").unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].orbit, 2);
        // (|x|,|y|,|z|) 最小者为 (0, 0.5, 0.5)
        assert_eq!(sites[0].structure_index, 4);
        match &sites[0].symmetry {
            SiteSymmetry::Wyckoff(w) => assert!(w.starts_with('3')),
            SiteSymmetry::None => panic!("periodic site without Wyckoff label"),
        }
    }

    #[test]
    fn test_exact_element_match() {
        let s = perovskite();
        assert!(matches!(
            enumerate_sites(&s, "S"),
            Err(XasError::SiteNotFound { .. })
        ));
        let ti = enumerate_sites(&s, "Ti").unwrap();
        assert_eq!(ti.len(), 1);
        assert_eq!(ti[0].species, "Ti");
        assert!(ti[0].is_fully_occupied());
        assert_eq!(ti[0].frac_coords, Some([0.5, 0.5, 0.5]));
    }

    #[test]
    fn test_partial_occupancy() {
        let lattice = Lattice::from_parameters(3.0, 3.0, 3.0, 90.0, 90.0, 90.0);
        let mixed = Species::new(vec![("Fe".to_string(), 0.6), ("Ni".to_string(), 0.4)]);
        let sites = vec![
            Site::new(mixed, [0.0, 0.0, 0.0], &lattice),
            Site::new(Species::element("O"), [0.5, 0.5, 0.5], &lattice),
        ];
        let s = Structure::new("FeNiO", lattice, sites, Periodicity::Periodic);

        let ni = enumerate_sites(&s, "Ni").unwrap();
        assert_eq!(ni.len(), 1);
        assert_eq!(ni[0].occupancy, 0.4);
        assert_eq!(ni[0].species, "Fe:0.600, Ni:0.400");
        assert!(!ni[0].is_fully_occupied());
    }

    #[test]
    fn test_molecule_every_atom_is_a_candidate() {
        let mol = Molecule {
            name: "fe2".to_string(),
            comment: String::new(),
            atoms: vec![
                MoleculeAtom {
                    element: "Fe".to_string(),
                    position: [0.0, 0.0, 0.0],
                },
                MoleculeAtom {
                    element: "O".to_string(),
                    position: [1.0, 0.0, 0.0],
                },
                MoleculeAtom {
                    element: "Fe".to_string(),
                    position: [2.0, 0.0, 0.0],
                },
            ],
        };
        let sites = enumerate_sites(&mol.to_structure(), "Fe").unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].species, "Fe0");
        assert_eq!(sites[1].species, "Fe1");
        assert_eq!(sites[1].structure_index, 2);
        assert_eq!(sites[1].symmetry, SiteSymmetry::None);
        assert!(sites[1].frac_coords.is_none());
    }

    #[test]
    fn test_symmetry_only_for_periodic() {
        let (analysis, sites) = enumerate_with_symmetry(&perovskite(), "Ti").unwrap();
        assert_eq!(analysis.map(|a| a.number), Some(221));
        assert_eq!(sites.len(), 1);

        let mol = Molecule {
            name: "o".to_string(),
            comment: String::new(),
            atoms: vec![MoleculeAtom {
                element: "O".to_string(),
                position: [0.0, 0.0, 0.0],
            }],
        };
        let (analysis, sites) = enumerate_with_symmetry(&mol.to_structure(), "O").unwrap();
        assert!(analysis.is_none());
        assert_eq!(sites.len(), 1);
        assert!(matches!(
            enumerate_with_symmetry(&mol.to_structure(), "Fe"),
            Err(XasError::SiteNotFound { .. })
        ));
    }

    #[test]
    fn test_select_out_of_range() {
        let s = perovskite();
        let sites = enumerate_sites(&s, "Sr").unwrap();
        assert!(select_site(&sites, 0).is_ok());
        assert!(matches!(
            select_site(&sites, 3),
            Err(XasError::SiteIndexOutOfRange { index: 3, count: 1 })
        ));
    }
}
