//! # 光谱模块
//!
//! FDMNES 输出光谱的数据表示、绘图和导出。
//!
//! ## 依赖关系
//! - 被 `parsers/fdmnes_out.rs` 构造
//! - 被 `commands/info.rs` 使用
//! - 子模块: plot, export

pub mod export;
pub mod plot;

use serde::Serialize;

/// FDMNES 计算得到的吸收谱
#[derive(Debug, Clone, Serialize)]
pub struct Spectrum {
    /// 结构或文件名称
    pub name: String,

    /// 吸收边能量 (eV)
    pub e_edge: f64,

    /// 吸收原子序数
    pub z: u32,

    /// 计算得到的费米能级 (eV)
    pub e_fermi: f64,

    /// (能量, μ) 数据点
    pub data: Vec<(f64, f64)>,
}

impl Spectrum {
    /// 能量范围
    pub fn energy_range(&self) -> Option<(f64, f64)> {
        let first = self.data.first()?.0;
        let last = self.data.last()?.0;
        Some((first.min(last), first.max(last)))
    }

    /// μ 的最大值
    pub fn max_mu(&self) -> Option<f64> {
        self.data
            .iter()
            .map(|(_, mu)| *mu)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let s = Spectrum {
            name: "x".to_string(),
            e_edge: 7112.0,
            z: 26,
            e_fermi: -5.0,
            data: vec![(-10.0, 0.1), (0.0, 1.4), (20.0, 1.0)],
        };
        assert_eq!(s.energy_range(), Some((-10.0, 20.0)));
        assert_eq!(s.max_mu(), Some(1.4));
    }
}
