//! # 部分占据抽样
//!
//! 对无序位点按占据率做加权随机抽样，得到写入输入文件的单一元素。
//! 占据率之和小于 1 时按比例归一化（空位不抽样）。

use crate::models::Species;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// 加权抽样器，给定种子时结果可复现
pub struct OccupancySampler {
    rng: StdRng,
}

impl OccupancySampler {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        OccupancySampler { rng }
    }

    /// 抽取一个元素；满占据位点直接返回其元素
    pub fn draw<'a>(&mut self, species: &'a Species) -> &'a str {
        if species.occupancies.len() <= 1 {
            return species.primary();
        }

        let weights = species.occupancies.iter().map(|(_, occ)| occ.max(0.0));
        match WeightedIndex::new(weights) {
            Ok(dist) => species.occupancies[dist.sample(&mut self.rng)].0.as_str(),
            Err(_) => species.primary(),
        }
    }
}
