use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};

use crate::features::AgeBucket;
use crate::player::PlayerRecord;

/// Controls for manufacturing "next season" training labels.
///
/// There is no ground truth for an unplayed season, so targets are the
/// current value plus Gaussian noise, optionally scaled by the age
/// improvement factor. The seed is an explicit part of the contract:
/// identical `(records, config)` always yields identical targets, and two
/// runs only differ if the caller changes the seed.
#[derive(Debug, Clone, Copy)]
pub struct TargetConfig {
    pub seed: u64,
    pub sigma_ppg: f64,
    pub sigma_apg: f64,
    pub sigma_rpg: f64,
    /// Scale noise by the age improvement factor (young up, old down).
    pub age_scaling: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            sigma_ppg: 1.0,
            sigma_apg: 0.5,
            sigma_rpg: 0.8,
            age_scaling: true,
        }
    }
}

/// One synthetic (ppg, apg, rpg) label per record, in record order.
pub fn synthesize_targets(records: &[PlayerRecord], config: &TargetConfig) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    records
        .iter()
        .map(|rec| {
            let factor = if config.age_scaling {
                AgeBucket::from_age(rec.age).improvement_factor()
            } else {
                1.0
            };
            let n_ppg: f64 = StandardNormal.sample(&mut rng);
            let n_apg: f64 = StandardNormal.sample(&mut rng);
            let n_rpg: f64 = StandardNormal.sample(&mut rng);
            [
                rec.ppg_last.unwrap_or(0.0) + n_ppg * config.sigma_ppg * factor,
                rec.apg_last.unwrap_or(0.0) + n_apg * config.sigma_apg * factor,
                rec.rpg_last.unwrap_or(0.0) + n_rpg * config.sigma_rpg * factor,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerRecord;

    fn roster() -> Vec<PlayerRecord> {
        (0..8)
            .map(|i| {
                let mut rec = PlayerRecord::bare(i, &format!("P{i}"));
                rec.ppg_last = Some(10.0 + i as f64);
                rec.apg_last = Some(4.0);
                rec.rpg_last = Some(6.0);
                rec.age = Some(20.0 + i as f64 * 2.0);
                rec
            })
            .collect()
    }

    #[test]
    fn same_seed_reproduces_targets() {
        let records = roster();
        let cfg = TargetConfig::default();
        assert_eq!(
            synthesize_targets(&records, &cfg),
            synthesize_targets(&records, &cfg)
        );
    }

    #[test]
    fn different_seed_changes_targets() {
        let records = roster();
        let a = synthesize_targets(&records, &TargetConfig::default());
        let b = synthesize_targets(
            &records,
            &TargetConfig {
                seed: 7,
                ..TargetConfig::default()
            },
        );
        assert_ne!(a, b);
    }

    #[test]
    fn targets_stay_near_current_stats() {
        let records = roster();
        let targets = synthesize_targets(&records, &TargetConfig::default());
        for (rec, t) in records.iter().zip(&targets) {
            // Gaussian with sigma <= 1.2 after age scaling; 6 sigma bound.
            assert!((t[0] - rec.ppg_last.unwrap()).abs() < 8.0);
            assert!((t[1] - rec.apg_last.unwrap()).abs() < 5.0);
            assert!((t[2] - rec.rpg_last.unwrap()).abs() < 7.0);
        }
    }

    #[test]
    fn zero_sigma_returns_current_stats_exactly() {
        let records = roster();
        let cfg = TargetConfig {
            sigma_ppg: 0.0,
            sigma_apg: 0.0,
            sigma_rpg: 0.0,
            ..TargetConfig::default()
        };
        for (rec, t) in records.iter().zip(synthesize_targets(&records, &cfg)) {
            assert_eq!(t[0], rec.ppg_last.unwrap());
            assert_eq!(t[1], rec.apg_last.unwrap());
            assert_eq!(t[2], rec.rpg_last.unwrap());
        }
    }
}
