use crate::core::Sampler;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::Exp1;
use std::collections::VecDeque;

/// Seeded pseudo-random exponential draws.
#[derive(Debug, Clone)]
pub struct RandSampler {
    rng: StdRng,
}

impl RandSampler {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for RandSampler {
    fn exponential(&mut self, rate: f64) -> f64 {
        let unit: f64 = self.rng.sample(Exp1);
        unit / rate
    }
}

/// Replays a fixed sequence, ignoring the requested rate. Once the script runs out every draw
/// is infinite, which ends the arrival stream.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSampler {
    values: VecDeque<f64>,
}

impl ScriptedSampler {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl Sampler for ScriptedSampler {
    fn exponential(&mut self, _rate: f64) -> f64 {
        self.values.pop_front().unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_replays_then_diverges() {
        let mut sampler = ScriptedSampler::new([1.5, 2.0]);
        assert_eq!(sampler.exponential(3.0), 1.5);
        assert_eq!(sampler.exponential(0.1), 2.0);
        assert_eq!(sampler.remaining(), 0);
        assert_eq!(sampler.exponential(1.0), f64::INFINITY);
    }

    #[test]
    fn same_seed_same_draws() {
        let mut a = RandSampler::seeded(42);
        let mut b = RandSampler::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.exponential(2.0), b.exponential(2.0));
        }
    }

    #[test]
    fn sample_mean_tracks_rate() {
        let mut sampler = RandSampler::seeded(7);
        let n = 20_000;
        let mean = (0..n).map(|_| sampler.exponential(4.0)).sum::<f64>() / n as f64;
        assert!((mean - 0.25).abs() < 0.01, "mean {mean}");
    }
}
