//! Synthetic key traces.
//!
//! Writes one `u32` key per line, drawn either from a Zipf distribution over
//! `objects` keys (rank 0 most popular) or uniformly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{self, Write};

/// Key popularity distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Distribution {
    /// Zipf with skew `alpha`
    Zipf,
    /// Every key equally likely
    Uniform,
}

/// Parameters for generating a trace
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Number of distinct keys, `0..objects`
    pub objects: u32,
    /// Number of keys to emit
    pub requests: u64,
    /// Zipf skew parameter
    pub alpha: f64,
    /// Key popularity distribution
    pub distribution: Distribution,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            objects: 1_000_000,
            requests: 100_000_000,
            alpha: 1.0,
            distribution: Distribution::Zipf,
            seed: None,
        }
    }
}

/// Samples Zipf-distributed ranks by inverting a precomputed CDF.
#[derive(Debug, Clone)]
pub struct ZipfGenerator {
    cdf: Vec<f64>,
}

impl ZipfGenerator {
    /// Builds the CDF for ranks `0..objects` with weights `1 / (rank + 1)^alpha`.
    ///
    /// # Panics
    ///
    /// Panics if `objects` is zero.
    pub fn new(objects: u32, alpha: f64) -> Self {
        assert!(objects > 0, "a Zipf distribution needs at least one object");
        let mut cdf = Vec::with_capacity(objects as usize);
        let mut total = 0.0;
        for rank in 1..=objects {
            total += 1.0 / f64::from(rank).powf(alpha);
            cdf.push(total);
        }
        for p in &mut cdf {
            *p /= total;
        }
        Self { cdf }
    }

    /// Number of distinct ranks.
    pub fn objects(&self) -> u32 {
        self.cdf.len() as u32
    }

    /// Draws one rank.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let u: f64 = rng.gen();
        let rank = self.cdf.partition_point(|&p| p <= u);
        rank.min(self.cdf.len() - 1) as u32
    }
}

/// Writes `config.requests` keys to `writer`, one per line.
pub fn generate_trace<W: Write>(config: &TraceConfig, writer: W) -> io::Result<()> {
    let mut writer = io::BufWriter::new(writer);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match config.distribution {
        Distribution::Zipf => {
            let zipf = ZipfGenerator::new(config.objects, config.alpha);
            for _ in 0..config.requests {
                writeln!(writer, "{}", zipf.sample(&mut rng))?;
            }
        }
        Distribution::Uniform => {
            for _ in 0..config.requests {
                writeln!(writer, "{}", rng.gen_range(0..config.objects))?;
            }
        }
    }

    writer.flush()
}
