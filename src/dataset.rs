//! Synthetic training-corpus generation.
//!
//! Samples parameter sets uniformly over the documented ranges and labels
//! each one with the physics oracle. Every sample derives its RNG from the
//! corpus seed and its own index, so the corpus is reproducible regardless
//! of how the work is scheduled across threads.

use std::io::Write;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::params::{MissileParameters, PARAM_RANGES};
use crate::physics::{PhysicsEngine, TrajectorySummary};

/// One labeled training example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledSample {
    pub params: MissileParameters,
    pub summary: TrajectorySummary,
}

/// Seeded corpus generator backed by the physics oracle.
#[derive(Debug, Clone)]
pub struct DatasetGenerator {
    pub seed: u64,
    /// Retries per sample should integration diverge. Valid-range inputs
    /// always terminate, so this is a guard, not a hot path.
    pub max_retries: usize,
}

impl Default for DatasetGenerator {
    fn default() -> Self {
        Self {
            seed: 42,
            max_retries: 4,
        }
    }
}

impl DatasetGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    fn draw(&self, rng: &mut StdRng) -> MissileParameters {
        let sample = |rng: &mut StdRng, i: usize| {
            Uniform::new_inclusive(PARAM_RANGES[i].min, PARAM_RANGES[i].max).sample(rng)
        };
        MissileParameters {
            initial_velocity: sample(rng, 0),
            launch_angle: sample(rng, 1),
            mass: sample(rng, 2),
            drag_coefficient: sample(rng, 3),
            cross_sectional_area: sample(rng, 4),
            wind_speed: sample(rng, 5),
        }
    }

    /// Generate `count` labeled samples in parallel.
    pub fn generate(&self, count: usize) -> Result<Vec<LabeledSample>, EngineError> {
        let engine = PhysicsEngine::new();
        (0..count)
            .into_par_iter()
            .map(|index| {
                for attempt in 0..=self.max_retries {
                    let sample_seed = self
                        .seed
                        .wrapping_add(index as u64)
                        .wrapping_add((attempt as u64) << 48);
                    let mut rng = StdRng::seed_from_u64(sample_seed);
                    let params = self.draw(&mut rng);
                    match engine.summarize(&params) {
                        Ok(summary) => return Ok(LabeledSample { params, summary }),
                        Err(EngineError::Divergence { .. }) => continue,
                        Err(err) => return Err(err),
                    }
                }
                Err(EngineError::Divergence {
                    max_time_s: crate::constants::MAX_FLIGHT_TIME_S,
                })
            })
            .collect()
    }
}

/// Write a corpus as CSV with a header row, one sample per line.
pub fn write_csv<W: Write>(samples: &[LabeledSample], writer: &mut W) -> std::io::Result<()> {
    writeln!(
        writer,
        "initial_velocity,launch_angle,mass,drag_coefficient,cross_sectional_area,wind_speed,\
         max_height_km,max_range_km,time_of_flight_s,impact_velocity_m_s,apogee_time_s"
    )?;
    for sample in samples {
        let p = &sample.params;
        let s = &sample.summary;
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{}",
            p.initial_velocity,
            p.launch_angle,
            p.mass,
            p.drag_coefficient,
            p.cross_sectional_area,
            p.wind_speed,
            s.max_height_km,
            s.max_range_km,
            s.time_of_flight_s,
            s.impact_velocity_m_s,
            s.apogee_time_s,
        )?;
    }
    Ok(())
}
