//! Simulation runner and report
//!
//! Runs seeded headless sessions (one per seed, in parallel) and folds the
//! pitch logs into a JSON report.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use bb_core::{
    default_arsenal, run_session, Arsenal, BatterProfile, EngineConfig, PitchRecord, SessionRequest,
    SessionResponse,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Everything a run needs besides the seeds
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub half_innings: u32,
    pub config: EngineConfig,
    pub arsenal: Arsenal,
    pub batter: BatterProfile,
    pub epsilon: Option<f64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            half_innings: 9,
            config: EngineConfig::default(),
            arsenal: default_arsenal().clone(),
            batter: BatterProfile::default(),
            epsilon: None,
        }
    }
}

impl RunOptions {
    /// Options with optional config / arsenal files
    pub fn from_paths(config: Option<&Path>, arsenal: Option<&Path>) -> Result<Self> {
        let mut opts = Self::default();
        if let Some(path) = config {
            opts.config = EngineConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
        }
        if let Some(path) = arsenal {
            opts.arsenal =
                Arsenal::load(path).with_context(|| format!("Failed to load arsenal: {}", path.display()))?;
        }
        Ok(opts)
    }
}

/// Per-seed summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedReport {
    pub seed: u64,
    pub pitches: usize,
    pub runs_allowed: u32,
    pub hits_allowed: u32,
    pub mean_reward: f64,
    /// Pitch label → times thrown
    pub usage: BTreeMap<String, u64>,
    /// Outcome → count
    pub outcomes: BTreeMap<String, u64>,
    pub q_table_size: usize,
    /// SHA256 of the pitch log JSON
    pub log_checksum: String,
}

/// Whole-run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimReport {
    /// RFC3339
    pub generated_at: String,
    pub engine_version: String,
    pub half_innings: u32,
    pub pitches: usize,
    pub runs_allowed: u32,
    pub mean_reward: f64,
    pub usage: BTreeMap<String, u64>,
    pub outcomes: BTreeMap<String, u64>,
    pub seeds: Vec<SeedReport>,
}

/// Run one seeded session
pub fn run_seed(opts: &RunOptions, seed: u64) -> Result<SeedReport> {
    let request = SessionRequest {
        schema_version: bb_core::api::SCHEMA_VERSION,
        seed,
        half_innings: opts.half_innings,
        config: Some(opts.config.clone()),
        arsenal: Some(opts.arsenal.profiles().to_vec()),
        batter: Some(opts.batter),
        epsilon: opts.epsilon,
    };
    let response = run_session(&request).with_context(|| format!("Session failed for seed {}", seed))?;
    tracing::debug!(seed, pitches = response.pitches.len(), "session finished");
    summarize(&response)
}

fn summarize(response: &SessionResponse) -> Result<SeedReport> {
    let log = &response.pitches;
    let log_json = serde_json::to_vec(log)?;

    Ok(SeedReport {
        seed: response.seed,
        pitches: log.len(),
        runs_allowed: response.final_count.score,
        hits_allowed: response.final_count.hits_allowed,
        mean_reward: mean(log.iter().map(|r| r.reward)),
        usage: histogram(log, |r| r.label.to_string()),
        outcomes: histogram(log, |r| format!("{:?}", r.outcome)),
        q_table_size: response.q_table.len(),
        log_checksum: format!("{:x}", Sha256::digest(&log_json)),
    })
}

/// Run every seed in parallel and merge the results (seed order preserved)
pub fn run_all(opts: &RunOptions, seeds: &[u64]) -> Result<SimReport> {
    let reports: Vec<SeedReport> = seeds.par_iter().map(|&seed| run_seed(opts, seed)).collect::<Result<_>>()?;

    let pitches: usize = reports.iter().map(|r| r.pitches).sum();
    let total_reward: f64 = reports.iter().map(|r| r.mean_reward * r.pitches as f64).sum();
    let mut usage = BTreeMap::new();
    let mut outcomes = BTreeMap::new();
    for r in &reports {
        merge(&mut usage, &r.usage);
        merge(&mut outcomes, &r.outcomes);
    }

    Ok(SimReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        engine_version: bb_core::VERSION.to_string(),
        half_innings: opts.half_innings,
        pitches,
        runs_allowed: reports.iter().map(|r| r.runs_allowed).sum(),
        mean_reward: if pitches == 0 { 0.0 } else { total_reward / pitches as f64 },
        usage,
        outcomes,
        seeds: reports,
    })
}

fn histogram(log: &[PitchRecord], key: impl Fn(&PitchRecord) -> String) -> BTreeMap<String, u64> {
    let mut out = BTreeMap::new();
    for r in log {
        *out.entry(key(r)).or_insert(0) += 1;
    }
    out
}

fn merge(into: &mut BTreeMap<String, u64>, from: &BTreeMap<String, u64>) {
    for (k, v) in from {
        *into.entry(k.clone()).or_insert(0) += v;
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}
