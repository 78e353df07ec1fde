//! Configuration resolution for the `strata` binary.
//!
//! # Precedence
//!
//! Highest wins:
//! 1. `--max-cycles` / `--max-edges-per-step` flags
//! 2. `STRATA_MAX_CYCLES` / `STRATA_MAX_EDGES_PER_STEP` env vars
//! 3. `.strata/config.toml` in the project directory
//! 4. Built-in defaults (100 cycles, 20 edges per step, unbounded SCC work)
//!
//! The resolved values are handed to the analytics as explicit
//! [`CycleLimits`] and [`SccBudget`] values.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use strata_core::{CycleLimits, DEFAULT_MAX_CYCLES, DEFAULT_MAX_EDGES_PER_STEP, SccBudget};

pub const MAX_CYCLES_ENV: &str = "STRATA_MAX_CYCLES";
pub const MAX_EDGES_PER_STEP_ENV: &str = "STRATA_MAX_EDGES_PER_STEP";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub cycles: CyclesConfig,
    #[serde(default)]
    pub scc: SccConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CyclesConfig {
    #[serde(default)]
    pub max_number_to_detect: Option<i64>,
    #[serde(default)]
    pub max_number_of_dependencies_per_edge: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SccConfig {
    #[serde(default)]
    pub max_work: Option<i64>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub max_cycles: Option<i64>,
    pub max_edges_per_step: Option<i64>,
}

/// Values read from the environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub max_cycles: Option<String>,
    pub max_edges_per_step: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            max_cycles: std::env::var(MAX_CYCLES_ENV).ok(),
            max_edges_per_step: std::env::var(MAX_EDGES_PER_STEP_ENV).ok(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub limits: CycleLimits,
    pub budget: SccBudget,
}

/// Load `.strata/config.toml` below `project_root`, or defaults if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".strata/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the effective limits for one run.
///
/// # Errors
///
/// Returns an error if the config file is malformed, an env var is not an
/// integer, or a resolved value is not positive.
pub fn resolve_config(
    project_root: &Path,
    cli: CliOverrides,
    env: &EnvOverrides,
) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;

    let max_cycles = pick(
        cli.max_cycles,
        env.max_cycles.as_deref(),
        MAX_CYCLES_ENV,
        project.cycles.max_number_to_detect,
        DEFAULT_MAX_CYCLES,
    )?;
    let max_edges_per_step = pick(
        cli.max_edges_per_step,
        env.max_edges_per_step.as_deref(),
        MAX_EDGES_PER_STEP_ENV,
        project.cycles.max_number_of_dependencies_per_edge,
        DEFAULT_MAX_EDGES_PER_STEP,
    )?;

    let limits = CycleLimits::new(max_cycles, max_edges_per_step)
        .context("Invalid cycle limits (check flags, STRATA_* env vars and .strata/config.toml)")?;

    let budget = match project.scc.max_work {
        Some(work) => SccBudget::bounded(work).context("Invalid [scc] max_work in .strata/config.toml")?,
        None => SccBudget::unbounded(),
    };

    Ok(EffectiveConfig { limits, budget })
}

fn pick(
    cli: Option<i64>,
    env: Option<&str>,
    env_name: &str,
    file: Option<i64>,
    default: usize,
) -> Result<i64> {
    if let Some(value) = cli {
        return Ok(value);
    }
    if let Some(raw) = env {
        return raw
            .trim()
            .parse::<i64>()
            .with_context(|| format!("{env_name}={raw} is not an integer"));
    }
    match file {
        Some(value) => Ok(value),
        None => i64::try_from(default).context("default limit out of range"),
    }
}
