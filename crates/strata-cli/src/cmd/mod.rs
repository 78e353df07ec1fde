pub mod cycles;
pub mod metrics;

use std::path::PathBuf;

use clap::Args;
use strata_analytics::{AbstractnessOracle, ElementClassifier};

use crate::config::EffectiveConfig;
use crate::output::OutputMode;
use crate::snapshot::Element;

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext {
    pub output: OutputMode,
    pub config: EffectiveConfig,
}

/// Positional snapshot argument shared by all analysis commands.
#[derive(Args, Debug, Clone)]
pub struct SnapshotArg {
    /// Path to the JSON architecture snapshot.
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,
}

/// Visibility and abstractness come straight from the snapshot flags.
pub fn classifier() -> impl AbstractnessOracle<Element> {
    ElementClassifier::new(|e: &Element| e.visible, |e: &Element| e.is_abstract)
}
