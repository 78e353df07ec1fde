//! `strata cycles`: list elementary dependency cycles between components.

use std::io::Write;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use strata_analytics::{Cycles, detect_cycles_with_budget};
use strata_core::graph_fingerprint;
use tracing::info;

use super::{CommandContext, SnapshotArg};
use crate::config::EffectiveConfig;
use crate::output::{render, section};
use crate::snapshot::{Dependency, Snapshot};

#[derive(Args, Debug, Clone)]
pub struct CyclesArgs {
    #[command(flatten)]
    pub input: SnapshotArg,

    /// Exit with an error if any cycle is found.
    #[arg(long)]
    pub deny: bool,
}

#[derive(Debug, Serialize)]
pub struct CyclesReport {
    pub fingerprint: String,
    pub max_cycles: usize,
    pub max_edges_per_step: usize,
    pub truncated: bool,
    pub cycles: Vec<CycleEntry>,
}

#[derive(Debug, Serialize)]
pub struct CycleEntry {
    pub path: String,
    pub steps: Vec<StepEntry>,
}

#[derive(Debug, Serialize)]
pub struct StepEntry {
    pub from: String,
    pub to: String,
    pub dependencies: Vec<String>,
    pub total_dependencies: usize,
}

/// Execute `strata cycles`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded, the SCC budget is
/// exhausted, or `--deny` is set and cycles exist.
pub fn run_cycles(args: &CyclesArgs, ctx: CommandContext) -> anyhow::Result<()> {
    let snapshot = Snapshot::load(&args.input.snapshot)?;
    let report = build_report(&snapshot, &ctx.config)?;

    render(ctx.output, &report, render_cycles_human)?;

    if args.deny && !report.cycles.is_empty() {
        anyhow::bail!(
            "{} dependency cycle(s) found{}",
            report.cycles.len(),
            if report.truncated { " (truncated)" } else { "" }
        );
    }
    Ok(())
}

/// Run cycle detection over the component-level graph of `snapshot`.
///
/// # Errors
///
/// Returns an error if graph construction fails or the SCC budget is exhausted.
pub fn build_report(snapshot: &Snapshot, config: &EffectiveConfig) -> anyhow::Result<CyclesReport> {
    let graph = snapshot.cycle_graph()?;
    let fingerprint = graph_fingerprint(&graph);

    let cycles = detect_cycles_with_budget(&graph, &config.limits, &config.budget)
        .context("cycle detection aborted")?;

    info!(cycles = cycles.len(), %fingerprint, "cycle detection finished");

    Ok(CyclesReport {
        fingerprint,
        max_cycles: config.limits.max_cycles(),
        max_edges_per_step: config.limits.max_edges_per_step(),
        truncated: cycles.truncated(),
        cycles: entries(&cycles),
    })
}

fn entries(cycles: &Cycles<String, Dependency>) -> Vec<CycleEntry> {
    cycles
        .iter()
        .map(|cycle| CycleEntry {
            path: cycle.to_string(),
            steps: cycle
                .steps()
                .iter()
                .map(|step| StepEntry {
                    from: step.from.clone(),
                    to: step.to.clone(),
                    dependencies: step.edges.iter().map(ToString::to_string).collect(),
                    total_dependencies: step.total_edges,
                })
                .collect(),
        })
        .collect()
}

pub fn render_cycles_human(report: &CyclesReport, w: &mut dyn Write) -> std::io::Result<()> {
    if report.cycles.is_empty() {
        writeln!(w, "No dependency cycles found.")?;
        return Ok(());
    }

    let heading = if report.truncated {
        format!(
            "Dependency cycles ({}, limit {} reached)",
            report.cycles.len(),
            report.max_cycles
        )
    } else {
        format!("Dependency cycles ({})", report.cycles.len())
    };
    section(w, &heading)?;

    for (idx, cycle) in report.cycles.iter().enumerate() {
        writeln!(w, "\nCycle {}: {}", idx + 1, cycle.path)?;
        for step in &cycle.steps {
            writeln!(w, "  {} -> {}", step.from, step.to)?;
            for dependency in &step.dependencies {
                writeln!(w, "    {dependency}")?;
            }
            let hidden = step.total_dependencies - step.dependencies.len();
            if hidden > 0 {
                writeln!(w, "    ... and {hidden} more")?;
            }
        }
    }

    Ok(())
}
