//! `strata lakos`, `strata martin`, `strata visibility` and `strata report`.

use std::io::Write;

use clap::Args;
use serde::Serialize;
use strata_analytics::{
    ComponentDependencyMetrics, LakosMetrics, VisibilityMetrics, component_dependency_metrics,
    lakos_metrics, visibility_metrics,
};

use super::cycles::{CyclesReport, build_report, render_cycles_human};
use super::{CommandContext, SnapshotArg, classifier};
use crate::output::{fixed, kv, render, section};
use crate::snapshot::Snapshot;

#[derive(Args, Debug, Clone)]
pub struct MetricsArgs {
    #[command(flatten)]
    pub input: SnapshotArg,
}

/// Execute `strata lakos`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or is invalid.
pub fn run_lakos(args: &MetricsArgs, ctx: CommandContext) -> anyhow::Result<()> {
    let snapshot = Snapshot::load(&args.input.snapshot)?;
    let components = snapshot.metrics_components()?;
    let metrics = lakos_metrics(&snapshot.component_graph(&components)?);
    render(ctx.output, &metrics, render_lakos_human)
}

/// Execute `strata martin`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or is invalid.
pub fn run_martin(args: &MetricsArgs, ctx: CommandContext) -> anyhow::Result<()> {
    let snapshot = Snapshot::load(&args.input.snapshot)?;
    let components = snapshot.metrics_components()?;
    let metrics =
        component_dependency_metrics(&snapshot.component_graph(&components)?, &classifier());
    render(ctx.output, &metrics, render_martin_human)
}

/// Execute `strata visibility`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or is invalid.
pub fn run_visibility(args: &MetricsArgs, ctx: CommandContext) -> anyhow::Result<()> {
    let snapshot = Snapshot::load(&args.input.snapshot)?;
    let components = snapshot.metrics_components()?;
    let metrics = visibility_metrics(&components, &classifier());
    render(ctx.output, &metrics, render_visibility_human)
}

/// Every metric family plus cycles for one snapshot.
#[derive(Debug, Serialize)]
pub struct FullReport {
    pub lakos: LakosMetrics,
    pub martin: ComponentDependencyMetrics,
    pub visibility: VisibilityMetrics,
    pub cycles: CyclesReport,
}

/// Execute `strata report`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or is invalid, or
/// if cycle detection exhausts its budget.
pub fn run_report(args: &MetricsArgs, ctx: CommandContext) -> anyhow::Result<()> {
    let snapshot = Snapshot::load(&args.input.snapshot)?;
    let report = build_full_report(&snapshot, ctx)?;
    render(ctx.output, &report, |r, w| {
        render_lakos_human(&r.lakos, w)?;
        writeln!(w)?;
        render_martin_human(&r.martin, w)?;
        writeln!(w)?;
        render_visibility_human(&r.visibility, w)?;
        writeln!(w)?;
        render_cycles_human(&r.cycles, w)
    })
}

fn build_full_report(snapshot: &Snapshot, ctx: CommandContext) -> anyhow::Result<FullReport> {
    let components = snapshot.metrics_components()?;
    let graph = snapshot.component_graph(&components)?;
    let oracle = classifier();
    Ok(FullReport {
        lakos: lakos_metrics(&graph),
        martin: component_dependency_metrics(&graph, &oracle),
        visibility: visibility_metrics(&components, &oracle),
        cycles: build_report(snapshot, &ctx.config)?,
    })
}

fn render_lakos_human(m: &LakosMetrics, w: &mut dyn Write) -> std::io::Result<()> {
    section(w, "Lakos metrics")?;
    kv(w, "CCD", m.cumulative_component_dependency.to_string())?;
    kv(w, "ACD", fixed(m.average_component_dependency))?;
    kv(w, "RACD", fixed(m.relative_average_component_dependency))?;
    kv(w, "NCCD", fixed(m.normalized_cumulative_component_dependency))?;
    if !m.per_component.is_empty() {
        writeln!(w, "\n{:<32} {:>10}", "COMPONENT", "DEPENDS ON")?;
        for c in &m.per_component {
            writeln!(w, "{:<32} {:>10}", c.component, c.depends_on)?;
        }
    }
    Ok(())
}

fn render_martin_human(m: &ComponentDependencyMetrics, w: &mut dyn Write) -> std::io::Result<()> {
    section(w, "Martin metrics")?;
    if m.components.is_empty() {
        return writeln!(w, "No components.");
    }
    writeln!(
        w,
        "{:<32} {:>4} {:>4} {:>8} {:>8} {:>8}",
        "COMPONENT", "CE", "CA", "I", "A", "D"
    )?;
    for c in &m.components {
        writeln!(
            w,
            "{:<32} {:>4} {:>4} {:>8} {:>8} {:>8}",
            c.component,
            c.efferent_coupling,
            c.afferent_coupling,
            fixed(c.instability),
            fixed(c.abstractness),
            fixed(c.normalized_distance_from_main_sequence)
        )?;
    }
    Ok(())
}

fn render_visibility_human(m: &VisibilityMetrics, w: &mut dyn Write) -> std::io::Result<()> {
    section(w, "Visibility metrics")?;
    kv(w, "ARV", fixed(m.average_relative_visibility))?;
    kv(w, "GRV", fixed(m.global_relative_visibility))?;
    if !m.components.is_empty() {
        writeln!(w, "\n{:<32} {:>8} {:>8} {:>8}", "COMPONENT", "VISIBLE", "TOTAL", "RV")?;
        for c in &m.components {
            writeln!(
                w,
                "{:<32} {:>8} {:>8} {:>8}",
                c.component,
                c.visible_elements,
                c.total_elements,
                fixed(c.relative_visibility)
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EffectiveConfig;
    use crate::output::OutputMode;
    use strata_core::{CycleLimits, SccBudget};

    const LAYERED: &str = r#"{
        "components": [
            {"id": "web", "elements": [{"name": "web.Controller", "visible": true}]},
            {"id": "domain", "elements": [
                {"name": "domain.Repository", "visible": true, "abstract": true},
                {"name": "domain.Order", "visible": true},
                {"name": "domain.Rules"},
                {"name": "domain.Cache"}
            ]},
            {"id": "db", "elements": [{"name": "db.Jdbc", "visible": true}]}
        ],
        "dependencies": [
            {"origin": "web.Controller", "target": "domain.Order"},
            {"origin": "domain.Order", "target": "domain.Repository"},
            {"origin": "db.Jdbc", "target": "domain.Repository"}
        ]
    }"#;

    fn context() -> CommandContext {
        CommandContext {
            output: OutputMode::Human,
            config: EffectiveConfig {
                limits: CycleLimits::default(),
                budget: SccBudget::unbounded(),
            },
        }
    }

    #[test]
    fn full_report_combines_all_families() {
        let snapshot: Snapshot = serde_json::from_str(LAYERED).expect("parses");
        let report = build_full_report(&snapshot, context()).expect("report");

        assert_eq!(report.lakos.cumulative_component_dependency, 5);
        assert_eq!(report.lakos.depends_on("domain"), Some(1));

        let domain = report.martin.get("domain").expect("domain present");
        assert_eq!((domain.efferent_coupling, domain.afferent_coupling), (0, 2));
        assert!((domain.abstractness - 0.5).abs() < 1e-12);

        assert!(
            report
                .visibility
                .relative_visibility("domain")
                .is_some_and(|rv| (rv - 0.5).abs() < 1e-12)
        );
        assert!(report.cycles.cycles.is_empty());
    }

    #[test]
    fn human_renderers_label_every_aggregate() {
        let snapshot: Snapshot = serde_json::from_str(LAYERED).expect("parses");
        let report = build_full_report(&snapshot, context()).expect("report");

        let mut out = Vec::new();
        render_lakos_human(&report.lakos, &mut out).expect("render");
        render_visibility_human(&report.visibility, &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        for label in ["CCD:", "ACD:", "RACD:", "NCCD:", "ARV:", "GRV:"] {
            assert!(rendered.contains(label), "missing {label}");
        }
    }
}
