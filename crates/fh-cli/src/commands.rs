use anyhow::{Context, Result, anyhow};
use fh_cli::config::{ConfigOverrides, FlightHubConfig};
use fh_cli::pipeline::{PipelineOutcome, open_source, run_pipeline};
use fh_output::{DashboardKpis, ExportArtifact, export_to_dir, table_insight};
use tracing::info;

use crate::cli::{ExportArgs, InsightArgs, RunArgs, SourceArgs};
use crate::progress::load_progress;
use crate::summary::{print_export, print_kpis, print_run_summary, print_tables};

fn execute(config: &FlightHubConfig) -> Result<PipelineOutcome> {
    let mut source = open_source(&config.source)?;
    let mut progress = load_progress();
    run_pipeline(source.as_mut(), config, progress.as_mut())
}

fn export(outcome: &PipelineOutcome, config: &FlightHubConfig) -> Result<ExportArtifact> {
    // always the unfiltered booking view
    export_to_dir(
        &outcome.views.bookings,
        config.export.format,
        &config.export.dir,
    )
    .with_context(|| format!("export to {}", config.export.dir.display()))
}

fn configured(config: FlightHubConfig, overrides: &ConfigOverrides) -> FlightHubConfig {
    let config = config.with_overrides(overrides);
    if config.simulation.seed.is_none() {
        info!("no simulation seed given, results will differ between runs");
    }
    config
}

pub fn run_pipeline_command(args: &RunArgs, config: FlightHubConfig) -> Result<()> {
    let overrides = args.pipeline.overrides(Some(&args.target));
    let config = configured(config, &overrides);
    let outcome = execute(&config)?;
    let kpis = DashboardKpis::compute(&outcome.views.bookings).context("compute KPIs")?;
    print_run_summary(&outcome);
    print_kpis(&kpis);
    if args.export {
        let artifact = export(&outcome, &config)?;
        print_export(&artifact);
    }
    Ok(())
}

pub fn run_export(args: &ExportArgs, config: FlightHubConfig) -> Result<()> {
    let overrides = args.pipeline.overrides(Some(&args.target));
    let config = configured(config, &overrides);
    let outcome = execute(&config)?;
    let artifact = export(&outcome, &config)?;
    print_export(&artifact);
    Ok(())
}

pub fn run_tables(args: &SourceArgs, config: FlightHubConfig) -> Result<()> {
    let config = config.with_overrides(&ConfigOverrides::from(args));
    let mut source = open_source(&config.source)?;
    let mut rows = Vec::new();
    for table in source.table_names().context("list tables")? {
        let count = source
            .row_count(&table)
            .with_context(|| format!("count rows of {table}"))?;
        rows.push((table, count));
    }
    println!("Source: {}", source.describe());
    print_tables(&rows);
    Ok(())
}

pub fn run_insight(args: &InsightArgs, config: FlightHubConfig) -> Result<()> {
    let overrides = args.pipeline.overrides(None);
    let config = configured(config, &overrides);
    let outcome = execute(&config)?;
    let name = args.view.name();
    let view = outcome
        .views
        .view(name)
        .ok_or_else(|| anyhow!("unknown view {name}"))?;
    print!("{}", table_insight(view, name));
    Ok(())
}
