//! Per-network orchestration: settle, load, warm up, measure, persist, aggregate.

use std::{path::PathBuf, thread};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    engine::Engine,
    manifest::ImageSet,
    measure::measure_images,
    network::Network,
    plan::ProfilePlan,
    report::{aggregate_runtime_table, write_runtime_table, write_summary_table},
    warmup::warm_up,
};

/// Profile every network of the plan in order, stopping at the first fatal error.
pub fn run_profile<E: Engine>(engine: &E, plan: &ProfilePlan, images: &ImageSet) -> Result<()> {
    info!(
        "Profiling {} network(s) on {} image(s) with {} (profile: {})",
        plan.networks.len(),
        images.len(),
        engine.name(),
        plan.profile
    );
    for &network in &plan.networks {
        profile_network(engine, network, plan, images)?;
    }
    Ok(())
}

/// Run one network end to end.
///
/// When profiling is enabled the aggregation step always runs, even if
/// loading, warm-up or measurement failed. The first error wins; an
/// aggregation error that follows a measurement error is only logged.
pub fn profile_network<E: Engine>(
    engine: &E,
    network: Network,
    plan: &ProfilePlan,
    images: &ImageSet,
) -> Result<()> {
    info!("==========================");
    info!("network: {network}");
    info!("==========================");

    let outcome = measure_network(engine, network, plan, images);
    if !plan.profile {
        return outcome;
    }

    let aggregated = aggregate_network(network, plan);
    match (outcome, aggregated) {
        (Ok(()), aggregated) => aggregated.map(|path| {
            info!("saved to {}", path.display());
        }),
        (Err(err), Ok(path)) => {
            info!("saved to {}", path.display());
            Err(err)
        }
        (Err(err), Err(agg_err)) => {
            warn!("aggregation for {network} also failed: {agg_err:#}");
            Err(err)
        }
    }
}

fn measure_network<E: Engine>(
    engine: &E,
    network: Network,
    plan: &ProfilePlan,
    images: &ImageSet,
) -> Result<()> {
    thread::sleep(plan.settle_delay);
    let mut model = engine
        .load(network)
        .with_context(|| format!("failed to construct {} classifier for {network}", engine.name()))?;

    let warmup = warm_up(&mut model, images, plan.warmup_images);
    if warmup.attempted > 0 && warmup.succeeded == 0 {
        warn!("every warm-up classification for {network} failed");
    }
    if !plan.profile {
        return Ok(());
    }

    let results = measure_images(&mut model, images, plan.repeat_count);

    let path = plan.runtime_table_path(network);
    info!("start saving results ...");
    write_runtime_table(&path, &results, plan.repeat_count)?;
    info!("Wrote {} row(s) to {}", results.len(), path.display());
    Ok(())
}

fn aggregate_network(network: Network, plan: &ProfilePlan) -> Result<PathBuf> {
    thread::sleep(plan.aggregate_delay);
    let raw = plan.runtime_table_path(network);
    let rows = aggregate_runtime_table(&raw, plan.repeat_count)?;
    let summary = plan.summary_table_path(network);
    write_summary_table(&summary, &rows)?;
    Ok(summary)
}
