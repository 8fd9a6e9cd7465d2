use std::path::Path;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use referendum_atlas::aggregate::compute_results_by_region;
use referendum_atlas::config::load_config;
use referendum_atlas::load::{
    load_departments, load_referendum, load_region_shapes, load_regions,
};
use referendum_atlas::merge::{merge_referendum_and_areas, merge_regions_and_departments};
use referendum_atlas::render::{render_choropleth, write_results_csv};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "atlas.toml".to_string());
    let cfg = load_config(&config_path)?;
    info!(config = %config_path, strict = cfg.strict, "starting referendum atlas");

    let regions = load_regions(Path::new(&cfg.regions))?;
    let departments = load_departments(Path::new(&cfg.departments))?;
    let referendum = load_referendum(Path::new(&cfg.referendum))?;

    let (region_departments, report) =
        merge_regions_and_departments(&regions, &departments, cfg.strict)?;
    info!(
        kept = report.kept,
        unmatched = report.unmatched,
        "merged regions and departments"
    );

    let (referendum_areas, report) =
        merge_referendum_and_areas(&referendum, &region_departments, cfg.strict)?;
    info!(
        kept = report.kept,
        dropped_overseas = report.dropped_overseas,
        unmatched = report.unmatched,
        "merged referendum and areas"
    );

    let results = compute_results_by_region(&referendum_areas);
    for result in &results {
        let ratio = result
            .counts
            .ratio()
            .map(|r| format!("{:.4}", r))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<32} registered {:>9}  choice A {:>9}  choice B {:>9}  ratio {}",
            result.region_code,
            result.region_name,
            result.counts.registered,
            result.counts.choice_a,
            result.counts.choice_b,
            ratio,
        );
    }

    let shapes = load_region_shapes(Path::new(&cfg.geometry))?;
    let svg = render_choropleth(&shapes, &results);
    std::fs::write(&cfg.map_output, svg)
        .with_context(|| format!("failed to write {}", cfg.map_output))?;
    info!(path = %cfg.map_output, "wrote choropleth");

    write_results_csv(Path::new(&cfg.table_output), &results)?;

    Ok(())
}
