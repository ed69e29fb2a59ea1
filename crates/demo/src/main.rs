mod logger;
mod sample;

use std::path::Path;

use anyhow::Context;
use thinnizator::{ScanDepth, Thinnizator, ThinnizatorConfig};

fn main() -> anyhow::Result<()> {
    logger::init_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => ThinnizatorConfig::default().with_scan_depth(ScanDepth::Descendants),
    };
    tracing::info!("config: {}", serde_json::to_string(&config)?);

    let mut scene = sample::furnished_room()?;
    let meshes_before = scene.meshes.len();
    let mut thinnizator = Thinnizator::new(config);

    let preview = thinnizator.collect_named(sample::ROOT, &scene);
    for (fingerprint, group) in preview.iter() {
        tracing::info!("group {fingerprint}: {} member(s)", group.members.len());
    }
    for marker in thinnizator.spawn_points() {
        tracing::info!("spawn point {}", marker.label());
    }

    let report = thinnizator.thinnize_named(sample::ROOT, sample::OUTPUT, &mut scene)?;

    for outcome in &report.groups {
        println!(
            "{:<16} {:<24} {:>3} member(s)  {}",
            outcome.fingerprint.as_str(),
            outcome.prefab_name,
            outcome.member_count,
            outcome.status
        );
    }
    for skipped in &report.skipped {
        println!("skipped: {}", skipped.status());
    }
    println!(
        "meshes: {meshes_before} -> {} ({} disposed, {} failed)",
        scene.meshes.len(),
        report.disposed.len(),
        report.disposal_failures.len()
    );

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<ThinnizatorConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}
