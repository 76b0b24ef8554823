use crate::progress::BarProgress;
use anyhow::{bail, Result};
use colored::*;
use pixpack_core::{decode, DecodeReport, NoProgress, PackConfig};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn execute(
    images: &[PathBuf],
    output_dir: &Path,
    config: &PackConfig,
    progress: bool,
) -> Result<DecodeReport> {
    info!(
        "Decoding {} inputs into {}",
        images.len(),
        output_dir.display()
    );

    let report = if progress {
        let mut bar = BarProgress::images();
        let report = decode(images, output_dir, config, &mut bar);
        bar.finish();
        report
    } else {
        decode(images, output_dir, config, &mut NoProgress)
    };

    print_report(&report);

    if let Some(err) = &report.error {
        bail!("Failed to decode: {}", err);
    }
    if !report.success() {
        bail!("No image could be decoded");
    }

    Ok(report)
}

fn print_report(report: &DecodeReport) {
    println!("\n=== Decode Results ===");
    println!("Images decoded:    {}", report.extracted.len());
    println!("Images failed:     {}", report.failed.len());
    println!("Files written:     {}", report.files().count());
    println!();

    for image in &report.extracted {
        println!(
            "{} {} ({} files)",
            "✓".green(),
            image.image.display(),
            image.files.len()
        );
    }

    for failed in &report.failed {
        println!("{} {}: {}", "✗".red(), failed.path.display(), failed.error);
    }
}
