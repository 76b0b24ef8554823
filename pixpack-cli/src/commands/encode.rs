use crate::progress::BarProgress;
use anyhow::{bail, Result};
use colored::*;
use pixpack_core::{encode, EncodeReport, NoProgress, PackConfig};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn execute(
    inputs: &[PathBuf],
    output: &Path,
    config: &PackConfig,
    progress: bool,
) -> Result<EncodeReport> {
    info!("Encoding {} inputs into {}", inputs.len(), output.display());

    let report = if progress {
        let mut bar = BarProgress::bytes();
        let report = encode(inputs, output, config, &mut bar);
        bar.finish();
        report
    } else {
        encode(inputs, output, config, &mut NoProgress)
    };

    print_report(&report);

    if let Some(err) = &report.error {
        bail!("Failed to encode {}: {}", output.display(), err);
    }

    Ok(report)
}

fn print_report(report: &EncodeReport) {
    println!("\n=== Encode Results ===");
    println!("Files encoded:     {}", report.encoded.len());
    println!("Files skipped:     {}", report.skipped.len());
    println!("Container size:    {} bytes", report.container_len);
    if report.side > 0 {
        println!("Image size:        {}x{} pixels", report.side, report.side);
    }
    println!();

    for skipped in &report.skipped {
        println!(
            "{} {}: {}",
            "!".yellow(),
            skipped.path.display(),
            skipped.error
        );
    }

    if report.success() {
        println!("{} Wrote {}", "✓".green(), report.output.display());
    } else {
        println!("{} No image written", "✗".red());
    }
}
