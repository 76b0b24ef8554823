//! Basic encoding example

use pixpack_core::{decode, encode, NoProgress, PackConfig};
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Pixpack Basic Encoding Example\n");

    let workdir = tempfile::tempdir()?;
    let project = workdir.path().join("project");
    fs::create_dir_all(project.join("src"))?;

    // A small tree with text and binary content
    fs::write(project.join("README.md"), "# demo project\n")?;
    fs::write(project.join("src").join("main.rs"), "fn main() {}\n")?;
    fs::write(
        project.join("logo.bin"),
        (0..=255u8).cycle().take(1000).collect::<Vec<_>>(),
    )?;

    let image = workdir.path().join("project.png");
    let config = PackConfig::default();

    let report = encode(&[project], &image, &config, &mut NoProgress);
    if let Some(err) = report.error {
        return Err(err.into());
    }

    for name in &report.encoded {
        println!("Packed {}", name);
    }
    println!(
        "\nContainer: {} bytes -> {}x{} image ({} bytes on disk)",
        report.container_len,
        report.side,
        report.side,
        fs::metadata(&image)?.len()
    );

    let restored = workdir.path().join("restored");
    let report = decode(&[image], &restored, &config, &mut NoProgress);
    println!("\nRestored {} files:", report.files().count());

    for file in report.files() {
        let rel = file.strip_prefix(&restored)?;
        let original = fs::read(workdir.path().join(rel))?;
        let same = fs::read(file)? == original;
        println!("  {} {}", if same { "✓" } else { "✗" }, rel.display());
    }

    Ok(())
}
