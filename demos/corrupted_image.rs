//! Example showing that a damaged image never leaves partial files behind

use pixpack_core::{
    decode, encode,
    pixels::unpack,
    raster::{read_raster, write_raster},
    NoProgress, PackConfig,
};
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Pixpack Corrupted Image Example\n");

    let workdir = tempfile::tempdir()?;
    let config = PackConfig::default();

    // Step 1: Pack ten sensor logs into one image
    println!("Step 1: Packing 10 files...");
    let mut inputs = Vec::new();
    for i in 1..=10 {
        let path = workdir.path().join(format!("sensor{:02}.log", i));
        fs::write(&path, format!("Important data from sensor {}\n", i).repeat(20))?;
        inputs.push(path);
    }

    let image = workdir.path().join("sensors.png");
    let report = encode(&inputs, &image, &config, &mut NoProgress);
    if let Some(err) = report.error {
        return Err(err.into());
    }
    println!("Packed into a {}x{} image\n", report.side, report.side);

    // Step 2: Lose the bottom half of the picture
    println!("Step 2: Cropping the image to half its height...");
    let raster = read_raster(&image)?;
    let (width, height) = raster.dimensions();
    let half = height / 2;
    let raw = unpack(raster);
    let kept = raw[..(width * half * 3) as usize].to_vec();
    let cropped = image::RgbImage::from_raw(width, half, kept).ok_or("crop failed")?;
    let damaged = workdir.path().join("damaged.png");
    write_raster(&damaged, &cropped)?;

    // Step 3: Decode the damaged and the intact image into separate folders
    println!("Step 3: Decoding both images...\n");
    let damaged_out = workdir.path().join("from_damaged");
    let report = decode(&[damaged], &damaged_out, &config, &mut NoProgress);

    for failed in &report.failed {
        println!("  ✗ {}: {}", failed.path.display(), failed.error);
    }
    let leftovers = fs::read_dir(&damaged_out).map(|d| d.count()).unwrap_or(0);
    println!("  Files left behind from the damaged image: {}", leftovers);

    let intact_out = workdir.path().join("from_intact");
    let report = decode(&[image], &intact_out, &config, &mut NoProgress);
    println!(
        "  ✓ Intact image restored {} files",
        report.files().count()
    );

    Ok(())
}
