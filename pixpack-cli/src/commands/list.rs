use anyhow::{Context, Result};
use pixpack_core::batch::read_records;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One record as shown by `pixpack list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedRecord {
    pub name: String,
    pub size: usize,
}

/// Parse an image's container and print its records without writing files
pub fn execute(image: &Path, json: bool) -> Result<Vec<ListedRecord>> {
    info!("Listing {}", image.display());

    let records = read_records(image)
        .with_context(|| format!("Failed to read container from {}", image.display()))?;

    let listed: Vec<ListedRecord> = records
        .iter()
        .map(|r| ListedRecord {
            name: String::from_utf8_lossy(&r.name).into_owned(),
            size: r.data.len(),
        })
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&listed)
            .with_context(|| "Failed to serialize record list")?;
        println!("{}", out);
    } else {
        println!("=== {} ===", image.display());
        for record in &listed {
            println!("{:>12}  {}", record.size, record.name);
        }
        let total: usize = listed.iter().map(|r| r.size).sum();
        println!("{} files, {} bytes", listed.len(), total);
    }

    Ok(listed)
}
