//! Batch orchestration: many inputs in, one report out
//!
//! One bad input never aborts a batch. Unreadable or oversized source files
//! are skipped during [`encode`]; broken images are reported and rolled back
//! during [`decode`] while the remaining images are still processed.

use crate::config::PackConfig;
use crate::constants::MAX_DATA_LEN;
use crate::decoder::decode_container;
use crate::encoder::ContainerBuilder;
use crate::error::PackError;
use crate::extract::extract_records;
use crate::pixels::{pack, unpack};
use crate::raster::{read_raster, write_raster};
use crate::types::Record;
use crate::walker::{collect_images, collect_sources, SkippedInput};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "logging")]
use tracing::{debug, info, warn};

/// Receives progress notifications while a batch runs
pub trait ProgressObserver {
    /// A record was framed; byte counts come from file sizes at enumeration
    fn on_record(&mut self, _name: &str, _bytes_done: u64, _bytes_total: u64) {}

    /// Decoding of image `index` (0-based) out of `total` is starting
    fn on_image(&mut self, _path: &Path, _index: usize, _total: usize) {}
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Outcome of one [`encode`] call
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeReport {
    /// Image path that was (or would have been) written
    pub output: PathBuf,

    /// Stored names of the framed records, in container order
    pub encoded: Vec<String>,

    /// Inputs left out, with the reason
    pub skipped: Vec<SkippedInput>,

    /// Container length in bytes
    pub container_len: usize,

    /// Side length of the square raster
    pub side: u32,

    /// Set when no image was written
    pub error: Option<PackError>,
}

impl EncodeReport {
    fn new(output: &Path) -> Self {
        Self {
            output: output.to_path_buf(),
            encoded: Vec::new(),
            skipped: Vec::new(),
            container_len: 0,
            side: 0,
            error: None,
        }
    }

    /// True when the image was written
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    /// Paths of the skipped inputs
    pub fn skipped_paths(&self) -> Vec<&Path> {
        self.skipped.iter().map(|s| s.path.as_path()).collect()
    }
}

/// Files recovered from one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    /// Source image
    pub image: PathBuf,

    /// Files written for it
    pub files: Vec<PathBuf>,
}

/// An image that produced no files, and why
#[derive(Debug, Clone, PartialEq)]
pub struct FailedImage {
    /// Source image
    pub path: PathBuf,

    /// What went wrong
    pub error: PackError,
}

/// Outcome of one [`decode`] call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodeReport {
    /// Images fully extracted
    pub extracted: Vec<ExtractedImage>,

    /// Images that failed; none of their files remain on disk
    pub failed: Vec<FailedImage>,

    /// Set when the batch could not start at all
    pub error: Option<PackError>,
}

impl DecodeReport {
    /// True when at least one image was extracted
    pub fn success(&self) -> bool {
        self.error.is_none() && !self.extracted.is_empty()
    }

    /// Paths of the failed images
    pub fn failed_images(&self) -> Vec<&Path> {
        self.failed.iter().map(|f| f.path.as_path()).collect()
    }

    /// Every file written across all images
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.extracted.iter().flat_map(|e| e.files.iter())
    }
}

/// Pack every input file into one PNG at `output`.
///
/// Directories are walked recursively. Files that cannot be read, or whose
/// stored name exceeds 255 bytes, are skipped and listed in the report. If
/// nothing could be framed, or the image cannot be written, the report
/// carries the error and `output` is left as it was.
pub fn encode(
    inputs: &[PathBuf],
    output: &Path,
    config: &PackConfig,
    progress: &mut dyn ProgressObserver,
) -> EncodeReport {
    let mut report = EncodeReport::new(output);

    if let Err(e) = config.validate() {
        report.error = Some(e);
        return report;
    }

    #[cfg(feature = "logging")]
    info!("Encoding {} inputs into {}", inputs.len(), output.display());

    let sources = collect_sources(inputs, config);
    report.skipped = sources.skipped.clone();

    let total = sources.total_bytes();
    let mut done = 0u64;
    let mut builder = ContainerBuilder::new();

    for file in &sources.files {
        if file.len > MAX_DATA_LEN {
            let error = PackError::DataTooLarge(file.len, MAX_DATA_LEN);
            report.skipped.push(SkippedInput::new(&file.path, error));
            continue;
        }

        let data = match fs::read(&file.path) {
            Ok(data) => data,
            Err(e) => {
                let error = PackError::read(&file.path, e);
                report.skipped.push(SkippedInput::new(&file.path, error));
                continue;
            }
        };

        let record = Record::new(file.name.clone(), data);
        if let Err(e) = builder.push(&record) {
            report.skipped.push(SkippedInput::new(&file.path, e));
            continue;
        }

        done += file.len;
        progress.on_record(&file.name, done.min(total), total);
        report.encoded.push(file.name.clone());
    }

    if builder.is_empty() {
        #[cfg(feature = "logging")]
        warn!("No input files could be framed; not writing {}", output.display());

        report.error = Some(PackError::NoInputs);
        return report;
    }

    let container = builder.finish();
    report.container_len = container.len();

    let raster = match pack(&container) {
        Ok(raster) => raster,
        Err(e) => {
            report.error = Some(e);
            return report;
        }
    };
    report.side = raster.width();

    if let Err(e) = write_raster(output, &raster) {
        #[cfg(feature = "logging")]
        warn!("Encoding into {} failed: {}", output.display(), e);

        report.error = Some(e);
        return report;
    }

    #[cfg(feature = "logging")]
    info!(
        "Packed {} files ({} bytes) into a {}x{} image, skipped {}",
        report.encoded.len(),
        report.container_len,
        report.side,
        report.side,
        report.skipped.len()
    );

    report
}

/// Recover the files stored in each image under `output_dir`.
///
/// Images are handled independently: one that cannot be read, does not parse,
/// names a path outside `output_dir`, or fails while writing is listed in
/// `failed`, and any of its files already written are removed.
pub fn decode(
    inputs: &[PathBuf],
    output_dir: &Path,
    config: &PackConfig,
    progress: &mut dyn ProgressObserver,
) -> DecodeReport {
    let mut report = DecodeReport::default();

    if let Err(e) = config.validate() {
        report.error = Some(e);
        return report;
    }

    let (images, skipped) = collect_images(inputs, config);
    report.failed = skipped
        .into_iter()
        .map(|s| FailedImage {
            path: s.path,
            error: s.error,
        })
        .collect();

    #[cfg(feature = "logging")]
    info!(
        "Decoding {} images into {}",
        images.len(),
        output_dir.display()
    );

    for (index, image) in images.iter().enumerate() {
        progress.on_image(image, index, images.len());

        match decode_image(image, output_dir) {
            Ok(files) => {
                #[cfg(feature = "logging")]
                info!("Extracted {} files from {}", files.len(), image.display());

                report.extracted.push(ExtractedImage {
                    image: image.clone(),
                    files,
                });
            }
            Err(error) => {
                #[cfg(feature = "logging")]
                warn!("Failed to decode {}: {}", image.display(), error);

                report.failed.push(FailedImage {
                    path: image.clone(),
                    error,
                });
            }
        }
    }

    report
}

/// Read, unpack, parse and extract a single image
pub fn decode_image(image: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, PackError> {
    let records = read_records(image)?;
    extract_records(&records, output_dir)
}

/// Parse the records stored in an image without writing anything
pub fn read_records(image: &Path) -> Result<Vec<Record>, PackError> {
    let raster = read_raster(image)?;

    #[cfg(feature = "logging")]
    {
        if raster.width() != raster.height() {
            debug!(
                "{} is {}x{}, not square; reading it anyway",
                image.display(),
                raster.width(),
                raster.height()
            );
        }
    }

    decode_container(unpack(raster))
}
