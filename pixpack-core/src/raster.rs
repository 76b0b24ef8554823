//! Raster persistence: lossless PNG out, any decodable image in

#[cfg(feature = "logging")]
use crate::constants::IMAGE_EXTENSION;
use crate::error::PackError;
use crate::extract::stage_in;
use image::{DynamicImage, ImageFormat, ImageReader, Limits, RgbImage};
use std::io::{BufRead, Cursor, Seek, Write};
use std::path::Path;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Write a raster as an 8-bit RGB PNG.
///
/// The PNG encoding is used whatever the path's extension says, so the
/// pixel values survive exactly. The image is written to a temporary file
/// in the same directory and renamed over `path` only once complete; on
/// failure `path` is left as it was.
pub fn write_raster(path: &Path, raster: &RgbImage) -> Result<(), PackError> {
    #[cfg(feature = "logging")]
    {
        let has_png_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(IMAGE_EXTENSION));
        if !has_png_extension {
            warn!(
                "Output {} does not end in .{}; writing PNG data anyway",
                path.display(),
                IMAGE_EXTENSION
            );
        }
    }

    let png = encode_png(raster).map_err(|e| write_error(path, e))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = stage_in(dir).map_err(|e| write_error(path, e))?;
    staged.write_all(&png).map_err(|e| write_error(path, e))?;
    staged.persist(path).map_err(|e| write_error(path, e.error))?;

    #[cfg(feature = "logging")]
    debug!(
        "Wrote {}x{} raster to {}",
        raster.width(),
        raster.height(),
        path.display()
    );

    Ok(())
}

/// Decoder limits for container images.
///
/// Records may hold up to 4 GiB each and a container any number of them,
/// so only available memory bounds the raster.
pub fn decode_limits() -> Limits {
    Limits::no_limits()
}

/// Load an image file and normalize it to interleaved 8-bit RGB
pub fn read_raster(path: &Path) -> Result<RgbImage, PackError> {
    let reader = ImageReader::open(path).map_err(|e| image_error(path, e))?;
    let image = decode_with_limits(reader, path)?;

    #[cfg(feature = "logging")]
    debug!(
        "Read {}x{} image ({:?}) from {}",
        image.width(),
        image.height(),
        image.color(),
        path.display()
    );

    Ok(normalize(image))
}

/// Encode a raster to PNG bytes in memory
pub fn encode_png(raster: &RgbImage) -> Result<Vec<u8>, PackError> {
    if raster.width() == 0 || raster.height() == 0 {
        return Err(PackError::InvalidRaster("empty raster".into()));
    }

    let mut out = Cursor::new(Vec::new());
    raster
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| PackError::InvalidRaster(e.to_string()))?;
    Ok(out.into_inner())
}

/// Decode image bytes held in memory and normalize them to 8-bit RGB
pub fn decode_raster(data: &[u8]) -> Result<RgbImage, PackError> {
    let image = decode_with_limits(ImageReader::new(Cursor::new(data)), Path::new("<memory>"))?;
    Ok(normalize(image))
}

fn decode_with_limits<R: BufRead + Seek>(
    reader: ImageReader<R>,
    path: &Path,
) -> Result<DynamicImage, PackError> {
    let mut reader = reader
        .with_guessed_format()
        .map_err(|e| image_error(path, e))?;
    reader.limits(decode_limits());
    reader.decode().map_err(|e| image_error(path, e))
}

/// Drop alpha, expand palettes and scale 16-bit channels down
fn normalize(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

fn write_error(path: &Path, err: impl ToString) -> PackError {
    PackError::Write {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

fn image_error(path: &Path, err: impl ToString) -> PackError {
    PackError::ImageRead {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
