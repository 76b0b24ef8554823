//! Fuzzing entry points for pixpack-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_container

use pixpack_core::{
    decoder::{decode_container, record_path},
    pixels::{pack, unpack},
    raster::decode_raster,
};

/// Decode arbitrary bytes as a container; must never panic
pub fn fuzz_container(data: &[u8]) {
    if let Ok(records) = decode_container(data.to_vec()) {
        for record in records {
            // Every accepted name is a relative path
            let path = record_path(&record.name).unwrap_or_default();
            assert!(path.is_relative());
        }
    }
}

/// Treat arbitrary bytes as pixel data, then decode the container
pub fn fuzz_pixels(data: &[u8]) {
    if let Ok(raster) = pack(data) {
        let raw = unpack(raster);
        assert_eq!(&raw[..data.len()], data);
        let _ = decode_container(raw);
    }
}

/// Decode arbitrary bytes as an image file, then as a container
pub fn fuzz_image(data: &[u8]) {
    if let Ok(raster) = decode_raster(data) {
        let _ = decode_container(unpack(raster));
    }
}
