//! Integration tests for the complete files → image → files flow

use pixpack_core::{
    batch::{decode, encode, read_records},
    pixels::{pack, unpack},
    raster::{encode_png, read_raster, write_raster},
    ErrorKind, NoProgress, PackConfig, PackError,
};
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Map every file below `root` to its contents, keyed by relative path
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut files = BTreeMap::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                files.insert(rel, fs::read(&path).unwrap());
            }
        }
    }

    files
}

fn encode_ok(inputs: &[PathBuf], output: &Path) {
    let report = encode(inputs, output, &PackConfig::default(), &mut NoProgress);
    assert!(report.success(), "encode failed: {:?}", report.error);
}

#[test]
fn test_full_workflow_files_and_directories() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    let tree = src.join("project");
    fs::create_dir_all(tree.join("assets").join("icons")).unwrap();
    fs::write(tree.join("README.md"), b"# hello\n").unwrap();
    fs::write(tree.join("assets").join("icons").join("logo.bin"), [0u8, 255, 7, 0, 0]).unwrap();
    fs::write(tree.join("assets").join("empty.dat"), b"").unwrap();
    fs::write(src.join("loose.txt"), "loose file ü".as_bytes()).unwrap();

    let image = td.path().join("packed.png");
    encode_ok(&[src.join("loose.txt"), tree], &image);

    let out = td.path().join("out");
    let report = decode(&[image], &out, &PackConfig::default(), &mut NoProgress);
    assert!(report.success());
    assert!(report.failed.is_empty());
    assert_eq!(report.files().count(), 4);

    let restored = snapshot(&out);
    let expected = snapshot(&src);
    assert_eq!(restored, expected);
}

#[test]
fn test_random_binary_round_trip() {
    let td = tempdir().unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let mut inputs = Vec::new();

    // Sizes chosen to hit every remainder modulo 3
    for (i, size) in [0usize, 1, 2, 3, 4, 5, 1000, 4096, 65_537].iter().enumerate() {
        let data: Vec<u8> = (0..*size).map(|_| rng.gen()).collect();
        let path = td.path().join(format!("blob{}.bin", i));
        fs::write(&path, &data).unwrap();
        inputs.push(path);
    }

    let image = td.path().join("blobs.png");
    encode_ok(&inputs, &image);

    let out = td.path().join("out");
    assert!(decode(&[image], &out, &PackConfig::default(), &mut NoProgress).success());

    for input in &inputs {
        let name = input.file_name().unwrap();
        assert_eq!(fs::read(out.join(name)).unwrap(), fs::read(input).unwrap());
    }
}

#[test]
fn test_encoding_is_deterministic() {
    let td = tempdir().unwrap();
    let dir = td.path().join("data");
    fs::create_dir_all(dir.join("b")).unwrap();
    fs::write(dir.join("z.txt"), b"zzz").unwrap();
    fs::write(dir.join("a.txt"), b"a").unwrap();
    fs::write(dir.join("b").join("m.txt"), b"mm").unwrap();

    let first = td.path().join("first.png");
    let second = td.path().join("second.png");
    encode_ok(&[dir.clone()], &first);
    encode_ok(&[dir], &second);

    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}

#[test]
fn test_decoding_is_idempotent() {
    let td = tempdir().unwrap();
    let file = td.path().join("note.txt");
    fs::write(&file, b"same every time").unwrap();
    let image = td.path().join("note.png");
    encode_ok(&[file], &image);

    let out = td.path().join("out");
    let first = decode(&[image.clone()], &out, &PackConfig::default(), &mut NoProgress);
    let after_first = snapshot(&out);
    let second = decode(&[image], &out, &PackConfig::default(), &mut NoProgress);

    assert!(first.success() && second.success());
    assert_eq!(first.extracted, second.extracted);
    assert_eq!(snapshot(&out), after_first);
}

#[test]
fn test_empty_input_writes_no_image() {
    let td = tempdir().unwrap();
    let image = td.path().join("nothing.png");

    let report = encode(&[], &image, &PackConfig::default(), &mut NoProgress);
    assert!(!report.success());
    assert_eq!(report.error, Some(PackError::NoInputs));
    assert!(!image.exists());
}

#[test]
fn test_only_unreadable_inputs_fail() {
    let td = tempdir().unwrap();
    let image = td.path().join("nothing.png");
    let missing = td.path().join("missing.txt");

    let report = encode(&[missing.clone()], &image, &PackConfig::default(), &mut NoProgress);
    assert!(!report.success());
    assert_eq!(report.skipped_paths(), vec![missing.as_path()]);
    assert_eq!(report.skipped[0].error.kind(), ErrorKind::Read);
    assert!(!image.exists());
}

#[test]
fn test_unreadable_input_is_skipped() {
    let td = tempdir().unwrap();
    let good = td.path().join("good.txt");
    let missing = td.path().join("missing.txt");
    fs::write(&good, b"good").unwrap();
    let image = td.path().join("partial.png");

    let report = encode(
        &[missing.clone(), good],
        &image,
        &PackConfig::default(),
        &mut NoProgress,
    );
    assert!(report.success());
    assert_eq!(report.encoded, vec!["good.txt".to_string()]);
    assert_eq!(report.skipped_paths(), vec![missing.as_path()]);

    let records = read_records(&image).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data.as_ref(), b"good");
}

#[test]
fn test_truncated_image_leaves_no_files() {
    let td = tempdir().unwrap();
    let big = td.path().join("big.bin");
    let small = td.path().join("small.bin");
    fs::write(&small, [1u8; 10]).unwrap();
    fs::write(&big, vec![0xABu8; 3000]).unwrap();
    let image = td.path().join("packed.png");
    encode_ok(&[small, big], &image);

    // Keep only the first rows: the first record survives, the second is cut
    let raster = read_raster(&image).unwrap();
    let side = raster.width();
    let bytes = unpack(raster);
    let cut = bytes[..(side as usize * 3 * 4)].to_vec();
    let truncated = image::RgbImage::from_raw(side, 4, cut).unwrap();
    let broken = td.path().join("broken.png");
    write_raster(&broken, &truncated).unwrap();

    let out = td.path().join("out");
    let report = decode(&[broken.clone()], &out, &PackConfig::default(), &mut NoProgress);

    assert!(!report.success());
    assert_eq!(report.failed_images(), vec![broken.as_path()]);
    assert!(matches!(
        report.failed[0].error,
        PackError::Truncated { field: "data", .. }
    ));
    assert!(!out.exists() || snapshot(&out).is_empty());
}

#[test]
fn test_bad_image_does_not_abort_batch() {
    let td = tempdir().unwrap();
    let file = td.path().join("ok.txt");
    fs::write(&file, b"ok").unwrap();
    let good = td.path().join("good.png");
    encode_ok(&[file], &good);

    let not_image = td.path().join("fake.png");
    fs::write(&not_image, b"not an image").unwrap();

    // A valid PNG whose pixels do not hold a container
    let noise = td.path().join("noise.png");
    let raster = pack(&[7u8, b'a', b'b', b'c']).unwrap();
    fs::write(&noise, encode_png(&raster).unwrap()).unwrap();

    let out = td.path().join("out");
    let report = decode(
        &[not_image.clone(), noise.clone(), good],
        &out,
        &PackConfig::default(),
        &mut NoProgress,
    );

    assert!(report.success());
    assert_eq!(report.extracted.len(), 1);
    assert_eq!(report.failed_images(), vec![not_image.as_path(), noise.as_path()]);
    assert_eq!(report.failed[0].error.kind(), ErrorKind::ImageRead);
    assert_eq!(report.failed[1].error.kind(), ErrorKind::DecodeStructural);
    assert_eq!(snapshot(&out).len(), 1);
}

#[test]
fn test_traversal_name_is_rejected() {
    let td = tempdir().unwrap();
    let container = pixpack_core::encoder::encode_container(&[
        pixpack_core::Record::new("safe.txt", vec![1u8]),
        pixpack_core::Record::new("../escaped.txt", vec![2u8]),
    ])
    .unwrap();
    let image = td.path().join("evil.png");
    write_raster(&image, &pack(&container).unwrap()).unwrap();

    let out = td.path().join("out");
    let report = decode(&[image], &out, &PackConfig::default(), &mut NoProgress);

    assert!(!report.success());
    assert!(matches!(report.failed[0].error, PackError::UnsafeName(_)));
    assert!(!td.path().join("escaped.txt").exists());
    assert!(!out.join("safe.txt").exists());
}

#[test]
fn test_decode_directory_of_images() {
    let td = tempdir().unwrap();
    let images = td.path().join("images");
    fs::create_dir(&images).unwrap();

    for name in ["one", "two"] {
        let file = td.path().join(format!("{}.txt", name));
        fs::write(&file, name).unwrap();
        encode_ok(&[file], &images.join(format!("{}.png", name)));
    }
    fs::write(images.join("readme.txt"), b"ignored").unwrap();

    let out = td.path().join("out");
    let report = decode(&[images], &out, &PackConfig::default(), &mut NoProgress);

    assert!(report.success());
    assert_eq!(report.extracted.len(), 2);
    assert_eq!(fs::read(out.join("one.txt")).unwrap(), b"one");
    assert_eq!(fs::read(out.join("two.txt")).unwrap(), b"two");
}

#[test]
fn test_failed_image_rolls_back_only_its_own_files() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("notes.txt"), b"written by the user").unwrap();

    let write_image = |name: &str, records: &[pixpack_core::Record]| {
        let container = pixpack_core::encoder::encode_container(records).unwrap();
        let path = td.path().join(name);
        write_raster(&path, &pack(&container).unwrap()).unwrap();
        path
    };
    let first = write_image("first.png", &[pixpack_core::Record::new("a.txt", "from first")]);
    // Same names as the first image and the user's file, then an unusable path
    let second = write_image(
        "second.png",
        &[
            pixpack_core::Record::new("a.txt", "from second"),
            pixpack_core::Record::new("notes.txt", "from second"),
            pixpack_core::Record::new("d", "file"),
            pixpack_core::Record::new("d/x", "under a file"),
        ],
    );

    let report = decode(&[first, second.clone()], &out, &PackConfig::default(), &mut NoProgress);

    assert!(report.success());
    assert_eq!(report.failed_images(), vec![second.as_path()]);
    assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"from first");
    assert_eq!(fs::read(out.join("notes.txt")).unwrap(), b"written by the user");
    assert_eq!(snapshot(&out).len(), 2);
}
