use std::cell::RefCell;

use super::*;
use crate::assemble::codec::{DecodedImage, decode_with_image};
use crate::schedule::model::Frame;

/// Decodes with the `image` crate and records what the assembler asked to encode.
#[derive(Default)]
struct RecordingCodec {
    encoded: RefCell<Vec<(Vec<ContainerFrame>, u8, usize)>>,
}

impl ImageCodec for RecordingCodec {
    fn decode(&self, path: &Path) -> DynwallResult<DecodedImage> {
        decode_with_image(path)
    }

    fn encode_sequence(&self, request: &SequenceRequest<'_>) -> DynwallResult<Vec<u8>> {
        let frames: Vec<ContainerFrame> = request.frames().cloned().collect();
        let n = frames.len();
        self.encoded
            .borrow_mut()
            .push((frames, request.quality, request.primary_index));
        Ok(format!("container:{n}").into_bytes())
    }
}

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "dynwall_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, w: u32, h: u32, v: u8) {
    image::RgbImage::from_pixel(w, h, image::Rgb([v, v, v]))
        .save(path)
        .unwrap();
}

fn schedule_of(paths: &[PathBuf]) -> FrameSchedule {
    let n = paths.len() as f64;
    FrameSchedule::new(
        paths
            .iter()
            .enumerate()
            .map(|(i, p)| Frame {
                image_path: p.clone(),
                normalized_time: i as f64 / n,
                appearance: None,
            })
            .collect(),
    )
    .unwrap()
}

#[test]
fn frames_are_encoded_in_schedule_order_with_xmp_on_primary() {
    let tmp = temp_dir("assemble_order");
    std::fs::create_dir_all(&tmp).unwrap();
    let paths: Vec<PathBuf> = (0..3u8)
        .map(|i| {
            let p = tmp.join(format!("f{i}.png"));
            write_png(&p, 4, 2, i * 10);
            p
        })
        .collect();

    let codec = RecordingCodec::default();
    let out = tmp.join("nested").join("out.heic");
    let opts = BuildOpts {
        quality: 77,
        resize_mode: ResizeMode::Strict,
    };
    let written = assemble_container(&schedule_of(&paths), b"<xmp/>", &out, opts, &codec).unwrap();

    assert!(written.is_absolute());
    assert_eq!(std::fs::read(&written).unwrap(), b"container:3");

    let calls = codec.encoded.borrow();
    assert_eq!(calls.len(), 1);
    let (frames, quality, primary_index) = &calls[0];
    assert_eq!(*quality, 77);
    assert_eq!(*primary_index, 0);
    let shades: Vec<u8> = frames.iter().map(|f| f.pixels.as_raw()[0]).collect();
    assert_eq!(shades, [0, 10, 20]);
    assert_eq!(frames[0].xmp.as_deref(), Some(&b"<xmp/>"[..]));
    assert!(frames[1..].iter().all(|f| f.xmp.is_none()));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn fit_resizes_to_first_frame_and_strict_fails() {
    let tmp = temp_dir("assemble_resize");
    std::fs::create_dir_all(&tmp).unwrap();
    let a = tmp.join("a.png");
    let b = tmp.join("b.png");
    write_png(&a, 8, 6, 0);
    write_png(&b, 16, 16, 255);
    let schedule = schedule_of(&[a, b]);
    let out = tmp.join("out.heic");

    let strict = BuildOpts {
        resize_mode: ResizeMode::Strict,
        ..BuildOpts::default()
    };
    let codec = RecordingCodec::default();
    assert!(matches!(
        assemble_container(&schedule, b"x", &out, strict, &codec),
        Err(DynwallError::SizeMismatch(_))
    ));
    assert!(codec.encoded.borrow().is_empty());
    assert!(!out.exists());

    assemble_container(&schedule, b"x", &out, BuildOpts::default(), &codec).unwrap();
    let calls = codec.encoded.borrow();
    assert!(
        calls[0]
            .0
            .iter()
            .all(|f| f.pixels.dimensions() == (8, 6))
    );

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn missing_image_is_reported_before_encoding() {
    let tmp = temp_dir("assemble_missing");
    std::fs::create_dir_all(&tmp).unwrap();
    let a = tmp.join("a.png");
    write_png(&a, 2, 2, 0);
    let gone = tmp.join("gone.png");
    let schedule = schedule_of(&[a, gone.clone()]);

    assert!(matches!(
        ensure_sources_exist(&schedule),
        Err(DynwallError::ImageNotFound(ref p)) if *p == gone
    ));

    let codec = RecordingCodec::default();
    let err = assemble_container(
        &schedule,
        b"x",
        &tmp.join("out.heic"),
        BuildOpts::default(),
        &codec,
    )
    .unwrap_err();
    assert!(matches!(err, DynwallError::ImageNotFound(_)));
    assert!(codec.encoded.borrow().is_empty());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn existing_output_is_replaced() {
    let tmp = temp_dir("assemble_overwrite");
    std::fs::create_dir_all(&tmp).unwrap();
    let a = tmp.join("a.png");
    let b = tmp.join("b.png");
    write_png(&a, 2, 2, 0);
    write_png(&b, 2, 2, 1);
    let out = tmp.join("out.heic");
    std::fs::write(&out, b"old contents that are longer").unwrap();

    let codec = RecordingCodec::default();
    assemble_container(&schedule_of(&[a, b]), b"x", &out, BuildOpts::default(), &codec).unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), b"container:2");

    let leftovers = std::fs::read_dir(&tmp)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".partial"))
        .count();
    assert_eq!(leftovers, 0);

    std::fs::remove_dir_all(&tmp).ok();
}
