mod common;

use std::sync::Arc;

use boxtrace::detection::code::StaticCodeReader;
use boxtrace::{DetectionParams, OutputWriter, SpecimenLabel, build_standard_pipeline};
use common::*;

fn params() -> DetectionParams {
    DetectionParams::new().with_frame_min_size(100).with_blob_min_size(30)
}

#[test]
fn test_standard_pipeline_keeps_frames_with_specimens() -> anyhow::Result<()> {
    let reader = Arc::new(StaticCodeReader(Some("{Source_Bed4}{Row_2}".to_string())));
    let pipeline = build_standard_pipeline(&params(), reader);

    let results = pipeline.run(specimen_sheet(&[true, false, true]))?;

    assert_eq!(results.len(), 2);
    let xs: Vec<u32> = results.iter().map(|r| r.bbox.unwrap().x).collect();
    assert_eq!(xs, vec![40, 400]);
    for item in &results {
        assert_eq!(item.image.width(), 140);
        assert_eq!(item.image.height(), 160);
        assert_eq!(item.get_bool("has_blob"), Some(true));
        assert_eq!(item.get_string("code_text"), Some("{Source_Bed4}{Row_2}"));
    }
    Ok(())
}

#[test]
fn test_unreadable_codes_drop_every_frame() -> anyhow::Result<()> {
    let pipeline = build_standard_pipeline(&params(), Arc::new(StaticCodeReader(None)));
    let results = pipeline.run(specimen_sheet(&[true, true]))?;
    assert!(results.is_empty());
    Ok(())
}

#[test]
fn test_partial_run_returns_all_frames() -> anyhow::Result<()> {
    let pipeline = build_standard_pipeline(&params(), Arc::new(StaticCodeReader(None)));
    let frames = pipeline.run_partial(specimen_sheet(&[true, false, true]), 1)?;
    assert_eq!(frames.len(), 3);
    Ok(())
}

#[test]
fn test_inverted_sheet() -> anyhow::Result<()> {
    let mut img = image::RgbImage::from_pixel(300, 260, FRAME);
    fill_rect(&mut img, 40, 40, 199, 219, BACKDROP);
    fill_rect(&mut img, 70, 70, 129, 169, SPECIMEN);

    let reader = Arc::new(StaticCodeReader(Some("{Source_Night}".to_string())));
    let pipeline = build_standard_pipeline(&params().with_inverted(true), reader);
    let results = pipeline.run(image::DynamicImage::ImageRgb8(img))?;

    assert_eq!(results.len(), 1);
    let bbox = results[0].bbox.unwrap();
    assert_eq!((bbox.x, bbox.y, bbox.width, bbox.height), (40, 40, 160, 180));
    Ok(())
}

#[test]
fn test_debug_output_and_written_files() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let reader = Arc::new(StaticCodeReader(Some("{Source_Bed4}{Row_2}".to_string())));
    let pipeline = build_standard_pipeline(&params(), reader).with_debug(dir.path().join("debug"))?;

    let results = pipeline.run(specimen_sheet(&[true, true]))?;

    assert!(dir.path().join("debug/00_input/01.png").exists());
    assert!(dir.path().join("debug/01_frame_extraction/02.png").exists());
    assert!(dir.path().join("debug/02_blob_filtering/02.png").exists());
    assert!(dir.path().join("debug/03_code_decoding/01.png").exists());

    let mut writer = OutputWriter::new(dir.path().join("out"));
    for item in results {
        let label = SpecimenLabel::parse(item.get_string("code_text").unwrap()).unwrap();
        writer.plan(&label, item.image);
    }
    let written = writer.write_all()?;

    assert_eq!(written.len(), 2);
    assert!(dir.path().join("out/Bed4/{Source_Bed4}{Row_2}{Photo_0}.png").exists());
    assert!(dir.path().join("out/Bed4/{Source_Bed4}{Row_2}{Photo_1}.png").exists());
    Ok(())
}
