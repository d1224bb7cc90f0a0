use crate::pipeline::{PipelineData, PipelineStep, PipelineContext, MetadataValue};
use crate::detection::classifier::{BrightnessCutoff, WarmColor};
use crate::detection::code::CodeReader;
use crate::detection::tracer::BoundaryTracer;
use anyhow::Result;
use image::DynamicImage;
use std::sync::Arc;

/// Find dark (or, inverted, light) rectangular frames - splits one photo into many crops
pub struct FrameExtractionStep {
    pub min_size: u32,
    pub gap_width: u32,
    pub inverted: bool,
}

impl PipelineStep for FrameExtractionStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let rgb = item.image.to_rgb8();
            let cutoff = BrightnessCutoff::from_image(&rgb, self.inverted);
            let regions = BoundaryTracer::new(&rgb, cutoff, self.min_size)
                .with_gap_width(self.gap_width)
                .find_regions(false);

            log::info!("Found {} frames in {}x{} image", regions.len(), rgb.width(), rgb.height());

            // Each frame becomes its own PipelineData
            for (idx, region) in regions.iter().enumerate() {
                let cropped = DynamicImage::ImageRgb8(region.crop().to_image());
                let bbox = region.bbox().offset_by(item.bbox.as_ref());

                let frame = PipelineData::from_region(cropped, item.original.clone(), bbox)
                    .with_metadata("frame_index", MetadataValue::Int(idx as i32));
                result.push(frame);
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Frame Extraction"
    }
}

/// Keep only frames that contain at least one blob of the given color
pub struct BlobFilterStep {
    pub min_size: u32,
    pub gap_width: u32,
    pub classifier: WarmColor,
}

impl PipelineStep for BlobFilterStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let rgb = item.image.to_rgb8();
            let has_blob = !BoundaryTracer::new(&rgb, self.classifier, self.min_size)
                .with_gap_width(self.gap_width)
                .find_regions(true)
                .is_empty();

            if has_blob {
                result.push(item.with_metadata("has_blob", MetadataValue::Bool(true)));
            } else {
                log::debug!("Dropping frame {:?}: no blob found", item.bbox);
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Blob Filtering"
    }
}

/// Decode the label printed on each frame, dropping frames without one
pub struct CodeDecodeStep {
    reader: Arc<dyn CodeReader>,
}

impl CodeDecodeStep {
    pub fn new(reader: Arc<dyn CodeReader>) -> Self {
        Self { reader }
    }
}

impl PipelineStep for CodeDecodeStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            match self.reader.decode(&item.image.to_rgb8()) {
                Some(text) => {
                    log::debug!("Decoded '{}' from frame {:?}", text, item.bbox);
                    result.push(item.with_metadata("code_text", MetadataValue::String(text)));
                }
                None => log::warn!("No readable code in frame {:?}", item.bbox),
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Code Decoding"
    }
}
