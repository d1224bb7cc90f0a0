pub mod classifier;
pub mod code;
pub mod overlay;
pub mod steps;
pub mod tracer;

use std::sync::Arc;

use crate::detection::classifier::WarmColor;
use crate::detection::code::CodeReader;
use crate::detection::steps::{BlobFilterStep, CodeDecodeStep, FrameExtractionStep};
use crate::detection::tracer::DEFAULT_GAP_WIDTH;
use crate::pipeline::Pipeline;

/// Tunables for the standard frame-extraction pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionParams {
    /// Minimum width and height of a specimen frame, in pixels
    pub frame_min_size: u32,
    /// Minimum width and height of the specimen blob inside a frame
    pub blob_min_size: u32,
    pub gap_width: u32,
    /// Frames are lighter than the backdrop
    pub inverted: bool,
}

impl DetectionParams {
    pub fn new() -> Self {
        Self {
            frame_min_size: 600,
            blob_min_size: 30,
            gap_width: DEFAULT_GAP_WIDTH,
            inverted: false,
        }
    }

    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn with_frame_min_size(mut self, frame_min_size: u32) -> Self {
        self.frame_min_size = frame_min_size;
        self
    }

    pub fn with_blob_min_size(mut self, blob_min_size: u32) -> Self {
        self.blob_min_size = blob_min_size;
        self
    }

    pub fn with_gap_width(mut self, gap_width: u32) -> Self {
        self.gap_width = gap_width;
        self
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the standard pipeline: extract frames, keep those holding a
/// specimen, then read each frame's label.
pub fn build_standard_pipeline(params: &DetectionParams, reader: Arc<dyn CodeReader>) -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(FrameExtractionStep {
            min_size: params.frame_min_size,
            gap_width: params.gap_width,
            inverted: params.inverted,
        }))
        .add_step(Arc::new(BlobFilterStep {
            min_size: params.blob_min_size,
            gap_width: params.gap_width,
            classifier: WarmColor::default(),
        }))
        .add_step(Arc::new(CodeDecodeStep::new(reader)))
}
