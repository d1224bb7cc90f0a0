pub mod detection;
pub mod models;
pub mod output;
pub mod pipeline;

pub use models::Region;
pub use detection::{DetectionParams, build_standard_pipeline};
pub use detection::classifier::{Classifier, BrightnessCutoff, WarmColor};
pub use detection::tracer::{BoundaryTracer, find_regions};
pub use output::{OutputWriter, SpecimenLabel};
pub use pipeline::{
    Pipeline, PipelineData, PipelineStep, PipelineContext,
    BoundingBox, MetadataValue, DebugConfig
};
