pub mod annotation_map;

pub use annotation_map::{AnnotationMap, ParallelRegion};
