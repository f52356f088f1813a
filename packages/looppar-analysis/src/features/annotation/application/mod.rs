pub mod emitter;

pub use emitter::{AnnotationEmitter, EmitRejection};
