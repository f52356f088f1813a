pub mod recognizer;

pub use recognizer::LoopShapeRecognizer;
