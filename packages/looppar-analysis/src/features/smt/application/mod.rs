pub mod dependence_encoder;

pub use dependence_encoder::{DependenceEncoder, EncodeError, EncodedQuery};
