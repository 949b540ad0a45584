pub mod drift;
pub mod form;
pub mod prediction;

pub use prediction::PredictionPolicy;
