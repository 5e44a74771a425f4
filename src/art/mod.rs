pub mod engine;
pub mod params;
pub mod scorer;

pub use engine::{ArtEngine, LearnOutcome, PredictOutcome};
pub use params::Params;
