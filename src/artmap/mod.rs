pub mod engine;
pub mod mapfield;
pub mod matchtrack;

pub use engine::{ArtMapEngine, MapParams, MapPredictOutcome, TrainOutcome};
pub use mapfield::MapField;
