pub mod art;
pub mod artmap;
pub mod category;
pub mod config;
pub mod error;
pub mod kernel;
pub mod memory;
pub mod metrics;
pub mod pattern;
pub mod persistence;
pub mod replay;
pub mod resonance;
pub mod shunting;
pub mod transmitter;
pub mod vigilance;
pub mod workers;

pub use art::{ArtEngine, LearnOutcome, Params, PredictOutcome};
pub use artmap::{ArtMapEngine, MapParams, MapPredictOutcome, TrainOutcome};
pub use error::{Error, Result};
pub use pattern::{ComplementCodedPattern, Pattern, WeightVector};

/// Installs an `env_logger` backend reading `RUST_LOG`. Intended for binaries
/// and tests embedding this crate; a library should not force a logging
/// backend on its caller, so this is opt-in and safe to call more than once.
#[cfg(feature = "logging")]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(false).try_init();
}
