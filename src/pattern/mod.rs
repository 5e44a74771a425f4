pub mod complement;
pub mod vector;

pub use complement::*;
pub use vector::*;
