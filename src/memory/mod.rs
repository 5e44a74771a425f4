pub mod masking;
pub mod temporal;
pub mod working;

pub use masking::{
    pool_average, pool_winner_take_all, ChunkType, ListChunk, MaskingField, MaskingParams, Pooling,
    Scale,
};
pub use temporal::TemporalChunker;
pub use working::{Item, WorkingMemory, WorkingMemoryParams};
