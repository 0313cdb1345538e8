//! Block positions, chunk storage, and the neighbor update cascade.
#![forbid(unsafe_code)]

pub mod pos;
pub mod store;
pub mod update;

pub use pos::{BlockPos, CHUNK_SIZE, MAX_WORLD_Y, MIN_WORLD_Y, WORLD_HEIGHT};
pub use store::{BlockStorage, ChunkStore, ChunkStoreStats};
pub use update::{
    CascadeStats, MAX_PENDING_UPDATES, PendingUpdate, UpdateScratch, evaluate,
    propagate_after_change,
};
