//! Compact identifiers shared across the block crates.

/// One block type with one assignment of property values.
pub type StateId = u16;
/// Index of a block type in registration order.
pub type BlockTypeId = u16;
pub type ModelId = u16;

/// Air is always the first registered type and owns exactly one state.
pub const AIR_STATE: StateId = 0;

/// Upper bound on the properties a single block type may combine.
pub const MAX_BLOCK_PROPERTIES: usize = 8;
/// Upper bound on boxes per block model.
pub const MAX_MODEL_BOXES: usize = 8;
