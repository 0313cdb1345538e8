//! Block properties, state-id codec, block models, and the block table.
#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod property;
pub mod registry;
pub mod schema;
pub mod translate;
pub mod types;

pub use codec::{BlockStateInfo, has_property};
pub use error::{RegistryError, StateError};
pub use model::{BlockModel, ModelTable};
pub use property::{PropertyKind, PropertyRegistry};
pub use registry::{BlockRegistry, BlockType, UpdateRule, initialize_block_data};
pub use translate::{PropertyValue, Translator};
pub use types::{AIR_STATE, BlockTypeId, ModelId, StateId};
