use thiserror::Error;

use crate::property::PropertyKind;
use crate::translate::PropertyValue;
use crate::types::{BlockTypeId, StateId};

/// Faults in the static block, property, or model tables.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("property `{kind}` needs between 1 and 255 values, got {count}")]
    ValueCount { kind: &'static str, count: usize },
    #[error("property `{kind}` decodes through a table of {expected} values, got {found} labels")]
    Arity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("unknown property kind `{0}`")]
    UnknownPropertyKind(String),
    #[error("property `{0}` was never registered")]
    UnregisteredProperty(&'static str),
    #[error("property `{kind}` has no value `{label}`")]
    UnknownDefault { kind: &'static str, label: String },
    #[error("block type {0} declares property `{1}` twice")]
    DuplicateProperty(BlockTypeId, &'static str),
    #[error("block type {0} declares more than {max} properties", max = crate::types::MAX_BLOCK_PROPERTIES)]
    TooManyProperties(BlockTypeId),
    #[error("block type {0} is already finalized")]
    AlreadyFinalized(BlockTypeId),
    #[error("block type {found} finalized out of order, expected {expected}")]
    FinalizeOrder {
        found: BlockTypeId,
        expected: BlockTypeId,
    },
    #[error("block type {0} was never begun")]
    UnknownBlockType(BlockTypeId),
    #[error("state space exceeds {} ids", StateId::MAX as usize + 1)]
    StateSpaceOverflow,
    #[error("model `{model}` has {count} boxes, at most {max} allowed", max = crate::types::MAX_MODEL_BOXES)]
    TooManyBoxes { model: String, count: usize },
    #[error("model `{0}` has a box with max below min")]
    InvertedBox(String),
    #[error("model `{0}` is defined twice")]
    DuplicateModel(String),
    #[error("model table is full")]
    TooManyModels,
    #[error("unknown model `{0}`")]
    UnknownModel(String),
    #[error("block `{0}` is defined twice")]
    DuplicateBlock(String),
    #[error("group `{group}` names unknown block `{block}`")]
    UnknownGroupMember { group: String, block: String },
    #[error("unknown group `{0}`")]
    UnknownGroup(String),
    #[error("unknown template `{0}`")]
    UnknownTemplate(String),
    #[error("the first block type must be single-state `air`")]
    AirNotFirst,
}

/// Faults in runtime property values handed to the codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("unknown block type {0}")]
    UnknownBlockType(BlockTypeId),
    #[error("block type {block} has no property `{}`", .kind.key())]
    MissingProperty { block: BlockTypeId, kind: PropertyKind },
    #[error("value {value:?} does not belong to property `{}`", .kind.key())]
    WrongValue {
        kind: PropertyKind,
        value: PropertyValue,
    },
    #[error("value index {index} of property `{}` exceeds its {count} values", .kind.key())]
    OutOfRange {
        kind: PropertyKind,
        index: usize,
        count: usize,
    },
    #[error("block type {block} has no property named `{name}`")]
    UnknownPropertyName { block: BlockTypeId, name: String },
    #[error("property `{name}` has no value `{label}`")]
    UnknownLabel { name: String, label: String },
}
