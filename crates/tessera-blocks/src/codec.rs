//! Mixed-radix conversion between state ids and decoded property values.
//!
//! The first property of a schema is the most significant digit. Decoding
//! peels digits from the least significant end, encoding accumulates from
//! the most significant end, so the two are exact inverses.

use std::fmt;

use crate::error::StateError;
use crate::property::PropertyKind;
use crate::registry::BlockRegistry;
use crate::schema::BlockSchema;
use crate::translate::PropertyValue;
use crate::types::{BlockTypeId, StateId};

/// Decoded view of one state id. Holds the semantic value of every property
/// the block type declares.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BlockStateInfo {
    block_type: BlockTypeId,
    present: u128,
    values: [PropertyValue; PropertyKind::COUNT],
}

impl BlockStateInfo {
    fn empty(block_type: BlockTypeId) -> Self {
        Self {
            block_type,
            present: 0,
            values: [PropertyValue::default(); PropertyKind::COUNT],
        }
    }

    #[inline]
    fn insert(&mut self, kind: PropertyKind, value: PropertyValue) {
        self.present |= 1u128 << kind.index();
        self.values[kind.index()] = value;
    }

    #[inline]
    pub fn block_type(&self) -> BlockTypeId {
        self.block_type
    }

    #[inline]
    pub fn has_property(&self, kind: PropertyKind) -> bool {
        self.present & (1u128 << kind.index()) != 0
    }

    #[inline]
    pub fn get(&self, kind: PropertyKind) -> Option<PropertyValue> {
        self.has_property(kind).then(|| self.values[kind.index()])
    }

    pub fn get_bool(&self, kind: PropertyKind) -> Option<bool> {
        self.get(kind).and_then(PropertyValue::as_bool)
    }

    pub fn get_int(&self, kind: PropertyKind) -> Option<u8> {
        self.get(kind).and_then(PropertyValue::as_int)
    }

    /// Replaces the value of a property the block type already has. The
    /// value is checked for family and range when the info is encoded.
    pub fn set(&mut self, kind: PropertyKind, value: PropertyValue) -> Result<(), StateError> {
        if !self.has_property(kind) {
            return Err(StateError::MissingProperty {
                block: self.block_type,
                kind,
            });
        }
        self.values[kind.index()] = value;
        Ok(())
    }

    /// Present properties in declaration order of `PropertyKind`.
    pub fn properties(&self) -> impl Iterator<Item = (PropertyKind, PropertyValue)> + '_ {
        PropertyKind::ALL
            .iter()
            .copied()
            .filter(|&k| self.has_property(k))
            .map(|k| (k, self.values[k.index()]))
    }
}

impl fmt::Debug for BlockStateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_map();
        m.entry(&"block_type", &self.block_type);
        for (k, v) in self.properties() {
            m.entry(&k.key(), &v);
        }
        m.finish()
    }
}

/// Free-function form of [`BlockStateInfo::has_property`].
#[inline]
pub fn has_property(info: &BlockStateInfo, kind: PropertyKind) -> bool {
    info.has_property(kind)
}

fn accumulate_defaults(schema: &BlockSchema) -> StateId {
    schema.base_state + schema.default_offset() as StateId
}

impl BlockRegistry {
    /// Decodes a state id, or `None` if it lies outside the assigned range.
    pub fn decode(&self, state: StateId) -> Option<BlockStateInfo> {
        let ty = self.schemas.type_of_state(state)?;
        let schema = self.schemas.get(ty)?;
        let mut offset = (state - schema.base_state) as usize;
        let mut info = BlockStateInfo::empty(ty);
        for p in schema.properties.iter().rev() {
            let raw = offset % p.value_count;
            offset /= p.value_count;
            info.insert(p.kind, p.kind.translator().decode(raw));
        }
        Some(info)
    }

    pub fn encode(&self, info: &BlockStateInfo) -> Result<StateId, StateError> {
        let ty = info.block_type();
        let schema = self
            .schemas
            .get(ty)
            .ok_or(StateError::UnknownBlockType(ty))?;
        let mut offset = 0usize;
        for p in &schema.properties {
            let value = info.get(p.kind).ok_or(StateError::MissingProperty {
                block: ty,
                kind: p.kind,
            })?;
            let raw = p
                .kind
                .translator()
                .encode(value)
                .ok_or(StateError::WrongValue {
                    kind: p.kind,
                    value,
                })?;
            if raw >= p.value_count {
                return Err(StateError::OutOfRange {
                    kind: p.kind,
                    index: raw,
                    count: p.value_count,
                });
            }
            offset = offset * p.value_count + raw;
        }
        Ok(schema.base_state + offset as StateId)
    }

    /// State id of `ty` with every property at its registered default.
    pub fn default_state(&self, ty: BlockTypeId) -> Option<StateId> {
        self.schemas.get(ty).map(accumulate_defaults)
    }

    pub fn default_decoded(&self, ty: BlockTypeId) -> Option<BlockStateInfo> {
        self.default_state(ty).and_then(|s| self.decode(s))
    }

    /// Block type owning `state`.
    #[inline]
    pub fn block_type_of(&self, state: StateId) -> Option<BlockTypeId> {
        self.schemas.type_of_state(state)
    }

    /// Registered label of a decoded property value.
    pub fn value_label(&self, info: &BlockStateInfo, kind: PropertyKind) -> Option<&str> {
        let raw = kind.translator().encode(info.get(kind)?)?;
        self.properties
            .labels(kind)?
            .get(raw)
            .map(String::as_str)
    }

    pub fn is_value(&self, info: &BlockStateInfo, kind: PropertyKind, label: &str) -> bool {
        self.value_label(info, kind) == Some(label)
    }

    /// Sets a property from one of its labels.
    pub fn set_label(
        &self,
        info: &mut BlockStateInfo,
        kind: PropertyKind,
        label: &str,
    ) -> Result<(), StateError> {
        let raw = self
            .properties
            .lookup(kind, label)
            .ok_or_else(|| StateError::UnknownLabel {
                name: self.properties.name(kind).unwrap_or(kind.key()).to_string(),
                label: label.to_string(),
            })?;
        info.set(kind, kind.translator().decode(raw))
    }

    /// Ordered `(property name, value label)` pairs of a state, most
    /// significant property first.
    pub fn state_labels(&self, state: StateId) -> Option<Vec<(&str, &str)>> {
        let info = self.decode(state)?;
        let schema = self.schemas.get(info.block_type())?;
        schema
            .properties
            .iter()
            .map(|p| Some((self.properties.name(p.kind)?, self.value_label(&info, p.kind)?)))
            .collect()
    }

    /// Builds a state of `ty` from textual properties. Properties not named
    /// keep their defaults. Names are the registered property names, so
    /// `facing` matches whichever facing kind the type declares.
    pub fn state_from_labels(
        &self,
        ty: BlockTypeId,
        pairs: &[(&str, &str)],
    ) -> Result<StateId, StateError> {
        let mut info = self
            .default_decoded(ty)
            .ok_or(StateError::UnknownBlockType(ty))?;
        let schema = self
            .schemas
            .get(ty)
            .ok_or(StateError::UnknownBlockType(ty))?;
        for &(name, label) in pairs {
            let kind = schema
                .properties
                .iter()
                .map(|p| p.kind)
                .find(|&k| self.properties.name(k) == Some(name))
                .ok_or_else(|| StateError::UnknownPropertyName {
                    block: ty,
                    name: name.to_string(),
                })?;
            self.set_label(&mut info, kind, label)?;
        }
        self.encode(&info)
    }
}
