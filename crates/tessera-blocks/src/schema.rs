//! Per-type property lists and the contiguous state-id ranges they own.

use crate::error::RegistryError;
use crate::property::{PropertyKind, PropertyRegistry};
use crate::types::{BlockTypeId, MAX_BLOCK_PROPERTIES, StateId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemaProperty {
    pub kind: PropertyKind,
    pub default_index: usize,
    pub value_count: usize,
}

/// Properties of one block type. The first property is the most significant
/// digit of the state offset.
#[derive(Clone, Debug, Default)]
pub struct BlockSchema {
    pub properties: Vec<SchemaProperty>,
    pub base_state: StateId,
    pub state_count: usize,
    finalized: bool,
}

impl BlockSchema {
    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn property(&self, kind: PropertyKind) -> Option<&SchemaProperty> {
        self.properties.iter().find(|p| p.kind == kind)
    }

    /// Offset of the all-defaults state within this type's range.
    pub fn default_offset(&self) -> usize {
        self.properties
            .iter()
            .fold(0, |acc, p| acc * p.value_count + p.default_index)
    }

    #[inline]
    pub fn contains(&self, state: StateId) -> bool {
        let s = state as usize;
        let base = self.base_state as usize;
        self.finalized && s >= base && s < base + self.state_count
    }
}

/// Builds block schemas in registration order and assigns state ranges.
#[derive(Clone, Debug, Default)]
pub struct SchemaTable {
    schemas: Vec<BlockSchema>,
    type_by_state: Vec<BlockTypeId>,
}

impl SchemaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new, empty schema and returns its type id.
    pub fn begin_type(&mut self) -> Result<BlockTypeId, RegistryError> {
        let id = BlockTypeId::try_from(self.schemas.len())
            .map_err(|_| RegistryError::StateSpaceOverflow)?;
        self.schemas.push(BlockSchema::default());
        Ok(id)
    }

    pub fn add_property(
        &mut self,
        props: &PropertyRegistry,
        ty: BlockTypeId,
        kind: PropertyKind,
        default_label: &str,
    ) -> Result<(), RegistryError> {
        let spec = props
            .get(kind)
            .ok_or(RegistryError::UnregisteredProperty(kind.key()))?;
        let default_index = spec.index_of(default_label).ok_or_else(|| {
            RegistryError::UnknownDefault {
                kind: kind.key(),
                label: default_label.to_string(),
            }
        })?;
        let schema = self
            .schemas
            .get_mut(ty as usize)
            .ok_or(RegistryError::UnknownBlockType(ty))?;
        if schema.finalized {
            return Err(RegistryError::AlreadyFinalized(ty));
        }
        if schema.property(kind).is_some() {
            return Err(RegistryError::DuplicateProperty(ty, kind.key()));
        }
        if schema.properties.len() >= MAX_BLOCK_PROPERTIES {
            return Err(RegistryError::TooManyProperties(ty));
        }
        schema.properties.push(SchemaProperty {
            kind,
            default_index,
            value_count: spec.value_count(),
        });
        Ok(())
    }

    /// Assigns the next free state range to `ty`. Types must be finalized
    /// in the order they were begun.
    pub fn finalize(&mut self, ty: BlockTypeId) -> Result<(), RegistryError> {
        let next = self.schemas.iter().take_while(|s| s.finalized).count();
        let schema = self
            .schemas
            .get_mut(ty as usize)
            .ok_or(RegistryError::UnknownBlockType(ty))?;
        if schema.finalized {
            return Err(RegistryError::AlreadyFinalized(ty));
        }
        if ty as usize != next {
            return Err(RegistryError::FinalizeOrder {
                found: ty,
                expected: next as BlockTypeId,
            });
        }

        let count: usize = schema.properties.iter().map(|p| p.value_count).product();
        let base = self.type_by_state.len();
        if base + count > StateId::MAX as usize + 1 {
            return Err(RegistryError::StateSpaceOverflow);
        }
        schema.base_state = base as StateId;
        schema.state_count = count;
        schema.finalized = true;
        self.type_by_state.extend(std::iter::repeat_n(ty, count));
        Ok(())
    }

    #[inline]
    pub fn get(&self, ty: BlockTypeId) -> Option<&BlockSchema> {
        self.schemas.get(ty as usize).filter(|s| s.finalized)
    }

    #[inline]
    pub fn type_of_state(&self, state: StateId) -> Option<BlockTypeId> {
        self.type_by_state.get(state as usize).copied()
    }

    /// Number of state ids assigned so far.
    #[inline]
    pub fn total_state_count(&self) -> usize {
        self.type_by_state.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> PropertyRegistry {
        PropertyRegistry::standard().unwrap()
    }

    #[test]
    fn ranges_are_contiguous() {
        let p = props();
        let mut t = SchemaTable::new();
        let a = t.begin_type().unwrap();
        t.finalize(a).unwrap();
        let b = t.begin_type().unwrap();
        t.add_property(&p, b, PropertyKind::Snowy, "false").unwrap();
        t.add_property(&p, b, PropertyKind::Age3, "2").unwrap();
        t.finalize(b).unwrap();

        assert_eq!(t.get(a).unwrap().base_state, 0);
        assert_eq!(t.get(a).unwrap().state_count, 1);
        let sb = t.get(b).unwrap();
        assert_eq!(sb.base_state, 1);
        assert_eq!(sb.state_count, 8);
        // snowy=false is index 1, age=2 is index 2: 1*4+2
        assert_eq!(sb.default_offset(), 6);
        assert_eq!(t.total_state_count(), 9);
        assert_eq!(t.type_of_state(8), Some(b));
        assert_eq!(t.type_of_state(9), None);
        assert!(sb.is_finalized());
        assert!(!sb.contains(0));
        assert!(sb.contains(1) && sb.contains(8));
        assert!(!sb.contains(9));
    }

    #[test]
    fn out_of_order_finalize_is_rejected() {
        let mut t = SchemaTable::new();
        let _a = t.begin_type().unwrap();
        let b = t.begin_type().unwrap();
        assert!(matches!(
            t.finalize(b),
            Err(RegistryError::FinalizeOrder { found: 1, expected: 0 })
        ));
    }

    #[test]
    fn bad_properties_are_rejected() {
        let p = props();
        let mut t = SchemaTable::new();
        let a = t.begin_type().unwrap();
        assert!(matches!(
            t.add_property(&p, a, PropertyKind::Half, "middle"),
            Err(RegistryError::UnknownDefault { .. })
        ));
        t.add_property(&p, a, PropertyKind::Half, "top").unwrap();
        assert!(matches!(
            t.add_property(&p, a, PropertyKind::Half, "top"),
            Err(RegistryError::DuplicateProperty(..))
        ));
        t.finalize(a).unwrap();
        assert!(matches!(
            t.add_property(&p, a, PropertyKind::Lit, "true"),
            Err(RegistryError::AlreadyFinalized(_))
        ));
    }

    #[test]
    fn property_limit_is_enforced() {
        let p = props();
        let mut t = SchemaTable::new();
        let a = t.begin_type().unwrap();
        for &k in &PropertyKind::ALL[..MAX_BLOCK_PROPERTIES] {
            t.add_property(&p, a, k, "true").unwrap();
        }
        let extra = PropertyKind::ALL[MAX_BLOCK_PROPERTIES];
        assert!(matches!(
            t.add_property(&p, a, extra, "true"),
            Err(RegistryError::TooManyProperties(_))
        ));
    }

    #[test]
    fn unfinalized_schema_is_hidden() {
        let mut t = SchemaTable::new();
        let a = t.begin_type().unwrap();
        assert!(t.get(a).is_none());
        t.finalize(a).unwrap();
        assert!(t.get(a).is_some());
    }
}
