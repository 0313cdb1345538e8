use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use tessera_geom::Aabb;

use crate::config::{BlockDef, BlocksConfig, GroupDef, UpdateDef};
use crate::error::RegistryError;
use crate::model::{BlockModel, ModelTable};
use crate::property::{PropertyKind, PropertyRegistry};
use crate::schema::SchemaTable;
use crate::types::{BlockTypeId, ModelId, StateId};

/// Built-in block table, state-id order.
pub const BUILTIN_BLOCKS: &str = include_str!("../../../assets/blocks.toml");

pub type GroupId = u16;

/// Neighbor-change rule of a block type, with group names resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateRule {
    #[default]
    None,
    /// Tracks `snowy` from the block above.
    SnowCover { cover: GroupId },
    /// Destroyed when the block below leaves `soil`.
    Supported { soil: GroupId, lower_half_only: bool },
    /// Two-block plant whose halves must stay paired.
    DoublePlant { soil: GroupId },
}

#[derive(Clone, Debug)]
pub struct BlockGroup {
    pub name: String,
    members: Vec<bool>,
}

impl BlockGroup {
    #[inline]
    pub fn contains(&self, ty: BlockTypeId) -> bool {
        self.members.get(ty as usize).copied().unwrap_or(false)
    }
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockTypeId,
    pub name: String,
    pub model: Option<ModelId>,
    pub update: UpdateRule,
}

/// Process-wide block configuration: properties, schemas, models, and the
/// named block types. Read-only once built.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    pub namespace: String,
    pub properties: PropertyRegistry,
    pub schemas: SchemaTable,
    pub models: ModelTable,
    pub blocks: Vec<BlockType>,
    pub groups: Vec<BlockGroup>,
    by_name: HashMap<String, BlockTypeId>,
}

/// Builds the registry from the built-in table. Any fault in the table is
/// fatal.
pub fn initialize_block_data() -> BlockRegistry {
    match BlockRegistry::from_toml_str(BUILTIN_BLOCKS) {
        Ok(reg) => reg,
        Err(e) => panic!("built-in block table is invalid: {e}"),
    }
}

struct Resolved<'a> {
    properties: &'a [(String, String)],
    model: Option<&'a str>,
    update: Option<&'a UpdateDef>,
}

fn resolve_def<'a>(
    def: &'a BlockDef,
    cfg: &'a BlocksConfig,
) -> Result<Resolved<'a>, RegistryError> {
    let template = match &def.template {
        Some(t) => Some(
            cfg.templates
                .get(t)
                .ok_or_else(|| RegistryError::UnknownTemplate(t.clone()))?,
        ),
        None => None,
    };
    let properties = match (&def.properties, template) {
        (Some(p), _) => p.as_slice(),
        (None, Some(t)) => t.properties.as_slice(),
        (None, None) => &[],
    };
    let model = def
        .model
        .as_deref()
        .or_else(|| template.and_then(|t| t.model.as_deref()));
    let update = def
        .update
        .as_ref()
        .or_else(|| template.and_then(|t| t.update.as_ref()));
    Ok(Resolved {
        properties,
        model,
        update,
    })
}

impl BlockRegistry {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(s)?;
        Ok(Self::from_config(&cfg)?)
    }

    pub fn from_config(cfg: &BlocksConfig) -> Result<Self, RegistryError> {
        let properties = PropertyRegistry::standard()?;

        let mut models = ModelTable::new();
        let mut model_names: Vec<&String> = cfg.models.keys().collect();
        model_names.sort();
        for name in model_names {
            let boxes = cfg.models[name]
                .boxes
                .iter()
                .map(|b| Aabb::from_bounds(*b))
                .collect();
            models.register(name, boxes)?;
        }

        let mut by_name = HashMap::with_capacity(cfg.blocks.len());
        for (i, def) in cfg.blocks.iter().enumerate() {
            let id = BlockTypeId::try_from(i).map_err(|_| RegistryError::StateSpaceOverflow)?;
            if by_name.insert(def.name.clone(), id).is_some() {
                return Err(RegistryError::DuplicateBlock(def.name.clone()));
            }
        }

        // Sorted so group ids do not depend on hash order.
        let mut group_names: Vec<&String> = cfg.groups.keys().collect();
        group_names.sort();
        let mut groups = Vec::with_capacity(group_names.len());
        let mut group_ids: HashMap<&str, GroupId> = HashMap::new();
        for name in group_names {
            let member = |block: &String| {
                by_name
                    .get(block)
                    .copied()
                    .ok_or_else(|| RegistryError::UnknownGroupMember {
                        group: name.clone(),
                        block: block.clone(),
                    })
            };
            let members = match &cfg.groups[name] {
                GroupDef::Members(list) => {
                    let mut m = vec![false; cfg.blocks.len()];
                    for b in list {
                        m[member(b)? as usize] = true;
                    }
                    m
                }
                GroupDef::Except { except } => {
                    let mut m = vec![true; cfg.blocks.len()];
                    for b in except {
                        m[member(b)? as usize] = false;
                    }
                    m
                }
            };
            group_ids.insert(name.as_str(), groups.len() as GroupId);
            groups.push(BlockGroup {
                name: name.clone(),
                members,
            });
        }
        let group = |name: &str| {
            group_ids
                .get(name)
                .copied()
                .ok_or_else(|| RegistryError::UnknownGroup(name.to_string()))
        };

        let mut schemas = SchemaTable::new();
        let mut blocks = Vec::with_capacity(cfg.blocks.len());
        for def in &cfg.blocks {
            let r = resolve_def(def, cfg)?;
            let ty = schemas.begin_type()?;
            for (key, default) in r.properties {
                let kind = PropertyKind::from_key(key)
                    .ok_or_else(|| RegistryError::UnknownPropertyKind(key.clone()))?;
                schemas.add_property(&properties, ty, kind, default)?;
            }
            schemas.finalize(ty)?;

            let model = match r.model {
                Some(m) => Some(
                    models
                        .id_by_name(m)
                        .ok_or_else(|| RegistryError::UnknownModel(m.to_string()))?,
                ),
                None => None,
            };
            let update = match r.update {
                None => UpdateRule::None,
                Some(UpdateDef::SnowCover { cover }) => UpdateRule::SnowCover {
                    cover: group(cover)?,
                },
                Some(UpdateDef::Supported {
                    soil,
                    lower_half_only,
                }) => UpdateRule::Supported {
                    soil: group(soil)?,
                    lower_half_only: *lower_half_only,
                },
                Some(UpdateDef::DoublePlant { soil }) => UpdateRule::DoublePlant {
                    soil: group(soil)?,
                },
            };
            blocks.push(BlockType {
                id: ty,
                name: def.name.clone(),
                model,
                update,
            });
        }

        let air_ok = blocks.first().is_some_and(|b| b.name == "air")
            && schemas.get(0).is_some_and(|s| s.state_count == 1);
        if !air_ok {
            return Err(RegistryError::AirNotFirst);
        }

        log::debug!(
            target: "blocks",
            "block table: {} types, {} states, {} models, {} groups",
            blocks.len(),
            schemas.total_state_count(),
            models.len(),
            groups.len()
        );

        Ok(Self {
            namespace: cfg.namespace.clone(),
            properties,
            schemas,
            models,
            blocks,
            groups,
            by_name,
        })
    }

    #[inline]
    pub fn get(&self, id: BlockTypeId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    /// Accepts `name` or `namespace:name`.
    pub fn id_by_name(&self, name: &str) -> Option<BlockTypeId> {
        let bare = match name.split_once(':') {
            Some((ns, rest)) if ns == self.namespace => rest,
            Some(_) => return None,
            None => name,
        };
        self.by_name.get(bare).copied()
    }

    pub fn resource_location(&self, id: BlockTypeId) -> Option<String> {
        self.get(id).map(|b| format!("{}:{}", self.namespace, b.name))
    }

    #[inline]
    pub fn group(&self, id: GroupId) -> Option<&BlockGroup> {
        self.groups.get(id as usize)
    }

    pub fn group_by_name(&self, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|g| g.name == name)
            .map(|i| i as GroupId)
    }

    /// True if the block type of `state` is in group `id`.
    pub fn state_in_group(&self, state: StateId, id: GroupId) -> bool {
        match (self.block_type_of(state), self.group(id)) {
            (Some(ty), Some(g)) => g.contains(ty),
            _ => false,
        }
    }

    pub fn update_rule(&self, ty: BlockTypeId) -> UpdateRule {
        self.get(ty).map(|b| b.update).unwrap_or_default()
    }

    /// Collision model of the block type owning `state`.
    pub fn collision_model(&self, state: StateId) -> Option<&BlockModel> {
        let ty = self.block_type_of(state)?;
        self.models.get(self.get(ty)?.model?)
    }

    pub fn property_name(&self, kind: PropertyKind) -> Option<&str> {
        self.properties.name(kind)
    }

    pub fn labels(&self, kind: PropertyKind) -> Option<&[String]> {
        self.properties.labels(kind)
    }

    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn total_state_count(&self) -> usize {
        self.schemas.total_state_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AIR_STATE;

    const SMALL: &str = r#"
        blocks = [
            { name = "air", model = "empty" },
            { name = "dirt", model = "full" },
            { name = "sapling", template = "plant" },
            { name = "slab", properties = [["slab_type", "bottom"], ["waterlogged", "false"]], model = "half" },
        ]

        [groups]
        soil = ["dirt"]
        solid = { except = ["air"] }

        [templates.plant]
        properties = [["stage", "0"]]
        model = "empty"
        update = { rule = "supported", soil = "soil" }

        [models.half]
        boxes = [[0.0, 0.0, 0.0, 1.0, 0.5, 1.0]]
    "#;

    #[test]
    fn small_table_loads() {
        let reg = BlockRegistry::from_toml_str(SMALL).unwrap();
        assert_eq!(reg.namespace, "minecraft");
        assert_eq!(reg.block_count(), 4);
        assert_eq!(reg.total_state_count(), 1 + 1 + 2 + 6);
        let sapling = reg.id_by_name("minecraft:sapling").unwrap();
        let soil = reg.group_by_name("soil").unwrap();
        assert_eq!(
            reg.update_rule(sapling),
            UpdateRule::Supported {
                soil,
                lower_half_only: false
            }
        );
        let solid = reg.group(reg.group_by_name("solid").unwrap()).unwrap();
        assert!(!solid.contains(0));
        assert!(solid.contains(3));
    }

    #[test]
    fn block_fields_override_template() {
        let text = r#"
            blocks = [
                { name = "air" },
                { name = "weird", template = "t", model = "full", properties = [] },
            ]
            [templates.t]
            properties = [["lit", "true"]]
            model = "empty"
        "#;
        let reg = BlockRegistry::from_toml_str(text).unwrap();
        let weird = reg.get(1).unwrap();
        assert_eq!(weird.model, Some(crate::model::MODEL_FULL));
        assert_eq!(reg.schemas.get(1).unwrap().state_count, 1);
    }

    #[test]
    fn configured_model_resolves() {
        let reg = BlockRegistry::from_toml_str(SMALL).unwrap();
        let slab = reg.id_by_name("slab").unwrap();
        let state = reg.default_state(slab).unwrap();
        let model = reg.collision_model(state).unwrap();
        assert_eq!(model.name, "half");
        assert!(model.is_face_full(tessera_geom::Direction::Down));
        assert!(!model.is_face_full(tessera_geom::Direction::Up));
        assert!(reg.collision_model(0).unwrap().is_empty());
    }

    #[test]
    fn foreign_namespace_does_not_resolve() {
        let reg = BlockRegistry::from_toml_str(SMALL).unwrap();
        assert_eq!(reg.id_by_name("dirt"), Some(1));
        assert_eq!(reg.id_by_name("other:dirt"), None);
        assert_eq!(reg.resource_location(1).as_deref(), Some("minecraft:dirt"));
    }

    fn fault(text: &str) -> RegistryError {
        let cfg: BlocksConfig = toml::from_str(text).unwrap();
        BlockRegistry::from_config(&cfg).unwrap_err()
    }

    #[test]
    fn static_faults_are_reported() {
        assert!(matches!(
            fault(r#"blocks = [{ name = "stone" }]"#),
            RegistryError::AirNotFirst
        ));
        assert!(matches!(
            fault(r#"blocks = [{ name = "air", properties = [["lit", "false"]] }]"#),
            RegistryError::AirNotFirst
        ));
        assert!(matches!(
            fault(r#"blocks = [{ name = "air" }, { name = "air" }]"#),
            RegistryError::DuplicateBlock(_)
        ));
        assert!(matches!(
            fault(r#"blocks = [{ name = "air" }, { name = "x", properties = [["colour", "red"]] }]"#),
            RegistryError::UnknownPropertyKind(_)
        ));
        assert!(matches!(
            fault(r#"blocks = [{ name = "air" }, { name = "x", properties = [["lit", "maybe"]] }]"#),
            RegistryError::UnknownDefault { .. }
        ));
        assert!(matches!(
            fault(r#"blocks = [{ name = "air" }, { name = "x", template = "nope" }]"#),
            RegistryError::UnknownTemplate(_)
        ));
        assert!(matches!(
            fault(r#"blocks = [{ name = "air" }, { name = "x", model = "nope" }]"#),
            RegistryError::UnknownModel(_)
        ));
        assert!(matches!(
            fault(
                r#"blocks = [{ name = "air" }, { name = "x", update = { rule = "double_plant", soil = "nope" } }]"#
            ),
            RegistryError::UnknownGroup(_)
        ));
        assert!(matches!(
            fault("blocks = [{ name = \"air\" }]\n[groups]\ng = [\"ghost\"]"),
            RegistryError::UnknownGroupMember { .. }
        ));
    }

    #[test]
    fn builtin_table_initializes() {
        let reg = initialize_block_data();
        assert_eq!(reg.get(0).unwrap().name, "air");
        assert_eq!(reg.default_state(0), Some(AIR_STATE));
    }
}
