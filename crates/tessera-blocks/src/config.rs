use serde::Deserialize;
use std::collections::HashMap;

fn default_namespace() -> String {
    "minecraft".to_string()
}

// Top-level block table file. Block order is state-id order.
#[derive(Deserialize, Debug, Clone)]
pub struct BlocksConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub blocks: Vec<BlockDef>,
    #[serde(default)]
    pub groups: HashMap<String, GroupDef>,
    #[serde(default)]
    pub templates: HashMap<String, TemplateDef>,
    #[serde(default)]
    pub models: HashMap<String, ModelDef>,
}

// Fields set on a block override those of its template.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub template: Option<String>,
    // (property kind key, default label), most significant first
    #[serde(default)]
    pub properties: Option<Vec<(String, String)>>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub update: Option<UpdateDef>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TemplateDef {
    #[serde(default)]
    pub properties: Vec<(String, String)>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub update: Option<UpdateDef>,
}

// A group is either a member list or everything except a list
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum GroupDef {
    Members(Vec<String>),
    Except { except: Vec<String> },
}

#[derive(Deserialize, Debug, Clone)]
pub struct ModelDef {
    // [min_x, min_y, min_z, max_x, max_y, max_z]
    pub boxes: Vec<[f32; 6]>,
}

// Neighbor-change rule attached to a block type
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum UpdateDef {
    SnowCover {
        cover: String,
    },
    Supported {
        soil: String,
        #[serde(default)]
        lower_half_only: bool,
    },
    DoublePlant {
        soil: String,
    },
}
