//! Property kinds and their registered names and value labels.

use crate::error::RegistryError;
use crate::translate::Translator;

macro_rules! property_kinds {
    ($($variant:ident => $key:literal, $tr:ident;)*) => {
        /// Every property a block type can declare. The declaration order is
        /// the registration order of the built-in property table.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum PropertyKind {
            $($variant,)*
        }

        impl PropertyKind {
            pub const ALL: &'static [PropertyKind] = &[$(PropertyKind::$variant,)*];
            pub const COUNT: usize = Self::ALL.len();

            /// Identifier used for this kind in block tables.
            pub fn key(self) -> &'static str {
                match self {
                    $(PropertyKind::$variant => $key,)*
                }
            }

            /// How raw value indices of this kind map to semantic values.
            pub fn translator(self) -> Translator {
                match self {
                    $(PropertyKind::$variant => Translator::$tr,)*
                }
            }
        }
    };
}

property_kinds! {
    Attached => "attached", InvertedBool;
    Bottom => "bottom", InvertedBool;
    Conditional => "conditional", InvertedBool;
    Disarmed => "disarmed", InvertedBool;
    Drag => "drag", InvertedBool;
    Enabled => "enabled", InvertedBool;
    Extended => "extended", InvertedBool;
    Eye => "eye", InvertedBool;
    Falling => "falling", InvertedBool;
    Hanging => "hanging", InvertedBool;
    HasBottle0 => "has_bottle_0", InvertedBool;
    HasBottle1 => "has_bottle_1", InvertedBool;
    HasBottle2 => "has_bottle_2", InvertedBool;
    HasRecord => "has_record", InvertedBool;
    HasBook => "has_book", InvertedBool;
    Inverted => "inverted", InvertedBool;
    InWall => "in_wall", InvertedBool;
    Lit => "lit", InvertedBool;
    Locked => "locked", InvertedBool;
    Occupied => "occupied", InvertedBool;
    Open => "open", InvertedBool;
    Persistent => "persistent", InvertedBool;
    Powered => "powered", InvertedBool;
    ShortPiston => "short_piston", InvertedBool;
    SignalFire => "signal_fire", InvertedBool;
    Snowy => "snowy", InvertedBool;
    Triggered => "triggered", InvertedBool;
    Unstable => "unstable", InvertedBool;
    Waterlogged => "waterlogged", InvertedBool;
    VineEnd => "vine_end", InvertedBool;
    HorizontalAxis => "horizontal_axis", HorizontalAxis;
    Axis => "axis", Plain;
    PosY => "pos_y", InvertedBool;
    NegY => "neg_y", InvertedBool;
    NegZ => "neg_z", InvertedBool;
    PosX => "pos_x", InvertedBool;
    PosZ => "pos_z", InvertedBool;
    NegX => "neg_x", InvertedBool;
    Facing => "facing", Facing;
    FacingHopper => "facing_hopper", HopperFacing;
    HorizontalFacing => "horizontal_facing", HorizontalFacing;
    JigsawOrientation => "jigsaw_orientation", Plain;
    AttachFace => "attach_face", Plain;
    BellAttachment => "bell_attachment", Plain;
    EastWall => "east_wall", Plain;
    NorthWall => "north_wall", Plain;
    SouthWall => "south_wall", Plain;
    WestWall => "west_wall", Plain;
    EastRedstone => "east_redstone", Plain;
    NorthRedstone => "north_redstone", Plain;
    SouthRedstone => "south_redstone", Plain;
    WestRedstone => "west_redstone", Plain;
    DoubleBlockHalf => "double_block_half", Plain;
    Half => "half", Plain;
    RailShape => "rail_shape", Plain;
    RailShapeStraight => "rail_shape_straight", Plain;
    Age1 => "age_1", Plain;
    Age2 => "age_2", Plain;
    Age3 => "age_3", Plain;
    Age5 => "age_5", Plain;
    Age7 => "age_7", Plain;
    Age15 => "age_15", Plain;
    Age25 => "age_25", Plain;
    Bites => "bites", Plain;
    Delay => "delay", Shifted;
    Distance => "distance", Shifted;
    Eggs => "eggs", Shifted;
    Hatch => "hatch", Plain;
    Layers => "layers", Shifted;
    LevelCauldron => "level_cauldron", Plain;
    LevelComposter => "level_composter", Plain;
    LevelFlowing => "level_flowing", Shifted;
    LevelHoney => "level_honey", Plain;
    Level => "level", Plain;
    Moisture => "moisture", Plain;
    Note => "note", Plain;
    Pickles => "pickles", Shifted;
    Power => "power", Plain;
    Stage => "stage", Plain;
    StabilityDistance => "stability_distance", Plain;
    RespawnAnchorCharges => "respawn_anchor_charges", Plain;
    Rotation16 => "rotation_16", Shifted;
    BedPart => "bed_part", Plain;
    ChestType => "chest_type", Plain;
    ModeComparator => "mode_comparator", Plain;
    DoorHinge => "door_hinge", Plain;
    NoteblockInstrument => "noteblock_instrument", Plain;
    PistonType => "piston_type", Plain;
    SlabType => "slab_type", Plain;
    StairsShape => "stairs_shape", Plain;
    StructureblockMode => "structureblock_mode", Plain;
    BambooLeaves => "bamboo_leaves", Plain;
}

// Presence sets are stored in a u128.
const _: () = assert!(PropertyKind::COUNT <= 128);

impl PropertyKind {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_key(key: &str) -> Option<PropertyKind> {
        Self::ALL.iter().copied().find(|k| k.key() == key)
    }
}

/// Display name and ordered value labels of one property kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: String,
    pub labels: Vec<String>,
}

impl PropertySpec {
    #[inline]
    pub fn value_count(&self) -> usize {
        self.labels.len()
    }

    /// Raw value index of `label`.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

#[derive(Clone, Debug)]
pub struct PropertyRegistry {
    specs: Vec<Option<PropertySpec>>,
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self {
            specs: vec![None; PropertyKind::COUNT],
        }
    }

    /// Records `name` and `labels` for `kind`, replacing any earlier entry.
    /// Families with a fixed decode table must be registered with exactly
    /// that many labels.
    pub fn register<S: AsRef<str>>(
        &mut self,
        kind: PropertyKind,
        name: &str,
        labels: &[S],
    ) -> Result<(), RegistryError> {
        let count = labels.len();
        if count == 0 || count > u8::MAX as usize {
            return Err(RegistryError::ValueCount {
                kind: kind.key(),
                count,
            });
        }
        if let Some(expected) = kind.translator().arity() {
            if expected != count {
                return Err(RegistryError::Arity {
                    kind: kind.key(),
                    expected,
                    found: count,
                });
            }
        }
        self.specs[kind.index()] = Some(PropertySpec {
            name: name.to_string(),
            labels: labels.iter().map(|l| l.as_ref().to_string()).collect(),
        });
        Ok(())
    }

    pub fn register_bool(&mut self, kind: PropertyKind, name: &str) -> Result<(), RegistryError> {
        self.register(kind, name, &["true", "false"])
    }

    /// Registers the decimal labels `min..=max`.
    pub fn register_range(
        &mut self,
        kind: PropertyKind,
        name: &str,
        min: i32,
        max: i32,
    ) -> Result<(), RegistryError> {
        let labels: Vec<String> = (min..=max).map(|v| v.to_string()).collect();
        self.register(kind, name, &labels)
    }

    #[inline]
    pub fn get(&self, kind: PropertyKind) -> Option<&PropertySpec> {
        self.specs[kind.index()].as_ref()
    }

    pub fn name(&self, kind: PropertyKind) -> Option<&str> {
        self.get(kind).map(|s| s.name.as_str())
    }

    pub fn labels(&self, kind: PropertyKind) -> Option<&[String]> {
        self.get(kind).map(|s| s.labels.as_slice())
    }

    pub fn value_count(&self, kind: PropertyKind) -> Option<usize> {
        self.get(kind).map(PropertySpec::value_count)
    }

    pub fn lookup(&self, kind: PropertyKind, label: &str) -> Option<usize> {
        self.get(kind)?.index_of(label)
    }

    /// The built-in property table.
    pub fn standard() -> Result<Self, RegistryError> {
        use PropertyKind as K;
        let mut r = Self::new();

        for (kind, name) in [
            (K::Attached, "attached"),
            (K::Bottom, "bottom"),
            (K::Conditional, "conditional"),
            (K::Disarmed, "disarmed"),
            (K::Drag, "drag"),
            (K::Enabled, "enabled"),
            (K::Extended, "extended"),
            (K::Eye, "eye"),
            (K::Falling, "falling"),
            (K::Hanging, "hanging"),
            (K::HasBottle0, "has_bottle_0"),
            (K::HasBottle1, "has_bottle_1"),
            (K::HasBottle2, "has_bottle_2"),
            (K::HasRecord, "has_record"),
            (K::HasBook, "has_book"),
            (K::Inverted, "inverted"),
            (K::InWall, "in_wall"),
            (K::Lit, "lit"),
            (K::Locked, "locked"),
            (K::Occupied, "occupied"),
            (K::Open, "open"),
            (K::Persistent, "persistent"),
            (K::Powered, "powered"),
            (K::ShortPiston, "short"),
            (K::SignalFire, "signal_fire"),
            (K::Snowy, "snowy"),
            (K::Triggered, "triggered"),
            (K::Unstable, "unstable"),
            (K::Waterlogged, "waterlogged"),
            (K::VineEnd, "vine_end"),
        ] {
            r.register_bool(kind, name)?;
        }

        r.register(K::HorizontalAxis, "axis", &["x", "z"])?;
        r.register(K::Axis, "axis", &["x", "y", "z"])?;

        for (kind, name) in [
            (K::PosY, "up"),
            (K::NegY, "down"),
            (K::NegZ, "north"),
            (K::PosX, "east"),
            (K::PosZ, "south"),
            (K::NegX, "west"),
        ] {
            r.register_bool(kind, name)?;
        }

        r.register(
            K::Facing,
            "facing",
            &["north", "east", "south", "west", "up", "down"],
        )?;
        r.register(
            K::FacingHopper,
            "facing",
            &["down", "north", "south", "west", "east"],
        )?;
        r.register(
            K::HorizontalFacing,
            "facing",
            &["north", "south", "west", "east"],
        )?;
        r.register(
            K::JigsawOrientation,
            "orientation",
            &[
                "down_east",
                "down_north",
                "down_south",
                "down_west",
                "up_east",
                "up_north",
                "up_south",
                "up_west",
                "west_up",
                "east_up",
                "north_up",
                "south_up",
            ],
        )?;
        r.register(K::AttachFace, "face", &["floor", "wall", "ceiling"])?;
        r.register(
            K::BellAttachment,
            "attachment",
            &["floor", "ceiling", "single_wall", "double_wall"],
        )?;

        for (kind, name) in [
            (K::EastWall, "east"),
            (K::NorthWall, "north"),
            (K::SouthWall, "south"),
            (K::WestWall, "west"),
        ] {
            r.register(kind, name, &["none", "low", "tall"])?;
        }
        for (kind, name) in [
            (K::EastRedstone, "east"),
            (K::NorthRedstone, "north"),
            (K::SouthRedstone, "south"),
            (K::WestRedstone, "west"),
        ] {
            r.register(kind, name, &["up", "side", "none"])?;
        }

        r.register(K::DoubleBlockHalf, "half", &["upper", "lower"])?;
        r.register(K::Half, "half", &["top", "bottom"])?;
        r.register(
            K::RailShape,
            "shape",
            &[
                "north_south",
                "east_west",
                "ascending_east",
                "ascending_west",
                "ascending_north",
                "ascending_south",
                "south_east",
                "south_west",
                "north_west",
                "north_east",
            ],
        )?;
        r.register(
            K::RailShapeStraight,
            "shape",
            &[
                "north_south",
                "east_west",
                "ascending_east",
                "ascending_west",
                "ascending_north",
                "ascending_south",
            ],
        )?;

        for (kind, name, min, max) in [
            (K::Age1, "age", 0, 1),
            (K::Age2, "age", 0, 2),
            (K::Age3, "age", 0, 3),
            (K::Age5, "age", 0, 5),
            (K::Age7, "age", 0, 7),
            (K::Age15, "age", 0, 15),
            (K::Age25, "age", 0, 25),
            (K::Bites, "bites", 0, 6),
            (K::Delay, "delay", 1, 4),
            (K::Distance, "distance", 1, 7),
            (K::Eggs, "eggs", 1, 4),
            (K::Hatch, "hatch", 0, 2),
            (K::Layers, "layers", 1, 8),
            (K::LevelCauldron, "level", 0, 3),
            (K::LevelComposter, "level", 0, 8),
            (K::LevelFlowing, "level", 1, 8),
            (K::LevelHoney, "honey_level", 0, 5),
            (K::Level, "level", 0, 15),
            (K::Moisture, "moisture", 0, 7),
            (K::Note, "note", 0, 24),
            (K::Pickles, "pickles", 1, 4),
            (K::Power, "power", 0, 15),
            (K::Stage, "stage", 0, 1),
            (K::StabilityDistance, "distance", 0, 7),
            (K::RespawnAnchorCharges, "charges", 0, 4),
            // Labels start at 0 but the decoded value is shifted by one.
            (K::Rotation16, "rotation", 0, 15),
        ] {
            r.register_range(kind, name, min, max)?;
        }

        r.register(K::BedPart, "part", &["head", "foot"])?;
        r.register(K::ChestType, "type", &["single", "left", "right"])?;
        r.register(K::ModeComparator, "mode", &["compare", "subtract"])?;
        r.register(K::DoorHinge, "hinge", &["left", "right"])?;
        r.register(
            K::NoteblockInstrument,
            "instrument",
            &[
                "harp",
                "basedrum",
                "snare",
                "hat",
                "bass",
                "flute",
                "bell",
                "guitar",
                "chime",
                "xylophone",
                "iron_xylophone",
                "cow_bell",
                "didgeridoo",
                "bit",
                "banjo",
                "pling",
            ],
        )?;
        r.register(K::PistonType, "type", &["normal", "sticky"])?;
        r.register(K::SlabType, "type", &["top", "bottom", "double"])?;
        r.register(
            K::StairsShape,
            "shape",
            &[
                "straight",
                "inner_left",
                "inner_right",
                "outer_left",
                "outer_right",
            ],
        )?;
        r.register(
            K::StructureblockMode,
            "mode",
            &["save", "load", "corner", "data"],
        )?;
        r.register(K::BambooLeaves, "leaves", &["none", "small", "large"])?;

        Ok(r)
    }
}
