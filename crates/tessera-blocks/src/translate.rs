//! Raw value index <-> semantic property value.
//!
//! Each property kind belongs to exactly one translator family. The fixed
//! tables below follow the label order of the built-in property table, so a
//! label index decodes to the value the label names.

use tessera_geom::{Axis, Direction};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    Bool(bool),
    Axis(Axis),
    Direction(Direction),
    Int(u8),
}

impl Default for PropertyValue {
    fn default() -> Self {
        PropertyValue::Int(0)
    }
}

impl PropertyValue {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_direction(self) -> Option<Direction> {
        match self {
            PropertyValue::Direction(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_axis(self) -> Option<Axis> {
        match self {
            PropertyValue::Axis(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_int(self) -> Option<u8> {
        match self {
            PropertyValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

const FACING: [Direction; 6] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
    Direction::Up,
    Direction::Down,
];

const HOPPER_FACING: [Direction; 5] = [
    Direction::Down,
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
];

const HORIZONTAL_FACING: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
];

const HORIZONTAL_AXIS: [Axis; 2] = [Axis::X, Axis::Z];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Translator {
    /// Index 0 is `true`; boolean labels are registered as `["true", "false"]`.
    InvertedBool,
    HorizontalAxis,
    Facing,
    HopperFacing,
    HorizontalFacing,
    /// Integer families whose first label is 1.
    Shifted,
    /// The raw index itself.
    Plain,
}

impl Translator {
    /// Number of labels a fixed decode table expects, if any.
    pub fn arity(self) -> Option<usize> {
        match self {
            Translator::InvertedBool | Translator::HorizontalAxis => Some(2),
            Translator::Facing => Some(FACING.len()),
            Translator::HopperFacing => Some(HOPPER_FACING.len()),
            Translator::HorizontalFacing => Some(HORIZONTAL_FACING.len()),
            Translator::Shifted | Translator::Plain => None,
        }
    }

    /// Decodes a raw index. The index must be below the registered value
    /// count of the property, which registration checks against `arity`.
    pub fn decode(self, raw: usize) -> PropertyValue {
        match self {
            Translator::InvertedBool => PropertyValue::Bool(raw == 0),
            Translator::HorizontalAxis => PropertyValue::Axis(HORIZONTAL_AXIS[raw]),
            Translator::Facing => PropertyValue::Direction(FACING[raw]),
            Translator::HopperFacing => PropertyValue::Direction(HOPPER_FACING[raw]),
            Translator::HorizontalFacing => PropertyValue::Direction(HORIZONTAL_FACING[raw]),
            Translator::Shifted => PropertyValue::Int(raw as u8 + 1),
            Translator::Plain => PropertyValue::Int(raw as u8),
        }
    }

    /// Inverse of `decode`. Returns `None` for values of another family or
    /// with no raw index, like `Axis::Y` for a horizontal axis or 0 for a
    /// shifted integer. Range checks against the value count are the
    /// caller's job.
    pub fn encode(self, value: PropertyValue) -> Option<usize> {
        match (self, value) {
            (Translator::InvertedBool, PropertyValue::Bool(b)) => Some(if b { 0 } else { 1 }),
            (Translator::HorizontalAxis, PropertyValue::Axis(a)) => {
                HORIZONTAL_AXIS.iter().position(|&x| x == a)
            }
            (Translator::Facing, PropertyValue::Direction(d)) => FACING.iter().position(|&x| x == d),
            (Translator::HopperFacing, PropertyValue::Direction(d)) => {
                HOPPER_FACING.iter().position(|&x| x == d)
            }
            (Translator::HorizontalFacing, PropertyValue::Direction(d)) => {
                HORIZONTAL_FACING.iter().position(|&x| x == d)
            }
            (Translator::Shifted, PropertyValue::Int(v)) => (v as usize).checked_sub(1),
            (Translator::Plain, PropertyValue::Int(v)) => Some(v as usize),
            _ => None,
        }
    }
}
