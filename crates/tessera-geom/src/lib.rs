//! Block-local geometry: cube directions, model boxes, and face coverage.
#![forbid(unsafe_code)]

mod cover;

pub use cover::{FaceRect, MAX_SWEEP_STEPS, rects_cover};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// The six faces of the unit cube. Discriminants double as bit positions in
/// full-face flag sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Direction {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Unit step in world coordinates. North is -Z, west is -X.
    #[inline]
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::Down => (0, -1, 0),
            Direction::Up => (0, 1, 0),
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
            Direction::West => (-1, 0, 0),
            Direction::East => (1, 0, 0),
        }
    }

    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::West | Direction::East => Axis::X,
        }
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        matches!(self, Direction::Up | Direction::South | Direction::East)
    }

    /// The two axes spanning this face, in (a, b) order.
    #[inline]
    pub fn tangent_axes(self) -> (Axis, Axis) {
        match self.axis() {
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
            Axis::X => (Axis::Y, Axis::Z),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn component(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Axis-aligned box in block-local coordinates; the unit cube is `[0,1]^3`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const UNIT: Aabb = Aabb {
        min: Vec3::ZERO,
        max: Vec3::ONE,
    };

    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Builds a box from `[min_x, min_y, min_z, max_x, max_y, max_z]`.
    #[inline]
    pub fn from_bounds(b: [f32; 6]) -> Self {
        Self::new(Vec3::new(b[0], b[1], b[2]), Vec3::new(b[3], b[4], b[5]))
    }

    /// True when no axis has `max < min`. Flat boxes are allowed.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Projects the box onto the cube face `dir` if the box touches that
    /// face's plane, yielding its extent along the two tangent axes.
    pub fn face_rect(&self, dir: Direction) -> Option<FaceRect> {
        let normal = dir.axis();
        let cut = if dir.is_positive() { 1.0 } else { 0.0 };
        let lo = self.min.component(normal);
        let hi = self.max.component(normal);
        if !(lo <= cut && cut <= hi) {
            return None;
        }
        let (a, b) = dir.tangent_axes();
        Some(FaceRect {
            min_a: self.min.component(a),
            min_b: self.min.component(b),
            max_a: self.max.component(a),
            max_b: self.max.component(b),
        })
    }
}
