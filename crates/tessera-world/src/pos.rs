use tessera_geom::Direction;

pub const MIN_WORLD_Y: i32 = 0;
pub const MAX_WORLD_Y: i32 = 255;
pub const WORLD_HEIGHT: i32 = MAX_WORLD_Y - MIN_WORLD_Y + 1;
/// Horizontal edge length of a chunk column.
pub const CHUNK_SIZE: i32 = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn neighbor(self, dir: Direction) -> BlockPos {
        let (dx, dy, dz) = dir.offset();
        BlockPos::new(self.x + dx, self.y + dy, self.z + dz)
    }

    #[inline]
    pub fn in_world_height(self) -> bool {
        (MIN_WORLD_Y..=MAX_WORLD_Y).contains(&self.y)
    }

    /// Column holding this position.
    #[inline]
    pub fn chunk(self) -> (i32, i32) {
        (self.x.div_euclid(CHUNK_SIZE), self.z.div_euclid(CHUNK_SIZE))
    }

    /// Column-local x and z in `[0, 16)`.
    #[inline]
    pub fn local(self) -> (usize, usize) {
        (
            self.x.rem_euclid(CHUNK_SIZE) as usize,
            self.z.rem_euclid(CHUNK_SIZE) as usize,
        )
    }
}
