//! Column-keyed in-memory block storage with change tracking.

use hashbrown::{HashMap, HashSet};
use tessera_blocks::{AIR_STATE, StateId};

use crate::pos::{BlockPos, CHUNK_SIZE, MIN_WORLD_Y, WORLD_HEIGHT};

/// Per-position block access used by the update cascade. Reads return `None`
/// when the containing column is not loaded.
pub trait BlockStorage {
    fn read_state(&self, pos: BlockPos) -> Option<StateId>;
    /// Stores `state` and marks the containing column changed. Writes to
    /// unloaded columns are dropped.
    fn write_state(&mut self, pos: BlockPos, state: StateId);
}

const COLUMN_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * WORLD_HEIGHT) as usize;

#[derive(Clone, Debug)]
struct Column {
    states: Box<[StateId]>,
    // Indices written since the last drain
    changed: HashSet<u32>,
    rev: u64,
}

impl Column {
    fn filled(state: StateId) -> Self {
        Self {
            states: vec![state; COLUMN_VOLUME].into_boxed_slice(),
            changed: HashSet::new(),
            rev: 0,
        }
    }
}

#[inline]
fn column_index(pos: BlockPos) -> Option<usize> {
    if !pos.in_world_height() {
        return None;
    }
    let (lx, lz) = pos.local();
    let ly = (pos.y - MIN_WORLD_Y) as usize;
    Some((ly * CHUNK_SIZE as usize + lz) * CHUNK_SIZE as usize + lx)
}

fn index_to_pos(key: (i32, i32), idx: u32) -> BlockPos {
    let idx = idx as i32;
    let lx = idx % CHUNK_SIZE;
    let lz = (idx / CHUNK_SIZE) % CHUNK_SIZE;
    let ly = idx / (CHUNK_SIZE * CHUNK_SIZE);
    BlockPos::new(
        key.0 * CHUNK_SIZE + lx,
        ly + MIN_WORLD_Y,
        key.1 * CHUNK_SIZE + lz,
    )
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkStoreStats {
    pub loaded_columns: usize,
    pub changed_blocks: usize,
}

/// Loaded 16x256x16 columns keyed by `(cx, cz)`.
#[derive(Default, Debug, Clone)]
pub struct ChunkStore {
    columns: HashMap<(i32, i32), Column>,
    counter: u64,
}

impl ChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads column `(cx, cz)` filled with `state`, replacing any loaded copy.
    pub fn load_column(&mut self, cx: i32, cz: i32, state: StateId) {
        self.columns.insert((cx, cz), Column::filled(state));
    }

    pub fn load_empty_column(&mut self, cx: i32, cz: i32) {
        self.load_column(cx, cz, AIR_STATE);
    }

    /// Drops a column. Returns false if it was not loaded.
    pub fn unload_column(&mut self, cx: i32, cz: i32) -> bool {
        self.columns.remove(&(cx, cz)).is_some()
    }

    #[inline]
    pub fn is_loaded(&self, cx: i32, cz: i32) -> bool {
        self.columns.contains_key(&(cx, cz))
    }

    /// Stores a state without marking anything changed, for world setup.
    pub fn place(&mut self, pos: BlockPos, state: StateId) -> bool {
        let Some(idx) = column_index(pos) else {
            return false;
        };
        match self.columns.get_mut(&pos.chunk()) {
            Some(col) => {
                col.states[idx] = state;
                true
            }
            None => false,
        }
    }

    /// Revision stamp of the last write into a column; 0 if never written.
    pub fn column_rev(&self, cx: i32, cz: i32) -> u64 {
        self.columns.get(&(cx, cz)).map(|c| c.rev).unwrap_or(0)
    }

    /// Positions written in a column since the last drain, sorted.
    pub fn changed_blocks(&self, cx: i32, cz: i32) -> Vec<BlockPos> {
        let Some(col) = self.columns.get(&(cx, cz)) else {
            return Vec::new();
        };
        let mut out: Vec<BlockPos> = col
            .changed
            .iter()
            .map(|&i| index_to_pos((cx, cz), i))
            .collect();
        out.sort();
        out
    }

    /// Returns and clears the changed positions of a column.
    pub fn drain_changed(&mut self, cx: i32, cz: i32) -> Vec<BlockPos> {
        let out = self.changed_blocks(cx, cz);
        if let Some(col) = self.columns.get_mut(&(cx, cz)) {
            col.changed.clear();
        }
        out
    }

    pub fn stats(&self) -> ChunkStoreStats {
        ChunkStoreStats {
            loaded_columns: self.columns.len(),
            changed_blocks: self.columns.values().map(|c| c.changed.len()).sum(),
        }
    }
}

impl BlockStorage for ChunkStore {
    fn read_state(&self, pos: BlockPos) -> Option<StateId> {
        let idx = column_index(pos)?;
        self.columns.get(&pos.chunk()).map(|c| c.states[idx])
    }

    fn write_state(&mut self, pos: BlockPos, state: StateId) {
        let Some(idx) = column_index(pos) else {
            return;
        };
        let Some(col) = self.columns.get_mut(&pos.chunk()) else {
            log::trace!(target: "updates", "dropped write into unloaded column at {pos:?}");
            return;
        };
        self.counter = self.counter.wrapping_add(1).max(1);
        col.states[idx] = state;
        col.changed.insert(idx as u32);
        col.rev = self.counter;
    }
}
