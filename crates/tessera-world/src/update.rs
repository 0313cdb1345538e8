//! Bounded breadth-first re-evaluation of blocks around a changed position.
//!
//! Each evaluated position looks at the one neighbor the update came from
//! and applies the rule of its block type. Positions that change push their
//! own neighbors, until the work list reaches [`MAX_PENDING_UPDATES`] items.
//! Unloaded columns and a full work list end the affected branch silently.

use tessera_blocks::registry::GroupId;
use tessera_blocks::{
    AIR_STATE, BlockRegistry, BlockStateInfo, PropertyKind, PropertyValue, StateId, UpdateRule,
};
use tessera_geom::Direction;

use crate::pos::BlockPos;
use crate::store::BlockStorage;

/// Hard cap on queued work items per cascade.
pub const MAX_PENDING_UPDATES: usize = 512;

const UPDATE_ORDER: [Direction; 6] = [
    Direction::West,
    Direction::East,
    Direction::North,
    Direction::South,
    Direction::Down,
    Direction::Up,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingUpdate {
    pub pos: BlockPos,
    /// Side of `pos` the change came from. `None` for the changed block itself.
    pub from: Option<Direction>,
}

/// Reusable work list. Empty between calls.
#[derive(Debug)]
pub struct UpdateScratch {
    queue: Vec<PendingUpdate>,
}

impl Default for UpdateScratch {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateScratch {
    pub fn new() -> Self {
        Self {
            queue: Vec::with_capacity(MAX_PENDING_UPDATES),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeStats {
    /// Positions evaluated, the changed position included.
    pub evaluated: usize,
    /// Work items queued.
    pub queued: usize,
    /// Evaluations that wrote a new state.
    pub changed: usize,
    /// Changed positions whose neighbors were not queued for lack of room.
    pub dropped_expansions: usize,
}

fn push_neighbors(queue: &mut Vec<PendingUpdate>, pos: BlockPos) {
    for dir in UPDATE_ORDER {
        let n = pos.neighbor(dir);
        if !n.in_world_height() {
            continue;
        }
        queue.push(PendingUpdate {
            pos: n,
            from: Some(dir.opposite()),
        });
    }
}

/// Re-evaluates the blocks around `pos` after its state changed.
pub fn propagate_after_change<S: BlockStorage + ?Sized>(
    reg: &BlockRegistry,
    world: &mut S,
    pos: BlockPos,
    scratch: &mut UpdateScratch,
) -> CascadeStats {
    let queue = &mut scratch.queue;
    queue.clear();
    let mut stats = CascadeStats::default();

    push_neighbors(queue, pos);

    stats.evaluated += 1;
    if evaluate(reg, world, pos, None) {
        stats.changed += 1;
    }

    let mut cursor = 0;
    while cursor < queue.len() {
        let item = queue[cursor];
        cursor += 1;

        stats.evaluated += 1;
        if !evaluate(reg, world, item.pos, item.from) {
            continue;
        }
        stats.changed += 1;

        if MAX_PENDING_UPDATES - queue.len() < UPDATE_ORDER.len() {
            stats.dropped_expansions += 1;
            log::debug!(
                target: "updates",
                "update list full at {} items, not expanding {:?}",
                queue.len(),
                item.pos
            );
            continue;
        }
        push_neighbors(queue, item.pos);
    }

    stats.queued = queue.len();
    queue.clear();
    stats
}

/// Applies the rule of the block at `pos`. Returns true if a new state was
/// written.
pub fn evaluate<S: BlockStorage + ?Sized>(
    reg: &BlockRegistry,
    world: &mut S,
    pos: BlockPos,
    from: Option<Direction>,
) -> bool {
    let Some(state) = world.read_state(pos) else {
        return false;
    };
    let Some(info) = reg.decode(state) else {
        return false;
    };
    let source = match from {
        Some(dir) => match world.read_state(pos.neighbor(dir)) {
            Some(s) => s,
            None => return false,
        },
        None => state,
    };

    let next = match reg.update_rule(info.block_type()) {
        UpdateRule::None => None,
        UpdateRule::SnowCover { cover } => snow_cover(reg, info, from, source, cover),
        UpdateRule::Supported {
            soil,
            lower_half_only,
        } => supported(reg, &info, from, source, soil, lower_half_only),
        UpdateRule::DoublePlant { soil } => double_plant(reg, &info, from, source, soil),
    };

    match next {
        Some(new_state) if new_state != state => {
            log::trace!(
                target: "updates",
                "{:?} from {:?}: {} -> {}",
                pos,
                from,
                state,
                new_state
            );
            world.write_state(pos, new_state);
            true
        }
        _ => false,
    }
}

fn snow_cover(
    reg: &BlockRegistry,
    mut info: BlockStateInfo,
    from: Option<Direction>,
    above: StateId,
    cover: GroupId,
) -> Option<StateId> {
    if from != Some(Direction::Up) {
        return None;
    }
    let snowy = reg.state_in_group(above, cover);
    info.set(PropertyKind::Snowy, PropertyValue::Bool(snowy)).ok()?;
    reg.encode(&info).ok()
}

fn is_upper_half(reg: &BlockRegistry, info: &BlockStateInfo) -> bool {
    reg.is_value(info, PropertyKind::DoubleBlockHalf, "upper")
}

fn supported(
    reg: &BlockRegistry,
    info: &BlockStateInfo,
    from: Option<Direction>,
    below: StateId,
    soil: GroupId,
    lower_half_only: bool,
) -> Option<StateId> {
    if from != Some(Direction::Down) {
        return None;
    }
    if lower_half_only && is_upper_half(reg, info) {
        return None;
    }
    if reg.state_in_group(below, soil) {
        return None;
    }
    Some(AIR_STATE)
}

// The other half must be the same plant with the opposite half value.
fn is_partner(reg: &BlockRegistry, info: &BlockStateInfo, other: StateId, upper: bool) -> bool {
    match reg.decode(other) {
        Some(o) => o.block_type() == info.block_type() && is_upper_half(reg, &o) == upper,
        None => false,
    }
}

fn double_plant(
    reg: &BlockRegistry,
    info: &BlockStateInfo,
    from: Option<Direction>,
    source: StateId,
    soil: GroupId,
) -> Option<StateId> {
    let destroy = if is_upper_half(reg, info) {
        from == Some(Direction::Down) && !is_partner(reg, info, source, false)
    } else {
        match from {
            Some(Direction::Down) => !reg.state_in_group(source, soil),
            Some(Direction::Up) => !is_partner(reg, info, source, true),
            _ => false,
        }
    };
    destroy.then_some(AIR_STATE)
}
