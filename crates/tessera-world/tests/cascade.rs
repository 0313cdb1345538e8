use std::sync::OnceLock;

use tessera_blocks::{AIR_STATE, BlockRegistry, PropertyKind, StateId, initialize_block_data};
use tessera_geom::Direction;
use tessera_world::{
    BlockPos, BlockStorage, ChunkStore, MAX_PENDING_UPDATES, UpdateScratch, evaluate,
    propagate_after_change,
};

fn reg() -> &'static BlockRegistry {
    static REG: OnceLock<BlockRegistry> = OnceLock::new();
    REG.get_or_init(initialize_block_data)
}

fn state(name: &str) -> StateId {
    let r = reg();
    let ty = r.id_by_name(name).unwrap_or_else(|| panic!("no block {name}"));
    r.default_state(ty).unwrap()
}

fn upper(name: &str) -> StateId {
    let r = reg();
    let ty = r.id_by_name(name).unwrap();
    r.state_from_labels(ty, &[("half", "upper")]).unwrap()
}

fn world() -> ChunkStore {
    let mut w = ChunkStore::new();
    for cx in -1..=1 {
        for cz in -1..=1 {
            w.load_empty_column(cx, cz);
        }
    }
    w
}

// Writes through the storage interface and runs the cascade, like a player edit.
fn change(w: &mut ChunkStore, pos: BlockPos, s: StateId) -> tessera_world::CascadeStats {
    w.write_state(pos, s);
    let mut scratch = UpdateScratch::new();
    let stats = propagate_after_change(reg(), w, pos, &mut scratch);
    assert!(scratch.is_empty());
    stats
}

const P: BlockPos = BlockPos::new(4, 64, 4);

fn below(p: BlockPos) -> BlockPos {
    p.neighbor(Direction::Down)
}

fn above(p: BlockPos) -> BlockPos {
    p.neighbor(Direction::Up)
}

#[test]
fn sapling_breaks_without_soil() {
    let mut w = world();
    w.place(below(P), state("grass_block"));
    w.place(P, state("oak_sapling"));

    let stats = change(&mut w, below(P), state("stone"));
    assert_eq!(w.read_state(P), Some(AIR_STATE));
    assert_eq!(stats.changed, 1);
    assert!(w.changed_blocks(0, 0).contains(&P));
}

#[test]
fn sapling_survives_on_dirt() {
    let mut w = world();
    w.place(below(P), state("grass_block"));
    w.place(P, state("oak_sapling"));
    let stats = change(&mut w, below(P), state("dirt"));
    assert_eq!(w.read_state(P), Some(state("oak_sapling")));
    assert_eq!(stats.changed, 0);
    assert_eq!(stats.evaluated, 7);
}

#[test]
fn dead_bush_does_not_come_back() {
    let mut w = world();
    w.place(below(P), state("sand"));
    w.place(P, state("dead_bush"));

    change(&mut w, below(P), state("stone"));
    assert_eq!(w.read_state(P), Some(AIR_STATE));

    let stats = change(&mut w, below(P), state("sand"));
    assert_eq!(w.read_state(P), Some(AIR_STATE));
    assert_eq!(stats.changed, 0);
}

#[test]
fn grass_turns_snowy_under_snow() {
    let r = reg();
    let mut w = world();
    let grass = state("grass_block");
    w.place(P, grass);

    change(&mut w, above(P), state("snow_block"));
    let now = w.read_state(P).unwrap();
    assert_ne!(now, grass);
    let info = r.decode(now).unwrap();
    assert_eq!(info.get_bool(PropertyKind::Snowy), Some(true));

    // A snow layer counts as cover too; clearing it reverts
    change(&mut w, above(P), state("snow"));
    assert_eq!(w.read_state(P), Some(now));
    change(&mut w, above(P), AIR_STATE);
    assert_eq!(w.read_state(P), Some(grass));
}

#[test]
fn snowy_is_only_read_from_above() {
    let mut w = world();
    let podzol = state("podzol");
    w.place(P, podzol);
    change(&mut w, P.neighbor(Direction::East), state("snow_block"));
    change(&mut w, below(P), state("snow_block"));
    assert_eq!(w.read_state(P), Some(podzol));
}

#[test]
fn quiet_change_evaluates_seven_positions() {
    let mut w = world();
    let stats = change(&mut w, P, state("stone"));
    assert_eq!(stats.evaluated, 7);
    assert_eq!(stats.queued, 6);
    assert_eq!(stats.changed, 0);
}

#[test]
fn world_floor_and_ceiling_skip_neighbors() {
    let mut w = world();
    let floor = change(&mut w, BlockPos::new(0, 0, 0), state("stone"));
    assert_eq!(floor.evaluated, 6);
    let ceiling = change(&mut w, BlockPos::new(0, 255, 0), state("stone"));
    assert_eq!(ceiling.evaluated, 6);
}

#[test]
fn wheat_needs_farmland() {
    let mut w = world();
    w.place(below(P), state("farmland"));
    w.place(P, state("wheat"));
    change(&mut w, below(P), state("dirt"));
    assert_eq!(w.read_state(P), Some(AIR_STATE));
}

#[test]
fn carpet_sits_on_anything_but_air() {
    let mut w = world();
    w.place(below(P), state("stone"));
    w.place(P, state("red_carpet"));
    change(&mut w, below(P), state("water"));
    assert_eq!(w.read_state(P), Some(state("red_carpet")));
    change(&mut w, below(P), state("cave_air"));
    assert_eq!(w.read_state(P), Some(AIR_STATE));
}

#[test]
fn double_plant_falls_as_a_pair() {
    let mut w = world();
    let top = above(P);
    w.place(below(P), state("grass_block"));
    w.place(P, state("sunflower"));
    w.place(top, upper("sunflower"));

    let stats = change(&mut w, below(P), state("stone"));
    assert_eq!(w.read_state(P), Some(AIR_STATE));
    assert_eq!(w.read_state(top), Some(AIR_STATE));
    assert_eq!(stats.changed, 2);
}

#[test]
fn double_plant_lower_needs_its_upper() {
    let mut w = world();
    let top = above(P);
    w.place(below(P), state("grass_block"));
    w.place(P, state("lilac"));
    w.place(top, upper("lilac"));

    // A different plant's upper half does not count
    change(&mut w, top, upper("peony"));
    assert_eq!(w.read_state(P), Some(AIR_STATE));
}

#[test]
fn tall_seagrass_upper_half_ignores_support() {
    let mut w = world();
    let top = above(P);
    w.place(below(P), state("sand"));
    w.place(P, state("tall_seagrass"));
    w.place(top, upper("tall_seagrass"));

    change(&mut w, below(P), state("magma_block"));
    assert_eq!(w.read_state(P), Some(AIR_STATE));
    assert_eq!(w.read_state(top), Some(upper("tall_seagrass")));
}

#[test]
fn unloaded_neighbor_means_no_change() {
    let r = reg();
    let mut w = ChunkStore::new();
    w.load_empty_column(0, 0);
    let edge = BlockPos::new(0, 64, 0);
    w.place(below(edge), state("stone"));
    w.place(edge, state("oak_sapling"));

    // The west neighbor lives in an unloaded column.
    assert!(!evaluate(r, &mut w, edge, Some(Direction::West)));
    let stats = change(&mut w, edge.neighbor(Direction::West), state("stone"));
    assert_eq!(stats.changed, 0);
    assert_eq!(w.read_state(edge), Some(state("oak_sapling")));

    // With both reads available the support rule applies as usual.
    assert!(evaluate(r, &mut w, edge, Some(Direction::Down)));
}

#[test]
fn long_carpet_chain_stops_at_the_cap() {
    let mut w = world();
    let base = BlockPos::new(0, 10, 0);
    w.place(base, state("stone"));
    let carpet = state("white_carpet");
    for y in 11..=250 {
        w.place(BlockPos::new(0, y, 0), carpet);
    }

    let stats = change(&mut w, base, AIR_STATE);
    assert!(stats.queued <= MAX_PENDING_UPDATES);
    assert!(stats.evaluated <= MAX_PENDING_UPDATES + 1);
    assert!(stats.dropped_expansions >= 1);
    assert_eq!(w.read_state(BlockPos::new(0, 11, 0)), Some(AIR_STATE));
    assert_eq!(w.read_state(BlockPos::new(0, 250, 0)), Some(carpet));

    // Everything that fell is a contiguous run from the bottom.
    let fallen = (11..=250)
        .take_while(|&y| w.read_state(BlockPos::new(0, y, 0)) == Some(AIR_STATE))
        .count();
    assert_eq!(fallen, stats.changed);
}
