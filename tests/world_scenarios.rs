//! End-to-end scenarios driven through the public `EngineState` facade.

use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use blockworld::{
    config::EngineConfig,
    core::ManualClock,
    engine_state::{
        mutation::WorldEvent,
        voxels::{
            block::{block_type::BlockType, item::ItemType, registry::BreakTime},
            chunk::ChunkPosition,
        },
        EngineOptions, EngineState,
    },
};
use cgmath::{Point3, Vector3};

fn boot(config: EngineConfig, generate_terrain: bool) -> (EngineState, ManualClock) {
    let clock = ManualClock::new();
    let engine = EngineState::with_options(
        config,
        EngineOptions {
            clock: Arc::new(clock.clone()),
            generate_terrain,
        },
    )
    .expect("engine boots");
    (engine, clock)
}

fn small_config() -> EngineConfig {
    EngineConfig {
        world_size: 32,
        seed: Some(2024),
        worker_count: 2,
        ..EngineConfig::default()
    }
}

fn settle_meshes(engine: &mut EngineState) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while !engine.chunk_manager().is_idle() {
        assert!(Instant::now() < deadline, "mesh queue did not drain");
        engine.tick_mesh_queue(8);
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn generated_world_meshes_every_populated_chunk() {
    let (mut engine, _) = boot(small_config(), true);
    settle_meshes(&mut engine);

    let stats = engine.stats();
    // A 32x32 world with 16-wide chunks covers exactly four chunks.
    assert_eq!(stats.chunks, 4);
    assert_eq!(stats.chunks_generating, 0);
    assert_eq!(stats.pending_meshes, 0);
    for chunk in engine.chunk_manager().chunks() {
        assert_eq!(chunk.mesh_revision(), 1);
        assert!(!chunk.solid_mesh().is_empty());
    }
    assert_eq!(engine.query_block(Point3::new(5, -12, 5)), Some(BlockType::Bedrock));
}

#[test]
fn same_seed_generates_the_same_blocks() {
    let (first, _) = boot(small_config(), true);
    let (second, _) = boot(small_config(), true);
    assert_eq!(first.seed(), second.seed());
    assert_eq!(first.stats().voxels, second.stats().voxels);
    for x in 0..32 {
        for y in -12..12 {
            let coord = Point3::new(x, y, 7);
            assert_eq!(first.query_block(coord), second.query_block(coord));
        }
    }
}

#[test]
fn place_and_break_round_trip_and_remesh() {
    let (mut engine, _) = boot(small_config(), true);
    settle_meshes(&mut engine);

    let coord = Point3::new(8, 40, 8);
    let chunk = ChunkPosition::new(0, 0);
    let before = engine.chunk_manager().chunk(chunk).map(|c| c.mesh_revision());

    assert!(engine.place_block(coord, BlockType::CraftingTable));
    assert_eq!(engine.query_block(coord), Some(BlockType::CraftingTable));
    assert_eq!(engine.break_block(coord), Some(ItemType::Block(BlockType::CraftingTable)));
    assert_eq!(engine.query_block(coord), None);
    settle_meshes(&mut engine);

    let after = engine.chunk_manager().chunk(chunk).map(|c| c.mesh_revision());
    assert!(after > before);

    let events = engine.drain_events();
    assert!(matches!(
        events[0],
        WorldEvent::BlockPlaced { block_type: BlockType::CraftingTable, .. }
    ));
    assert!(matches!(
        events[1],
        WorldEvent::BlockBroken { drop: ItemType::Block(BlockType::CraftingTable), .. }
    ));
}

#[test]
fn meshing_the_same_state_twice_is_identical() {
    let (mut engine, _) = boot(small_config(), true);
    settle_meshes(&mut engine);
    let chunk = ChunkPosition::new(1, 1);
    let first = engine.chunk_manager().chunk(chunk).unwrap().solid_mesh().clone();

    assert!(engine.request_remesh(chunk));
    settle_meshes(&mut engine);
    let second = engine.chunk_manager().chunk(chunk).unwrap();
    assert_eq!(second.mesh_revision(), 2);
    assert_eq!(first.face_count(), second.solid_mesh().face_count());
    assert_eq!(first.as_bytes(), second.solid_mesh().as_bytes());
}

#[test]
fn breaking_ore_drops_the_processed_material() {
    let (mut engine, _) = boot(small_config(), false);
    engine.place_block(Point3::new(0, -6, 0), BlockType::CoalOre);
    engine.place_block(Point3::new(1, -6, 0), BlockType::IronOre);
    engine.place_block(Point3::new(2, -6, 0), BlockType::Stone);

    assert_eq!(engine.break_block(Point3::new(0, -6, 0)), Some(ItemType::Coal));
    assert_eq!(engine.break_block(Point3::new(1, -6, 0)), Some(ItemType::IronIngot));
    assert_eq!(
        engine.break_block(Point3::new(2, -6, 0)),
        Some(ItemType::Block(BlockType::Stone))
    );
}

#[test]
fn vein_mine_never_exceeds_the_cap() {
    let (mut engine, _) = boot(small_config(), false);
    for x in 0..10 {
        for y in 0..5 {
            for z in 0..5 {
                engine.place_block(Point3::new(x, y, z), BlockType::Stone);
            }
        }
    }
    assert_eq!(engine.stats().voxels, 250);

    let drops = engine.vein_mine(Point3::new(0, 0, 0), BlockType::Stone);
    assert_eq!(drops.len(), 128);
    assert_eq!(engine.stats().voxels, 250 - 128);
    assert_eq!(engine.query_block(Point3::new(0, 0, 0)), None);
}

#[test]
fn leaf_scenario_keeps_supported_leaves_only() {
    let (mut engine, clock) = boot(small_config(), false);
    engine.place_block(Point3::new(0, 0, 0), BlockType::Log);
    engine.place_block(Point3::new(0, 1, 0), BlockType::Leaves);
    engine.place_block(Point3::new(10, 10, 10), BlockType::Leaves);

    for _ in 0..20 {
        clock.advance(Duration::from_millis(250));
        engine.tick_leaf_decay(5);
    }
    settle_meshes(&mut engine);

    assert_eq!(engine.query_block(Point3::new(0, 1, 0)), Some(BlockType::Leaves));
    assert_eq!(engine.query_block(Point3::new(10, 10, 10)), None);
    assert_eq!(engine.stats().pending_decay_checks, 0);
}

#[test]
fn chained_vein_mine_finishes_over_time() {
    let (mut engine, clock) = boot(small_config(), false);
    for y in 0..6 {
        engine.place_block(Point3::new(4, y, 4), BlockType::Log);
    }
    assert_eq!(engine.start_vein_mine_chain(Point3::new(4, 0, 4), BlockType::Log), 6);

    let mut broken = 0;
    for _ in 0..10 {
        broken += engine.tick_vein_mine();
        clock.advance(Duration::from_millis(50));
    }
    assert_eq!(broken, 6);
    assert_eq!(engine.stats().active_vein_mine_chains, 0);
}

#[test]
fn break_times_follow_the_tool_rules() {
    let (engine, _) = boot(small_config(), false);
    let secs = |tool| {
        engine
            .break_time(BlockType::Stone, tool)
            .duration()
            .map(|duration| duration.as_secs_f64())
            .unwrap()
    };
    assert!((secs(Some("iron_pickaxe")) - 0.3).abs() < 1e-9);
    assert!((secs(None) - 2.25).abs() < 1e-9);
    assert!((secs(Some("iron_shovel")) - 1.5).abs() < 1e-9);
    assert_eq!(
        engine.break_time(BlockType::Bedrock, None),
        BreakTime::Unbreakable
    );
}

#[test]
fn culling_hides_far_chunks_and_restores_them() {
    let (mut engine, _) = boot(small_config(), true);
    let hidden = engine.cull_chunks(Point3::new(1000.0, 0.0, 1000.0), Vector3::unit_x());
    assert_eq!(hidden.len(), 4);
    assert!(engine.chunk_manager().chunks().all(|chunk| !chunk.is_visible()));

    let shown = engine.cull_chunks(Point3::new(16.0, 10.0, 16.0), Vector3::unit_z());
    assert_eq!(shown.len(), 4);
    assert!(engine.chunk_manager().chunks().all(|chunk| chunk.is_visible()));
}
