//! End-to-end scenarios for the three generators.

use dungeon_layout::generation::grammar::{MissionGraph, NodeKind};
use dungeon_layout::prelude::*;
use dungeon_layout::{Direction, TileOwner};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rstest::rstest;

fn corridor_end_is_attached(dungeon: &Dungeon, corridor: &Corridor) -> bool {
    let end = corridor.end();
    let continues_chain = dungeon
        .corridors()
        .iter()
        .any(|other| other.identifier() != corridor.identifier() && other.start() == end);
    let touches_room = Direction::all().into_iter().any(|direction| {
        dungeon.is_open(end, direction)
            && dungeon
                .grid()
                .neighbor(end, direction)
                .and_then(|next| dungeon.tile(next))
                .is_some_and(|tile| matches!(tile.owner(), TileOwner::Room(_)))
    });
    continues_chain || touches_room
}

// =============================================================================
// BSP
// =============================================================================

#[rstest]
#[case(0)]
#[case(7)]
#[case(42)]
#[case(1_000_003)]
fn bsp_default_grid_places_rooms_inside_bounds(#[case] seed: u64) {
    let configuration = BspConfiguration::new(40, 40, RoomBounds::square(4, 8), 2);
    let dungeon = BspGenerator::new(configuration)
        .unwrap()
        .generate_seeded(seed)
        .unwrap();

    assert!(dungeon.room_count() >= 1);
    assert_ne!(dungeon.entrance(), dungeon.exit());
    for room in dungeon.rooms() {
        let bottom_right = room.bottom_right();
        assert!(bottom_right.row() < 40 && bottom_right.column() < 40, "{room}");
        assert!(room.width() >= 4 && room.width() <= 8, "{room}");
        assert!(room.height() >= 4 && room.height() <= 8, "{room}");
    }
    assert_eq!(dungeon.corridor_count(), dungeon.room_count() - 1);
    assert!(dungeon.is_fully_connected());
}

// =============================================================================
// Digger
// =============================================================================

#[rstest]
#[case(1)]
#[case(8)]
#[case(64)]
#[case(4096)]
fn digger_with_removal_leaves_only_attached_corridors(#[case] seed: u64) {
    let configuration = DiggerConfiguration::default()
        .with_corridor_bounds(CorridorBounds::new(2, 4))
        .with_remove_dirty_corridors(true);
    let dungeon = DiggerGenerator::new(configuration)
        .unwrap()
        .generate_seeded(seed)
        .unwrap();

    for corridor in dungeon.corridors() {
        assert!(
            corridor_end_is_attached(&dungeon, corridor),
            "{corridor} ends nowhere\n{dungeon}"
        );
        assert!((2..=4).contains(&corridor.len()), "{corridor}");
    }
    assert!(dungeon.dead_ends().is_empty(), "{dungeon}");
    assert!(dungeon.is_fully_connected());
}

// =============================================================================
// Graph grammar
// =============================================================================

#[rstest]
#[case(0)]
#[case(19)]
#[case(512)]
fn single_task_mission_is_entrance_task_goal(#[case] seed: u64) {
    let generator = GraphGrammarGenerator::new(
        GraphGrammarConfiguration::default()
            .with_task_count(1, 1)
            .with_reorganization_tries(50, 50)
            .with_reorganization_probability(1.0),
    )
    .unwrap();

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mission = generator.synthesize_mission(&mut rng);
    let kinds: Vec<_> = mission
        .main_path()
        .into_iter()
        .map(|node| mission.node(node).kind())
        .collect();
    assert_eq!(kinds, vec![NodeKind::Entrance, NodeKind::Task, NodeKind::Goal]);
    assert_eq!(mission, MissionGraph::start_mission());

    let dungeon = generator.generate_seeded(seed).unwrap();
    assert_eq!(dungeon.room_count(), 3);
    assert_eq!(dungeon.corridor_count(), 2);
    assert!(dungeon.corridors().iter().all(Corridor::is_straight));
    assert!(dungeon.is_fully_connected());
}
