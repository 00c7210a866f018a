//! JSON round trips for configurations and finished dungeons.

use dungeon_layout::prelude::*;
use rstest::rstest;

#[rstest]
fn bsp_dungeon_round_trips() {
    let dungeon = BspGenerator::new(BspConfiguration::default())
        .unwrap()
        .generate_seeded(21)
        .unwrap();

    let json = serde_json::to_string(&dungeon).unwrap();
    let restored: Dungeon = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, dungeon);
    assert!(restored.is_fully_connected());
    assert_eq!(restored.to_string(), dungeon.to_string());
}

#[rstest]
fn grammar_dungeon_keeps_entrance_and_exit() {
    let dungeon = GraphGrammarGenerator::new(GraphGrammarConfiguration::default())
        .unwrap()
        .generate_seeded(5)
        .unwrap();

    let value = serde_json::to_value(&dungeon).unwrap();
    let restored: Dungeon = serde_json::from_value(value).unwrap();

    assert_eq!(restored.entrance(), dungeon.entrance());
    assert_eq!(restored.exit(), dungeon.exit());
    assert_eq!(restored.corridors(), dungeon.corridors());
}

#[rstest]
fn configurations_round_trip() {
    let digger = DiggerConfiguration::default()
        .with_corridor_bounds(CorridorBounds::new(2, 4))
        .with_remove_dirty_corridors(false);
    let grammar = GraphGrammarConfiguration::default()
        .with_task_count(3, 7)
        .with_reorganization_probability(0.25);

    let digger_json = serde_json::to_string(&digger).unwrap();
    let grammar_json = serde_json::to_string(&grammar).unwrap();

    assert_eq!(serde_json::from_str::<DiggerConfiguration>(&digger_json).unwrap(), digger);
    assert_eq!(
        serde_json::from_str::<GraphGrammarConfiguration>(&grammar_json).unwrap(),
        grammar
    );
}
