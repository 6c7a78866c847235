use std::fs;

use life_engine::{
    CellState, CellStateFormat, GameOfLifeAlgorithm, HashLifeAlgorithm, LifeRule, presets,
};
use proptest::prelude::*;
use tempfile::tempdir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn saved_patterns_load_back(
        coords in prop::collection::vec((-80i32..80, -80i32..80), 0..60),
        plaintext in any::<bool>(),
    ) {
        let state = CellState::from_coords(&coords);
        let format = if plaintext {
            CellStateFormat::Plaintext
        } else {
            CellStateFormat::RunLengthEncoded
        };

        let text = format.serialize(&state, &LifeRule::conway(), &[]);
        let parsed = format.parse(&text).unwrap();

        // Files carry no absolute position; compare shapes.
        prop_assert_eq!(parsed.cells.normalized(), state.normalized());
    }
}

#[test]
fn gun_survives_a_trip_through_disk() {
    let dir = tempdir().unwrap();
    let gun = presets::glider_gun().cells;

    for format in CellStateFormat::all() {
        let path = dir.path().join(format!("gun.{}", format.extension()));
        fs::write(&path, format.serialize(&gun, &LifeRule::highlife(), &["N Gosper".to_string()]))
            .unwrap();

        let detected = CellStateFormat::from_path_extension(&path).unwrap();
        assert_eq!(detected, format);
        let parsed = detected.parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.cells.normalized(), gun.normalized());
    }
}

#[test]
fn rle_rule_header_drives_the_evaluator() {
    let text = "#N blinker\nx = 3, y = 1, rule = B36/S23\n3o!\n";
    let parsed = CellStateFormat::RunLengthEncoded.parse(text).unwrap();
    let rule = parsed.rule.unwrap();
    assert_eq!(rule, LifeRule::highlife());

    let hashlife = HashLifeAlgorithm::new(rule);
    let vertical = hashlife.compute_generation_with_step(&parsed.cells, 1);
    assert_eq!(
        vertical,
        CellState::from_coords(&[(1, -1), (1, 0), (1, 1)])
    );
    assert_eq!(
        hashlife.compute_generation_with_step(&vertical, 1),
        parsed.cells
    );
}
