//! Level-assignment distribution tests.

use rstest::rstest;

use crate::hnsw::HnswParams;

#[rstest]
fn assignment_is_deterministic_per_seed_and_ordinal() {
    let params = HnswParams::new(16, 32)
        .expect("parameters must be valid")
        .with_rng_seed(1234);
    let first: Vec<usize> = (0..256).map(|ordinal| params.assign_level(ordinal)).collect();
    let second: Vec<usize> = (0..256).map(|ordinal| params.assign_level(ordinal)).collect();
    assert_eq!(first, second);
}

#[rstest]
fn different_seeds_vary_the_assignment() {
    let a = HnswParams::new(16, 32)
        .expect("parameters must be valid")
        .with_rng_seed(1);
    let b = HnswParams::new(16, 32)
        .expect("parameters must be valid")
        .with_rng_seed(2);
    let left: Vec<usize> = (0..512).map(|ordinal| a.assign_level(ordinal)).collect();
    let right: Vec<usize> = (0..512).map(|ordinal| b.assign_level(ordinal)).collect();
    assert_ne!(left, right);
}

#[rstest]
fn unit_fanout_pins_every_node_to_the_base_layer() {
    let params = HnswParams::new(1, 8).expect("parameters must be valid");
    assert!((0..128).all(|ordinal| params.assign_level(ordinal) == 0));
}

#[rstest]
fn upper_level_mass_matches_the_geometric_rate() {
    const DRAWS: usize = 20_000;
    let params = HnswParams::new(16, 32)
        .expect("parameters must be valid")
        .with_rng_seed(77);
    let promoted = (0..DRAWS)
        .filter(|&ordinal| params.assign_level(ordinal) >= 1)
        .count();
    // P(level >= 1) = 1/M = 0.0625; allow generous sampling slack.
    let fraction = promoted as f64 / DRAWS as f64;
    assert!(
        (0.04..0.09).contains(&fraction),
        "promotion fraction {fraction} is far from 1/16"
    );
}

#[rstest]
fn max_level_caps_the_draw() {
    let params = HnswParams::new(2, 8)
        .expect("parameters must be valid")
        .with_max_level(3)
        .with_rng_seed(5);
    assert!((0..4096).all(|ordinal| params.assign_level(ordinal) <= 3));
}
