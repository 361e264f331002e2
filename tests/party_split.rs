mod common;

use cstv_budgeting::{cstv, Combination, CstvConfig, NumericMode};

/// Three blocs of three projects each, donors split entirely within one bloc — the reference
/// implementation's `test_cstv_party_split` scenario (`SPEC_FULL.md` §8, S8).
fn build() -> (cstv_budgeting::Instance, cstv_budgeting::Profile) {
    let instance = common::instance(
        NumericMode::Exact,
        &[
            ("A1", 20),
            ("A2", 20),
            ("A3", 20),
            ("B1", 26),
            ("B2", 26),
            ("B3", 26),
            ("C1", 30),
            ("C2", 30),
            ("C3", 30),
        ],
        0,
    );
    let profile = common::profile(
        &instance,
        &[
            &[("A1", 26), ("A2", 26), ("A3", 26)][..],
            &[("A1", 26), ("A2", 26), ("A3", 26)][..],
            &[("A1", 26), ("A2", 26), ("A3", 26)][..],
            &[("A1", 26), ("A2", 26), ("A3", 26)][..],
            &[("B1", 39), ("B2", 39)][..],
            &[("B1", 39), ("B2", 39)][..],
            &[("C1", 39), ("C2", 39)][..],
            &[("C1", 39), ("C2", 39)][..],
        ],
    );
    (instance, profile)
}

#[test]
fn party_split_funds_bloc_a_under_every_combination() {
    let (instance, profile) = build();

    for combination in [
        Combination::Ewt,
        Combination::Ewtc,
        Combination::Ewts,
        Combination::Mt,
        Combination::Mtc,
        Combination::Mts,
    ] {
        let config = CstvConfig::from_combination(combination);
        let allocation = cstv(&instance, &profile, &config).expect("party split is a valid input");
        let names = common::funded_names(&allocation, &instance);
        assert_eq!(names, vec!["A1", "A2", "A3"], "{combination:?}");
    }
}
