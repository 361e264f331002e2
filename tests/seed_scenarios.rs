mod common;

use cstv_budgeting::{cstv, Combination, CstvConfig, NumericMode};

const ALL_COMBINATIONS: [Combination; 6] = [
    Combination::Ewt,
    Combination::Ewtc,
    Combination::Ewts,
    Combination::Mt,
    Combination::Mtc,
    Combination::Mts,
];

fn run(instance: &cstv_budgeting::Instance, profile: &cstv_budgeting::Profile, combination: Combination) -> Vec<String> {
    let config = CstvConfig::from_combination(combination);
    let allocation = cstv(instance, profile, &config).expect("valid S1-S7 inputs never fail");
    common::funded_names(&allocation, instance)
}

#[test]
fn s1_zero_donations_selects_nothing() {
    let instance = common::instance(NumericMode::Exact, &[("A", 27), ("B", 30), ("C", 40)], 0);
    let donor: &[(&str, i64)] = &[];
    let profile = common::profile(&instance, &[donor, donor, donor, donor, donor]);

    for combination in ALL_COMBINATIONS {
        assert!(run(&instance, &profile, combination).is_empty(), "{combination:?} should fund nothing");
    }
}

#[test]
fn s2_sub_threshold_selects_nothing() {
    let instance = common::instance(NumericMode::Exact, &[("A", 27), ("B", 30), ("C", 40)], 0);
    let donor: &[(&str, i64)] = &[("A", 1), ("B", 1), ("C", 1)];
    let profile = common::profile(&instance, &[donor, donor, donor, donor, donor]);

    for combination in ALL_COMBINATIONS {
        assert!(run(&instance, &profile, combination).is_empty(), "{combination:?} should fund nothing");
    }
}

#[test]
fn s3_exact_match_funds_everything() {
    let instance = common::instance(NumericMode::Exact, &[("A", 25), ("B", 30), ("C", 40)], 0);
    // Each project's cost divides evenly by 5 donors so every donor contributes cost(p)/5 to p.
    let donor: &[(&str, i64)] = &[("A", 5), ("B", 6), ("C", 8)];
    let profile = common::profile(&instance, &[donor, donor, donor, donor, donor]);

    for combination in ALL_COMBINATIONS {
        assert_eq!(run(&instance, &profile, combination), vec!["A", "B", "C"], "{combination:?}");
    }
}

#[test]
fn s4_oversupply_funds_everything() {
    let instance = common::instance(NumericMode::Exact, &[("A", 27), ("B", 30), ("C", 40)], 0);
    let donor: &[(&str, i64)] = &[("A", 100), ("B", 100), ("C", 100)];
    let profile = common::profile(&instance, &[donor, donor, donor, donor, donor]);

    for combination in ALL_COMBINATIONS {
        assert_eq!(run(&instance, &profile, combination), vec!["A", "B", "C"], "{combination:?}");
    }
}

#[test]
fn s5_balanced_intermediate_funds_two() {
    let instance = common::instance(NumericMode::Exact, &[("A", 27), ("B", 30), ("C", 40)], 0);
    let donor: &[(&str, i64)] = &[("A", 5), ("B", 5), ("C", 5)];
    let profile = common::profile(&instance, &[donor, donor, donor, donor, donor]);

    for combination in ALL_COMBINATIONS {
        assert_eq!(run(&instance, &profile, combination).len(), 2, "{combination:?}");
    }
}

#[test]
fn s6_single_dominant_project_funds_two() {
    let instance = common::instance(NumericMode::Exact, &[("A", 27), ("B", 30), ("C", 40)], 0);
    let profile = common::profile(
        &instance,
        &[&[("A", 20)][..], &[("A", 20)][..], &[("B", 20)][..]],
    );

    for combination in ALL_COMBINATIONS {
        assert_eq!(run(&instance, &profile, combination).len(), 2, "{combination:?}");
    }
}

#[test]
fn s7_ewt_and_mt_families_diverge() {
    let instance = common::instance(NumericMode::Exact, &[("A", 20), ("B", 26), ("C", 30), ("D", 30)], 0);
    let profile = common::profile(
        &instance,
        &[
            &[("A", 15), ("B", 7)][..],
            &[("A", 1), ("B", 7), ("C", 10), ("D", 4)][..],
        ],
    );

    for combination in [Combination::Ewt, Combination::Ewtc, Combination::Ewts] {
        assert_eq!(run(&instance, &profile, combination), vec!["B"], "{combination:?}");
    }
    for combination in [Combination::Mt, Combination::Mtc, Combination::Mts] {
        assert_eq!(run(&instance, &profile, combination), vec!["A"], "{combination:?}");
    }
}

#[test]
fn greedy_baselines_are_idempotent() {
    let instance = common::instance(NumericMode::Exact, &[("A", 27), ("B", 30), ("C", 40)], 100);
    let donor: &[(&str, i64)] = &[("A", 20), ("B", 20), ("C", 20)];
    let profile = common::profile(&instance, &[donor, donor, donor, donor, donor]);

    let first = cstv_budgeting::greedy_gs(&instance, &profile).unwrap();
    let second = cstv_budgeting::greedy_gs(&instance, &profile).unwrap();
    assert_eq!(first, second);

    let first = cstv_budgeting::greedy_gsc(&instance, &profile).unwrap();
    let second = cstv_budgeting::greedy_gsc(&instance, &profile).unwrap();
    assert_eq!(first, second);

    let first = cstv_budgeting::greedy_ge(&instance, &profile).unwrap();
    let second = cstv_budgeting::greedy_ge(&instance, &profile).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unequal_endowments_fail_fast() {
    let instance = common::instance(NumericMode::Exact, &[("A", 10), ("B", 10)], 100);
    let profile = common::profile(&instance, &[&[("A", 10)][..], &[("A", 5)][..]]);

    let config = CstvConfig::from_combination(Combination::Ewt);
    let result = cstv(&instance, &profile, &config);
    assert!(matches!(result, Err(cstv_budgeting::CstvError::UnequalEndowments { .. })));
}
