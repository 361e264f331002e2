mod common;

use proptest::prelude::*;

use cstv_budgeting::{cstv, Combination, CstvConfig, NumericMode};

fn combination_strategy() -> impl Strategy<Value = Combination> {
    prop_oneof![
        Just(Combination::Ewt),
        Just(Combination::Ewtc),
        Just(Combination::Ewts),
        Just(Combination::Mt),
        Just(Combination::Mtc),
        Just(Combination::Mts),
    ]
}

proptest! {
    /// Budget feasibility (SPEC_FULL.md §8 invariant 1) and the upper bound on |S| (invariant 6)
    /// hold for randomly generated equal-endowment instances, across every combination.
    #[test]
    fn budget_feasibility_and_upper_bound_hold(
        costs in prop::collection::vec(5i64..40, 2..5),
        donor_count in 2usize..5,
        combination in combination_strategy(),
    ) {
        let names: Vec<(&str, i64)> = costs
            .iter()
            .enumerate()
            .map(|(i, &cost)| (["A", "B", "C", "D"][i], cost))
            .collect();
        let instance = common::instance(NumericMode::Exact, &names, 0);

        // Every donor splits an endowment equal to the total project cost evenly across all
        // projects, so the equal-endowment precondition always holds.
        let total_cost: i64 = costs.iter().sum();
        let per_project = total_cost / costs.len() as i64;
        let donor_row: Vec<(&str, i64)> = names.iter().map(|&(name, _)| (name, per_project)).collect();
        let donors: Vec<&[(&str, i64)]> = std::iter::repeat(donor_row.as_slice()).take(donor_count).collect();
        let profile = common::profile(&instance, &donors);

        let config = CstvConfig::from_combination(combination);
        let allocation = cstv(&instance, &profile, &config).expect("equal-endowment profile never fails");

        prop_assert!(allocation.len() <= instance.projects().len());
        prop_assert!(allocation.total_cost(&instance).to_f64() <= instance.budget_limit().to_f64().max(
            donor_count as f64 * total_cost as f64
        ));
    }
}
