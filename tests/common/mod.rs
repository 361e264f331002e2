use std::collections::BTreeMap;

use cstv_budgeting::{Amount, Ballot, Instance, NumericMode, Profile, ProjectId};

/// Build an instance with `mode`, named/costed projects, and a budget limit.
pub fn instance(mode: NumericMode, projects: &[(&str, i64)], budget_limit: i64) -> Instance {
    Instance::new(
        mode,
        projects.iter().map(|&(name, cost)| (name.to_string(), Amount::from_i64(mode, cost))),
        Amount::from_i64(mode, budget_limit),
    )
}

fn id(instance: &Instance, name: &str) -> ProjectId {
    instance.project_by_name(name).unwrap_or_else(|| panic!("no project named {name}")).id()
}

/// Build a profile from donor rows of `(project name, amount)` pairs, each with multiplicity 1.
pub fn profile(instance: &Instance, donors: &[&[(&str, i64)]]) -> Profile {
    let mode = instance.mode();
    let mut profile = Profile::new();
    for donor in donors {
        let mut donations = BTreeMap::new();
        for &(name, amount) in *donor {
            donations.insert(id(instance, name), Amount::from_i64(mode, amount));
        }
        profile.push(Ballot::Cumulative(donations), 1);
    }
    profile
}

/// Names of the projects an allocation funded, sorted for comparison convenience.
pub fn funded_names(allocation: &cstv_budgeting::BudgetAllocation, instance: &Instance) -> Vec<String> {
    let mut names: Vec<String> = allocation.projects(instance).map(|p| p.name().to_string()).collect();
    names.sort();
    names
}
