//! Projects and the election instance they belong to.

use crate::numeric::{Amount, NumericMode};

/// The interned identity of a [`Project`] within one [`Instance`]. Every donor-keyed map in this
/// crate is keyed by `ProjectId`, never by name or by a cloned [`Project`] — see `SPEC_FULL.md` §9
/// on the dual-keying hazard this resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectId(pub(crate) usize);

/// A funding candidate: a name (used only for tie-breaking and display) and a positive cost.
#[derive(Debug, Clone)]
pub struct Project {
    id: ProjectId,
    name: String,
    cost: Amount,
}

impl Project {
    /// This project's interned id.
    pub fn id(&self) -> ProjectId {
        self.id
    }

    /// Display name, used by the default tie-breaker and nowhere else in the core.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positive cost.
    pub fn cost(&self) -> &Amount {
        &self.cost
    }
}

/// The projects under consideration plus the global budget for one election.
#[derive(Debug, Clone)]
pub struct Instance {
    projects: Vec<Project>,
    budget_limit: Amount,
    mode: NumericMode,
}

impl Instance {
    /// Build an instance, interning each `(name, cost)` pair into a [`Project`] in iteration order.
    pub fn new(
        mode: NumericMode,
        projects: impl IntoIterator<Item = (String, Amount)>,
        budget_limit: Amount,
    ) -> Self {
        let projects = projects
            .into_iter()
            .enumerate()
            .map(|(index, (name, cost))| Project { id: ProjectId(index), name, cost })
            .collect();
        Instance { projects, budget_limit, mode }
    }

    /// All projects, in interning order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Look up a project by id. Panics if `id` was not produced by this instance.
    pub fn project(&self, id: ProjectId) -> &Project {
        &self.projects[id.0]
    }

    /// Look up a project by name.
    pub fn project_by_name(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Every project id, in interning order.
    pub fn ids(&self) -> impl Iterator<Item = ProjectId> + '_ {
        self.projects.iter().map(|p| p.id)
    }

    /// The numeric backend this election runs under.
    pub fn mode(&self) -> NumericMode {
        self.mode
    }

    /// The configured budget ceiling. If this is `<= 0`, the driver falls back to the sum of all
    /// donations (`SPEC_FULL.md` §3).
    pub fn budget_limit(&self) -> &Amount {
        &self.budget_limit
    }

    /// Number of projects in this instance.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// True if this instance has no projects.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
