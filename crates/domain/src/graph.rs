//! In-memory view of active role inheritance edges.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::catalog::Role;
use crate::inheritance::RoleInheritance;

/// Set of roles a role transitively inherits from, including itself.
///
/// Members are kept in breadth-first discovery order, which is deterministic
/// because parents are expanded in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleClosure {
    root: Role,
    members: Vec<Role>,
}

impl RoleClosure {
    /// Returns the closure of a role with no parents.
    #[must_use]
    pub fn singleton(root: Role) -> Self {
        Self {
            root,
            members: vec![root],
        }
    }

    /// Returns the role the closure was resolved for.
    #[must_use]
    pub fn root(&self) -> Role {
        self.root
    }

    /// Returns members in discovery order, root first.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        self.members.as_slice()
    }

    /// Returns whether the role is part of the closure.
    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.members.contains(&role)
    }

    /// Returns the number of roles in the closure.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a resolved closure; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns members as an ordered set.
    #[must_use]
    pub fn to_set(&self) -> BTreeSet<Role> {
        self.members.iter().copied().collect()
    }
}

/// Adjacency map from child role to its direct parents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InheritanceGraph {
    parents: BTreeMap<Role, BTreeSet<Role>>,
}

impl InheritanceGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from the active subset of the given edges.
    #[must_use]
    pub fn from_active_edges<'a>(edges: impl IntoIterator<Item = &'a RoleInheritance>) -> Self {
        let mut graph = Self::new();
        for edge in edges.into_iter().filter(|edge| edge.is_active()) {
            graph.add_edge(edge.child_role(), edge.parent_role());
        }

        graph
    }

    /// Adds a `child -> parent` edge without any validation.
    pub fn add_edge(&mut self, child: Role, parent: Role) {
        self.parents.entry(child).or_default().insert(parent);
    }

    /// Iterates the direct parents of a role in catalog order.
    pub fn direct_parents(&self, role: Role) -> impl Iterator<Item = Role> + '_ {
        self.parents
            .get(&role)
            .into_iter()
            .flat_map(|parents| parents.iter().copied())
    }

    /// Resolves every role reachable from `role`, including `role`.
    ///
    /// Terminates on cyclic input: a role is expanded at most once.
    #[must_use]
    pub fn closure(&self, role: Role) -> RoleClosure {
        let mut visited = BTreeSet::from([role]);
        let mut members = vec![role];
        let mut frontier = VecDeque::from([role]);

        while let Some(current) = frontier.pop_front() {
            for parent in self.direct_parents(current) {
                if visited.insert(parent) {
                    members.push(parent);
                    frontier.push_back(parent);
                }
            }
        }

        RoleClosure {
            root: role,
            members,
        }
    }

    /// Returns whether adding `child -> parent` would close a cycle.
    ///
    /// True when `parent` already reaches `child`, or for a self edge.
    #[must_use]
    pub fn would_create_cycle(&self, child: Role, parent: Role) -> bool {
        child == parent || self.closure(parent).contains(child)
    }

    /// Direct parents of every catalog role.
    ///
    /// Roles without parents map to an empty list. A role can have several
    /// parents, so this is a per-node rendering of a DAG, not a tree.
    #[must_use]
    pub fn hierarchy(&self) -> BTreeMap<Role, Vec<Role>> {
        Role::all()
            .iter()
            .map(|role| (*role, self.direct_parents(*role).collect()))
            .collect()
    }

    /// Returns the number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.parents.values().map(BTreeSet::len).sum()
    }
}
