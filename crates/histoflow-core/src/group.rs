//! The group graph: named population segments and the edges between them.
//!
//! A [`GroupGraph`] owns every [`Group`] of one pipeline run. Groups are
//! created lazily through [`GroupGraph::upsert`] the first time their name is
//! seen, and later lines referencing the same name update that same node, so
//! the result is a DAG rather than a tree.

use std::ops::{Index, IndexMut};

use indexmap::IndexMap;
use log::trace;

use crate::identifier::Id;

/// Name of the designated entry group.
pub const ROOT_GROUP: &str = "Root";

/// A named node in the breakdown graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: Id,
    depth: usize,
    edges: Vec<Id>,
    leftover_edge: Option<Id>,
    histogram: Option<String>,
    column: Option<String>,
}

impl Group {
    fn new(name: Id) -> Self {
        Self {
            name,
            depth: 0,
            edges: Vec::new(),
            leftover_edge: None,
            histogram: None,
            column: None,
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    /// Longest distance from the root seen while the graph was built.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Children in the order their edges were declared.
    pub fn edges(&self) -> &[Id] {
        &self.edges
    }

    /// The child whose value is the remainder of this group's value.
    pub fn leftover_edge(&self) -> Option<Id> {
        self.leftover_edge
    }

    pub fn histogram(&self) -> Option<&str> {
        self.histogram.as_deref()
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Returns `true` if `child` is this group's leftover edge.
    pub fn is_leftover(&self, child: Id) -> bool {
        self.leftover_edge == Some(child)
    }

    pub fn set_histogram(&mut self, histogram: Option<String>) {
        self.histogram = histogram;
    }

    pub fn set_column(&mut self, column: Option<String>) {
        self.column = column;
    }

    pub fn set_leftover_edge(&mut self, child: Id) {
        self.leftover_edge = Some(child);
    }
}

/// Outcome of relaxing a child's depth in [`GroupGraph::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthChange {
    /// The child's depth already satisfied the new edge.
    Unchanged,
    /// The child's depth was raised and it has no children yet.
    Raised,
    /// The child's depth was raised after it already had children, whose
    /// depths were not revisited.
    RaisedWithChildren,
}

/// Insertion-ordered collection of groups keyed by name.
#[derive(Debug, Clone, Default)]
pub struct GroupGraph {
    groups: IndexMap<Id, Group>,
}

impl GroupGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle of the group named `name`, creating it with
    /// default fields if it does not exist yet.
    ///
    /// Existing groups are returned untouched; callers overwrite fields
    /// explicitly through [`GroupGraph::group_mut`].
    pub fn upsert(&mut self, name: &str) -> Id {
        self.upsert_id(Id::new(name))
    }

    /// Same as [`GroupGraph::upsert`] for an already interned name.
    pub fn upsert_id(&mut self, id: Id) -> Id {
        self.groups.entry(id).or_insert_with(|| {
            trace!(group:% = id; "Creating group");
            Group::new(id)
        });
        id
    }

    pub fn group(&self, id: Id) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn group_mut(&mut self, id: Id) -> Option<&mut Group> {
        self.groups.get_mut(&id)
    }

    /// Looks a group up by its textual name.
    ///
    /// Names that were never interned cannot belong to a group and are not
    /// interned by the lookup.
    pub fn get(&self, name: &str) -> Option<&Group> {
        Id::existing(name).and_then(|id| self.groups.get(&id))
    }

    pub fn contains(&self, id: Id) -> bool {
        self.groups.contains_key(&id)
    }

    /// Returns the root group, if the graph defines one.
    pub fn root(&self) -> Option<&Group> {
        self.get(ROOT_GROUP)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates groups in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Appends `child` to `parent`'s edges and relaxes the child's depth to
    /// `max(child.depth, parent.depth + 1)`.
    ///
    /// Both groups must already exist.
    ///
    /// # Panics
    ///
    /// Panics if either group is missing from the graph.
    pub fn connect(&mut self, parent: Id, child: Id) -> DepthChange {
        let parent_group = self
            .groups
            .get_mut(&parent)
            .expect("parent group must be upserted before connecting");
        parent_group.edges.push(child);
        let candidate = parent_group.depth + 1;

        let child_group = self
            .groups
            .get_mut(&child)
            .expect("child group must be upserted before connecting");
        if child_group.depth >= candidate {
            return DepthChange::Unchanged;
        }

        child_group.depth = candidate;
        if child_group.edges.is_empty() {
            DepthChange::Raised
        } else {
            DepthChange::RaisedWithChildren
        }
    }
}

impl Index<Id> for GroupGraph {
    type Output = Group;

    /// # Panics
    ///
    /// Panics if the group does not exist.
    fn index(&self, id: Id) -> &Group {
        self.group(id)
            .unwrap_or_else(|| panic!("group `{id}` is not in the graph"))
    }
}

impl IndexMut<Id> for GroupGraph {
    fn index_mut(&mut self, id: Id) -> &mut Group {
        self.group_mut(id)
            .unwrap_or_else(|| panic!("group `{id}` is not in the graph"))
    }
}
