use std::collections::{HashMap, HashSet, VecDeque};

use crate::app::domain::OrganizationId;

/// One organization in the directory.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub id: OrganizationId,
    pub name: String,
    pub parent_id: Option<OrganizationId>,
}

/// In-memory view of the organization forest, keyed by id.
///
/// Built once per request from the organizations table. Parent pointers come
/// straight from stored rows, so traversals must tolerate corrupt data: every
/// walk is iterative and carries a visited set. A cycle terminates the walk
/// with whatever was collected up to that point.
#[derive(Debug, Default)]
pub struct OrganizationDirectory {
    entries: HashMap<OrganizationId, DirectoryEntry>,
    children: HashMap<OrganizationId, Vec<OrganizationId>>,
}

impl OrganizationDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an organization. `parent_id` may reference an org that is never
    /// inserted; traversals treat that the same as having no parent.
    pub fn insert(&mut self, id: OrganizationId, name: impl Into<String>, parent_id: Option<OrganizationId>) {
        if let Some(parent) = &parent_id {
            self.children.entry(parent.clone()).or_default().push(id.clone());
        }
        self.entries.insert(
            id.clone(),
            DirectoryEntry {
                id,
                name: name.into(),
                parent_id,
            },
        );
    }

    pub fn contains(&self, id: &OrganizationId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &OrganizationId) -> Option<&DirectoryEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every organization id in the directory.
    pub fn all_ids(&self) -> impl Iterator<Item = &OrganizationId> {
        self.entries.keys()
    }

    /// Ancestors of an organization, nearest parent first, root-most last.
    /// Unknown ids yield an empty chain.
    pub fn ancestors(&self, id: &OrganizationId) -> Vec<OrganizationId> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(id.clone());

        let mut current = self.entries.get(id).and_then(|e| e.parent_id.clone());
        while let Some(parent_id) = current {
            if !visited.insert(parent_id.clone()) {
                tracing::warn!(organization_id = %id, "cycle in organization parent chain");
                break;
            }
            let Some(parent) = self.entries.get(&parent_id) else {
                // Dangling parent pointer: stop as if this were a root.
                break;
            };
            chain.push(parent_id);
            current = parent.parent_id.clone();
        }
        chain
    }

    /// Transitive closure of an organization's children, breadth-first. Does
    /// not include the organization itself. Unknown ids yield nothing.
    pub fn descendants(&self, id: &OrganizationId) -> Vec<OrganizationId> {
        let mut found = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(id.clone());

        let mut queue: VecDeque<OrganizationId> =
            self.children.get(id).cloned().unwrap_or_default().into();
        while let Some(child) = queue.pop_front() {
            if !visited.insert(child.clone()) {
                tracing::warn!(organization_id = %id, "cycle among organization children");
                continue;
            }
            if let Some(grandchildren) = self.children.get(&child) {
                queue.extend(grandchildren.iter().cloned());
            }
            found.push(child);
        }
        found
    }

    /// True if `candidate` sits strictly below `ancestor` in the forest.
    pub fn is_descendant_of(&self, candidate: &OrganizationId, ancestor: &OrganizationId) -> bool {
        self.ancestors(candidate).contains(ancestor)
    }
}
