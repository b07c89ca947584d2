//! Breadth-first walk over `parent_task_id` links.
//!
//! The walk does no I/O itself: the caller asks for the next parent, loads
//! that parent's children however it likes (for SQLite, inside the same
//! transaction that later deletes them) and feeds them back.

use std::collections::{HashSet, VecDeque};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::Task;

/// Descendants of a task split by whether they may be deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadePlan {
    /// Non-completed descendants, in breadth-first order.
    pub descendants: Vec<Uuid>,
    /// Completed descendants. Their own subtrees are left alone as well.
    pub preserved: Vec<Uuid>,
}

/// Iterative descendant collection with cycle and depth protection.
///
/// Visited ids are tracked, so a chain that loops back on itself terminates
/// and the root is never collected. A descendant deeper than `max_depth`
/// levels fails the walk.
#[derive(Debug)]
pub struct CascadeWalk {
    root_id: Uuid,
    max_depth: usize,
    visited: HashSet<Uuid>,
    queue: VecDeque<(Uuid, usize)>,
    plan: CascadePlan,
}

impl CascadeWalk {
    pub fn new(root_id: Uuid, max_depth: usize) -> Self {
        Self {
            root_id,
            max_depth,
            visited: HashSet::from([root_id]),
            queue: VecDeque::from([(root_id, 0)]),
            plan: CascadePlan::default(),
        }
    }

    /// Next task whose children must be loaded, with its depth below the root.
    pub fn next_parent(&mut self) -> Option<(Uuid, usize)> {
        self.queue.pop_front()
    }

    /// Records the children of a parent returned by [`Self::next_parent`].
    pub fn visit_children(&mut self, parent_depth: usize, children: &[Task]) -> Result<(), CoreError> {
        for child in children {
            if !self.visited.insert(child.id) {
                continue;
            }
            if parent_depth + 1 > self.max_depth {
                return Err(CoreError::HierarchyTooDeep {
                    root: self.root_id.to_string(),
                    limit: self.max_depth,
                });
            }
            if child.is_completed() {
                self.plan.preserved.push(child.id);
            } else {
                self.plan.descendants.push(child.id);
                self.queue.push_back((child.id, parent_depth + 1));
            }
        }
        Ok(())
    }

    pub fn into_plan(self) -> CascadePlan {
        self.plan
    }
}
