use crate::models::Assignment;
use crate::storage::KeyValueStorage;
use crate::store::{CollectionKey, RecordStore};
use crate::utils::{generate_id, is_blank};

/// Assignment form contents; `id` is set when editing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentDraft {
    pub id: Option<String>,
    pub title: String,
    pub course: String,
    pub due_date: String,
    pub description: String,
    pub completed: bool,
}

impl From<Assignment> for AssignmentDraft {
    fn from(a: Assignment) -> Self {
        Self {
            id: Some(a.id),
            title: a.title,
            course: a.course,
            due_date: a.due_date,
            description: a.description,
            completed: a.completed,
        }
    }
}

pub struct AssignmentService<'a> {
    assignments: RecordStore<'a, Assignment>,
}

impl<'a> AssignmentService<'a> {
    pub fn new(storage: &'a dyn KeyValueStorage) -> Self {
        Self {
            assignments: RecordStore::new(storage, CollectionKey::Assignments),
        }
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.assignments.load()
    }

    pub fn assignment(&self, id: &str) -> Option<Assignment> {
        self.assignments.get(id)
    }

    /// Insert or replace an assignment. Saves nothing without a title and due date.
    pub fn save_assignment(&self, draft: AssignmentDraft) -> Option<Assignment> {
        if is_blank(&draft.title) || is_blank(&draft.due_date) {
            return None;
        }
        let is_edit = draft.id.is_some();
        let assignment = Assignment {
            id: draft.id.unwrap_or_else(generate_id),
            title: draft.title,
            course: draft.course,
            due_date: draft.due_date,
            description: draft.description,
            completed: draft.completed,
        };
        if is_edit {
            self.assignments.replace(assignment)
        } else {
            self.assignments.insert(assignment.clone()).then_some(assignment)
        }
    }

    /// Flip the completed flag. Returns the updated assignment.
    pub fn toggle_completion(&self, id: &str) -> Option<Assignment> {
        self.assignments.update(id, |a| a.completed = !a.completed)
    }

    pub fn delete_assignment(&self, id: &str) -> Option<Assignment> {
        self.assignments.remove(id)
    }
}
