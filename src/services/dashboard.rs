use crate::models::DatedItem;
use crate::storage::KeyValueStorage;
use crate::store::{CollectionKey, RecordStore};
use crate::utils::is_blank;

/// Which dashboard list an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Task,
    Exam,
}

/// Upcoming tasks and exams
pub struct DashboardService<'a> {
    tasks: RecordStore<'a, DatedItem>,
    exams: RecordStore<'a, DatedItem>,
}

impl<'a> DashboardService<'a> {
    pub fn new(storage: &'a dyn KeyValueStorage) -> Self {
        Self {
            tasks: RecordStore::new(storage, CollectionKey::Tasks),
            exams: RecordStore::new(storage, CollectionKey::Exams),
        }
    }

    fn store(&self, kind: ItemKind) -> &RecordStore<'a, DatedItem> {
        match kind {
            ItemKind::Task => &self.tasks,
            ItemKind::Exam => &self.exams,
        }
    }

    pub fn tasks(&self) -> Vec<DatedItem> {
        self.tasks.load()
    }

    pub fn exams(&self) -> Vec<DatedItem> {
        self.exams.load()
    }

    /// Add a task or exam. Blank title or date saves nothing.
    pub fn add_item(&self, title: &str, date: &str, kind: ItemKind) -> Option<DatedItem> {
        if is_blank(title) || is_blank(date) {
            return None;
        }
        let item = DatedItem::new(title.to_string(), date.to_string());
        self.store(kind).insert(item.clone()).then_some(item)
    }

    pub fn delete_item(&self, id: &str, kind: ItemKind) -> Option<DatedItem> {
        self.store(kind).remove(id)
    }
}
