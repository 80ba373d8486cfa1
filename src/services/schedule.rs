use crate::models::ScheduledCourse;
use crate::storage::KeyValueStorage;
use crate::store::{CollectionKey, RecordStore};
use crate::utils::generate_id;

/// Course form contents; `id` is set when editing an existing course
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseDraft {
    pub id: Option<String>,
    pub name: String,
    pub time: String,
    pub days: String,
    pub location: String,
}

impl CourseDraft {
    fn into_course(self, id: String) -> ScheduledCourse {
        ScheduledCourse {
            id,
            name: self.name,
            time: self.time,
            days: self.days,
            location: self.location,
        }
    }
}

impl From<ScheduledCourse> for CourseDraft {
    fn from(course: ScheduledCourse) -> Self {
        Self {
            id: Some(course.id),
            name: course.name,
            time: course.time,
            days: course.days,
            location: course.location,
        }
    }
}

/// Weekly class schedule
pub struct ScheduleService<'a> {
    courses: RecordStore<'a, ScheduledCourse>,
}

impl<'a> ScheduleService<'a> {
    pub fn new(storage: &'a dyn KeyValueStorage) -> Self {
        Self {
            courses: RecordStore::new(storage, CollectionKey::Courses),
        }
    }

    pub fn courses(&self) -> Vec<ScheduledCourse> {
        self.courses.load()
    }

    pub fn course(&self, id: &str) -> Option<ScheduledCourse> {
        self.courses.get(id)
    }

    /// Append a new course, or replace the course the draft was opened from.
    /// Returns `None` when editing a course that no longer exists.
    pub fn save_course(&self, draft: CourseDraft) -> Option<ScheduledCourse> {
        match draft.id.clone() {
            Some(id) => self.courses.replace(draft.into_course(id)),
            None => {
                let course = draft.into_course(generate_id());
                self.courses.insert(course.clone()).then_some(course)
            }
        }
    }

    pub fn delete_course(&self, id: &str) -> Option<ScheduledCourse> {
        self.courses.remove(id)
    }
}
