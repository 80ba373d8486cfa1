use crate::grades::compute_grade;
use crate::models::{GradeComponent, GradeCourse};
use crate::storage::KeyValueStorage;
use crate::store::{CollectionKey, RecordStore};
use crate::utils::is_blank;

/// A course together with its computed grade
#[derive(Debug, Clone, PartialEq)]
pub struct CourseSummary {
    pub course: GradeCourse,
    pub grade: f64,
}

/// Courses and the weighted components that make up their grades
pub struct GradebookService<'a> {
    courses: RecordStore<'a, GradeCourse>,
}

impl<'a> GradebookService<'a> {
    pub fn new(storage: &'a dyn KeyValueStorage) -> Self {
        Self {
            courses: RecordStore::new(storage, CollectionKey::GradeCourses),
        }
    }

    pub fn courses(&self) -> Vec<GradeCourse> {
        self.courses.load()
    }

    pub fn course(&self, id: &str) -> Option<GradeCourse> {
        self.courses.get(id)
    }

    pub fn summaries(&self) -> Vec<CourseSummary> {
        self.courses
            .load()
            .into_iter()
            .map(|course| CourseSummary {
                grade: compute_grade(&course.components),
                course,
            })
            .collect()
    }

    /// Create a course (`id` = None) or rename an existing one.
    /// A blank name saves nothing; renaming keeps the components.
    pub fn save_course(&self, id: Option<&str>, name: &str) -> Option<GradeCourse> {
        if is_blank(name) {
            return None;
        }
        match id {
            Some(id) => self.courses.update(id, |c| c.name = name.to_string()),
            None => {
                let course = GradeCourse::new(name.to_string());
                self.courses.insert(course.clone()).then_some(course)
            }
        }
    }

    /// Append a component to a course. Requires a name and a weight;
    /// the score may be left empty. Returns the updated course.
    pub fn add_component(
        &self,
        course_id: &str,
        name: &str,
        weight: &str,
        score: &str,
    ) -> Option<GradeCourse> {
        if is_blank(name) || is_blank(weight) {
            return None;
        }
        let component =
            GradeComponent::new(name.to_string(), weight.to_string(), score.to_string());
        self.courses
            .update(course_id, move |c| c.components.push(component))
    }

    pub fn delete_course(&self, id: &str) -> Option<GradeCourse> {
        self.courses.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn rename_keeps_components() {
        let storage = MemoryStorage::new();
        let gradebook = GradebookService::new(&storage);
        let course = gradebook.save_course(None, "Physics").unwrap();
        gradebook.add_component(&course.id, "Quiz", "10", "100").unwrap();

        let renamed = gradebook.save_course(Some(&course.id), "Physics I").unwrap();
        assert_eq!(renamed.name, "Physics I");
        assert_eq!(renamed.components.len(), 1);
    }

    #[test]
    fn component_needs_name_and_weight() {
        let storage = MemoryStorage::new();
        let gradebook = GradebookService::new(&storage);
        let course = gradebook.save_course(None, "Art").unwrap();

        assert!(gradebook.add_component(&course.id, "", "10", "90").is_none());
        assert!(gradebook.add_component(&course.id, "Portfolio", " ", "90").is_none());
        assert!(gradebook.add_component("missing", "Portfolio", "10", "90").is_none());
        assert!(gradebook.course(&course.id).unwrap().components.is_empty());

        // Score may be left blank
        let updated = gradebook.add_component(&course.id, "Portfolio", "10", "").unwrap();
        assert_eq!(updated.components[0].score, "");
    }

    #[test]
    fn blank_course_name_saves_nothing() {
        let storage = MemoryStorage::new();
        let gradebook = GradebookService::new(&storage);
        assert!(gradebook.save_course(None, "").is_none());
        assert!(gradebook.courses().is_empty());
    }

    #[test]
    fn components_append_in_order() {
        let storage = MemoryStorage::new();
        let gradebook = GradebookService::new(&storage);
        let course = gradebook.save_course(None, "History").unwrap();
        for name in ["Essay", "Midterm", "Final"] {
            gradebook.add_component(&course.id, name, "1", "50").unwrap();
        }
        let names: Vec<String> = gradebook
            .course(&course.id)
            .unwrap()
            .components
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Essay", "Midterm", "Final"]);
    }
}
