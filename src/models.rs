use serde::{Deserialize, Serialize};

use crate::store::Record;
use crate::utils::generate_id;

/// A dashboard entry; tasks and exams share this shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedItem {
    pub id: String,
    #[serde(alias = "titulli")]
    pub title: String,
    #[serde(alias = "data")]
    pub date: String,
}

/// A class in the weekly schedule
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScheduledCourse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub days: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub course: String,
    pub due_date: String, // ISO 8601
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// One weighted part of a course grade.
///
/// Weight and score stay as the text the user typed; they are interpreted
/// numerically only when a grade is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeComponent {
    pub id: String,
    pub name: String,
    pub weight: String,
    #[serde(default)]
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCourse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub components: Vec<GradeComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub date: String, // ISO 8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: String,
    pub subject: String,
    pub time: String,
}

/// A bookmarked study resource (link)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// The student's own details: name, contact, subjects and goals.
/// At most one is stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subjects: String,
    #[serde(default)]
    pub goals: String,
}

/// A notification queued by the local scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub fire_at: String, // ISO 8601
}

impl DatedItem {
    pub fn new(title: String, date: String) -> Self {
        Self {
            id: generate_id(),
            title,
            date,
        }
    }
}

impl GradeCourse {
    pub fn new(name: String) -> Self {
        Self {
            id: generate_id(),
            name,
            components: Vec::new(),
        }
    }

    /// Weighted grade over all components, 0-100
    pub fn current_grade(&self) -> f64 {
        crate::grades::compute_grade(&self.components)
    }
}

impl GradeComponent {
    pub fn new(name: String, weight: String, score: String) -> Self {
        Self {
            id: generate_id(),
            name,
            weight,
            score,
        }
    }
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_record!(
    DatedItem,
    ScheduledCourse,
    Assignment,
    GradeCourse,
    Reminder,
    StudySession,
    Resource,
    StudentProfile,
    ScheduledNotification,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dated_item_reads_legacy_field_names() {
        let item: DatedItem =
            serde_json::from_str(r#"{"id":"1","titulli":"Essay","data":"2024-03-01"}"#).unwrap();
        assert_eq!(item.title, "Essay");
        assert_eq!(item.date, "2024-03-01");

        let written = serde_json::to_string(&item).unwrap();
        assert_eq!(written, r#"{"id":"1","title":"Essay","date":"2024-03-01"}"#);
    }

    #[test]
    fn assignment_uses_camel_case_fields() {
        let json = r#"{"id":"7","title":"Lab","course":"Chem","dueDate":"2024-04-02T00:00:00.000Z","description":"","completed":true}"#;
        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert!(assignment.completed);
        assert_eq!(serde_json::to_string(&assignment).unwrap(), json);
    }

    #[test]
    fn reminder_omits_missing_notification_id() {
        let reminder = Reminder {
            id: "1".into(),
            title: "Exam".into(),
            body: String::new(),
            date: "2024-05-01T09:00:00.000Z".into(),
            notification_id: None,
        };
        let json = serde_json::to_string(&reminder).unwrap();
        assert!(!json.contains("notificationId"));
    }
}
