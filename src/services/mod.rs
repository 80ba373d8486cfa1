//! One service per feature. Each borrows the storage handle and owns the
//! record store(s) for its collection(s).

pub mod assignments;
pub mod dashboard;
pub mod gradebook;
pub mod profile;
pub mod reminders;
pub mod resources;
pub mod schedule;
pub mod study_planner;

pub use assignments::{AssignmentDraft, AssignmentService};
pub use dashboard::{DashboardService, ItemKind};
pub use gradebook::{CourseSummary, GradebookService};
pub use profile::{ProfileDraft, ProfileService};
pub use reminders::{ReminderError, ReminderService};
pub use resources::ResourceService;
pub use schedule::{CourseDraft, ScheduleService};
pub use study_planner::StudyPlannerService;
