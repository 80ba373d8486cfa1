pub mod auth;
pub mod cli;
pub mod config;
pub mod grades;
pub mod logging;
pub mod models;
pub mod notify;
pub mod services;
pub mod storage;
pub mod store;
pub mod utils;

pub use config::Config;
pub use grades::compute_grade;
pub use models::{
    Assignment, DatedItem, GradeComponent, GradeCourse, Reminder, ScheduledCourse, StudentProfile,
};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage};
pub use store::{CollectionKey, Record, RecordStore};
pub use utils::Profile;
