use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::auth::{AuthError, ConfiguredCredentials, CredentialVerifier};
use crate::config::Config;
use crate::grades::format_grade;
use crate::notify::StoredScheduler;
use crate::services::{
    AssignmentDraft, AssignmentService, CourseDraft, DashboardService, GradebookService, ItemKind,
    ProfileDraft, ProfileService, ReminderError, ReminderService, ResourceService, ScheduleService,
    StudyPlannerService,
};
use crate::storage::{KeyValueStorage, StorageError};
use crate::store::CollectionKey;
use crate::utils::{format_iso, parse_datetime};

#[derive(Parser)]
#[command(name = "studydesk")]
#[command(about = "Assignments, grades, schedule and reminders for students")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dashboard tasks and exams
    #[command(subcommand)]
    Tasks(DashboardCommand),
    /// Weekly course schedule
    #[command(subcommand)]
    Courses(CourseCommand),
    #[command(subcommand)]
    Assignments(AssignmentCommand),
    /// Courses, grade components and current grades
    #[command(subcommand)]
    Grades(GradeCommand),
    #[command(subcommand)]
    Reminders(ReminderCommand),
    /// Study planner sessions
    #[command(subcommand)]
    Sessions(SessionCommand),
    /// Saved study links
    #[command(subcommand)]
    Resources(ResourceCommand),
    /// The student's name, contact, subjects and goals
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Check credentials against the configured account
    Login { username: String, password: String },
    /// Print the raw stored document of a collection
    Dump {
        /// Collection name, e.g. gradeCourses
        key: String,
    },
}

#[derive(Args)]
pub struct ExamFlag {
    /// Use the exam list instead of tasks
    #[arg(long)]
    pub exam: bool,
}

#[derive(Subcommand)]
pub enum DashboardCommand {
    Add {
        title: String,
        date: String,
        #[command(flatten)]
        kind: ExamFlag,
    },
    List {
        #[command(flatten)]
        kind: ExamFlag,
    },
    Rm {
        id: String,
        #[command(flatten)]
        kind: ExamFlag,
    },
}

#[derive(Subcommand)]
pub enum CourseCommand {
    Add {
        name: String,
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        days: String,
        #[arg(long, default_value = "")]
        location: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        days: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    List,
    Rm { id: String },
}

#[derive(Subcommand)]
pub enum AssignmentCommand {
    Add {
        title: String,
        /// Due date (YYYY-MM-DD, "YYYY-MM-DD HH:MM" or RFC 3339)
        #[arg(long)]
        due: String,
        #[arg(long, default_value = "")]
        course: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        course: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Mark complete, or back to open
    Toggle { id: String },
    List,
    Rm { id: String },
}

#[derive(Subcommand)]
pub enum GradeCommand {
    AddCourse { name: String },
    Rename { id: String, name: String },
    AddComponent {
        course_id: String,
        name: String,
        #[arg(long)]
        weight: String,
        #[arg(long, default_value = "")]
        score: String,
    },
    List,
    Rm { id: String },
}

#[derive(Subcommand)]
pub enum ReminderCommand {
    Add {
        title: String,
        /// When to fire (YYYY-MM-DD, "YYYY-MM-DD HH:MM" or RFC 3339, UTC)
        #[arg(long)]
        at: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    List,
    Rm { id: String },
    /// Show notifications whose time has come
    Due,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    Add { subject: String, time: String },
    List,
    Rm { id: String },
}

#[derive(Subcommand)]
pub enum ResourceCommand {
    Add { title: String, url: String },
    List,
    Rm { id: String },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show,
    /// Create the profile or change some of its fields
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        subjects: Option<String>,
        #[arg(long)]
        goals: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("{0}")]
    ReminderError(#[from] ReminderError),
    #[error("{0}")]
    AuthError(#[from] AuthError),
    #[error("No record with id {0}")]
    NotFound(String),
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
}

fn parse_when(value: &str) -> Result<chrono::DateTime<chrono::Utc>, CliError> {
    parse_datetime(value).ok_or_else(|| {
        CliError::DateParseError(format!(
            "Invalid date '{}': expected YYYY-MM-DD, \"YYYY-MM-DD HH:MM\" or RFC 3339",
            value
        ))
    })
}

fn kind_of(flag: &ExamFlag) -> ItemKind {
    if flag.exam { ItemKind::Exam } else { ItemKind::Task }
}

fn not_saved(what: &str) {
    println!("Nothing saved: {}", what);
}

/// Dispatch a parsed command
pub fn run(
    command: Commands,
    storage: &dyn KeyValueStorage,
    config: &Config,
) -> Result<(), CliError> {
    match command {
        Commands::Tasks(cmd) => handle_dashboard(cmd, storage),
        Commands::Courses(cmd) => handle_courses(cmd, storage),
        Commands::Assignments(cmd) => handle_assignments(cmd, storage),
        Commands::Grades(cmd) => handle_grades(cmd, storage),
        Commands::Reminders(cmd) => handle_reminders(cmd, storage, config),
        Commands::Sessions(cmd) => handle_sessions(cmd, storage),
        Commands::Resources(cmd) => handle_resources(cmd, storage),
        Commands::Profile(cmd) => handle_profile(cmd, storage),
        Commands::Login { username, password } => handle_login(&username, &password, config),
        Commands::Dump { key } => handle_dump(&key, storage),
    }
}

/// Handle dashboard task/exam commands
pub fn handle_dashboard(
    cmd: DashboardCommand,
    storage: &dyn KeyValueStorage,
) -> Result<(), CliError> {
    let dashboard = DashboardService::new(storage);
    match cmd {
        DashboardCommand::Add { title, date, kind } => {
            match dashboard.add_item(&title, &date, kind_of(&kind)) {
                Some(item) => println!("Added (ID: {})", item.id),
                None => not_saved("title and date are required"),
            }
        }
        DashboardCommand::List { kind } => {
            let items = match kind_of(&kind) {
                ItemKind::Task => dashboard.tasks(),
                ItemKind::Exam => dashboard.exams(),
            };
            for item in items {
                println!("{}  {}  {}", item.id, item.date, item.title);
            }
        }
        DashboardCommand::Rm { id, kind } => {
            dashboard
                .delete_item(&id, kind_of(&kind))
                .ok_or(CliError::NotFound(id))?;
        }
    }
    Ok(())
}

pub fn handle_courses(cmd: CourseCommand, storage: &dyn KeyValueStorage) -> Result<(), CliError> {
    let schedule = ScheduleService::new(storage);
    match cmd {
        CourseCommand::Add { name, time, days, location } => {
            let course = schedule.save_course(CourseDraft {
                id: None,
                name,
                time,
                days,
                location,
            });
            if let Some(course) = course {
                println!("Course added (ID: {})", course.id);
            }
        }
        CourseCommand::Edit { id, name, time, days, location } => {
            let course = schedule
                .course(&id)
                .ok_or_else(|| CliError::NotFound(id.clone()))?;
            let mut draft = CourseDraft::from(course);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(time) = time {
                draft.time = time;
            }
            if let Some(days) = days {
                draft.days = days;
            }
            if let Some(location) = location {
                draft.location = location;
            }
            schedule.save_course(draft).ok_or(CliError::NotFound(id))?;
        }
        CourseCommand::List => {
            for c in schedule.courses() {
                println!("{}  {}  {} {}  {}", c.id, c.name, c.days, c.time, c.location);
            }
        }
        CourseCommand::Rm { id } => {
            schedule.delete_course(&id).ok_or(CliError::NotFound(id))?;
        }
    }
    Ok(())
}

pub fn handle_assignments(
    cmd: AssignmentCommand,
    storage: &dyn KeyValueStorage,
) -> Result<(), CliError> {
    let service = AssignmentService::new(storage);
    match cmd {
        AssignmentCommand::Add { title, due, course, description } => {
            let due_date = format_iso(&parse_when(&due)?);
            let draft = AssignmentDraft {
                title,
                course,
                due_date,
                description,
                ..Default::default()
            };
            match service.save_assignment(draft) {
                Some(a) => println!("Assignment created (ID: {})", a.id),
                None => not_saved("title is required"),
            }
        }
        AssignmentCommand::Edit { id, title, due, course, description } => {
            let mut draft = AssignmentDraft::from(
                service.assignment(&id).ok_or_else(|| CliError::NotFound(id.clone()))?,
            );
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(due) = due {
                draft.due_date = format_iso(&parse_when(&due)?);
            }
            if let Some(course) = course {
                draft.course = course;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if service.save_assignment(draft).is_none() {
                not_saved("title is required");
            }
        }
        AssignmentCommand::Toggle { id } => {
            let a = service.toggle_completion(&id).ok_or(CliError::NotFound(id))?;
            println!("{} is now {}", a.title, if a.completed { "done" } else { "open" });
        }
        AssignmentCommand::List => {
            for a in service.assignments() {
                let mark = if a.completed { "x" } else { " " };
                println!("[{}] {}  {}  {}  {}", mark, a.id, a.due_date, a.course, a.title);
            }
        }
        AssignmentCommand::Rm { id } => {
            service.delete_assignment(&id).ok_or(CliError::NotFound(id))?;
        }
    }
    Ok(())
}

pub fn handle_grades(cmd: GradeCommand, storage: &dyn KeyValueStorage) -> Result<(), CliError> {
    let gradebook = GradebookService::new(storage);
    match cmd {
        GradeCommand::AddCourse { name } => match gradebook.save_course(None, &name) {
            Some(course) => println!("Course added (ID: {})", course.id),
            None => not_saved("course name is required"),
        },
        GradeCommand::Rename { id, name } => {
            if gradebook.save_course(Some(&id), &name).is_none() {
                if gradebook.course(&id).is_none() {
                    return Err(CliError::NotFound(id));
                }
                not_saved("course name is required");
            }
        }
        GradeCommand::AddComponent { course_id, name, weight, score } => {
            if gradebook.course(&course_id).is_none() {
                return Err(CliError::NotFound(course_id));
            }
            match gradebook.add_component(&course_id, &name, &weight, &score) {
                Some(course) => {
                    println!("{}: {}", course.name, format_grade(course.current_grade()))
                }
                None => not_saved("component name and weight are required"),
            }
        }
        GradeCommand::List => {
            for summary in gradebook.summaries() {
                println!(
                    "{}  {}  Current grade: {}",
                    summary.course.id,
                    summary.course.name,
                    format_grade(summary.grade)
                );
                for c in &summary.course.components {
                    println!("    {}  weight {}  score {}", c.name, c.weight, c.score);
                }
            }
        }
        GradeCommand::Rm { id } => {
            gradebook.delete_course(&id).ok_or(CliError::NotFound(id))?;
        }
    }
    Ok(())
}

pub fn handle_reminders(
    cmd: ReminderCommand,
    storage: &dyn KeyValueStorage,
    config: &Config,
) -> Result<(), CliError> {
    let scheduler = StoredScheduler::new(storage);
    let service = ReminderService::new(storage, &scheduler, config.default_reminder_body.clone());
    match cmd {
        ReminderCommand::Add { title, at, body } => {
            let reminder = service.save_reminder(&title, &body, parse_when(&at)?)?;
            println!("Reminder set for {} (ID: {})", reminder.date, reminder.id);
        }
        ReminderCommand::List => {
            for r in service.reminders() {
                println!("{}  {}  {}  {}", r.id, r.date, r.title, r.body);
            }
        }
        ReminderCommand::Rm { id } => {
            service.delete_reminder(&id).ok_or(CliError::NotFound(id))?;
        }
        ReminderCommand::Due => {
            for n in scheduler.due(chrono::Utc::now()) {
                println!("{}  {}  {}", n.fire_at, n.title, n.body);
            }
        }
    }
    Ok(())
}

pub fn handle_sessions(cmd: SessionCommand, storage: &dyn KeyValueStorage) -> Result<(), CliError> {
    let planner = StudyPlannerService::new(storage);
    match cmd {
        SessionCommand::Add { subject, time } => match planner.add_session(&subject, &time) {
            Some(s) => println!("Session planned (ID: {})", s.id),
            None => not_saved("subject and time are required"),
        },
        SessionCommand::List => {
            for s in planner.sessions() {
                println!("{}  {}  {}", s.id, s.time, s.subject);
            }
        }
        SessionCommand::Rm { id } => {
            planner.delete_session(&id).ok_or(CliError::NotFound(id))?;
        }
    }
    Ok(())
}

pub fn handle_resources(
    cmd: ResourceCommand,
    storage: &dyn KeyValueStorage,
) -> Result<(), CliError> {
    let service = ResourceService::new(storage);
    match cmd {
        ResourceCommand::Add { title, url } => match service.add_resource(&title, &url) {
            Some(r) => println!("Resource saved (ID: {})", r.id),
            None => not_saved("title and url are required"),
        },
        ResourceCommand::List => {
            for r in service.resources() {
                println!("{}  {}  {}", r.id, r.title, r.url);
            }
        }
        ResourceCommand::Rm { id } => {
            service.delete_resource(&id).ok_or(CliError::NotFound(id))?;
        }
    }
    Ok(())
}

pub fn handle_profile(cmd: ProfileCommand, storage: &dyn KeyValueStorage) -> Result<(), CliError> {
    let service = ProfileService::new(storage);
    match cmd {
        ProfileCommand::Show => match service.profile() {
            Some(p) => {
                println!("Name: {}", p.name);
                println!("Email: {}", p.email);
                println!("Subjects: {}", p.subjects);
                println!("Goals: {}", p.goals);
            }
            None => println!("(no profile)"),
        },
        ProfileCommand::Set { name, email, subjects, goals } => {
            let mut draft = service.profile().map(ProfileDraft::from).unwrap_or_default();
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(email) = email {
                draft.email = email;
            }
            if let Some(subjects) = subjects {
                draft.subjects = subjects;
            }
            if let Some(goals) = goals {
                draft.goals = goals;
            }
            match service.save_profile(draft) {
                Some(p) => println!("Profile saved for {}", p.name),
                None => not_saved("name is required"),
            }
        }
    }
    Ok(())
}

pub fn handle_login(username: &str, password: &str, config: &Config) -> Result<(), CliError> {
    let verifier = ConfiguredCredentials::from_config(&config.login);
    let session = verifier.verify(username, password)?;
    println!("Welcome, {}", session.username);
    Ok(())
}

pub fn handle_dump(key: &str, storage: &dyn KeyValueStorage) -> Result<(), CliError> {
    let key = CollectionKey::from_name(key)
        .ok_or_else(|| CliError::UnknownCollection(key.to_string()))?;
    match storage.get_item(key.as_str())? {
        Some(raw) => println!("{}", raw),
        None => println!("(empty)"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn cli_parses_nested_commands() {
        let cli = Cli::try_parse_from([
            "studydesk",
            "grades",
            "add-component",
            "123",
            "Midterm",
            "--weight",
            "40",
            "--score",
            "90",
        ])
        .unwrap();
        match cli.command {
            Commands::Grades(GradeCommand::AddComponent { course_id, name, weight, score }) => {
                assert_eq!(course_id, "123");
                assert_eq!(name, "Midterm");
                assert_eq!(weight, "40");
                assert_eq!(score, "90");
            }
            _ => panic!("wrong command"),
        }

        let args = ["studydesk", "--dev", "tasks", "add", "Quiz", "2024-02-02", "--exam"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.dev);
        assert!(matches!(
            cli.command,
            Commands::Tasks(DashboardCommand::Add { kind: ExamFlag { exam: true }, .. })
        ));
    }

    #[test]
    fn assignment_due_date_must_parse() {
        let storage = MemoryStorage::new();
        let err = handle_assignments(
            AssignmentCommand::Add {
                title: "Essay".into(),
                due: "next week".into(),
                course: String::new(),
                description: String::new(),
            },
            &storage,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::DateParseError(_)));
        assert!(storage.get_item("assignments").unwrap().is_none());
    }

    #[test]
    fn removing_unknown_id_is_reported() {
        let storage = MemoryStorage::new();
        let err =
            handle_resources(ResourceCommand::Rm { id: "nope".into() }, &storage).unwrap_err();
        assert_eq!(err.to_string(), "No record with id nope");
    }

    #[test]
    fn reminder_without_title_reports_message() {
        let storage = MemoryStorage::new();
        let config = Config::default();
        let err = handle_reminders(
            ReminderCommand::Add { title: "".into(), at: "2024-05-01".into(), body: String::new() },
            &storage,
            &config,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn login_uses_configured_account() {
        let mut config = Config::default();
        config.login.username = "student".into();
        config.login.password = "pw".into();
        assert!(handle_login("student", "pw", &config).is_ok());
        let err = handle_login("student", "bad", &config).unwrap_err();
        assert_eq!(err.to_string(), "Username or password is incorrect");
    }

    #[test]
    fn dump_rejects_unknown_collection() {
        let storage = MemoryStorage::new();
        assert!(matches!(handle_dump("notes", &storage), Err(CliError::UnknownCollection(_))));
        assert!(handle_dump("tasks", &storage).is_ok());
    }

    #[test]
    fn profile_set_merges_into_existing_profile() {
        let storage = MemoryStorage::new();
        let cli = Cli::try_parse_from([
            "studydesk",
            "profile",
            "set",
            "--name",
            "Erza",
            "--email",
            "erza@example.com",
        ])
        .unwrap();
        let Commands::Profile(cmd) = cli.command else {
            panic!("wrong command");
        };
        handle_profile(cmd, &storage).unwrap();

        let goals = ProfileCommand::Set {
            name: None,
            email: None,
            subjects: None,
            goals: Some("Finish the thesis".into()),
        };
        handle_profile(goals, &storage).unwrap();

        let profile = ProfileService::new(&storage).profile().unwrap();
        assert_eq!(profile.name, "Erza");
        assert_eq!(profile.email, "erza@example.com");
        assert_eq!(profile.goals, "Finish the thesis");
        assert!(handle_dump("studentProfile", &storage).is_ok());
    }

    #[test]
    fn profile_set_without_name_saves_nothing() {
        let storage = MemoryStorage::new();
        let cmd = ProfileCommand::Set {
            name: None,
            email: Some("erza@example.com".into()),
            subjects: None,
            goals: None,
        };
        handle_profile(cmd, &storage).unwrap();
        assert!(storage.get_item("studentProfile").unwrap().is_none());
    }
}
