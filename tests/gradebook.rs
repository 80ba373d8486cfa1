use studydesk::models::GradeComponent;
use studydesk::services::GradebookService;
use studydesk::{SqliteStorage, compute_grade};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn math_course_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grades.db");
    let storage = SqliteStorage::new(path.to_str().unwrap()).unwrap();
    let gradebook = GradebookService::new(&storage);

    let math = gradebook.save_course(None, "Math").unwrap();
    assert_eq!(math.current_grade(), 0.0);

    gradebook.add_component(&math.id, "Midterm", "40", "90").unwrap();
    let math = gradebook.add_component(&math.id, "Final", "60", "70").unwrap();

    assert!(approx(math.current_grade(), 78.0), "got {}", math.current_grade());

    let summaries = gradebook.summaries();
    assert_eq!(summaries.len(), 1);
    assert!(approx(summaries[0].grade, 78.0));
    assert_eq!(studydesk::grades::format_grade(summaries[0].grade), "78.0%");
}

#[test]
fn deleting_a_course_leaves_the_others() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let gradebook = GradebookService::new(&storage);
    let a = gradebook.save_course(None, "A").unwrap();
    let b = gradebook.save_course(None, "B").unwrap();
    let c = gradebook.save_course(None, "C").unwrap();

    gradebook.delete_course(&b.id).unwrap();
    let ids: Vec<String> = gradebook.courses().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![a.id, c.id]);
}

#[test]
fn documented_grade_examples() {
    let part = |weight: &str, score: &str| GradeComponent {
        id: String::new(),
        name: String::new(),
        weight: weight.to_string(),
        score: score.to_string(),
    };
    assert_eq!(compute_grade(&[]), 0.0);
    assert!(approx(compute_grade(&[part("50", "80"), part("50", "60")]), 70.0));
    assert_eq!(compute_grade(&[part("abc", "90")]), 0.0);
}
