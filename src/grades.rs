//! Weighted course grades.
//!
//! Weights are relative: they need not sum to 100. A course with components
//! weighted 1 and 3 is graded exactly like one weighted 25 and 75.

use crate::models::GradeComponent;

/// Interpret user-typed text as a number.
///
/// Leading whitespace is skipped and the longest leading decimal number is
/// used, so `"40%"` reads as 40. Text without a leading number, or one that
/// is not finite, reads as 0.
pub fn parse_numeric(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    // Optional exponent, only taken if it has digits
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Weighted percentage (0-100 for scores in 0-100) over the components.
///
/// Each component adds `weight` to the total weight and
/// `weight * score / 100` to the weighted sum; the result is
/// `weighted_sum / total_weight * 100`, or 0 when the total weight is 0.
pub fn compute_grade(components: &[GradeComponent]) -> f64 {
    let mut total_weight = 0.0;
    let mut weighted_sum = 0.0;

    for component in components {
        let weight = parse_numeric(&component.weight);
        let score = parse_numeric(&component.score);
        total_weight += weight;
        weighted_sum += weight * score / 100.0;
    }

    if total_weight == 0.0 {
        return 0.0;
    }
    (weighted_sum / total_weight) * 100.0
}

/// Render a grade the way it is displayed, e.g. `78.0%`
pub fn format_grade(grade: f64) -> String {
    format!("{:.1}%", grade)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(weight: &str, score: &str) -> GradeComponent {
        GradeComponent {
            id: format!("{}-{}", weight, score),
            name: "part".to_string(),
            weight: weight.to_string(),
            score: score.to_string(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_course_grades_zero() {
        assert_eq!(compute_grade(&[]), 0.0);
    }

    #[test]
    fn equal_weights_average_scores() {
        let grade = compute_grade(&[component("50", "80"), component("50", "60")]);
        assert!(approx(grade, 70.0), "got {}", grade);
    }

    #[test]
    fn non_numeric_weight_counts_as_zero() {
        assert_eq!(compute_grade(&[component("abc", "90")]), 0.0);
    }

    #[test]
    fn zero_weight_component_is_excluded() {
        let grade = compute_grade(&[component("0", "10"), component("30", "90")]);
        assert!(approx(grade, 90.0));
    }

    #[test]
    fn weights_are_relative() {
        let small = compute_grade(&[component("1", "40"), component("3", "80")]);
        let large = compute_grade(&[component("25", "40"), component("75", "80")]);
        assert!(approx(small, 70.0));
        assert!(approx(small, large));
    }

    #[test]
    fn missing_score_counts_as_zero() {
        let grade = compute_grade(&[component("50", ""), component("50", "100")]);
        assert!(approx(grade, 50.0));
    }

    #[test]
    fn parse_numeric_reads_leading_number() {
        assert_eq!(parse_numeric("40"), 40.0);
        assert_eq!(parse_numeric("  12.5"), 12.5);
        assert_eq!(parse_numeric("40%"), 40.0);
        assert_eq!(parse_numeric(".5"), 0.5);
        assert_eq!(parse_numeric("5."), 5.0);
        assert_eq!(parse_numeric("-3"), -3.0);
        assert_eq!(parse_numeric("1e2"), 100.0);
        assert_eq!(parse_numeric("1e"), 1.0);
        assert_eq!(parse_numeric("abc"), 0.0);
        assert_eq!(parse_numeric(""), 0.0);
        assert_eq!(parse_numeric("."), 0.0);
        assert_eq!(parse_numeric("-"), 0.0);
        assert_eq!(parse_numeric("1e999"), 0.0);
    }

    #[test]
    fn format_grade_uses_one_decimal() {
        assert_eq!(format_grade(78.0), "78.0%");
        assert_eq!(format_grade(66.666), "66.7%");
    }
}
