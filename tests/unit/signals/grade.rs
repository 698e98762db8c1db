//! Unit tests for signal grading

use signaltrix::models::signal::Alignment;
use signaltrix::signals::grade::signal_grade;

#[test]
fn test_full_marks_is_a_plus() {
    let grade = signal_grade(99, 8.0, Alignment::AllBullish);
    assert_eq!(grade.grade, "A+");
    assert_eq!(grade.label, "EXCELLENT");
}

#[test]
fn test_mixed_weak_signal_fails() {
    let grade = signal_grade(30, 1.0, Alignment::Mixed);
    // 12 + 5 + 0 = 17, well under the D band.
    assert_eq!(grade.grade, "F");
    assert_eq!(grade.label, "AVOID");
}

#[test]
fn test_confidence_component_capped_at_40() {
    // Confidence alone cannot push past its 40-point share: even a
    // maximal reading stays in the D band without confluence or alignment.
    let grade = signal_grade(99, 0.0, Alignment::Mixed);
    assert_eq!(grade.grade, "D");
}

#[test]
fn test_confluence_component_capped_at_35() {
    let capped = signal_grade(0, 20.0, Alignment::Mixed);
    let at_limit = signal_grade(0, 7.0, Alignment::Mixed);
    assert_eq!(capped.grade, at_limit.grade);
}

#[test]
fn test_partial_alignment_component() {
    // 40 (capped) + 25 + 12 = 77: grade A.
    let grade = signal_grade(99, 5.0, Alignment::MostlyBullish);
    assert_eq!(grade.grade, "A");
}

#[test]
fn test_band_edges() {
    // 40 + 20 + 0 = 60: exactly the B floor.
    let grade = signal_grade(100, 4.0, Alignment::Mixed);
    assert_eq!(grade.grade, "B");
    // 40 + 5 + 0 = 45: exactly the C floor.
    let grade = signal_grade(100, 1.0, Alignment::Mixed);
    assert_eq!(grade.grade, "C");
}
