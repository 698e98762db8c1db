//! Letter grading of the final signal.

use crate::models::signal::{Alignment, Grade};

/// Composite of confidence (max 40), average confluence (max 35) and
/// alignment (25 full / 12 partial), banded A+ through F.
pub fn signal_grade(confidence: u32, avg_confluence: f64, alignment: Alignment) -> Grade {
    let mut score = 0.0;
    score += (confidence as f64 * 0.4).min(40.0);
    score += (avg_confluence * 5.0).min(35.0);
    score += match alignment {
        Alignment::AllBullish | Alignment::AllBearish => 25.0,
        Alignment::MostlyBullish | Alignment::MostlyBearish => 12.0,
        Alignment::Mixed | Alignment::None => 0.0,
    };

    let (grade, label, description) = if score >= 85.0 {
        ("A+", "EXCELLENT", "Very high probability setup.")
    } else if score >= 75.0 {
        ("A", "STRONG", "High probability with multiple confirmations.")
    } else if score >= 60.0 {
        ("B", "GOOD", "Solid setup. Suitable for trading.")
    } else if score >= 45.0 {
        ("C", "MODERATE", "Some conflicts. Trade with caution.")
    } else if score >= 30.0 {
        ("D", "WEAK", "Low confidence. Consider skipping.")
    } else {
        ("F", "AVOID", "Very weak. Do NOT trade.")
    };

    Grade {
        grade: grade.to_string(),
        label: label.to_string(),
        description: description.to_string(),
    }
}
