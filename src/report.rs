//! Plain-text rendering of an analysis outcome for terminal output.

use crate::chart::chart_rows;
use crate::models::{AnalysisOutcome, AnalysisSuccess};
use crate::recommendations::{content_lines, parse_recommendations, ContentLine};
use std::fmt;

const BAR_WIDTH: usize = 30;

/// Text report for an outcome: a ranked bar chart followed by the skincare
/// plan sections, or a single error line.
pub struct Report<'a>(pub &'a AnalysisOutcome);

pub fn render(outcome: &AnalysisOutcome) -> String {
    Report(outcome).to_string()
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            AnalysisOutcome::Success(success) => write_success(f, success),
            AnalysisOutcome::Failure(failure) => writeln!(f, "Error: {}", failure.error),
        }
    }
}

fn write_success(f: &mut fmt::Formatter<'_>, success: &AnalysisSuccess) -> fmt::Result {
    let rows = chart_rows(&success.predictions);
    let name_width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);

    writeln!(f, "Condition Analysis")?;
    for row in &rows {
        let filled = (row.percent as usize * BAR_WIDTH).div_ceil(100).min(BAR_WIDTH);
        let marker = if row.highlighted { '*' } else { ' ' };
        writeln!(
            f,
            "{} {:<name_width$}  {}{} {:>3}%",
            marker,
            row.name,
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled),
            row.percent,
        )?;
    }

    let sections = parse_recommendations(&success.recommendations);
    if sections.is_empty() {
        return Ok(());
    }

    writeln!(f, "\nYour Skincare Plan")?;
    for section in &sections {
        writeln!(f, "\n[{}]", section.title)?;
        for line in content_lines(&section.content) {
            match line {
                ContentLine::Bullet(item) => writeln!(f, "  - {}", item)?,
                ContentLine::Blank => writeln!(f)?,
                ContentLine::Paragraph(text) => writeln!(f, "  {}", text)?,
            }
        }
    }
    Ok(())
}
