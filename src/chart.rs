use crate::models::Prediction;

/// One bar of the condition chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRow {
    pub name: String,
    /// Probability as a rounded whole percentage.
    pub percent: u32,
    /// Set on the first (highest) row only.
    pub highlighted: bool,
}

/// Ranks predictions for display, highest percentage first.
///
/// Underscores in condition labels become spaces. Equal percentages keep
/// their upstream order.
pub fn chart_rows(predictions: &[Prediction]) -> Vec<ChartRow> {
    let mut rows: Vec<ChartRow> = predictions
        .iter()
        .map(|p| ChartRow {
            name: p.condition.replace('_', " "),
            percent: (p.probability.clamp(0.0, 1.0) * 100.0).round() as u32,
            highlighted: false,
        })
        .collect();

    rows.sort_by(|a, b| b.percent.cmp(&a.percent));
    if let Some(first) = rows.first_mut() {
        first.highlighted = true;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(condition: &str, probability: f64) -> Prediction {
        Prediction {
            condition: condition.to_string(),
            probability,
        }
    }

    #[test]
    fn test_rows_are_ranked_and_rounded() {
        let rows = chart_rows(&[
            prediction("nv", 0.404),
            prediction("mel", 0.896),
            prediction("bcc", 0.012),
        ]);
        let summary: Vec<(&str, u32, bool)> = rows
            .iter()
            .map(|r| (r.name.as_str(), r.percent, r.highlighted))
            .collect();
        assert_eq!(
            summary,
            vec![("mel", 90, true), ("nv", 40, false), ("bcc", 1, false)]
        );
    }

    #[test]
    fn test_underscores_become_spaces() {
        let rows = chart_rows(&[prediction("seborrheic_keratosis", 0.5)]);
        assert_eq!(rows[0].name, "seborrheic keratosis");
    }

    #[test]
    fn test_ties_keep_upstream_order() {
        let rows = chart_rows(&[prediction("a", 0.5), prediction("b", 0.5)]);
        assert_eq!(rows[0].name, "a");
        assert_eq!(rows[1].name, "b");
    }

    #[test]
    fn test_empty_predictions() {
        assert!(chart_rows(&[]).is_empty());
    }
}
