use serde::Serialize;

use crate::types::Category;

use super::weekly::DailyBreakdown;

/// Average daily transport kg above which a suggestion is made.
const TRANSPORT_THRESHOLD: f64 = 5.0;
/// Average daily food kg above which a suggestion is made.
const FOOD_THRESHOLD: f64 = 4.0;

const TRANSPORT_REDUCTION: f64 = 0.30;
const FOOD_REDUCTION: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub message: String,
    /// Estimated daily saving in kg CO₂.
    pub impact: f64,
}

/// Suggestions from average daily transport and food emissions.
pub fn recommendations(avg_transport: f64, avg_food: f64) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if avg_transport > TRANSPORT_THRESHOLD {
        out.push(Recommendation {
            category: Category::Transport,
            message: "Consider carpooling or public transport 2 days this week to reduce emissions by 30%"
                .to_string(),
            impact: avg_transport * TRANSPORT_REDUCTION,
        });
    }

    if avg_food > FOOD_THRESHOLD {
        out.push(Recommendation {
            category: Category::Food,
            message: "Try 2 plant-based meals this week to reduce food emissions by 25%".to_string(),
            impact: avg_food * FOOD_REDUCTION,
        });
    }

    out
}

/// [`recommendations`] with the averages taken over a week of per-category
/// data. Missing days are already zero in the breakdown and count toward
/// the average.
pub fn recommendations_for_week(week: &[DailyBreakdown]) -> Vec<Recommendation> {
    if week.is_empty() {
        return Vec::new();
    }

    let days = week.len() as f64;
    let avg_transport = week.iter().map(|d| d.emissions.transport).sum::<f64>() / days;
    let avg_food = week.iter().map(|d| d.emissions.food).sum::<f64>() / days;
    recommendations(avg_transport, avg_food)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_utils::date;
    use crate::types::CategoryEmissions;

    #[test]
    fn test_thresholds_are_strict() {
        assert!(recommendations(5.0, 4.0).is_empty());

        let recs = recommendations(8.0, 4.0);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].category, Category::Transport);
        assert!((recs[0].impact - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_both_suggestions_in_order() {
        let recs = recommendations(6.0, 10.0);
        let categories: Vec<Category> = recs.iter().map(|r| r.category).collect();
        assert_eq!(categories, vec![Category::Transport, Category::Food]);
        assert!((recs[1].impact - 2.5).abs() < 1e-9);
        assert!(recs[1].message.contains("plant-based"));
    }

    #[test]
    fn test_week_average_includes_empty_days() {
        let mut week: Vec<DailyBreakdown> = (0..7)
            .map(|i| DailyBreakdown {
                date: date(2024, 5, 1 + i),
                emissions: CategoryEmissions::default(),
            })
            .collect();
        // 35 kg of transport on one day averages to exactly 5: no suggestion
        week[6].emissions.transport = 35.0;
        assert!(recommendations_for_week(&week).is_empty());

        week[5].emissions.transport = 7.0;
        let recs = recommendations_for_week(&week);
        assert_eq!(recs.len(), 1);
        assert!((recs[0].impact - 6.0 * 0.3).abs() < 1e-9);

        assert!(recommendations_for_week(&[]).is_empty());
    }
}
