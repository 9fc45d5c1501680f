//! Derived insights over the aggregate means.

use crate::analysis::aggregator::round1;
use crate::models::{AggregateMeans, CompetencyInsight, Insights};

/// Derives the highlighted facts from the aggregate means.
///
/// Only called with actual data — the "no data" branch is handled by the
/// caller before this point.
///
/// The top competency is the first strict maximum in the fixed Q3..Q7
/// scan order: later questions only take over with a strictly greater
/// score, so ties always report the earlier question's label.
pub fn derive_insights(means: &AggregateMeans) -> Insights {
    let confidence_growth = round1(means.q8_post - means.q8_pre);

    let competencies = means.competencies();
    let (mut top_name, mut top_score) = competencies[0];
    for &(name, score) in &competencies[1..] {
        if score > top_score {
            top_name = name;
            top_score = score;
        }
    }

    Insights {
        confidence_growth,
        top_competency: CompetencyInsight {
            name: top_name.to_string(),
            score: top_score,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn means(q3: f64, q4: f64, q5: f64, q6: f64, q7: f64, pre: f64, post: f64) -> AggregateMeans {
        AggregateMeans {
            q3,
            q4,
            q5,
            q6,
            q7,
            q8_pre: pre,
            q8_post: post,
            q10: 4.0,
            q12: 4.0,
            q13: 4.0,
        }
    }

    #[test]
    fn test_tie_resolves_to_first_in_scan_order() {
        let insights = derive_insights(&means(4.0, 4.0, 3.0, 3.0, 3.0, 5.0, 8.0));
        assert_eq!(insights.top_competency.name, "角色任務認知");
        assert_eq!(insights.top_competency.score, 4.0);
    }

    #[test]
    fn test_later_question_wins_only_when_strictly_greater() {
        let insights = derive_insights(&means(4.0, 4.1, 3.0, 4.1, 3.0, 5.0, 8.0));
        assert_eq!(insights.top_competency.name, "劇本理解力");
        assert_eq!(insights.top_competency.score, 4.1);
    }

    #[test]
    fn test_negative_growth_is_not_clamped() {
        let insights = derive_insights(&means(4.0, 4.0, 4.0, 4.0, 4.0, 6.0, 5.0));
        assert_eq!(insights.confidence_growth, -1.0);
    }

    #[test]
    fn test_growth_and_top_for_single_perfect_respondent() {
        // Means from one record: q3=5, q4=4, q5=4, q6=5, q7=4, pre=5, post=9.
        // q3 and q6 tie at 5.0; q3 wins the scan.
        let insights = derive_insights(&means(5.0, 4.0, 4.0, 5.0, 4.0, 5.0, 9.0));
        assert_eq!(insights.confidence_growth, 4.0);
        assert_eq!(insights.top_competency.name, "角色任務認知");
        assert_eq!(insights.top_competency.score, 5.0);
    }
}
