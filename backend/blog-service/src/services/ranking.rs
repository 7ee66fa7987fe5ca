/// Composite popularity score for the "top posts" listing
///
/// The ordering itself happens in SQL (`db::post_repo::top_posts`) so that
/// OFFSET/LIMIT pagination stays consistent; the weights are bound into the
/// query from `RankingConfig` and this function is the same formula for
/// in-process use and tests.
use crate::config::RankingConfig;

/// score = avg_rating * w_r + feedback_count * w_f + comment_count * w_c + view_count * w_v
pub fn composite_score(
    config: &RankingConfig,
    avg_rating: f64,
    feedback_count: i64,
    comment_count: i64,
    view_count: i64,
) -> f64 {
    avg_rating * config.rating_weight
        + feedback_count as f64 * config.feedback_weight
        + comment_count as f64 * config.comment_weight
        + view_count as f64 * config.view_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highly_rated_post_outranks_heavily_commented_post() {
        let config = RankingConfig::default();

        // One five-star rating, nothing else.
        let rated = composite_score(&config, 5.0, 1, 0, 0);
        // Ten comments, nothing else.
        let commented = composite_score(&config, 0.0, 0, 10, 0);

        assert_eq!(rated, 2.8);
        assert_eq!(commented, 1.0);
        assert!(rated > commented);
    }

    #[test]
    fn post_without_feedback_scores_on_activity_alone() {
        let config = RankingConfig::default();
        let score = composite_score(&config, 0.0, 0, 3, 40);
        assert_eq!(score, 3.0 * 0.1 + 40.0 * 0.1);
    }

    #[test]
    fn weights_are_configurable() {
        let config = RankingConfig {
            rating_weight: 1.0,
            feedback_weight: 0.0,
            comment_weight: 0.0,
            view_weight: 0.0,
        };
        assert_eq!(composite_score(&config, 4.5, 100, 100, 100), 4.5);
    }
}
