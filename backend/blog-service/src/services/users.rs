/// Follow suggestions
///
/// Candidates come from two sources: accounts followed by the people the
/// user follows (friends of friends), then the most-followed accounts as
/// backfill. Accounts the user already follows are dropped, order within
/// each source is preserved, and the merged list is capped.
use std::collections::HashSet;
use uuid::Uuid;

/// Maximum number of suggestions returned to a client.
pub const SUGGESTION_LIMIT: usize = 12;

pub fn merge_suggestion_candidates(
    following: &[Uuid],
    friends_of_friends: Vec<Uuid>,
    popular: Vec<Uuid>,
    cap: usize,
) -> Vec<Uuid> {
    let already_following: HashSet<&Uuid> = following.iter().collect();
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for id in friends_of_friends.into_iter().chain(popular) {
        if already_following.contains(&id) {
            continue;
        }
        if seen.insert(id) {
            merged.push(id);
        }
        if merged.len() == cap {
            break;
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn friends_of_friends_rank_before_popular() {
        let fof = ids(2);
        let popular = ids(2);

        let merged =
            merge_suggestion_candidates(&[], fof.clone(), popular.clone(), SUGGESTION_LIMIT);
        assert_eq!(merged, vec![fof[0], fof[1], popular[0], popular[1]]);
    }

    #[test]
    fn already_followed_accounts_are_dropped() {
        let fof = ids(3);
        let following = vec![fof[1]];

        let merged = merge_suggestion_candidates(&following, fof.clone(), vec![], SUGGESTION_LIMIT);
        assert_eq!(merged, vec![fof[0], fof[2]]);
    }

    #[test]
    fn duplicates_across_sources_appear_once() {
        let shared = Uuid::new_v4();
        let merged = merge_suggestion_candidates(
            &[],
            vec![shared],
            vec![shared, Uuid::new_v4()],
            SUGGESTION_LIMIT,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], shared);
    }

    #[test]
    fn result_is_capped() {
        let merged = merge_suggestion_candidates(&[], ids(20), ids(20), SUGGESTION_LIMIT);
        assert_eq!(merged.len(), SUGGESTION_LIMIT);
    }
}
