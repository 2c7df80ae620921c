//! Maximal marginal relevance: trade relevance to the query against
//! redundancy with what has already been picked.

use super::vector::cosine_similarity;

/// Select up to `k` candidate indices.
///
/// The first pick is the candidate closest to the query. Each later pick
/// maximises `lambda_mult * sim(query, c) - (1 - lambda_mult) * max sim(c, picked)`.
/// On equal scores the lower index wins.
pub fn maximal_marginal_relevance(
    query: &[f32],
    candidates: &[Vec<f32>],
    k: usize,
    lambda_mult: f32,
) -> Vec<usize> {
    let target = k.min(candidates.len());
    if target == 0 {
        return Vec::new();
    }

    let to_query: Vec<f32> = candidates
        .iter()
        .map(|c| cosine_similarity(query, c))
        .collect();

    let mut first = 0;
    for (i, score) in to_query.iter().enumerate() {
        if *score > to_query[first] {
            first = i;
        }
    }

    let mut selected = vec![first];
    // Highest similarity of each candidate to anything selected so far
    let mut redundancy: Vec<f32> = candidates
        .iter()
        .map(|c| cosine_similarity(c, &candidates[first]))
        .collect();

    while selected.len() < target {
        let mut best: Option<(usize, f32)> = None;

        for (i, query_score) in to_query.iter().enumerate() {
            if selected.contains(&i) {
                continue;
            }
            let score = lambda_mult * query_score - (1.0 - lambda_mult) * redundancy[i];
            if best.is_none_or(|(_, b)| score > b) {
                best = Some((i, score));
            }
        }

        let Some((pick, _)) = best else { break };
        selected.push(pick);

        for (i, c) in candidates.iter().enumerate() {
            let sim = cosine_similarity(c, &candidates[pick]);
            if sim > redundancy[i] {
                redundancy[i] = sim;
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs() {
        assert!(maximal_marginal_relevance(&[1.0, 0.0], &[], 3, 0.5).is_empty());
        assert!(maximal_marginal_relevance(&[1.0, 0.0], &[vec![1.0, 0.0]], 0, 0.5).is_empty());
    }

    #[test]
    fn test_k_capped_at_candidate_count() {
        let candidates = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let picked = maximal_marginal_relevance(&[1.0, 0.0], &candidates, 5, 0.5);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_first_pick_is_most_relevant() {
        let candidates = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.7, 0.7]];
        let picked = maximal_marginal_relevance(&[1.0, 0.0], &candidates, 1, 0.5);
        assert_eq!(picked, vec![1]);
    }

    #[test]
    fn test_pure_relevance_follows_similarity_order() {
        let candidates = vec![vec![1.0, 0.0], vec![0.99, 0.01], vec![0.0, 1.0]];
        let picked = maximal_marginal_relevance(&[1.0, 0.0], &candidates, 3, 1.0);
        assert_eq!(picked, vec![0, 1, 2]);
    }

    #[test]
    fn test_low_lambda_prefers_diverse_candidate() {
        // Candidate 1 is a near duplicate of candidate 0; candidate 2 covers a
        // different direction that is still somewhat relevant.
        let candidates = vec![vec![1.0, 0.0], vec![0.99, 0.01], vec![0.5, 0.5]];
        let picked = maximal_marginal_relevance(&[1.0, 0.0], &candidates, 2, 0.3);
        assert_eq!(picked, vec![0, 2]);
    }

    #[test]
    fn test_ties_keep_earliest_index() {
        let candidates = vec![vec![1.0, 0.0]; 4];
        let picked = maximal_marginal_relevance(&[1.0, 0.0], &candidates, 4, 0.9);
        assert_eq!(picked, vec![0, 1, 2, 3]);
    }
}
