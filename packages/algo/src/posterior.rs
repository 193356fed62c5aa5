//! Posterior Accumulator
//!
//! Folds weighted observations into a Beta(alpha, beta) posterior.
//!
//! Core principles:
//! - Uniform prior Beta(1, 1)
//! - A response of weight w adds w to alpha and (1 - w) to beta
//! - After N responses: alpha = 1 + sum(w), beta = 1 + N - sum(w), in any order

use crate::types::PosteriorState;

/// Fold one weighted observation into the posterior
pub fn update(state: PosteriorState, weight: f64) -> PosteriorState {
    debug_assert!(
        (0.0..=1.0).contains(&weight),
        "response weight {weight} outside [0, 1]"
    );

    PosteriorState {
        alpha: state.alpha + weight,
        beta: state.beta + (1.0 - weight),
    }
}

/// Fold a sequence of weights, equivalent to repeated [`update`]
pub fn fold<I>(state: PosteriorState, weights: I) -> PosteriorState
where
    I: IntoIterator<Item = f64>,
{
    weights.into_iter().fold(state, update)
}

/// Back to the uniform prior
pub fn reset() -> PosteriorState {
    PosteriorState::PRIOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::weight;
    use crate::types::ResponseKind;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_single_know_sentence() {
        let state = update(PosteriorState::PRIOR, weight(ResponseKind::KnowSentence));
        assert_eq!(state, PosteriorState { alpha: 2.0, beta: 1.0 });
    }

    #[test]
    fn test_single_dont_know() {
        let state = update(PosteriorState::PRIOR, weight(ResponseKind::DontKnow));
        assert_eq!(state, PosteriorState { alpha: 1.0, beta: 2.0 });
    }

    #[test]
    fn test_fold_matches_closed_form() {
        let weights = [1.0, 2.0 / 3.0, 0.0, 1.0 / 3.0, 1.0, 2.0 / 3.0];
        let n = weights.len() as f64;
        let sum: f64 = weights.iter().sum();

        let state = fold(PosteriorState::PRIOR, weights);
        assert!((state.alpha - (1.0 + sum)).abs() < TOLERANCE);
        assert!((state.beta - (1.0 + n - sum)).abs() < TOLERANCE);
    }

    #[test]
    fn test_fold_is_order_independent() {
        let forward = [1.0, 1.0 / 3.0, 0.0, 2.0 / 3.0];
        let mut backward = forward;
        backward.reverse();

        let a = fold(PosteriorState::PRIOR, forward);
        let b = fold(PosteriorState::PRIOR, backward);
        assert!((a.alpha - b.alpha).abs() < TOLERANCE);
        assert!((a.beta - b.beta).abs() < TOLERANCE);
    }

    #[test]
    fn test_monotonic_growth() {
        let mut state = PosteriorState::PRIOR;
        for kind in ResponseKind::ALL {
            let next = update(state, weight(kind));
            assert!(next.alpha >= state.alpha);
            assert!(next.beta >= state.beta);
            assert!(next.alpha >= 1.0 && next.beta >= 1.0);
            state = next;
        }
    }

    #[test]
    fn test_many_updates_stay_stable() {
        let n = 10_000usize;
        let weights = (0..n).map(|i| weight(ResponseKind::ALL[i % 4]));
        let state = fold(PosteriorState::PRIOR, weights);

        // 每轮四种响应的权重和恰好为 2
        let expected_sum = (n / 4) as f64 * 2.0;
        assert!(state.alpha.is_finite() && state.beta.is_finite());
        assert!((state.alpha - (1.0 + expected_sum)).abs() < 1e-6);
        assert!((state.beta - (1.0 + n as f64 - expected_sum)).abs() < 1e-6);
        assert!((state.evidence() - n as f64).abs() < 1e-6);
    }

    #[test]
    fn test_reset_returns_prior() {
        let state = fold(PosteriorState::PRIOR, [1.0, 1.0, 0.0]);
        assert!(!state.is_prior());
        assert!(reset().is_prior());
    }
}
