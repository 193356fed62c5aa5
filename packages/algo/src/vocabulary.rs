//! Vocabulary Estimator
//!
//! Rough vocabulary size from response tallies, independent of the posterior:
//! 150 words per `KnowSentence`, 100 per `KnowWord`, 50 per `Uncertain`.

use crate::types::{
    ResponseCounts, VOCAB_PER_KNOW_SENTENCE, VOCAB_PER_KNOW_WORD, VOCAB_PER_UNCERTAIN,
};

pub fn estimated_vocab(counts: &ResponseCounts) -> u64 {
    counts
        .know_sentence
        .saturating_mul(VOCAB_PER_KNOW_SENTENCE)
        .saturating_add(counts.know_word.saturating_mul(VOCAB_PER_KNOW_WORD))
        .saturating_add(counts.uncertain.saturating_mul(VOCAB_PER_UNCERTAIN))
}
