//! Response Classifier
//!
//! Maps a discrete self-report onto a success weight in [0, 1]:
//!
//! | kind           | weight |
//! |----------------|--------|
//! | `KnowSentence` | 1      |
//! | `KnowWord`     | 2/3    |
//! | `Uncertain`    | 1/3    |
//! | `DontKnow`     | 0      |

use crate::types::ResponseKind;

/// Success weight credited for one response
pub fn weight(kind: ResponseKind) -> f64 {
    match kind {
        ResponseKind::KnowSentence => 1.0,
        ResponseKind::KnowWord => 2.0 / 3.0,
        ResponseKind::Uncertain => 1.0 / 3.0,
        ResponseKind::DontKnow => 0.0,
    }
}
