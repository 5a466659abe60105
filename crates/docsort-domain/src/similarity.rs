//! Composite similarity between normalized company names
//!
//! ```text
//! score = 0.6 * sequence + 0.3 * token_overlap + 0.1 * subset_bonus
//! ```
//!
//! - **sequence**: matching-blocks ratio `2*M / (len(a) + len(b))` over characters
//! - **token_overlap**: Jaccard index of the whitespace-separated token sets
//! - **subset_bonus**: 1.0 when one token set contains the other
//!
//! The score is symmetric and an identical pair always scores exactly 1.0.

use crate::normalize::NormalizedKey;
use std::collections::{BTreeSet, HashMap};

/// A similarity value in `[0.0, 1.0]`
pub type SimilarityScore = f64;

/// Weight of the character-sequence ratio
pub const SEQUENCE_WEIGHT: f64 = 0.6;

/// Weight of the token-set overlap
pub const TOKEN_WEIGHT: f64 = 0.3;

/// Weight of the token-subset bonus
pub const SUBSET_WEIGHT: f64 = 0.1;

/// Default match threshold
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.75;

/// Component scores behind a composite similarity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityBreakdown {
    /// Character-level matching-blocks ratio
    pub sequence: f64,
    /// Token-set Jaccard index
    pub token_overlap: f64,
    /// 1.0 if one token set contains the other
    pub subset_bonus: f64,
    /// Weighted blend of the three, clamped to [0, 1]
    pub composite: SimilarityScore,
}

impl SimilarityBreakdown {
    /// Whether the composite score reaches `threshold`
    pub fn is_match(&self, threshold: f64) -> bool {
        self.composite >= threshold
    }
}

/// Composite similarity of two normalized keys
///
/// # Examples
///
/// ```
/// use docsort_domain::{normalize, similarity};
///
/// let a = normalize("City of Kent Utility Billing").key;
/// let b = normalize("City of Kent - Utility Billing").key;
/// assert!(similarity(&a, &b) >= 0.75);
///
/// let c = normalize("Wells Fargo").key;
/// let d = normalize("Bank of America").key;
/// assert!(similarity(&c, &d) < 0.75);
/// ```
pub fn similarity(a: &NormalizedKey, b: &NormalizedKey) -> SimilarityScore {
    score(a, b).composite
}

/// Composite similarity with its components
pub fn score(a: &NormalizedKey, b: &NormalizedKey) -> SimilarityBreakdown {
    score_str(a.as_str(), b.as_str())
}

fn score_str(a: &str, b: &str) -> SimilarityBreakdown {
    if a == b {
        let bonus = if a.split_whitespace().next().is_some() { 1.0 } else { 0.0 };
        return SimilarityBreakdown {
            sequence: 1.0,
            token_overlap: bonus,
            subset_bonus: bonus,
            composite: 1.0,
        };
    }

    let sequence = sequence_similarity(a, b);
    let token_overlap = token_overlap(a, b);
    let subset_bonus = subset_bonus(a, b);
    let composite = (SEQUENCE_WEIGHT * sequence
        + TOKEN_WEIGHT * token_overlap
        + SUBSET_WEIGHT * subset_bonus)
        .clamp(0.0, 1.0);

    SimilarityBreakdown {
        sequence,
        token_overlap,
        subset_bonus,
        composite,
    }
}

/// Whether a threshold is usable (finite and within `[0, 1]`)
pub fn validate_threshold(threshold: f64) -> Result<f64, String> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(format!(
            "similarity threshold {} is outside [0.0, 1.0]",
            threshold
        ))
    }
}

/// Character-level matching-blocks ratio in `[0, 1]`
///
/// Matching blocks are found greedily: take the longest common substring,
/// then recurse on the pieces to its left and to its right. The pair is
/// put in a fixed order first so the result does not depend on argument
/// order.
pub fn sequence_similarity(a: &str, b: &str) -> f64 {
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

/// Jaccard index of the token sets; 0 if either side has no tokens
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let common = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    common as f64 / union as f64
}

/// 1.0 if all tokens of one name appear in the other ("Target" vs "Target Stores")
pub fn subset_bonus(a: &str, b: &str) -> f64 {
    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    if ta.is_subset(&tb) || tb.is_subset(&ta) {
        1.0
    } else {
        0.0
    }
}

/// Total length of the greedy matching blocks between `a` and `b`
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`
///
/// Returns `(i, j, k)` with `a[i..i+k] == b[j..j+k]`. Among blocks of equal
/// length the one starting earliest in `a` (then in `b`) wins.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    // j2len[j] = length of the match ending at a[i-1], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        j2len = next;
    }

    (best_i, best_j, best_k)
}
