use std::fmt::{self, Display, Formatter};

/// Levenshtein distance over Unicode scalar values.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // single row of the dynamic programming matrix
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}

/// `1 - distance / max(len)` between the case-folded inputs, in `[0, 1]`.
///
/// Two empty strings are identical.
#[must_use]
pub fn normalized_edit_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let similarity = 1.0 - levenshtein_distance(&a, &b) as f64 / longest as f64;
    similarity
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimilarityBucket {
    Low,
    Medium,
    High,
}

impl SimilarityBucket {
    #[must_use]
    pub fn of(similarity: f64) -> Self {
        if similarity < 0.33 {
            Self::Low
        } else if similarity < 0.66 {
            Self::Medium
        } else {
            Self::High
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// Lexical similarity as stored on a dataset row: a bucket or the raw score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimilaritySignal {
    Bucket(SimilarityBucket),
    Score(f64),
}

impl SimilaritySignal {
    #[must_use]
    pub fn new(similarity: f64, binned: bool) -> Self {
        if binned {
            Self::Bucket(SimilarityBucket::of(similarity))
        } else {
            Self::Score(similarity)
        }
    }
}

impl Display for SimilaritySignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bucket(bucket) => f.write_str(bucket.as_str()),
            Self::Score(score) => write!(f, "{score}"),
        }
    }
}
