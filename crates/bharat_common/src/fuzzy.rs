//! Approximate string matching under transcription noise.
//!
//! Speech recognition for Hindi drifts a lot between dialects and
//! recording conditions ("लाइट" vs "लाईट", "bharat" vs "barat"), so
//! every keyword test in the engine goes through these helpers rather
//! than exact comparison. Thresholds are supplied by the caller: short
//! command synonyms tolerate more drift (0.6) than longer distinctive
//! words (0.75-0.8).

/// Normalized similarity between two strings in [0, 1].
///
/// Classic sequence ratio: twice the length of the longest common
/// subsequence divided by the combined length. Computed over Unicode
/// scalar values so Devanagari text is measured per character, not
/// per byte.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Two-row LCS table; inputs are short tokens so this stays cheap.
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
        cur[0] = 0;
    }
    let lcs = prev[b.len()];

    (2.0 * lcs as f64) / ((a.len() + b.len()) as f64)
}

/// True if `token` equals one of `targets` exactly, or its similarity
/// ratio to some target reaches `threshold`.
pub fn is_similar(token: &str, targets: &[&str], threshold: f64) -> bool {
    if token.is_empty() {
        return false;
    }
    if targets.contains(&token) {
        return true;
    }
    targets
        .iter()
        .any(|target| similarity_ratio(token, target) >= threshold)
}

/// True if any whitespace-delimited token of `text` is similar to any
/// target at or above `threshold`.
pub fn contains_fuzzy(text: &str, targets: &[&str], threshold: f64) -> bool {
    text.split_whitespace()
        .any(|word| is_similar(word, targets, threshold))
}
