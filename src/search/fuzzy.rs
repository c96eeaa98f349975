//! Fuzzy word matching
//!
//! A term matches a word when it is a substring of the word, or when the
//! edit distance between them falls under a length-scaled threshold.
//! Short terms tolerate only one edit so common short words do not
//! collide; longer terms absorb more OCR noise.

/// Whether `word` matches the search `term`.
///
/// Callers pass pre-lowercased strings, but both inputs are lowercased
/// again here so the function stands on its own.
pub fn matches(word: &str, term: &str) -> bool {
    let word = word.to_lowercase();
    let term = term.to_lowercase();

    if word.contains(&term) {
        return true;
    }

    let distance = levenshtein(&word, &term);

    // Literal threshold tiers keyed on term length. Kept as explicit
    // branches so behavior at lengths 5 and 10 stays exact.
    let threshold = match term.chars().count() {
        0..=5 => 1,
        6..=9 => 2,
        _ => 3,
    };

    distance <= threshold
}

/// Levenshtein edit distance over Unicode scalar values.
///
/// Minimum number of single-character insertions, deletions, and
/// substitutions transforming `a` into `b`. Symmetric in its arguments.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two-row dynamic program: prev holds distances for the previous
    // character of `a`.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
