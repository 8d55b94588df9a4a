//! Typo suggestions (Levenshtein distance) and rule id style checks.

/// Closest candidate to `input`, or `None` when nothing is within half the
/// longer string's length. Exact (case-insensitive) hits are not suggestions.
pub(crate) fn closest<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let input = input.to_lowercase();
    let (best, dist) = candidates
        .iter()
        .map(|&c| (c, levenshtein(&input, &c.to_lowercase())))
        .min_by_key(|&(_, d)| d)?;

    let max_len = input.chars().count().max(best.chars().count());
    if dist > 0 && dist <= max_len / 2 {
        Some(best)
    } else {
        None
    }
}

/// Levenshtein edit distance between two strings, counted in chars.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Rule ids are lowercase ASCII words joined by `_` or `-`, e.g. `test_tongue_pale`.
pub(crate) fn is_rule_id_style(s: &str) -> bool {
    let mut prev_sep = true;
    for ch in s.chars() {
        match ch {
            '_' | '-' if prev_sep => return false,
            '_' | '-' => prev_sep = true,
            c if c.is_ascii_lowercase() || c.is_ascii_digit() => prev_sep = false,
            _ => return false,
        }
    }
    !prev_sep
}
