//! Small helpers shared by the engine.

use std::cmp;

/// Find the Levenshtein distance between two strings
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b = b.chars().collect::<Vec<_>>();
    if a.is_empty() {
        return b.len();
    }

    let mut column = (0..=b.len()).collect::<Vec<_>>();
    for (i, ac) in a.chars().enumerate() {
        let mut diagonal = column[0];
        column[0] = i + 1;
        for (j, bc) in b.iter().enumerate() {
            let above = column[j + 1];
            column[j + 1] = if ac == *bc {
                diagonal
            } else {
                cmp::min(cmp::min(diagonal, above), column[j]) + 1
            };
            diagonal = above;
        }
    }
    column[b.len()]
}

/// Find the best match for a name among `candidates`, used for "did you mean ...?" messages.
///
/// A case insensitive match wins, otherwise the closest candidate within a third of the
/// name's length (at least one edit).
pub fn find_best_match_for_name<'a>(
    candidates: impl Iterator<Item = &'a str>,
    lookup: &str,
) -> Option<&'a str> {
    let max_dist = cmp::max(lookup.chars().count(), 3) / 3;
    let mut best: Option<(&'a str, usize)> = None;

    for candidate in candidates {
        if candidate.to_lowercase() == lookup.to_lowercase() {
            return Some(candidate);
        }
        let dist = levenshtein_distance(lookup, candidate);
        if dist <= max_dist && best.map_or(true, |(_, d)| dist < d) {
            best = Some((candidate, dist));
        }
    }
    best.map(|(candidate, _)| candidate)
}
