// Approximate string similarity used to suggest titles when a search
// finds no substring match.
//
// Scores are in `0..=100`. Both inputs are lowercased and stripped of
// punctuation before scoring.

use std::collections::BTreeSet;

/// Minimum score for a title to be offered as a suggestion.
pub const SUGGESTION_THRESHOLD: u8 = 60;

/// How many best-scoring candidates are considered at most.
pub const SUGGESTION_LIMIT: usize = 5;

/// Length of the longest common subsequence of `a` and `b`.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev_row = vec![0usize; b.len() + 1];
    let mut curr_row = vec![0usize; b.len() + 1];

    for a_char in a {
        for (j, b_char) in b.iter().enumerate() {
            curr_row[j + 1] = if a_char == b_char {
                prev_row[j] + 1
            } else {
                prev_row[j + 1].max(curr_row[j])
            };
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}

/// Normalized indel similarity: `200 * lcs / (len_a + len_b)`.
fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

fn normalize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best `ratio` of the shorter string against every equally long window
/// of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    long.windows(short.len())
        .map(|window| ratio_chars(&short, window))
        .fold(0.0, f64::max)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort_with(a: &str, b: &str, scorer: fn(&str, &str) -> f64) -> f64 {
    scorer(&sorted_tokens(a), &sorted_tokens(b))
}

/// Compares the shared tokens against each side's shared-plus-remaining
/// tokens and keeps the best of the three pairings.
fn token_set_with(a: &str, b: &str, scorer: fn(&str, &str) -> f64) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let sect = tokens_a.intersection(&tokens_b).copied().collect::<Vec<_>>().join(" ");
    let combine = |diff: Vec<&str>| {
        let rest = diff.join(" ");
        format!("{} {}", sect, rest).trim().to_string()
    };
    let a_to_b = combine(tokens_a.difference(&tokens_b).copied().collect());
    let b_to_a = combine(tokens_b.difference(&tokens_a).copied().collect());

    scorer(&sect, &a_to_b)
        .max(scorer(&sect, &b_to_a))
        .max(scorer(&a_to_b, &b_to_a))
}

/// `ratio` after sorting the whitespace-separated tokens of both inputs.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    token_sort_with(a, b, ratio)
}

pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    token_set_with(a, b, ratio)
}

pub fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    token_sort_with(a, b, partial_ratio)
}

pub fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    token_set_with(a, b, partial_ratio)
}

/// Weighted similarity of `query` and `candidate`.
///
/// Strings of similar length take the best of the plain ratio and the
/// token-sort and token-set ratios (the token scores discounted by 0.95).
/// When one string is at least 1.5 times longer, the partial variants
/// replace the token scores and are further discounted by 0.9, or by 0.6
/// beyond a length ratio of 8. `partial_ratio` only aligns full-length
/// windows, so scores can differ slightly from libraries that also align
/// at the string edges.
pub fn score(query: &str, candidate: &str) -> u8 {
    const UNBASE_SCALE: f64 = 0.95;

    let a = normalize(query);
    let b = normalize(candidate);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (la, lb) = (a.chars().count() as f64, b.chars().count() as f64);
    let len_ratio = la.max(lb) / la.min(lb);
    let base = ratio(&a, &b);

    let best = if len_ratio < 1.5 {
        base.max(token_sort_ratio(&a, &b) * UNBASE_SCALE)
            .max(token_set_ratio(&a, &b) * UNBASE_SCALE)
    } else {
        let scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
        base.max(partial_ratio(&a, &b) * scale)
            .max(partial_token_sort_ratio(&a, &b) * UNBASE_SCALE * scale)
            .max(partial_token_set_ratio(&a, &b) * UNBASE_SCALE * scale)
    };

    best.round().clamp(0.0, 100.0) as u8
}

/// Candidates scoring at least `SUGGESTION_THRESHOLD`, best first, at
/// most `SUGGESTION_LIMIT` of them. Equal scores keep candidate order.
pub fn suggestions<'a, I>(query: &str, candidates: I) -> Vec<(&'a str, u8)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(&str, u8)> = candidates
        .into_iter()
        .map(|c| (c, score(query, c)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(SUGGESTION_LIMIT);
    scored.retain(|&(_, s)| s >= SUGGESTION_THRESHOLD);
    scored
}
