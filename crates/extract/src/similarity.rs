use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("static regex"));

/// Lowercase, turn punctuation into spaces, trim.
pub fn preprocess(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_WORD.replace_all(&lowered, " ").trim().to_string()
}

/// Indel similarity of two strings on a 0..=100 scale: `2 * LCS / (len_a + len_b)`,
/// rounded half to even.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    let matched = 2 * longest_common_subsequence(&a, &b);

    (100.0 * (matched as f64 / total as f64)).round_ties_even() as u8
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Word-order and duplicate insensitive similarity of two names.
///
/// Both names are reduced to sorted sets of words. The shared words are
/// compared against each side's full set, so a name that is a word subset of
/// the other scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let a = preprocess(a);
    let b = preprocess(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let sect = join(tokens_a.intersection(&tokens_b));
    let diff_a = join(tokens_a.difference(&tokens_b));
    let diff_b = join(tokens_b.difference(&tokens_a));

    let combined_a = format!("{} {}", sect, diff_a).trim().to_string();
    let combined_b = format!("{} {}", sect, diff_b).trim().to_string();

    [
        ratio(&sect, &combined_a),
        ratio(&sect, &combined_b),
        ratio(&combined_a, &combined_b),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}
