//! Fuzzy string ratios: Ratcliff–Obershelp and the weighted-ratio composite.
//!
//! [`sequence_ratio`] reproduces the classic longest-matching-block ratio
//! (`2·M / (|a| + |b|)` where `M` is the total length of recursively found
//! longest common blocks). [`weighted_ratio`] layers the standard
//! token-sort / token-set / partial-window scorers on top of it, scaled the
//! way the conventional "WRatio" composition scales them.
//!
//! All ratios operate on `char` sequences and return values in `[0.0, 1.0]`.
//!
//! Note: [`weighted_ratio`] is not perfectly commutative — the partial-window
//! scorers slide the shorter string over the longer one, so swapping
//! arguments of unequal length can change the result slightly. This is a
//! property of the weighted-ratio family, accepted here rather than patched.

use std::collections::{BTreeSet, HashMap};

// ---------------------------------------------------------------------------
// Matching blocks (Ratcliff–Obershelp)
// ---------------------------------------------------------------------------

/// `(a_start, b_start, length)` of one matching block.
type Block = (usize, usize, usize);

/// Index of every char position in `b`, positions ascending.
fn char_positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut map: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        map.entry(c).or_default().push(j);
    }
    map
}

/// Longest block of `a[alo..ahi]` matching inside `b[blo..bhi]`.
///
/// Among equally long blocks the one starting earliest in `a` (then earliest
/// in `b`) wins, which keeps the recursion deterministic.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> Block {
    let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);
    // j2len[j] = length of the match ending at a[i], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, &c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(&c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = if j > 0 {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                new_j2len.insert(j, k);
                if k > bestsize {
                    besti = i + 1 - k;
                    bestj = j + 1 - k;
                    bestsize = k;
                }
            }
        }
        j2len = new_j2len;
    }
    (besti, bestj, bestsize)
}

/// All matching blocks between `a` and `b`, sorted by position.
fn matching_blocks(a: &[char], b: &[char]) -> Vec<Block> {
    let b2j = char_positions(b);
    let mut queue = vec![(0usize, a.len(), 0usize, b.len())];
    let mut blocks = Vec::new();

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if k > 0 {
            blocks.push((i, j, k));
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
    }
    blocks.sort_unstable();
    blocks
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = matching_blocks(a, b).iter().map(|&(_, _, k)| k).sum();
    2.0 * matched as f64 / total as f64
}

// ---------------------------------------------------------------------------
// Public ratios
// ---------------------------------------------------------------------------

/// Ratcliff–Obershelp similarity of two strings, in `[0.0, 1.0]`.
///
/// Two empty strings score 1.0; one empty string scores 0.0.
///
/// # Examples
///
/// ```
/// use viet_align::similarity::sequence_ratio;
///
/// assert_eq!(sequence_ratio("abc", "abc"), 1.0);
/// assert_eq!(sequence_ratio("abc", ""), 0.0);
/// assert!(sequence_ratio("hom nay troi dep", "hom nay troi dep qua") > 0.8);
/// ```
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best [`sequence_ratio`] of the shorter string against same-length windows
/// of the longer one, candidate windows chosen from the matching blocks.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return if long.is_empty() { 1.0 } else { 0.0 };
    }

    let mut best = 0.0f64;
    for (i, j, _) in matching_blocks(short, long) {
        let start = j.saturating_sub(i);
        let end = (start + short.len()).min(long.len());
        let score = ratio_chars(short, &long[start..end]);
        if score > best {
            best = score;
        }
    }
    best
}

/// [`sequence_ratio`] over whitespace tokens sorted into a canonical order,
/// making the score insensitive to word reordering.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    sequence_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Token-set ratio: splits both strings into the shared token set and the
/// per-side leftovers, and takes the best pairwise ratio of the re-joined
/// combinations. Tolerant of one side being a superset of the other.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let t1: BTreeSet<&str> = a.split_whitespace().collect();
    let t2: BTreeSet<&str> = b.split_whitespace().collect();

    let sect = join(t1.intersection(&t2));
    let diff1 = join(t1.difference(&t2));
    let diff2 = join(t2.difference(&t1));

    let combined1 = join_nonempty(&sect, &diff1);
    let combined2 = join_nonempty(&sect, &diff2);

    sequence_ratio(&sect, &combined1)
        .max(sequence_ratio(&sect, &combined2))
        .max(sequence_ratio(&combined1, &combined2))
}

/// The standard weighted-ratio composite, in `[0.0, 1.0]`.
///
/// * Lengths within 1.5×: max of the plain ratio and the token
///   sort/set ratios scaled by 0.95.
/// * Otherwise: partial-window ratios join in, scaled by 0.9 (length ratio
///   below 8×) or 0.6 (extreme length mismatch).
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    const UNBASE_SCALE: f64 = 0.95;

    let la = a.chars().count();
    let lb = b.chars().count();
    let len_ratio = la.max(lb) as f64 / la.min(lb) as f64;

    let base = sequence_ratio(a, b);
    let token = token_sort_ratio(a, b).max(token_set_ratio(a, b));

    if len_ratio < 1.5 {
        return base.max(token * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    let partial = partial_ratio(a, b);
    let partial_token = partial_ratio(&sorted_tokens(a), &sorted_tokens(b));

    base.max(partial * partial_scale)
        .max(partial_token * UNBASE_SCALE * partial_scale)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join<'a>(iter: impl Iterator<Item = &'a &'a str>) -> String {
    iter.copied().collect::<Vec<_>>().join(" ")
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- sequence_ratio ------------------------------------------------------

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(sequence_ratio("hôm nay trời đẹp", "hôm nay trời đẹp"), 1.0);
    }

    #[test]
    fn both_empty_score_one_single_empty_zero() {
        assert_eq!(sequence_ratio("", ""), 1.0);
        assert_eq!(sequence_ratio("abc", ""), 0.0);
        assert_eq!(sequence_ratio("", "abc"), 0.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn known_ratio_value() {
        // blocks: "cau be di hoc " (14) + "som" (3) → 2·17 / (17 + 22)
        let r = sequence_ratio("cau be di hoc som", "cau be di hoc rat som.");
        assert!((r - 34.0 / 39.0).abs() < 1e-12, "got {r}");
    }

    #[test]
    fn ratio_is_symmetric() {
        let a = "hom nay troi dep";
        let b = "hom nay troi rat dep";
        assert_eq!(sequence_ratio(a, b), sequence_ratio(b, a));
    }

    #[test]
    fn ratio_stays_in_unit_interval() {
        for (a, b) in [
            ("a", "aaaa"),
            ("xin chào", "tạm biệt"),
            ("một hai ba", "ba hai một"),
        ] {
            let r = sequence_ratio(a, b);
            assert!((0.0..=1.0).contains(&r), "{a:?} vs {b:?} → {r}");
        }
    }

    // --- partial_ratio -------------------------------------------------------

    #[test]
    fn substring_scores_full_partial_ratio() {
        assert_eq!(partial_ratio("troi dep", "hom nay troi dep qua"), 1.0);
    }

    #[test]
    fn partial_ratio_handles_empty() {
        assert_eq!(partial_ratio("", ""), 1.0);
        assert_eq!(partial_ratio("", "abc"), 0.0);
    }

    // --- token ratios --------------------------------------------------------

    #[test]
    fn token_sort_ignores_word_order() {
        assert_eq!(token_sort_ratio("đi học sớm", "sớm đi học"), 1.0);
    }

    #[test]
    fn token_set_tolerates_supersets() {
        let r = token_set_ratio("tôi đi làm", "tôi đi làm hôm nay");
        assert_eq!(r, 1.0);
    }

    // --- weighted_ratio ------------------------------------------------------

    #[test]
    fn weighted_ratio_identical_is_one() {
        assert_eq!(weighted_ratio("tôi đi làm", "tôi đi làm"), 1.0);
    }

    #[test]
    fn weighted_ratio_empty_is_zero() {
        assert_eq!(weighted_ratio("", "abc"), 0.0);
        assert_eq!(weighted_ratio("abc", ""), 0.0);
    }

    #[test]
    fn weighted_ratio_in_unit_interval() {
        for (a, b) in [
            ("tôi đi làm", "hôm nay tôi đi làm rất sớm vì trời đẹp"),
            ("a", "một câu dài hơn rất nhiều so với một ký tự"),
            ("giống hệt", "giống hệt"),
        ] {
            let r = weighted_ratio(a, b);
            assert!((0.0..=1.0).contains(&r), "{a:?} vs {b:?} → {r}");
        }
    }

    /// The partial-window scorers make the composite direction-sensitive.
    /// Pinned as accepted behavior: both directions are valid scores, and
    /// neither leaves the unit interval.
    #[test]
    fn weighted_ratio_asymmetry_is_accepted() {
        let a = "tôi đi";
        let b = "hôm nay tôi đi làm rất sớm vì trời còn đẹp lắm";
        let ab = weighted_ratio(a, b);
        let ba = weighted_ratio(b, a);
        assert!((0.0..=1.0).contains(&ab));
        assert!((0.0..=1.0).contains(&ba));
        // No assertion that ab == ba — symmetry is not part of the contract.
    }
}
