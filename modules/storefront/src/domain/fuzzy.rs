//! Approximate string matching for the search fallback.
//!
//! Scores are the Ratcliff/Obershelp "gestalt" ratio `2*M / T`, where `M` is
//! the number of characters in the matching blocks found by recursively
//! taking the longest common substring, and `T` the combined length of both
//! strings. Matching is case-sensitive and works on Unicode scalar values.
//!
//! Results agree with `difflib.get_close_matches`, including its cheap upper
//! bound checks and the popular-character heuristic for long search terms.

use std::collections::HashMap;

/// Terms at least this long drop very frequent characters from the index.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Similarity matcher with the search term pre-indexed.
pub struct Matcher {
    b: Vec<char>,
    /// Positions of each indexed character in `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
    /// Character counts of `b`, for `quick_ratio`.
    full_bcount: HashMap<char, usize>,
}

impl Matcher {
    pub fn new(term: &str) -> Self {
        let b: Vec<char> = term.chars().collect();
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            b2j.retain(|_, idxs| idxs.len() <= ntest);
        }

        let mut full_bcount = HashMap::new();
        for c in &b {
            *full_bcount.entry(*c).or_insert(0) += 1;
        }

        Self {
            b,
            b2j,
            full_bcount,
        }
    }

    /// Upper bound on `ratio` from lengths alone.
    pub fn real_quick_ratio(&self, a: &[char]) -> f64 {
        let (la, lb) = (a.len(), self.b.len());
        calculate_ratio(la.min(lb), la + lb)
    }

    /// Upper bound on `ratio` from character multisets.
    pub fn quick_ratio(&self, a: &[char]) -> f64 {
        let mut avail: HashMap<char, isize> = HashMap::new();
        let mut matches = 0;
        for c in a {
            let left = avail
                .entry(*c)
                .or_insert_with(|| self.full_bcount.get(c).copied().unwrap_or(0) as isize);
            *left -= 1;
            if *left >= 0 {
                matches += 1;
            }
        }
        calculate_ratio(matches, a.len() + self.b.len())
    }

    /// Similarity of `a` against the term, in `[0, 1]`.
    pub fn ratio(&self, a: &[char]) -> f64 {
        let matches: usize = self.matching_blocks(a).iter().map(|&(_, _, k)| k).sum();
        calculate_ratio(matches, a.len() + self.b.len())
    }

    fn matching_blocks(&self, a: &[char]) -> Vec<(usize, usize, usize)> {
        let mut blocks = Vec::new();
        let mut queue = vec![(0, a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            blocks.push((i, j, k));
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        blocks
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given window,
    /// preferring the earliest start in `a`, then in `b`.
    fn find_longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = &self.b;
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        // j2len[j] = length of the match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(js) = self.b2j.get(c) {
                for &j in js {
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
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Characters dropped from the index can still extend a match.
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / length as f64
}

/// The best "good enough" matches for `term` among `candidates`.
///
/// Candidates scoring below `cutoff` are ignored. At most `n` results are
/// returned, best first; equal scores are ordered by the candidate text,
/// descending. Duplicate candidates may appear more than once.
pub fn close_matches<'a, I>(term: &str, candidates: I, n: usize, cutoff: f64) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if n == 0 {
        return Vec::new();
    }

    let matcher = Matcher::new(term);
    let mut scored: Vec<(f64, &str)> = Vec::new();
    for candidate in candidates {
        let a: Vec<char> = candidate.chars().collect();
        if matcher.real_quick_ratio(&a) >= cutoff && matcher.quick_ratio(&a) >= cutoff {
            let score = matcher.ratio(&a);
            if score >= cutoff {
                scored.push((score, candidate));
            }
        }
    }

    scored.sort_by(|x, y| y.0.total_cmp(&x.0).then_with(|| y.1.cmp(x.1)));
    scored.truncate(n);
    scored.into_iter().map(|(_, s)| s.to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(a: &str, b: &str) -> f64 {
        let chars: Vec<char> = a.chars().collect();
        Matcher::new(b).ratio(&chars)
    }

    #[test]
    fn ratio_matches_gestalt_scores() {
        assert!((ratio("abcd", "bcde") - 0.75).abs() < 1e-12);
        assert!((ratio("apple", "appel") - 0.8).abs() < 1e-12);
        assert!((ratio("Hammers", "Hammer") - 12.0 / 13.0).abs() < 1e-12);
        assert!((ratio("Gadget", "Wigdet") - 0.5).abs() < 1e-12);
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("x", "y"), 0.0);
    }

    #[test]
    fn ratio_is_case_sensitive() {
        assert!((ratio("hammer", "Hammer") - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn close_matches_orders_by_score() {
        let got = close_matches("appel", ["ape", "apple", "peach", "puppy"], 3, 0.5);
        assert_eq!(got, vec!["apple", "ape"]);
    }

    #[test]
    fn close_matches_caps_results_and_breaks_ties_by_text() {
        let candidates = [
            "Hammer",
            "hammer",
            "Hamper",
            "Wrench",
            "Screwdriver",
            "Hammock",
            "Ham",
            "Hammers",
        ];
        let got = close_matches("Hammer", candidates, 5, 0.5);
        assert_eq!(got, vec!["Hammer", "Hammers", "hammer", "Hamper", "Ham"]);
    }

    #[test]
    fn close_matches_includes_exact_cutoff() {
        let got = close_matches("Wigdet", ["Widget", "Gadget", "Gizmo", ""], 5, 0.5);
        assert_eq!(got, vec!["Widget", "Gadget"]);
    }

    #[test]
    fn close_matches_keeps_duplicates() {
        let got = close_matches("aaa", ["aaa", "aaa", "aab"], 2, 0.5);
        assert_eq!(got, vec!["aaa", "aaa"]);
    }

    #[test]
    fn close_matches_with_nothing_similar() {
        assert!(close_matches("nonexistent-term", ["Widget", "Gadget"], 5, 0.5).is_empty());
        assert!(close_matches("x", Vec::<&str>::new(), 5, 0.5).is_empty());
    }

    #[test]
    fn long_terms_ignore_popular_characters_in_index() {
        let term = "ab".repeat(150);
        let candidate = format!("{}{}", "ba".repeat(120), "c".repeat(10));
        assert_eq!(ratio(&candidate, &term), 0.0);
    }
}
