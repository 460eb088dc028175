//! Skill Extractor: turns raw document text into a sorted set of canonical skill names.
//!
//! Whole-word variant matching first; the fuzzy pass over canonical names only runs
//! when the whole-word pass finds nothing (OCR noise, heavy paraphrasing).

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::skills::vocabulary::SkillVocabulary;

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{4})\s*-\s*(\d{4}|present|current|now)")
        .expect("date range pattern is valid")
});

/// Tunable constants of the extraction heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractorSettings {
    /// Minimum partial similarity (0–100, exclusive) for a fuzzy hit.
    pub fuzzy_threshold: f64,
    /// Years credited per `YYYY - YYYY|present` range found.
    pub years_per_date_range: u32,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 90.0,
            years_per_date_range: 2,
        }
    }
}

#[derive(Debug)]
pub struct SkillExtractor {
    vocabulary: SkillVocabulary,
    settings: ExtractorSettings,
}

impl SkillExtractor {
    pub fn new(vocabulary: SkillVocabulary, settings: ExtractorSettings) -> Self {
        Self {
            vocabulary,
            settings,
        }
    }

    pub fn settings(&self) -> ExtractorSettings {
        self.settings
    }

    /// Returns canonical skill names found in `text`, sorted and deduplicated.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let lowered = text.to_lowercase();

        let mut found: BTreeSet<&str> = self.vocabulary.whole_word_hits(&lowered).collect();

        if found.is_empty() {
            found = self
                .vocabulary
                .skills()
                .filter(|skill| {
                    partial_ratio(&skill.to_lowercase(), &lowered) > self.settings.fuzzy_threshold
                })
                .collect();
            debug!(matched = found.len(), "Fuzzy skill fallback used");
        } else {
            debug!(matched = found.len(), "Whole-word skill match");
        }

        found.into_iter().map(String::from).collect()
    }

    /// Crude experience estimate: a fixed number of years per date range.
    pub fn extract_experience_years(&self, text: &str) -> u32 {
        let ranges = u32::try_from(DATE_RANGE_RE.find_iter(text).count()).unwrap_or(u32::MAX);
        ranges.saturating_mul(self.settings.years_per_date_range)
    }
}

/// Best Indel similarity (0–100) between the shorter argument and its alignments
/// against the longer one.
///
/// Full-length windows are scored along with the windows clipped at either edge of
/// the longer string, so a skill cut off at the end of the text still counts. Each
/// window scores `2·LCS / (len_a + len_b)`; an exact substring scores 100.
pub fn partial_ratio(needle: &str, haystack: &str) -> f64 {
    if needle.is_empty() || haystack.is_empty() {
        return 0.0;
    }
    let (short, long) = if needle.chars().count() <= haystack.chars().count() {
        (needle, haystack)
    } else {
        (haystack, needle)
    };
    if long.contains(short) {
        return 100.0;
    }

    let pattern = LcsPattern::new(short);
    let long: Vec<char> = long.chars().collect();
    let (width, len) = (pattern.len(), long.len());
    let mut best = 0.0_f64;
    let mut score = |window: &[char]| {
        let lcs = pattern.lcs_len(window);
        let similarity = (2 * lcs) as f64 / (width + window.len()) as f64;
        if similarity > best {
            best = similarity;
        }
    };

    // A window that does not end on a pattern character can be shifted left without
    // losing a match, so only windows ending (or, at the right edge, starting) on one count.
    for end in 1..width {
        if pattern.contains(long[end - 1]) {
            score(&long[..end]);
        }
    }
    for start in 0..=(len - width) {
        if pattern.contains(long[start + width - 1]) {
            score(&long[start..start + width]);
        }
    }
    for start in (len - width + 1)..len {
        if pattern.contains(long[start]) {
            score(&long[start..]);
        }
    }

    best * 100.0
}

/// Longest-common-subsequence matcher for one pattern.
///
/// Patterns of up to 64 characters use the bit-parallel recurrence (one word
/// operation per text character); longer ones fall back to the quadratic table.
struct LcsPattern {
    chars: Vec<char>,
    /// Bit `i` of `masks[c]` is set when `chars[i] == c`. Empty for long patterns.
    masks: HashMap<char, u64>,
}

impl LcsPattern {
    fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let mut masks = HashMap::new();
        if chars.len() <= u64::BITS as usize {
            for (i, c) in chars.iter().enumerate() {
                *masks.entry(*c).or_insert(0u64) |= 1u64 << i;
            }
        }
        Self { chars, masks }
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn contains(&self, c: char) -> bool {
        if self.masks.is_empty() {
            self.chars.contains(&c)
        } else {
            self.masks.contains_key(&c)
        }
    }

    fn lcs_len(&self, text: &[char]) -> usize {
        if self.masks.is_empty() {
            return lcs_len_table(&self.chars, text);
        }
        let mut row = u64::MAX;
        for c in text {
            let matches = row & self.masks.get(c).copied().unwrap_or(0);
            row = row.wrapping_add(matches) | row.wrapping_sub(matches);
        }
        let width = self.chars.len();
        let mask = if width == u64::BITS as usize {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        (!row & mask).count_ones() as usize
    }
}

fn lcs_len_table(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            cur[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}
