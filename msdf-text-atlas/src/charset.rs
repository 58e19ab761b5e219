//! Character set selection from configured Unicode ranges.

use std::collections::BTreeSet;

use msdf_text_config::CharsetRange;

/// Deduplicated set of characters to rasterize, iterated in code point order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Charset {
    chars: BTreeSet<char>,
}

impl Charset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every valid character covered by `ranges`. Ranges may
    /// overlap; surrogates and code points above U+10FFFF are skipped.
    pub fn from_ranges(ranges: &[CharsetRange]) -> Self {
        let mut chars = BTreeSet::new();
        for range in ranges {
            if range.is_empty() {
                continue;
            }
            let end = range.end.min(char::MAX as u32);
            chars.extend((range.start..=end).filter_map(char::from_u32));
        }
        Self { chars }
    }

    /// Returns true when `ch` was not present yet
    pub fn insert(&mut self, ch: char) -> bool {
        self.chars.insert(ch)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }
}

impl FromIterator<char> for Charset {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}
