//! Sets of code points
//!
//! A [`CharRange`] is a sorted list of disjoint, non-adjacent closed
//! intervals. Set operations rewrite the list in place and keep it
//! canonical, so [`CharRange::len`] and [`CharRange::get`] can work on
//! interval boundaries instead of individual code points.

use std::fmt;

/// An inclusive span of code points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    /// Create a span; the bounds are swapped if given out of order
    pub fn new(start: u32, end: u32) -> Self {
        if start <= end {
            Span { start, end }
        } else {
            Span {
                start: end,
                end: start,
            }
        }
    }

    /// First code point
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last code point
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of code points in the span
    pub fn len(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }

    /// A span always holds at least one code point
    pub fn is_empty(&self) -> bool {
        false
    }

    fn is_contiguous(&self, other: &Span) -> bool {
        u64::from(self.start.max(other.start)) <= u64::from(self.end.min(other.end)) + 1
    }
}

/// A set of code points
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharRange {
    spans: Vec<Span>,
    // Code points before each span, for binary search in `get`
    offsets: Vec<u64>,
}

impl CharRange {
    /// The empty set
    pub fn new() -> Self {
        CharRange::default()
    }

    /// A set holding one code point
    pub fn single(code: u32) -> Self {
        CharRange::span(code, code)
    }

    /// A set holding `start..=end`
    pub fn span(start: u32, end: u32) -> Self {
        let span = Span::new(start, end);
        CharRange {
            spans: vec![span],
            offsets: vec![0],
        }
    }

    /// Printable ASCII, `[32, 126]`
    pub fn printable_ascii() -> Self {
        CharRange::span(0x20, 0x7e)
    }

    /// The intervals, sorted and disjoint
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Number of code points in the set
    pub fn len(&self) -> u64 {
        match (self.offsets.last(), self.spans.last()) {
            (Some(offset), Some(span)) => offset + span.len(),
            _ => 0,
        }
    }

    /// Whether the set holds no code points
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Whether `code` is in the set
    pub fn contains(&self, code: u32) -> bool {
        let i = self.spans.partition_point(|s| s.end < code);
        self.spans.get(i).is_some_and(|s| s.start <= code)
    }

    /// The `index`-th code point in ascending order
    pub fn get(&self, index: u64) -> Option<u32> {
        if index >= self.len() {
            return None;
        }
        let i = self.offsets.partition_point(|&offset| offset <= index) - 1;
        let offset = u32::try_from(index - self.offsets[i]).ok()?;
        Some(self.spans[i].start + offset)
    }

    /// Add every code point of `other`
    pub fn union(&mut self, other: &CharRange) {
        self.spans.extend_from_slice(&other.spans);
        self.canonicalize();
    }

    /// Keep only code points also in `other`
    pub fn intersect(&mut self, other: &CharRange) {
        let mut result = Vec::new();
        let (mut a, mut b) = (0, 0);
        while a < self.spans.len() && b < other.spans.len() {
            let (x, y) = (self.spans[a], other.spans[b]);
            let start = x.start.max(y.start);
            let end = x.end.min(y.end);
            if start <= end {
                result.push(Span { start, end });
            }
            if x.end < y.end {
                a += 1;
            } else {
                b += 1;
            }
        }
        self.spans = result;
        self.index_spans();
    }

    /// Remove every code point of `other`
    pub fn difference(&mut self, other: &CharRange) {
        let mut result = Vec::new();
        let mut b = 0;
        for &span in &self.spans {
            let mut rest = Some(span);
            // Skip removals that end before this span
            while b < other.spans.len() && other.spans[b].end < span.start {
                b += 1;
            }
            let mut k = b;
            while let (Some(current), Some(cut)) = (rest, other.spans.get(k)) {
                if cut.start > current.end {
                    break;
                }
                if cut.start > current.start {
                    result.push(Span {
                        start: current.start,
                        end: cut.start - 1,
                    });
                }
                rest = if cut.end < current.end {
                    Some(Span {
                        start: cut.end + 1,
                        end: current.end,
                    })
                } else {
                    None
                };
                k += 1;
            }
            result.extend(rest);
        }
        self.spans = result;
        self.index_spans();
    }

    /// Add the other-case counterpart of every ASCII letter in the set
    pub fn fold_ascii_case(&mut self) {
        let mut folded = CharRange::new();
        for span in &self.spans {
            for (lo, hi, shift) in [(0x41, 0x5a, 0x20_i64), (0x61, 0x7a, -0x20)] {
                let start = span.start.max(lo);
                let end = span.end.min(hi);
                if start <= end {
                    let moved = |c: u32| (i64::from(c) + shift) as u32;
                    folded.spans.push(Span::new(moved(start), moved(end)));
                }
            }
        }
        self.union(&folded);
    }

    /// Iterate over every code point in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.spans.iter().flat_map(|s| s.start..=s.end)
    }

    /// Sort, then merge overlapping and adjacent spans
    fn canonicalize(&mut self) {
        self.spans.sort_unstable();
        let mut merged: Vec<Span> = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            match merged.last_mut() {
                Some(last) if last.is_contiguous(&span) => {
                    last.end = last.end.max(span.end);
                }
                _ => merged.push(span),
            }
        }
        self.spans = merged;
        self.index_spans();
    }

    fn index_spans(&mut self) {
        self.offsets.clear();
        let mut total = 0;
        for span in &self.spans {
            self.offsets.push(total);
            total += span.len();
        }
    }
}

impl FromIterator<Span> for CharRange {
    fn from_iter<I: IntoIterator<Item = Span>>(iter: I) -> Self {
        let mut range = CharRange {
            spans: iter.into_iter().collect(),
            offsets: Vec::new(),
        };
        range.canonicalize();
        range
    }
}

impl fmt::Display for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if span.start == span.end {
                write!(f, "{}", span.start)?;
            } else {
                write!(f, "{}-{}", span.start, span.end)?;
            }
        }
        write!(f, "]")
    }
}

/// The other-case counterpart of an ASCII letter
pub fn flip_ascii_case(code: u32) -> Option<u32> {
    match code {
        0x41..=0x5a => Some(code + 0x20),
        0x61..=0x7a => Some(code - 0x20),
        _ => None,
    }
}
