//! String generation over a token tree
//!
//! A [`Generator`] owns a token tree plus its configuration and random
//! source. Every call makes one top-down walk of the tree. The walk keeps
//! its own cursor, capture table and output buffer, so the tree is only
//! read during generation.
//!
//! # Example
//! ```
//! use regen_core::Generator;
//!
//! let mut generator = Generator::new("^[a-c]{3}-\\d{2}$").unwrap().seed(7);
//! let sample = generator.generate_valid().unwrap();
//! assert_eq!(sample.len(), 6);
//! ```

use tracing::{debug, trace};

use crate::ast::{Body, CharSet, ClassItem, Group, Node, Repetition};
use crate::config::{Flags, GeneratorConfig};
use crate::error::{ConfigError, GenerateError, Result};
use crate::groups::{CaptureTable, assign_slots};
use crate::parser::parse;
use crate::random::{DefaultRand, RandInt, coin, draw};
use crate::range::{CharRange, flip_ascii_case};
use crate::selection::{CorruptionPlan, InvalidGroups};

/// Generates strings that match, or deliberately fail, a pattern
#[derive(Debug, Clone)]
pub struct Generator<R = DefaultRand> {
    tree: Node,
    config: GeneratorConfig,
    plan: CorruptionPlan,
    capture_count: usize,
    rand: R,
}

impl Generator<DefaultRand> {
    /// Parse a pattern with no flags
    pub fn new(pattern: &str) -> Result<Self> {
        Self::with_config(pattern, GeneratorConfig::default())
    }

    /// Parse a pattern with JavaScript style flag characters, e.g. `"i"`
    pub fn with_flags(pattern: &str, flags: &str) -> Result<Self> {
        Self::with_config(pattern, GeneratorConfig::with_flags(Flags::parse(flags)?))
    }

    /// Parse a pattern with a full configuration
    pub fn with_config(pattern: &str, config: GeneratorConfig) -> Result<Self> {
        let tree = parse(pattern)?;
        Self::build(tree, config, DefaultRand::default())
    }

    /// Use an existing token tree; it must be a [`Node::Root`]
    pub fn from_tree(tree: Node, flags: Flags) -> Result<Self> {
        Self::build(tree, GeneratorConfig::with_flags(flags), DefaultRand::default())
    }
}

#[cfg(feature = "regex")]
impl TryFrom<&regex::Regex> for Generator<DefaultRand> {
    type Error = crate::error::RegenError;

    /// Mirrors a leading `(?i)`, `(?m)` or `(?im)` as generator flags
    fn try_from(re: &regex::Regex) -> Result<Self> {
        let (flags, rest) = Flags::split_inline(re.as_str());
        Self::from_tree(parse(rest)?, flags)
    }
}

impl<R: RandInt> Generator<R> {
    fn build(mut tree: Node, config: GeneratorConfig, rand: R) -> Result<Self> {
        if !matches!(tree, Node::Root(_)) {
            return Err(ConfigError::NotARoot(tree.kind_name()).into());
        }
        let capture_count = assign_slots(&mut tree);
        let plan = CorruptionPlan::analyze(&tree);
        debug!(
            pattern = %tree,
            group_size = plan.group_size(),
            capture_count,
            corruptible = ?plan.corruptible_slots(),
            "built generator"
        );
        Ok(Generator {
            tree,
            config,
            plan,
            capture_count,
            rand,
        })
    }

    /// Extra repetitions allowed past `min` for unbounded repetitions
    pub fn max_repeat(mut self, max_repeat: u32) -> Self {
        self.config.max_repeat = max_repeat;
        self
    }

    /// Universe for negated classes and class intersection
    pub fn default_range(mut self, range: CharRange) -> Self {
        self.config.default_range = range;
        self
    }

    /// Emit letters in either case
    pub fn ignore_case(mut self, yes: bool) -> Self {
        self.config.flags.ignore_case = yes;
        self
    }

    /// Stored only; anchors emit nothing either way
    pub fn multiline(mut self, yes: bool) -> Self {
        self.config.flags.multiline = yes;
        self
    }

    /// Replace the random source
    pub fn rand_int<S: RandInt>(self, rand: S) -> Generator<S> {
        Generator {
            tree: self.tree,
            config: self.config,
            plan: self.plan,
            capture_count: self.capture_count,
            rand,
        }
    }

    /// Use a reproducible random source
    pub fn seed(self, seed: u64) -> Generator<DefaultRand> {
        self.rand_int(DefaultRand::seeded(seed))
    }

    /// The token tree, with capture slots filled in
    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// Current configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Number of direct root slots, the bound for explicit invalid groups
    pub fn group_size(&self) -> usize {
        self.plan.group_size()
    }

    /// Number of capturing groups
    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// Root slots that automatic invalid selection guarantees to corrupt from
    pub fn corruptible_slots(&self) -> Vec<usize> {
        self.plan.corruptible_slots()
    }

    /// A string that matches the pattern, lookaround aside
    pub fn generate_valid(&mut self) -> Result<String> {
        self.run(&InvalidGroups::none())
    }

    /// A string that fails the pattern, corrupting randomly chosen slots
    pub fn generate_invalid(&mut self) -> Result<String> {
        let groups = self.plan.pick(&mut self.rand)?;
        self.run(&groups)
    }

    /// A string with exactly the given root slots corrupted
    ///
    /// Duplicates are ignored. An empty set falls back to
    /// [`generate_invalid`](Self::generate_invalid).
    pub fn generate_invalid_groups<I>(&mut self, groups: I) -> Result<String>
    where
        I: IntoIterator<Item = usize>,
    {
        let groups = self.plan.resolve_explicit(groups)?;
        if groups.is_empty() {
            return self.generate_invalid();
        }
        self.run(&groups)
    }

    fn run(&mut self, invalid: &InvalidGroups) -> Result<String> {
        let mut walk = Walk {
            config: &self.config,
            rand: &mut self.rand,
            invalid,
            captures: CaptureTable::new(self.capture_count),
            cursor: 0,
            out: String::new(),
        };
        walk.node(&self.tree)?;
        Ok(walk.out)
    }
}

/// State of one generation call
struct Walk<'a, R: ?Sized> {
    config: &'a GeneratorConfig,
    rand: &'a mut R,
    invalid: &'a InvalidGroups,
    captures: CaptureTable,
    cursor: usize,
    out: String,
}

impl<R: RandInt + ?Sized> Walk<'_, R> {
    fn flagged(&self) -> bool {
        self.invalid.contains(self.cursor)
    }

    fn node(&mut self, node: &Node) -> std::result::Result<(), GenerateError> {
        match node {
            Node::Root(group) | Node::Group(group) => self.group(group),
            Node::Position(_) => Ok(()),
            Node::Set(set) => self.set(set),
            Node::Repetition(rep) => self.repetition(rep),
            Node::Reference(n) => {
                self.out.push_str(self.captures.resolve(*n));
                Ok(())
            }
            Node::Char(code) => self.char(*code),
        }
    }

    fn group(&mut self, group: &Group) -> std::result::Result<(), GenerateError> {
        if group.lookaround.is_some() {
            return Ok(());
        }
        let start = self.out.len();
        let children: &[Node] = match &group.body {
            Body::Sequence(nodes) => nodes.as_slice(),
            Body::Alternatives(options) if options.is_empty() => &[],
            Body::Alternatives(options) => {
                let last = u32::try_from(options.len() - 1).unwrap_or(u32::MAX);
                options[draw(self.rand, 0, last)? as usize].as_slice()
            }
        };
        for child in children {
            self.node(child)?;
            self.cursor += 1;
        }
        if let Some(slot) = group.slot {
            self.captures.record(slot, &self.out[start..]);
        }
        Ok(())
    }

    fn set(&mut self, set: &CharSet) -> std::result::Result<(), GenerateError> {
        let range = self.expand(set);
        if range.is_empty() {
            return Ok(());
        }
        let last = u32::try_from(range.len() - 1).unwrap_or(u32::MAX);
        let index = draw(self.rand, 0, last)?;
        let mut code = range
            .get(u64::from(index))
            .ok_or(GenerateError::InvalidCodePoint(index))?;
        if self.config.flags.ignore_case {
            let flippable = |c: &u32| !range.contains(*c) && self.config.default_range.contains(*c);
            if let Some(other) = flip_ascii_case(code).filter(flippable) {
                if coin(self.rand)? {
                    code = other;
                }
            }
        }
        self.push(code)
    }

    /// Reduce a class to the code points it may emit
    fn expand(&self, set: &CharSet) -> CharRange {
        let mut union = CharRange::new();
        for item in &set.items {
            let mut part = match item {
                ClassItem::Char(code) => CharRange::single(*code),
                ClassItem::Range(start, end) => CharRange::span(*start, *end),
                ClassItem::Set(inner) => self.expand(inner),
            };
            if self.config.flags.ignore_case {
                part.fold_ascii_case();
            }
            union.union(&part);
        }
        let mut range = self.config.default_range.clone();
        if set.negated {
            range.difference(&union);
        } else {
            range.intersect(&union);
        }
        range
    }

    fn repetition(&mut self, rep: &Repetition) -> std::result::Result<(), GenerateError> {
        let (min, max) = if self.flagged() {
            self.corrupt_bounds(rep)?
        } else {
            (rep.min, rep.max)
        };
        let high = max.unwrap_or_else(|| min.saturating_add(self.config.max_repeat));
        let count = draw(self.rand, min, high)?;
        for _ in 0..count {
            self.node(&rep.value)?;
        }
        Ok(())
    }

    /// Bounds outside `[min, max]` for this call only
    fn corrupt_bounds(
        &mut self,
        rep: &Repetition,
    ) -> std::result::Result<(u32, Option<u32>), GenerateError> {
        let mut outside = Vec::with_capacity(2);
        if rep.min > 0 {
            outside.push((0, Some(rep.min - 1)));
        }
        if let Some(above) = rep.max.and_then(|max| max.checked_add(1)) {
            outside.push((above, None));
        }
        if outside.is_empty() {
            if self.invalid.must_corrupt(self.cursor) {
                return Err(GenerateError::UnboundedRepetition { min: rep.min });
            }
            trace!(cursor = self.cursor, "repetition has no invalid count, left valid");
            return Ok((rep.min, rep.max));
        }
        let last = outside.len() as u32 - 1;
        let bounds = outside[draw(self.rand, 0, last)? as usize];
        trace!(
            cursor = self.cursor,
            min = rep.min,
            max = ?rep.max,
            new_min = bounds.0,
            new_max = ?bounds.1,
            "corrupted repetition"
        );
        Ok(bounds)
    }

    fn char(&mut self, code: u32) -> std::result::Result<(), GenerateError> {
        if self.flagged() {
            let mut universe = CharRange::printable_ascii();
            universe.difference(&CharRange::single(code));
            if self.config.flags.ignore_case {
                if let Some(other) = flip_ascii_case(code) {
                    universe.difference(&CharRange::single(other));
                }
            }
            if universe.is_empty() {
                return Err(GenerateError::ExhaustedUniverse(code));
            }
            let last = u32::try_from(universe.len() - 1).unwrap_or(u32::MAX);
            let index = draw(self.rand, 0, last)?;
            let replacement = universe
                .get(u64::from(index))
                .ok_or(GenerateError::ExhaustedUniverse(code))?;
            trace!(cursor = self.cursor, code, replacement, "corrupted literal");
            return self.push(replacement);
        }
        if self.config.flags.ignore_case && coin(self.rand)? {
            return self.push(flip_ascii_case(code).unwrap_or(code));
        }
        self.push(code)
    }

    fn push(&mut self, code: u32) -> std::result::Result<(), GenerateError> {
        let c = char::from_u32(code).ok_or(GenerateError::InvalidCodePoint(code))?;
        self.out.push(c);
        Ok(())
    }
}
