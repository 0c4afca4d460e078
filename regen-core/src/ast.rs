//! Token tree for regex patterns
//!
//! This module defines the tree the generator walks. It is produced by the
//! [`parser`](crate::parser) but can also be built by hand with the smart
//! constructors on [`Node`]. Supports:
//! - Literals and character classes (single chars, ranges, nested classes)
//! - Repetitions with inclusive bounds, optionally unbounded
//! - Capturing, non-capturing and named groups, with alternation
//! - Lookahead and lookbehind groups (kept in the tree, generated as empty)
//! - Anchors and word boundaries
//! - Numbered backreferences

use std::fmt;

/// A node in the token tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// The top of a tree; never remembers and is never a lookaround
    Root(Group),

    /// A parenthesised group
    Group(Group),

    /// A zero-width assertion
    Position(Anchor),

    /// A character class
    Set(CharSet),

    /// A repeated child
    Repetition(Repetition),

    /// Backreference to a remembered group, 1-based
    Reference(u32),

    /// A single literal code point
    Char(u32),
}

/// Shared payload of [`Node::Root`] and [`Node::Group`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    /// The children, either one fixed sequence or a set of alternatives
    pub body: Body,
    /// Whether the group captures its text
    pub remember: bool,
    /// Name of a named capture group
    pub name: Option<String>,
    /// Capture slot, filled in by [`assign_slots`](crate::groups::assign_slots)
    pub slot: Option<usize>,
    /// Lookaround marker
    pub lookaround: Option<Lookaround>,
}

/// Children of a group
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A fixed sequence (concatenation)
    Sequence(Vec<Node>),
    /// Alternatives (e.g., a|b|c), each one a sequence
    Alternatives(Vec<Vec<Node>>),
}

/// Lookaround kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookaround {
    /// `(?=...)`
    FollowedBy,
    /// `(?!...)`
    NotFollowedBy,
    /// `(?<=...)`
    PrecededBy,
    /// `(?<!...)`
    NotPrecededBy,
}

/// Zero-width assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `^`
    Start,
    /// `$`
    End,
    /// `\b`
    WordBoundary,
    /// `\B`
    NonWordBoundary,
}

/// A repetition with inclusive bounds
#[derive(Debug, Clone, PartialEq)]
pub struct Repetition {
    /// Lower bound
    pub min: u32,
    /// Upper bound; `None` is unbounded
    pub max: Option<u32>,
    /// The repeated node
    pub value: Box<Node>,
}

/// A character class `[abc]`, `[^abc]`, `[a-z\d]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CharSet {
    /// Whether the class is negated `[^...]`
    pub negated: bool,
    /// The members of the class
    pub items: Vec<ClassItem>,
}

/// A member of a character class
#[derive(Debug, Clone, PartialEq)]
pub enum ClassItem {
    /// A single code point
    Char(u32),
    /// An inclusive range of code points
    Range(u32, u32),
    /// A nested class, e.g. `\d` inside `[...]`
    Set(CharSet),
}

impl Default for Body {
    fn default() -> Self {
        Body::Sequence(Vec::new())
    }
}

impl Body {
    /// Number of direct children; for alternatives, the longest alternative
    pub fn width(&self) -> usize {
        match self {
            Body::Sequence(nodes) => nodes.len(),
            Body::Alternatives(options) => options.iter().map(Vec::len).max().unwrap_or(0),
        }
    }
}

impl Group {
    /// A group holding one fixed sequence
    pub fn sequence(nodes: Vec<Node>) -> Self {
        Group {
            body: Body::Sequence(nodes),
            ..Group::default()
        }
    }

    /// A group holding alternatives; a single alternative collapses to a sequence
    pub fn alternatives(mut options: Vec<Vec<Node>>) -> Self {
        if options.len() == 1 {
            return Group::sequence(options.remove(0));
        }
        Group {
            body: Body::Alternatives(options),
            ..Group::default()
        }
    }

    /// Mark the group as capturing
    pub fn remembered(mut self) -> Self {
        self.remember = true;
        self
    }

    /// Mark the group as a named capture
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.remember = true;
        self.name = Some(name.into());
        self
    }

    /// Mark the group as a lookaround
    pub fn looking(mut self, lookaround: Lookaround) -> Self {
        self.lookaround = Some(lookaround);
        self
    }
}

impl CharSet {
    /// A non-negated class
    pub fn of(items: Vec<ClassItem>) -> Self {
        CharSet {
            negated: false,
            items,
        }
    }

    /// A negated class
    pub fn not(items: Vec<ClassItem>) -> Self {
        CharSet {
            negated: true,
            items,
        }
    }

    /// `\d`
    pub fn digit() -> Self {
        CharSet::of(vec![ClassItem::Range('0' as u32, '9' as u32)])
    }

    /// `\w`
    pub fn word() -> Self {
        CharSet::of(vec![
            ClassItem::Char('_' as u32),
            ClassItem::Range('a' as u32, 'z' as u32),
            ClassItem::Range('A' as u32, 'Z' as u32),
            ClassItem::Range('0' as u32, '9' as u32),
        ])
    }

    /// `\s`, the ECMAScript whitespace set
    pub fn whitespace() -> Self {
        CharSet::of(vec![
            ClassItem::Char(0x20),
            ClassItem::Range(0x09, 0x0d),
            ClassItem::Char(0xa0),
            ClassItem::Char(0x1680),
            ClassItem::Range(0x2000, 0x200a),
            ClassItem::Range(0x2028, 0x2029),
            ClassItem::Char(0x202f),
            ClassItem::Char(0x205f),
            ClassItem::Char(0x3000),
            ClassItem::Char(0xfeff),
        ])
    }

    /// `.`, everything but line terminators
    pub fn any() -> Self {
        CharSet::not(vec![
            ClassItem::Char('\n' as u32),
            ClassItem::Char('\r' as u32),
            ClassItem::Char(0x2028),
            ClassItem::Char(0x2029),
        ])
    }

    /// The same class with negation flipped
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

impl Node {
    /// Create a root from a sequence
    pub fn root(nodes: Vec<Node>) -> Self {
        Node::Root(Group::sequence(nodes))
    }

    /// Create a literal from a `char`
    pub fn literal(c: char) -> Self {
        Node::Char(c as u32)
    }

    /// Create a sequence of literals from a string
    pub fn literals(s: &str) -> Vec<Self> {
        s.chars().map(Node::literal).collect()
    }

    /// Create a capturing group from a sequence
    pub fn group(nodes: Vec<Node>) -> Self {
        Node::Group(Group::sequence(nodes).remembered())
    }

    /// Create a non-capturing group from a sequence
    pub fn non_capturing_group(nodes: Vec<Node>) -> Self {
        Node::Group(Group::sequence(nodes))
    }

    /// Create a character class node
    pub fn set(set: CharSet) -> Self {
        Node::Set(set)
    }

    /// Create a repetition; `max` of `None` is unbounded
    pub fn repetition(value: Node, min: u32, max: Option<u32>) -> Self {
        Node::Repetition(Repetition {
            min,
            max,
            value: Box::new(value),
        })
    }

    /// Human readable name of the node kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Root(_) => "root",
            Node::Group(_) => "group",
            Node::Position(_) => "position",
            Node::Set(_) => "set",
            Node::Repetition(_) => "repetition",
            Node::Reference(_) => "reference",
            Node::Char(_) => "char",
        }
    }

    /// Convert the tree back to a pattern string
    pub fn to_regex_string(&self) -> String {
        match self {
            Node::Root(group) => group.body_string(),
            Node::Group(group) => {
                let opener = match (group.lookaround, &group.name) {
                    (Some(Lookaround::FollowedBy), _) => "(?=".to_string(),
                    (Some(Lookaround::NotFollowedBy), _) => "(?!".to_string(),
                    (Some(Lookaround::PrecededBy), _) => "(?<=".to_string(),
                    (Some(Lookaround::NotPrecededBy), _) => "(?<!".to_string(),
                    (None, Some(name)) => format!("(?<{}>", name),
                    (None, None) if group.remember => "(".to_string(),
                    (None, None) => "(?:".to_string(),
                };
                format!("{}{})", opener, group.body_string())
            }
            Node::Position(anchor) => anchor.to_string(),
            Node::Set(set) => set.to_regex_string(),
            Node::Repetition(rep) => {
                let inner = rep.value.to_regex_string();
                let needs_parens = match rep.value.as_ref() {
                    Node::Char(_) | Node::Set(_) | Node::Group(_) | Node::Reference(_) => false,
                    Node::Root(_) | Node::Position(_) | Node::Repetition(_) => true,
                };
                let inner = if needs_parens {
                    format!("(?:{})", inner)
                } else {
                    inner
                };
                format!("{}{}", inner, rep.quantifier_string())
            }
            Node::Reference(n) => format!("\\{}", n),
            Node::Char(code) => escape_code(*code, false),
        }
    }
}

impl Group {
    fn body_string(&self) -> String {
        let seq = |nodes: &[Node]| nodes.iter().map(Node::to_regex_string).collect::<String>();
        match &self.body {
            Body::Sequence(nodes) => seq(nodes),
            Body::Alternatives(options) => {
                let parts: Vec<_> = options.iter().map(|o| seq(o)).collect();
                parts.join("|")
            }
        }
    }
}

impl Repetition {
    fn quantifier_string(&self) -> String {
        match (self.min, self.max) {
            (0, None) => "*".to_string(),
            (1, None) => "+".to_string(),
            (0, Some(1)) => "?".to_string(),
            (n, None) => format!("{{{},}}", n),
            (n, Some(m)) if n == m => format!("{{{}}}", n),
            (n, Some(m)) => format!("{{{},{}}}", n, m),
        }
    }
}

impl CharSet {
    fn shorthand(&self) -> Option<&'static str> {
        [
            (CharSet::digit(), "\\d", "\\D"),
            (CharSet::word(), "\\w", "\\W"),
            (CharSet::whitespace(), "\\s", "\\S"),
        ]
        .into_iter()
        .find(|(set, _, _)| set.items == self.items)
        .map(|(_, plain, negated)| if self.negated { negated } else { plain })
    }

    fn to_regex_string(&self) -> String {
        if *self == CharSet::any() {
            return ".".to_string();
        }
        let mut result = String::new();
        result.push('[');
        if self.negated {
            result.push('^');
        }
        for item in &self.items {
            match item {
                ClassItem::Char(c) => result.push_str(&escape_code(*c, true)),
                ClassItem::Range(start, end) => {
                    result.push_str(&escape_code(*start, true));
                    result.push('-');
                    result.push_str(&escape_code(*end, true));
                }
                ClassItem::Set(inner) => match inner.shorthand() {
                    Some(shorthand) => result.push_str(shorthand),
                    None => {
                        let inner = inner.to_regex_string();
                        let bare = inner
                            .strip_prefix('[')
                            .and_then(|s| s.strip_suffix(']'))
                            .unwrap_or(&inner);
                        result.push_str(bare);
                    }
                },
            }
        }
        result.push(']');
        result
    }
}

fn escape_code(code: u32, in_class: bool) -> String {
    const SPECIAL: &str = "\\^$.|?*+()[]{}/";
    match char::from_u32(code) {
        Some('\n') => "\\n".to_string(),
        Some('\r') => "\\r".to_string(),
        Some('\t') => "\\t".to_string(),
        Some('-') if in_class => "\\-".to_string(),
        Some(c) if SPECIAL.contains(c) => format!("\\{}", c),
        Some(c) if !c.is_control() => c.to_string(),
        _ if code <= 0xff => format!("\\x{:02x}", code),
        _ => format!("\\u{{{:x}}}", code),
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Start => write!(f, "^"),
            Anchor::End => write!(f, "$"),
            Anchor::WordBoundary => write!(f, "\\b"),
            Anchor::NonWordBoundary => write!(f, "\\B"),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_regex_string())
    }
}
