//! Capture group bookkeeping
//!
//! This module tracks capture groups at the three points they matter:
//! - While parsing, [`GroupRegistry`] numbers groups and resolves `\k<name>`
//! - When a generator accepts a tree, [`assign_slots`] writes each
//!   remembering group's 0-based capture slot into the tree, once
//! - During one generation call, [`CaptureTable`] holds the text each group
//!   produced so backreferences can repeat it

use crate::ast::{Body, Node};
use std::collections::HashMap;
use thiserror::Error;

/// Numbers capture groups while a pattern is parsed
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    count: u32,
    names: HashMap<String, u32>,
}

impl GroupRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        GroupRegistry::default()
    }

    /// Register a capture group in opening-parenthesis order and return its
    /// 1-based number
    ///
    /// # Errors
    /// Returns an error if the name is already in use
    pub fn register_group(&mut self, name: Option<String>) -> Result<u32, GroupRegistryError> {
        let number = self.count + 1;
        if let Some(name) = name {
            if self.names.contains_key(&name) {
                return Err(GroupRegistryError::DuplicateGroupName(name));
            }
            self.names.insert(name, number);
        }
        self.count = number;
        Ok(number)
    }

    /// Number of the group called `name`
    pub fn get_by_name(&self, name: &str) -> Option<u32> {
        self.names.get(name).copied()
    }

    /// Total number of capture groups so far
    pub fn group_count(&self) -> usize {
        self.count as usize
    }

    /// Resolve a `\k<name>` backreference
    pub fn validate_backref_name(&self, name: &str) -> Result<u32, GroupRegistryError> {
        self.get_by_name(name)
            .ok_or_else(|| GroupRegistryError::UndefinedBackreference(name.to_string()))
    }
}

/// Errors that can occur in the group registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupRegistryError {
    /// A group name is used more than once
    #[error("duplicate group name: {0}")]
    DuplicateGroupName(String),
    /// A backreference refers to a non-existent group
    #[error("undefined backreference: {0}")]
    UndefinedBackreference(String),
}

/// Number every remembering group in pre-order and return how many there are
///
/// Slots start at 0 and follow opening-parenthesis order, so slot `n`
/// answers the backreference `\{n + 1}`. Groups inside every alternative and
/// inside lookarounds are numbered, whether or not a call ever visits them.
pub fn assign_slots(root: &mut Node) -> usize {
    let mut next = 0;
    number(root, &mut next);
    next
}

fn number(node: &mut Node, next: &mut usize) {
    match node {
        Node::Root(group) | Node::Group(group) => {
            if group.remember {
                group.slot = Some(*next);
                *next += 1;
            } else {
                group.slot = None;
            }
            match &mut group.body {
                Body::Sequence(nodes) => nodes.iter_mut().for_each(|n| number(n, next)),
                Body::Alternatives(options) => options
                    .iter_mut()
                    .flatten()
                    .for_each(|n| number(n, next)),
            }
        }
        Node::Repetition(rep) => number(&mut rep.value, next),
        Node::Position(_) | Node::Set(_) | Node::Reference(_) | Node::Char(_) => {}
    }
}

/// Text captured by each group during one generation call
#[derive(Debug, Clone, Default)]
pub struct CaptureTable {
    slots: Vec<Option<String>>,
}

impl CaptureTable {
    /// A table with `count` unset slots
    pub fn new(count: usize) -> Self {
        CaptureTable {
            slots: vec![None; count],
        }
    }

    /// Store the text a group produced; a repeated group keeps its last pass
    pub fn record(&mut self, slot: usize, text: &str) {
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(text.to_string());
    }

    /// Resolve a 1-based backreference; unset or unknown groups give ""
    pub fn resolve(&self, reference: u32) -> &str {
        (reference as usize)
            .checked_sub(1)
            .and_then(|slot| self.slots.get(slot))
            .and_then(|text| text.as_deref())
            .unwrap_or("")
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Group;

    #[test]
    fn test_register_unnamed_group() {
        let mut registry = GroupRegistry::new();
        let index = registry.register_group(None).unwrap();
        assert_eq!(index, 1);
        assert_eq!(registry.group_count(), 1);
    }

    #[test]
    fn test_register_multiple_groups() {
        let mut registry = GroupRegistry::new();
        let idx1 = registry.register_group(Some("first".to_string())).unwrap();
        let idx2 = registry.register_group(None).unwrap();
        let idx3 = registry.register_group(Some("third".to_string())).unwrap();

        assert_eq!((idx1, idx2, idx3), (1, 2, 3));
        assert_eq!(registry.group_count(), 3);
        assert_eq!(registry.get_by_name("third"), Some(3));
        assert_eq!(registry.get_by_name("first"), Some(1));
        assert_eq!(registry.get_by_name("second"), None);
    }

    #[test]
    fn test_duplicate_name_error() {
        let mut registry = GroupRegistry::new();
        registry.register_group(Some("name".to_string())).unwrap();
        let result = registry.register_group(Some("name".to_string()));
        assert!(matches!(
            result,
            Err(GroupRegistryError::DuplicateGroupName(_))
        ));
        // A rejected group does not take a number
        assert_eq!(registry.group_count(), 1);
    }

    #[test]
    fn test_validate_backref_name() {
        let mut registry = GroupRegistry::new();
        registry.register_group(Some("name".to_string())).unwrap();

        assert_eq!(registry.validate_backref_name("name").unwrap(), 1);
        assert!(matches!(
            registry.validate_backref_name("unknown"),
            Err(GroupRegistryError::UndefinedBackreference(_))
        ));
    }

    fn slot_of(node: &Node) -> Option<usize> {
        match node {
            Node::Group(group) => group.slot,
            _ => None,
        }
    }

    #[test]
    fn test_assign_slots_in_preorder() {
        // (a(b))(?:c)(d)
        let mut root = Node::root(vec![
            Node::group(vec![
                Node::literal('a'),
                Node::group(Node::literals("b")),
            ]),
            Node::non_capturing_group(Node::literals("c")),
            Node::group(Node::literals("d")),
        ]);
        assert_eq!(assign_slots(&mut root), 3);

        let Node::Root(group) = &root else {
            panic!("expected root");
        };
        let Body::Sequence(children) = &group.body else {
            panic!("expected sequence");
        };
        assert_eq!(slot_of(&children[0]), Some(0));
        assert_eq!(slot_of(&children[1]), None);
        assert_eq!(slot_of(&children[2]), Some(2));
        let Node::Group(outer) = &children[0] else {
            panic!("expected group");
        };
        let Body::Sequence(inner) = &outer.body else {
            panic!("expected sequence");
        };
        assert_eq!(slot_of(&inner[1]), Some(1));
    }

    #[test]
    fn test_assign_slots_covers_alternatives_and_repetitions() {
        // (?:(x)|(y))(z)*
        let mut root = Node::root(vec![
            Node::Group(Group::alternatives(vec![
                vec![Node::group(Node::literals("x"))],
                vec![Node::group(Node::literals("y"))],
            ])),
            Node::repetition(Node::group(Node::literals("z")), 0, None),
        ]);
        assert_eq!(assign_slots(&mut root), 3);
    }

    #[test]
    fn test_assign_slots_is_stable() {
        let mut root = Node::root(vec![Node::group(Node::literals("a"))]);
        assert_eq!(assign_slots(&mut root), 1);
        let first = root.clone();
        assert_eq!(assign_slots(&mut root), 1);
        assert_eq!(root, first);
    }

    #[test]
    fn test_capture_table_resolve() {
        let mut table = CaptureTable::new(2);
        assert_eq!(table.resolve(1), "");
        table.record(0, "abc");
        assert_eq!(table.resolve(1), "abc");
        assert_eq!(table.resolve(2), "");
        assert_eq!(table.resolve(0), "");
        assert_eq!(table.resolve(9), "");
    }

    #[test]
    fn test_capture_table_keeps_last_pass() {
        let mut table = CaptureTable::new(1);
        table.record(0, "first");
        table.record(0, "second");
        assert_eq!(table.resolve(1), "second");
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }
}
