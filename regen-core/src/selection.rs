//! Choosing which cursor slots an invalid call corrupts
//!
//! The cursor counts children of every group as a call walks the tree, so a
//! root child and the first node inside a nested group can share a value.
//! [`CorruptionPlan`] replays that walk once, without randomness, to learn
//! which values are certain to land on something corruption changes. The
//! replay stops where the walk stops being predictable: at an alternation,
//! or after a repetition that repeats a group.

use std::collections::BTreeSet;

use tracing::debug;

use crate::ast::{Body, Group, Node};
use crate::error::{GenerateError, ValidationError};
use crate::random::{RandInt, coin, draw};

/// What a tree offers to invalid generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorruptionPlan {
    group_size: usize,
    corruptible: BTreeSet<usize>,
    degenerate: BTreeSet<usize>,
}

enum Replay {
    Continue,
    Stop,
}

impl CorruptionPlan {
    /// Replay the cursor over `root`
    pub fn analyze(root: &Node) -> Self {
        let mut plan = CorruptionPlan::default();
        if let Node::Root(group) | Node::Group(group) = root {
            plan.group_size = group.body.width();
            let mut cursor = 0;
            plan.replay_group(group, &mut cursor);
        }
        plan.corruptible.retain(|slot| !plan.degenerate.contains(slot));
        plan
    }

    /// Number of direct root slots
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Root slots whose corruption is certain to change the output
    pub fn corruptible_slots(&self) -> Vec<usize> {
        self.corruptible
            .range(..self.group_size)
            .copied()
            .collect()
    }

    /// Slots holding a `{0,}` repetition, which has no invalid count
    pub fn degenerate_slots(&self) -> Vec<usize> {
        self.degenerate.iter().copied().collect()
    }

    fn replay_group(&mut self, group: &Group, cursor: &mut usize) -> Replay {
        if group.lookaround.is_some() {
            return Replay::Continue;
        }
        let Body::Sequence(children) = &group.body else {
            return Replay::Stop;
        };
        for child in children {
            if let Replay::Stop = self.replay_node(child, cursor) {
                return Replay::Stop;
            }
            *cursor += 1;
        }
        Replay::Continue
    }

    fn replay_node(&mut self, node: &Node, cursor: &mut usize) -> Replay {
        match node {
            Node::Root(group) | Node::Group(group) => self.replay_group(group, cursor),
            Node::Char(_) => {
                self.corruptible.insert(*cursor);
                Replay::Continue
            }
            Node::Repetition(rep) => {
                if rep.min == 0 && rep.max.is_none() {
                    self.degenerate.insert(*cursor);
                } else {
                    self.corruptible.insert(*cursor);
                }
                if contains_group(&rep.value) {
                    return Replay::Stop;
                }
                self.replay_node(&rep.value, cursor)
            }
            Node::Position(_) | Node::Set(_) | Node::Reference(_) => Replay::Continue,
        }
    }

    /// Check caller-chosen slots against the root
    pub fn resolve_explicit<I>(&self, groups: I) -> Result<InvalidGroups, ValidationError>
    where
        I: IntoIterator<Item = usize>,
    {
        let indices: BTreeSet<usize> = groups.into_iter().collect();
        if let Some(&index) = indices.iter().find(|&&i| i >= self.group_size) {
            return Err(ValidationError::GroupOutOfBounds {
                index,
                group_size: self.group_size,
            });
        }
        debug!(groups = ?indices, "explicit invalid groups");
        Ok(InvalidGroups {
            indices,
            strict: true,
            guaranteed: None,
        })
    }

    /// Pick slots at random, at least one of them corruptible when possible
    pub fn pick<R: RandInt + ?Sized>(&self, rand: &mut R) -> Result<InvalidGroups, GenerateError> {
        if self.group_size == 0 {
            return Err(GenerateError::NothingToCorrupt);
        }
        let candidates = self.corruptible_slots();
        let guaranteed = if candidates.is_empty() {
            draw(rand, 0, self.last_slot())? as usize
        } else {
            let last = u32::try_from(candidates.len() - 1).unwrap_or(u32::MAX);
            candidates[draw(rand, 0, last)? as usize]
        };

        let mut indices = BTreeSet::from([guaranteed]);
        for slot in 0..self.group_size {
            if slot == guaranteed || self.degenerate.contains(&slot) {
                continue;
            }
            if coin(rand)? {
                indices.insert(slot);
            }
        }
        debug!(guaranteed, groups = ?indices, "picked invalid groups");
        Ok(InvalidGroups {
            indices,
            strict: false,
            guaranteed: Some(guaranteed),
        })
    }

    fn last_slot(&self) -> u32 {
        u32::try_from(self.group_size - 1).unwrap_or(u32::MAX)
    }
}

fn contains_group(node: &Node) -> bool {
    match node {
        Node::Root(_) | Node::Group(_) => true,
        Node::Repetition(rep) => contains_group(&rep.value),
        Node::Position(_) | Node::Set(_) | Node::Reference(_) | Node::Char(_) => false,
    }
}

/// The cursor slots one call corrupts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidGroups {
    indices: BTreeSet<usize>,
    strict: bool,
    guaranteed: Option<usize>,
}

impl InvalidGroups {
    /// Corrupt nothing
    pub fn none() -> Self {
        InvalidGroups::default()
    }

    /// Whether the slot is corrupted
    pub fn contains(&self, slot: usize) -> bool {
        self.indices.contains(&slot)
    }

    /// Caller-chosen slots must be honoured exactly; picked ones may degrade
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The slot a random pick promised to corrupt
    pub fn guaranteed(&self) -> Option<usize> {
        self.guaranteed
    }

    /// Whether corrupting `slot` may not be skipped
    pub fn must_corrupt(&self, slot: usize) -> bool {
        self.contains(slot) && (self.strict || self.guaranteed == Some(slot))
    }

    /// The slots in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing is corrupted
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
