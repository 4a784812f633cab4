use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::fmt;
use std::marker::PhantomData;

use super::node::Node;
use crate::common::Position;
use crate::error::{Error, Result};

/// Discovered but not yet expanded nodes.
///
/// Implementations share `add`, `contains_state` and emptiness semantics and
/// differ only in which node `remove` hands back.
pub trait Frontier: fmt::Debug {
    fn add(&mut self, node: Node);

    /// Take the next node in this frontier's order.
    fn remove(&mut self) -> Result<Node>;

    fn contains_state(&self, state: Position) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-state count of held nodes, so membership checks skip the linear scan.
#[derive(Debug, Default)]
struct Members {
    counts: HashMap<Position, usize>,
}

impl Members {
    fn insert(&mut self, state: Position) {
        *self.counts.entry(state).or_default() += 1;
    }

    fn remove(&mut self, state: Position) {
        if let Some(count) = self.counts.get_mut(&state) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&state);
            }
        }
    }

    fn contains(&self, state: Position) -> bool {
        self.counts.contains_key(&state)
    }
}

/// LIFO frontier, depth-first search.
#[derive(Debug, Default)]
pub struct StackFrontier {
    nodes: Vec<Node>,
    members: Members,
}

impl Frontier for StackFrontier {
    fn add(&mut self, node: Node) {
        self.members.insert(node.state);
        self.nodes.push(node);
    }

    fn remove(&mut self) -> Result<Node> {
        let node = self.nodes.pop().ok_or(Error::EmptyFrontier)?;
        self.members.remove(node.state);
        Ok(node)
    }

    fn contains_state(&self, state: Position) -> bool {
        self.members.contains(state)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// FIFO frontier, breadth-first search.
#[derive(Debug, Default)]
pub struct QueueFrontier {
    nodes: VecDeque<Node>,
    members: Members,
}

impl Frontier for QueueFrontier {
    fn add(&mut self, node: Node) {
        self.members.insert(node.state);
        self.nodes.push_back(node);
    }

    fn remove(&mut self) -> Result<Node> {
        let node = self.nodes.pop_front().ok_or(Error::EmptyFrontier)?;
        self.members.remove(node.state);
        Ok(node)
    }

    fn contains_state(&self, state: Position) -> bool {
        self.members.contains(state)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Ordering key of a priority frontier; lower is removed first.
pub trait Priority {
    fn priority(node: &Node) -> usize;
}

/// Greedy best-first: h(n).
#[derive(Debug, Clone, Copy, Default)]
pub struct ByHeuristic;

impl Priority for ByHeuristic {
    fn priority(node: &Node) -> usize {
        node.heuristic
    }
}

/// A*: g(n) + h(n).
#[derive(Debug, Clone, Copy, Default)]
pub struct ByEstimatedTotal;

impl Priority for ByEstimatedTotal {
    fn priority(node: &Node) -> usize {
        // Unreachable cells carry usize::MAX as their estimate.
        node.cost.saturating_add(node.heuristic)
    }
}

#[derive(Debug)]
struct PriorityEntry {
    priority: usize,
    sequence: u64,
    node: Node,
}

// Reversed so the max-heap pops the lowest priority, earliest insertion first.
impl Ord for PriorityEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for PriorityEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PriorityEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for PriorityEntry {}

/// Min-priority frontier; ties go to the node inserted first.
#[derive(Debug)]
pub struct PriorityFrontier<P> {
    heap: BinaryHeap<PriorityEntry>,
    sequence: u64,
    members: Members,
    _priority: PhantomData<P>,
}

impl<P> Default for PriorityFrontier<P> {
    fn default() -> Self {
        PriorityFrontier {
            heap: BinaryHeap::new(),
            sequence: 0,
            members: Members::default(),
            _priority: PhantomData,
        }
    }
}

impl<P: Priority + fmt::Debug> Frontier for PriorityFrontier<P> {
    fn add(&mut self, node: Node) {
        let priority = P::priority(&node);
        let sequence = self.sequence;
        self.sequence += 1;

        self.members.insert(node.state);
        self.heap.push(PriorityEntry {
            priority,
            sequence,
            node,
        });
    }

    fn remove(&mut self) -> Result<Node> {
        let entry = self.heap.pop().ok_or(Error::EmptyFrontier)?;
        self.members.remove(entry.node.state);
        Ok(entry.node)
    }

    fn contains_state(&self, state: Position) -> bool {
        self.members.contains(state)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

pub type GreedyFrontier = PriorityFrontier<ByHeuristic>;
pub type AStarFrontier = PriorityFrontier<ByEstimatedTotal>;
