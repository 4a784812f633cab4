use crate::common::{Action, Position};

/// Index of an expanded node in the per-search arena.
pub type NodeId = usize;

/// A vertex of the search tree. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub state: Position,
    pub parent: Option<NodeId>,
    pub action: Option<Action>,
    pub cost: usize,      // g(n)
    pub heuristic: usize, // h(n)
}

impl Node {
    pub fn root(state: Position, heuristic: usize) -> Self {
        Node {
            state,
            parent: None,
            action: None,
            cost: 0,
            heuristic,
        }
    }

    /// Child reached from the node stored at `parent_id` by one unit step.
    pub fn child(
        parent: &Node,
        parent_id: NodeId,
        action: Action,
        state: Position,
        heuristic: usize,
    ) -> Self {
        Node {
            state,
            parent: Some(parent_id),
            action: Some(action),
            cost: parent.cost + 1,
            heuristic,
        }
    }
}

/// Append-only store of expanded nodes; parents are referenced by index.
#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Walk parent links from `leaf` back to the root, collecting the action
    /// and state of every non-root node. Returned in root-to-leaf order.
    pub fn construct_path(&self, leaf: &Node) -> (Vec<Action>, Vec<Position>) {
        let mut actions = Vec::new();
        let mut path = Vec::new();

        let mut current = leaf;
        while let (Some(parent), Some(action)) = (current.parent, current.action) {
            actions.push(action);
            path.push(current.state);
            current = self.get(parent);
        }

        actions.reverse();
        path.reverse();
        (actions, path)
    }
}
