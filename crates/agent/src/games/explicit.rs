//! Hand-built game trees.
//!
//! An explicit tree spells out every state: each node carries the value the
//! evaluator reports for it and its labeled children. Leaves are terminal.
//! Turn order is implied by depth, so the same tree can be searched as a
//! two-agent or a many-agent game.
//!
//! Trees are built in code or loaded from JSON:
//!
//! ```json
//! { "children": [
//!     { "action": "A", "children": [ { "action": "a1", "value": 3 }, { "action": "a2", "value": 5 } ] },
//!     { "action": "B", "children": [ { "action": "b1", "value": 1 }, { "action": "b2", "value": 9 } ] }
//! ] }
//! ```

use plysearch_core::GameState;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::rc::Rc;
use thiserror::Error;

/// Errors raised while loading a tree.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("invalid tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("action {action:?} appears more than once among siblings")]
    DuplicateAction { action: String },
}

/// Serializable description of a game tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    /// Evaluation of this node.
    #[serde(default)]
    pub value: f32,

    /// Labeled children, in legal-action order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Branch>,
}

/// An edge of a [`TreeSpec`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Action label.
    pub action: String,

    /// Subtree reached by the action.
    #[serde(flatten)]
    pub node: TreeSpec,
}

impl TreeSpec {
    /// A terminal node.
    pub fn leaf(value: f32) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }

    /// An inner node with labeled children.
    pub fn branch(value: f32, children: Vec<(String, TreeSpec)>) -> Self {
        Self {
            value,
            children: children
                .into_iter()
                .map(|(action, node)| Branch { action, node })
                .collect(),
        }
    }

    /// An inner node whose children are all leaves, labeled by their prefix
    /// and index (`"b0"`, `"b1"`, ...).
    pub fn leaves(prefix: &str, values: &[f32]) -> Self {
        Self::branch(
            0.0,
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (format!("{prefix}{i}"), Self::leaf(v)))
                .collect(),
        )
    }

    /// Parse a tree from JSON and check that sibling labels are distinct.
    pub fn from_json_str(json: &str) -> Result<Self, TreeError> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check that no node has two children with the same label. Actions
    /// are resolved by label, so a repeated one would hide its later twins.
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut seen = HashSet::with_capacity(self.children.len());
        for branch in &self.children {
            if !seen.insert(branch.action.as_str()) {
                return Err(TreeError::DuplicateAction {
                    action: branch.action.clone(),
                });
            }
            branch.node.validate()?;
        }
        Ok(())
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(|b| b.node.len()).sum::<usize>()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[derive(Debug)]
struct Node {
    value: f32,
    children: Vec<(String, Rc<Node>)>,
}

impl Node {
    fn build(spec: &TreeSpec) -> Rc<Self> {
        Rc::new(Self {
            value: spec.value,
            children: spec
                .children
                .iter()
                .map(|b| (b.action.clone(), Self::build(&b.node)))
                .collect(),
        })
    }
}

/// A position in an explicit tree. Cloning is cheap: subtrees are shared.
#[derive(Clone, Debug)]
pub struct TreeState {
    node: Rc<Node>,
    num_agents: usize,
}

impl TreeState {
    /// Root of `spec`, searched as a game with `num_agents` agents.
    ///
    /// # Panics
    /// Panics if two siblings share a label; see [`TreeSpec::validate`].
    pub fn new(num_agents: usize, spec: &TreeSpec) -> Self {
        if let Err(err) = spec.validate() {
            panic!("{err}");
        }
        Self {
            node: Node::build(spec),
            num_agents,
        }
    }

    /// Labels of the children of this node.
    pub fn actions(&self) -> Vec<String> {
        self.node.children.iter().map(|(a, _)| a.clone()).collect()
    }
}

impl GameState for TreeState {
    type Action = String;

    fn legal_actions(&self, _agent: usize) -> Vec<String> {
        self.actions()
    }

    /// # Panics
    /// Panics if `action` is not a child label of this node.
    fn successor(&self, _agent: usize, action: &String) -> Self {
        let node = self
            .node
            .children
            .iter()
            .find(|(label, _)| label == action)
            .map(|(_, child)| Rc::clone(child))
            .unwrap_or_else(|| panic!("no child labeled {action:?}"));
        Self {
            node,
            num_agents: self.num_agents,
        }
    }

    fn is_terminal(&self) -> bool {
        self.node.children.is_empty()
    }

    fn num_agents(&self) -> usize {
        self.num_agents
    }

    fn evaluate(&self) -> f32 {
        self.node.value
    }
}
