//! Match subjects: linear label paths and labeled trees.
//!
//! The matchers only see subjects through [`Path`] and the [`TreeSubject`]
//! trait; how a subject was produced (parsed document, in-memory builder) is
//! not their concern.

use crate::Value;

/// Index of a node inside a tree subject.
pub type NodeIx = u32;

/// A linear sequence of labels, optionally anchored at either end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    labels: Vec<String>,
    rooted: bool,
    terminal: bool,
    value: Option<Value>,
}

impl Path {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            rooted: false,
            terminal: false,
            value: None,
        }
    }

    /// Mark the path as starting at the subject's true root.
    pub fn rooted(mut self, rooted: bool) -> Self {
        self.rooted = rooted;
        self
    }

    /// Mark the path as ending at a leaf.
    pub fn terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    /// Attach the leaf value found at the end of the path.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_rooted(&self) -> bool {
        self.rooted
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Read-only view of a rooted tree whose edges carry labels.
///
/// Node indices are dense in `0..node_count()`, so matchers can cache
/// per-node results in a vector.
pub trait TreeSubject {
    fn root(&self) -> NodeIx;

    fn node_count(&self) -> usize;

    /// Children of `node`, in document order.
    fn children(&self, node: NodeIx) -> &[NodeIx];

    /// Label of the edge entering `node`. `None` for the root.
    fn label(&self, node: NodeIx) -> Option<&str>;

    /// Leaf value at `node`, if any.
    fn value(&self, node: NodeIx) -> Option<&Value>;

    /// True when `node` is a real leaf of the record, not a cut-off point.
    fn is_terminal(&self, node: NodeIx) -> bool;

    /// True when the tree's root is the record's true root.
    fn is_rooted(&self) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct TreeNode {
    label: Option<String>,
    children: Vec<NodeIx>,
    value: Option<Value>,
    terminal: bool,
}

/// In-memory tree subject built with [`TreeBuilder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledTree {
    nodes: Vec<TreeNode>,
    root: NodeIx,
    rooted: bool,
}

impl LabeledTree {
    pub fn builder() -> TreeBuilder {
        TreeBuilder::new()
    }

    /// Linear tree spelling out a path: one node per label plus the root.
    pub fn from_path(path: &Path) -> Self {
        let mut builder = TreeBuilder::new().rooted(path.is_rooted());
        let mut below: Option<NodeIx> = None;
        for label in path.labels().iter().rev() {
            let id = match below {
                None => builder.push(TreeNode {
                    label: Some(label.clone()),
                    children: Vec::new(),
                    value: path.value().cloned(),
                    terminal: path.is_terminal(),
                }),
                Some(child) => builder.node(label, [child]),
            };
            below = Some(id);
        }
        match below {
            Some(child) => builder.root([child]),
            None => builder.root_leaf(path.value().cloned(), path.is_terminal()),
        }
    }
}

impl TreeSubject for LabeledTree {
    fn root(&self) -> NodeIx {
        self.root
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn children(&self, node: NodeIx) -> &[NodeIx] {
        &self.nodes[node as usize].children
    }

    fn label(&self, node: NodeIx) -> Option<&str> {
        self.nodes[node as usize].label.as_deref()
    }

    fn value(&self, node: NodeIx) -> Option<&Value> {
        self.nodes[node as usize].value.as_ref()
    }

    fn is_terminal(&self, node: NodeIx) -> bool {
        self.nodes[node as usize].terminal
    }

    fn is_rooted(&self) -> bool {
        self.rooted
    }
}

/// Bottom-up builder for [`LabeledTree`].
///
/// Children are created first; each returned index may be attached to
/// exactly one parent.
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<TreeNode>,
    rooted: bool,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            rooted: true,
        }
    }

    /// Whether the finished tree starts at the record's true root.
    pub fn rooted(mut self, rooted: bool) -> Self {
        self.rooted = rooted;
        self
    }

    fn push(&mut self, node: TreeNode) -> NodeIx {
        let id = self.nodes.len() as NodeIx;
        self.nodes.push(node);
        id
    }

    /// Terminal leaf reached through `label`, holding `value`.
    pub fn leaf(&mut self, label: &str, value: impl Into<Value>) -> NodeIx {
        self.push(TreeNode {
            label: Some(label.to_owned()),
            children: Vec::new(),
            value: Some(value.into()),
            terminal: true,
        })
    }

    /// Terminal leaf without a value (e.g. an empty object).
    pub fn empty_leaf(&mut self, label: &str) -> NodeIx {
        self.push(TreeNode {
            label: Some(label.to_owned()),
            children: Vec::new(),
            value: None,
            terminal: true,
        })
    }

    /// Non-terminal cut-off point: the record continues below it.
    pub fn open_leaf(&mut self, label: &str) -> NodeIx {
        self.push(TreeNode {
            label: Some(label.to_owned()),
            children: Vec::new(),
            value: None,
            terminal: false,
        })
    }

    /// Inner node reached through `label`.
    pub fn node(&mut self, label: &str, children: impl IntoIterator<Item = NodeIx>) -> NodeIx {
        self.push(TreeNode {
            label: Some(label.to_owned()),
            children: children.into_iter().collect(),
            value: None,
            terminal: false,
        })
    }

    /// Finish with an unlabeled root over `children`.
    pub fn root(mut self, children: impl IntoIterator<Item = NodeIx>) -> LabeledTree {
        let root = self.push(TreeNode {
            label: None,
            children: children.into_iter().collect(),
            value: None,
            terminal: false,
        });
        LabeledTree {
            nodes: self.nodes,
            root,
            rooted: self.rooted,
        }
    }

    /// Finish with a root that is itself a leaf.
    pub fn root_leaf(mut self, value: Option<Value>, terminal: bool) -> LabeledTree {
        let root = self.push(TreeNode {
            label: None,
            children: Vec::new(),
            value,
            terminal,
        });
        LabeledTree {
            nodes: self.nodes,
            root,
            rooted: self.rooted,
        }
    }
}
