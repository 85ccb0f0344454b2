//! FILENAME: result-model/src/tree.rs
//! The hierarchical aggregate result.
//!
//! One nesting level per grouped dimension: a node is one dimension-value
//! slice, leaves carry the computed measures. The tree is built once per
//! query execution by the (out-of-scope) aggregation layer and is
//! immutable for the lifetime of one render pass.

use serde::{Deserialize, Serialize};
use crate::value::Value;

// ============================================================================
// DIMENSIONS AND MEASURES
// ============================================================================

/// A grouping attribute of the aggregate (e.g. Region, Quarter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Stable key used in pivot requests (e.g. "region").
    pub key: String,

    /// Display label (e.g. "Region").
    pub label: String,
}

impl Dimension {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Dimension {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// A computed aggregate attached to a leaf node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    /// Stable key (e.g. "sales_sum").
    pub key: String,

    /// Display label (e.g. "Sales").
    pub label: String,

    /// Unit of the value (e.g. "kr"), shared across leaves for one measure.
    pub unit: Option<String>,

    /// The raw aggregate value.
    pub value: Value,
}

impl Measure {
    pub fn new(key: impl Into<String>, label: impl Into<String>, value: Value) -> Self {
        Measure {
            key: key.into(),
            label: label.into(),
            unit: None,
            value,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

// ============================================================================
// TREE NODE
// ============================================================================

/// One dimension-value slice of the aggregate result.
///
/// A node either has children (branch) or measures (leaf), never neither.
/// Null branches mark "no data for this combination" and are skipped by
/// every traversal without disturbing sibling order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Stable identifier within the parent (member key).
    pub key: String,

    /// The raw (possibly empty) dimension member value.
    pub member: Value,

    /// Display label of the DIMENSION this level groups by
    /// (constant across siblings, not the member's label).
    pub label: String,

    /// Measures; present only on leaves.
    pub measures: Vec<Measure>,

    /// Ordered child nodes; empty for leaves.
    pub children: Vec<TreeNode>,

    /// Placeholder branch with no data behind it.
    pub is_null: bool,
}

impl TreeNode {
    /// Creates a branch node.
    pub fn branch(
        key: impl Into<String>,
        member: Value,
        label: impl Into<String>,
        children: Vec<TreeNode>,
    ) -> Self {
        TreeNode {
            key: key.into(),
            member,
            label: label.into(),
            measures: Vec::new(),
            children,
            is_null: false,
        }
    }

    /// Creates a leaf node carrying measures.
    pub fn leaf(
        key: impl Into<String>,
        member: Value,
        label: impl Into<String>,
        measures: Vec<Measure>,
    ) -> Self {
        TreeNode {
            key: key.into(),
            member,
            label: label.into(),
            measures,
            children: Vec::new(),
            is_null: false,
        }
    }

    /// Creates a null placeholder branch.
    pub fn null(key: impl Into<String>, member: Value, label: impl Into<String>) -> Self {
        TreeNode {
            key: key.into(),
            member,
            label: label.into(),
            measures: Vec::new(),
            children: Vec::new(),
            is_null: true,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && !self.is_null
    }

    pub fn is_null(&self) -> bool {
        self.is_null
    }

    /// Number of children; 0 for leaves.
    pub fn count(&self) -> usize {
        self.children.len()
    }

    /// Returns the child matching a given member value.
    /// Absence means "no data", never an error; null branches never match.
    pub fn traverse(&self, member: &Value) -> Option<&TreeNode> {
        self.children
            .iter()
            .find(|c| !c.is_null && c.member == *member)
    }

    /// Returns the measure with the given key, if this leaf carries it.
    pub fn measure(&self, key: &str) -> Option<&Measure> {
        self.measures.iter().find(|m| m.key == key)
    }
}

// ============================================================================
// TREE AND FLAT PROJECTION
// ============================================================================

/// One step of a leaf path: a dimension key plus the member reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub dimension: String,
    pub member: Value,
}

/// A flattened leaf: the full member path plus the leaf's measures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeafRow {
    pub path: Vec<PathStep>,
    pub measures: Vec<Measure>,
}

impl LeafRow {
    pub fn measure(&self, key: &str) -> Option<&Measure> {
        self.measures.iter().find(|m| m.key == key)
    }
}

/// The complete aggregate result: ordered dimension descriptors plus the
/// root nodes of the first grouping level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub dimensions: Vec<Dimension>,
    pub roots: Vec<TreeNode>,
}

impl Tree {
    pub fn new(dimensions: Vec<Dimension>, roots: Vec<TreeNode>) -> Self {
        Tree { dimensions, roots }
    }

    /// Number of grouped dimensions; every leaf sits at exactly this depth.
    pub fn depth(&self) -> usize {
        self.dimensions.len()
    }

    pub fn dimension(&self, key: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.key == key)
    }

    /// Total lookup along a member path, skipping null branches.
    /// Returns None when any step is absent; callers treat that as zero.
    pub fn lookup(&self, path: &[Value]) -> Option<&TreeNode> {
        let first = path.first()?;
        let mut node = self
            .roots
            .iter()
            .find(|c| !c.is_null && c.member == *first)?;
        for member in &path[1..] {
            node = node.traverse(member)?;
        }
        Some(node)
    }

    /// Materializes the flat leaf projection in tree order.
    /// Each consumer gets its own copy; null branches are skipped entirely.
    pub fn leaf_rows(&self) -> Vec<LeafRow> {
        let mut rows = Vec::new();
        let mut path = Vec::with_capacity(self.dimensions.len());
        for root in &self.roots {
            collect_leaves(root, 0, &self.dimensions, &mut path, &mut rows);
        }
        rows
    }
}

fn collect_leaves(
    node: &TreeNode,
    depth: usize,
    dimensions: &[Dimension],
    path: &mut Vec<PathStep>,
    rows: &mut Vec<LeafRow>,
) {
    if node.is_null {
        return;
    }

    let dimension = dimensions
        .get(depth)
        .map(|d| d.key.clone())
        .unwrap_or_default();
    path.push(PathStep {
        dimension,
        member: node.member.clone(),
    });

    if node.children.is_empty() {
        rows.push(LeafRow {
            path: path.clone(),
            measures: node.measures.clone(),
        });
    } else {
        for child in &node.children {
            collect_leaves(child, depth + 1, dimensions, path, rows);
        }
    }

    path.pop();
}
