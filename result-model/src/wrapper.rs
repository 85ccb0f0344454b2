//! FILENAME: result-model/src/wrapper.rs
//! Pass-scoped memoized wrappers over tree-node content.
//!
//! Repeated dimension values ("2024-01" appearing in many branches) are
//! wrapped exactly once per factory lifetime, so downstream formatting and
//! grouping can rely on pointer equality instead of re-deriving anything.
//! The cache lives for one build-and-render pass and is then discarded;
//! it is never invalidated mid-pass.

use rustc_hash::FxHashMap;
use std::rc::Rc;
use crate::tree::TreeNode;
use crate::value::Value;

// ============================================================================
// WRAPPER TYPES
// ============================================================================

/// Display label of a dimension or measure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelWrapper {
    pub text: String,
}

/// A raw dimension member plus its derived display string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberWrapper {
    pub member: Value,
    pub display: String,
}

/// A measure payload as placed into a data cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueWrapper {
    pub measure_key: String,
    pub unit: Option<String>,
    pub value: Value,
}

// ============================================================================
// FACTORY
// ============================================================================

/// Owns the wrapper caches for one render pass.
///
/// Guarantee: structurally equal inputs return the SAME `Rc` instance
/// within one factory's lifetime.
#[derive(Debug, Default)]
pub struct WrapperFactory {
    labels: FxHashMap<String, Rc<LabelWrapper>>,
    members: FxHashMap<Value, Rc<MemberWrapper>>,
    values: FxHashMap<(String, Value), Rc<ValueWrapper>>,
}

impl WrapperFactory {
    pub fn new() -> Self {
        WrapperFactory::default()
    }

    /// Wraps a display label.
    pub fn label(&mut self, text: &str) -> Rc<LabelWrapper> {
        if let Some(existing) = self.labels.get(text) {
            return Rc::clone(existing);
        }
        let wrapper = Rc::new(LabelWrapper {
            text: text.to_string(),
        });
        self.labels.insert(text.to_string(), Rc::clone(&wrapper));
        wrapper
    }

    /// Wraps a raw dimension member, keyed by its content.
    pub fn member(&mut self, member: &Value) -> Rc<MemberWrapper> {
        if let Some(existing) = self.members.get(member) {
            return Rc::clone(existing);
        }
        let wrapper = Rc::new(MemberWrapper {
            member: member.clone(),
            display: member.display(),
        });
        self.members.insert(member.clone(), Rc::clone(&wrapper));
        wrapper
    }

    /// Wraps a measure payload, keyed by (measure key, content).
    pub fn value(&mut self, measure_key: &str, unit: Option<&str>, value: &Value) -> Rc<ValueWrapper> {
        let cache_key = (measure_key.to_string(), value.clone());
        if let Some(existing) = self.values.get(&cache_key) {
            return Rc::clone(existing);
        }
        let wrapper = Rc::new(ValueWrapper {
            measure_key: measure_key.to_string(),
            unit: unit.map(|u| u.to_string()),
            value: value.clone(),
        });
        self.values.insert(cache_key, Rc::clone(&wrapper));
        wrapper
    }

    /// Wraps the dimension label of a node.
    pub fn node_label(&mut self, node: &TreeNode) -> Rc<LabelWrapper> {
        self.label(&node.label)
    }

    /// Wraps the member value of a node.
    pub fn node_member(&mut self, node: &TreeNode) -> Rc<MemberWrapper> {
        self.member(&node.member)
    }

    /// Wraps one measure of a leaf node.
    /// Returns None when the leaf does not carry the measure.
    pub fn node_value(&mut self, node: &TreeNode, measure_key: &str) -> Option<Rc<ValueWrapper>> {
        let measure = node.measure(measure_key)?;
        Some(self.value(measure_key, measure.unit.as_deref(), &measure.value))
    }
}
