//! Nodes of a property tree.

use std::rc::Rc;

use indextree::NodeId;

use crate::{DecoratorChain, PropertyMeta, ReorderableList, Value};

/// Stable handle to a node of a [`PropertyTree`](crate::PropertyTree).
///
/// A handle stays valid while its node is in the tree, including across
/// reorders. Handles of removed nodes are rejected with
/// [`TreeError::StaleProperty`](crate::TreeError::StaleProperty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(pub(crate) NodeId);

/// The value of a property across every target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyValue {
    values: Option<Vec<Value>>,
}

impl PropertyValue {
    pub(crate) fn resolved(values: Vec<Value>) -> Self {
        Self {
            values: Some(values),
        }
    }

    pub(crate) fn unresolved() -> Self {
        Self { values: None }
    }

    /// The value in the first target, or `None` when unresolved.
    pub fn get(&self) -> Option<&Value> {
        self.values.as_ref()?.first()
    }

    /// One value per target, or `None` when the member path did not resolve.
    pub fn values(&self) -> Option<&[Value]> {
        self.values.as_deref()
    }

    /// Whether the targets disagree.
    pub fn is_mixed(&self) -> bool {
        match self.values() {
            Some([first, rest @ ..]) => rest.iter().any(|v| v != first),
            _ => false,
        }
    }

    /// Whether the member path resolved in every target at the last pull.
    pub fn is_resolved(&self) -> bool {
        self.values.is_some()
    }
}

/// What a node holds.
#[derive(Debug)]
pub enum PropertyKind {
    /// A scalar or reference member; drawn as a single field.
    Leaf,
    /// A composite with child members.
    Composite,
    /// An array, drawn as a reorderable list of element children.
    Array(ReorderableList),
}

/// Tag of a [`PropertyKind`], without the list state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// See [`PropertyKind::Leaf`].
    Leaf,
    /// See [`PropertyKind::Composite`].
    Composite,
    /// See [`PropertyKind::Array`].
    Array,
}

impl PropertyKind {
    /// The variant tag.
    pub fn tag(&self) -> NodeKind {
        match self {
            PropertyKind::Leaf => NodeKind::Leaf,
            PropertyKind::Composite => NodeKind::Composite,
            PropertyKind::Array(_) => NodeKind::Array,
        }
    }
}

/// One node of a property tree.
pub struct FriggProperty {
    pub(crate) meta: Rc<PropertyMeta>,
    pub(crate) value: PropertyValue,
    pub(crate) kind: PropertyKind,
    pub(crate) decorators: DecoratorChain,
    pub(crate) is_expanded: bool,
    pub(crate) is_layout_member: bool,
    pub(crate) depth: usize,
}

impl FriggProperty {
    pub(crate) fn new(meta: PropertyMeta, kind: PropertyKind, depth: usize) -> Self {
        Self {
            meta: Rc::new(meta),
            value: PropertyValue::unresolved(),
            kind,
            decorators: DecoratorChain::default(),
            is_expanded: true,
            is_layout_member: false,
            depth,
        }
    }

    /// Static description of the member.
    pub fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    /// Value as of the last pull.
    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// What the node holds.
    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    /// The reorderable-list state of an array node.
    pub fn list(&self) -> Option<&ReorderableList> {
        match &self.kind {
            PropertyKind::Array(list) => Some(list),
            _ => None,
        }
    }

    pub(crate) fn list_mut(&mut self) -> Option<&mut ReorderableList> {
        match &mut self.kind {
            PropertyKind::Array(list) => Some(list),
            _ => None,
        }
    }

    /// The node's decorators.
    pub fn decorators(&self) -> &DecoratorChain {
        &self.decorators
    }

    /// Whether a composite's children are drawn.
    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    /// Whether the node is drawn inside a layout group instead of inline.
    pub fn is_layout_member(&self) -> bool {
        self.is_layout_member
    }

    /// Distance from the root (root children are at depth 1).
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl core::fmt::Debug for FriggProperty {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FriggProperty")
            .field("path", &self.meta.path().to_string())
            .field("kind", &self.kind.tag())
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
