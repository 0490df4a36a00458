//! Reorderable-list state for array properties.
//!
//! The structural edits themselves live on
//! [`PropertyTree`](crate::PropertyTree), since they rebuild the node's
//! children. This module holds what the list drawer needs between frames.

use std::rc::Rc;

use crate::{ListControls, ListDrawerSettings, ListGesture, Metrics, TypeHandle, Value};

mod storage;
pub use storage::*;

/// Per-node state of an array property.
#[derive(Debug, Clone)]
pub struct ReorderableList {
    element_type: TypeHandle,
    settings: ListDrawerSettings,
    backing: Vec<Rc<[Value]>>,
    active: Option<usize>,
}

/// A structural edit the list drawer resolved from a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOp {
    /// Change the active element.
    Select(usize),
    /// Append a default element.
    Add,
    /// Remove the element at the index.
    Remove(usize),
    /// Move an element.
    Move {
        /// Current index.
        from: usize,
        /// Target index.
        to: usize,
    },
}

impl ReorderableList {
    pub(crate) fn new(element_type: TypeHandle, settings: ListDrawerSettings) -> Self {
        Self {
            element_type,
            settings,
            backing: Vec::new(),
            active: None,
        }
    }

    /// Declared element type.
    pub fn element_type(&self) -> TypeHandle {
        self.element_type
    }

    /// Drawer options.
    pub fn settings(&self) -> &ListDrawerSettings {
        &self.settings
    }

    /// Number of elements shown: the shortest target's length.
    pub fn len(&self) -> usize {
        self.backing.iter().map(|items| items.len()).min().unwrap_or(0)
    }

    /// Whether the list shows no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cached backing container of target `target`.
    pub fn backing(&self, target: usize) -> Option<&Rc<[Value]>> {
        self.backing.get(target)
    }

    /// The selected element.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Cache the backing containers read from the targets. Values that are
    /// not arrays (e.g. an unresolved member) count as empty.
    pub(crate) fn set_backing(&mut self, values: &[Value]) {
        self.backing = values
            .iter()
            .map(|value| match value {
                Value::Array(items) => items.clone(),
                _ => Rc::from(Vec::new()),
            })
            .collect();
        if self.active.is_some_and(|active| active >= self.len()) {
            self.active = None;
        }
    }

    pub(crate) fn set_active(&mut self, active: Option<usize>) {
        self.active = active.filter(|&index| index < self.len());
    }

    /// `"<Name> - N elements"`
    pub fn header_label(&self, nice_name: &str) -> String {
        format!("{nice_name} - {} elements", self.len())
    }

    /// What the list widget shows this frame.
    pub fn controls(&self) -> ListControls {
        ListControls {
            count: self.len(),
            active: self.active,
            draggable: self.settings.allow_drag,
            show_add: !self.settings.hide_add_button,
            show_remove: !self.settings.hide_remove_button,
        }
    }

    /// Height of the header and control rows, without elements.
    pub fn chrome_height(&self, metrics: &Metrics) -> f32 {
        let mut height = 0.0;
        if !self.settings.hide_header {
            height += metrics.line_height;
        }
        if !self.settings.hide_add_button || !self.settings.hide_remove_button {
            height += metrics.line_height;
        }
        height
    }

    /// Turn a widget gesture into an edit. Gestures for disabled capabilities
    /// and out-of-range indices resolve to nothing. `Remove` takes the active
    /// element, or the last one when none is selected.
    pub fn resolve(&self, gesture: ListGesture) -> Option<ListOp> {
        let len = self.len();
        match gesture {
            ListGesture::None => None,
            ListGesture::Select(index) => (index < len).then_some(ListOp::Select(index)),
            ListGesture::Add => (!self.settings.hide_add_button).then_some(ListOp::Add),
            ListGesture::Remove => {
                if self.settings.hide_remove_button || len == 0 {
                    return None;
                }
                let index = self.active.filter(|&i| i < len).unwrap_or(len - 1);
                Some(ListOp::Remove(index))
            }
            ListGesture::Move { from, to } => (self.settings.allow_drag
                && from < len
                && to < len
                && from != to)
                .then_some(ListOp::Move { from, to }),
        }
    }
}
