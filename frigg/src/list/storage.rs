//! Resizing fixed-length array storage.

use std::rc::Rc;

use crate::Value;

/// How a fixed-length array grows and shrinks.
///
/// Arrays never change length in place: every resize produces a new backing
/// slice that replaces the old one in its owner.
pub trait ResizeStrategy {
    /// A copy of `items` with `value` appended.
    fn push(&self, items: &[Value], value: Value) -> Rc<[Value]>;

    /// A copy of `items` without the element at `index`. `index` is in bounds.
    fn remove(&self, items: &[Value], index: usize) -> Rc<[Value]>;
}

/// Allocate a container of the exact new length and copy every slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reallocate;

impl ResizeStrategy for Reallocate {
    fn push(&self, items: &[Value], value: Value) -> Rc<[Value]> {
        let mut grown = Vec::with_capacity(items.len() + 1);
        for item in items {
            grown.push(item.clone());
        }
        grown.push(value);
        grown.into()
    }

    fn remove(&self, items: &[Value], index: usize) -> Rc<[Value]> {
        let mut shrunk = Vec::with_capacity(items.len().saturating_sub(1));
        for item in &items[..index] {
            shrunk.push(item.clone());
        }
        for item in &items[index + 1..] {
            shrunk.push(item.clone());
        }
        shrunk.into()
    }
}
