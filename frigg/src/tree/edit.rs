//! Value edits and structural edits on array properties.

use std::rc::Rc;

use indextree::NodeId;

use crate::{
    AccessError, Assign, ListError, PropertyId, PropertyMeta, PropertyPath, PropertyTree,
    TreeError, TypeHandle, Value,
};
use crate::{debug, trace};

use super::Phase;

/// What a structural edit needs to know about an array node.
struct ListSnapshot {
    path: PropertyPath,
    element_type: TypeHandle,
    backing: Vec<Rc<[Value]>>,
    len: usize,
}

impl PropertyTree {
    /// Assign `value` to a property in every target.
    ///
    /// Outside a draw cycle the write is bracketed and published right away;
    /// during a cycle it is published when the cycle commits.
    pub fn set_value(&mut self, id: PropertyId, value: impl Into<Value>) -> Result<(), TreeError> {
        self.check(id)?;
        let value = value.into();
        let meta = self.node(id.0).meta.clone();
        let path = meta.path().clone();

        if !meta.is_writable() {
            return Err(AccessError::ReadOnly { path }.into());
        }
        if !self.registry.accepts(meta.member_type(), &value) {
            return Err(AccessError::TypeMismatch {
                path,
                expected: self.registry.name(meta.member_type()).to_string(),
                found: value.kind(),
            }
            .into());
        }

        self.bracketed(Phase::Updating, |tree| {
            trace!("setting `{}` to {}", path, value);
            tree.write_values(&path, Assign::All(value))?;
            tree.refresh(id.0);
            Ok(())
        })
    }

    /// Append a default element to an array property in every target.
    /// Returns the new element's node.
    pub fn add_element(&mut self, id: PropertyId) -> Result<PropertyId, TreeError> {
        self.check(id)?;
        self.bracketed(Phase::Updating, |tree| {
            let list = tree.list_snapshot(id.0)?;
            let grown = list
                .backing
                .iter()
                .map(|items| {
                    let default = tree.defaults.default_value(&tree.registry, list.element_type);
                    Value::Array(tree.strategy.push(items, default))
                })
                .collect();
            tree.write_values(&list.path, Assign::PerTarget(grown))?;
            tree.refresh(id.0);

            debug!("`{}`: added element {}", list.path, list.len);
            id.0
                .children(&tree.arena)
                .nth(list.len)
                .map(PropertyId)
                .ok_or_else(|| AccessError::Unresolved {
                    path: list.path.index(list.len),
                }
                .into())
        })
    }

    /// Remove element `index` from an array property in every target.
    ///
    /// Later elements shift left; their nodes are kept and re-keyed.
    pub fn remove_element(&mut self, id: PropertyId, index: usize) -> Result<(), TreeError> {
        self.check(id)?;
        self.bracketed(Phase::Updating, |tree| {
            let list = tree.list_snapshot(id.0)?;
            if index >= list.len {
                return Err(ListError::IndexOutOfBounds {
                    path: list.path,
                    index,
                    len: list.len,
                }
                .into());
            }

            let shrunk = list
                .backing
                .iter()
                .map(|items| Value::Array(tree.strategy.remove(items, index)))
                .collect();
            tree.write_values(&list.path, Assign::PerTarget(shrunk))?;

            let children: Vec<NodeId> = id.0.children(&tree.arena).collect();
            if let Some(&removed) = children.get(index) {
                removed.remove_subtree(&mut tree.arena);
            }
            for (new_index, &child) in children.iter().enumerate().skip(index + 1) {
                tree.rekey(child, list.element_type, &list.path, new_index - 1);
            }

            let active = tree.node(id.0).list().and_then(|l| l.active());
            let active = match active {
                Some(a) if a == index => None,
                Some(a) if a > index => Some(a - 1),
                other => other,
            };
            tree.refresh(id.0);
            if let Some(l) = tree.node_mut(id.0).list_mut() {
                l.set_active(active);
            }

            debug!("`{}`: removed element {}", list.path, index);
            Ok(())
        })
    }

    /// Move element `from` to position `to` in every target.
    ///
    /// The element walks one slot at a time; each step writes the two
    /// swapped slots individually. Element nodes travel with their elements.
    pub fn move_element(
        &mut self,
        id: PropertyId,
        from: usize,
        to: usize,
    ) -> Result<(), TreeError> {
        self.check(id)?;
        self.bracketed(Phase::Updating, |tree| {
            let list = tree.list_snapshot(id.0)?;
            for index in [from, to] {
                if index >= list.len {
                    return Err(ListError::IndexOutOfBounds {
                        path: list.path.clone(),
                        index,
                        len: list.len,
                    }
                    .into());
                }
            }
            if from == to {
                return Ok(());
            }

            let mut at = from;
            while at != to {
                let next = if to > at { at + 1 } else { at - 1 };
                tree.swap_elements(&list.path, at, next)?;
                at = next;
            }

            let children: Vec<NodeId> = id.0.children(&tree.arena).collect();
            if let (Some(&moving), Some(&anchor)) = (children.get(from), children.get(to)) {
                moving.detach(&mut tree.arena);
                if to > from {
                    anchor.insert_after(moving, &mut tree.arena);
                } else {
                    anchor.insert_before(moving, &mut tree.arena);
                }
            }
            let children: Vec<NodeId> = id.0.children(&tree.arena).collect();
            let (low, high) = (from.min(to), from.max(to));
            for (index, &child) in children.iter().enumerate().take(high + 1).skip(low) {
                tree.rekey(child, list.element_type, &list.path, index);
            }

            let active = tree.node(id.0).list().and_then(|l| l.active());
            tree.refresh(id.0);
            if active == Some(from)
                && let Some(l) = tree.node_mut(id.0).list_mut()
            {
                l.set_active(Some(to));
            }

            debug!("`{}`: moved element {} to {}", list.path, from, to);
            Ok(())
        })
    }

    fn swap_elements(&mut self, path: &PropertyPath, a: usize, b: usize) -> Result<(), TreeError> {
        let (path_a, path_b) = (path.index(a), path.index(b));
        let values_a = self
            .read_values(&path_a)
            .ok_or_else(|| AccessError::Unresolved { path: path_a.clone() })?;
        let values_b = self
            .read_values(&path_b)
            .ok_or_else(|| AccessError::Unresolved { path: path_b.clone() })?;
        self.write_values(&path_a, Assign::PerTarget(values_b))?;
        self.write_values(&path_b, Assign::PerTarget(values_a))?;
        Ok(())
    }

    /// Freshly pull an array node and capture its backing containers.
    fn list_snapshot(&mut self, id: NodeId) -> Result<ListSnapshot, TreeError> {
        self.pull(id);
        self.sync_elements(id);
        let node = self.node(id);
        let path = node.meta.path().clone();
        let list = node.list().ok_or_else(|| ListError::NotAList { path: path.clone() })?;
        if !node.value.is_resolved() {
            return Err(AccessError::Unresolved { path }.into());
        }
        Ok(ListSnapshot {
            element_type: list.element_type(),
            backing: (0..self.targets.len())
                .filter_map(|target| list.backing(target).cloned())
                .collect(),
            len: list.len(),
            path,
        })
    }

    /// Give an element node the meta of its new position, and rebase the
    /// paths of its whole subtree.
    fn rekey(&mut self, id: NodeId, element_type: TypeHandle, parent: &PropertyPath, index: usize) {
        let meta = PropertyMeta::element(element_type, parent, index);
        let path = meta.path().clone();
        self.node_mut(id).meta = Rc::new(meta);
        self.rebase(id, &path);
    }

    fn rebase(&mut self, id: NodeId, path: &PropertyPath) {
        let children: Vec<NodeId> = id.children(&self.arena).collect();
        for child in children {
            let meta = self.node(child).meta.relocated(path);
            let child_path = meta.path().clone();
            self.node_mut(child).meta = Rc::new(meta);
            self.rebase(child, &child_path);
        }
    }
}
