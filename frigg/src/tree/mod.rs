//! The property tree: a node per serializable member position across one
//! or more targets, kept in sync with the targets through an optional
//! [`SerializedStore`].

use std::rc::Rc;

use indextree::{Arena, NodeId};

use crate::reflect::{read_path, write_path};
use crate::{
    AccessError, Assign, AttributeLookup, DefaultValues, Eligibility, FriggProperty, Layout,
    Metrics, ObjectRef, PropertyId, PropertyMeta, PropertyPath, PropertyValue, PropertyView,
    ResizeStrategy, SerializedStore, TreeError, TypeHandle, TypeRegistry, Value,
};
use crate::{debug, trace};

mod build;
pub use build::*;

mod draw;
mod edit;

/// Tunables for building and drawing a tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeOptions {
    /// Plain composites nested deeper than this are drawn as single fields
    /// without children. Guards self-referential types.
    pub max_depth: usize,
    /// Sizes used by the height contract.
    pub metrics: Metrics,
}

impl TreeOptions {
    /// Default for [`TreeOptions::max_depth`].
    pub const MAX_DEPTH: usize = 7;
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::MAX_DEPTH,
            metrics: Metrics::default(),
        }
    }
}

/// Where a tree is in its draw / update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Between cycles.
    Idle,
    /// The store's image was refreshed; nothing drawn yet.
    Updating,
    /// Properties are being drawn and edited.
    Drawing,
    /// Every node is being pulled from the store.
    RefreshingAll,
    /// Pending writes are being published to the targets.
    Committing,
}

/// A tree of editable properties over one or more target objects.
///
/// Build one with [`PropertyTree::init`] or [`PropertyTree::builder`], then
/// call [`PropertyTree::draw`] every frame, or [`PropertyTree::update_tree`]
/// to re-read every value without drawing.
pub struct PropertyTree {
    registry: Rc<TypeRegistry>,
    targets: Vec<ObjectRef>,
    target_type: TypeHandle,
    store: Option<Box<dyn SerializedStore>>,
    arena: Arena<FriggProperty>,
    root: NodeId,
    layouts: Vec<Layout>,
    eligibility: Box<dyn Eligibility>,
    defaults: Box<dyn DefaultValues>,
    attributes: Box<dyn AttributeLookup>,
    strategy: Box<dyn ResizeStrategy>,
    options: TreeOptions,
    phase: Phase,
}

impl PropertyTree {
    /// The root property, standing for the targets themselves.
    pub fn root(&self) -> PropertyId {
        PropertyId(self.root)
    }

    /// The type registry the tree reflects over.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The edited objects, in order.
    pub fn targets(&self) -> &[ObjectRef] {
        &self.targets
    }

    /// The common type of the targets.
    pub fn target_type(&self) -> TypeHandle {
        self.target_type
    }

    /// The bound store, if the targets are host objects or one was given.
    pub fn store(&self) -> Option<&dyn SerializedStore> {
        self.store.as_deref()
    }

    /// Layout groups of root members, in order of first appearance.
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    /// The options the tree was built with.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Current cycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Look up a node.
    pub fn property(&self, id: PropertyId) -> Result<&FriggProperty, TreeError> {
        self.check(id)?;
        Ok(self.arena[id.0].get())
    }

    /// The containing property, or `None` for the root.
    pub fn parent(&self, id: PropertyId) -> Result<Option<PropertyId>, TreeError> {
        self.check(id)?;
        Ok(self.arena[id.0].parent().map(PropertyId))
    }

    /// Child properties in order.
    pub fn children(
        &self,
        id: PropertyId,
    ) -> Result<impl Iterator<Item = PropertyId> + '_, TreeError> {
        self.check(id)?;
        Ok(id.0.children(&self.arena).map(PropertyId))
    }

    /// The child at `index`.
    pub fn child(&self, id: PropertyId, index: usize) -> Result<Option<PropertyId>, TreeError> {
        Ok(self.children(id)?.nth(index))
    }

    /// Number of children.
    pub fn child_count(&self, id: PropertyId) -> Result<usize, TreeError> {
        Ok(self.children(id)?.count())
    }

    /// Walk the tree below the root.
    ///
    /// Shallow enumeration yields the root's children in order. Deep
    /// enumeration yields every node below the root in pre-order (each child
    /// followed by its whole subtree).
    pub fn enumerate_tree(&self, deep: bool) -> impl Iterator<Item = PropertyId> + '_ {
        let shallow = (!deep)
            .then(|| self.root.children(&self.arena))
            .into_iter()
            .flatten();
        let nested = deep
            .then(|| self.root.descendants(&self.arena).skip(1))
            .into_iter()
            .flatten();
        shallow.chain(nested).map(PropertyId)
    }

    /// The node at `path`, if the tree has one.
    pub fn find(&self, path: &PropertyPath) -> Option<PropertyId> {
        self.root
            .descendants(&self.arena)
            .find(|&id| self.arena[id].get().meta.path() == path)
            .map(PropertyId)
    }

    /// The node at a textual path such as `items[2].name`.
    pub fn find_by_path(&self, path: &str) -> Option<PropertyId> {
        self.find(&PropertyPath::parse(path).ok()?)
    }

    fn check(&self, id: PropertyId) -> Result<(), TreeError> {
        if id.0.is_removed(&self.arena) {
            return Err(TreeError::StaleProperty(id));
        }
        Ok(())
    }

    fn node(&self, id: NodeId) -> &FriggProperty {
        self.arena[id].get()
    }

    fn node_mut(&mut self, id: NodeId) -> &mut FriggProperty {
        self.arena[id].get_mut()
    }

    /// Snapshot handed to widgets and decorators.
    pub(crate) fn view(&self, id: NodeId) -> PropertyView {
        let node = self.node(id);
        PropertyView {
            meta: node.meta.clone(),
            value: node.value.clone(),
            kind: node.kind.tag(),
            depth: node.depth,
            expanded: node.is_expanded,
            read_only: !node.meta.is_writable(),
        }
    }

    /// Read `path` in every target, through the store when there is one.
    /// `None` when it does not resolve in all of them.
    fn read_values(&self, path: &PropertyPath) -> Option<Vec<Value>> {
        match &self.store {
            Some(store) => {
                let field = store.find_field(path)?;
                store.read(&field).ok()
            }
            None => self
                .targets
                .iter()
                .map(|target| read_path(target, path).ok())
                .collect(),
        }
    }

    fn write_values(&mut self, path: &PropertyPath, assign: Assign) -> Result<(), AccessError> {
        trace!("writing `{}`", path);
        match &mut self.store {
            Some(store) => {
                let field = store
                    .find_field(path)
                    .ok_or_else(|| AccessError::Unresolved { path: path.clone() })?;
                store.write(&field, assign)
            }
            None => {
                for (index, target) in self.targets.iter().enumerate() {
                    write_path(target, path, assign.value_for(index, path)?)?;
                }
                Ok(())
            }
        }
    }

    /// Re-read a node's value. Array nodes also refresh their cached
    /// backing containers.
    fn pull(&mut self, id: NodeId) {
        let path = self.node(id).meta.path().clone();
        let values = self.read_values(&path);
        let node = self.node_mut(id);
        if let Some(list) = node.list_mut() {
            list.set_backing(values.as_deref().unwrap_or_default());
        }
        node.value = match values {
            Some(values) => PropertyValue::resolved(values),
            None => {
                trace!("`{}` did not resolve", path);
                PropertyValue::unresolved()
            }
        };
    }

    /// Pull a node and its whole subtree, growing or shrinking array
    /// children to match the current lengths.
    fn refresh(&mut self, id: NodeId) {
        self.pull(id);
        if self.node(id).list().is_some() {
            self.sync_elements(id);
        }
        let children: Vec<NodeId> = id.children(&self.arena).collect();
        for child in children {
            self.refresh(child);
        }
    }

    /// Give an array node exactly one child per element.
    fn sync_elements(&mut self, id: NodeId) {
        let Some(list) = self.node(id).list() else {
            return;
        };
        let len = list.len();
        let element_type = list.element_type();
        let path = self.node(id).meta.path().clone();
        let depth = self.node(id).depth;

        let children: Vec<NodeId> = id.children(&self.arena).collect();
        if children.len() != len {
            debug!(
                "`{}`: {} element node(s) for {} element(s)",
                path,
                children.len(),
                len
            );
        }
        for &extra in children.iter().skip(len) {
            extra.remove_subtree(&mut self.arena);
        }
        for index in children.len()..len {
            let meta = PropertyMeta::element(element_type, &path, index);
            let child = self.build_node(meta, depth + 1);
            id.append(child, &mut self.arena);
        }
    }

    /// Re-read every value, then commit. Array children are rebuilt to match
    /// external length changes.
    pub fn update_tree(&mut self) -> Result<(), TreeError> {
        debug!("updating every property");
        self.bracketed(Phase::RefreshingAll, |tree| {
            tree.refresh(tree.root);
            Ok(())
        })
    }

    /// Run `f` inside a begin_update / apply_changes pair, unless a cycle is
    /// already running.
    fn bracketed<R>(
        &mut self,
        phase: Phase,
        f: impl FnOnce(&mut Self) -> Result<R, TreeError>,
    ) -> Result<R, TreeError> {
        if self.phase != Phase::Idle {
            return f(self);
        }

        self.phase = Phase::Updating;
        if let Some(store) = &mut self.store {
            store.begin_update();
        }
        self.phase = phase;

        let result = f(self).and_then(|value| {
            self.phase = Phase::Committing;
            if let Some(store) = &mut self.store {
                store.apply_changes()?;
            }
            Ok(value)
        });
        self.phase = Phase::Idle;
        result
    }
}

impl core::fmt::Debug for PropertyTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyTree")
            .field("target_type", &self.registry.name(self.target_type))
            .field("targets", &self.targets.len())
            .field("nodes", &self.arena.count())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
