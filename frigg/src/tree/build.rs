use std::rc::Rc;

use indextree::{Arena, NodeId};

use crate::{
    AttributeLookup, Def, DecoratorChain, DefaultValues, Eligibility, FriggProperty, InitError,
    Layout, MemberAttributes, MemberDef, Metrics, NodeKind, ObjectRef, PropertyId, PropertyKind,
    PropertyMeta, PropertyPath, PropertyTree, Reallocate, ReorderableList, ResizeStrategy,
    SerializationRules, SerializedObject, SerializedStore, TypeHandle, TypeRegistry, Value,
    ZeroDefaults, layout_group, list_settings,
};
use crate::debug;

use super::{Phase, TreeOptions};

/// Configures and builds a [`PropertyTree`].
pub struct TreeBuilder {
    registry: Rc<TypeRegistry>,
    targets: Vec<Value>,
    store: Option<Box<dyn SerializedStore>>,
    eligibility: Box<dyn Eligibility>,
    defaults: Box<dyn DefaultValues>,
    attributes: Box<dyn AttributeLookup>,
    strategy: Box<dyn ResizeStrategy>,
    options: TreeOptions,
}

impl TreeBuilder {
    /// Start building a tree over `targets`.
    pub fn new(registry: Rc<TypeRegistry>, targets: impl IntoIterator<Item = Value>) -> Self {
        Self {
            registry,
            targets: targets.into_iter().collect(),
            store: None,
            eligibility: Box::new(SerializationRules),
            defaults: Box::new(ZeroDefaults::new()),
            attributes: Box::new(MemberAttributes),
            strategy: Box::new(Reallocate),
            options: TreeOptions::default(),
        }
    }

    /// Bind an existing store. Its targets must be the given targets, in the
    /// same order.
    pub fn store(mut self, store: impl SerializedStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Bind an already boxed store.
    pub fn boxed_store(mut self, store: Box<dyn SerializedStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the member eligibility rules.
    pub fn eligibility(mut self, eligibility: impl Eligibility + 'static) -> Self {
        self.eligibility = Box::new(eligibility);
        self
    }

    /// Replace the values given to new array elements.
    pub fn default_values(mut self, defaults: impl DefaultValues + 'static) -> Self {
        self.defaults = Box::new(defaults);
        self
    }

    /// Replace the attribute lookup.
    pub fn attributes(mut self, attributes: impl AttributeLookup + 'static) -> Self {
        self.attributes = Box::new(attributes);
        self
    }

    /// Replace how arrays are resized.
    pub fn resize_strategy(mut self, strategy: impl ResizeStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Nesting limit for plain composites.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Sizes used by the height contract.
    pub fn metrics(mut self, metrics: Metrics) -> Self {
        self.options.metrics = metrics;
        self
    }

    /// Validate the targets and build every node.
    pub fn build(self) -> Result<PropertyTree, InitError> {
        if self.targets.is_empty() {
            return Err(InitError::NoTargets);
        }
        if let Some(store) = &self.store {
            check_store_targets(&self.targets, store.targets())?;
        }
        let targets = objects(&self.targets)?;
        let target_type = common_type(&self.registry, &targets)?;

        let store = match self.store {
            Some(store) => Some(store),
            None if self.registry.is_host_object(target_type) => {
                debug!(
                    "serializing {} target(s) of type {}",
                    targets.len(),
                    self.registry.name(target_type)
                );
                let store = SerializedObject::new(self.registry.clone(), targets.clone());
                Some(Box::new(store) as Box<dyn SerializedStore>)
            }
            None => None,
        };

        let mut arena = Arena::new();
        let root_meta = PropertyMeta::root(self.registry.name(target_type), target_type);
        let root = arena.new_node(FriggProperty::new(root_meta, PropertyKind::Composite, 0));

        let mut tree = PropertyTree {
            registry: self.registry,
            targets,
            target_type,
            store,
            arena,
            root,
            layouts: Vec::new(),
            eligibility: self.eligibility,
            defaults: self.defaults,
            attributes: self.attributes,
            strategy: self.strategy,
            options: self.options,
            phase: Phase::Idle,
        };
        tree.pull(root);
        tree.build_members(root, target_type, &PropertyPath::root(), 0);
        tree.collect_layouts();

        debug!(
            "built a tree of {} node(s) over {} target(s)",
            tree.arena.count(),
            tree.targets.len()
        );
        Ok(tree)
    }
}

fn check_store_targets(targets: &[Value], store_targets: &[ObjectRef]) -> Result<(), InitError> {
    let identical = targets.len() == store_targets.len()
        && targets
            .iter()
            .zip(store_targets)
            .all(|(target, bound)| target.as_object().is_some_and(|obj| obj.ptr_eq(bound)));
    if identical {
        Ok(())
    } else {
        Err(InitError::StoreMismatch {
            targets: targets.len(),
            store_targets: store_targets.len(),
        })
    }
}

fn objects(targets: &[Value]) -> Result<Vec<ObjectRef>, InitError> {
    targets
        .iter()
        .enumerate()
        .map(|(index, target)| match target {
            Value::Object(obj) => Ok(obj.clone()),
            Value::Null => Err(InitError::NullTarget { index }),
            other => Err(InitError::NotAnObject {
                index,
                kind: other.kind(),
            }),
        })
        .collect()
}

/// Narrow the targets to one type. A target whose type is a subtype of the
/// current one is absorbed; a supertype replaces it; anything else is
/// incompatible.
fn common_type(registry: &TypeRegistry, targets: &[ObjectRef]) -> Result<TypeHandle, InitError> {
    let mut current = targets[0].ty();
    for (index, target) in targets.iter().enumerate().skip(1) {
        let ty = target.ty();
        if ty == current || registry.is_assignable_from(current, ty) {
            continue;
        }
        if registry.is_assignable_from(ty, current) {
            current = ty;
            continue;
        }
        return Err(InitError::IncompatibleTargets {
            expected: registry.name(current).to_string(),
            actual: registry.name(ty).to_string(),
            index,
        });
    }
    Ok(current)
}

impl PropertyTree {
    /// Build a tree over `targets` with the default collaborators.
    ///
    /// Host-object targets get a [`SerializedObject`] store; other targets
    /// are edited in place.
    pub fn init(
        registry: Rc<TypeRegistry>,
        targets: impl IntoIterator<Item = Value>,
    ) -> Result<Self, InitError> {
        TreeBuilder::new(registry, targets).build()
    }

    /// Build a tree over the targets of an existing store.
    pub fn init_from_store(
        registry: Rc<TypeRegistry>,
        store: impl SerializedStore + 'static,
    ) -> Result<Self, InitError> {
        let targets: Vec<Value> = store.targets().iter().cloned().map(Value::Object).collect();
        TreeBuilder::new(registry, targets).store(store).build()
    }

    /// Configure a tree before building it.
    pub fn builder(
        registry: Rc<TypeRegistry>,
        targets: impl IntoIterator<Item = Value>,
    ) -> TreeBuilder {
        TreeBuilder::new(registry, targets)
    }

    /// Append one child per serializable member of `ty` under `parent`.
    fn build_members(&mut self, parent: NodeId, ty: TypeHandle, path: &PropertyPath, depth: usize) {
        let members: Vec<MemberDef> = self
            .eligibility
            .serializable_members(&self.registry, ty)
            .into_iter()
            .cloned()
            .collect();
        for member in members {
            let child = self.build_node(PropertyMeta::member(member, path), depth + 1);
            parent.append(child, &mut self.arena);
        }
    }

    /// Create a detached node for `meta`, pull its value and build its
    /// subtree.
    pub(super) fn build_node(&mut self, meta: PropertyMeta, depth: usize) -> NodeId {
        let attributes = self.attributes.attributes(&meta);
        let ty = meta.member_type();
        let kind = match &self.registry.get(ty).def {
            Def::Scalar(_) => PropertyKind::Leaf,
            Def::Array(element) => {
                PropertyKind::Array(ReorderableList::new(*element, list_settings(&attributes)))
            }
            Def::Composite(_)
                if self.registry.is_host_object(ty) || depth >= self.options.max_depth =>
            {
                PropertyKind::Leaf
            }
            Def::Composite(_) => PropertyKind::Composite,
        };
        let path = meta.path().clone();

        let mut node = FriggProperty::new(meta, kind, depth);
        node.decorators = DecoratorChain::from_attributes(&attributes);
        node.is_layout_member = depth == 1 && layout_group(&attributes).is_some();
        let id = self.arena.new_node(node);

        self.pull(id);
        match self.node(id).kind.tag() {
            NodeKind::Composite => self.build_members(id, ty, &path, depth),
            NodeKind::Array => self.sync_elements(id),
            NodeKind::Leaf => {}
        }
        id
    }

    /// Group the layout members under the root by their layout name.
    fn collect_layouts(&mut self) {
        let members: Vec<NodeId> = self
            .root
            .children(&self.arena)
            .filter(|&id| self.node(id).is_layout_member)
            .collect();
        for id in members {
            let attributes = self.attributes.attributes(&self.node(id).meta);
            let Some(name) = layout_group(&attributes) else {
                continue;
            };
            match self.layouts.iter_mut().find(|layout| layout.name() == name) {
                Some(layout) => layout.push(PropertyId(id)),
                None => {
                    let mut layout = Layout::new(name);
                    layout.push(PropertyId(id));
                    self.layouts.push(layout);
                }
            }
        }
    }
}
