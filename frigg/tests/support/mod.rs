//! Fixtures shared by the integration tests: a small type zoo, a `Ui` that
//! records every widget call, and a store that counts its brackets.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use frigg::{
    AccessError, Area, Assign, Attribute, Edit, ListControls, ListGesture, MemberDef, MessageKind,
    ObjectRef, PropertyTree, PropertyView, SerializedField, SerializedObject, SerializedStore,
    TypeHandle, TypeRegistry, Ui, Value,
};

pub struct Zoo {
    pub registry: Rc<TypeRegistry>,
    pub entity: TypeHandle,
    pub unit: TypeHandle,
    pub hero: TypeHandle,
    pub prop: TypeHandle,
    pub weapon: TypeHandle,
    pub stats: TypeHandle,
}

/// `Entity <- Unit <- Hero` are host objects, `Prop` is an unrelated host
/// object, `Weapon` and `Stats` are plain composites.
pub fn zoo() -> Zoo {
    let mut registry = TypeRegistry::new();
    let weapon = registry
        .composite("Weapon")
        .field("name", TypeHandle::STRING)
        .field("damage", TypeHandle::INT)
        .build();
    let stats = registry
        .composite("Stats")
        .field("power", TypeHandle::INT)
        .build();
    let ints = registry.array_of(TypeHandle::INT);
    let weapons = registry.array_of(weapon);
    let entity = registry
        .composite("Entity")
        .host_object()
        .member(
            MemberDef::field("name", TypeHandle::STRING).with(Attribute::Required { message: None }),
        )
        .build();
    let unit = registry
        .composite("Unit")
        .extends(entity)
        .field("hp", TypeHandle::INT)
        .field("scores", ints)
        .field("weapons", weapons)
        .field("stats", stats)
        .field("target", TypeHandle::OBJECT)
        .member(MemberDef::field("secret", TypeHandle::INT).private())
        .member(
            MemberDef::property("label", TypeHandle::STRING)
                .read_only()
                .with(Attribute::ShowInInspector),
        )
        .build();
    let hero = registry
        .composite("Hero")
        .extends(unit)
        .field("level", TypeHandle::INT)
        .build();
    let prop = registry
        .composite("Prop")
        .host_object()
        .field("mass", TypeHandle::FLOAT)
        .build();

    Zoo {
        registry: Rc::new(registry),
        entity,
        unit,
        hero,
        prop,
        weapon,
        stats,
    }
}

impl Zoo {
    /// A unit with a name, hit points and scores.
    pub fn unit_with(&self, name: &str, hp: i64, scores: &[i64]) -> ObjectRef {
        self.registry
            .instantiate(self.unit)
            .with("name", name)
            .with("hp", hp)
            .with("scores", ints(scores))
    }

    pub fn weapon(&self, name: &str, damage: i64) -> Value {
        Value::Object(
            self.registry
                .instantiate(self.weapon)
                .with("name", name)
                .with("damage", damage),
        )
    }

    /// A tree over `targets` with default collaborators.
    pub fn tree(&self, targets: &[&ObjectRef]) -> PropertyTree {
        PropertyTree::init(self.registry.clone(), objects(targets)).unwrap()
    }
}

pub fn ints(values: &[i64]) -> Value {
    Value::array(values.iter().copied().map(Value::Int))
}

pub fn objects(targets: &[&ObjectRef]) -> Vec<Value> {
    targets.iter().map(|&t| Value::Object(t.clone())).collect()
}

/// The integers stored in an array field.
pub fn read_ints(target: &ObjectRef, field: &str) -> Vec<i64> {
    target
        .get(field)
        .and_then(|v| v.as_array().cloned())
        .map(|items| items.iter().filter_map(Value::as_int).collect())
        .unwrap_or_default()
}

/// The paths of the given nodes, as strings.
pub fn paths(tree: &PropertyTree, ids: impl IntoIterator<Item = frigg::PropertyId>) -> Vec<String> {
    ids.into_iter()
        .map(|id| tree.property(id).unwrap().meta().path().to_string())
        .collect()
}

/// A `Ui` that logs every call and replays scripted edits and gestures.
#[derive(Default)]
pub struct RecordingUi {
    pub events: Vec<String>,
    pub areas: Vec<(String, Area)>,
    edits: HashMap<String, Value>,
    gestures: HashMap<String, ListGesture>,
    collapsed: HashSet<String>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `value` as typed into the field at `path` on the next draw.
    pub fn edit(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        self.edits.insert(path.to_string(), value.into());
        self
    }

    /// Report `gesture` from the list at `path` on the next draw.
    pub fn gesture(&mut self, path: &str, gesture: ListGesture) -> &mut Self {
        self.gestures.insert(path.to_string(), gesture);
        self
    }

    /// Keep the foldout at `path` closed.
    pub fn collapse(&mut self, path: &str) -> &mut Self {
        self.collapsed.insert(path.to_string());
        self
    }

    /// Events since the last call, one per line.
    pub fn take(&mut self) -> String {
        self.areas.clear();
        core::mem::take(&mut self.events).join("\n")
    }

    fn log(&mut self, event: String, area: Area) {
        self.areas.push((event.clone(), area));
        self.events.push(event);
    }
}

fn describe(view: &PropertyView) -> String {
    if view.is_mixed() {
        return "<mixed>".to_string();
    }
    match view.value() {
        Some(value) => value.to_string(),
        None => "<unresolved>".to_string(),
    }
}

impl Ui for RecordingUi {
    fn property_field(&mut self, view: &PropertyView, area: Area) -> Edit {
        let path = view.meta().path().to_string();
        self.log(format!("field {path} = {}", describe(view)), area);
        match self.edits.remove(&path) {
            Some(value) => Edit::Changed(value),
            None => Edit::Unchanged,
        }
    }

    fn foldout(&mut self, view: &PropertyView, area: Area) -> bool {
        let path = view.meta().path().to_string();
        self.log(format!("foldout {path}"), area);
        !self.collapsed.contains(&path)
    }

    fn help_box(&mut self, message: &str, kind: MessageKind, area: Area) {
        self.log(format!("help {kind:?} {message}"), area);
    }

    fn list_header(&mut self, _view: &PropertyView, label: &str, area: Area) {
        self.log(format!("header {label}"), area);
    }

    fn list_controls(
        &mut self,
        view: &PropertyView,
        controls: &ListControls,
        area: Area,
    ) -> ListGesture {
        let path = view.meta().path().to_string();
        self.log(
            format!(
                "controls {path} count={} active={:?}",
                controls.count, controls.active
            ),
            area,
        );
        self.gestures.remove(&path).unwrap_or_default()
    }

    fn begin_layout(&mut self, name: &str) {
        self.log(format!("begin {name}"), Area::Auto);
    }

    fn end_layout(&mut self, name: &str) {
        self.log(format!("end {name}"), Area::Auto);
    }
}

/// What a [`CountingStore`] saw.
#[derive(Debug, Default)]
pub struct Counts {
    pub begins: usize,
    pub applies: usize,
    pub writes: Vec<String>,
}

/// A [`SerializedObject`] that counts brackets and logs written paths.
pub struct CountingStore {
    inner: SerializedObject,
    counts: Rc<RefCell<Counts>>,
}

impl CountingStore {
    pub fn new(registry: Rc<TypeRegistry>, targets: &[&ObjectRef]) -> (Self, Rc<RefCell<Counts>>) {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let targets = targets.iter().map(|&t| t.clone()).collect();
        let store = Self {
            inner: SerializedObject::new(registry, targets),
            counts: counts.clone(),
        };
        (store, counts)
    }
}

impl SerializedStore for CountingStore {
    fn targets(&self) -> &[ObjectRef] {
        self.inner.targets()
    }

    fn begin_update(&mut self) {
        self.counts.borrow_mut().begins += 1;
        self.inner.begin_update();
    }

    fn apply_changes(&mut self) -> Result<bool, AccessError> {
        self.counts.borrow_mut().applies += 1;
        self.inner.apply_changes()
    }

    fn find_field(&self, path: &frigg::PropertyPath) -> Option<SerializedField> {
        self.inner.find_field(path)
    }

    fn read(&self, field: &SerializedField) -> Result<Vec<Value>, AccessError> {
        self.inner.read(field)
    }

    fn write(&mut self, field: &SerializedField, assign: Assign) -> Result<(), AccessError> {
        self.counts.borrow_mut().writes.push(field.path().to_string());
        self.inner.write(field, assign)
    }
}
