//! The dynamic object model edited by property trees.

use core::cell::{Ref, RefCell};
use core::fmt;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::{TypeHandle, TypeRegistry};

/// A value stored in a member slot.
///
/// Objects have reference identity: two [`Value::Object`]s are equal only if
/// they point at the same instance. Arrays are fixed-length; changing their
/// length means allocating a new slice.
#[derive(Clone)]
pub enum Value {
    /// A null object reference.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    String(String),
    /// A reference to a composite instance.
    Object(ObjectRef),
    /// A fixed-length array.
    Array(Rc<[Value]>),
}

/// The variant of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Null`]
    Null,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Float`]
    Float,
    /// [`Value::String`]
    String,
    /// [`Value::Object`]
    Object,
    /// [`Value::Array`]
    Array,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Build an array value from anything iterable.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
        }
    }

    /// Whether this is the "empty" value of its type: null, `false`, zero,
    /// the empty string or an empty array.
    pub fn is_default(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Float(x) => *x == 0.0,
            Value::String(s) => s.is_empty(),
            Value::Object(_) => false,
            Value::Array(items) => items.is_empty(),
        }
    }

    /// Returns `true` if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float, if this is one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the object reference, if this is one.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Returns the backing slice, if this is an array.
    pub fn as_array(&self) -> Option<&Rc<[Value]>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Copy this value for a serialized snapshot.
    ///
    /// Plain composites are copied (they behave like inline data), host
    /// objects stay shared references. `copies` keeps aliasing and cycles
    /// intact.
    pub(crate) fn detached(&self, registry: &TypeRegistry, copies: &mut CopyMap) -> Value {
        match self {
            Value::Object(obj) if !registry.is_host_object(obj.ty()) => {
                Value::Object(obj.detached_with(registry, copies))
            }
            Value::Array(items) => {
                Value::Array(items.iter().map(|v| v.detached(registry, copies)).collect())
            }
            other => other.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a[..] == b[..],
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Float(x) => write!(f, "Float({x:?})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Object(obj) => write!(f, "{obj:?}"),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Object(obj) => write!(f, "<object #{}>", obj.ty().index()),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

/// The fields of one composite instance.
#[derive(Debug, Clone)]
pub struct Object {
    ty: TypeHandle,
    fields: IndexMap<String, Value>,
}

impl Object {
    /// The runtime type of this instance.
    pub fn ty(&self) -> TypeHandle {
        self.ty
    }

    /// Read a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Iterate over the fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A shared, mutable reference to a composite instance.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    /// Create an instance of `ty` with the given field values.
    pub fn new(ty: TypeHandle, fields: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self(Rc::new(RefCell::new(Object {
            ty,
            fields: fields.into_iter().collect(),
        })))
    }

    /// The runtime type of this instance.
    pub fn ty(&self) -> TypeHandle {
        self.0.borrow().ty
    }

    /// Read a field by name.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().fields.get(name).cloned()
    }

    /// Overwrite an existing field. Returns the previous value, or `None` if
    /// the instance has no such field (nothing is inserted in that case).
    pub fn set(&self, name: &str, value: Value) -> Option<Value> {
        let mut obj = self.0.borrow_mut();
        let slot = obj.fields.get_mut(name)?;
        Some(core::mem::replace(slot, value))
    }

    /// Builder-style [`ObjectRef::set`] for fixtures.
    pub fn with(self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value.into());
        self
    }

    /// Borrow the instance.
    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    /// Whether both references point at the same instance.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Copy this instance and every plain composite reachable from it.
    pub fn detached_copy(&self, registry: &TypeRegistry) -> ObjectRef {
        self.detached_with(registry, &mut CopyMap::new())
    }

    /// Like [`ObjectRef::detached_copy`], reusing (and refreshing) the
    /// copies already recorded in `copies`.
    pub(crate) fn detached_with(&self, registry: &TypeRegistry, copies: &mut CopyMap) -> ObjectRef {
        let copy = copies.copy_of(self);
        if !copies.visited.insert(self.key()) {
            return copy;
        }

        let fields: Vec<(String, Value)> = self
            .0
            .borrow()
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        let detached: IndexMap<String, Value> = fields
            .into_iter()
            .map(|(name, value)| {
                let value = value.detached(registry, copies);
                (name, value)
            })
            .collect();
        copy.0.borrow_mut().fields = detached;
        copy
    }

    fn key(&self) -> ObjectKey {
        Rc::as_ptr(&self.0)
    }
}

type ObjectKey = *const RefCell<Object>;

/// Pairs live instances with their detached copies.
///
/// Detaching an instance that already has a copy refreshes that copy in
/// place, so a copy keeps its identity from one snapshot to the next.
#[derive(Default)]
pub(crate) struct CopyMap {
    /// original -> (original, copy)
    copies: HashMap<ObjectKey, (ObjectRef, ObjectRef)>,
    /// copy -> original
    originals: HashMap<ObjectKey, ObjectRef>,
    /// originals refreshed by the current snapshot
    visited: HashSet<ObjectKey>,
}

impl CopyMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start a snapshot: every original is refreshed again on first visit.
    pub(crate) fn begin(&mut self) {
        self.visited.clear();
    }

    /// Drop the copies of originals the last snapshot did not reach.
    pub(crate) fn retain_visited(&mut self) {
        let visited = &self.visited;
        self.copies.retain(|key, _| visited.contains(key));
        let copies = &self.copies;
        self.originals
            .retain(|_, original| copies.contains_key(&original.key()));
    }

    /// The live instance `copy` was made from.
    pub(crate) fn original_of(&self, copy: &ObjectRef) -> Option<&ObjectRef> {
        self.originals.get(&copy.key())
    }

    /// `value` with every recorded copy replaced by its original, looking
    /// through arrays.
    pub(crate) fn to_originals(&self, value: Value) -> Value {
        match value {
            Value::Object(obj) => match self.original_of(&obj) {
                Some(original) => Value::Object(original.clone()),
                None => Value::Object(obj),
            },
            Value::Array(items) => {
                Value::array(items.iter().map(|item| self.to_originals(item.clone())))
            }
            other => other,
        }
    }

    fn copy_of(&mut self, original: &ObjectRef) -> ObjectRef {
        let key = original.key();
        if let Some((_, copy)) = self.copies.get(&key) {
            return copy.clone();
        }
        let copy = ObjectRef::new(original.ty(), core::iter::empty());
        self.originals.insert(copy.key(), original.clone());
        self.copies.insert(key, (original.clone(), copy.clone()));
        copy
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(obj) => f
                .debug_struct("ObjectRef")
                .field("ty", &obj.ty)
                .field("fields", &obj.fields.keys().collect::<Vec<_>>())
                .finish_non_exhaustive(),
            Err(_) => f.write_str("ObjectRef(<borrowed>)"),
        }
    }
}
