//! Reflection over the object model: reading and writing through a
//! [`PropertyPath`], deciding which members are serializable, and producing
//! zero values for new elements.

use crate::{
    AccessError, Attribute, Def, MemberDef, MemberKind, ObjectRef, PathStep, PropertyPath,
    ScalarKind, TypeHandle, TypeRegistry, Value, Visibility,
};

/// Read the value at `path`, starting from `root`.
///
/// The empty path yields the root object itself.
pub fn read_path(root: &ObjectRef, path: &PropertyPath) -> Result<Value, AccessError> {
    let mut current = Value::Object(root.clone());
    for (step_index, step) in path.steps().iter().enumerate() {
        current = step_into(&current, step, path, step_index)?;
    }
    Ok(current)
}

fn step_into(
    current: &Value,
    step: &PathStep,
    path: &PropertyPath,
    step_index: usize,
) -> Result<Value, AccessError> {
    match (step, current) {
        (PathStep::Field(name), Value::Object(obj)) => {
            obj.get(name).ok_or_else(|| AccessError::NoSuchField {
                path: path.clone(),
                step_index,
            })
        }
        (PathStep::Index(index), Value::Array(items)) => {
            items
                .get(*index)
                .cloned()
                .ok_or_else(|| AccessError::IndexOutOfBounds {
                    path: path.clone(),
                    step_index,
                    index: *index,
                    len: items.len(),
                })
        }
        (_, Value::Null) => Err(AccessError::NullReference {
            path: path.clone(),
            step_index,
        }),
        (_, other) => Err(AccessError::WrongStepKind {
            path: path.clone(),
            step_index,
            found: other.kind(),
        }),
    }
}

/// Write `value` at `path`, starting from `root`.
///
/// Objects are updated in place. Arrays are fixed-length storage, so writing
/// an element allocates a new array and stores it back into its owner.
pub fn write_path(root: &ObjectRef, path: &PropertyPath, value: Value) -> Result<(), AccessError> {
    if path.is_empty() {
        return Err(AccessError::EmptyPath);
    }
    let container = Value::Object(root.clone());
    // The root is an object, so it is always updated in place.
    write_into(&container, path, 0, value).map(|_| ())
}

/// Returns the replacement for `container` when it had to be reallocated.
fn write_into(
    container: &Value,
    path: &PropertyPath,
    step_index: usize,
    value: Value,
) -> Result<Option<Value>, AccessError> {
    let step = &path.steps()[step_index];
    let last = step_index + 1 == path.len();

    match (step, container) {
        (PathStep::Field(name), Value::Object(obj)) => {
            if last {
                obj.set(name, value).ok_or_else(|| AccessError::NoSuchField {
                    path: path.clone(),
                    step_index,
                })?;
                return Ok(None);
            }
            let child = step_into(container, step, path, step_index)?;
            if let Some(replacement) = write_into(&child, path, step_index + 1, value)? {
                obj.set(name, replacement);
            }
            Ok(None)
        }
        (PathStep::Index(index), Value::Array(items)) => {
            let index = *index;
            if index >= items.len() {
                return Err(AccessError::IndexOutOfBounds {
                    path: path.clone(),
                    step_index,
                    index,
                    len: items.len(),
                });
            }
            let mut copy = items.to_vec();
            if last {
                copy[index] = value;
            } else if let Some(replacement) = write_into(&copy[index], path, step_index + 1, value)? {
                copy[index] = replacement;
            }
            Ok(Some(Value::Array(copy.into())))
        }
        (_, Value::Null) => Err(AccessError::NullReference {
            path: path.clone(),
            step_index,
        }),
        (_, other) => Err(AccessError::WrongStepKind {
            path: path.clone(),
            step_index,
            found: other.kind(),
        }),
    }
}

/// Decides which members of a type are serializable, and in what order.
pub trait Eligibility {
    /// The serializable members of `ty`, in declaration order (inherited
    /// members first).
    fn serializable_members<'r>(
        &self,
        registry: &'r TypeRegistry,
        ty: TypeHandle,
    ) -> Vec<&'r MemberDef>;
}

/// Host-style serialization rules:
///
/// - fields are serialized when public or marked [`Attribute::SerializeField`],
/// - properties only when readable and marked [`Attribute::ShowInInspector`],
/// - nothing marked [`Attribute::NonSerialized`] is.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializationRules;

impl SerializationRules {
    /// Whether a single member passes the rules.
    pub fn is_eligible(member: &MemberDef) -> bool {
        let has = |attr: &Attribute| member.attributes.contains(attr);
        if has(&Attribute::NonSerialized) {
            return false;
        }
        match member.kind {
            MemberKind::Field => {
                member.visibility == Visibility::Public || has(&Attribute::SerializeField)
            }
            MemberKind::Property => member.readable && has(&Attribute::ShowInInspector),
        }
    }
}

impl Eligibility for SerializationRules {
    fn serializable_members<'r>(
        &self,
        registry: &'r TypeRegistry,
        ty: TypeHandle,
    ) -> Vec<&'r MemberDef> {
        registry
            .members(ty)
            .into_iter()
            .filter(|member| Self::is_eligible(member))
            .collect()
    }
}

/// Produces the value a freshly added array element starts with.
pub trait DefaultValues {
    /// A construction-appropriate zero value for `ty`.
    fn default_value(&self, registry: &TypeRegistry, ty: TypeHandle) -> Value;
}

/// Zero values: `false`, `0`, `0.0`, `""`, empty arrays, null host-object
/// references, and new instances of plain composites.
///
/// Plain composites nest at most `max_depth` levels; deeper members start
/// out null so self-referential types terminate.
#[derive(Debug, Clone, Copy)]
pub struct ZeroDefaults {
    max_depth: usize,
}

impl ZeroDefaults {
    /// Default nesting limit for plain composites.
    pub const MAX_DEPTH: usize = 7;

    /// Zero values with the default nesting limit.
    pub const fn new() -> Self {
        Self {
            max_depth: Self::MAX_DEPTH,
        }
    }

    /// Zero values with a custom nesting limit.
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    fn zero(&self, registry: &TypeRegistry, ty: TypeHandle, depth: usize) -> Value {
        match &registry.get(ty).def {
            Def::Scalar(ScalarKind::Bool) => Value::Bool(false),
            Def::Scalar(ScalarKind::Int) => Value::Int(0),
            Def::Scalar(ScalarKind::Float) => Value::Float(0.0),
            Def::Scalar(ScalarKind::String) => Value::String(String::new()),
            Def::Array(_) => Value::array([]),
            Def::Composite(_) if registry.is_host_object(ty) || depth > self.max_depth => {
                Value::Null
            }
            Def::Composite(_) => Value::Object(self.instance(registry, ty, depth)),
        }
    }

    pub(crate) fn instance(&self, registry: &TypeRegistry, ty: TypeHandle, depth: usize) -> ObjectRef {
        let fields: Vec<(String, Value)> = registry
            .members(ty)
            .into_iter()
            .map(|member| (member.name.clone(), self.zero(registry, member.ty, depth + 1)))
            .collect();
        ObjectRef::new(ty, fields)
    }
}

impl Default for ZeroDefaults {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultValues for ZeroDefaults {
    fn default_value(&self, registry: &TypeRegistry, ty: TypeHandle) -> Value {
        self.zero(registry, ty, 0)
    }
}
