//! The host's type universe: scalars, composites and arrays, plus the
//! subtype table used to resolve a common type for several targets.
//!
//! A [`TypeRegistry`] is filled once by the host and then shared (behind an
//! `Rc`) by every tree built over it. Types are addressed by [`TypeHandle`].

use core::fmt;
use std::collections::HashMap;

use crate::{Attribute, ObjectRef, Value, ZeroDefaults};

/// Handle to a type registered in a [`TypeRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeHandle(u32);

impl TypeHandle {
    /// Root of every host-object type (instances the host tracks by identity).
    pub const OBJECT: Self = Self(0);
    /// `bool`
    pub const BOOL: Self = Self(1);
    /// 64-bit signed integer.
    pub const INT: Self = Self(2);
    /// 64-bit float.
    pub const FLOAT: Self = Self(3);
    /// UTF-8 string.
    pub const STRING: Self = Self(4);

    /// Position of this type in its registry.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of scalar stored in a leaf member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `bool`
    Bool,
    /// Signed integer.
    Int,
    /// Floating point.
    Float,
    /// String.
    String,
}

/// What a type is made of.
#[derive(Debug, Clone)]
pub enum Def {
    /// A leaf value.
    Scalar(ScalarKind),
    /// A composite with named members, declared in order.
    Composite(Vec<MemberDef>),
    /// A homogeneous array of the element type.
    Array(TypeHandle),
}

/// A registered type.
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Display name.
    pub name: String,
    /// Structure of the type.
    pub def: Def,
    /// Direct supertypes (base type first, then interfaces).
    pub supertypes: Vec<TypeHandle>,
}

/// Whether a member is a stored field or an accessor property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// A stored field.
    Field,
    /// An accessor property.
    Property,
}

/// Declared visibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Visible to host serialization by default.
    Public,
    /// Only serialized when explicitly opted in.
    Private,
}

/// A member declared on a composite type.
#[derive(Debug, Clone)]
pub struct MemberDef {
    /// Member name, used as the path step.
    pub name: String,
    /// Declared type.
    pub ty: TypeHandle,
    /// Field or property.
    pub kind: MemberKind,
    /// Declared visibility.
    pub visibility: Visibility,
    /// Whether the member can be read.
    pub readable: bool,
    /// Whether the member can be written.
    pub writable: bool,
    /// Attributes attached by the host.
    pub attributes: Vec<Attribute>,
}

impl MemberDef {
    /// A public, read-write field.
    pub fn field(name: impl Into<String>, ty: TypeHandle) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: MemberKind::Field,
            visibility: Visibility::Public,
            readable: true,
            writable: true,
            attributes: Vec::new(),
        }
    }

    /// A public, read-write property.
    pub fn property(name: impl Into<String>, ty: TypeHandle) -> Self {
        Self {
            kind: MemberKind::Property,
            ..Self::field(name, ty)
        }
    }

    /// Mark the member private.
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Mark the member read-only.
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Attach an attribute.
    pub fn with(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// The set of types known to the host.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: Vec<TypeDef>,
    arrays: HashMap<TypeHandle, TypeHandle>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// A registry holding only the built-in types.
    pub fn new() -> Self {
        let builtin = |name: &str, def: Def| TypeDef {
            name: name.to_string(),
            def,
            supertypes: Vec::new(),
        };
        Self {
            types: vec![
                builtin("Object", Def::Composite(Vec::new())),
                builtin("bool", Def::Scalar(ScalarKind::Bool)),
                builtin("int", Def::Scalar(ScalarKind::Int)),
                builtin("float", Def::Scalar(ScalarKind::Float)),
                builtin("string", Def::Scalar(ScalarKind::String)),
            ],
            arrays: HashMap::new(),
        }
    }

    fn push(&mut self, def: TypeDef) -> TypeHandle {
        let handle = TypeHandle(self.types.len() as u32);
        self.types.push(def);
        handle
    }

    /// Start declaring a composite type.
    pub fn composite(&mut self, name: impl Into<String>) -> CompositeBuilder<'_> {
        CompositeBuilder {
            registry: self,
            slot: None,
            def: TypeDef {
                name: name.into(),
                def: Def::Composite(Vec::new()),
                supertypes: Vec::new(),
            },
        }
    }

    /// Reserve a handle for a composite whose members are given later with
    /// [`TypeRegistry::define`]. This is how self-referential types are built.
    pub fn declare(&mut self, name: impl Into<String>) -> TypeHandle {
        self.push(TypeDef {
            name: name.into(),
            def: Def::Composite(Vec::new()),
            supertypes: Vec::new(),
        })
    }

    /// Fill in a type reserved with [`TypeRegistry::declare`].
    pub fn define(&mut self, ty: TypeHandle) -> CompositeBuilder<'_> {
        let name = self.name(ty).to_string();
        CompositeBuilder {
            registry: self,
            slot: Some(ty),
            def: TypeDef {
                name,
                def: Def::Composite(Vec::new()),
                supertypes: Vec::new(),
            },
        }
    }

    /// The array type with the given element type, registered on first use.
    pub fn array_of(&mut self, element: TypeHandle) -> TypeHandle {
        if let Some(&handle) = self.arrays.get(&element) {
            return handle;
        }
        let name = format!("{}[]", self.name(element));
        let handle = self.push(TypeDef {
            name,
            def: Def::Array(element),
            supertypes: Vec::new(),
        });
        self.arrays.insert(element, handle);
        handle
    }

    /// Look up a type. Panics on a handle from another registry.
    pub fn get(&self, ty: TypeHandle) -> &TypeDef {
        &self.types[ty.index()]
    }

    /// Display name of a type.
    pub fn name(&self, ty: TypeHandle) -> &str {
        &self.get(ty).name
    }

    /// Element type of an array type.
    pub fn element_type(&self, ty: TypeHandle) -> Option<TypeHandle> {
        match self.get(ty).def {
            Def::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Whether a value of type `derived` can be stored where `base` is
    /// expected: the types are equal, or `base` is reachable through
    /// `derived`'s supertypes.
    pub fn is_assignable_from(&self, base: TypeHandle, derived: TypeHandle) -> bool {
        if base == derived {
            return true;
        }
        let mut stack = vec![derived];
        let mut visited = Vec::new();
        while let Some(ty) = stack.pop() {
            if visited.contains(&ty) {
                continue;
            }
            visited.push(ty);
            for &parent in &self.get(ty).supertypes {
                if parent == base {
                    return true;
                }
                stack.push(parent);
            }
        }
        false
    }

    /// Whether instances of `ty` are host objects.
    pub fn is_host_object(&self, ty: TypeHandle) -> bool {
        self.is_assignable_from(TypeHandle::OBJECT, ty)
    }

    /// Every member of a composite, inherited members first.
    ///
    /// A member redeclared by a subtype replaces the inherited one in place.
    pub fn members(&self, ty: TypeHandle) -> Vec<&MemberDef> {
        let mut out: Vec<&MemberDef> = Vec::new();
        self.collect_members(ty, &mut out, &mut Vec::new());
        out
    }

    fn collect_members<'r>(
        &'r self,
        ty: TypeHandle,
        out: &mut Vec<&'r MemberDef>,
        visited: &mut Vec<TypeHandle>,
    ) {
        if visited.contains(&ty) {
            return;
        }
        visited.push(ty);

        let def = self.get(ty);
        for &parent in &def.supertypes {
            self.collect_members(parent, out, visited);
        }
        if let Def::Composite(members) = &def.def {
            for member in members {
                match out.iter().position(|m| m.name == member.name) {
                    Some(pos) => out[pos] = member,
                    None => out.push(member),
                }
            }
        }
    }

    /// Whether `value` may be stored in a slot declared as `ty`.
    pub fn accepts(&self, ty: TypeHandle, value: &Value) -> bool {
        match (&self.get(ty).def, value) {
            (Def::Scalar(ScalarKind::Bool), Value::Bool(_))
            | (Def::Scalar(ScalarKind::Int), Value::Int(_))
            | (Def::Scalar(ScalarKind::Float), Value::Float(_))
            | (Def::Scalar(ScalarKind::String), Value::String(_)) => true,
            (Def::Composite(_), Value::Null) => true,
            (Def::Composite(_), Value::Object(obj)) => self.is_assignable_from(ty, obj.ty()),
            (Def::Array(element), Value::Array(items)) => {
                items.iter().all(|item| self.accepts(*element, item))
            }
            _ => false,
        }
    }

    /// A fresh instance of a composite with every member set to its zero
    /// value (see [`ZeroDefaults`]).
    pub fn instantiate(&self, ty: TypeHandle) -> ObjectRef {
        ZeroDefaults::new().instance(self, ty, 0)
    }
}

/// Builder returned by [`TypeRegistry::composite`].
pub struct CompositeBuilder<'r> {
    registry: &'r mut TypeRegistry,
    slot: Option<TypeHandle>,
    def: TypeDef,
}

impl CompositeBuilder<'_> {
    /// Add a supertype. Call it first with the base type, then with
    /// interfaces.
    pub fn extends(mut self, parent: TypeHandle) -> Self {
        self.def.supertypes.push(parent);
        self
    }

    /// Make the type a host object.
    pub fn host_object(self) -> Self {
        self.extends(TypeHandle::OBJECT)
    }

    /// Add a public read-write field.
    pub fn field(self, name: impl Into<String>, ty: TypeHandle) -> Self {
        self.member(MemberDef::field(name, ty))
    }

    /// Add any member.
    pub fn member(mut self, member: MemberDef) -> Self {
        if let Def::Composite(members) = &mut self.def.def {
            members.push(member);
        }
        self
    }

    /// Register the type.
    pub fn build(self) -> TypeHandle {
        match self.slot {
            Some(ty) => {
                self.registry.types[ty.index()] = self.def;
                ty
            }
            None => self.registry.push(self.def),
        }
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
