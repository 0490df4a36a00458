use core::fmt;

use crate::{PropertyId, PropertyPath, ValueKind};

/// Errors raised while building a [`PropertyTree`](crate::PropertyTree).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// The target list was empty.
    NoTargets,

    /// A target was null.
    NullTarget {
        /// Position of the null target.
        index: usize,
    },

    /// A target was a scalar or array rather than an object.
    NotAnObject {
        /// Position of the offending target.
        index: usize,
        /// What was found instead.
        kind: ValueKind,
    },

    /// The targets differ in length or identity from the store's targets.
    StoreMismatch {
        /// Number of targets given.
        targets: usize,
        /// Number of targets bound to the store.
        store_targets: usize,
    },

    /// Two targets have types where neither is assignable from the other.
    IncompatibleTargets {
        /// The type resolved from the targets before `index`.
        expected: String,
        /// The type of the target at `index`.
        actual: String,
        /// Position of the incompatible target.
        index: usize,
    },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::NoTargets => write!(f, "there must be at least one target"),
            InitError::NullTarget { index } => write!(f, "target at index {index} was null"),
            InitError::NotAnObject { index, kind } => {
                write!(f, "target at index {index} is a {kind}, not an object")
            }
            InitError::StoreMismatch {
                targets,
                store_targets,
            } => write!(
                f,
                "given targets must be identical in length and content to the store's targets \
                 (got {targets}, store has {store_targets})"
            ),
            InitError::IncompatibleTargets {
                expected,
                actual,
                index,
            } => write!(
                f,
                "expected targets of type {expected}, but got an incompatible target of type \
                 {actual} at index {index}"
            ),
        }
    }
}

impl core::error::Error for InitError {}

/// Errors raised while reading or writing a member through a path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    /// Writes need at least one step; the root itself cannot be replaced.
    EmptyPath,

    /// A named member does not exist on the object at that step.
    NoSuchField {
        /// The full path being resolved.
        path: PropertyPath,
        /// Index of the failing step.
        step_index: usize,
    },

    /// An array index is past the end.
    IndexOutOfBounds {
        /// The full path being resolved.
        path: PropertyPath,
        /// Index of the failing step.
        step_index: usize,
        /// Requested index.
        index: usize,
        /// Array length.
        len: usize,
    },

    /// A step tried to go through a null reference.
    NullReference {
        /// The full path being resolved.
        path: PropertyPath,
        /// Index of the failing step.
        step_index: usize,
    },

    /// The step kind does not apply to the value (e.g. an index on an object).
    WrongStepKind {
        /// The full path being resolved.
        path: PropertyPath,
        /// Index of the failing step.
        step_index: usize,
        /// The kind of value found at that step.
        found: ValueKind,
    },

    /// The store has no field at this path.
    Unresolved {
        /// The path that did not resolve.
        path: PropertyPath,
    },

    /// The member cannot be written.
    ReadOnly {
        /// Path of the member.
        path: PropertyPath,
    },

    /// The value does not fit the member's declared type.
    TypeMismatch {
        /// Path of the member.
        path: PropertyPath,
        /// Name of the declared type.
        expected: String,
        /// Kind of the rejected value.
        found: ValueKind,
    },

    /// A per-target assignment has no value for one of the targets.
    MissingTargetValue {
        /// Path of the member.
        path: PropertyPath,
        /// Position of the target without a value.
        index: usize,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::EmptyPath => write!(f, "cannot write through an empty path"),
            AccessError::NoSuchField { path, step_index } => {
                write!(f, "step {step_index} of `{path}`: no such member")
            }
            AccessError::IndexOutOfBounds {
                path,
                step_index,
                index,
                len,
            } => write!(
                f,
                "step {step_index} of `{path}`: index {index} out of bounds (length {len})"
            ),
            AccessError::NullReference { path, step_index } => {
                write!(f, "step {step_index} of `{path}`: null reference")
            }
            AccessError::WrongStepKind {
                path,
                step_index,
                found,
            } => write!(f, "step {step_index} of `{path}` does not apply to a {found}"),
            AccessError::Unresolved { path } => write!(f, "no serialized field at `{path}`"),
            AccessError::ReadOnly { path } => write!(f, "`{path}` is read-only"),
            AccessError::TypeMismatch {
                path,
                expected,
                found,
            } => write!(f, "`{path}` expects {expected}, got a {found}"),
            AccessError::MissingTargetValue { path, index } => {
                write!(f, "no value for target {index} when writing `{path}`")
            }
        }
    }
}

impl core::error::Error for AccessError {}

/// Errors raised by structural edits on array properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// The property is not an array.
    NotAList {
        /// Path of the property.
        path: PropertyPath,
    },

    /// An element index is outside the current length.
    IndexOutOfBounds {
        /// Path of the array property.
        path: PropertyPath,
        /// Requested index.
        index: usize,
        /// Current length.
        len: usize,
    },
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::NotAList { path } => write!(f, "`{path}` is not an array"),
            ListError::IndexOutOfBounds { path, index, len } => {
                write!(f, "`{path}`: element {index} out of bounds (length {len})")
            }
        }
    }
}

impl core::error::Error for ListError {}

/// Any error returned by a [`PropertyTree`](crate::PropertyTree) operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Building the tree failed.
    Init(InitError),
    /// Reading or writing a member failed.
    Access(AccessError),
    /// A structural edit failed.
    List(ListError),
    /// The handle refers to a node that has been removed from the tree.
    StaleProperty(PropertyId),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Init(e) => write!(f, "{e}"),
            TreeError::Access(e) => write!(f, "{e}"),
            TreeError::List(e) => write!(f, "{e}"),
            TreeError::StaleProperty(id) => write!(f, "property {id:?} is no longer in the tree"),
        }
    }
}

impl core::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            TreeError::Init(e) => Some(e),
            TreeError::Access(e) => Some(e),
            TreeError::List(e) => Some(e),
            TreeError::StaleProperty(_) => None,
        }
    }
}

impl From<InitError> for TreeError {
    fn from(e: InitError) -> Self {
        TreeError::Init(e)
    }
}

impl From<AccessError> for TreeError {
    fn from(e: AccessError) -> Self {
        TreeError::Access(e)
    }
}

impl From<ListError> for TreeError {
    fn from(e: ListError) -> Self {
        TreeError::List(e)
    }
}
