//! The bridge between a property tree and the host's serialized objects.
//!
//! A store keeps a serialized image of its targets. Reads and writes during
//! a cycle go to that image; [`SerializedStore::apply_changes`] publishes the
//! recorded modifications to the live targets in order.

use std::rc::Rc;

use crate::reflect::{read_path, write_path};
use crate::{debug, trace};
use crate::value::CopyMap;
use crate::{AccessError, ObjectRef, PathParseError, PropertyPath, TypeRegistry, Value};

/// A value assignment for a field across every target of a store.
#[derive(Debug, Clone, PartialEq)]
pub enum Assign {
    /// The same value for every target.
    All(Value),
    /// One value per target, in target order.
    PerTarget(Vec<Value>),
}

impl Assign {
    /// The value assigned to target `index`.
    pub fn value_for(&self, index: usize, path: &PropertyPath) -> Result<Value, AccessError> {
        match self {
            Assign::All(value) => Ok(value.clone()),
            Assign::PerTarget(values) => {
                values
                    .get(index)
                    .cloned()
                    .ok_or_else(|| AccessError::MissingTargetValue {
                        path: path.clone(),
                        index,
                    })
            }
        }
    }
}

/// A handle to a field that resolved in every target of a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerializedField {
    path: PropertyPath,
}

impl SerializedField {
    /// Path of the field from the target roots.
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }
}

/// The host's serialization bridge.
///
/// All reads happen after [`begin_update`](SerializedStore::begin_update);
/// writes become visible on the targets after
/// [`apply_changes`](SerializedStore::apply_changes).
pub trait SerializedStore {
    /// The live objects this store serializes, in order.
    fn targets(&self) -> &[ObjectRef];

    /// Refresh the serialized image from the targets.
    fn begin_update(&mut self);

    /// Publish pending writes to the targets. Returns whether anything was
    /// written.
    fn apply_changes(&mut self) -> Result<bool, AccessError>;

    /// Look up a field; `None` unless it resolves in every target.
    fn find_field(&self, path: &PropertyPath) -> Option<SerializedField>;

    /// Look up a field by its textual path (`items[2].name`).
    fn find_field_by_path(&self, path: &str) -> Result<Option<SerializedField>, PathParseError> {
        let path = PropertyPath::parse(path)?;
        Ok(self.find_field(&path))
    }

    /// The field's current value in each target.
    fn read(&self, field: &SerializedField) -> Result<Vec<Value>, AccessError>;

    /// Assign the field in the serialized image and record the modification.
    fn write(&mut self, field: &SerializedField, assign: Assign) -> Result<(), AccessError>;
}

/// The bundled [`SerializedStore`]: a detached copy of each target plus an
/// ordered modification log.
///
/// Plain composites are copied into the image; host objects referenced from
/// a target stay shared. A copy is refreshed in place by later snapshots, and
/// published values hold the live instances the copies stand for.
pub struct SerializedObject {
    registry: Rc<TypeRegistry>,
    targets: Vec<ObjectRef>,
    image: Vec<ObjectRef>,
    copies: CopyMap,
    modified: Vec<(PropertyPath, Assign)>,
    update_count: usize,
    apply_count: usize,
}

impl SerializedObject {
    /// Serialize `targets`.
    pub fn new(registry: Rc<TypeRegistry>, targets: Vec<ObjectRef>) -> Self {
        let mut store = Self {
            registry,
            targets,
            image: Vec::new(),
            copies: CopyMap::new(),
            modified: Vec::new(),
            update_count: 0,
            apply_count: 0,
        };
        store.snapshot();
        store
    }

    fn snapshot(&mut self) {
        self.copies.begin();
        self.image = self
            .targets
            .iter()
            .map(|target| target.detached_with(&self.registry, &mut self.copies))
            .collect();
        self.copies.retain_visited();
    }

    /// Whether writes are waiting for [`SerializedStore::apply_changes`].
    pub fn has_modified_properties(&self) -> bool {
        !self.modified.is_empty()
    }

    /// How many times [`SerializedStore::begin_update`] ran.
    pub fn update_count(&self) -> usize {
        self.update_count
    }

    /// How many times [`SerializedStore::apply_changes`] published writes.
    pub fn apply_count(&self) -> usize {
        self.apply_count
    }
}

impl SerializedStore for SerializedObject {
    fn targets(&self) -> &[ObjectRef] {
        &self.targets
    }

    fn begin_update(&mut self) {
        if !self.modified.is_empty() {
            debug!(
                "discarding {} unapplied modification(s)",
                self.modified.len()
            );
            self.modified.clear();
        }
        self.snapshot();
        self.update_count += 1;
    }

    fn apply_changes(&mut self) -> Result<bool, AccessError> {
        if self.modified.is_empty() {
            return Ok(false);
        }
        let modified = core::mem::take(&mut self.modified);
        for (path, assign) in &modified {
            trace!("applying `{}`", path);
            for (index, target) in self.targets.iter().enumerate() {
                let value = self.copies.to_originals(assign.value_for(index, path)?);
                write_path(target, path, value)?;
            }
        }
        self.apply_count += 1;
        debug!("applied {} modification(s)", modified.len());
        Ok(true)
    }

    fn find_field(&self, path: &PropertyPath) -> Option<SerializedField> {
        let resolves = self
            .image
            .iter()
            .all(|copy| read_path(copy, path).is_ok());
        resolves.then(|| SerializedField { path: path.clone() })
    }

    fn read(&self, field: &SerializedField) -> Result<Vec<Value>, AccessError> {
        self.image
            .iter()
            .map(|copy| read_path(copy, &field.path))
            .collect()
    }

    fn write(&mut self, field: &SerializedField, assign: Assign) -> Result<(), AccessError> {
        for (index, copy) in self.image.iter().enumerate() {
            write_path(copy, &field.path, assign.value_for(index, &field.path)?)?;
        }
        self.modified.push((field.path.clone(), assign));
        Ok(())
    }
}
