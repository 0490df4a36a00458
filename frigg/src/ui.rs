//! The drawer layer: the widget backend a tree draws through.

use std::rc::Rc;

use crate::{NodeKind, PropertyMeta, PropertyValue, Value};

/// A screen rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A rectangle from its position and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Where a widget is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Area {
    /// Let the backend lay widgets out one after another.
    Auto,
    /// An explicit rectangle.
    Rect(Rect),
}

impl Area {
    /// Split off a slice of `height` at the top. Returns the slice and the
    /// remaining area below it. Automatic areas split into automatic areas.
    pub fn split_top(self, height: f32) -> (Area, Area) {
        match self {
            Area::Auto => (Area::Auto, Area::Auto),
            Area::Rect(r) => {
                let taken = height.min(r.height).max(0.0);
                (
                    Area::Rect(Rect::new(r.x, r.y, r.width, taken)),
                    Area::Rect(Rect::new(r.x, r.y + taken, r.width, r.height - taken)),
                )
            }
        }
    }
}

/// Result of drawing an editable field.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// The user left the field alone.
    Unchanged,
    /// The user entered a new value.
    Changed(Value),
}

/// Severity of a help box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Neutral information.
    Info,
    /// Something looks off.
    Warning,
    /// Something is wrong.
    Error,
}

/// A snapshot of one property, handed to widgets and decorators.
#[derive(Debug, Clone)]
pub struct PropertyView {
    pub(crate) meta: Rc<PropertyMeta>,
    pub(crate) value: PropertyValue,
    pub(crate) kind: NodeKind,
    pub(crate) depth: usize,
    pub(crate) expanded: bool,
    pub(crate) read_only: bool,
}

impl PropertyView {
    /// Static description of the member.
    pub fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    /// Display label.
    pub fn label(&self) -> String {
        self.meta.nice_name()
    }

    /// The value in the first target.
    pub fn value(&self) -> Option<&Value> {
        self.value.get()
    }

    /// One value per target.
    pub fn values(&self) -> Option<&[Value]> {
        self.value.values()
    }

    /// Whether the targets disagree; widgets show a mixed-value marker.
    pub fn is_mixed(&self) -> bool {
        self.value.is_mixed()
    }

    /// What kind of node this is.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Nesting depth, for indentation.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether a foldout is open.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether edits to this property are rejected.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

/// What the list widget shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListControls {
    /// Number of elements.
    pub count: usize,
    /// Index of the selected element.
    pub active: Option<usize>,
    /// Whether elements may be dragged.
    pub draggable: bool,
    /// Whether the add button is shown.
    pub show_add: bool,
    /// Whether the remove button is shown.
    pub show_remove: bool,
}

/// What the user did with a list widget this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListGesture {
    /// Nothing.
    #[default]
    None,
    /// An element was selected.
    Select(usize),
    /// The add button was pressed.
    Add,
    /// The remove button was pressed.
    Remove,
    /// An element was dragged to a new position.
    Move {
        /// Where the element was.
        from: usize,
        /// Where it was dropped.
        to: usize,
    },
}

/// Fixed sizes used by the height contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Height of a single-line field, foldout, list header or control row.
    pub line_height: f32,
    /// Vertical gap after each child and list element.
    pub spacing: f32,
    /// Height reserved by a visible decorator.
    pub decorator_height: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            line_height: 18.0,
            spacing: 4.0,
            decorator_height: 20.0,
        }
    }
}

/// The widget backend.
///
/// Methods draw immediately and report what the user did this frame.
pub trait Ui {
    /// Draw an editable field for a leaf property.
    fn property_field(&mut self, view: &PropertyView, area: Area) -> Edit;

    /// Draw a foldout header for a composite. Returns whether it is open.
    fn foldout(&mut self, view: &PropertyView, area: Area) -> bool;

    /// Draw a message box.
    fn help_box(&mut self, message: &str, kind: MessageKind, area: Area);

    /// Draw a list header line.
    fn list_header(&mut self, view: &PropertyView, label: &str, area: Area);

    /// Draw the list's add / remove / drag controls and report the gesture.
    fn list_controls(
        &mut self,
        view: &PropertyView,
        controls: &ListControls,
        area: Area,
    ) -> ListGesture;

    /// Open a named layout group.
    fn begin_layout(&mut self, name: &str) {
        let _ = name;
    }

    /// Close a named layout group.
    fn end_layout(&mut self, name: &str) {
        let _ = name;
    }
}
