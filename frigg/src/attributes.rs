//! Attributes attached to members, and the lookup collaborator that
//! discovers them for a property.

use crate::{MemberInfo, PropertyMeta};

/// An attribute the host attached to a member.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// Serialize a member that would otherwise be skipped (e.g. private).
    SerializeField,
    /// Never serialize this member.
    NonSerialized,
    /// Show a property (accessor) in the inspector.
    ShowInInspector,
    /// Warn when the member holds its empty value.
    Required {
        /// Custom message; defaults to `"<Nice Name> is required!"`.
        message: Option<String>,
    },
    /// Options for the reorderable list drawer.
    ListDrawerSettings(ListDrawerSettings),
    /// Draw the member inside the named layout group instead of inline.
    Layout(String),
}

/// Options recognized by the reorderable list drawer.
///
/// Absent settings mean every capability is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDrawerSettings {
    /// Allow reordering by drag.
    pub allow_drag: bool,
    /// Suppress the `"<Name> - N elements"` header.
    pub hide_header: bool,
    /// Suppress the add control.
    pub hide_add_button: bool,
    /// Suppress the remove control.
    pub hide_remove_button: bool,
}

impl Default for ListDrawerSettings {
    fn default() -> Self {
        Self {
            allow_drag: true,
            hide_header: false,
            hide_add_button: false,
            hide_remove_button: false,
        }
    }
}

/// Finds the attributes of a property.
pub trait AttributeLookup {
    /// All attributes that apply to `meta`, in declaration order.
    fn attributes(&self, meta: &PropertyMeta) -> Vec<Attribute>;
}

/// Reads attributes straight off the member declaration. Array elements
/// and the root carry none.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberAttributes;

impl AttributeLookup for MemberAttributes {
    fn attributes(&self, meta: &PropertyMeta) -> Vec<Attribute> {
        match meta.member_info() {
            MemberInfo::Member(member) => member.attributes.clone(),
            MemberInfo::Root | MemberInfo::ArrayElement { .. } => Vec::new(),
        }
    }
}

/// The list settings among `attributes`, or the defaults.
pub fn list_settings(attributes: &[Attribute]) -> ListDrawerSettings {
    attributes
        .iter()
        .find_map(|attr| match attr {
            Attribute::ListDrawerSettings(settings) => Some(*settings),
            _ => None,
        })
        .unwrap_or_default()
}

/// The layout group named among `attributes`, if any.
pub fn layout_group(attributes: &[Attribute]) -> Option<&str> {
    attributes.iter().find_map(|attr| match attr {
        Attribute::Layout(name) => Some(name.as_str()),
        _ => None,
    })
}
