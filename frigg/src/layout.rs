use crate::PropertyId;

/// A named group of root members drawn together after the inline members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    name: String,
    members: Vec<PropertyId>,
}

impl Layout {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, member: PropertyId) {
        self.members.push(member);
    }

    /// The group name given by the layout attribute.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[PropertyId] {
        &self.members
    }
}
