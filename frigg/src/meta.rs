use crate::{MemberDef, PropertyPath, TypeHandle};

/// Where a property's value comes from.
#[derive(Debug, Clone)]
pub enum MemberInfo {
    /// The target object itself.
    Root,
    /// A declared member of the parent composite.
    Member(MemberDef),
    /// An element of the parent array.
    ArrayElement {
        /// Position of the element.
        index: usize,
    },
}

/// Static description of one member position in the tree.
///
/// A meta is never mutated. When an array element moves, its node receives
/// a new meta for the new position.
#[derive(Debug, Clone)]
pub struct PropertyMeta {
    name: String,
    member_type: TypeHandle,
    member: MemberInfo,
    path: PropertyPath,
}

impl PropertyMeta {
    /// Meta for the root property.
    pub fn root(type_name: &str, ty: TypeHandle) -> Self {
        Self {
            name: type_name.to_string(),
            member_type: ty,
            member: MemberInfo::Root,
            path: PropertyPath::root(),
        }
    }

    /// Meta for a declared member below `parent`.
    pub fn member(member: MemberDef, parent: &PropertyPath) -> Self {
        Self {
            name: member.name.clone(),
            member_type: member.ty,
            path: parent.field(member.name.clone()),
            member: MemberInfo::Member(member),
        }
    }

    /// Meta for element `index` of the array at `parent`.
    pub fn element(element_type: TypeHandle, parent: &PropertyPath, index: usize) -> Self {
        Self {
            name: format!("Element {index}"),
            member_type: element_type,
            member: MemberInfo::ArrayElement { index },
            path: parent.index(index),
        }
    }

    /// The same member position under a different parent path.
    pub(crate) fn relocated(&self, parent: &PropertyPath) -> Self {
        match &self.member {
            MemberInfo::ArrayElement { index } => {
                Self::element(self.member_type, parent, *index)
            }
            MemberInfo::Member(member) => Self::member(member.clone(), parent),
            MemberInfo::Root => self.clone(),
        }
    }

    /// The member name (`Element N` for array elements).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name: `m_maxHealth` becomes `Max Health`.
    pub fn nice_name(&self) -> String {
        nice_name(&self.name)
    }

    /// Declared type of the member.
    pub fn member_type(&self) -> TypeHandle {
        self.member_type
    }

    /// Reflection handle.
    pub fn member_info(&self) -> &MemberInfo {
        &self.member
    }

    /// Path from the target root.
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// Element index, for array elements.
    pub fn element_index(&self) -> Option<usize> {
        match self.member {
            MemberInfo::ArrayElement { index } => Some(index),
            _ => None,
        }
    }

    /// Whether the member accepts writes. The root and array elements always
    /// do.
    pub fn is_writable(&self) -> bool {
        match &self.member {
            MemberInfo::Member(member) => member.writable,
            MemberInfo::Root | MemberInfo::ArrayElement { .. } => true,
        }
    }
}

/// Turn a member name into a display label.
///
/// Strips `m_`, `_` and `k` + uppercase prefixes, capitalizes the first
/// letter, and inserts spaces at word boundaries (lower → upper, the end of
/// an acronym, and before digit runs).
pub fn nice_name(name: &str) -> String {
    let trimmed = name
        .strip_prefix("m_")
        .or_else(|| name.strip_prefix('_'))
        .or_else(|| {
            let rest = name.strip_prefix('k')?;
            rest.starts_with(|c: char| c.is_ascii_uppercase()).then_some(rest)
        })
        .unwrap_or(name);

    let chars: Vec<char> = trimmed.chars().collect();
    let mut out = String::with_capacity(trimmed.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
            continue;
        }
        let prev = chars[i - 1];
        let next = chars.get(i + 1).copied();
        let boundary = (c.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()))
            || (c.is_uppercase()
                && prev.is_uppercase()
                && next.is_some_and(|n| n.is_lowercase()))
            || (c.is_ascii_digit() && prev.is_alphabetic());
        if boundary {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
