//! Paths from a target root to a member position.

use core::fmt;

/// A single step in a [`PropertyPath`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathStep {
    /// Navigate to a named member of a composite.
    Field(String),
    /// Navigate to an array element by index.
    Index(usize),
}

/// A path through an object graph, starting at a target root.
///
/// The empty path addresses the target itself. Paths print and parse as
/// `outer.inner.items[3].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyPath {
    steps: Vec<PathStep>,
}

impl PropertyPath {
    /// The empty path, addressing the target root.
    pub const fn root() -> Self {
        Self { steps: Vec::new() }
    }

    /// Push a step onto the path.
    pub fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }

    /// Pop the last step from the path.
    pub fn pop(&mut self) -> Option<PathStep> {
        self.steps.pop()
    }

    /// A copy of this path with one more step.
    pub fn with(&self, step: PathStep) -> Self {
        let mut path = self.clone();
        path.push(step);
        path
    }

    /// A copy of this path extended by a named member.
    pub fn field(&self, name: impl Into<String>) -> Self {
        self.with(PathStep::Field(name.into()))
    }

    /// A copy of this path extended by an array index.
    pub fn index(&self, index: usize) -> Self {
        self.with(PathStep::Index(index))
    }

    /// The path of the containing member, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.steps.split_last()?;
        Some(Self {
            steps: rest.to_vec(),
        })
    }

    /// The last step, or `None` for the root.
    pub fn last(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// Get the steps in this path.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Get the length of this path.
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if this path is the root path.
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Parse a path such as `weapons[2].damage`.
    pub fn parse(input: &str) -> Result<Self, PathParseError> {
        let mut path = Self::root();
        let bytes = input.as_bytes();
        let mut pos = 0;
        let mut expect_name = true;

        while pos < bytes.len() {
            match bytes[pos] {
                b'.' if !expect_name && !path.is_empty() => {
                    expect_name = true;
                    pos += 1;
                }
                b'[' if !expect_name => {
                    let close = input[pos..]
                        .find(']')
                        .map(|offset| pos + offset)
                        .ok_or(PathParseError::Unclosed { offset: pos })?;
                    let index = input[pos + 1..close]
                        .parse::<usize>()
                        .map_err(|_| PathParseError::BadIndex { offset: pos + 1 })?;
                    path.push(PathStep::Index(index));
                    pos = close + 1;
                }
                _ if expect_name => {
                    let end = input[pos..]
                        .find(['.', '['])
                        .map_or(input.len(), |offset| pos + offset);
                    if end == pos {
                        return Err(PathParseError::EmptySegment { offset: pos });
                    }
                    path.push(PathStep::Field(input[pos..end].to_string()));
                    pos = end;
                    expect_name = false;
                }
                _ => return Err(PathParseError::Unexpected { offset: pos }),
            }
        }

        if expect_name && !input.is_empty() {
            return Err(PathParseError::EmptySegment { offset: input.len() });
        }
        Ok(path)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathStep::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl core::str::FromStr for PropertyPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error returned by [`PropertyPath::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// A member name was empty (e.g. `a..b` or a trailing `.`).
    EmptySegment {
        /// Byte offset of the empty segment.
        offset: usize,
    },
    /// An index bracket was never closed.
    Unclosed {
        /// Byte offset of the opening bracket.
        offset: usize,
    },
    /// The text between brackets was not an unsigned integer.
    BadIndex {
        /// Byte offset of the index text.
        offset: usize,
    },
    /// A character appeared where none was expected.
    Unexpected {
        /// Byte offset of the character.
        offset: usize,
    },
}

impl fmt::Display for PathParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathParseError::EmptySegment { offset } => {
                write!(f, "empty member name at offset {offset}")
            }
            PathParseError::Unclosed { offset } => {
                write!(f, "unclosed index bracket at offset {offset}")
            }
            PathParseError::BadIndex { offset } => {
                write!(f, "invalid array index at offset {offset}")
            }
            PathParseError::Unexpected { offset } => {
                write!(f, "unexpected character at offset {offset}")
            }
        }
    }
}

impl core::error::Error for PathParseError {}
