#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![doc = include_str!("../README.md")]

mod error;
pub use error::*;

mod path;
pub use path::*;

mod value;
pub use value::*;

mod types;
pub use types::*;

pub mod reflect;
pub use reflect::{DefaultValues, Eligibility, SerializationRules, ZeroDefaults};

mod attributes;
pub use attributes::*;

pub mod store;
pub use store::{Assign, SerializedField, SerializedObject, SerializedStore};

mod meta;
pub use meta::*;

mod property;
pub use property::*;

mod ui;
pub use ui::*;

mod decorator;
pub use decorator::*;

mod list;
pub use list::*;

mod layout;
pub use layout::*;

mod tree;
pub use tree::*;

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}
#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use trace;

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {};
}
#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use debug;
