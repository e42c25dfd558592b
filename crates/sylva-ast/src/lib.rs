//! Sylva AST - syntax tree nodes for a JavaScript subset
//!
//! Every node shares one base contract: a fixed kind, an owned source
//! location and leading/trailing comment lists. Variants declare their
//! serialized shape in a static property table, which drives generic
//! serialization. Trees can be walked with a [`Traverser`], printed back to
//! source with a [`Renderer`], and decoded from untyped JSON.

#[macro_use]
mod macros;

mod comment;
mod decode;
mod error;
mod format;
mod node;
mod nodes;
mod printer;
mod properties;
mod span;
mod traverse;
pub mod validate;

pub use comment::*;
pub use decode::{decode, decode_str, DecodeStrError, FromValue};
pub use error::*;
pub use format::*;
pub use node::*;
pub use nodes::*;
pub use printer::*;
pub use properties::{declared_properties, Accessor, Property, Reflect};
pub use span::*;
pub use traverse::*;
