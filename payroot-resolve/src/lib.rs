//! Resolve the root qualified name of an XML payload.
//!
//! A payload can arrive as a node in an in-memory [`xot`] tree, as a
//! streaming cursor over parse events, or as something opaque (text, bytes,
//! a reader, a file) that has to be transformed into a tree first.
//! [`resolve_root_name`] inspects tree and stream sources directly and
//! falls back to a [`TransformerFactory`] for everything else.

mod cursor;
mod error;
mod resolve;
mod source;
mod transform;

pub use cursor::{EventCursor, EventKind, XmlCursor};
pub use error::{Error, Result, StreamReadError, TransformError};
pub use payroot_name::Name;
pub use resolve::{resolve_root_name, resolve_root_name_with_identity};
pub use source::{GenericSource, StreamSource, TreeSource, XmlSource};
pub use transform::{
    IdentityTransformer, IdentityTransformerFactory, Transformer, TransformerFactory,
};
