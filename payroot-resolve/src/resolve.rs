use payroot_name::Name;
use tracing::debug;
use xot::{Value, Xot};

use crate::cursor::EventKind;
use crate::error::{Result, TransformError};
use crate::source::{StreamSource, TreeSource, XmlSource};
use crate::transform::{IdentityTransformerFactory, Transformer, TransformerFactory};

/// Returns the qualified name of the root element of `source`.
///
/// Tree and stream sources are inspected directly when possible. A stream
/// cursor positioned at the start of the document is advanced once, to the
/// first tag. Everything else goes through a transformer from `factory`,
/// which builds a tree whose document element gives the name.
///
/// An absent source resolves to `None`.
pub fn resolve_root_name<F: TransformerFactory>(
    mut source: XmlSource<'_>,
    factory: F,
) -> Result<Option<Name>> {
    let direct = match &mut source {
        XmlSource::Absent => return Ok(None),
        XmlSource::Tree(tree) => tree_root_name(tree),
        XmlSource::Stream(stream) => stream_root_name(stream)?,
        XmlSource::Generic(_) => None,
    };
    if let Some(name) = direct {
        debug!(source = source.kind(), %name, "resolved root name directly");
        return Ok(Some(name));
    }
    debug!(source = source.kind(), "resolving root name through transform");
    transform_root_name(source, factory).map(Some)
}

/// Like [`resolve_root_name`], transforming with the identity transformer.
pub fn resolve_root_name_with_identity(source: XmlSource<'_>) -> Result<Option<Name>> {
    resolve_root_name(source, IdentityTransformerFactory)
}

fn tree_root_name(tree: &TreeSource<'_>) -> Option<Name> {
    let xot = tree.xot();
    let node = tree.node();
    match xot.value(node) {
        Value::Element(_) => Name::from_xot_element(node, xot),
        Value::Document => {
            let element = xot.document_element(node).ok()?;
            Name::from_xot_element(element, xot)
        }
        // other nodes can only be resolved by transforming them
        _ => None,
    }
}

fn stream_root_name(stream: &mut StreamSource<'_>) -> Result<Option<Name>> {
    let Some(cursor) = stream.cursor() else {
        return Ok(None);
    };
    if cursor.event_kind() == EventKind::StartDocument {
        cursor.next_tag()?;
    }
    if cursor.event_kind().is_tag() {
        Ok(cursor.name().cloned())
    } else {
        Ok(None)
    }
}

fn transform_root_name<F: TransformerFactory>(source: XmlSource<'_>, factory: F) -> Result<Name> {
    let mut transformer = factory.new_transformer()?;
    let mut xot = Xot::new();
    let document = transformer.transform(source, &mut xot)?;
    let root = xot
        .document_element(document)
        .map_err(TransformError::from)?;
    Name::from_xot_element(root, &xot).ok_or_else(|| TransformError::NoDocumentElement.into())
}
