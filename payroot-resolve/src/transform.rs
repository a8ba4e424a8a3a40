use tracing::debug;
use xot::{Node, Xot};

use crate::error::TransformError;
use crate::source::{GenericSource, XmlSource};

/// Builds transformers. The resolver asks for a new transformer whenever it
/// has to fall back to transforming a source into a tree.
pub trait TransformerFactory {
    type Transformer: Transformer;

    fn new_transformer(&self) -> Result<Self::Transformer, TransformError>;
}

/// Transforms a source into a document in the given tree.
pub trait Transformer {
    /// Returns the document node of the result.
    fn transform(&mut self, source: XmlSource<'_>, xot: &mut Xot) -> Result<Node, TransformError>;
}

impl<F: TransformerFactory> TransformerFactory for &F {
    type Transformer = F::Transformer;

    fn new_transformer(&self) -> Result<Self::Transformer, TransformError> {
        (**self).new_transformer()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTransformerFactory;

impl TransformerFactory for IdentityTransformerFactory {
    type Transformer = IdentityTransformer;

    fn new_transformer(&self) -> Result<Self::Transformer, TransformError> {
        Ok(IdentityTransformer)
    }
}

/// Copies a source into a tree without changing it.
///
/// Tree nodes are serialized and parsed again, streams are drained from
/// their current event onward, and generic sources are read and parsed.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTransformer;

impl Transformer for IdentityTransformer {
    fn transform(&mut self, source: XmlSource<'_>, xot: &mut Xot) -> Result<Node, TransformError> {
        debug!(source = source.kind(), "identity transform");
        let xml = match source {
            XmlSource::Absent => return Err(TransformError::NoSource),
            XmlSource::Tree(tree) => tree.xot().to_string(tree.node())?,
            XmlSource::Stream(mut stream) => stream
                .cursor()
                .ok_or(TransformError::NoSource)?
                .drain_to_string()?,
            XmlSource::Generic(generic) => read_generic(generic)?,
        };
        Ok(xot.parse(&xml)?)
    }
}

fn read_generic(source: GenericSource<'_>) -> Result<String, TransformError> {
    match source {
        GenericSource::Text(text) => Ok(text.to_string()),
        GenericSource::Bytes(bytes) => Ok(std::str::from_utf8(bytes)?.to_string()),
        GenericSource::Reader(reader) => {
            let mut xml = String::new();
            reader.read_to_string(&mut xml)?;
            Ok(xml)
        }
        GenericSource::Path(path) => Ok(std::fs::read_to_string(path)?),
    }
}
