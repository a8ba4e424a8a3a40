use std::io::Read;
use std::path::Path;

use xot::{Node, Xot};

use crate::cursor::EventCursor;

/// An XML payload in one of the representations the resolver understands.
pub enum XmlSource<'a> {
    /// No payload.
    Absent,
    Tree(TreeSource<'a>),
    Stream(StreamSource<'a>),
    Generic(GenericSource<'a>),
}

impl<'a> XmlSource<'a> {
    pub fn tree(xot: &'a Xot, node: Node) -> Self {
        XmlSource::Tree(TreeSource::new(xot, node))
    }

    pub fn stream(cursor: &'a mut dyn EventCursor) -> Self {
        XmlSource::Stream(StreamSource::new(cursor))
    }

    pub fn text(xml: &'a str) -> Self {
        XmlSource::Generic(GenericSource::Text(xml))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            XmlSource::Absent => "absent",
            XmlSource::Tree(_) => "tree",
            XmlSource::Stream(_) => "stream",
            XmlSource::Generic(_) => "generic",
        }
    }
}

impl<'a, T: Into<XmlSource<'a>>> From<Option<T>> for XmlSource<'a> {
    fn from(source: Option<T>) -> Self {
        source.map_or(XmlSource::Absent, Into::into)
    }
}

impl<'a> From<TreeSource<'a>> for XmlSource<'a> {
    fn from(source: TreeSource<'a>) -> Self {
        XmlSource::Tree(source)
    }
}

impl<'a> From<StreamSource<'a>> for XmlSource<'a> {
    fn from(source: StreamSource<'a>) -> Self {
        XmlSource::Stream(source)
    }
}

impl<'a> From<GenericSource<'a>> for XmlSource<'a> {
    fn from(source: GenericSource<'a>) -> Self {
        XmlSource::Generic(source)
    }
}

/// A node in a tree owned by the caller.
#[derive(Debug, Clone, Copy)]
pub struct TreeSource<'a> {
    xot: &'a Xot,
    node: Node,
}

impl<'a> TreeSource<'a> {
    pub fn new(xot: &'a Xot, node: Node) -> Self {
        TreeSource { xot, node }
    }

    #[inline]
    pub fn xot(&self) -> &'a Xot {
        self.xot
    }

    #[inline]
    pub fn node(&self) -> Node {
        self.node
    }
}

/// A streaming source. The cursor belongs to the caller and is not closed.
///
/// A stream source may have no cursor available, in which case it can only
/// be resolved through a transform.
pub struct StreamSource<'a> {
    cursor: Option<&'a mut dyn EventCursor>,
}

impl<'a> StreamSource<'a> {
    pub fn new(cursor: &'a mut dyn EventCursor) -> Self {
        StreamSource {
            cursor: Some(cursor),
        }
    }

    pub fn without_cursor() -> Self {
        StreamSource { cursor: None }
    }

    pub fn cursor(&mut self) -> Option<&mut (dyn EventCursor + 'a)> {
        self.cursor.as_deref_mut()
    }
}

/// A source that can only be inspected by transforming it into a tree.
pub enum GenericSource<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
    Reader(&'a mut dyn Read),
    Path(&'a Path),
}
