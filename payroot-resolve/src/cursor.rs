use std::io::BufRead;

use payroot_name::Name;
use quick_xml::events::{BytesEnd, Event};
use quick_xml::name::{QName, ResolveResult};
use quick_xml::{NsReader, Writer};
use tracing::trace;

use crate::error::StreamReadError;

/// The kind of parse event a cursor is positioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    StartDocument,
    StartElement,
    EndElement,
    Characters,
    CData,
    Comment,
    ProcessingInstruction,
    DocType,
    EndDocument,
}

impl EventKind {
    #[inline]
    pub fn is_tag(self) -> bool {
        matches!(self, EventKind::StartElement | EventKind::EndElement)
    }
}

/// A forward-only cursor over XML parse events.
///
/// The cursor always has a current event; a fresh cursor is positioned on
/// [`EventKind::StartDocument`].
pub trait EventCursor {
    fn event_kind(&self) -> EventKind;

    /// The qualified name of the current start or end element.
    fn name(&self) -> Option<&Name>;

    /// The text of the current character data or CDATA event.
    fn text(&self) -> Option<&str>;

    /// Move to the next event.
    fn advance(&mut self) -> Result<EventKind, StreamReadError>;

    /// Serialize the current event and everything after it as XML text,
    /// leaving the cursor at the end of the document.
    fn drain_to_string(&mut self) -> Result<String, StreamReadError>;

    /// Advance to the next start or end element, skipping whitespace,
    /// comments, processing instructions and the doctype.
    ///
    /// Any other content, or reaching the end of the document, is an error.
    fn next_tag(&mut self) -> Result<EventKind, StreamReadError> {
        loop {
            match self.advance()? {
                kind @ (EventKind::StartElement | EventKind::EndElement) => return Ok(kind),
                EventKind::Characters | EventKind::CData => {
                    let text = self.text().unwrap_or_default();
                    if !is_xml_whitespace(text) {
                        return Err(StreamReadError::UnexpectedContent(text.to_string()));
                    }
                }
                EventKind::Comment
                | EventKind::ProcessingInstruction
                | EventKind::DocType
                | EventKind::StartDocument => {}
                EventKind::EndDocument => return Err(StreamReadError::UnexpectedEndOfStream),
            }
        }
    }
}

fn is_xml_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// An [`EventCursor`] backed by a namespace-aware `quick_xml` reader.
///
/// The XML declaration is part of the start of the document, and a
/// self-closing element is reported as a start element followed by an end
/// element of the same name.
pub struct XmlCursor<R> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    kind: EventKind,
    name: Option<Name>,
    text: Option<String>,
    // the current event, kept so it can be replayed by `drain_to_string`
    current: Option<Event<'static>>,
    pending_end: bool,
}

impl<'a> XmlCursor<&'a [u8]> {
    pub fn from_text(xml: &'a str) -> Self {
        XmlCursor::new(xml.as_bytes())
    }
}

impl<R: BufRead> XmlCursor<R> {
    pub fn new(reader: R) -> Self {
        XmlCursor {
            reader: NsReader::from_reader(reader),
            buf: Vec::new(),
            kind: EventKind::StartDocument,
            name: None,
            text: None,
            current: None,
            pending_end: false,
        }
    }

    fn set(&mut self, kind: EventKind, name: Option<Name>, text: Option<String>) -> EventKind {
        trace!(?kind, name = ?name, "stream event");
        self.kind = kind;
        self.name = name;
        self.text = text;
        kind
    }

    fn read_event(&mut self) -> Result<EventKind, StreamReadError> {
        if self.pending_end {
            self.pending_end = false;
            let name = self.name.take();
            self.current = name
                .as_ref()
                .map(|name| Event::End(BytesEnd::new(name.to_full_name())));
            return Ok(self.set(EventKind::EndElement, name, None));
        }
        loop {
            self.buf.clear();
            let (ns, event) = self.reader.read_resolved_event_into(&mut self.buf)?;
            let (kind, name, text) = match &event {
                // the declaration belongs to the start of the document
                Event::Decl(_) => continue,
                Event::Start(e) => (EventKind::StartElement, Some(qualified(ns, e.name())?), None),
                Event::Empty(e) => {
                    self.pending_end = true;
                    (EventKind::StartElement, Some(qualified(ns, e.name())?), None)
                }
                Event::End(e) => (EventKind::EndElement, Some(qualified(ns, e.name())?), None),
                Event::Text(e) => (
                    EventKind::Characters,
                    None,
                    Some(std::str::from_utf8(e)?.to_string()),
                ),
                Event::CData(e) => (
                    EventKind::CData,
                    None,
                    Some(std::str::from_utf8(e)?.to_string()),
                ),
                Event::Comment(_) => (EventKind::Comment, None, None),
                Event::PI(_) => (EventKind::ProcessingInstruction, None, None),
                Event::DocType(_) => (EventKind::DocType, None, None),
                Event::Eof => (EventKind::EndDocument, None, None),
            };
            self.current = Some(event.into_owned());
            return Ok(self.set(kind, name, text));
        }
    }
}

impl<R: BufRead> EventCursor for XmlCursor<R> {
    #[inline]
    fn event_kind(&self) -> EventKind {
        self.kind
    }

    fn name(&self) -> Option<&Name> {
        if self.kind.is_tag() {
            self.name.as_ref()
        } else {
            None
        }
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn advance(&mut self) -> Result<EventKind, StreamReadError> {
        self.read_event()
    }

    fn drain_to_string(&mut self) -> Result<String, StreamReadError> {
        let mut writer = Writer::new(Vec::new());
        if let Some(event) = self.current.take() {
            // an empty element is written whole, so its end is not pending
            if matches!(event, Event::Empty(_)) {
                self.pending_end = false;
            }
            if !matches!(event, Event::Eof) {
                writer.write_event(event).map_err(write_error)?;
            }
        }
        loop {
            self.buf.clear();
            let event = self.reader.read_event_into(&mut self.buf)?;
            if matches!(event, Event::Eof) {
                break;
            }
            writer.write_event(event).map_err(write_error)?;
        }
        self.set(EventKind::EndDocument, None, None);
        String::from_utf8(writer.into_inner()).map_err(|e| e.utf8_error().into())
    }
}

fn write_error(e: impl std::fmt::Display) -> StreamReadError {
    StreamReadError::Write(e.to_string())
}

fn qualified(ns: ResolveResult, name: QName) -> Result<Name, StreamReadError> {
    let namespace = match ns {
        ResolveResult::Unbound => None,
        ResolveResult::Bound(namespace) => {
            Some(std::str::from_utf8(namespace.into_inner())?.to_string())
        }
        ResolveResult::Unknown(prefix) => {
            return Err(StreamReadError::UnknownPrefix(
                String::from_utf8_lossy(&prefix).into_owned(),
            ))
        }
    };
    let local_name = std::str::from_utf8(name.local_name().into_inner())?.to_string();
    let prefix = name
        .prefix()
        .map(|prefix| std::str::from_utf8(prefix.into_inner()).map(str::to_string))
        .transpose()?;
    Ok(Name::new(local_name, namespace, prefix))
}
