use std::io::Write;

use insta::assert_snapshot;
use payroot_resolve::{
    resolve_root_name, resolve_root_name_with_identity, Error, EventCursor, EventKind,
    GenericSource, IdentityTransformer, Name, TransformError, Transformer, TransformerFactory,
    XmlCursor, XmlSource,
};
use xot::{Node, Xot};

const PAYLOAD: &str = r#"<a:root xmlns:a="urn:x"><child/></a:root>"#;

fn resolve_every_way(xml: &str) -> Vec<Option<Name>> {
    let mut xot = Xot::new();
    let doc = xot.parse(xml).unwrap();
    let from_tree = resolve_root_name_with_identity(XmlSource::tree(&xot, doc)).unwrap();

    let mut cursor = XmlCursor::from_text(xml);
    let from_stream = resolve_root_name_with_identity(XmlSource::stream(&mut cursor)).unwrap();

    let from_text = resolve_root_name_with_identity(XmlSource::text(xml)).unwrap();
    let from_bytes = resolve_root_name_with_identity(XmlSource::Generic(GenericSource::Bytes(
        xml.as_bytes(),
    )))
    .unwrap();

    vec![from_tree, from_stream, from_text, from_bytes]
}

#[test]
fn test_all_representations_agree() {
    let expected = Name::uri_qualified("urn:x", "root");
    for name in resolve_every_way(PAYLOAD) {
        assert_eq!(name.as_ref(), Some(&expected));
        assert_eq!(name.unwrap().prefix(), Some("a"));
    }
}

#[test]
fn test_all_representations_agree_on_default_namespace() {
    let expected = Name::uri_qualified("urn:d", "root");
    for name in resolve_every_way(r#"<root xmlns="urn:d"><child/></root>"#) {
        let name = name.unwrap();
        assert_eq!(name, expected);
        assert_eq!(name.prefix(), None);
        assert_eq!(name.to_full_name(), "root");
    }
}

#[test]
fn test_all_representations_agree_without_namespace() {
    for name in resolve_every_way("<root><child/></root>") {
        let name = name.unwrap();
        assert_eq!(name, Name::unprefixed("root"));
        assert_eq!(name.namespace(), None);
        assert_eq!(name.prefix(), None);
    }
}

#[test]
fn test_stream_over_buffered_reader() {
    let reader = std::io::BufReader::new(PAYLOAD.as_bytes());
    let mut cursor = XmlCursor::new(reader);
    let name = resolve_root_name_with_identity(XmlSource::stream(&mut cursor))
        .unwrap()
        .unwrap();
    assert_snapshot!(name.to_eqname(), @"Q{urn:x}root");
    assert_eq!(cursor.event_kind(), EventKind::StartElement);
}

#[test]
fn test_path_source() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "<?xml version=\"1.0\"?>\n<payload xmlns=\"urn:p\"/>").unwrap();
    let source = XmlSource::Generic(GenericSource::Path(file.path()));
    let name = resolve_root_name_with_identity(source).unwrap().unwrap();
    assert_snapshot!(name.to_string(), @"{urn:p}payload");
}

#[test]
fn test_missing_path_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.xml");
    let source = XmlSource::Generic(GenericSource::Path(&path));
    let err = resolve_root_name_with_identity(source).unwrap_err();
    assert!(matches!(err, Error::Transform(TransformError::Io(_))));
}

/// Transforms an envelope into a document holding only its body content.
struct UnwrapBody;

impl Transformer for UnwrapBody {
    fn transform(&mut self, source: XmlSource<'_>, xot: &mut Xot) -> Result<Node, TransformError> {
        let envelope = IdentityTransformer.transform(source, xot)?;
        let envelope_element = xot.document_element(envelope)?;
        let body = xot
            .first_child(envelope_element)
            .ok_or(TransformError::NoDocumentElement)?;
        let content = xot
            .first_child(body)
            .ok_or(TransformError::NoDocumentElement)?;
        let xml = xot.to_string(content)?;
        Ok(xot.parse(&xml)?)
    }
}

struct UnwrapBodyFactory;

impl TransformerFactory for UnwrapBodyFactory {
    type Transformer = UnwrapBody;

    fn new_transformer(&self) -> Result<Self::Transformer, TransformError> {
        Ok(UnwrapBody)
    }
}

#[test]
fn test_custom_transformer_factory() {
    let envelope = r#"<env><body><m:order xmlns:m="urn:m"/></body></env>"#;
    let name = resolve_root_name(XmlSource::text(envelope), UnwrapBodyFactory)
        .unwrap()
        .unwrap();
    assert_eq!(name, Name::uri_qualified("urn:m", "order"));
}

#[test]
fn test_custom_transformer_not_used_for_tree() {
    let envelope = r#"<env><body><m:order xmlns:m="urn:m"/></body></env>"#;
    let mut xot = Xot::new();
    let doc = xot.parse(envelope).unwrap();
    let name = resolve_root_name(XmlSource::tree(&xot, doc), UnwrapBodyFactory)
        .unwrap()
        .unwrap();
    assert_eq!(name, Name::unprefixed("env"));
}

#[test]
fn test_truncated_stream() {
    let mut cursor = XmlCursor::from_text("<!-- only a comment -->");
    let err = resolve_root_name_with_identity(XmlSource::stream(&mut cursor)).unwrap_err();
    assert!(matches!(err, Error::StreamRead(_)));
    assert_snapshot!(err.to_string(), @"could not read next tag: unexpected end of stream before a tag");
}
