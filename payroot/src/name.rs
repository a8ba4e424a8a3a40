use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, ValueEnum};
use payroot_resolve::{
    resolve_root_name_with_identity, GenericSource, Name, XmlCursor, XmlSource,
};
use tracing::info;
use xot::Xot;

/// How the document is handed to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Via {
    /// Parse into a tree first and resolve from the document node.
    Tree,
    /// Read with a streaming cursor; only the prolog and first tag are read.
    Stream,
    /// Hand over the raw input and let the transform build a tree.
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum NameFormat {
    /// {namespace}local
    Clark,
    /// Q{namespace}local
    Eqname,
    /// prefix:local, as written in the document
    Prefixed,
}

impl NameFormat {
    fn render(self, name: &Name) -> String {
        match self {
            NameFormat::Clark => name.to_string(),
            NameFormat::Eqname => name.to_eqname(),
            NameFormat::Prefixed => name.to_full_name(),
        }
    }
}

#[derive(Debug, Parser)]
pub(crate) struct RootName {
    /// input xml file (default stdin)
    infile: Option<PathBuf>,
    /// Representation used to resolve the root element
    #[arg(long, value_enum, default_value_t = Via::Stream)]
    via: Via,
    /// Output format of the name
    #[arg(long, value_enum, default_value_t = NameFormat::Clark)]
    format: NameFormat,
    /// Fail unless the root element has this name (prefix is ignored).
    /// To specify a namespaced element, use Q{namespace}name
    #[arg(long)]
    expect: Option<Name>,
}

impl RootName {
    pub(crate) fn run(&self) -> anyhow::Result<()> {
        let name = self.resolve()?;
        println!("{}", self.format.render(&name));
        Ok(())
    }

    fn resolve(&self) -> anyhow::Result<Name> {
        let name = match self.via {
            Via::Tree => {
                let xml = self.read_input()?;
                let mut xot = Xot::new();
                let document = xot.parse(&xml).context("Failed to parse input XML")?;
                resolve_root_name_with_identity(XmlSource::tree(&xot, document))?
            }
            Via::Stream => {
                let reader: Box<dyn BufRead> = match &self.infile {
                    Some(path) => Box::new(BufReader::new(self.open(path)?)),
                    None => Box::new(io::stdin().lock()),
                };
                let mut cursor = XmlCursor::new(reader);
                resolve_root_name_with_identity(XmlSource::stream(&mut cursor))?
            }
            Via::Generic => match &self.infile {
                Some(path) => {
                    resolve_root_name_with_identity(XmlSource::Generic(GenericSource::Path(path)))?
                }
                None => {
                    let mut stdin = io::stdin();
                    resolve_root_name_with_identity(XmlSource::Generic(GenericSource::Reader(
                        &mut stdin,
                    )))?
                }
            },
        };
        let name = name.ok_or_else(|| anyhow!("Input has no root element"))?;
        info!(%name, via = ?self.via, "resolved root name");
        if let Some(expected) = &self.expect {
            if &name != expected {
                bail!(
                    "Root element is {}, expected {}",
                    name.to_eqname(),
                    expected.to_eqname()
                );
            }
        }
        Ok(name)
    }

    fn open(&self, path: &Path) -> anyhow::Result<File> {
        File::open(path)
            .with_context(|| format!("Failed to open input XML file: {}", path.display()))
    }

    fn read_input(&self) -> anyhow::Result<String> {
        let mut xml = String::new();
        match &self.infile {
            Some(path) => {
                self.open(path)?
                    .read_to_string(&mut xml)
                    .with_context(|| format!("Failed to read input XML file: {}", path.display()))?;
            }
            None => {
                io::stdin()
                    .read_to_string(&mut xml)
                    .context("Failed to read XML from stdin")?;
            }
        }
        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const PAYLOAD: &str = "<?xml version=\"1.0\"?>\n<a:root xmlns:a=\"urn:x\"><child/></a:root>";

    fn payload_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PAYLOAD.as_bytes()).unwrap();
        file
    }

    fn command(infile: PathBuf, via: Via) -> RootName {
        RootName {
            infile: Some(infile),
            via,
            format: NameFormat::Clark,
            expect: None,
        }
    }

    #[test]
    fn test_every_representation() {
        let file = payload_file();
        for via in [Via::Tree, Via::Stream, Via::Generic] {
            let name = command(file.path().to_path_buf(), via).resolve().unwrap();
            assert_eq!(name, Name::uri_qualified("urn:x", "root"), "{via:?}");
        }
    }

    #[test]
    fn test_render() {
        let name = Name::uri_qualified("urn:x", "root").with_prefix("a");
        assert_eq!(NameFormat::Clark.render(&name), "{urn:x}root");
        assert_eq!(NameFormat::Eqname.render(&name), "Q{urn:x}root");
        assert_eq!(NameFormat::Prefixed.render(&name), "a:root");
    }

    #[test]
    fn test_expect() {
        let file = payload_file();
        let mut cmd = command(file.path().to_path_buf(), Via::Stream);
        cmd.expect = Some("Q{urn:x}root".parse().unwrap());
        assert!(cmd.resolve().is_ok());
        cmd.expect = Some("{urn:y}root".parse().unwrap());
        let err = cmd.resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Root element is Q{urn:x}root, expected Q{urn:y}root"
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = command(dir.path().join("missing.xml"), Via::Stream)
            .resolve()
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to open input XML file"));
    }

    #[test]
    fn test_cli_parses_arguments() {
        let cmd = RootName::try_parse_from([
            "name",
            "payload.xml",
            "--via",
            "generic",
            "--format",
            "eqname",
            "--expect",
            "Q{urn:x}root",
        ])
        .unwrap();
        assert_eq!(cmd.via, Via::Generic);
        assert_eq!(cmd.format, NameFormat::Eqname);
        assert_eq!(cmd.expect, Some(Name::uri_qualified("urn:x", "root")));
        assert!(RootName::try_parse_from(["name", "--expect", "a:b"]).is_err());
        assert!(RootName::try_parse_from(["name", "--expect", "{urn:x"]).is_err());
    }

    #[test]
    fn test_expect_from_command_line() {
        let file = payload_file();
        let path = file.path().to_str().unwrap();
        for via in ["tree", "stream", "generic"] {
            let cmd = RootName::try_parse_from([
                "name",
                path,
                "--via",
                via,
                "--expect",
                "Q{urn:x}root",
            ])
            .unwrap();
            assert_eq!(
                cmd.resolve().unwrap(),
                Name::uri_qualified("urn:x", "root"),
                "{via}"
            );
        }

        let cmd = RootName::try_parse_from(["name", path, "--expect", "{urn:y}root"]).unwrap();
        let err = cmd.resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Root element is Q{urn:x}root, expected Q{urn:y}root"
        );

        let cmd = RootName::try_parse_from(["name", path, "--expect", "root"]).unwrap();
        assert!(cmd.resolve().is_err());
    }
}
