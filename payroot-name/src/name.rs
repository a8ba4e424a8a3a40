use std::fmt;
use std::str::FromStr;

use xot::Xot;

/// A qualified XML name: namespace URI, local name and an optional prefix.
///
/// Two names are equal when their namespace and local name are equal; the
/// prefix is only kept for presentation.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Name {
    name: String,
    prefix: Option<String>,
    namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no prefix in scope for namespace")]
    MissingPrefix,
    #[error("invalid qualified name: {0}")]
    InvalidName(String),
}

// a custom hasher that ignores the prefix
impl std::hash::Hash for Name {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.namespace.hash(state);
    }
}

// and partial eq that ignores the prefix
impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.namespace == other.namespace
    }
}

impl Name {
    pub fn new(name: String, namespace: Option<String>, prefix: Option<String>) -> Self {
        // the empty namespace URI is no namespace
        let namespace = namespace.filter(|ns| !ns.is_empty());
        Name {
            name,
            namespace,
            prefix,
        }
    }

    pub fn from_xot(name: xot::NameId, xot: &Xot) -> Self {
        let (name, namespace) = xot.name_ns_str(name);
        let namespace = if !namespace.is_empty() {
            Some(namespace.to_string())
        } else {
            None
        };
        Name {
            name: name.to_string(),
            namespace,
            prefix: None,
        }
    }

    /// Get the full name from xot including any prefix information.
    pub fn from_xot_with_prefix(
        name: xot::NameId,
        context: xot::Node,
        xot: &Xot,
    ) -> Result<Self, Error> {
        let namespace = xot.namespace_for_name(name);
        let local_name = xot.local_name_str(name);
        if namespace == xot.no_namespace() {
            return Ok(Name {
                name: local_name.to_string(),
                namespace: None,
                prefix: None,
            });
        }
        let prefix = xot.prefix_for_namespace(context, namespace);
        if let Some(prefix) = prefix {
            let namespace = xot.namespace_str(namespace);

            // the default namespace has the empty prefix, which is no prefix
            let prefix = Some(xot.prefix_str(prefix))
                .filter(|prefix| !prefix.is_empty())
                .map(str::to_string);
            Ok(Name {
                name: local_name.to_string(),
                namespace: Some(namespace.to_string()),
                prefix,
            })
        } else {
            Err(Error::MissingPrefix)
        }
    }

    /// The name of an element node, with its prefix when one is in scope.
    ///
    /// A missing prefix is not an error; the name is returned without one.
    /// Returns None for nodes without a name.
    pub fn from_xot_element(node: xot::Node, xot: &Xot) -> Option<Self> {
        let name = xot.node_name(node)?;
        Some(
            Name::from_xot_with_prefix(name, node, xot)
                .unwrap_or_else(|_| Name::from_xot(name, xot)),
        )
    }

    pub fn unprefixed(name: &str) -> Self {
        Name {
            name: name.to_string(),
            namespace: None,
            prefix: None,
        }
    }

    pub fn uri_qualified(uri: &str, name: &str) -> Self {
        Name::new(name.to_string(), Some(uri.to_string()), None)
    }

    pub fn with_prefix(self, prefix: &str) -> Self {
        Name {
            prefix: Some(prefix.to_string()),
            ..self
        }
    }

    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    #[inline]
    pub fn local_name(&self) -> &str {
        &self.name
    }

    pub fn to_full_name(&self) -> String {
        if let Some(prefix) = &self.prefix {
            if !prefix.is_empty() {
                format!("{}:{}", prefix, self.name)
            } else {
                self.name.clone()
            }
        } else {
            self.name.clone()
        }
    }

    /// The name as an EQName, `Q{namespace}local`.
    pub fn to_eqname(&self) -> String {
        format!("Q{{{}}}{}", self.namespace.as_deref().unwrap_or(""), self.name)
    }

    pub fn add_name_id(&self, xot: &mut Xot) -> xot::NameId {
        if let Some(namespace) = &self.namespace {
            let ns = xot.add_namespace(namespace);
            xot.add_name_ns(&self.name, ns)
        } else {
            xot.add_name(&self.name)
        }
    }

    pub fn to_name_id(&self, xot: &Xot) -> Option<xot::NameId> {
        if let Some(namespace) = &self.namespace {
            let namespace_id = xot.namespace(namespace);
            if let Some(namespace_id) = namespace_id {
                xot.name_ns(&self.name, namespace_id)
            } else {
                None
            }
        } else {
            xot.name(&self.name)
        }
    }
}

/// Clark notation: `{namespace}local`, or just `local` without namespace.
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{{{}}}{}", namespace, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Parses `Q{namespace}local`, `{namespace}local` or `local`.
impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let braced = s.strip_prefix('Q').filter(|rest| rest.starts_with('{'));
        let (namespace, local) = match braced.or_else(|| s.strip_prefix('{').map(|_| s)) {
            Some(rest) => {
                let rest = &rest[1..];
                let (namespace, local) = rest
                    .split_once('}')
                    .ok_or_else(|| Error::InvalidName(s.to_string()))?;
                (Some(namespace), local)
            }
            None => (None, s),
        };
        if local.is_empty() || local.contains([':', '{', '}']) {
            return Err(Error::InvalidName(s.to_string()));
        }
        Ok(Name::new(
            local.to_string(),
            namespace.map(str::to_string),
            None,
        ))
    }
}
