//! Host-side addresses.
//!
//! A [`Jid`] is the structured `node@domain/resource` identity the host uses
//! for users and contacts. Legacy-network ids travel in the node part, escaped
//! per XEP-0106 so that ids containing `@`, spaces or slashes survive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ImgateError, Result};

/// Characters XEP-0106 escapes in the node part, with their escape codes.
const ESCAPES: [(char, &str); 10] = [
    ('\\', "5c"),
    (' ', "20"),
    ('"', "22"),
    ('&', "26"),
    ('\'', "27"),
    ('/', "2f"),
    (':', "3a"),
    ('<', "3c"),
    ('>', "3e"),
    ('@', "40"),
];

/// Structured host-side address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Jid {
    node: Option<String>,
    domain: String,
    resource: Option<String>,
}

impl Jid {
    /// Builds an address from its parts. Empty parts are treated as absent.
    pub fn new(node: Option<&str>, domain: impl Into<String>, resource: Option<&str>) -> Self {
        Self {
            node: node.filter(|n| !n.is_empty()).map(str::to_string),
            domain: domain.into(),
            resource: resource.filter(|r| !r.is_empty()).map(str::to_string),
        }
    }

    /// Builds a contact address on the gateway domain for a legacy-network id.
    pub fn from_legacy_id(id: &str, domain: &str) -> Self {
        Self::new(Some(&escape_node(id)), domain, None)
    }

    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// The address without its resource.
    pub fn to_bare(&self) -> Self {
        Self {
            node: self.node.clone(),
            domain: self.domain.clone(),
            resource: None,
        }
    }

    /// The legacy-network id carried in the node part, unescaped.
    ///
    /// Addresses without a node (the gateway itself) yield an empty id.
    pub fn legacy_id(&self) -> String {
        self.node.as_deref().map(unescape_node).unwrap_or_default()
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(node) = &self.node {
            write!(f, "{node}@")?;
        }
        f.write_str(&self.domain)?;
        if let Some(resource) = &self.resource {
            write!(f, "/{resource}")?;
        }
        Ok(())
    }
}

impl FromStr for Jid {
    type Err = ImgateError;

    fn from_str(s: &str) -> Result<Self> {
        let (bare, resource) = match s.split_once('/') {
            Some((bare, resource)) => (bare, Some(resource)),
            None => (s, None),
        };
        let (node, domain) = match bare.split_once('@') {
            Some((node, domain)) => (Some(node), domain),
            None => (None, bare),
        };

        if domain.is_empty() {
            return Err(ImgateError::invalid_address(s, "empty domain"));
        }
        if domain.contains('@') {
            return Err(ImgateError::invalid_address(s, "more than one '@'"));
        }
        if node == Some("") {
            return Err(ImgateError::invalid_address(s, "empty node"));
        }
        if resource == Some("") {
            return Err(ImgateError::invalid_address(s, "empty resource"));
        }

        Ok(Self::new(node, domain, resource))
    }
}

impl TryFrom<String> for Jid {
    type Error = ImgateError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Jid> for String {
    fn from(jid: Jid) -> Self {
        jid.to_string()
    }
}

/// Escapes a legacy id for use as a node part (XEP-0106).
pub fn escape_node(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match ESCAPES.iter().find(|(ch, _)| *ch == c) {
            Some((_, code)) => {
                out.push('\\');
                out.push_str(code);
            }
            None => out.push(c),
        }
    }
    out
}

/// Reverses [`escape_node`]. Unknown escape sequences are kept verbatim.
pub fn unescape_node(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let decoded = tail.get(..2).and_then(|code| {
            ESCAPES
                .iter()
                .find(|(_, c)| c.eq_ignore_ascii_case(code))
                .map(|(ch, _)| *ch)
        });
        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &tail[2..];
            }
            None => {
                out.push('\\');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
