//! Listing model and the HTML page that carries it to the browser.
//!
//! A [`Listing`] is serialized to JSON, base64 encoded and substituted into
//! the page template at the `{ data }` tag. The browser side decodes and
//! renders it, so nothing here needs HTML escaping.

use std::{fs, io, path::Path};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::BrowseError;

const TAG_START: &str = "{ ";
const TAG_END: &str = " }";

/// Name of the tag that receives the encoded listing.
pub const DATA_TAG: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "objects")]
    pub entries: Vec<Entry>,
    /// False only for the volume view.
    pub has_parent: bool,
}

impl Listing {
    pub fn volumes(names: Vec<String>) -> Self {
        Self {
            entries: names.into_iter().map(|n| Entry::new(n, true)).collect(),
            has_parent: false,
        }
    }

    pub fn directory(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            has_parent: true,
        }
    }

    /// JSON, then standard base64.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(BASE64.encode(json))
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("unterminated tag starting at byte {0}")]
    Unterminated(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Tag(String),
}

/// A parsed page template. Tags are written `{ name }`; only [`DATA_TAG`]
/// has a value, any other tag renders as nothing.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    segments: Vec<Segment>,
}

impl PageTemplate {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&source)
    }

    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find(TAG_START) {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after_start = &rest[start + TAG_START.len()..];
            let end = after_start
                .find(TAG_END)
                .ok_or(TemplateError::Unterminated(offset + start))?;
            segments.push(Segment::Tag(after_start[..end].to_string()));

            let consumed = start + TAG_START.len() + end + TAG_END.len();
            rest = &rest[consumed..];
            offset += consumed;
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn render(&self, data: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Tag(tag) if tag == DATA_TAG => out.push_str(data),
                Segment::Tag(_) => {}
            }
        }
        out
    }

    /// Encodes `listing` and renders the complete HTML document.
    pub fn render_listing(&self, listing: &Listing) -> Result<String, BrowseError> {
        let payload = listing.to_payload()?;
        Ok(self.render(&payload))
    }
}
