use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "User Guide";

/// One classified input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Heading1(String),
    Heading2(String),
    BulletItem(String),
    ImageRef { alt: String, id: String },
    Placeholder(String),
    Paragraph(String),
    Blank,
}

/// A captured screenshot as produced by the crawl stage.
/// `data` is a `data:image/...;base64,` URI or bare base64.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub data: String,
}

/// Finished guide text plus the metadata printed in the preamble.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Guide {
    #[serde(default = "default_title")]
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Guide {
    pub fn new(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: default_title(),
            content: content.into(),
            url: url.into(),
            timestamp: String::new(),
            screenshots: Vec::new(),
        }
    }

    /// Milliseconds since the epoch, when `timestamp` is RFC 3339.
    pub fn timestamp_millis(&self) -> Option<i64> {
        chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.timestamp_millis())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}
