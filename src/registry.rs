use std::collections::HashMap;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Error, Result};
use crate::model::Screenshot;

/// Image payload and the caption text it was registered with.
#[derive(Clone, Debug)]
pub struct Resource {
    pub caption: String,
    pub data: Vec<u8>,
}

/// Read-only mapping from image id to payload, filled once before rendering.
#[derive(Clone, Debug, Default)]
pub struct ResourceRegistry {
    entries: HashMap<String, Resource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_screenshots<'a>(shots: impl IntoIterator<Item = &'a Screenshot>) -> Self {
        let mut registry = Self::new();
        for shot in shots {
            registry.insert(&shot.id, &shot.description, decode_payload(&shot.data));
        }
        registry
    }

    /// Load a JSON array of `{id, description, data}` entries.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        Ok(Self::from_screenshots(&load_manifest(path)?))
    }

    /// Registers a payload. An id that is already present keeps its first entry.
    pub fn insert(&mut self, id: &str, caption: &str, data: Vec<u8>) {
        if self.entries.contains_key(id) {
            log::debug!("Duplicate resource id '{id}' ignored");
            return;
        }
        self.entries.insert(
            id.to_string(),
            Resource {
                caption: caption.to_string(),
                data,
            },
        );
    }

    pub fn lookup(&self, id: &str) -> Option<&Resource> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read a screenshot manifest without decoding the payloads.
pub fn load_manifest(path: &Path) -> Result<Vec<Screenshot>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
    })?;
    let shots: Vec<Screenshot> =
        serde_json::from_str(&text).map_err(|e| Error::InvalidManifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    log::debug!("Loaded {} resources from {}", shots.len(), path.display());
    Ok(shots)
}

/// Decode a `data:` URI or bare base64 string. Undecodable input is kept as raw
/// bytes so it fails later as a bad image instead of disappearing.
pub fn decode_payload(data: &str) -> Vec<u8> {
    let trimmed = data.trim();
    let encoded = match trimmed.strip_prefix("data:") {
        Some(rest) => match rest.split_once(',') {
            Some((_, payload)) => payload,
            None => rest,
        },
        None => trimmed,
    };
    match STANDARD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Resource payload is not valid base64 ({e}); keeping raw bytes");
            encoded.as_bytes().to_vec()
        }
    }
}
