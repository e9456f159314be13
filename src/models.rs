use chrono::{DateTime, Utc};
use http::{HeaderMap, Method, StatusCode};
use std::fmt;

/// Audio container formats the gateway is willing to serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioExtension {
    Mp3,
    M4a,
}

impl AudioExtension {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "mp3" => Some(AudioExtension::Mp3),
            "m4a" => Some(AudioExtension::M4a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioExtension::Mp3 => "mp3",
            AudioExtension::M4a => "m4a",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            AudioExtension::Mp3 => "audio/mpeg",
            AudioExtension::M4a => "audio/mp4",
        }
    }
}

/// Identifies one stored audio object: the decoded file id plus its extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectKey {
    pub file_id: String,
    pub extension: AudioExtension,
}

impl ObjectKey {
    pub fn new(file_id: impl Into<String>, extension: AudioExtension) -> Self {
        Self {
            file_id: file_id.into(),
            extension,
        }
    }

    /// Key of the object inside the bucket, e.g. `podcasts/ep1.mp3`.
    pub fn storage_key(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.file_id, self.extension.as_str())
    }
}

/// Store-side facts about an object, read once per request.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectMetadata {
    pub size: u64,
    /// Quoted entity tag as the store reports it, possibly weak (`W/"..."`).
    pub etag: Option<String>,
    pub last_modified: DateTime<Utc>,
}

/// A satisfiable byte interval, `end` inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: u64,
    pub end: u64,
    pub length: u64,
}

impl RangeSpec {
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// The parts of an inbound request the gateway looks at.
#[derive(Clone, Debug)]
pub struct IncomingRequest {
    pub method: Method,
    /// Raw, still percent-encoded URL path.
    pub path: String,
    pub headers: HeaderMap,
}

impl IncomingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Header value as text; values that are not visible ASCII are treated as absent.
    pub fn header(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[derive(Debug)]
pub enum GatewayBody<B> {
    Empty,
    Text(&'static str),
    Stream(B),
}

/// Platform-neutral response produced by the assembler.
#[derive(Debug)]
pub struct GatewayResponse<B> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: GatewayBody<B>,
    /// Internal error description for logging; never sent to the client.
    pub failure: Option<String>,
}

#[cfg(test)]
impl<B> GatewayResponse<B> {
    pub fn header(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
