use std::fmt;

/// Where an image comes from. Decoding and loading are the host's concern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageSource {
    Uri(String),
    /// Opaque handle to a bundled asset.
    Handle(u64),
}

impl ImageSource {
    pub fn uri(uri: impl Into<String>) -> Self {
        ImageSource::Uri(uri.into())
    }

    /// Key used when no key extractor is supplied: the URI, or the handle number.
    pub fn default_key(&self) -> String {
        match self {
            ImageSource::Uri(uri) => uri.clone(),
            ImageSource::Handle(handle) => handle.to_string(),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Uri(uri) => write!(f, "{uri}"),
            ImageSource::Handle(handle) => write!(f, "asset #{handle}"),
        }
    }
}
