use crate::host::FileDescriptor;
use itertools::Itertools;
use serde::Serialize;

/// Normalized, union-closed set of accepted tokens.
///
/// Tokens are either dotted extensions (`.png`) or MIME types
/// (`image/png`), kept sorted and deduplicated. An empty set accepts every
/// file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AcceptanceSet {
    tokens: Vec<String>,
}

impl AcceptanceSet {
    /// Accepts everything.
    pub fn any() -> Self {
        Self::default()
    }

    pub(crate) fn from_sorted(tokens: Vec<String>) -> Self {
        debug_assert!(tokens.windows(2).all(|w| w[0] < w[1]));
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens
            .binary_search_by(|probe| probe.as_str().cmp(token))
            .is_ok()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Dotted extensions only.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|t| t.starts_with('.'))
    }

    /// Value for an HTML-style `accept` attribute.
    pub fn accept_attribute(&self) -> String {
        self.tokens.iter().join(", ")
    }

    pub fn is_acceptable<F: FileDescriptor + ?Sized>(&self, file: &F) -> bool {
        if self.is_empty() {
            return true;
        }

        let mime = file.mime_type();
        if !mime.is_empty() && self.contains(mime) {
            return true;
        }

        match extension_token(file.name()) {
            Some(ext) => self.contains(&ext),
            None => false,
        }
    }

    /// Split `files` into `(accepted, rejected)`, preserving order.
    pub fn partition<F: FileDescriptor>(&self, files: Vec<F>) -> (Vec<F>, Vec<F>) {
        files.into_iter().partition(|file| self.is_acceptable(file))
    }
}

/// `.ext` for the last dot-separated suffix of `name`.
fn extension_token(name: &str) -> Option<String> {
    let (_, suffix) = name.rsplit_once('.')?;
    Some(format!(".{}", suffix.trim().to_lowercase()))
}
