use crate::acceptance::AcceptanceSet;
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

const STANDARD_TYPES: &str = include_str!("../data/types.json");

/// Extension to MIME type table.
///
/// Keys are dotted lowercase extensions (`.png`). Each entry keeps its MIME
/// types in registration order. Entries are only ever added to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with the crate.
    pub fn standard() -> Self {
        match Self::from_json(STANDARD_TYPES) {
            Ok(table) => table,
            Err(err) => {
                warn!("Failed to parse the standard type table: {err}");
                Self::new()
            }
        }
    }

    /// Parse a JSON object of `".ext": ["mime/type", ...]` entries.
    ///
    /// Keys go through the same normalization as [`TypeTable::register`].
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(contents)?;
        let mut table = Self::new();
        for (extension, mime_types) in raw {
            table.register(&extension, mime_types);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup, no normalization applied to `token`.
    pub fn lookup(&self, token: &str) -> Option<&[String]> {
        self.entries.get(token).map(Vec::as_slice)
    }

    /// Extensions whose MIME list contains `mime_type`.
    pub fn extensions_for(&self, mime_type: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, mimes)| mimes.iter().any(|m| m == mime_type))
            .map(|(ext, _)| ext.as_str())
            .collect()
    }

    /// Append MIME types to an extension, creating the entry if needed.
    ///
    /// Blank extensions and blank MIME strings are ignored.
    pub fn register<I, S>(&mut self, extension: &str, mime_types: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(key) = normalize_extension(extension) else {
            debug!("Ignoring registration for blank extension");
            return;
        };

        let entry = self.entries.entry(key).or_default();
        for mime in mime_types {
            let mime = mime.as_ref().trim();
            if mime.is_empty() || entry.iter().any(|m| m == mime) {
                continue;
            }
            entry.push(mime.to_string());
        }
    }

    /// Expand raw acceptance tokens into a union-closed [`AcceptanceSet`].
    ///
    /// Each token is matched as given and dot-prefixed against the
    /// extension keys, and in reverse against every extension's MIME list.
    /// Tokens that match nothing are dropped.
    pub fn expand_acceptance<S: AsRef<str>>(&self, raw_tokens: &[S]) -> AcceptanceSet {
        let tokens: Vec<String> = raw_tokens
            .iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let mut accepted = BTreeSet::new();

        for token in &tokens {
            let dotted = format!(".{token}");
            for key in [token.as_str(), dotted.as_str()] {
                if let Some(mimes) = self.lookup(key) {
                    accepted.extend(mimes.iter().cloned());
                    accepted.insert(key.to_string());
                }
            }
        }

        for (extension, mimes) in &self.entries {
            if mimes.iter().any(|m| tokens.contains(m)) {
                accepted.extend(mimes.iter().cloned());
                accepted.insert(extension.clone());
            }
        }

        debug!(
            "Expanded {} acceptance token(s) into {} entries",
            tokens.len(),
            accepted.len()
        );

        AcceptanceSet::from_sorted(accepted.into_iter().collect())
    }
}

fn normalize_extension(extension: &str) -> Option<String> {
    let ext = extension.trim().to_lowercase();
    if ext.is_empty() || ext == "." {
        return None;
    }
    if ext.starts_with('.') {
        Some(ext)
    } else {
        Some(format!(".{ext}"))
    }
}

/// Shared handle to a [`TypeTable`].
///
/// Clones share the same table, so a registration made through one handle
/// is visible to every acceptance set expanded afterwards. Sets that were
/// already expanded keep their contents.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    table: Rc<RefCell<TypeTable>>,
}

impl TypeRegistry {
    pub fn standard() -> Self {
        Self::with_table(TypeTable::standard())
    }

    pub fn empty() -> Self {
        Self::with_table(TypeTable::new())
    }

    pub fn with_table(table: TypeTable) -> Self {
        Self {
            table: Rc::new(RefCell::new(table)),
        }
    }

    pub fn add_mime_type<I, S>(&self, extension: &str, mime_types: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.table.borrow_mut().register(extension, mime_types);
    }

    pub fn lookup(&self, token: &str) -> Option<Vec<String>> {
        self.table.borrow().lookup(token).map(<[String]>::to_vec)
    }

    pub fn extensions_for(&self, mime_type: &str) -> Vec<String> {
        self.table
            .borrow()
            .extensions_for(mime_type)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn expand_acceptance<S: AsRef<str>>(&self, raw_tokens: &[S]) -> AcceptanceSet {
        self.table.borrow().expand_acceptance(raw_tokens)
    }

    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
