use crate::error::{Error, Result};

/// Ordered, non-empty set of candidate API base URLs.
///
/// The first entry is preferred; later entries are fallbacks. Duplicates are
/// dropped at construction (first occurrence wins) so a request never hits the
/// same base URL twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointList(Vec<String>);

impl EndpointList {
    /// Build from base URLs. Trailing slashes are trimmed.
    pub fn new<I, S>(urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: Vec<String> = Vec::new();
        for url in urls {
            let url = url.as_ref().trim().trim_end_matches('/');
            if url.is_empty() {
                continue;
            }
            if !seen.iter().any(|s| s == url) {
                seen.push(url.to_string());
            }
        }

        if seen.is_empty() {
            return Err(Error::config(
                "Endpoint list is empty",
                "Configure at least one API base URL",
            ));
        }
        Ok(Self(seen))
    }

    /// The preferred endpoint.
    pub fn primary(&self) -> &str {
        // Non-empty by construction
        &self.0[0]
    }

    /// Number of distinct endpoints.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no endpoints. A constructed list never does.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Endpoints in preference order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
