//! Instance selection supplied at startup.

/// One instance to capture, immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Remote instance identifier.
    pub instance_id: String,
    /// Human-chosen name for the log file; defaults to the id.
    pub alias: String,
}

impl Resource {
    /// Parses an `id` or `id:alias` spec.
    ///
    /// Only the first two colon-separated fields are meaningful; an
    /// empty alias falls back to the id.
    pub fn parse(spec: &str) -> Self {
        let mut parts = spec.split(':');
        let instance_id = parts.next().unwrap_or_default().to_string();
        let alias = match parts.next() {
            Some(alias) if !alias.is_empty() => alias.to_string(),
            _ => instance_id.clone(),
        };
        Self { instance_id, alias }
    }
}
