use thiserror::Error;

/// Library-level failures. Malformed archetype input is a structural bug in
/// the caller and surfaces loudly here; missing-entity reads never error and
/// instead return neutral defaults at the query site.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("invalid archetype: {0}")]
    InvalidArchetype(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
