use thiserror::Error;

/// Errors that can arise while granting, equipping or resetting starter packs.
#[derive(Debug, Error)]
pub enum StarterPackError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, config files, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration is structurally unusable.
    #[error("config error: {0}")]
    Config(String),

    /// Target player is unknown or not connected.
    #[error("player not found: {0}")]
    PlayerNotFound(String),

    /// Player already wears armor or holds a weapon/tool.
    #[error("player already has equipment: {0}")]
    AlreadyEquipped(String),

    /// Sender lacks the admin permission. Carries the refused action.
    #[error("You don't have permission to {0}.")]
    PermissionDenied(String),
}

/// Reasons a single configured item entry is skipped by the pack builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemSpecError {
    #[error("expected a table, got {0}")]
    NotATable(&'static str),

    #[error("missing material")]
    MissingMaterial,

    #[error("invalid material: {0}")]
    UnknownMaterial(String),

    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}
