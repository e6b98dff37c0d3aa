//! Version tokens and partition naming.

/// Version token validation errors.
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    /// Token is empty.
    #[error("version token is empty")]
    Empty,

    /// Token contains the partition name separator.
    #[error("version token {0:?} contains ':'")]
    ReservedSeparator(String),
}

/// The active cache version token.
///
/// Every partition name starts with the token; bumping it at deploy time
/// is what makes activation prune the previous generation of caches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheVersion(String);

impl CacheVersion {
    /// Create a version token. Tokens are non-empty and must not contain
    /// `:`, which separates token from label in partition names.
    pub fn new(token: impl Into<String>) -> Result<Self, VersionError> {
        let token = token.into();
        if token.is_empty() {
            return Err(VersionError::Empty);
        }
        if token.contains(':') {
            return Err(VersionError::ReservedSeparator(token));
        }
        Ok(Self(token))
    }

    /// Get the token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Purpose label of a cache partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionKind {
    /// Resources pre-fetched at install so the shell works offline.
    Offline,
    /// Responses captured opportunistically while browsing.
    Resources,
}

impl PartitionKind {
    /// The label embedded in partition names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Resources => "resources",
        }
    }
}

impl std::fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Full partition name: `{version}:{label}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionName(String);

impl PartitionName {
    /// Compose a partition name from a version and kind.
    pub fn compose(version: &CacheVersion, kind: PartitionKind) -> Self {
        Self(format!("{}:{}", version.as_str(), kind.label()))
    }

    /// Wrap a raw name reported by the host store.
    ///
    /// Host stores can hold partitions Skiff never created; those never
    /// satisfy [`PartitionName::belongs_to`] for any valid version.
    pub fn from_raw(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Whether this partition carries the given version token.
    pub fn belongs_to(&self, version: &CacheVersion) -> bool {
        match self.0.split_once(':') {
            Some((token, _)) => token == version.as_str(),
            None => false,
        }
    }

    /// Get the name string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartitionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_rejects_empty_token() {
        assert!(matches!(CacheVersion::new(""), Err(VersionError::Empty)));
    }

    #[test]
    fn test_version_rejects_separator() {
        assert!(matches!(
            CacheVersion::new("v1:offline"),
            Err(VersionError::ReservedSeparator(_))
        ));
    }

    #[test]
    fn test_partition_name_composition() {
        let version = CacheVersion::new("site_v1.4").unwrap();
        let offline = PartitionName::compose(&version, PartitionKind::Offline);
        let resources = PartitionName::compose(&version, PartitionKind::Resources);
        assert_eq!(offline.as_str(), "site_v1.4:offline");
        assert_eq!(resources.as_str(), "site_v1.4:resources");
    }

    #[test]
    fn test_belongs_to_matches_whole_token() {
        let v1 = CacheVersion::new("v1").unwrap();
        assert!(PartitionName::from_raw("v1:offline").belongs_to(&v1));
        assert!(PartitionName::from_raw("v1:resources").belongs_to(&v1));
        // "v10" shares a prefix with "v1" but is a different token.
        assert!(!PartitionName::from_raw("v10:offline").belongs_to(&v1));
        assert!(!PartitionName::from_raw("v2:offline").belongs_to(&v1));
    }

    #[test]
    fn test_belongs_to_rejects_foreign_names() {
        let v1 = CacheVersion::new("v1").unwrap();
        assert!(!PartitionName::from_raw("unrelated-cache").belongs_to(&v1));
        assert!(!PartitionName::from_raw("").belongs_to(&v1));
    }
}
