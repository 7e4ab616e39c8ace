use std::fmt;

/// Base namespace shared by every resource listing.
pub const RESOURCES_NAMESPACE: &str = "resources";

/// Identifies one cached resource collection: a fixed namespace plus an
/// optional grouping tag. Keys with different tags never share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    namespace: &'static str,
    tag: Option<String>,
}

impl CacheKey {
    pub fn resources(tag: Option<String>) -> Self {
        Self {
            namespace: RESOURCES_NAMESPACE,
            tag,
        }
    }

    pub fn tagged(tag: impl Into<String>) -> Self {
        Self::resources(Some(tag.into()))
    }

    /// Key for the untagged listing.
    pub fn untagged() -> Self {
        Self {
            namespace: RESOURCES_NAMESPACE,
            tag: None,
        }
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn shares_namespace(&self, namespace: &str) -> bool {
        self.namespace == namespace
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{}:{}", self.namespace, tag),
            None => f.write_str(self.namespace),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_partition_keys() {
        let a = CacheKey::tagged("a");
        let b = CacheKey::tagged("b");
        let none = CacheKey::untagged();

        assert_ne!(a, b);
        assert_ne!(a, none);
        assert_eq!(a, CacheKey::resources(Some("a".to_string())));
        assert!(a.shares_namespace(RESOURCES_NAMESPACE));
        assert!(none.shares_namespace(RESOURCES_NAMESPACE));
    }

    #[test]
    fn display_includes_tag() {
        assert_eq!(CacheKey::tagged("trip").to_string(), "resources:trip");
        assert_eq!(CacheKey::untagged().to_string(), "resources");
    }
}
