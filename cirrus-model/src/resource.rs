use std::slice;

use chrono::{DateTime, Utc};

use crate::image::{DisplayConstraints, Orientation};

/// One asset in the remote media library.
///
/// Resources are immutable once fetched. A refresh replaces the whole
/// collection rather than patching individual fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaResource {
    /// Stable identifier assigned by the provider (`asset_id` upstream).
    #[cfg_attr(feature = "serde", serde(alias = "asset_id"))]
    pub id: String,
    pub public_id: String,
    pub secure_url: String,
    pub width: u32,
    pub height: u32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub format: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub resource_type: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub tags: Vec<String>,
}

impl MediaResource {
    pub fn new(
        id: impl Into<String>,
        public_id: impl Into<String>,
        secure_url: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            public_id: public_id.into(),
            secure_url: secure_url.into(),
            width,
            height,
            format: None,
            resource_type: None,
            created_at: None,
            tags: Vec::new(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_dimensions(self.width, self.height)
    }

    /// Sizing rules for showing this resource full-screen in the viewer.
    pub fn display_constraints(&self) -> DisplayConstraints {
        DisplayConstraints::for_dimensions(self.width, self.height)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}

/// Ordered list of resources, most recent first.
///
/// A collection is a snapshot: operations that change it return a new
/// collection and leave the receiver untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ResourceCollection {
    items: Vec<MediaResource>,
}

impl ResourceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, MediaResource> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[MediaResource] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<MediaResource> {
        self.items
    }

    pub fn get(&self, id: &str) -> Option<&MediaResource> {
        self.items.iter().find(|resource| resource.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns `added ++ self`. Existing entries keep their relative order
    /// and none are dropped, even when an id repeats.
    pub fn prepend<I>(&self, added: I) -> Self
    where
        I: IntoIterator<Item = MediaResource>,
    {
        let mut items: Vec<MediaResource> = added.into_iter().collect();
        items.reserve(self.items.len());
        items.extend(self.items.iter().cloned());
        Self { items }
    }
}

impl From<Vec<MediaResource>> for ResourceCollection {
    fn from(items: Vec<MediaResource>) -> Self {
        Self { items }
    }
}

impl FromIterator<MediaResource> for ResourceCollection {
    fn from_iter<T: IntoIterator<Item = MediaResource>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ResourceCollection {
    type Item = MediaResource;
    type IntoIter = std::vec::IntoIter<MediaResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResourceCollection {
    type Item = &'a MediaResource;
    type IntoIter = slice::Iter<'a, MediaResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: &str) -> MediaResource {
        MediaResource::new(
            id,
            format!("gallery/{id}"),
            format!("https://res.cloudinary.com/demo/image/upload/{id}.jpg"),
            1200,
            800,
        )
    }

    fn ids(collection: &ResourceCollection) -> Vec<&str> {
        collection.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn prepend_places_new_items_first() {
        let existing: ResourceCollection =
            vec![resource("b"), resource("c")].into();
        let merged = existing.prepend(vec![resource("a")]);

        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
        assert_eq!(ids(&existing), vec!["b", "c"]);
    }

    #[test]
    fn prepend_keeps_duplicates_and_order() {
        let existing: ResourceCollection =
            vec![resource("a"), resource("b")].into();
        let merged = existing.prepend(vec![resource("b"), resource("z")]);

        assert_eq!(ids(&merged), vec!["b", "z", "a", "b"]);
    }

    #[test]
    fn prepend_onto_empty_is_the_added_list() {
        let merged =
            ResourceCollection::new().prepend(vec![resource("x")]);
        assert_eq!(ids(&merged), vec!["x"]);
    }

    #[test]
    fn lookup_by_id() {
        let collection: ResourceCollection =
            vec![resource("a"), resource("b")].into();
        assert!(collection.contains_id("b"));
        assert!(!collection.contains_id("q"));
        assert_eq!(collection.get("a").map(|r| r.width), Some(1200));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_asset_id_alias() {
        let json = serde_json::json!({
            "asset_id": "3515c6000a548515f1134043f9785c2f",
            "public_id": "gallery/sample",
            "secure_url": "https://res.cloudinary.com/demo/image/upload/sample.jpg",
            "width": 864,
            "height": 576,
            "format": "jpg",
            "created_at": "2024-03-01T10:00:00Z",
            "tags": ["library"]
        });

        let parsed: MediaResource =
            serde_json::from_value(json).expect("resource");
        assert_eq!(parsed.id, "3515c6000a548515f1134043f9785c2f");
        assert_eq!(parsed.format.as_deref(), Some("jpg"));
        assert!(parsed.has_tag("library"));
        assert!(parsed.created_at.is_some());
    }
}
