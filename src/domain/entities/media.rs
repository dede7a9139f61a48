//! Media records attached to courses by the media storage service.

use std::collections::HashMap;

/// `model_type` under which course media is stored.
pub const COURSE_MODEL_TYPE: &str = "course";

/// Collection holding a course's cover image.
pub const COVER_IMAGE_COLLECTION: &str = "course_cover_image";

/// Every media collection a course may have, shown on detail pages.
pub const COURSE_MEDIA_COLLECTIONS: [&str; 3] = [
    COVER_IMAGE_COLLECTION,
    "course_content_image",
    "course_content_files",
];

/// Reference to a stored media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub id: i64,
    pub collection_name: String,
    pub name: String,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub disk: String,
    pub size: i64,
}

/// Media grouped by model id, then by collection name.
pub type MediaIndex = HashMap<i64, HashMap<String, Vec<MediaRef>>>;

/// Returns the media of one collection for one model, or an empty slice.
pub fn media_for<'a>(index: &'a MediaIndex, model_id: i64, collection: &str) -> &'a [MediaRef] {
    index
        .get(&model_id)
        .and_then(|collections| collections.get(collection))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(id: i64, collection: &str) -> MediaRef {
        MediaRef {
            id,
            collection_name: collection.to_string(),
            name: format!("media-{id}"),
            file_name: format!("media-{id}.png"),
            mime_type: Some("image/png".to_string()),
            disk: "s3".to_string(),
            size: 1024,
        }
    }

    #[test]
    fn test_media_for_present() {
        let mut index = MediaIndex::new();
        index
            .entry(10)
            .or_default()
            .insert(COVER_IMAGE_COLLECTION.to_string(), vec![media(1, COVER_IMAGE_COLLECTION)]);

        let found = media_for(&index, 10, COVER_IMAGE_COLLECTION);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[test]
    fn test_media_for_missing_model_or_collection() {
        let mut index = MediaIndex::new();
        index
            .entry(10)
            .or_default()
            .insert("course_content_image".to_string(), vec![media(1, "course_content_image")]);

        assert!(media_for(&index, 10, COVER_IMAGE_COLLECTION).is_empty());
        assert!(media_for(&index, 11, COVER_IMAGE_COLLECTION).is_empty());
    }
}
