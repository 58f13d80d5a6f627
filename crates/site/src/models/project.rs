use chrono::NaiveDate;
use serde::Serialize;

use keystone_core::ProjectId;
use keystone_core::gallery::Gallery;

/// A published project as listed on the portfolio page.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub location: Option<String>,
    pub category: Option<String>,
    pub completed_on: Option<NaiveDate>,
    /// The feature image, or the first gallery image when none is flagged.
    pub cover_image_url: Option<String>,
}

/// One gallery photo in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryPhoto {
    pub url: String,
    pub caption: Option<String>,
    pub display_order: u32,
    pub is_feature: bool,
}

/// A published project with its ordered gallery.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: ProjectSummary,
    pub description: String,
    pub gallery: Vec<GalleryPhoto>,
}

impl GalleryPhoto {
    /// Photos of a stored gallery. Stored images are always uploaded, so
    /// every entry has a URL.
    #[must_use]
    pub fn from_gallery(gallery: &Gallery) -> Vec<Self> {
        gallery
            .images()
            .iter()
            .filter_map(|image| {
                image.image_url().map(|url| Self {
                    url: url.to_string(),
                    caption: image.caption.clone(),
                    display_order: image.display_order(),
                    is_feature: image.is_feature(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use keystone_core::GalleryImageId;
    use keystone_core::gallery::GalleryImage;

    use super::*;

    #[test]
    fn test_photos_follow_normalized_order() {
        // Stored orders with a gap and two feature flags.
        let gallery = Gallery::from_records([
            GalleryImage::persisted(
                GalleryImageId::new(1),
                "https://cdn.test/b.jpg".into(),
                None,
                None,
                5,
                true,
            ),
            GalleryImage::persisted(
                GalleryImageId::new(2),
                "https://cdn.test/a.jpg".into(),
                None,
                Some("Kitchen".into()),
                2,
                true,
            ),
        ]);

        let photos = GalleryPhoto::from_gallery(&gallery);
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].url, "https://cdn.test/a.jpg");
        assert_eq!(photos[0].display_order, 1);
        assert_eq!(photos[1].display_order, 2);
        assert_eq!(photos.iter().filter(|p| p.is_feature).count(), 1);
    }
}
