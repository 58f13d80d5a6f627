//! Ordered project gallery.
//!
//! A project's gallery is a list of images rendered in `display_order`. The
//! back-office lets staff drag images into a new order, upload new ones, pick
//! one as the project's cover (the *feature* image) and delete others.
//!
//! [`Gallery`] owns the list and is the only thing that writes
//! `display_order` or `is_feature`, so two invariants always hold:
//!
//! - display orders are exactly `1..=N`, matching list position
//! - at most one image is the feature image
//!
//! Persistence is not done here. After a drag ends, [`Gallery::apply_drag_end`]
//! hands the whole updated list to a caller-supplied callback, and the caller
//! decides how to save it (the admin API writes it in one transaction).

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::GalleryImageId;

/// Identity of a gallery entry.
///
/// Freshly added images exist only in the editor until they are saved, so
/// they carry a random local key. Saved images use their database ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageKey {
    Persisted(GalleryImageId),
    Local(Uuid),
}

impl ImageKey {
    /// A new random local key.
    #[must_use]
    pub fn local() -> Self {
        Self::Local(Uuid::new_v4())
    }

    #[must_use]
    pub const fn persisted_id(self) -> Option<GalleryImageId> {
        match self {
            Self::Persisted(id) => Some(id),
            Self::Local(_) => None,
        }
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persisted(id) => write!(f, "#{id}"),
            Self::Local(uuid) => write!(f, "local:{uuid}"),
        }
    }
}

/// A file as reported back by the upload provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Public URL the site renders.
    pub url: String,
    /// Provider key, needed to delete the file later.
    pub key: String,
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// A file picked in the editor that has not reached the provider yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingFile {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

/// Where an entry's pixels come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ImageSource {
    Uploaded {
        url: String,
        /// Provider key. `None` for images imported from elsewhere.
        file_key: Option<String>,
    },
    Pending(PendingFile),
}

/// One entry of a [`Gallery`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GalleryImage {
    pub key: ImageKey,
    pub source: ImageSource,
    pub caption: Option<String>,
    display_order: u32,
    is_feature: bool,
}

impl GalleryImage {
    /// Rebuild an entry from a stored row.
    ///
    /// The stored order is only a sort key here; [`Gallery::from_records`]
    /// renumbers it.
    #[must_use]
    pub fn persisted(
        id: GalleryImageId,
        url: String,
        file_key: Option<String>,
        caption: Option<String>,
        display_order: u32,
        is_feature: bool,
    ) -> Self {
        Self {
            key: ImageKey::Persisted(id),
            source: ImageSource::Uploaded { url, file_key },
            caption: normalize_caption(caption),
            display_order,
            is_feature,
        }
    }

    /// 1-based position in the gallery.
    #[must_use]
    pub const fn display_order(&self) -> u32 {
        self.display_order
    }

    #[must_use]
    pub const fn is_feature(&self) -> bool {
        self.is_feature
    }

    /// Whether the file has reached the upload provider.
    #[must_use]
    pub const fn is_uploaded(&self) -> bool {
        matches!(self.source, ImageSource::Uploaded { .. })
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match &self.source {
            ImageSource::Uploaded { url, .. } => Some(url),
            ImageSource::Pending(_) => None,
        }
    }

    #[must_use]
    pub fn file_key(&self) -> Option<&str> {
        match &self.source {
            ImageSource::Uploaded { file_key, .. } => file_key.as_deref(),
            ImageSource::Pending(_) => None,
        }
    }
}

/// Where a dragged image was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DropTarget {
    /// A 0-based index in the resulting list.
    Position(usize),
    /// Onto another image: the dragged one takes its position.
    Over(ImageKey),
    /// Outside the sortable area.
    Outside,
}

/// A finished drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd {
    pub active: ImageKey,
    pub target: DropTarget,
}

/// What a reorder did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReorderOutcome {
    Unchanged,
    Moved { from: usize, to: usize },
}

/// Errors from gallery edits and from validating submitted galleries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GalleryError {
    #[error("no image {0} in this gallery")]
    UnknownImage(ImageKey),
    #[error("position {position} is out of range for a gallery of {len}")]
    PositionOutOfRange { position: usize, len: usize },
    #[error("image {0} appears more than once")]
    DuplicateImage(ImageKey),
    #[error("image at position {position} has display order {found}, expected {expected}")]
    NonContiguousOrder {
        position: usize,
        expected: u32,
        found: u32,
    },
    #[error("{count} images are marked as feature, at most one is allowed")]
    MultipleFeatures { count: usize },
    #[error("image {0} has not finished uploading and cannot be the feature image")]
    FeatureNotUploaded(ImageKey),
    #[error("image {0} is already uploaded")]
    AlreadyUploaded(ImageKey),
}

/// An ordered gallery. See the module docs for the invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Gallery {
    images: Vec<GalleryImage>,
}

impl Gallery {
    #[must_use]
    pub const fn new() -> Self {
        Self { images: Vec::new() }
    }

    /// Build a gallery from stored rows.
    ///
    /// Rows are sorted by their stored order (ties keep input order), then
    /// renumbered. If more than one row claims to be the feature image, the
    /// first one in the resulting order wins.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = GalleryImage>) -> Self {
        let mut images: Vec<GalleryImage> = records.into_iter().collect();
        images.sort_by_key(GalleryImage::display_order);

        let mut seen_feature = false;
        for image in &mut images {
            if image.is_feature && (seen_feature || !image.is_uploaded()) {
                image.is_feature = false;
            }
            seen_feature |= image.is_feature;
        }

        let mut gallery = Self { images };
        gallery.renumber();
        gallery
    }

    /// Accept a gallery exactly as a client submitted it.
    ///
    /// Unlike [`Gallery::from_records`] nothing is repaired: a list whose
    /// orders are not `1..=N` in list order, that repeats a key, or that has
    /// more than one feature image is rejected. Captions are trimmed and
    /// blank ones become `None`.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found.
    pub fn from_submitted(mut images: Vec<GalleryImage>) -> Result<Self, GalleryError> {
        for image in &mut images {
            image.caption = normalize_caption(image.caption.take());
        }
        let gallery = Self { images };
        gallery.check_invariants()?;
        Ok(gallery)
    }

    /// Verify both gallery invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), GalleryError> {
        let mut keys = HashSet::with_capacity(self.images.len());
        let mut features = 0;

        for (position, image) in self.images.iter().enumerate() {
            if !keys.insert(image.key) {
                return Err(GalleryError::DuplicateImage(image.key));
            }

            let expected = order_for(position);
            if image.display_order != expected {
                return Err(GalleryError::NonContiguousOrder {
                    position,
                    expected,
                    found: image.display_order,
                });
            }

            if image.is_feature {
                if !image.is_uploaded() {
                    return Err(GalleryError::FeatureNotUploaded(image.key));
                }
                features += 1;
            }
        }

        if features > 1 {
            return Err(GalleryError::MultipleFeatures { count: features });
        }
        Ok(())
    }

    #[must_use]
    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    #[must_use]
    pub fn into_images(self) -> Vec<GalleryImage> {
        self.images
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: ImageKey) -> Option<&GalleryImage> {
        self.images.iter().find(|image| image.key == key)
    }

    /// 0-based index of an image.
    #[must_use]
    pub fn position(&self, key: ImageKey) -> Option<usize> {
        self.images.iter().position(|image| image.key == key)
    }

    /// Display order the next appended image will get.
    #[must_use]
    pub fn next_display_order(&self) -> u32 {
        order_for(self.images.len())
    }

    #[must_use]
    pub fn feature(&self) -> Option<&GalleryImage> {
        self.images.iter().find(|image| image.is_feature)
    }

    /// Entries still waiting for the upload provider.
    pub fn pending(&self) -> impl Iterator<Item = &GalleryImage> {
        self.images.iter().filter(|image| !image.is_uploaded())
    }

    /// Provider keys of every uploaded entry.
    #[must_use]
    pub fn file_keys(&self) -> Vec<String> {
        self.images
            .iter()
            .filter_map(GalleryImage::file_key)
            .map(str::to_owned)
            .collect()
    }

    /// Move the image at `from` so that it ends up at index `to`.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::PositionOutOfRange`] if either index is past
    /// the end of the gallery.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<ReorderOutcome, GalleryError> {
        let len = self.images.len();
        for position in [from, to] {
            if position >= len {
                return Err(GalleryError::PositionOutOfRange { position, len });
            }
        }
        if from == to {
            return Ok(ReorderOutcome::Unchanged);
        }

        let image = self.images.remove(from);
        self.images.insert(to, image);
        self.renumber();
        Ok(ReorderOutcome::Moved { from, to })
    }

    /// Apply a finished drag.
    ///
    /// Dropping outside the list, or back on the starting position, changes
    /// nothing and does not call `on_change`. Otherwise the image is moved,
    /// every display order is rewritten from list position, and `on_change`
    /// receives the full updated list exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::UnknownImage`] if the dragged image or the
    /// image it was dropped on is not in this gallery, and
    /// [`GalleryError::PositionOutOfRange`] for a bad target index. The
    /// gallery is untouched on error.
    pub fn apply_drag_end<F>(
        &mut self,
        event: &DragEnd,
        on_change: F,
    ) -> Result<ReorderOutcome, GalleryError>
    where
        F: FnOnce(&[GalleryImage]),
    {
        let from = self
            .position(event.active)
            .ok_or(GalleryError::UnknownImage(event.active))?;

        let to = match event.target {
            DropTarget::Outside => return Ok(ReorderOutcome::Unchanged),
            DropTarget::Position(index) => index,
            DropTarget::Over(key) => self
                .position(key)
                .ok_or(GalleryError::UnknownImage(key))?,
        };

        let outcome = self.move_item(from, to)?;
        if matches!(outcome, ReorderOutcome::Moved { .. }) {
            on_change(&self.images);
        }
        Ok(outcome)
    }

    /// Non-mutating form of [`Gallery::apply_drag_end`].
    ///
    /// # Errors
    ///
    /// Same as [`Gallery::apply_drag_end`].
    pub fn reordered(&self, event: &DragEnd) -> Result<Self, GalleryError> {
        let mut next = self.clone();
        next.apply_drag_end(event, |_| {})?;
        Ok(next)
    }

    /// Append a picked file that still has to be uploaded.
    pub fn push_pending(&mut self, file: PendingFile, caption: Option<String>) -> ImageKey {
        self.push(ImageSource::Pending(file), caption)
    }

    /// Append a file that is already on the provider but not saved yet.
    pub fn push_uploaded(&mut self, file: UploadedFile, caption: Option<String>) -> ImageKey {
        self.push(
            ImageSource::Uploaded {
                url: file.url,
                file_key: Some(file.key),
            },
            caption,
        )
    }

    fn push(&mut self, source: ImageSource, caption: Option<String>) -> ImageKey {
        let key = ImageKey::local();
        self.images.push(GalleryImage {
            key,
            source,
            caption: normalize_caption(caption),
            display_order: self.next_display_order(),
            is_feature: false,
        });
        key
    }

    /// Record that a pending entry reached the provider.
    ///
    /// # Errors
    ///
    /// Fails if the entry is unknown or was already uploaded.
    pub fn mark_uploaded(&mut self, key: ImageKey, file: UploadedFile) -> Result<(), GalleryError> {
        let image = self.get_mut(key)?;
        if image.is_uploaded() {
            return Err(GalleryError::AlreadyUploaded(key));
        }
        image.source = ImageSource::Uploaded {
            url: file.url,
            file_key: Some(file.key),
        };
        Ok(())
    }

    /// Remove an image and close the gap in display order.
    ///
    /// Removing the feature image leaves the gallery without one.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::UnknownImage`] if the key is not present.
    pub fn remove(&mut self, key: ImageKey) -> Result<GalleryImage, GalleryError> {
        let index = self.position(key).ok_or(GalleryError::UnknownImage(key))?;
        let removed = self.images.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Make `key` the only feature image.
    ///
    /// # Errors
    ///
    /// Fails if the image is unknown or still pending upload.
    pub fn set_feature(&mut self, key: ImageKey) -> Result<(), GalleryError> {
        let image = self.get(key).ok_or(GalleryError::UnknownImage(key))?;
        if !image.is_uploaded() {
            return Err(GalleryError::FeatureNotUploaded(key));
        }
        for image in &mut self.images {
            image.is_feature = image.key == key;
        }
        Ok(())
    }

    pub fn clear_feature(&mut self) {
        for image in &mut self.images {
            image.is_feature = false;
        }
    }

    /// Replace a caption. Blank captions are stored as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::UnknownImage`] if the key is not present.
    pub fn set_caption(
        &mut self,
        key: ImageKey,
        caption: Option<String>,
    ) -> Result<(), GalleryError> {
        self.get_mut(key)?.caption = normalize_caption(caption);
        Ok(())
    }

    fn get_mut(&mut self, key: ImageKey) -> Result<&mut GalleryImage, GalleryError> {
        self.images
            .iter_mut()
            .find(|image| image.key == key)
            .ok_or(GalleryError::UnknownImage(key))
    }

    fn renumber(&mut self) {
        for (position, image) in self.images.iter_mut().enumerate() {
            image.display_order = order_for(position);
        }
    }
}

/// 1-based display order for a 0-based position.
fn order_for(position: usize) -> u32 {
    u32::try_from(position).map_or(u32::MAX, |p| p.saturating_add(1))
}

fn normalize_caption(caption: Option<String>) -> Option<String> {
    caption
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty())
}
