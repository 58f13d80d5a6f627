//! Gallery rules exercised through the public core API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use keystone_core::GalleryImageId;
use keystone_core::gallery::{
    DragEnd, DropTarget, Gallery, GalleryError, GalleryImage, ImageKey, PendingFile,
    ReorderOutcome, UploadedFile,
};

fn stored(n: i64) -> Gallery {
    Gallery::from_records((1..=n).map(|id| {
        GalleryImage::persisted(
            GalleryImageId::new(id),
            format!("https://cdn.test/{id}.jpg"),
            Some(format!("key-{id}")),
            None,
            u32::try_from(id).unwrap(),
            false,
        )
    }))
}

fn key(id: i64) -> ImageKey {
    ImageKey::Persisted(GalleryImageId::new(id))
}

fn ids(gallery: &Gallery) -> Vec<i64> {
    gallery
        .images()
        .iter()
        .map(|image| image.key.persisted_id().unwrap().get())
        .collect()
}

fn orders(gallery: &Gallery) -> Vec<u32> {
    gallery.images().iter().map(GalleryImage::display_order).collect()
}

fn drag(active: i64, target: DropTarget) -> DragEnd {
    DragEnd {
        active: key(active),
        target,
    }
}

#[test]
fn test_every_move_keeps_orders_dense() {
    for from in 0..5 {
        for to in 0..5 {
            let mut gallery = stored(5);
            let active = ids(&gallery)[from];
            let outcome = gallery
                .apply_drag_end(&drag(active, DropTarget::Position(to)), |_| {})
                .unwrap();

            assert_eq!(orders(&gallery), [1, 2, 3, 4, 5], "move {from} -> {to}");
            assert_eq!(gallery.position(key(active)), Some(to));
            if from == to {
                assert_eq!(outcome, ReorderOutcome::Unchanged);
            } else {
                assert_eq!(outcome, ReorderOutcome::Moved { from, to });
            }
        }
    }
}

#[test]
fn test_callback_fires_once_with_the_new_list() {
    let mut gallery = stored(4);
    let mut calls = Vec::new();

    gallery
        .apply_drag_end(&drag(4, DropTarget::Over(key(1))), |images| {
            calls.push(
                images
                    .iter()
                    .map(|image| (image.key, image.display_order()))
                    .collect::<Vec<_>>(),
            );
        })
        .unwrap();

    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        [(key(4), 1), (key(1), 2), (key(2), 3), (key(3), 4)]
    );
}

#[test]
fn test_no_op_drops_skip_the_callback() {
    let mut gallery = stored(3);
    let before = gallery.clone();
    let mut called = false;

    for event in [
        drag(2, DropTarget::Position(1)),
        drag(2, DropTarget::Over(key(2))),
        drag(2, DropTarget::Outside),
    ] {
        let outcome = gallery.apply_drag_end(&event, |_| called = true).unwrap();
        assert_eq!(outcome, ReorderOutcome::Unchanged);
    }

    assert!(!called);
    assert_eq!(gallery, before);
}

#[test]
fn test_bad_drag_leaves_gallery_untouched() {
    let mut gallery = stored(3);
    let before = gallery.clone();

    let err = gallery
        .apply_drag_end(&drag(9, DropTarget::Position(0)), |_| {})
        .unwrap_err();
    assert_eq!(err, GalleryError::UnknownImage(key(9)));

    let err = gallery
        .apply_drag_end(&drag(1, DropTarget::Position(3)), |_| {})
        .unwrap_err();
    assert_eq!(err, GalleryError::PositionOutOfRange { position: 3, len: 3 });

    assert_eq!(gallery, before);
}

#[test]
fn test_feature_follows_the_image_through_reorders() {
    let mut gallery = stored(4);
    gallery.set_feature(key(2)).unwrap();

    gallery
        .apply_drag_end(&drag(2, DropTarget::Position(3)), |_| {})
        .unwrap();
    gallery
        .apply_drag_end(&drag(1, DropTarget::Position(3)), |_| {})
        .unwrap();

    let features: Vec<_> = gallery
        .images()
        .iter()
        .filter(|image| image.is_feature())
        .map(|image| image.key)
        .collect();
    assert_eq!(features, [key(2)]);

    gallery.set_feature(key(3)).unwrap();
    assert_eq!(gallery.feature().map(|image| image.key), Some(key(3)));
    assert_eq!(
        gallery.images().iter().filter(|image| image.is_feature()).count(),
        1
    );
}

#[test]
fn test_from_records_repairs_stored_rows() {
    let gallery = Gallery::from_records([
        GalleryImage::persisted(GalleryImageId::new(3), "c".into(), None, None, 40, true),
        GalleryImage::persisted(GalleryImageId::new(1), "a".into(), None, None, 10, true),
        GalleryImage::persisted(GalleryImageId::new(2), "b".into(), None, None, 20, false),
    ]);

    assert_eq!(ids(&gallery), [1, 2, 3]);
    assert_eq!(orders(&gallery), [1, 2, 3]);
    assert_eq!(gallery.feature().map(|image| image.key), Some(key(1)));
    assert!(gallery.check_invariants().is_ok());
}

#[test]
fn test_from_submitted_rejects_broken_lists() {
    let json = |value: serde_json::Value| -> Vec<GalleryImage> {
        serde_json::from_value(value).unwrap()
    };
    let image = |id: i64, order: u32, feature: bool| {
        serde_json::json!({
            "key": id,
            "source": { "state": "uploaded", "url": format!("https://cdn.test/{id}.jpg"), "file_key": null },
            "caption": null,
            "display_order": order,
            "is_feature": feature,
        })
    };

    let gap = json(serde_json::json!([image(1, 1, false), image(2, 3, false)]));
    assert!(matches!(
        Gallery::from_submitted(gap),
        Err(GalleryError::NonContiguousOrder { position: 1, expected: 2, found: 3 })
    ));

    let two_features = json(serde_json::json!([image(1, 1, true), image(2, 2, true)]));
    assert_eq!(
        Gallery::from_submitted(two_features),
        Err(GalleryError::MultipleFeatures { count: 2 })
    );

    let duplicate = json(serde_json::json!([image(1, 1, false), image(1, 2, false)]));
    assert_eq!(
        Gallery::from_submitted(duplicate),
        Err(GalleryError::DuplicateImage(key(1)))
    );

    let valid = json(serde_json::json!([image(1, 1, false), image(2, 2, true)]));
    assert!(Gallery::from_submitted(valid).is_ok());
}

#[test]
fn test_upload_flow_appends_then_closes_gaps_on_remove() {
    let mut gallery = stored(2);
    let pending = gallery.push_pending(
        PendingFile {
            file_name: "porch.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size: 2048,
        },
        Some("  Front porch ".to_string()),
    );

    assert_eq!(orders(&gallery), [1, 2, 3]);
    assert_eq!(
        gallery.set_feature(pending),
        Err(GalleryError::FeatureNotUploaded(pending))
    );

    gallery
        .mark_uploaded(
            pending,
            UploadedFile {
                url: "https://cdn.test/porch.jpg".to_string(),
                key: "key-porch".to_string(),
                name: "porch.jpg".to_string(),
                size: 2048,
            },
        )
        .unwrap();
    assert_eq!(gallery.get(pending).unwrap().caption.as_deref(), Some("Front porch"));
    gallery.set_feature(pending).unwrap();

    let removed = gallery.remove(key(1)).unwrap();
    assert_eq!(removed.file_key(), Some("key-1"));
    assert_eq!(orders(&gallery), [1, 2]);
    assert_eq!(gallery.file_keys(), ["key-2", "key-porch"]);

    gallery.remove(pending).unwrap();
    assert!(gallery.feature().is_none());
    assert!(gallery.check_invariants().is_ok());
}

#[test]
fn test_already_uploaded_file_can_be_featured_at_once() {
    let mut gallery = stored(1);
    let imported = gallery.push_uploaded(
        UploadedFile {
            url: "https://cdn.test/barn.jpg".to_string(),
            key: "key-barn".to_string(),
            name: "barn.jpg".to_string(),
            size: 4096,
        },
        None,
    );

    assert_eq!(gallery.pending().count(), 0);
    assert_eq!(gallery.get(imported).unwrap().display_order(), 2);
    gallery.set_feature(imported).unwrap();
    gallery
        .apply_drag_end(
            &DragEnd {
                active: imported,
                target: DropTarget::Position(0),
            },
            |_| {},
        )
        .unwrap();
    assert_eq!(gallery.feature().unwrap().display_order(), 1);
}

#[test]
fn test_submitted_blank_caption_is_stored_as_none() {
    let mut images: Vec<GalleryImage> = stored(2).into_images();
    let json = serde_json::to_value(&images).unwrap();
    let mut json = json.as_array().unwrap().clone();
    json[0]["caption"] = serde_json::Value::from("   ");
    images = serde_json::from_value(serde_json::Value::Array(json)).unwrap();
    assert_eq!(images[0].caption.as_deref(), Some("   "));

    let gallery = Gallery::from_submitted(images).unwrap();
    assert_eq!(gallery.images()[0].caption, None);
    assert!(gallery.check_invariants().is_ok());
}
