mod common;

use common::view_state;
use traceview_core::error::ViewerError;
use traceview_core::geometry::{Color, ImagePoint, ViewPoint};
use traceview_core::overlay::{OverlayKind, OverlayPatch, OverlayStore};

fn note(x: f64, y: f64, text: &str) -> OverlayKind {
    OverlayKind::Note {
        anchor: ImagePoint::new(x, y),
        text: text.to_string(),
    }
}

fn ruler(x0: f64, y0: f64, x1: f64, y1: f64) -> OverlayKind {
    OverlayKind::Ruler {
        start: ImagePoint::new(x0, y0),
        end: ImagePoint::new(x1, y1),
    }
}

fn roi(x0: f64, y0: f64, x1: f64, y1: f64) -> OverlayKind {
    OverlayKind::Roi {
        top_left: ImagePoint::new(x0, y0),
        bottom_right: ImagePoint::new(x1, y1),
    }
}

// ---------------------------------------------------------------------------
// CRUD and id discipline
// ---------------------------------------------------------------------------

#[test]
fn ids_are_monotonic_and_never_reused() {
    let mut store = OverlayStore::new();
    let a = store.add(note(1.0, 1.0, "a"), Color::RED, None).unwrap();
    let b = store.add(note(2.0, 2.0, "b"), Color::RED, None).unwrap();
    store.remove(a).unwrap();
    let c = store.add(note(3.0, 3.0, "c"), Color::RED, None).unwrap();
    assert!(b > a);
    assert!(c > b, "id {c} reissued after removal of {a}");

    store.clear();
    let d = store.add(note(4.0, 4.0, "d"), Color::RED, None).unwrap();
    assert!(d > c, "id {d} reissued after clear");
}

#[test]
fn removal_of_unknown_id_is_reported() {
    let mut store = OverlayStore::new();
    let id = store.add(note(1.0, 1.0, ""), Color::RED, None).unwrap();
    store.remove(id).unwrap();
    assert!(matches!(
        store.remove(id),
        Err(ViewerError::OverlayNotFound(_))
    ));
    assert!(store.is_empty());
}

#[test]
fn degenerate_geometry_is_rejected() {
    let mut store = OverlayStore::new();
    assert!(matches!(
        store.add(ruler(5.0, 5.0, 5.0, 5.0), Color::RED, None),
        Err(ViewerError::InvalidInput { field: "end", .. })
    ));
    assert!(matches!(
        store.add(roi(5.0, 5.0, 5.0, 5.0), Color::RED, None),
        Err(ViewerError::InvalidInput { .. })
    ));
    assert!(store.add(note(5.0, 5.0, ""), Color::RED, None).is_ok());
    // Nothing from the failed adds leaked in.
    assert_eq!(store.len(), 1);
}

#[test]
fn patch_updates_fields_and_revalidates_geometry() {
    let mut store = OverlayStore::new();
    let id = store.add(ruler(0.0, 0.0, 10.0, 0.0), Color::RED, None).unwrap();

    store
        .update(
            id,
            OverlayPatch {
                color: Some(Color([0, 255, 0])),
                note: Some(Some("artifact".into())),
                ..OverlayPatch::default()
            },
        )
        .unwrap();
    let overlay = store.get(id).unwrap();
    assert_eq!(overlay.color, Color([0, 255, 0]));
    assert_eq!(overlay.note.as_deref(), Some("artifact"));

    // Degenerate replacement geometry is rejected and nothing changes.
    let err = store.update(
        id,
        OverlayPatch {
            kind: Some(ruler(3.0, 3.0, 3.0, 3.0)),
            ..OverlayPatch::default()
        },
    );
    assert!(err.is_err());
    assert_eq!(store.get(id).unwrap().length_px(), Some(10.0));

    // Text only applies to notes.
    assert!(store
        .update(
            id,
            OverlayPatch {
                text: Some("nope".into()),
                ..OverlayPatch::default()
            },
        )
        .is_err());
}

// ---------------------------------------------------------------------------
// Hit testing
// ---------------------------------------------------------------------------

#[test]
fn hit_tolerance_is_constant_in_view_pixels() {
    let mut view = view_state((2000, 2000), (800, 600));
    let mut store = OverlayStore::new();
    let id = store.add(note(500.0, 500.0, ""), Color::RED, None).unwrap();

    for zoom in [0.5, 1.0, 4.0] {
        view.set_zoom(zoom, ViewPoint::new(400.0, 300.0));
        let at = view.to_view(ImagePoint::new(500.0, 500.0));
        // 5 view px off: always inside the 6 px tolerance.
        let near = ViewPoint::new(at.x + 5.0, at.y);
        assert_eq!(store.hit_test(near, &view), Some(id), "zoom {zoom}");
        // 7 view px off: always outside, regardless of zoom.
        let far = ViewPoint::new(at.x + 7.0, at.y);
        assert_eq!(store.hit_test(far, &view), None, "zoom {zoom}");
    }
}

#[test]
fn topmost_overlay_wins_overlapping_hits() {
    let view = view_state((800, 600), (800, 600));
    let mut store = OverlayStore::new();
    let older = store.add(note(100.0, 100.0, ""), Color::RED, None).unwrap();
    let newer = store.add(note(101.0, 100.0, ""), Color::RED, None).unwrap();

    assert_eq!(
        store.hit_test(ViewPoint::new(100.5, 100.0), &view),
        Some(newer)
    );
    store.remove(newer).unwrap();
    assert_eq!(
        store.hit_test(ViewPoint::new(100.5, 100.0), &view),
        Some(older)
    );
}

#[test]
fn ruler_hits_along_segment_and_roi_hits_inside() {
    let view = view_state((800, 600), (800, 600));
    let mut store = OverlayStore::new();
    let r = store.add(ruler(100.0, 100.0, 300.0, 100.0), Color::RED, None).unwrap();
    let a = store.add(roi(400.0, 200.0, 500.0, 300.0), Color::RED, None).unwrap();

    assert_eq!(store.hit_test(ViewPoint::new(200.0, 104.0), &view), Some(r));
    assert_eq!(store.hit_test(ViewPoint::new(200.0, 120.0), &view), None);
    assert_eq!(store.hit_test(ViewPoint::new(450.0, 250.0), &view), Some(a));
    assert_eq!(store.hit_test(ViewPoint::new(505.0, 250.0), &view), Some(a));
    assert_eq!(store.hit_test(ViewPoint::new(520.0, 250.0), &view), None);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn serde_round_trip_preserves_order_and_counter() {
    let mut store = OverlayStore::new();
    store.add(note(1.0, 1.0, "first"), Color::RED, None).unwrap();
    let removed = store
        .add(ruler(0.0, 0.0, 5.0, 5.0), Color([0, 0, 255]), Some("n".into()))
        .unwrap();
    store.add(roi(10.0, 10.0, 20.0, 30.0), Color::RED, None).unwrap();
    store.remove(removed).unwrap();

    let json = serde_json::to_string(&store).unwrap();
    let mut restored: OverlayStore = serde_json::from_str(&json).unwrap();

    let kinds: Vec<_> = restored.iter().map(|o| o.id).collect();
    let originals: Vec<_> = store.iter().map(|o| o.id).collect();
    assert_eq!(kinds, originals);

    // The id counter survives, so new ids stay unique.
    let fresh = restored.add(note(2.0, 2.0, ""), Color::RED, None).unwrap();
    assert!(originals.iter().all(|&id| fresh > id));
    assert!(fresh > removed);
}

#[test]
fn derived_measurements_are_computed_not_stored() {
    let mut store = OverlayStore::new();
    let r = store.add(ruler(0.0, 0.0, 30.0, 40.0), Color::RED, None).unwrap();
    let a = store.add(roi(100.0, 100.0, 170.0, 200.0), Color::RED, None).unwrap();

    assert_eq!(store.get(r).unwrap().length_px(), Some(50.0));
    assert_eq!(store.get(a).unwrap().area_px(), Some(7000.0));
    assert_eq!(store.get(r).unwrap().area_px(), None);

    let json = serde_json::to_string(&store).unwrap();
    assert!(!json.contains("length_px"));
    assert!(!json.contains("area_px"));
}
