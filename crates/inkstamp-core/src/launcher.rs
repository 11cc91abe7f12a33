//! Toolbar entries for stored signatures.

use crate::codec::SignatureCodec;
use crate::outline::{DrawnLinesFlags, OutlineExtractor, OutlineRecord, SignatureOutline};
use crate::storage::{SignatureStore, StorageResult};
use kurbo::{BezPath, Rect, Size};
use std::cell::RefCell;

/// A stored signature offered for quick reuse.
#[derive(Debug, Clone, PartialEq)]
pub struct LauncherEntry {
    pub uuid: String,
    /// Shown as the entry's title.
    pub description: String,
    pub outline: SignatureOutline,
}

/// Ordered set of toolbar entries.
#[derive(Debug, Clone, Default)]
pub struct SignatureLauncher {
    entries: Vec<LauncherEntry>,
}

impl SignatureLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build entries for everything in the store.
    ///
    /// Drawn records are re-derived by the extractor; contour records are
    /// used as stored. Records that fail to decompress are logged and skipped.
    pub async fn load(
        store: &dyn SignatureStore,
        codec: &dyn SignatureCodec,
        extractor: &dyn OutlineExtractor,
    ) -> StorageResult<Self> {
        let mut launcher = Self::new();
        for (uuid, stored) in store.get_all().await? {
            let record = match codec.decompress(&stored.signature_data).await {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Skipping stored signature {}: {}", uuid, e);
                    continue;
                }
            };
            let outline = if record.are_contours {
                contour_outline(&record)
            } else {
                let flags = DrawnLinesFlags {
                    are_contours: false,
                    thickness: record.thickness,
                };
                let dims = Size::new(record.width, record.height);
                extractor
                    .process_drawn_lines(&record.curves, dims, flags)
                    .await
                    .outline
            };
            launcher.push(LauncherEntry {
                uuid,
                description: stored.description,
                outline,
            });
        }
        log::info!("Loaded {} stored signatures", launcher.len());
        Ok(launcher)
    }

    pub fn entries(&self) -> &[LauncherEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, uuid: &str) -> Option<&LauncherEntry> {
        self.entries.iter().find(|e| e.uuid == uuid)
    }

    /// Add an entry, replacing any entry with the same uuid.
    pub fn push(&mut self, entry: LauncherEntry) {
        self.entries.retain(|e| e.uuid != entry.uuid);
        self.entries.push(entry);
    }

    pub fn remove(&mut self, uuid: &str) -> Option<LauncherEntry> {
        let index = self.entries.iter().position(|e| e.uuid == uuid)?;
        Some(self.entries.remove(index))
    }
}

/// Closed polygons over the stored contour points.
fn contour_outline(record: &OutlineRecord) -> SignatureOutline {
    let mut path = BezPath::new();
    for curve in &record.curves {
        let mut points = curve.points.iter();
        let Some(first) = points.next() else {
            continue;
        };
        path.move_to(*first);
        for p in points {
            path.line_to(*p);
        }
        path.close_path();
    }
    SignatureOutline {
        view_box: Rect::new(0.0, 0.0, record.width, record.height),
        path,
        are_contours: true,
    }
}

/// Delete a stored signature and drop its entry.
///
/// The entry stays when the store does not confirm the deletion.
pub async fn delete_signature(
    launcher: &RefCell<SignatureLauncher>,
    store: &dyn SignatureStore,
    uuid: &str,
) -> StorageResult<bool> {
    let deleted = store.delete(uuid).await?;
    if deleted {
        launcher.borrow_mut().remove(uuid);
        log::info!("Deleted stored signature {}", uuid);
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DeflateCodec;
    use crate::outline::{Curve, OutlineRecord};
    use crate::storage::{MemoryStore, StoredSignature};
    use crate::testing::{FakeExtractor, outline_for};
    use kurbo::Point;
    use pollster::block_on;

    fn store_with(codec: &DeflateCodec, entries: &[(&str, bool)]) -> MemoryStore {
        let store = MemoryStore::new();
        for &(description, are_contours) in entries {
            let record = OutlineRecord {
                curves: vec![Curve::new(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)])],
                are_contours,
                thickness: 2.0,
                width: 100.0,
                height: 50.0,
            };
            block_on(store.create(StoredSignature {
                description: description.to_string(),
                signature_data: codec.encode(&record).unwrap(),
            }))
            .unwrap();
        }
        store
    }

    #[test]
    fn test_load_restores_entries() {
        let codec = DeflateCodec::new();
        let store = store_with(&codec, &[("Jane", false), ("Stamp", true)]);
        let extractor = FakeExtractor::new();

        let launcher = block_on(SignatureLauncher::load(&store, &codec, &extractor)).unwrap();
        assert_eq!(launcher.len(), 2);

        let mut titles: Vec<_> = launcher.entries().iter().map(|e| e.description.as_str()).collect();
        titles.sort();
        assert_eq!(titles, ["Jane", "Stamp"]);

        let stamp = launcher.entries().iter().find(|e| e.description == "Stamp").unwrap();
        assert!(stamp.outline.are_contours);
        assert_eq!(extractor.processed(), 1);
    }

    #[test]
    fn test_contour_records_keep_stored_geometry() {
        let codec = DeflateCodec::new();
        let store = store_with(&codec, &[("Stamp", true)]);
        let extractor = FakeExtractor::new();

        let launcher = block_on(SignatureLauncher::load(&store, &codec, &extractor)).unwrap();
        assert_eq!(extractor.processed(), 0);

        let outline = &launcher.entries()[0].outline;
        assert!(outline.are_contours);
        assert_eq!(outline.view_box, Rect::new(0.0, 0.0, 100.0, 50.0));
        let mut expected = BezPath::new();
        expected.move_to((1.0, 2.0));
        expected.line_to((3.0, 4.0));
        expected.close_path();
        assert_eq!(outline.path, expected);
    }

    #[test]
    fn test_load_skips_corrupt_records() {
        let codec = DeflateCodec::new();
        let store = store_with(&codec, &[("Jane", false)]);
        block_on(store.create(StoredSignature {
            description: "broken".to_string(),
            signature_data: "not base64!".to_string(),
        }))
        .unwrap();

        let launcher =
            block_on(SignatureLauncher::load(&store, &codec, &FakeExtractor::new())).unwrap();
        assert_eq!(launcher.len(), 1);
        assert_eq!(launcher.entries()[0].description, "Jane");
    }

    #[test]
    fn test_push_replaces_same_uuid() {
        let mut launcher = SignatureLauncher::new();
        let entry = |description: &str| LauncherEntry {
            uuid: "abc".to_string(),
            description: description.to_string(),
            outline: outline_for(&[], false),
        };
        launcher.push(entry("first"));
        launcher.push(entry("second"));
        assert_eq!(launcher.len(), 1);
        assert_eq!(launcher.get("abc").unwrap().description, "second");
    }

    #[test]
    fn test_delete_signature() {
        let codec = DeflateCodec::new();
        let store = store_with(&codec, &[("Jane", false)]);
        let launcher = RefCell::new(
            block_on(SignatureLauncher::load(&store, &codec, &FakeExtractor::new())).unwrap(),
        );
        let uuid = launcher.borrow().entries()[0].uuid.clone();

        assert!(block_on(delete_signature(&launcher, &store, &uuid)).unwrap());
        assert!(launcher.borrow().is_empty());
        assert!(store.is_empty());

        assert!(!block_on(delete_signature(&launcher, &store, &uuid)).unwrap());
    }
}
