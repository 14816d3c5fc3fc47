//! Persistence of the previous counter sample between collection passes.
//!
//! The store owns one slot per metric family. Slots are independent: CPU and
//! network never contend with each other. Within a family, load and save are
//! serialized so a concurrent pass never observes a half-written sample, and
//! anything unreadable or malformed is reported as absent rather than as an
//! error, so the next pass simply starts a fresh baseline.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::*;

use super::types::{MetricFamily, PersistedSample};

pub trait SampleStore: Send + Sync {
    /// Most recent persisted sample of a family. Absent when never written,
    /// unreadable, or corrupt.
    fn load(&self, family: MetricFamily) -> Option<PersistedSample>;

    /// Overwrite the family's slot unconditionally. Persist failures are
    /// logged and swallowed: they degrade the next pass to "no rate
    /// available", never this one.
    fn save(&self, sample: &PersistedSample);
}

/// JSON-file-backed store, one file per family, written via temp file and
/// atomic rename.
pub struct FileSampleStore {
    dir: PathBuf,
    locks: HashMap<MetricFamily, Mutex<()>>,
}

impl FileSampleStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        if let Err(error) = std::fs::create_dir_all(&dir) {
            error!("Failed to create sample store folder {dir:?}: {error}");
        }

        let locks = [MetricFamily::Cpu, MetricFamily::Network]
            .into_iter()
            .map(|family| (family, Mutex::new(())))
            .collect();

        Self { dir, locks }
    }

    fn slot_path(&self, family: MetricFamily) -> PathBuf {
        self.dir.join(format!("last_{}_sample.json", family.key()))
    }

    fn lock(&self, family: MetricFamily) -> std::sync::MutexGuard<'_, ()> {
        self.locks[&family]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SampleStore for FileSampleStore {
    fn load(&self, family: MetricFamily) -> Option<PersistedSample> {
        let _guard = self.lock(family);
        let content = std::fs::read_to_string(self.slot_path(family)).ok()?;
        match serde_json::from_str::<PersistedSample>(&content) {
            Ok(sample) if sample.family == family => Some(sample),
            Ok(sample) => {
                warn!(
                    "Persisted sample in {:?} slot belongs to family {:?}, ignoring it",
                    family, sample.family
                );
                None
            }
            Err(error) => {
                warn!("Discarding corrupt persisted {family:?} sample: {error}");
                None
            }
        }
    }

    fn save(&self, sample: &PersistedSample) {
        let _guard = self.lock(sample.family);
        let path = self.slot_path(sample.family);
        let temp_path = path.with_extension("json.tmp");

        let result = serde_json::to_string(sample)
            .map_err(std::io::Error::other)
            .and_then(|content| std::fs::write(&temp_path, content))
            .and_then(|_| std::fs::rename(&temp_path, &path));

        if let Err(error) = result {
            warn!("Failed to persist {:?} sample to {path:?}: {error}", sample.family);
        }
    }
}

/// In-memory store for tests and ephemeral deployments. Tracks save counts so
/// tests can assert on the assembler's store discipline.
#[derive(Default)]
pub struct MemorySampleStore {
    slots: Mutex<HashMap<MetricFamily, PersistedSample>>,
    save_counts: Mutex<HashMap<MetricFamily, usize>>,
}

impl MemorySampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self, family: MetricFamily) -> usize {
        self.save_counts
            .lock()
            .unwrap()
            .get(&family)
            .copied()
            .unwrap_or(0)
    }
}

impl SampleStore for MemorySampleStore {
    fn load(&self, family: MetricFamily) -> Option<PersistedSample> {
        self.slots.lock().unwrap().get(&family).cloned()
    }

    fn save(&self, sample: &PersistedSample) {
        self.slots
            .lock()
            .unwrap()
            .insert(sample.family, sample.clone());
        *self
            .save_counts
            .lock()
            .unwrap()
            .entry(sample.family)
            .or_insert(0) += 1;
    }
}
