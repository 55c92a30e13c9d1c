use crate::config::CleanConfig;
use crate::pipeline::cleaner::{self, CleanOutcome};
use crate::pipeline::record::RawPosting;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::debug;

/// Owns the currently loaded raw batch and the active cleaning config for
/// one analysis session. Cleaning is the most expensive stage and its input
/// rarely changes between filter interactions, so results are memoized by a
/// content-stable key (hash of every raw row plus the config). Loading a
/// new batch clears the cache.
///
/// Concurrent callers asking for the same key coalesce onto a single
/// computation; distinct keys compute independently.
pub struct DatasetSession {
    raw: Vec<RawPosting>,
    config: CleanConfig,
    cache: Mutex<HashMap<u64, Arc<OnceLock<Arc<CleanOutcome>>>>>,
}

impl DatasetSession {
    pub fn new(config: CleanConfig) -> Self {
        Self {
            raw: Vec::new(),
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the loaded batch wholesale and invalidates every cached
    /// cleaning result.
    pub fn load(&mut self, raw: Vec<RawPosting>) {
        self.raw = raw;
        self.clear_cache();
        debug!(rows = self.raw.len(), "loaded new raw batch");
    }

    /// Replaces the active cleaning config. Cached results remain valid for
    /// their own keys, but subsequent `cleaned()` calls compute under the
    /// new key.
    pub fn set_config(&mut self, config: CleanConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &CleanConfig {
        &self.config
    }

    pub fn raw(&self) -> &[RawPosting] {
        &self.raw
    }

    /// The validated batch for the current raw batch and config, cleaned at
    /// most once per content identity.
    pub fn cleaned(&self) -> Arc<CleanOutcome> {
        let key = self.cache_key();
        let slot = {
            let mut cache = self.cache.lock().unwrap_or_else(|poisoned| {
                // A panic inside `clean` cannot leave partial state in the
                // map; recover the guard and continue.
                poisoned.into_inner()
            });
            Arc::clone(cache.entry(key).or_default())
        };

        // `get_or_init` blocks concurrent callers with the same key until
        // the first one finishes, giving at-most-one-clean-per-identity.
        Arc::clone(slot.get_or_init(|| {
            debug!(key, "cleaning batch (cache miss)");
            Arc::new(cleaner::clean(&self.raw, &self.config))
        }))
    }

    pub fn clear_cache(&self) {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.clear();
    }

    fn cache_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.raw.hash(&mut hasher);
        self.config.hash(&mut hasher);
        hasher.finish()
    }
}
