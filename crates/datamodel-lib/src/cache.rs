//! Classification cache.
//!
//! Results are memoized per (type, cycle policy). The first lookup of a key
//! computes and publishes; every later lookup gets the published instance,
//! success or failure alike. Concurrent first lookups may both compute, but
//! only one result is published and both callers return it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use datamodel_core::{HostTypeId, TypeRegistry};
use log::{debug, trace};

use crate::classify::Classifier;
use crate::diagnostics::ErrorReport;
use crate::types::DataTypeGraph;
use crate::{Error, Result};

/// A published classification outcome.
pub type Classification = std::result::Result<Arc<DataTypeGraph>, Arc<ErrorReport>>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of published keys. Once reached, new keys are
    /// classified but not published; nothing is ever evicted.
    pub capacity: Option<usize>,
}

impl CacheConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct CacheKey {
    ty: HostTypeId,
    allow_cycles: bool,
}

#[derive(Debug)]
pub struct DataTypeCache {
    registry: Arc<TypeRegistry>,
    config: CacheConfig,
    entries: RwLock<HashMap<CacheKey, Classification>>,
    empty: Arc<ErrorReport>,
}

impl DataTypeCache {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, CacheConfig::default())
    }

    pub fn with_config(registry: Arc<TypeRegistry>, config: CacheConfig) -> Self {
        Self {
            registry,
            config,
            entries: RwLock::new(HashMap::new()),
            empty: Arc::new(ErrorReport::new()),
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    pub fn get_or_classify(&self, ty: HostTypeId, allow_cycles: bool) -> Classification {
        let key = CacheKey { ty, allow_cycles };
        if let Some(hit) = self
            .entries
            .read()
            .expect("cache lock poisoned")
            .get(&key)
        {
            trace!("cache hit for {key:?}");
            return hit.clone();
        }

        debug!("cache miss for {key:?}");
        let computed = Classifier::new(&self.registry)
            .allow_cycles(allow_cycles)
            .try_classify(ty)
            .map(Arc::new)
            .map_err(Arc::new);

        let mut entries = self.entries.write().expect("cache lock poisoned");
        let full = self
            .config
            .capacity
            .is_some_and(|capacity| entries.len() >= capacity);
        if full && !entries.contains_key(&key) {
            debug!("cache full, returning {key:?} unpublished");
            return computed;
        }
        entries.entry(key).or_insert(computed).clone()
    }

    /// Throwing classification through the cache.
    pub fn classify(&self, ty: HostTypeId, allow_cycles: bool) -> Result<Arc<DataTypeGraph>> {
        self.get_or_classify(ty, allow_cycles)
            .map_err(|report| Error::from_report(ErrorReport::clone(&report)))
    }

    /// A failed check returns the published report instance.
    pub fn try_check(&self, ty: HostTypeId, allow_cycles: bool) -> (bool, Arc<ErrorReport>) {
        match self.get_or_classify(ty, allow_cycles) {
            Ok(_) => (true, Arc::clone(&self.empty)),
            Err(report) => (false, report),
        }
    }

    pub fn check(&self, ty: HostTypeId, allow_cycles: bool) -> Result<()> {
        match self.get_or_classify(ty, allow_cycles) {
            Ok(_) => Ok(()),
            Err(report) => Err(Error::CheckFailed(ErrorReport::clone(&report))),
        }
    }

    pub fn is_data_type(&self, ty: HostTypeId, allow_cycles: bool) -> bool {
        self.get_or_classify(ty, allow_cycles).is_ok()
    }

    /// Number of published keys.
    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
