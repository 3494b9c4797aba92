use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

pub const DEFAULT_CACHE_PREFIX: &str = "activity-tracker";
pub const DEFAULT_CACHE_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    NotFound(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound(path) => write!(f, "asset not found: {path}"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Where assets come from when they are not cached.
pub trait AssetSource {
    fn fetch(&self, path: &str) -> Result<Asset, AssetError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheGeneration {
    prefix: String,
    version: u32,
}

impl CacheGeneration {
    pub fn new(prefix: impl Into<String>, version: u32) -> Self {
        Self {
            prefix: prefix.into(),
            version,
        }
    }

    pub fn name(&self) -> String {
        format!("{}-v{}", self.prefix, self.version)
    }

    pub fn previous(&self) -> Option<String> {
        match self.version {
            0 | 1 => None,
            version => Some(format!("{}-v{}", self.prefix, version - 1)),
        }
    }
}

impl Default for CacheGeneration {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_PREFIX, DEFAULT_CACHE_VERSION)
    }
}

/// Named caches of path -> asset.
#[derive(Debug, Default)]
pub struct CacheStorage {
    caches: BTreeMap<String, BTreeMap<String, Asset>>,
}

impl CacheStorage {
    pub fn open(&mut self, name: &str) -> &mut BTreeMap<String, Asset> {
        self.caches.entry(name.to_string()).or_default()
    }

    pub fn delete(&mut self, name: &str) -> bool {
        self.caches.remove(name).is_some()
    }

    pub fn keys(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    /// Searches every cache, oldest name first.
    pub fn lookup(&self, path: &str) -> Option<&Asset> {
        self.caches.values().find_map(|cache| cache.get(path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Served {
    Cache(Asset),
    Network(Asset),
}

impl Served {
    pub fn from_cache(&self) -> bool {
        matches!(self, Served::Cache(_))
    }

    pub fn into_asset(self) -> Asset {
        match self {
            Served::Cache(asset) | Served::Network(asset) => asset,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OfflineCache {
    generation: CacheGeneration,
    manifest: Vec<String>,
    controlling: bool,
}

impl OfflineCache {
    pub fn new(generation: CacheGeneration, manifest: &[&str]) -> Self {
        Self {
            generation,
            manifest: manifest.iter().map(|path| path.to_string()).collect(),
            controlling: false,
        }
    }

    pub fn is_controlling(&self) -> bool {
        self.controlling
    }

    /// Drops the previous generation and fills the current one from the
    /// manifest. Nothing is stored unless every manifest entry resolves.
    pub fn install(
        &self,
        storage: &mut CacheStorage,
        source: &dyn AssetSource,
    ) -> Result<usize, AssetError> {
        if let Some(previous) = self.generation.previous() {
            if storage.delete(&previous) {
                info!(cache = %previous, "deleted previous cache generation");
            }
        }

        let assets = self
            .manifest
            .iter()
            .map(|path| source.fetch(path).map(|asset| (path.clone(), asset)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let count = assets.len();
        storage.open(&self.generation.name()).extend(assets);
        info!(cache = %self.generation.name(), assets = count, "installed asset cache");
        Ok(count)
    }

    /// Deletes every generation except the current one and takes control.
    pub fn activate(&mut self, storage: &mut CacheStorage) -> Vec<String> {
        let current = self.generation.name();
        let stale: Vec<String> = storage
            .keys()
            .into_iter()
            .filter(|name| *name != current)
            .collect();
        for name in &stale {
            storage.delete(name);
            info!(cache = %name, "deleted stale cache generation");
        }
        self.controlling = true;
        stale
    }

    /// Cache-first lookup; misses go to `source` and are not stored.
    pub fn fetch(
        &self,
        storage: &CacheStorage,
        source: &dyn AssetSource,
        path: &str,
    ) -> Result<Served, AssetError> {
        if let Some(asset) = storage.lookup(path) {
            return Ok(Served::Cache(asset.clone()));
        }
        debug!(%path, "asset cache miss");
        source.fetch(path).map(Served::Network)
    }

    /// Browser-side worker using this generation name. `page_urls` are
    /// cached alongside the manifest.
    pub fn service_worker_script(&self, page_urls: &[&str]) -> String {
        let urls: Vec<&str> = page_urls
            .iter()
            .copied()
            .chain(self.manifest.iter().map(String::as_str))
            .collect();
        let urls = serde_json::to_string_pretty(&urls).unwrap_or_else(|_| "[]".to_string());
        let previous = match self.generation.previous() {
            Some(name) => format!("'{name}'"),
            None => "null".to_string(),
        };

        SERVICE_WORKER_JS
            .replace("{{CACHE_NAME}}", &self.generation.name())
            .replace("{{PREVIOUS_CACHE}}", &previous)
            .replace("{{URLS}}", &urls)
    }
}

/// Installed offline cache together with the source it falls back to.
pub struct AssetCache<S> {
    worker: OfflineCache,
    storage: CacheStorage,
    source: S,
}

impl<S: AssetSource> AssetCache<S> {
    /// Runs install then activate.
    pub fn start(mut worker: OfflineCache, source: S) -> Result<Self, AssetError> {
        let mut storage = CacheStorage::default();
        worker.install(&mut storage, &source)?;
        worker.activate(&mut storage);
        Ok(Self {
            worker,
            storage,
            source,
        })
    }

    pub fn worker(&self) -> &OfflineCache {
        &self.worker
    }

    pub fn serve(&self, path: &str) -> Result<Served, AssetError> {
        self.worker.fetch(&self.storage, &self.source, path)
    }
}

const SERVICE_WORKER_JS: &str = r#"const CACHE_NAME = '{{CACHE_NAME}}';
const PREVIOUS_CACHE = {{PREVIOUS_CACHE}};
const urlsToCache = {{URLS}};

self.addEventListener('install', (event) => {
  self.skipWaiting();
  const cleared = PREVIOUS_CACHE ? caches.delete(PREVIOUS_CACHE) : Promise.resolve(false);
  event.waitUntil(
    cleared
      .then(() => caches.open(CACHE_NAME))
      .then((cache) => cache.addAll(urlsToCache))
  );
});

self.addEventListener('activate', (event) => {
  event.waitUntil(
    caches.keys()
      .then((names) => Promise.all(
        names.filter((name) => name !== CACHE_NAME).map((name) => caches.delete(name))
      ))
      .then(() => self.clients.claim())
  );
});

self.addEventListener('fetch', (event) => {
  event.respondWith(
    caches.match(event.request).then((response) => response || fetch(event.request))
  );
});
"#;
