//! Config stores and the resolvers handing them out per namespace

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::{ConfigStore, FileSystem, StoreResolver};

/// Store that lives only as long as the process.
#[derive(Debug)]
pub struct MemoryStore {
    namespace: String,
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            values: RwLock::new(BTreeMap::new()),
        }
    }
}

impl ConfigStore for MemoryStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) -> Option<String> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.keys().cloned().collect()
    }

    fn save(&self) -> ApplicationResult<()> {
        Ok(())
    }
}

/// Store persisted as a flat TOML table.
///
/// Values keep their TOML type across load and save. Keys read from disk as
/// integers, floats or booleans are handed out as text and stay typed on save,
/// also when overwritten with text of the same type.
pub struct FileStore {
    namespace: String,
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    values: RwLock<BTreeMap<String, toml::Value>>,
}

impl FileStore {
    /// Opens the store, reading `path` when it exists.
    pub fn open(
        namespace: impl Into<String>,
        path: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
    ) -> ApplicationResult<Self> {
        let path = path.into();
        let values = if fs.exists(&path) {
            let content = fs
                .read_to_string(&path)
                .with_path_context("read store", &path)?;
            toml::from_str(&content).with_path_context("parse store", &path)?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            namespace: namespace.into(),
            path,
            fs,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn value_text(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Converts `text` to the scalar type of `previous`, falling back to a string.
fn typed_like(previous: Option<&toml::Value>, text: &str) -> toml::Value {
    let typed = match previous {
        Some(toml::Value::Integer(_)) => text.parse().ok().map(toml::Value::Integer),
        Some(toml::Value::Float(_)) => text.parse().ok().map(toml::Value::Float),
        Some(toml::Value::Boolean(_)) => text.parse().ok().map(toml::Value::Boolean),
        _ => None,
    };
    typed.unwrap_or_else(|| toml::Value::String(text.to_string()))
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("namespace", &self.namespace)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ConfigStore for FileStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.get(key).map(value_text)
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        let typed = typed_like(values.get(key), value);
        values.insert(key.to_string(), typed);
    }

    fn remove(&self, key: &str) -> Option<String> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.remove(key).as_ref().map(value_text)
    }

    fn keys(&self) -> Vec<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.keys().cloned().collect()
    }

    fn save(&self) -> ApplicationResult<()> {
        let content = {
            let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
            toml::to_string(&*values).with_path_context("serialize store", &self.path)?
        };
        self.fs
            .ensure_parent(&self.path)
            .with_path_context("create store directory", &self.path)?;
        self.fs
            .write(&self.path, &content)
            .with_path_context("write store", &self.path)?;
        debug!("saved store {} to {}", self.namespace, self.path.display());
        Ok(())
    }
}

/// Hands out one in-memory store per namespace.
#[derive(Debug, Default)]
pub struct MemoryStoreResolver {
    stores: Mutex<HashMap<String, Arc<dyn ConfigStore>>>,
}

impl MemoryStoreResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreResolver for MemoryStoreResolver {
    fn find_store(&self, namespace: &str) -> ApplicationResult<Arc<dyn ConfigStore>> {
        let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
        let store = stores
            .entry(namespace.to_string())
            .or_insert_with(|| Arc::new(MemoryStore::new(namespace)) as Arc<dyn ConfigStore>);
        Ok(Arc::clone(store))
    }
}

/// Hands out one file store per namespace at `<dir>/<namespace>.toml`.
pub struct FileStoreResolver {
    dir: PathBuf,
    fs: Arc<dyn FileSystem>,
    stores: Mutex<HashMap<String, Arc<dyn ConfigStore>>>,
}

impl FileStoreResolver {
    pub fn new(dir: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            dir: dir.into(),
            fs,
            stores: Mutex::new(HashMap::new()),
        }
    }

    pub fn store_path(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.toml"))
    }
}

/// Namespaces become file names and must not escape the store directory.
fn validate_namespace(namespace: &str) -> ApplicationResult<()> {
    let invalid = namespace.is_empty()
        || namespace == "."
        || namespace == ".."
        || namespace.contains(|c: char| c == '/' || c == '\\');
    if invalid {
        return Err(ApplicationError::Store {
            namespace: namespace.to_string(),
            message: "not usable as a store file name".to_string(),
        });
    }
    Ok(())
}

impl StoreResolver for FileStoreResolver {
    fn find_store(&self, namespace: &str) -> ApplicationResult<Arc<dyn ConfigStore>> {
        let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = stores.get(namespace) {
            return Ok(Arc::clone(store));
        }

        validate_namespace(namespace)?;
        let store: Arc<dyn ConfigStore> = Arc::new(FileStore::open(
            namespace,
            self.store_path(namespace),
            Arc::clone(&self.fs),
        )?);
        stores.insert(namespace.to_string(), Arc::clone(&store));
        Ok(store)
    }
}
