// Page store module
// One `<title>.txt` file per page inside the data directory

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{is_valid_title, Page};
use crate::error::WikiError;

const PAGE_EXTENSION: &str = "txt";

/// Owner read/write only
#[cfg(unix)]
const PAGE_FILE_MODE: u32 = 0o600;

/// File-backed page store
///
/// Reads take no lock. Saves to the same title are serialized through a
/// per-title async mutex so a file always ends up holding one whole body.
#[derive(Debug)]
pub struct PageStore {
    data_dir: PathBuf,
    save_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl PageStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            save_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create the store, making sure the data directory exists
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, WikiError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).map_err(|e| WikiError::io(&data_dir, e))?;
        Ok(Self::new(data_dir))
    }

    /// On-disk location of a page
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.data_dir.join(format!("{title}.{PAGE_EXTENSION}"))
    }

    /// Read a page from disk
    ///
    /// A missing file yields [`WikiError::NotFound`]; any other read failure
    /// yields [`WikiError::Io`].
    pub async fn load(&self, title: &str) -> Result<Page, WikiError> {
        if !is_valid_title(title) {
            return Err(WikiError::InvalidPath(title.to_string()));
        }

        let path = self.path_for(title);
        match fs::read(&path).await {
            Ok(body) => Ok(Page::new(title, body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(WikiError::NotFound(title.to_string())),
            Err(e) => Err(WikiError::io(path, e)),
        }
    }

    /// Write a page to disk, creating or truncating its file
    pub async fn save(&self, page: &Page) -> Result<(), WikiError> {
        if !is_valid_title(&page.title) {
            return Err(WikiError::InvalidPath(page.title.clone()));
        }

        let lock = self.title_lock(&page.title);
        let result = {
            let _guard = lock.lock().await;
            self.write_page(page).await
        };
        self.release_title_lock(&page.title, &lock);
        result
    }

    async fn write_page(&self, page: &Page) -> Result<(), WikiError> {
        let path = self.path_for(&page.title);

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(PAGE_FILE_MODE);

        let mut file = options
            .open(&path)
            .await
            .map_err(|e| WikiError::io(&path, e))?;
        file.write_all(&page.body)
            .await
            .map_err(|e| WikiError::io(&path, e))?;
        file.flush().await.map_err(|e| WikiError::io(&path, e))
    }

    fn title_lock(&self, title: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .save_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(title.to_string()).or_default())
    }

    /// Drop the table entry once no other save holds it
    fn release_title_lock(&self, title: &str, lock: &Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self
            .save_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let idle = locks
            .get(title)
            .is_some_and(|entry| Arc::ptr_eq(entry, lock) && Arc::strong_count(lock) == 2);
        if idle {
            locks.remove(title);
        }
    }

    #[cfg(test)]
    fn pending_locks(&self) -> usize {
        self.save_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
