use chrono::Utc;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{domain::Document, errors::CoreError, utils};

use super::{Result, StorageBackend};

const DATA_FILE: &str = "users.json";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Stores the whole document as one pretty-printed JSON file, written
/// atomically via a temp file and rename. The previous file is copied into a
/// timestamped backup before each overwrite, with bounded retention.
#[derive(Clone)]
pub struct JsonStorage {
    data_file: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = root.unwrap_or_else(utils::app_data_dir);
        ensure_dir(&app_root)?;
        let backups_dir = app_root.join("backups");
        ensure_dir(&backups_dir)?;
        Ok(Self {
            data_file: app_root.join(DATA_FILE),
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let file_name = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            entries.push(file_name);
        }
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }

    fn backup_existing_file(&self) -> Result<()> {
        if !self.data_file.exists() {
            return Ok(());
        }
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!("users_{}.{}", timestamp, BACKUP_EXTENSION);
        fs::copy(&self.data_file, self.backups_dir.join(backup_name))?;
        self.prune_backups()?;
        Ok(())
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for name in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backups_dir.join(name));
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<Document> {
        load_document_from_path(&self.data_file)
    }

    fn save(&self, document: &Document) -> Result<()> {
        self.backup_existing_file()?;
        save_document_to_path(document, &self.data_file)
    }
}

/// Loads a document, treating a missing file as the empty default. Any other
/// I/O or decode failure propagates.
pub fn load_document_from_path(path: &Path) -> Result<Document> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "document not found, starting empty");
            return Ok(Document::default());
        }
        Err(err) => return Err(CoreError::Io(err)),
    };
    let document: Document = serde_json::from_str(&data)?;
    Ok(document)
}

/// Writes the document atomically by staging to a temp file and renaming.
pub fn save_document_to_path(document: &Document, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(document)?;
    let tmp = tmp_path(path);
    write_file(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
