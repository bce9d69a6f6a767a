use crate::models::{BankRegistry, BankSnapshot};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid bank data in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid bank id: {0}")]
    InvalidBankId(String),
    #[error("Invalid data directory: {0}")]
    InvalidDataDir(String),
}

/// Where banks live between runs.
///
/// Loading a bank that was never saved yields a fresh default bank.
pub trait BankRepository {
    fn load(&self, bank_id: &str) -> Result<BankSnapshot, IoError>;
    fn save(&self, bank_id: &str, snapshot: &BankSnapshot) -> Result<(), IoError>;
    fn remove(&self, bank_id: &str) -> Result<(), IoError>;
    fn load_registry(&self) -> Result<BankRegistry, IoError>;
    fn save_registry(&self, registry: &BankRegistry) -> Result<(), IoError>;
}

/// Banks stored as pretty-printed JSON files in one directory:
/// `registry.json` plus one `bank_<id>.json` per bank.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    data_dir: PathBuf,
    default_category_name: String,
}

impl JsonFileRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            default_category_name: crate::models::DEFAULT_CATEGORY_NAME.to_string(),
        }
    }

    /// Name given to the root category of banks that do not exist yet
    pub fn with_default_category_name(mut self, name: impl Into<String>) -> Self {
        self.default_category_name = name.into();
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn bank_path(&self, bank_id: &str) -> Result<PathBuf, IoError> {
        validate_bank_id(bank_id)?;
        Ok(self.data_dir.join(format!("bank_{bank_id}.json")))
    }

    pub fn registry_path(&self) -> PathBuf {
        self.data_dir.join("registry.json")
    }
}

impl BankRepository for JsonFileRepository {
    fn load(&self, bank_id: &str) -> Result<BankSnapshot, IoError> {
        let path = self.bank_path(bank_id)?;
        match read_json(&path)? {
            Some(snapshot) => Ok(snapshot),
            None => Ok(BankSnapshot::with_root_name(&self.default_category_name)),
        }
    }

    fn save(&self, bank_id: &str, snapshot: &BankSnapshot) -> Result<(), IoError> {
        let path = self.bank_path(bank_id)?;
        write_json(&path, snapshot)
    }

    fn remove(&self, bank_id: &str) -> Result<(), IoError> {
        let path = self.bank_path(bank_id)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn load_registry(&self) -> Result<BankRegistry, IoError> {
        Ok(read_json(&self.registry_path())?.unwrap_or_default())
    }

    fn save_registry(&self, registry: &BankRegistry) -> Result<(), IoError> {
        write_json(&self.registry_path(), registry)
    }
}

/// Repository kept in memory, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryRepository {
    banks: RefCell<HashMap<String, BankSnapshot>>,
    registry: RefCell<Option<BankRegistry>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BankRepository for MemoryRepository {
    fn load(&self, bank_id: &str) -> Result<BankSnapshot, IoError> {
        Ok(self
            .banks
            .borrow()
            .get(bank_id)
            .cloned()
            .unwrap_or_default())
    }

    fn save(&self, bank_id: &str, snapshot: &BankSnapshot) -> Result<(), IoError> {
        self.banks
            .borrow_mut()
            .insert(bank_id.to_string(), snapshot.clone());
        Ok(())
    }

    fn remove(&self, bank_id: &str) -> Result<(), IoError> {
        self.banks.borrow_mut().remove(bank_id);
        Ok(())
    }

    fn load_registry(&self) -> Result<BankRegistry, IoError> {
        Ok(self.registry.borrow().clone().unwrap_or_default())
    }

    fn save_registry(&self, registry: &BankRegistry) -> Result<(), IoError> {
        *self.registry.borrow_mut() = Some(registry.clone());
        Ok(())
    }
}

/// Bank ids become file names, so only a conservative character set is allowed
fn validate_bank_id(bank_id: &str) -> Result<(), IoError> {
    let valid = !bank_id.is_empty()
        && bank_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(IoError::InvalidBankId(bank_id.to_string()))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, IoError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| IoError::Json {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, content)?;
    Ok(())
}

pub fn validate_data_dir(path: &Path) -> Result<(), IoError> {
    if path.exists() && !path.is_dir() {
        return Err(IoError::InvalidDataDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, ROOT_CATEGORY_ID};
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_bank_yields_default() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path()).with_default_category_name("Course");

        let snapshot = repo.load("default").unwrap();

        assert_eq!(snapshot.categories.len(), 1);
        assert_eq!(snapshot.categories[0].name, "Course");
    }

    #[test]
    fn test_save_and_load_bank() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested"));
        let mut snapshot = BankSnapshot::default();
        snapshot
            .questions
            .push(Question::essay(ROOT_CATEGORY_ID, "E", "<p>x</p>"));

        repo.save("b1", &snapshot).unwrap();
        let loaded = repo.load("b1").unwrap();

        assert_eq!(loaded, snapshot);
        assert!(dir.path().join("nested").join("bank_b1.json").exists());
    }

    #[test]
    fn test_remove_bank() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        repo.save("b1", &BankSnapshot::default()).unwrap();

        repo.remove("b1").unwrap();
        repo.remove("b1").unwrap();

        assert!(!repo.bank_path("b1").unwrap().exists());
    }

    #[test]
    fn test_registry_roundtrip() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        assert_eq!(repo.load_registry().unwrap(), BankRegistry::default());

        let mut registry = BankRegistry::default();
        registry.create_bank("Physics");
        repo.save_registry(&registry).unwrap();

        assert_eq!(repo.load_registry().unwrap(), registry);
    }

    #[test]
    fn test_corrupt_bank_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        std::fs::write(dir.path().join("bank_bad.json"), "{ not json").unwrap();

        let result = repo.load("bad");
        assert!(matches!(result, Err(IoError::Json { .. })));
    }

    #[test]
    fn test_rejects_path_like_bank_ids() {
        let repo = JsonFileRepository::new("/tmp/unused");
        assert!(matches!(
            repo.bank_path("../etc"),
            Err(IoError::InvalidBankId(_))
        ));
        assert!(matches!(repo.bank_path(""), Err(IoError::InvalidBankId(_))));
    }

    #[test]
    fn test_validate_data_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();

        assert!(validate_data_dir(dir.path()).is_ok());
        assert!(validate_data_dir(&dir.path().join("missing")).is_ok());
        assert!(matches!(
            validate_data_dir(&file),
            Err(IoError::InvalidDataDir(_))
        ));
    }

    #[test]
    fn test_memory_repository() {
        let repo = MemoryRepository::new();
        let mut snapshot = BankSnapshot::default();
        snapshot.categories[0].name = "Changed".to_string();

        repo.save("x", &snapshot).unwrap();

        assert_eq!(repo.load("x").unwrap(), snapshot);
        assert_eq!(repo.load("y").unwrap(), BankSnapshot::default());
    }
}
