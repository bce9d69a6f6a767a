use serde::{Deserialize, Serialize};

use super::{Category, Question};

/// Display name given to the root sentinel of a new bank
pub const DEFAULT_CATEGORY_NAME: &str = "Default";

/// Persisted content of one question bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSnapshot {
    pub categories: Vec<Category>,
    pub questions: Vec<Question>,
}

impl BankSnapshot {
    /// A bank holding only the root sentinel
    pub fn with_root_name(root_name: impl Into<String>) -> Self {
        Self {
            categories: vec![Category::root(root_name)],
            questions: Vec::new(),
        }
    }
}

impl Default for BankSnapshot {
    fn default() -> Self {
        Self::with_root_name(DEFAULT_CATEGORY_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankMetadata {
    pub id: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Bank not found: {0}")]
    NotFound(String),
    #[error("Cannot delete the only remaining bank")]
    LastBank,
}

/// The list of known banks and which one is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankRegistry {
    pub banks: Vec<BankMetadata>,
    pub active_bank_id: String,
}

impl Default for BankRegistry {
    fn default() -> Self {
        Self {
            banks: vec![BankMetadata {
                id: "default".to_string(),
                name: "Default Bank".to_string(),
            }],
            active_bank_id: "default".to_string(),
        }
    }
}

impl BankRegistry {
    pub fn get(&self, bank_id: &str) -> Option<&BankMetadata> {
        self.banks.iter().find(|b| b.id == bank_id)
    }

    pub fn active(&self) -> Option<&BankMetadata> {
        self.get(&self.active_bank_id)
    }

    /// Register a new bank and make it active, returning its id
    pub fn create_bank(&mut self, name: impl Into<String>) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.banks.push(BankMetadata {
            id: id.clone(),
            name: name.into(),
        });
        self.active_bank_id = id.clone();
        id
    }

    pub fn rename_bank(
        &mut self,
        bank_id: &str,
        name: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let bank = self
            .banks
            .iter_mut()
            .find(|b| b.id == bank_id)
            .ok_or_else(|| RegistryError::NotFound(bank_id.to_string()))?;
        bank.name = name.into();
        Ok(())
    }

    /// Remove a bank from the registry.
    ///
    /// Deleting the active bank activates the first remaining one.
    pub fn delete_bank(&mut self, bank_id: &str) -> Result<BankMetadata, RegistryError> {
        let index = self
            .banks
            .iter()
            .position(|b| b.id == bank_id)
            .ok_or_else(|| RegistryError::NotFound(bank_id.to_string()))?;
        if self.banks.len() == 1 {
            return Err(RegistryError::LastBank);
        }

        let removed = self.banks.remove(index);
        if self.active_bank_id == removed.id {
            self.active_bank_id = self.banks[0].id.clone();
        }
        Ok(removed)
    }

    pub fn switch_bank(&mut self, bank_id: &str) -> Result<(), RegistryError> {
        if self.get(bank_id).is_none() {
            return Err(RegistryError::NotFound(bank_id.to_string()));
        }
        self.active_bank_id = bank_id.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_has_root_only() {
        let snapshot = BankSnapshot::default();
        assert_eq!(snapshot.categories.len(), 1);
        assert!(snapshot.categories[0].is_root());
        assert_eq!(snapshot.categories[0].name, DEFAULT_CATEGORY_NAME);
        assert!(snapshot.questions.is_empty());
    }

    #[test]
    fn test_create_bank_becomes_active() {
        let mut registry = BankRegistry::default();
        let id = registry.create_bank("Physics");

        assert_eq!(registry.banks.len(), 2);
        assert_eq!(registry.active_bank_id, id);
        assert_eq!(registry.active().unwrap().name, "Physics");
    }

    #[test]
    fn test_delete_active_bank_activates_first_remaining() {
        let mut registry = BankRegistry::default();
        let id = registry.create_bank("Physics");

        let removed = registry.delete_bank(&id).unwrap();

        assert_eq!(removed.name, "Physics");
        assert_eq!(registry.active_bank_id, "default");
    }

    #[test]
    fn test_cannot_delete_last_bank() {
        let mut registry = BankRegistry::default();
        assert_eq!(registry.delete_bank("default"), Err(RegistryError::LastBank));
    }

    #[test]
    fn test_rename_and_switch_unknown_bank() {
        let mut registry = BankRegistry::default();
        assert!(matches!(
            registry.rename_bank("missing", "x"),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            registry.switch_bank("missing"),
            Err(RegistryError::NotFound(_))
        ));

        registry.rename_bank("default", "Main").unwrap();
        assert_eq!(registry.get("default").unwrap().name, "Main");
    }
}
