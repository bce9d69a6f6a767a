use serde::{Deserialize, Serialize};

/// Id of the implicit top of every bank's hierarchy.
pub const ROOT_CATEGORY_ID: &str = "root";

/// A node in a bank's category tree.
///
/// `parent_id` is `None` only for the root sentinel and for legacy
/// root-level categories; categories created by the importer always point at
/// a parent, using [`ROOT_CATEGORY_ID`] for the first level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

impl Category {
    /// Create a category with a freshly generated id
    pub fn new(name: impl Into<String>, parent_id: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            parent_id,
        }
    }

    /// Create the root sentinel with the given display name
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            id: ROOT_CATEGORY_ID.to_string(),
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_CATEGORY_ID
    }
}
