pub mod bank;
pub mod category;
pub mod question;

pub use bank::{BankMetadata, BankRegistry, BankSnapshot, DEFAULT_CATEGORY_NAME, RegistryError};
pub use category::{Category, ROOT_CATEGORY_ID};
pub use question::{Choice, Question, QuestionKind};
