use crate::errors::PersistenceError;

/// Flat key/value persistence shared by the identity manager and the
/// durable retry store. One key per concern, string values (JSON for
/// structured data).
pub trait IStateStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}
