//! Preference store: the persisted interface language

use crate::storage::{KeyValueStore, StorageError};
use crate::types::language::Language;
use std::sync::Arc;

/// Storage key of the language preference
pub const LANGUAGE_KEY: &str = "lang";

pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persisted language, or the default when unset or unrecognized
    pub fn language(&self) -> Language {
        self.store
            .get(LANGUAGE_KEY)
            .map(|code| Language::from_code_or_default(&code))
            .unwrap_or_default()
    }

    /// Persist a new language
    pub fn set_language(&self, lang: Language) -> Result<(), StorageError> {
        log::debug!("language preference set to {lang}");
        self.store.set(LANGUAGE_KEY, lang.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_when_unset() {
        let prefs = PreferenceStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(prefs.language(), Language::Zh);
    }

    #[test]
    fn unknown_stored_code_reads_as_default() {
        let store = Arc::new(MemoryStore::new());
        store.set(LANGUAGE_KEY, "klingon").unwrap();
        let prefs = PreferenceStore::new(store);
        assert_eq!(prefs.language(), Language::Zh);
    }

    #[test]
    fn set_language_persists_under_fixed_key() {
        let store = Arc::new(MemoryStore::new());
        let prefs = PreferenceStore::new(store.clone());
        prefs.set_language(Language::En).unwrap();

        assert_eq!(store.get(LANGUAGE_KEY), Some("en".to_string()));
        assert_eq!(prefs.language(), Language::En);
    }
}
