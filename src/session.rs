//! Session identifier and the per-page client context

use crate::preferences::PreferenceStore;
use crate::types::language::Language;

/// Server-issued id correlating all requests of one playthrough
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    id: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt the id issued by the backend
    pub fn init(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.id = None;
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

/// State shared by every operation: preferences and the current session
pub struct ClientContext {
    pub preferences: PreferenceStore,
    pub session: Session,
    language: Language,
}

impl ClientContext {
    /// Load the persisted language; no session yet
    pub fn init(preferences: PreferenceStore) -> Self {
        let language = preferences.language();
        Self {
            preferences,
            session: Session::new(),
            language,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub(crate) fn set_language(&mut self, lang: Language) {
        self.language = lang;
    }
}
