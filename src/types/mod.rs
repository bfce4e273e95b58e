//! Core types for the gamo client
//!
//! - Language: interface language and wire code
//! - Payload: request and response bodies of the backend
//! - View: the UI tree front ends draw

pub mod language;
pub mod payload;
pub mod view;

pub use language::Language;
pub use payload::{
    Character, CharacterId, ChoiceOption, OptionId, OrderedMap, Party, StoryEvent,
};
pub use view::{NarrativeBlock, Page};
