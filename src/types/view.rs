//! UI tree for the game page
//!
//! The page is a plain data structure describing what a front end should
//! draw. Renderer operations in [`crate::render`] mutate it; front ends only
//! read it.

use crate::i18n::Labels;
use crate::types::payload::OptionId;
use serde::{Deserialize, Serialize};

/// The whole page: static toolbar plus the four content areas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub toolbar: Toolbar,
    pub intro: Option<Intro>,
    pub party: Vec<CharacterCard>,
    pub history: Vec<NarrativeBlock>,
    pub choices: ChoiceArea,
    /// Index of the block the view is scrolled to, if any
    pub scroll_anchor: Option<usize>,
}

impl Page {
    /// Empty page labeled in the given language
    pub fn new(labels: &Labels) -> Self {
        Self {
            toolbar: Toolbar::new(labels),
            intro: None,
            party: Vec::new(),
            history: Vec::new(),
            choices: ChoiceArea::default(),
            scroll_anchor: None,
        }
    }
}

/// Language selector, tag input and start/random/restart buttons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toolbar {
    pub language_label: String,
    pub tag_input: TextInput,
    pub start_label: String,
    pub random_label: String,
    pub restart_label: String,
    /// Text of the overlay shown while a request is out
    pub loading_label: String,
}

impl Toolbar {
    pub fn new(labels: &Labels) -> Self {
        Self {
            language_label: labels.language.to_string(),
            tag_input: TextInput::new(labels.placeholder),
            start_label: labels.start.to_string(),
            random_label: labels.random.to_string(),
            restart_label: labels.restart.to_string(),
            loading_label: labels.loading.to_string(),
        }
    }
}

/// World summary and main plot shown above the story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intro {
    pub summary: String,
    pub main_plot: String,
}

/// One rendered party member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCard {
    pub avatar_url: Option<String>,
    pub heading: String,
    pub stats: Vec<StatBadge>,
    pub backstory: String,
    pub goal: String,
}

/// A stat shown as `CODE:value`, with the long name as hover text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBadge {
    pub code: String,
    pub value: i64,
    pub full_name: String,
}

/// A block in the story history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrativeBlock {
    /// Narrative text from the backend
    Text(String),
    /// Emphasized title line, e.g. the ending title
    Title(String),
}

impl NarrativeBlock {
    pub fn text(&self) -> &str {
        match self {
            NarrativeBlock::Text(text) | NarrativeBlock::Title(text) => text,
        }
    }
}

/// Choice buttons plus the free-action controls
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChoiceArea {
    pub buttons: Vec<Button>,
    pub free_input: Option<TextInput>,
}

impl ChoiceArea {
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty() && self.free_input.is_none()
    }

    /// Buttons bound to backend options (excluding execute/end)
    pub fn option_buttons(&self) -> impl Iterator<Item = &Button> {
        self.buttons
            .iter()
            .filter(|button| matches!(button.action, UiAction::Choose(_)))
    }

    pub fn button_for(&self, action: UiAction) -> Option<&Button> {
        self.buttons.iter().find(|button| button.action == action)
    }
}

/// A clickable control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub action: UiAction,
    pub style: ButtonStyle,
    pub enabled: bool,
}

impl Button {
    pub fn new(label: impl Into<String>, action: UiAction, style: ButtonStyle) -> Self {
        Self {
            label: label.into(),
            action,
            style,
            enabled: true,
        }
    }
}

/// What a button does when activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiAction {
    Choose(OptionId),
    ExecuteCustom,
    EndStory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonStyle {
    Default,
    Confirm,
    Danger,
}

/// A single-line text field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInput {
    pub placeholder: String,
    pub value: String,
    pub submit_on_enter: bool,
}

impl TextInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            value: String::new(),
            submit_on_enter: false,
        }
    }
}
