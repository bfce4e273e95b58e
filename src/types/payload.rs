//! Wire payloads exchanged with the game backend
//!
//! Requests are serialized inside an [`Envelope`] that adds the language code
//! and session id to every body. Responses are decoded into typed structs; the
//! backend owns all story logic, so these types only carry data.

use crate::types::language::Language;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Character identifier as sent by the backend (string or integer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacterId {
    Number(i64),
    Text(String),
}

impl CharacterId {
    /// Empty strings and zero are placeholder ids for unfilled party slots
    pub fn is_valid(&self) -> bool {
        match self {
            CharacterId::Number(n) => *n != 0,
            CharacterId::Text(s) => !s.is_empty(),
        }
    }
}

/// A party member returned on game creation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub id: Option<CharacterId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub stats: OrderedMap<i64>,
    #[serde(default)]
    pub backstory: String,
    #[serde(default)]
    pub goal: String,
}

impl Character {
    pub fn has_valid_id(&self) -> bool {
        self.id.as_ref().is_some_and(CharacterId::is_valid)
    }
}

/// JSON object decoded with its key order preserved
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> OrderedMap<V> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, value)| value)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.iter().find(|(k, _)| *k == key).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<OrderedMap<V>, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

/// Party keyed by backend slot name
pub type Party = OrderedMap<Character>;

/// Option identifier, unique within its event
pub type OptionId = i64;

/// A selectable branch of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: OptionId,
    pub text: String,
}

/// One narrative beat plus its options
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoryEvent {
    pub text: String,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
}

impl StoryEvent {
    pub fn has_option(&self, id: OptionId) -> bool {
        self.options.iter().any(|option| option.id == id)
    }
}

/// Body of `POST /new`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGameRequest {
    pub tags: Vec<String>,
    pub need_avatar: bool,
    pub avatar_style: String,
}

/// Body of `POST /choice`: either a chosen option or free text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice_id: Option<OptionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_input: Option<String>,
}

impl ChoiceRequest {
    pub fn option(id: OptionId) -> Self {
        Self {
            choice_id: Some(id),
            custom_input: None,
        }
    }

    pub fn custom(text: impl Into<String>) -> Self {
        Self {
            choice_id: None,
            custom_input: Some(text.into()),
        }
    }
}

/// Body of `POST /end` (no fields besides the envelope)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EndRequest {}

/// Request body with language and session merged in
#[derive(Debug, Serialize)]
pub struct Envelope<'a, P: Serialize> {
    #[serde(flatten)]
    pub payload: &'a P,
    pub lang: Language,
    pub sid: Option<&'a str>,
}

/// Response of `POST /new`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewGameResponse {
    pub sid: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub main_plot: String,
    #[serde(default)]
    pub characters: Party,
    pub event: StoryEvent,
}

/// Response of `POST /choice`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChoiceResponse {
    #[serde(default)]
    pub result: String,
    pub event: StoryEvent,
}

/// Response of `POST /end`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EndResponse {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub ending: String,
}
