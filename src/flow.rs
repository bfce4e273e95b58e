//! Game flow controller
//!
//! Sequences the three backend calls and keeps the page in step with them:
//!
//! ```text
//! Idle --start/surprise--> Playing --choose/custom_act--> Playing
//!                          Playing --end_game--> Ended
//! any  --restart--> Idle
//! ```
//!
//! Every operation takes `&mut self`, so a second action cannot begin while
//! one is awaiting the backend. Failures of any kind go through
//! [`GameFlow::present_error`], which shows one message through the
//! [`Notifier`] and hands the error back to the caller.

use crate::api::{ApiClient, ApiError, Endpoint, RequestContext};
use crate::i18n::{self, Labels};
use crate::presets::{self, Preset};
use crate::render;
use crate::session::ClientContext;
use crate::storage::StorageError;
use crate::tags::parse_tags;
use crate::types::language::Language;
use crate::types::payload::{
    ChoiceRequest, ChoiceResponse, EndRequest, EndResponse, NewGameRequest, NewGameResponse,
    OptionId, StoryEvent,
};
use crate::types::view::{NarrativeBlock, Page, UiAction};
use rand::Rng;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Shows a blocking message to the user
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Idle,
    Playing,
    Ended,
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("no tags given")]
    EmptyTags,

    #[error("no story in progress")]
    NotPlaying,

    #[error("option {0} is not offered by the current event")]
    UnknownOption(OptionId),

    #[error("the current event offers no further actions")]
    NoOpenChoices,

    #[error("choices are locked until the story is restarted")]
    ChoicesLocked,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Per-game request options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOptions {
    pub need_avatar: bool,
    pub avatar_style: String,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            need_avatar: true,
            avatar_style: "anime".to_string(),
        }
    }
}

pub struct GameFlow {
    ctx: ClientContext,
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    options: GameOptions,
    page: Page,
    state: GameState,
    current_event: Option<StoryEvent>,
}

impl GameFlow {
    pub fn new(
        ctx: ClientContext,
        api: ApiClient,
        notifier: Arc<dyn Notifier>,
        options: GameOptions,
    ) -> Self {
        let page = Page::new(i18n::labels(ctx.language()));
        Self {
            ctx,
            api,
            notifier,
            options,
            page,
            state: GameState::Idle,
            current_event: None,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    pub fn session_id(&self) -> Option<&str> {
        self.ctx.session.id()
    }

    pub fn current_event(&self) -> Option<&StoryEvent> {
        self.current_event.as_ref()
    }

    pub fn language(&self) -> Language {
        self.ctx.language()
    }

    fn labels(&self) -> &'static Labels {
        i18n::labels(self.ctx.language())
    }

    /// Replace the text of the tag input
    pub fn set_tag_input(&mut self, text: impl Into<String>) {
        self.page.toolbar.tag_input.value = text.into();
    }

    /// Replace the text of the free-action input, if it is shown
    pub fn set_free_input(&mut self, text: impl Into<String>) {
        if let Some(input) = &mut self.page.choices.free_input {
            input.value = text.into();
        }
    }

    /// Switch language, relabel the static strings, and persist the choice
    ///
    /// The page is relabeled even when the preference cannot be written; the
    /// write failure is still reported.
    pub fn set_language(&mut self, lang: Language) -> Result<(), FlowError> {
        self.ctx.set_language(lang);
        render::relabel(&mut self.page, i18n::labels(lang));
        self.ctx
            .preferences
            .set_language(lang)
            .map_err(|e| self.present_error(FlowError::Storage(e)))
    }

    /// Like [`set_language`](Self::set_language); unknown codes select the default
    pub fn set_language_code(&mut self, code: &str) -> Result<(), FlowError> {
        self.set_language(Language::from_code_or_default(code))
    }

    /// Start a new story from the tag input
    pub async fn start(&mut self) -> Result<(), FlowError> {
        let tags = parse_tags(&self.page.toolbar.tag_input.value);
        if tags.is_empty() {
            return Err(self.present_error(FlowError::EmptyTags));
        }
        self.begin(tags).await
    }

    /// Start a new story from a randomly chosen preset
    pub async fn surprise(&mut self) -> Result<(), FlowError> {
        let preset = presets::pick(&mut rand::thread_rng());
        self.start_preset(preset).await
    }

    /// [`surprise`](Self::surprise) with a caller-supplied random source
    pub async fn surprise_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), FlowError> {
        let preset = presets::pick(rng);
        self.start_preset(preset).await
    }

    async fn start_preset(&mut self, preset: &Preset) -> Result<(), FlowError> {
        let tags = preset.tags(self.ctx.language());
        self.set_tag_input(tags);
        self.begin(parse_tags(tags)).await
    }

    async fn begin(&mut self, tags: Vec<String>) -> Result<(), FlowError> {
        render::reset_all(&mut self.page);
        self.state = GameState::Idle;
        self.current_event = None;
        self.ctx.session.clear();

        log::info!("starting story with tags {tags:?}");
        let request = NewGameRequest {
            tags,
            need_avatar: self.options.need_avatar,
            avatar_style: self.options.avatar_style.clone(),
        };
        let data: NewGameResponse = self.request(Endpoint::NewGame, &request).await?;

        self.ctx.session.init(data.sid);
        render::render_intro(&mut self.page, &data.summary, &data.main_plot);
        render::render_party(&mut self.page, &data.characters);
        self.show_event(data.event);
        self.state = GameState::Playing;
        log::debug!("session {:?} started", self.ctx.session.id());
        Ok(())
    }

    /// Pick one of the current event's options
    pub async fn choose(&mut self, id: OptionId) -> Result<(), FlowError> {
        if let Err(e) = self.ensure_available(UiAction::Choose(id)) {
            return Err(self.present_error(e));
        }
        render::disable_choices(&mut self.page);

        let data: ChoiceResponse = self
            .request(Endpoint::Choice, &ChoiceRequest::option(id))
            .await?;
        self.apply_choice(data);
        Ok(())
    }

    /// Submit the free-action input; blank input is ignored
    pub async fn custom_act(&mut self) -> Result<(), FlowError> {
        let text = match &self.page.choices.free_input {
            Some(input) => input.value.trim().to_string(),
            None => String::new(),
        };
        if text.is_empty() {
            return Ok(());
        }
        if let Err(e) = self.ensure_available(UiAction::ExecuteCustom) {
            return Err(self.present_error(e));
        }
        self.set_free_input("");
        render::disable_choices(&mut self.page);

        let data: ChoiceResponse = self
            .request(Endpoint::Choice, &ChoiceRequest::custom(text))
            .await?;
        self.apply_choice(data);
        Ok(())
    }

    /// Ask the backend for an ending and close the story
    pub async fn end_game(&mut self) -> Result<(), FlowError> {
        if let Err(e) = self.ensure_available(UiAction::EndStory) {
            return Err(self.present_error(e));
        }
        render::disable_choices(&mut self.page);

        let data: EndResponse = self.request(Endpoint::End, &EndRequest::default()).await?;

        render::clear_choices(&mut self.page);
        render::append_narrative(
            &mut self.page,
            NarrativeBlock::Title(format!("=== {} ===", data.title)),
        );
        render::append_narrative(&mut self.page, NarrativeBlock::Text(data.ending));
        self.current_event = None;
        self.state = GameState::Ended;
        log::info!("story ended");
        Ok(())
    }

    /// Drop the session and every piece of view state
    pub fn restart(&mut self) {
        self.ctx.session.clear();
        self.page = Page::new(self.labels());
        self.current_event = None;
        self.state = GameState::Idle;
        log::debug!("restarted");
    }

    /// Show an error to the user and hand it back
    pub fn present_error(&self, error: FlowError) -> FlowError {
        let message = match &error {
            FlowError::EmptyTags => self.labels().placeholder.to_string(),
            FlowError::Api(api) => api.user_message(),
            other => other.to_string(),
        };
        log::warn!("{error}");
        self.notifier.alert(&message);
        error
    }

    async fn request<P, R>(&self, endpoint: Endpoint, payload: &P) -> Result<R, FlowError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let ctx = RequestContext {
            lang: self.ctx.language(),
            sid: self.ctx.session.id(),
        };
        match self.api.call(endpoint, payload, ctx).await {
            Ok(data) => Ok(data),
            Err(e) => Err(self.present_error(FlowError::Api(e))),
        }
    }

    fn ensure_available(&self, action: UiAction) -> Result<(), FlowError> {
        if self.state != GameState::Playing {
            return Err(FlowError::NotPlaying);
        }
        match self.page.choices.button_for(action) {
            Some(button) if button.enabled => Ok(()),
            Some(_) => Err(FlowError::ChoicesLocked),
            None => match action {
                UiAction::Choose(id) if self.page.choices.free_input.is_some() => {
                    Err(FlowError::UnknownOption(id))
                }
                _ => Err(FlowError::NoOpenChoices),
            },
        }
    }

    fn apply_choice(&mut self, data: ChoiceResponse) {
        render::append_narrative(&mut self.page, NarrativeBlock::Text(data.result));
        self.show_event(data.event);
    }

    fn show_event(&mut self, event: StoryEvent) {
        let labels = self.labels();
        render::append_narrative(&mut self.page, NarrativeBlock::Text(event.text.clone()));
        render::render_choices(&mut self.page, &event.options, labels);
        self.current_event = Some(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LoadingFlag;
    use crate::preferences::PreferenceStore;
    use crate::storage::MemoryStore;
    use crate::testing::{RecordingNotifier, ScriptedTransport};
    use serde_json::json;

    struct Harness {
        flow: GameFlow,
        transport: Arc<ScriptedTransport>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness() -> Harness {
        let transport = Arc::new(ScriptedTransport::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let ctx = ClientContext::init(PreferenceStore::new(Arc::new(MemoryStore::new())));
        let api = ApiClient::new(transport.clone(), Arc::new(LoadingFlag::new()));
        let flow = GameFlow::new(ctx, api, notifier.clone(), GameOptions::default());
        Harness {
            flow,
            transport,
            notifier,
        }
    }

    fn new_game(options: serde_json::Value) -> serde_json::Value {
        json!({
            "sid": "s1",
            "summary": "S",
            "main_plot": "P",
            "characters": {},
            "event": { "text": "E1", "options": options }
        })
    }

    #[tokio::test]
    async fn choose_outside_a_story_is_rejected_locally() {
        let mut h = harness();
        let err = h.flow.choose(1).await.unwrap_err();
        assert!(matches!(err, FlowError::NotPlaying));
        assert_eq!(h.transport.request_count(), 0);
        assert_eq!(h.notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn unknown_option_is_rejected_locally() {
        let mut h = harness();
        h.transport
            .push_json(new_game(json!([{ "id": 1, "text": "Fight" }])));
        h.flow.set_tag_input("isekai");
        h.flow.start().await.unwrap();

        let err = h.flow.choose(9).await.unwrap_err();
        assert!(matches!(err, FlowError::UnknownOption(9)));
        assert_eq!(h.transport.request_count(), 1);
        assert!(h.flow.page().choices.buttons.iter().all(|b| b.enabled));
    }

    #[tokio::test]
    async fn failed_choice_leaves_choices_locked() {
        let mut h = harness();
        h.transport
            .push_json(new_game(json!([{ "id": 1, "text": "Fight" }])));
        h.transport.push_status(500, "boom");
        h.flow.set_tag_input("isekai");
        h.flow.start().await.unwrap();

        let err = h.flow.choose(1).await.unwrap_err();
        assert!(matches!(err, FlowError::Api(ApiError::Status { status: 500, .. })));
        assert_eq!(h.notifier.messages(), vec!["boom".to_string()]);
        assert!(h.flow.page().choices.buttons.iter().all(|b| !b.enabled));
        assert_eq!(h.flow.state(), GameState::Playing);

        let err = h.flow.choose(1).await.unwrap_err();
        assert!(matches!(err, FlowError::ChoicesLocked));
        assert_eq!(h.transport.request_count(), 2);
    }

    #[tokio::test]
    async fn end_game_requires_open_choices() {
        let mut h = harness();
        h.transport.push_json(new_game(json!([])));
        h.flow.set_tag_input("isekai");
        h.flow.start().await.unwrap();

        let err = h.flow.end_game().await.unwrap_err();
        assert!(matches!(err, FlowError::NoOpenChoices));
        assert_eq!(h.transport.request_count(), 1);
    }

    #[tokio::test]
    async fn failed_start_stays_idle_without_session() {
        let mut h = harness();
        h.transport.push_failure("offline");
        h.flow.set_tag_input("isekai");

        let err = h.flow.start().await.unwrap_err();
        assert!(matches!(err, FlowError::Api(ApiError::Network { .. })));
        assert_eq!(h.flow.state(), GameState::Idle);
        assert_eq!(h.flow.session_id(), None);
        assert!(h.notifier.messages()[0].contains("offline"));
    }

    #[tokio::test]
    async fn set_language_persists_and_relabels() {
        let mut h = harness();
        h.flow.set_language_code("en").unwrap();
        assert_eq!(h.flow.language(), Language::En);
        assert_eq!(h.flow.context().preferences.language(), Language::En);
        assert_eq!(h.flow.page().toolbar.start_label, "Start");

        h.flow.set_language_code("xx").unwrap();
        assert_eq!(h.flow.language(), Language::Zh);
        assert_eq!(h.flow.page().toolbar.start_label, "开始冒险");
    }
}
