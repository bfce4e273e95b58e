//! View renderer
//!
//! Pure functions reflecting backend data into a [`Page`]. Nothing here talks
//! to the network; the flow controller decides when each one runs.

use crate::i18n::{self, Labels};
use crate::types::payload::{Character, ChoiceOption, Party};
use crate::types::view::{
    Button, ButtonStyle, CharacterCard, ChoiceArea, Intro, NarrativeBlock, Page, StatBadge,
    TextInput, UiAction,
};

/// Replace the intro area
pub fn render_intro(page: &mut Page, summary: &str, main_plot: &str) {
    page.intro = Some(Intro {
        summary: summary.to_string(),
        main_plot: main_plot.to_string(),
    });
}

/// Replace the party area with one card per character holding a valid id
pub fn render_party(page: &mut Page, party: &Party) {
    page.party = party
        .values()
        .filter(|character| character.has_valid_id())
        .map(character_card)
        .collect();
}

fn character_card(character: &Character) -> CharacterCard {
    let stats = character
        .stats
        .iter()
        .map(|(code, value)| StatBadge {
            code: code.to_string(),
            value: *value,
            full_name: i18n::stat_full_name(code).unwrap_or(code).to_string(),
        })
        .collect();

    CharacterCard {
        avatar_url: character.avatar_url.clone().filter(|url| !url.is_empty()),
        heading: format!("{} · {}", character.name, character.role),
        stats,
        backstory: character.backstory.clone(),
        goal: character.goal.clone(),
    }
}

/// Append a block to the history and scroll to it
pub fn append_narrative(page: &mut Page, block: NarrativeBlock) {
    page.history.push(block);
    page.scroll_anchor = Some(page.history.len() - 1);
}

/// Repopulate the choice area
///
/// With no options the area is only cleared: that is the terminal state of a
/// branch, so no free-action controls are offered.
pub fn render_choices(page: &mut Page, options: &[ChoiceOption], labels: &Labels) {
    let mut area = ChoiceArea {
        buttons: options
            .iter()
            .map(|option| {
                Button::new(
                    format!("{}. {}", option.id, option.text),
                    UiAction::Choose(option.id),
                    ButtonStyle::Default,
                )
            })
            .collect(),
        free_input: None,
    };

    if !options.is_empty() {
        let mut input = TextInput::new(labels.free_action);
        input.submit_on_enter = true;
        area.free_input = Some(input);
        area.buttons.push(Button::new(
            labels.execute,
            UiAction::ExecuteCustom,
            ButtonStyle::Confirm,
        ));
        area.buttons.push(Button::new(
            labels.end_story,
            UiAction::EndStory,
            ButtonStyle::Danger,
        ));
    }

    page.choices = area;
}

/// Empty the choice area entirely
pub fn clear_choices(page: &mut Page) {
    page.choices = ChoiceArea::default();
}

/// Make every button in the choice area non-interactive
pub fn disable_choices(page: &mut Page) {
    for button in &mut page.choices.buttons {
        button.enabled = false;
    }
}

/// Clear intro, history, choices and party
pub fn reset_all(page: &mut Page) {
    page.intro = None;
    page.history.clear();
    page.choices = ChoiceArea::default();
    page.party.clear();
    page.scroll_anchor = None;
}

/// Rewrite every static label in a new language
///
/// Narrative history, intro and option buttons come from the backend and are
/// left untouched; so is any text already typed into an input.
pub fn relabel(page: &mut Page, labels: &Labels) {
    let toolbar = &mut page.toolbar;
    toolbar.language_label = labels.language.to_string();
    toolbar.start_label = labels.start.to_string();
    toolbar.random_label = labels.random.to_string();
    toolbar.restart_label = labels.restart.to_string();
    toolbar.loading_label = labels.loading.to_string();
    toolbar.tag_input.placeholder = labels.placeholder.to_string();

    if let Some(input) = &mut page.choices.free_input {
        input.placeholder = labels.free_action.to_string();
    }
    for button in &mut page.choices.buttons {
        match button.action {
            UiAction::ExecuteCustom => button.label = labels.execute.to_string(),
            UiAction::EndStory => button.label = labels.end_story.to_string(),
            UiAction::Choose(_) => {}
        }
    }
}
