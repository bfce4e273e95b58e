//! Terminal drawing of the page
//!
//! The terminal cannot redraw areas in place, so the screen remembers what it
//! has already printed and each draw only emits what changed.

use crate::types::view::{
    Button, ButtonStyle, CharacterCard, ChoiceArea, Intro, NarrativeBlock, Page,
};
use std::io::{self, Write};

const ERASE_AND_HOME: &str = "\x1b[2J\x1b[H";

/// Wipe the terminal before the page is drawn from scratch
fn wipe_terminal() {
    let mut out = io::stdout().lock();
    if write!(out, "{ERASE_AND_HOME}").and_then(|()| out.flush()).is_err() {
        log::debug!("terminal did not accept the erase sequence");
    }
}

/// What the terminal currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenState {
    intro: Option<Intro>,
    party: Vec<CharacterCard>,
    blocks_shown: usize,
    choices: ChoiceArea,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare the page against the screen and remember the new contents
    pub fn diff(&mut self, page: &Page) -> RenderDelta {
        let mut delta = RenderDelta::new();

        let history_rewound = page.history.len() < self.blocks_shown;
        let intro_removed = self.intro.is_some() && page.intro.is_none();
        if history_rewound || intro_removed {
            delta.reset = true;
            *self = ScreenState::new();
        }

        if page.intro != self.intro {
            delta.intro = page.intro.clone();
            self.intro = page.intro.clone();
        }

        if page.party != self.party {
            delta.party = page.party.clone();
            self.party = page.party.clone();
        }

        delta.new_blocks = page.history[self.blocks_shown..].to_vec();
        self.blocks_shown = page.history.len();

        if page.choices != self.choices || !delta.new_blocks.is_empty() {
            delta.choices = Some(page.choices.clone());
            self.choices = page.choices.clone();
        }

        delta
    }
}

/// Everything that has to be printed for one draw
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderDelta {
    /// The page was reset; clear before printing
    pub reset: bool,
    pub intro: Option<Intro>,
    pub party: Vec<CharacterCard>,
    pub new_blocks: Vec<NarrativeBlock>,
    pub choices: Option<ChoiceArea>,
}

impl RenderDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        !self.reset
            && self.intro.is_none()
            && self.party.is_empty()
            && self.new_blocks.is_empty()
            && self.choices.is_none()
    }
}

/// Print a delta to the console
pub fn render_delta(delta: &RenderDelta) {
    if delta.reset {
        wipe_terminal();
    }
    if let Some(intro) = &delta.intro {
        println!("{}", format_intro(intro));
        println!();
    }
    for card in &delta.party {
        println!("{}", format_card(card));
        println!();
    }
    for block in &delta.new_blocks {
        println!("{}", format_block(block));
        println!();
    }
    if let Some(choices) = &delta.choices {
        let text = format_choices(choices);
        if !text.is_empty() {
            println!("{text}");
        }
    }
}

pub fn format_intro(intro: &Intro) -> String {
    format!("🌍 {}\n🎯 {}", intro.summary, intro.main_plot)
}

pub fn format_card(card: &CharacterCard) -> String {
    let mut lines = vec![format!("┌ {}", card.heading)];
    if let Some(url) = &card.avatar_url {
        lines.push(format!("│ [avatar] {url}"));
    }
    if !card.stats.is_empty() {
        let stats: Vec<String> = card
            .stats
            .iter()
            .map(|stat| format!("{}:{} ({})", stat.code, stat.value, stat.full_name))
            .collect();
        lines.push(format!("│ {}", stats.join("  ")));
    }
    if !card.backstory.is_empty() {
        lines.push(format!("│ {}", card.backstory));
    }
    lines.push(format!("└ 🎯 {}", card.goal));
    lines.join("\n")
}

pub fn format_block(block: &NarrativeBlock) -> String {
    match block {
        NarrativeBlock::Text(text) => text.clone(),
        NarrativeBlock::Title(title) => format!("\x1b[1m{title}\x1b[0m"),
    }
}

pub fn format_choices(area: &ChoiceArea) -> String {
    let mut lines: Vec<String> = area.option_buttons().map(format_button).collect();
    if let Some(input) = &area.free_input {
        lines.push(format!("  > {}", input.placeholder));
    }
    let actions: Vec<String> = area
        .buttons
        .iter()
        .filter(|button| button.style != ButtonStyle::Default)
        .map(format_button)
        .collect();
    if !actions.is_empty() {
        lines.push(actions.join("   "));
    }
    lines.join("\n")
}

fn format_button(button: &Button) -> String {
    let label = match button.style {
        ButtonStyle::Default => format!("  {}", button.label),
        ButtonStyle::Confirm => format!("[{}]", button.label),
        ButtonStyle::Danger => format!("[! {}]", button.label),
    };
    if button.enabled {
        label
    } else {
        format!("{label} (disabled)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::labels;
    use crate::render;
    use crate::types::language::Language;
    use crate::types::payload::ChoiceOption;

    fn page() -> Page {
        Page::new(labels(Language::En))
    }

    fn fight() -> Vec<ChoiceOption> {
        vec![ChoiceOption {
            id: 1,
            text: "Fight".to_string(),
        }]
    }

    #[test]
    fn empty_page_draws_nothing() {
        let mut screen = ScreenState::new();
        assert!(screen.diff(&page()).is_empty());
    }

    #[test]
    fn only_new_blocks_are_emitted() {
        let mut screen = ScreenState::new();
        let mut page = page();
        render::append_narrative(&mut page, NarrativeBlock::Text("E1".into()));
        let first = screen.diff(&page);
        assert_eq!(first.new_blocks.len(), 1);

        render::append_narrative(&mut page, NarrativeBlock::Text("R1".into()));
        render::append_narrative(&mut page, NarrativeBlock::Text("E2".into()));
        let second = screen.diff(&page);
        assert_eq!(
            second.new_blocks,
            vec![
                NarrativeBlock::Text("R1".into()),
                NarrativeBlock::Text("E2".into())
            ]
        );
        assert!(!second.reset);
    }

    #[test]
    fn reset_page_clears_screen() {
        let mut screen = ScreenState::new();
        let mut page = page();
        render::render_intro(&mut page, "S", "P");
        render::append_narrative(&mut page, NarrativeBlock::Text("E1".into()));
        screen.diff(&page);

        render::reset_all(&mut page);
        let delta = screen.diff(&page);
        assert!(delta.reset);
        assert!(delta.new_blocks.is_empty());
    }

    #[test]
    fn disabled_buttons_redraw() {
        let mut screen = ScreenState::new();
        let mut page = page();
        render::render_choices(&mut page, &fight(), labels(Language::En));
        screen.diff(&page);

        render::disable_choices(&mut page);
        let delta = screen.diff(&page);
        let text = format_choices(delta.choices.as_ref().unwrap());
        assert!(text.contains("1. Fight (disabled)"));
    }

    #[test]
    fn choice_text_lists_options_then_actions() {
        let mut page = page();
        render::render_choices(&mut page, &fight(), labels(Language::En));
        let text = format_choices(&page.choices);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  1. Fight");
        assert_eq!(lines[1], "  > Free action…");
        assert_eq!(lines[2], "[Go]   [! End Story]");
    }

    #[test]
    fn intro_format() {
        let intro = Intro {
            summary: "S".into(),
            main_plot: "P".into(),
        };
        assert_eq!(format_intro(&intro), "🌍 S\n🎯 P");
    }
}
