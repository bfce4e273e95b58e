//! Interactive terminal player
//!
//! Reads one line at a time, turns it into a [`UserIntent`], drives the
//! [`GameFlow`] and draws whatever changed on the page.

use crate::api::{LoadingFlag, LoadingIndicator};
use crate::cli::input::{PlayArgs, UserIntent, parse_intent};
use crate::cli::view_state::{ScreenState, render_delta};
use crate::flow::{GameFlow, GameState, Notifier};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Notifier printing to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        eprintln!();
        eprintln!("[!] {message}");
        eprintln!();
    }
}

/// Loading indicator drawing a status line while a request is out
///
/// Clones share the flag and the label, so the player keeps one handle to
/// relabel the copy owned by the API client.
#[derive(Debug, Clone, Default)]
pub struct TerminalLoader {
    flag: LoadingFlag,
    label: Arc<Mutex<String>>,
}

impl TerminalLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_label(&self, label: &str) {
        if let Ok(mut current) = self.label.lock() {
            *current = label.to_string();
        }
    }

    fn status_line(&self) -> String {
        let label = self.label.lock().map(|l| l.clone()).unwrap_or_default();
        format!("⏳ {label}")
    }
}

impl LoadingIndicator for TerminalLoader {
    fn show(&self) {
        self.flag.show();
        print!("{}", self.status_line());
        let _ = io::stdout().flush();
    }

    fn hide(&self) {
        if self.flag.is_visible() {
            let width = self.status_line().chars().count() * 2;
            print!("\r{}\r", " ".repeat(width));
            let _ = io::stdout().flush();
        }
        self.flag.hide();
    }
}

/// Run the player until the user quits or stdin closes
pub async fn run_play(
    flow: &mut GameFlow,
    loader: &TerminalLoader,
    args: &PlayArgs,
) -> anyhow::Result<()> {
    let mut screen = ScreenState::new();

    loader.set_label(&flow.page().toolbar.loading_label);
    print_banner(flow);

    if args.surprise {
        let _ = flow.surprise().await;
    } else if let Some(tags) = &args.tags {
        flow.set_tag_input(tags.clone());
        let _ = flow.start().await;
    }

    loop {
        render_delta(&screen.diff(flow.page()));
        if args.debug {
            display_debug_info(flow);
        }

        let Some(line) = read_line(&prompt(flow))? else {
            println!();
            break;
        };

        match parse_intent(&line) {
            UserIntent::Quit => break,
            UserIntent::Help => print_controls(),
            UserIntent::Restart => flow.restart(),
            UserIntent::Random => {
                let _ = flow.surprise().await;
            }
            UserIntent::Language(code) => {
                let _ = flow.set_language_code(&code);
                loader.set_label(&flow.page().toolbar.loading_label);
                print_banner(flow);
            }
            UserIntent::EndStory => {
                let _ = flow.end_game().await;
            }
            UserIntent::Choose(id) if flow.state() == GameState::Playing => {
                let _ = flow.choose(id).await;
            }
            UserIntent::Empty => {}
            UserIntent::Choose(_) | UserIntent::Text(_) => {
                let text = line.trim().to_string();
                match route_text(flow) {
                    TextRoute::FreeAction => {
                        flow.set_free_input(text);
                        let _ = flow.custom_act().await;
                    }
                    TextRoute::Tags => {
                        flow.set_tag_input(text);
                        let _ = flow.start().await;
                    }
                    TextRoute::DeadEnd => println!("{DEAD_END_HINT}"),
                }
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_banner(flow: &GameFlow) {
    let toolbar = &flow.page().toolbar;
    println!("=== gamo ===");
    println!(
        "{} {}   [{}] [{}] [{}]",
        toolbar.language_label,
        flow.language(),
        toolbar.start_label,
        toolbar.random_label,
        toolbar.restart_label
    );
    println!();
    print_controls();
}

fn print_controls() {
    println!("Controls:");
    println!("  <tags>       start a story (while idle)");
    println!("  1-9          choose an option");
    println!("  <text>       free action (while playing)");
    println!("  :end         end the story");
    println!("  :random      start from a random preset");
    println!("  :restart     discard the story");
    println!("  :lang zh|en  switch language");
    println!("  :quit        quit");
    println!();
}

const DEAD_END_HINT: &str = "No further actions here. Use :restart or :quit.";

/// Where a line of plain text typed at the prompt goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextRoute {
    Tags,
    FreeAction,
    DeadEnd,
}

fn route_text(flow: &GameFlow) -> TextRoute {
    match flow.state() {
        GameState::Playing if flow.page().choices.free_input.is_some() => TextRoute::FreeAction,
        GameState::Playing => TextRoute::DeadEnd,
        GameState::Idle | GameState::Ended => TextRoute::Tags,
    }
}

fn prompt(flow: &GameFlow) -> String {
    match flow.state() {
        GameState::Idle => format!("{} >", flow.page().toolbar.tag_input.placeholder),
        GameState::Playing => match &flow.page().choices.free_input {
            Some(input) => format!("{} >", input.placeholder),
            None => ":restart / :quit >".to_string(),
        },
        GameState::Ended => ":restart / :quit >".to_string(),
    }
}

/// Display debug information (only when --debug is set)
fn display_debug_info(flow: &GameFlow) {
    println!("[debug]");
    println!("state={:?}", flow.state());
    println!("sid={}", flow.session_id().unwrap_or("-"));
    if let Some(event) = flow.current_event() {
        let ids: Vec<String> = event.options.iter().map(|o| o.id.to_string()).collect();
        println!("options=[{}]", ids.join(","));
    }
    println!();
}

/// Read one line; None when stdin is closed
fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt} ");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::flow::GameOptions;
    use crate::preferences::PreferenceStore;
    use crate::session::ClientContext;
    use crate::storage::MemoryStore;
    use crate::testing::{RecordingNotifier, ScriptedTransport};
    use crate::types::Language;
    use serde_json::json;

    #[test]
    fn loader_clones_share_the_label() {
        let loader = TerminalLoader::new();
        let owned_by_client = loader.clone();

        loader.set_label("Loading…");

        assert_eq!(owned_by_client.status_line(), "⏳ Loading…");
    }

    #[tokio::test]
    async fn loader_follows_language_switch() {
        let loader = TerminalLoader::new();
        let ctx = ClientContext::init(PreferenceStore::new(Arc::new(MemoryStore::new())));
        let api = ApiClient::new(Arc::new(ScriptedTransport::new()), Arc::new(loader.clone()));
        let mut flow = GameFlow::new(
            ctx,
            api,
            Arc::new(RecordingNotifier::new()),
            GameOptions::default(),
        );

        loader.set_label(&flow.page().toolbar.loading_label);
        assert_eq!(loader.status_line(), "⏳ 加载中…");

        flow.set_language(Language::En).unwrap();
        loader.set_label(&flow.page().toolbar.loading_label);
        assert_eq!(loader.status_line(), "⏳ Loading…");
    }

    #[tokio::test]
    async fn dead_end_text_is_not_submitted() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({
            "sid": "s1",
            "summary": "S",
            "main_plot": "P",
            "characters": {},
            "event": { "text": "E1", "options": [] }
        }));
        let ctx = ClientContext::init(PreferenceStore::new(Arc::new(MemoryStore::new())));
        let api = ApiClient::new(transport, Arc::new(LoadingFlag::new()));
        let mut flow = GameFlow::new(
            ctx,
            api,
            Arc::new(RecordingNotifier::new()),
            GameOptions::default(),
        );
        flow.set_tag_input("isekai");
        flow.start().await.unwrap();

        assert_eq!(flow.state(), GameState::Playing);
        assert_eq!(route_text(&flow), TextRoute::DeadEnd);
        assert_eq!(prompt(&flow), ":restart / :quit >");
    }

    #[test]
    fn idle_text_goes_to_tags() {
        let ctx = ClientContext::init(PreferenceStore::new(Arc::new(MemoryStore::new())));
        let api = ApiClient::new(Arc::new(ScriptedTransport::new()), Arc::new(LoadingFlag::new()));
        let flow = GameFlow::new(
            ctx,
            api,
            Arc::new(RecordingNotifier::new()),
            GameOptions::default(),
        );
        assert_eq!(route_text(&flow), TextRoute::Tags);
    }
}
