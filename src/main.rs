//! CLI entry point for gamo
//!
//! Plays a story against the game backend in the terminal.

use gamo::api::{ApiClient, HttpTransport};
use gamo::cli::input::{Command, PlayArgs, parse_args};
use gamo::cli::play::{TerminalLoader, TerminalNotifier};
use gamo::config::ClientConfig;
use gamo::flow::{GameFlow, GameOptions};
use gamo::preferences::PreferenceStore;
use gamo::session::ClientContext;
use gamo::storage::FileStore;
use gamo::types::Language;
use std::process;
use std::sync::Arc;

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("Error: {message}");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    let result = match command {
        Command::Help => {
            print_usage();
            Ok(())
        }
        Command::Lang(code) => run_lang(code.as_deref()),
        Command::Play(play) => run_play(&play),
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("gamo - narrative game client");
    println!();
    println!("USAGE:");
    println!("    gamo [play] [--tags <list>] [--surprise] [--lang <code>] [--api <url>] [--debug]");
    println!("    gamo lang [<code>]");
    println!();
    println!("COMMANDS:");
    println!("    play              Play a story in the terminal (default)");
    println!("    lang [<code>]     Show or set the interface language (zh, en)");
    println!("    --help, -h        Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    --tags <list>     Start immediately with comma-separated tags");
    println!("    --surprise        Start immediately from a random preset");
    println!("    --lang <code>     Switch language before starting");
    println!("    --api <url>       Backend base URL (overrides GAMO_API_BASE)");
    println!("    --debug           Show session and state after each step");
    println!();
    println!("ENVIRONMENT:");
    println!("    GAMO_API_BASE, GAMO_NEED_AVATAR, GAMO_AVATAR_STYLE,");
    println!("    GAMO_TIMEOUT_SECS, GAMO_STORAGE_PATH, RUST_LOG");
}

fn open_preferences(config: &ClientConfig) -> PreferenceStore {
    PreferenceStore::new(Arc::new(FileStore::open(&config.storage_path)))
}

fn run_lang(code: Option<&str>) -> anyhow::Result<()> {
    let config = ClientConfig::from_env()?;
    let preferences = open_preferences(&config);

    if let Some(code) = code {
        let Some(lang) = Language::from_code(code) else {
            anyhow::bail!("unsupported language '{code}' (expected zh or en)");
        };
        preferences.set_language(lang)?;
    }
    println!("{}", preferences.language());
    Ok(())
}

fn run_play(play: &PlayArgs) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_base) = &play.api_base {
        config.api_base = api_base.trim_end_matches('/').to_string();
    }

    let transport = HttpTransport::new(&config.api_base, config.request_timeout)?;
    let loader = TerminalLoader::new();
    let api = ApiClient::new(Arc::new(transport), Arc::new(loader.clone()));
    let ctx = ClientContext::init(open_preferences(&config));
    let options = GameOptions {
        need_avatar: config.need_avatar,
        avatar_style: config.avatar_style.clone(),
    };
    let mut flow = GameFlow::new(ctx, api, Arc::new(TerminalNotifier), options);
    if let Some(code) = &play.lang {
        // a failed save has already been shown; play on in the chosen language
        let _ = flow.set_language_code(code);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(gamo::cli::play::run_play(&mut flow, &loader, play))
}
