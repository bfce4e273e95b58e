//! Parsing of terminal input lines and command-line arguments

use crate::types::payload::OptionId;

/// What a line typed at the prompt asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    Quit,
    Help,
    Restart,
    Random,
    EndStory,
    Language(String),
    /// A bare number: pick that option id
    Choose(OptionId),
    /// Anything else: tags while idle, a free action while playing
    Text(String),
    Empty,
}

pub fn parse_intent(line: &str) -> UserIntent {
    let line = line.trim();
    if line.is_empty() {
        return UserIntent::Empty;
    }

    if let Some(command) = line.strip_prefix(':') {
        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        return match name {
            "q" | "quit" => UserIntent::Quit,
            "h" | "help" => UserIntent::Help,
            "restart" => UserIntent::Restart,
            "random" | "surprise" => UserIntent::Random,
            "end" => UserIntent::EndStory,
            "lang" => UserIntent::Language(parts.next().unwrap_or_default().to_string()),
            _ => UserIntent::Text(line.to_string()),
        };
    }

    if line.chars().all(|c| c.is_ascii_digit())
        && let Ok(id) = line.parse::<OptionId>()
    {
        return UserIntent::Choose(id);
    }

    UserIntent::Text(line.to_string())
}

/// Options of the `play` command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayArgs {
    pub tags: Option<String>,
    pub surprise: bool,
    pub lang: Option<String>,
    pub api_base: Option<String>,
    pub debug: bool,
}

/// Top-level command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(PlayArgs),
    /// Show (None) or set the language preference
    Lang(Option<String>),
    Help,
}

/// Parse `argv` without the program name
pub fn parse_args(args: &[String]) -> Result<Command, String> {
    let Some(command) = args.first() else {
        return Ok(Command::Play(PlayArgs::default()));
    };

    match command.as_str() {
        "play" => parse_play(&args[1..]).map(Command::Play),
        "lang" => match &args[1..] {
            [] => Ok(Command::Lang(None)),
            [code] => Ok(Command::Lang(Some(code.clone()))),
            _ => Err("lang takes at most one language code".to_string()),
        },
        "--help" | "-h" | "help" => Ok(Command::Help),
        other => Err(format!("Unknown command '{other}'")),
    }
}

fn parse_play(args: &[String]) -> Result<PlayArgs, String> {
    let mut play = PlayArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tags" => play.tags = Some(value_of(&mut iter, "--tags")?),
            "--lang" => play.lang = Some(value_of(&mut iter, "--lang")?),
            "--api" => play.api_base = Some(value_of(&mut iter, "--api")?),
            "--surprise" => play.surprise = true,
            "--debug" => play.debug = true,
            other => return Err(format!("Unknown option '{other}'")),
        }
    }
    if play.surprise && play.tags.is_some() {
        return Err("--tags and --surprise cannot be combined".to_string());
    }
    Ok(play)
}

fn value_of<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<String, String> {
    iter.next()
        .cloned()
        .ok_or_else(|| format!("Missing value for {flag}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn numbers_choose_options() {
        assert_eq!(parse_intent(" 2 "), UserIntent::Choose(2));
    }

    #[test]
    fn colon_commands() {
        assert_eq!(parse_intent(":end"), UserIntent::EndStory);
        assert_eq!(parse_intent(":lang en"), UserIntent::Language("en".into()));
        assert_eq!(parse_intent(":q"), UserIntent::Quit);
        assert_eq!(parse_intent(":random"), UserIntent::Random);
    }

    #[test]
    fn everything_else_is_text() {
        assert_eq!(
            parse_intent("open the door"),
            UserIntent::Text("open the door".into())
        );
        assert_eq!(parse_intent(":dance"), UserIntent::Text(":dance".into()));
        assert_eq!(parse_intent("   "), UserIntent::Empty);
    }

    #[test]
    fn huge_numbers_fall_back_to_text() {
        let line = "99999999999999999999999";
        assert_eq!(parse_intent(line), UserIntent::Text(line.into()));
    }

    #[test]
    fn no_arguments_means_play() {
        assert_eq!(parse_args(&[]), Ok(Command::Play(PlayArgs::default())));
    }

    #[test]
    fn play_flags() {
        let parsed = parse_args(&args(&["play", "--tags", "isekai, comedy", "--lang", "en", "--debug"]));
        assert_eq!(
            parsed,
            Ok(Command::Play(PlayArgs {
                tags: Some("isekai, comedy".into()),
                lang: Some("en".into()),
                debug: true,
                ..PlayArgs::default()
            }))
        );
    }

    #[test]
    fn play_rejects_bad_flags() {
        assert!(parse_args(&args(&["play", "--tags"])).is_err());
        assert!(parse_args(&args(&["play", "--nope"])).is_err());
        assert!(parse_args(&args(&["play", "--tags", "a", "--surprise"])).is_err());
    }

    #[test]
    fn lang_command() {
        assert_eq!(parse_args(&args(&["lang"])), Ok(Command::Lang(None)));
        assert_eq!(
            parse_args(&args(&["lang", "zh"])),
            Ok(Command::Lang(Some("zh".into())))
        );
        assert!(parse_args(&args(&["frobnicate"])).is_err());
    }
}
