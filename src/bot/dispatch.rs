//! Raw chat-line tokenizer for the dish command surface.
//!
//! A message addresses the bot when its first token (after an optional
//! leading `/`) equals the configured command word. The remainder is split
//! into the subcommand and up to two positional arguments; both rename
//! arguments arrive through this declared surface rather than by peeking at
//! the raw argument vector.

/// A chat line routed to the dish handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedCommand {
    pub subcmd: Option<String>,
    pub arg1: Option<String>,
    pub arg2: Option<String>,
}

/// Tokenize `raw`, returning `None` when the line is not addressed to
/// `command_word`. Extra tokens past the second argument are ignored.
pub fn parse_line(raw: &str, command_word: &str) -> Option<RoutedCommand> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let mut tokens = body.split_whitespace();
    if tokens.next()? != command_word {
        return None;
    }
    Some(RoutedCommand {
        subcmd: tokens.next().map(str::to_string),
        arg1: tokens.next().map(str::to_string),
        arg2: tokens.next().map(str::to_string),
    })
}
