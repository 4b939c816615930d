//! # Output Formatting
//!
//! Colored, emoji-prefixed status lines for user-facing terminal output.

use owo_colors::{OwoColorize, Stream};

// Shortcodes as known to the `emojis` crate (GitHub gemoji names)
const SUCCESS_EMOJI: &str = "heavy_check_mark";
const ERROR_EMOJI: &str = "x";
const WARNING_EMOJI: &str = "warning";
const INFO_EMOJI: &str = "information_source";

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  Never,
}

impl ColorMode {
  /// Apply the mode process-wide
  pub fn apply(self) {
    match self {
      ColorMode::Always => owo_colors::set_override(true),
      ColorMode::Never => owo_colors::set_override(false),
      ColorMode::Auto => {
        if std::env::var_os("NO_COLOR").is_some() {
          owo_colors::set_override(false);
        } else {
          owo_colors::unset_override();
        }
      }
    }
  }
}

/// Helper function to safely get an emoji or fallback to a default character
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = get_emoji_or_default(SUCCESS_EMOJI, "✓");
  println!("{} {}", check.if_supports_color(Stream::Stdout, |t| t.green()), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  let cross = get_emoji_or_default(ERROR_EMOJI, "✗");
  eprintln!("{} {}", cross.if_supports_color(Stream::Stderr, |t| t.red()), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default(WARNING_EMOJI, "⚠");
  println!("{} {}", warning.if_supports_color(Stream::Stdout, |t| t.yellow()), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = get_emoji_or_default(INFO_EMOJI, "ℹ");
  println!("{} {}", info.if_supports_color(Stream::Stdout, |t| t.blue()), message);
}

/// Print a section header
pub fn print_header(header: &str) {
  println!("\n{}", header.if_supports_color(Stream::Stdout, |t| t.bold()));
}

/// Format an issue or epic key
pub fn format_key(key: &str) -> String {
  key.if_supports_color(Stream::Stdout, |t| t.bright_cyan()).to_string()
}

/// Format a done/open flag
pub fn format_done(done: bool) -> String {
  if done {
    "done".if_supports_color(Stream::Stdout, |t| t.green()).to_string()
  } else {
    "open".if_supports_color(Stream::Stdout, |t| t.yellow()).to_string()
  }
}
