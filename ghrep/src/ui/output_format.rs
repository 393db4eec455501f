// ghrep/src/ui/output_format.rs
//! Formatting helpers for messages written to the terminal.
//!
//! Every helper takes the writer and whether it supports colour, so the
//! same code serves a terminal, a pipe and a test buffer.
//!
//! License: MIT OR Apache-2.0

use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::ui::theme::{color_for, ThemeEntry, ThemeMap};

/// Colours `text` with the theme's colour for `entry` when `enable_colors` is set.
pub fn paint(text: &str, entry: ThemeEntry, theme: &ThemeMap, enable_colors: bool) -> String {
    if enable_colors {
        text.color(color_for(theme, entry)).to_string()
    } else {
        text.to_string()
    }
}

fn print_message<W: Write>(
    writer: &mut W,
    prefix: &str,
    message: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    let line = if prefix.is_empty() { message.to_string() } else { format!("{} {}", prefix, message) };
    writeln!(writer, "{}", paint(&line, entry, theme, enable_colors))
}

pub fn print_info_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    print_message(writer, "", message, ThemeEntry::Info, theme, enable_colors)
}

pub fn print_success_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    print_message(writer, "", message, ThemeEntry::Success, theme, enable_colors)
}

pub fn print_warn_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    print_message(writer, "Warning:", message, ThemeEntry::Warn, theme, enable_colors)
}

/// Multi-line messages (aggregate parse failures) keep one problem per line.
pub fn print_error_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    print_message(writer, "Error:", message, ThemeEntry::Error, theme, enable_colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemeStyle;

    #[test]
    fn plain_when_colours_disabled() {
        let theme = ThemeStyle::default_theme_map();
        let mut out = Vec::new();
        print_error_message(&mut out, "boom", &theme, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Error: boom\n");
    }

    #[test]
    fn coloured_output_wraps_in_ansi() {
        let theme = ThemeStyle::default_theme_map();
        let painted = paint("api", ThemeEntry::Target, &theme, true);
        assert!(painted.starts_with("\u{1b}["));
        assert!(painted.contains("api"));
    }
}
