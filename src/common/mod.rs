//! Common utilities shared between the runners, the session layer and the CLI

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

/// Truncate text for single-line console echo, appending an ellipsis.
///
/// Cuts on a character boundary so multi-byte glyphs survive.
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        single_line
    } else {
        let cut: String = single_line.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_for_display("done", 10), "done");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_for_display("✅✅✅✅", 2), "✅✅…");
        assert_eq!(truncate_for_display("a\nb", 10), "a b");
    }
}
