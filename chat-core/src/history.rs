//! Bounded views of conversation history.

use crate::session::Turn;

/// Turns sent upstream once history grows past this.
pub const COMPRESSED_TURNS: usize = 4;
/// Per-turn character cap in the compressed view.
pub const COMPRESSED_TURN_CHARS: usize = 200;
/// Turns kept in storage after each exchange.
pub const STORED_TURNS: usize = 6;

const ELLIPSIS: &str = "...";

/// Prefix of `s` holding at most `max` characters.
pub fn clip_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Copy of `history` bounded for the completion request; storage is untouched.
pub fn compress_history(history: &[Turn]) -> Vec<Turn> {
    if history.len() <= COMPRESSED_TURNS {
        return history.to_vec();
    }

    history[history.len() - COMPRESSED_TURNS..]
        .iter()
        .map(|turn| {
            let clipped = clip_chars(&turn.content, COMPRESSED_TURN_CHARS);
            let content = if clipped.len() < turn.content.len() {
                format!("{clipped}{ELLIPSIS}")
            } else {
                turn.content.clone()
            };
            Turn {
                role: turn.role,
                content,
            }
        })
        .collect()
}

/// Keep only the most recent `STORED_TURNS`, oldest first.
pub fn truncate_history(history: &mut Vec<Turn>) {
    if history.len() > STORED_TURNS {
        history.drain(..history.len() - STORED_TURNS);
    }
}
