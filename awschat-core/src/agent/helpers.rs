//! Helper functions for the Agent module

use crate::types::{ContentBlock, Message};

/// All text blocks of a final assistant message, or `None` if it has none.
pub(super) fn extract_text_response(message: &Message) -> Option<String> {
    let mut texts = message.content.iter().filter_map(|c| match c {
        ContentBlock::Text(t) => Some(t.as_str()),
        _ => None,
    });
    let first = texts.next()?;
    Some(texts.fold(first.to_string(), |mut acc, t| {
        acc.push_str(t);
        acc
    }))
}
