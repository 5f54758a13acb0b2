//! Short-reply expansion using the remembered topic.

/// Replies that carry no product information on their own.
pub const AFFIRMATION_WORDS: &[&str] = &[
    "tak", "nie", "podaj", "link", "chcę", "poproszę", "dawaj", "ok", "okej", "dobrze",
];

/// Words that make a message the new remembered topic.
pub const PRODUCT_KEYWORDS: &[&str] = &[
    "okna", "okno", "drzwi", "rolety", "roleta", "bramy", "brama", "żaluzje", "taras", "przesuwne",
];

const SHORT_MAX_TOKENS: usize = 4;

/// Result of [`expand_query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Text sent to retrieval.
    pub query: String,
    /// Topic to remember once the turn succeeds; `None` leaves it untouched.
    pub new_topic: Option<String>,
}

/// At most four tokens, one of which is an affirmation word.
pub fn is_short_reply(message: &str) -> bool {
    let lower = message.to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    tokens.len() <= SHORT_MAX_TOKENS
        && tokens.iter().any(|t| {
            let word = t.trim_matches(|c: char| !c.is_alphanumeric());
            AFFIRMATION_WORDS.contains(&word)
        })
}

pub fn mentions_product(message: &str) -> bool {
    let lower = message.to_lowercase();
    PRODUCT_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Expand `message` for retrieval given the session's remembered topic.
///
/// # Example
/// ```
/// use chat_core::query::expand_query;
///
/// let e = expand_query("tak, poproszę", Some("Jakie macie okna?"));
/// assert_eq!(e.query, "tak, poproszę (kontekst: Jakie macie okna?)");
/// assert_eq!(e.new_topic, None);
/// ```
pub fn expand_query(message: &str, topic: Option<&str>) -> Expansion {
    if let Some(topic) = topic {
        if is_short_reply(message) {
            return Expansion {
                query: format!("{message} (kontekst: {topic})"),
                new_topic: None,
            };
        }
    }

    Expansion {
        query: message.to_string(),
        new_topic: mentions_product(message).then(|| message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reply_with_topic_is_expanded() {
        let e = expand_query("Tak", Some("Interesują mnie rolety"));
        assert_eq!(e.query, "Tak (kontekst: Interesują mnie rolety)");
        assert_eq!(e.new_topic, None);
    }

    #[test]
    fn short_reply_without_topic_passes_through() {
        let e = expand_query("ok", None);
        assert_eq!(e.query, "ok");
        assert_eq!(e.new_topic, None);
    }

    #[test]
    fn product_message_becomes_topic() {
        let e = expand_query("Szukam drzwi zewnętrznych", Some("stary temat"));
        assert_eq!(e.query, "Szukam drzwi zewnętrznych");
        assert_eq!(e.new_topic.as_deref(), Some("Szukam drzwi zewnętrznych"));
    }

    #[test]
    fn short_product_reply_with_topic_keeps_old_topic() {
        // Short replies win over topic detection.
        let e = expand_query("tak, okna", Some("rolety"));
        assert_eq!(e.query, "tak, okna (kontekst: rolety)");
        assert_eq!(e.new_topic, None);
    }

    #[test]
    fn affirmation_is_matched_per_token() {
        // "ok" inside "okna" is not an affirmation.
        assert!(!is_short_reply("okna pcv"));
        assert!(is_short_reply("Ok!"));
        assert!(is_short_reply("chcę link"));
        assert!(!is_short_reply("tak ale jeszcze jedno pytanie"));
        assert!(!is_short_reply(""));
    }

    #[test]
    fn unrelated_message_leaves_topic_alone() {
        let e = expand_query("Gdzie jest wasz salon?", Some("bramy"));
        assert_eq!(e.query, "Gdzie jest wasz salon?");
        assert_eq!(e.new_topic, None);
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        assert!(mentions_product("TARASOWE systemy"));
        assert!(mentions_product("Żaluzje fasadowe"));
        assert!(!mentions_product("Ile kosztuje montaż?"));
    }
}
