//! Heuristic section splitter.
//!
//! Strategy:
//! - A line is a header when its trimmed length is below [`HEADER_MAX_CHARS`]
//!   and it contains a keyword of some section (first section in table order wins);
//! - A header closes the running buffer under the *previous* section and opens
//!   a new buffer (starting with the header line) under the matched section;
//!   a header on the very first line does not switch sections;
//! - Buffers whose trimmed text is not longer than [`MIN_CHUNK_CHARS`] are dropped;
//! - Text before the first header is tagged `intro`, a trailing buffer with no
//!   section at all is tagged `outro`.
//!
//! This is order-sensitive segmentation, not a parser. False positives (a short
//! prose line that happens to contain a keyword) are accepted.

use tracing::debug;

use crate::{model::KnowledgeChunk, sections::SectionDef};

/// Lines at or above this many characters are never headers.
pub const HEADER_MAX_CHARS: usize = 100;
/// Chunks must be strictly longer than this to be kept.
pub const MIN_CHUNK_CHARS: usize = 50;

const INTRO: (&str, &str) = ("intro", "Wprowadzenie");
const OUTRO: (&str, &str) = ("outro", "Inne");

/// Split `text` into titled chunks using the ordered `sections` table.
pub fn split_into_chunks(text: &str, sections: &[SectionDef]) -> Vec<KnowledgeChunk> {
    let mut chunks = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();
    let mut current: Option<&SectionDef> = None;

    for line in text.split('\n') {
        if let Some(section) = detect_header(line, sections) {
            // A header with nothing buffered yet keeps the current section.
            if !buffer.is_empty() {
                push_chunk(&mut chunks, &buffer, current, INTRO);
                buffer.clear();
                debug!(section = %section.id, "section header");
                current = Some(section);
            }
        }
        buffer.push(line);
    }

    if !buffer.is_empty() {
        push_chunk(&mut chunks, &buffer, current, OUTRO);
    }

    chunks
}

/// Return the first section whose keyword occurs in a short `line`.
fn detect_header<'a>(line: &str, sections: &'a [SectionDef]) -> Option<&'a SectionDef> {
    let trimmed = line.trim();
    if trimmed.chars().count() >= HEADER_MAX_CHARS {
        return None;
    }
    let lower = trimmed.to_lowercase();
    sections.iter().find(|s| s.matches(&lower))
}

fn push_chunk(
    out: &mut Vec<KnowledgeChunk>,
    lines: &[&str],
    section: Option<&SectionDef>,
    fallback: (&str, &str),
) {
    let content = lines.join("\n").trim().to_string();
    if content.chars().count() <= MIN_CHUNK_CHARS {
        debug!(
            chars = content.chars().count(),
            "dropping short buffer below chunk minimum"
        );
        return;
    }

    let chunk = match section {
        Some(s) => KnowledgeChunk::new(s.id.as_str(), s.title.as_str(), content),
        None => KnowledgeChunk::new(fallback.0, fallback.1, content),
    };
    out.push(chunk);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::default_sections;

    fn table() -> Vec<SectionDef> {
        vec![
            SectionDef::new("okna", "Okna", &["okna standardowe"]),
            SectionDef::new("drzwi", "Drzwi", &["drzwi pełne"]),
        ]
    }

    const PROSE: &str = "Produkujemy stolarkę otworową od wielu lat i dbamy o jakość każdego detalu.";

    #[test]
    fn header_closes_previous_buffer() {
        let text = format!(
            "{PROSE}\nOkna standardowe\n{PROSE}\nDrzwi pełne\n{PROSE}"
        );
        let chunks = split_into_chunks(&text, &table());

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].id, "intro");
        assert_eq!(chunks[0].title, "Wprowadzenie");
        assert_eq!(chunks[0].content, PROSE);

        assert_eq!(chunks[1].id, "okna");
        assert!(chunks[1].content.starts_with("Okna standardowe\n"));
        assert!(!chunks[1].content.contains("Drzwi"));

        assert_eq!(chunks[2].id, "drzwi");
        assert_eq!(chunks[2].char_count, chunks[2].content.chars().count());
    }

    #[test]
    fn short_prior_buffer_is_dropped() {
        let text = format!("Krótki wstęp.\nOkna standardowe\n{PROSE}");
        let chunks = split_into_chunks(&text, &table());

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "okna");
    }

    #[test]
    fn long_line_with_keyword_is_not_a_header() {
        let long = format!("Nasze okna standardowe są {}", "bardzo ".repeat(20));
        assert!(long.trim().chars().count() >= HEADER_MAX_CHARS);

        let text = format!("{PROSE}\n{long}\n{PROSE}");
        let chunks = split_into_chunks(&text, &table());

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "outro");
        assert_eq!(chunks[0].title, "Inne");
    }

    #[test]
    fn first_matching_section_wins() {
        let sections = vec![
            SectionDef::new("a", "A", &["rolety"]),
            SectionDef::new("b", "B", &["rolety podtynkowe"]),
        ];
        let text = format!("{PROSE}\nRolety podtynkowe\n{PROSE}");
        let chunks = split_into_chunks(&text, &sections);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].id, "a");
    }

    #[test]
    fn header_on_first_line_keeps_fallback_tag() {
        let text = format!("Drzwi pełne\n{PROSE}");
        let chunks = split_into_chunks(&text, &table());

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "outro");
        assert_eq!(chunks[0].title, "Inne");
        assert!(chunks[0].content.starts_with("Drzwi pełne\n"));

        let text = format!("Drzwi pełne\n{PROSE}\nOkna standardowe\n{PROSE}");
        let chunks = split_into_chunks(&text, &table());

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].id, "intro");
        assert_eq!(chunks[1].id, "okna");
    }

    #[test]
    fn default_table_splits_offer_excerpt() {
        let text = format!(
            "WAFAM działa na rynku od ponad 20 lat.\n{PROSE}\n\nOkna premium\nSalamander to profil klasy premium o świetnej izolacji cieplnej.\n"
        );
        let chunks = split_into_chunks(&text, &default_sections());

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].title, "Wprowadzenie");
        assert_eq!(chunks[1].title, "Okna premium");
    }
}
