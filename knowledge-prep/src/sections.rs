//! Section table for the WAFAM offer document.
//!
//! Order matters: the splitter tests sections top to bottom and the first
//! section with a matching keyword wins. Keep the table order stable if chunk
//! assignments must stay reproducible between runs.

/// Definition of a named section and the keywords that open it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDef {
    pub id: String,
    pub title: String,
    /// Lowercase keywords matched as substrings of a lowercased line.
    pub keywords: Vec<String>,
}

impl SectionDef {
    pub fn new(id: &str, title: &str, keywords: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// True when any keyword occurs in the already lowercased `line`.
    pub fn matches(&self, line_lower: &str) -> bool {
        self.keywords.iter().any(|k| line_lower.contains(k.as_str()))
    }
}

/// The 21 sections of the offer document, in matching order.
pub fn default_sections() -> Vec<SectionDef> {
    vec![
        SectionDef::new("firma", "O firmie", &["o firmie", "wafam działa", "20 lat"]),
        SectionDef::new("handlowcy", "Zespół handlowców", &["handlowcy", "zadzwoń"]),
        SectionDef::new(
            "okna_standard",
            "Okna standardowe",
            &["okna standardowe", "decco 82", "ideal 7000"],
        ),
        SectionDef::new(
            "okna_premium",
            "Okna premium",
            &["okna premium", "salamander", "decco 83"],
        ),
        SectionDef::new(
            "systemy_przesuwne",
            "Systemy przesuwne",
            &["psk", "smart-slide", "hst"],
        ),
        SectionDef::new(
            "system_tarasowy",
            "System tarasowy",
            &["system tarasowy", "słupek ruchomy", "niski próg"],
        ),
        SectionDef::new("drzwi", "Drzwi", &["drzwi pełne", "drzwi przeszklone"]),
        SectionDef::new(
            "rolety",
            "Rolety zewnętrzne",
            &["rolety podtynkowe", "rolety nadstawne", "moskitier"],
        ),
        SectionDef::new(
            "zaluzje",
            "Żaluzje fasadowe",
            &["żaluzje fasadowe", "regulacja światła"],
        ),
        SectionDef::new(
            "bramy",
            "Bramy garażowe",
            &["bramy garażowe", "gwarancja producenta"],
        ),
        SectionDef::new(
            "dodatki_okienne",
            "Dodatki okienne",
            &["swisspacer", "hoppe secustik"],
        ),
        SectionDef::new(
            "montaz",
            "Montaż",
            &["montaż", "ekipa montażowa", "ciepły montaż"],
        ),
        SectionDef::new("doradztwo", "Doradztwo", &["doradztwo", "czyste powietrze"]),
        SectionDef::new("wycena", "Wycena i oferta", &["wycena", "oferta w 24h"]),
        SectionDef::new(
            "kontakt",
            "Dane kontaktowe",
            &["kontakt", "telefon", "e-mail", "godziny otwarcia"],
        ),
        SectionDef::new(
            "social_media",
            "Social media i opinie",
            &["facebook", "google maps", "opinie"],
        ),
        SectionDef::new(
            "kolory_rolety",
            "Kolory rolet",
            &["kolory", "rolety", "srebrny", "biały"],
        ),
        SectionDef::new("kolory_drzwi", "Kolory drzwi", &["kolory", "drzwi", "antracyt"]),
        SectionDef::new("kolory_bramy", "Kolory bram", &["kolory", "bramy", "winchester"]),
        SectionDef::new(
            "kolory_okna",
            "Kolory okien",
            &["folia dekoracyjna", "kolory", "okna"],
        ),
        SectionDef::new(
            "parametry",
            "Parametry techniczne",
            &["parametry techniczne", "uw", "komór"],
        ),
    ]
}
