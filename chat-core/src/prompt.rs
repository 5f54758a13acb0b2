//! Prompt builder: fixed sales instructions + compact context block.

/// System instructions for the WAFAM assistant (Polish, as served to customers).
pub const SYSTEM_PROMPT: &str = "Asystent WAFAM (okna, drzwi, rolety).

ZASADY:
- Odpowiadaj tylko z kontekstu, krótko (2-3 zdania)
- Brak cen. Zbieraj dane do wyceny: produkt, ilość, wymiary, miejscowość, montaż tak/nie, kontakt
- Max 1/2 pytanie na odpowiedź
- Linki: [tekst](url) - tylko gdy klient pyta gdzie czytać więcej
- Pamiętaj kontekst rozmowy
- NIE WYMYŚLAJ informacji których klient nie podał. Jeśli klient nie podał danych (telefon, email, adres) - zapytaj o nie zamiast udawać że je masz.
- Jeśli klient chce przekazać dane - najpierw zapytaj jakie dane chce zostawić (telefon lub email).

LINKI: okna-standardowe, okna-premium, systemy-przesuwne, system-tarasowy, drzwi-pelne, drzwi-przeszklone, rolety, zaluzje-fasadowe, bramy-garazowe (dodaj https://wafam.pl/ przed)";

/// Separator between retrieved passages.
pub const PASSAGE_SEPARATOR: &str = "\n---\n";

/// System prompt carrying the whole knowledge document (static mode).
pub fn static_system_prompt(knowledge: &str) -> String {
    format!("{SYSTEM_PROMPT}\n\nWIEDZA O FIRMIE:\n{}", knowledge.trim())
}

/// Wrap the customer's message with retrieved context.
///
/// # Example
/// ```
/// use chat_core::prompt::build_user_prompt;
///
/// let p = build_user_prompt(&["Okna PCV", "Okna ALU"], "Jakie okna?");
/// assert_eq!(p, "KONTEKST:\nOkna PCV\n---\nOkna ALU\n\nPYTANIE: Jakie okna?");
/// ```
pub fn build_user_prompt<S: AsRef<str>>(passages: &[S], message: &str) -> String {
    let context = passages
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(PASSAGE_SEPARATOR);
    format!("KONTEKST:\n{context}\n\nPYTANIE: {message}")
}
