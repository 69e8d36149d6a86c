//! Static catalogs shared by the editor forms and the search facets.

use serde::Serialize;

/// Spanish alphabet as used for letter groups (`ñ` after `n`).
pub const ALPHABET: [char; 27] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'ñ', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub const GRAMMATICAL_CATEGORIES: &[(&str, &str)] = &[
    ("adj.", "adjetivo"),
    ("adv.", "adverbio"),
    ("conj.", "conjunción"),
    ("f.", "sustantivo femenino"),
    ("m.", "sustantivo masculino"),
    ("m. y f.", "sustantivo masculino y femenino"),
    ("m. o f.", "sustantivo masculino o femenino"),
    ("interj.", "interjección"),
    ("loc. adj.", "locución adjetiva"),
    ("loc. adv.", "locución adverbial"),
    ("loc. interj.", "locución interjectiva"),
    ("loc. sust.", "locución sustantiva"),
    ("loc. verb.", "locución verbal"),
    ("prep.", "preposición"),
    ("pron.", "pronombre"),
    ("tr.", "verbo transitivo"),
    ("intr.", "verbo intransitivo"),
    ("prnl.", "verbo pronominal"),
    ("fórm.", "fórmula"),
    ("expr.", "expresión"),
    ("suf.", "sufijo"),
    ("pref.", "prefijo"),
];

pub const USAGE_STYLES: &[(&str, &str)] = &[
    ("espon.", "espontáneo"),
    ("vulgar", "vulgar"),
    ("hist.", "histórico"),
    ("fest.", "festivo"),
    ("euf.", "eufemismo"),
    ("desp.", "despectivo"),
    ("afect.", "afectivo"),
    ("esp.", "especializado"),
    ("form.", "formal"),
    ("p. us.", "poco usado"),
    ("rur.", "rural"),
    ("jerg.", "jerga"),
];

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub label: &'static str,
}

pub fn is_category(code: &str) -> bool {
    GRAMMATICAL_CATEGORIES.iter().any(|(c, _)| *c == code)
}

pub fn is_style(code: &str) -> bool {
    USAGE_STYLES.iter().any(|(c, _)| *c == code)
}

pub fn category_label(code: &str) -> Option<&'static str> {
    GRAMMATICAL_CATEGORIES.iter().find(|(c, _)| *c == code).map(|(_, label)| *label)
}

pub fn style_label(code: &str) -> Option<&'static str> {
    USAGE_STYLES.iter().find(|(c, _)| *c == code).map(|(_, label)| *label)
}

pub fn entries(table: &'static [(&'static str, &'static str)]) -> Vec<CatalogEntry> {
    table.iter().map(|(code, label)| CatalogEntry { code, label }).collect()
}

pub fn is_letter(letter: char) -> bool {
    ALPHABET.contains(&letter)
}
