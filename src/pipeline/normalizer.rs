/// Collapses internal whitespace, trims, and strips the zero-width
/// characters the source feed occasionally embeds.
pub(crate) fn collapse_whitespace(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-cases each whitespace-separated word: first alphabetic character
/// uppercased, the rest lowered. Matches the casing the rest of the corpus
/// was published with ("Senior Data Engineer", "Full Time").
pub(crate) fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full categorical-field normalization: collapse, trim, title-case.
pub(crate) fn normalize_field(value: &str) -> String {
    title_case(&collapse_whitespace(value))
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_and_trims() {
        assert_eq!(
            collapse_whitespace("  senior \t data\u{feff}  engineer  "),
            "senior data engineer"
        );
    }

    #[test]
    fn title_cases_words() {
        assert_eq!(normalize_field("  SENIOR   dATa engineer "), "Senior Data Engineer");
        assert_eq!(normalize_field("full-time"), "Full-time");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_field("   "), "");
    }
}
