//! Card number display helpers.

/// Removes every whitespace character.
pub fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Groups a card number into blocks of four: `"4242424242424242"` becomes
/// `"4242 4242 4242 4242"`. Existing whitespace is discarded first.
pub fn format_card_number(value: &str) -> String {
    let digits: Vec<char> = strip_whitespace(value).chars().collect();
    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summary form of a card number: only the last four characters survive.
pub fn mask_card_number(value: &str) -> String {
    let stripped: Vec<char> = strip_whitespace(value).chars().collect();
    let tail: String = stripped[stripped.len().saturating_sub(4)..].iter().collect();
    format!("**** **** **** {tail}")
}
