//! Lenient parsing of free-text chat input.

use std::collections::HashMap;

/// Parse `Key: Value` lines into a map of normalized keys to trimmed values.
///
/// Keys are lower-cased with spaces turned into underscores, so
/// `"Drop-off Date: 2025-07-21"` yields `drop-off_date`. Markdown bold markers
/// copied from a prompt (`**Email:** x`) are dropped from the key, along with
/// the one closing `**` that follows it. Values are otherwise kept as typed.
/// Lines without a colon are ignored and a repeated key keeps its last value.
pub fn parse_key_values(text: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in text.trim().lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let bold = key.starts_with("**");
        let key = key
            .trim_matches('*')
            .trim()
            .to_lowercase()
            .replace(' ', "_");
        if key.is_empty() {
            continue;
        }
        let value = match value.strip_prefix("**") {
            Some(rest) if bold => rest.trim(),
            _ => value.trim(),
        };
        fields.insert(key, value.to_string());
    }
    fields
}

/// Required keys absent from `fields`, in the order they were asked for.
pub fn missing_keys<'a>(fields: &HashMap<String, String>, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|key| !fields.contains_key(*key))
        .collect()
}

/// Split a comma-separated id list, dropping blanks.
pub fn parse_id_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

/// Why a list selection was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    NotANumber,
    OutOfRange { max: usize },
}

/// Turn a 1-based choice into a 0-based index into a list of `len` items.
pub fn parse_selection_index(text: &str, len: usize) -> Result<usize, SelectionError> {
    let number: i64 = text.trim().parse().map_err(|_| SelectionError::NotANumber)?;
    if number < 1 || number as u64 > len as u64 {
        return Err(SelectionError::OutOfRange { max: len });
    }
    Ok(number as usize - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_normalized() {
        let fields = parse_key_values(
            "First Name: John\n  LAST NAME :  Doe \nDrop-off Date: 2025-07-21\nnoise line",
        );
        assert_eq!(fields["first_name"], "John");
        assert_eq!(fields["last_name"], "Doe");
        assert_eq!(fields["drop-off_date"], "2025-07-21");
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn value_keeps_later_colons() {
        let fields = parse_key_values("Pickup Time: 09:00 AM - 11:00 AM");
        assert_eq!(fields["pickup_time"], "09:00 AM - 11:00 AM");
    }

    #[test]
    fn markdown_bold_is_dropped() {
        let fields = parse_key_values("**Email:** jane@example.com");
        assert_eq!(fields["email"], "jane@example.com");
    }

    #[test]
    fn leading_asterisks_in_values_survive() {
        let fields = parse_key_values("Password: **Secret1!\nAddress Line 1: *12 High St");
        assert_eq!(fields["password"], "**Secret1!");
        assert_eq!(fields["address_line_1"], "*12 High St");

        let fields = parse_key_values("**Password:** **Secret1!");
        assert_eq!(fields["password"], "**Secret1!");
    }

    #[test]
    fn missing_keys_in_request_order() {
        let fields = parse_key_values("email: a@b.co\nmobile: 1234567890");
        let missing = missing_keys(&fields, &["first_name", "email", "last_name", "mobile"]);
        assert_eq!(missing, vec!["first_name", "last_name"]);
    }

    #[test]
    fn id_list() {
        assert_eq!(parse_id_list(" 1, 2 ,,3 "), vec!["1", "2", "3"]);
        assert!(parse_id_list(" , ").is_empty());
    }

    #[test]
    fn selection_index() {
        assert_eq!(parse_selection_index("1", 3), Ok(0));
        assert_eq!(parse_selection_index(" 3 ", 3), Ok(2));
        assert_eq!(
            parse_selection_index("0", 3),
            Err(SelectionError::OutOfRange { max: 3 })
        );
        assert_eq!(
            parse_selection_index("4", 3),
            Err(SelectionError::OutOfRange { max: 3 })
        );
        assert_eq!(parse_selection_index("two", 3), Err(SelectionError::NotANumber));
        assert_eq!(parse_selection_index("-1", 3), Err(SelectionError::OutOfRange { max: 3 }));
    }
}
