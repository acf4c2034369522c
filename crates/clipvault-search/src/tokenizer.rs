//! Free-text tokenizer

/// Split text into lower-cased tokens of letters, digits and underscores
///
/// Every other character acts as a separator. No stemming or stop-word
/// removal is applied; empty and all-punctuation input yields no tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
