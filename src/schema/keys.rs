//! Field name normalization

/// Normalize a raw record key into a lower camel-case field name
///
/// The first `(`, `)`, `-` and `_` are removed. The first character is
/// lower-cased, every character that starts a word is upper-cased, and all
/// whitespace is dropped. Upper-case letters inside words are kept, so
/// `"Station ID"` becomes `"stationID"`.
pub fn normalize_key(raw: &str) -> String {
    let mut key = raw.to_string();
    for strip in ['(', ')', '-', '_'] {
        if let Some(pos) = key.find(strip) {
            key.remove(pos);
        }
    }

    let mut out = String::with_capacity(key.len());
    let mut prev_is_word = false;
    for (i, c) in key.chars().enumerate() {
        let is_word = is_word_char(c);
        if i == 0 && is_word {
            out.extend(c.to_lowercase());
        } else if is_word && !prev_is_word {
            out.extend(c.to_uppercase());
        } else if !c.is_whitespace() {
            out.push(c);
        }
        prev_is_word = is_word;
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
