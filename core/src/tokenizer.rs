use lazy_static::lazy_static;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref SEPARATORS: HashSet<char> = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~¡¿\t".chars().collect();
}

fn is_separator(c: char) -> bool { SEPARATORS.contains(&c) }

/// Canonical form used for every index key and every query term:
/// NFKD, drop anything outside ASCII (combining marks included), lower-case.
pub fn normalize(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect::<String>().to_ascii_lowercase()
}

/// Split text into raw words. Punctuation and tabs act as spaces; words are
/// returned in order, unnormalized, with empty pieces dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c == ' ' || is_separator(c))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
