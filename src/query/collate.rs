//! Locale-aware string ordering.
//!
//! Strings are compared in three passes, the way a browser's default
//! collation does it for Latin text:
//!
//! 1. base letters, ignoring case and accents (whitespace sorts before
//!    punctuation, then symbols, digits and letters);
//! 2. accents, unaccented before accented;
//! 3. case, lowercase before uppercase.
//!
//! Strings that tie on all three passes fall back to code point order so
//! the result is a total order consistent with `Eq`.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
  Whitespace,
  Punctuation,
  Symbol,
  Digit,
  Letter,
}

fn class_of(c: char) -> CharClass {
  if c.is_whitespace() {
    CharClass::Whitespace
  } else if c.is_numeric() {
    CharClass::Digit
  } else if c.is_alphabetic() {
    CharClass::Letter
  } else if is_punctuation(c) {
    CharClass::Punctuation
  } else {
    CharClass::Symbol
  }
}

fn is_punctuation(c: char) -> bool {
  if c.is_ascii_punctuation() {
    // Math and currency signs are symbols, not punctuation
    return !matches!(c, '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~');
  }
  matches!(c, '\u{00A1}' | '\u{00A7}' | '\u{00AB}' | '\u{00B6}' | '\u{00B7}' | '\u{00BB}' | '\u{00BF}')
    || ('\u{2010}'..='\u{2027}').contains(&c)
    || ('\u{2030}'..='\u{205E}').contains(&c)
}

/// Precomputed sort key for one string.
///
/// Field order matters: the derived `Ord` compares the passes in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
  primary: Vec<(CharClass, char)>,
  secondary: Vec<Vec<char>>,
  tertiary: Vec<bool>,
  raw: String,
}

impl CollationKey {
  pub fn new(s: &str) -> Self {
    let mut primary = Vec::with_capacity(s.len());
    let mut secondary: Vec<Vec<char>> = Vec::with_capacity(s.len());
    let mut tertiary = Vec::with_capacity(s.len());

    for c in s.nfd() {
      if is_combining_mark(c) {
        match secondary.last_mut() {
          Some(marks) => marks.push(c),
          // A leading mark has no base letter to attach to
          None => {
            primary.push((CharClass::Symbol, c));
            secondary.push(Vec::new());
            tertiary.push(false);
          }
        }
        continue;
      }
      let lower = c.to_lowercase().next().unwrap_or(c);
      primary.push((class_of(c), lower));
      secondary.push(Vec::new());
      tertiary.push(c.is_uppercase());
    }

    Self {
      primary,
      secondary,
      tertiary,
      raw: s.to_string(),
    }
  }
}

/// Compare two strings with locale-aware ordering.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
  CollationKey::new(a).cmp(&CollationKey::new(b))
}
