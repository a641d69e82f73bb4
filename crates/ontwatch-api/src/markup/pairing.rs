// Name/value pairing
//
// Instance blocks carry their fields as `ParaName`/`ParaValue` sibling
// elements. Two encodings show up across the firmware's endpoints:
//
// - positional: all names and all values, paired by index
// - interleaved: each name is followed by its value, with stray names and
//   values mixed in that must be tolerated

use std::collections::HashMap;

/// Classification of an element directly inside an `Instance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Name,
    Value,
    Other,
}

impl TokenKind {
    pub(crate) fn from_tag(tag: &str) -> Self {
        match tag {
            "ParaName" => Self::Name,
            "ParaValue" => Self::Value,
            _ => Self::Other,
        }
    }
}

/// One child element of an `Instance`, with its (untrimmed) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

// ── FieldMap ─────────────────────────────────────────────────────────

/// Decoded fields of one instance.
///
/// Lookups are forgiving: a missing text field reads as `""` and a missing
/// or unparseable integer reads as `0`, which is how the appliance's own UI
/// treats them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: HashMap<String, String>,
}

impl FieldMap {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Text field, `""` when absent.
    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_owned()
    }

    /// Integer field, `0` when absent or not a base-10 integer. Surrounding
    /// whitespace makes the value invalid.
    pub fn int(&self, key: &str) -> i64 {
        self.get(key).and_then(|v| v.parse().ok()).unwrap_or(0)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

// ── Pairing strategies ───────────────────────────────────────────────

/// Pair the i-th name with the i-th value. Surplus on either side is
/// dropped.
pub fn paired(names: &[&str], values: &[&str]) -> FieldMap {
    names
        .iter()
        .zip(values)
        .map(|(n, v)| (*n, *v))
        .collect()
}

enum Pending {
    AwaitingName,
    AwaitingValue(String),
}

/// Pair each value with the most recent unconsumed name.
///
/// A second name before any value replaces the pending one, a value with no
/// pending name is dropped, an empty name pairs with nothing, and unrelated
/// elements are skipped. Repeated names keep the last value.
pub fn interleaved<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> FieldMap {
    let mut map = FieldMap::default();
    let mut state = Pending::AwaitingName;

    for token in tokens {
        match token.kind {
            TokenKind::Name if token.text.is_empty() => state = Pending::AwaitingName,
            TokenKind::Name => state = Pending::AwaitingValue(token.text.clone()),
            TokenKind::Value => {
                if let Pending::AwaitingValue(key) =
                    std::mem::replace(&mut state, Pending::AwaitingName)
                {
                    map.insert(key, token.text.clone());
                }
            }
            TokenKind::Other => {}
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn name(t: &str) -> Token {
        Token::new(TokenKind::Name, t)
    }

    fn value(t: &str) -> Token {
        Token::new(TokenKind::Value, t)
    }

    #[test]
    fn paired_drops_surplus_names() {
        let map = paired(&["X", "Y", "Z"], &["1", "2"]);
        let expected: FieldMap = [("X", "1"), ("Y", "2")].into_iter().collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn paired_drops_surplus_values() {
        let map = paired(&["X"], &["1", "2", "3"]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.text("X"), "1");
    }

    #[test]
    fn interleaved_second_name_replaces_pending() {
        let tokens = [name("A"), name("B"), value("1")];
        let expected: FieldMap = [("B", "1")].into_iter().collect();
        assert_eq!(interleaved(&tokens), expected);
    }

    #[test]
    fn interleaved_orphan_value_is_dropped() {
        let tokens = [value("orphan"), name("A"), value("1"), value("2")];
        let expected: FieldMap = [("A", "1")].into_iter().collect();
        assert_eq!(interleaved(&tokens), expected);
    }

    #[test]
    fn interleaved_skips_unrelated_and_empty_names() {
        let tokens = [
            name(""),
            value("lost"),
            name("A"),
            Token::new(TokenKind::Other, "noise"),
            value("1"),
        ];
        let expected: FieldMap = [("A", "1")].into_iter().collect();
        assert_eq!(interleaved(&tokens), expected);
    }

    #[test]
    fn interleaved_last_write_wins() {
        let tokens = [name("A"), value("1"), name("A"), value("2")];
        assert_eq!(interleaved(&tokens).text("A"), "2");
    }

    #[test]
    fn lenient_lookups() {
        let map: FieldMap = [("n", "42"), ("bad", "4x"), ("pad", " 7 ")].into_iter().collect();
        assert_eq!(map.int("n"), 42);
        assert_eq!(map.int("bad"), 0);
        assert_eq!(map.int("pad"), 0);
        assert_eq!(map.int("missing"), 0);
        assert_eq!(map.text("missing"), "");
    }
}
