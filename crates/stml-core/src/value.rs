use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StmlError;

/// Literal value of an STML document.
///
/// The scope engine treats values as opaque; this is the value type the
/// command line driver feeds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StmlValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<StmlValue>),
}

impl StmlValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[StmlValue]> {
        match self {
            Self::List(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Type annotation name used by STML sources.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }
}

impl From<bool> for StmlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for StmlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for StmlValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for StmlValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for StmlValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl fmt::Display for StmlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Float(value) => {
                if value.is_finite() && value.fract() == 0.0 {
                    write!(f, "{:.1}", value)
                } else {
                    write!(f, "{}", value)
                }
            }
            Self::String(value) => write!(f, "\"{}\"", escape(value)),
            Self::List(values) => {
                f.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Parses the right-hand side of an STML assignment.
///
/// Anything that is not null, a boolean, a quoted string, a list or a
/// number is kept as a bare string.
pub fn parse_literal(source: &str) -> Result<StmlValue, StmlError> {
    let text = source.trim();
    match text {
        "" | "null" | "NULL" | "Null" => return Ok(StmlValue::Null),
        "true" | "TRUE" | "True" => return Ok(StmlValue::Bool(true)),
        "false" | "FALSE" | "False" => return Ok(StmlValue::Bool(false)),
        _ => {}
    }

    if is_wrapped(text, '"', '"') || is_wrapped(text, '\'', '\'') {
        return Ok(StmlValue::String(unescape(&text[1..text.len() - 1])));
    }

    if is_wrapped(text, '[', ']') {
        let inner = &text[1..text.len() - 1];
        if inner.trim().is_empty() {
            return Ok(StmlValue::List(Vec::new()));
        }
        return split_list_items(inner)
            .into_iter()
            .map(parse_literal)
            .collect::<Result<Vec<_>, _>>()
            .map(StmlValue::List);
    }

    if is_wrapped(text, '{', '}') {
        return Err(StmlError::malformed(
            "VALUE_UNSUPPORTED",
            format!("Object literal \"{}\" is not supported.", text),
        ));
    }

    if let Ok(value) = text.parse::<i64>() {
        return Ok(StmlValue::Integer(value));
    }
    if is_numeric_shaped(text) {
        if let Ok(value) = text.parse::<f64>() {
            if value.is_finite() {
                return Ok(StmlValue::Float(value));
            }
        }
    }

    Ok(StmlValue::String(text.to_string()))
}

/// Digits with an optional sign, decimal point and exponent. Rejects words
/// such as `nan` or `inf` that `f64::from_str` would accept.
fn is_numeric_shaped(text: &str) -> bool {
    text.bytes().any(|byte| byte.is_ascii_digit())
        && text
            .bytes()
            .all(|byte| byte.is_ascii_digit() || matches!(byte, b'+' | b'-' | b'.' | b'e' | b'E'))
}

fn is_wrapped(text: &str, open: char, close: char) -> bool {
    text.len() >= 2 && text.starts_with(open) && text.ends_with(close)
}

fn split_list_items(inner: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0usize;

    for (offset, ch) in inner.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&inner[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }
    items.push(&inner[start..]);
    items
}

/// Escapes a string so that [`unescape`] restores it.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if (ch as u32) < 0x20 || ch == '\u{7f}' => {
                out.push_str(&format!("\\u{:04x}", ch as u32));
            }
            ch => out.push(ch),
        }
    }
    out
}

/// Resolves backslash escapes. Unknown or broken escapes are kept verbatim.
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = if hex.len() == 4 {
                    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                } else {
                    None
                };
                match decoded {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn keywords_and_numbers_parse() {
        assert_eq!(parse_literal("  ").expect("blank"), StmlValue::Null);
        assert_eq!(parse_literal("NULL").expect("null"), StmlValue::Null);
        assert_eq!(parse_literal("True").expect("true"), StmlValue::Bool(true));
        assert_eq!(parse_literal("false").expect("false"), StmlValue::Bool(false));
        assert_eq!(parse_literal("-42").expect("int"), StmlValue::Integer(-42));
        assert_eq!(parse_literal("2.5").expect("float"), StmlValue::Float(2.5));
        assert_eq!(
            parse_literal("hello world").expect("bare"),
            StmlValue::String("hello world".to_string())
        );
    }

    #[test]
    fn quoted_strings_are_unescaped() {
        assert_eq!(
            parse_literal(r#""a\tb\"c""#).expect("double"),
            StmlValue::String("a\tb\"c".to_string())
        );
        assert_eq!(
            parse_literal(r"'it\'s A'").expect("single"),
            StmlValue::String("it's A".to_string())
        );
        assert_eq!(unescape(r"\q\u00zz\"), "\\q\\u00zz\\");
    }

    #[test]
    fn lists_split_on_top_level_commas_only() {
        let value = parse_literal(r#"[1, "a,b", [2, 3], x]"#).expect("list");
        assert_eq!(
            value,
            StmlValue::List(vec![
                StmlValue::Integer(1),
                StmlValue::String("a,b".to_string()),
                StmlValue::List(vec![StmlValue::Integer(2), StmlValue::Integer(3)]),
                StmlValue::String("x".to_string()),
            ])
        );
        assert_eq!(parse_literal("[ ]").expect("empty"), StmlValue::List(Vec::new()));
    }

    #[test]
    fn object_literals_are_rejected() {
        let error = parse_literal("{a = 1}").expect_err("object");
        assert_eq!(error.code, "VALUE_UNSUPPORTED");
        assert!(error.is_malformed());
    }

    #[test]
    fn display_writes_parseable_literals() {
        let value = StmlValue::List(vec![
            StmlValue::String("tab\there".to_string()),
            StmlValue::Float(3.0),
            StmlValue::Null,
        ]);
        let text = value.to_string();
        assert_eq!(text, r#"["tab\there", 3.0, null]"#);
        assert_eq!(parse_literal(&text).expect("reparse"), value);
    }

    #[test]
    fn serde_uses_plain_json_shapes() {
        let value = StmlValue::List(vec![StmlValue::Integer(1), StmlValue::Bool(true)]);
        assert_eq!(serde_json::to_string(&value).expect("json"), "[1,true]");
        assert_eq!(serde_json::to_string(&StmlValue::Null).expect("json"), "null");
        assert_eq!(StmlValue::from("x").type_name(), "string");
        assert_eq!(StmlValue::from(2i64).as_float(), Some(2.0));
    }

    #[test]
    fn non_finite_words_stay_bare_strings() {
        for word in ["nan", "NaN", "inf", "-inf", "Infinity", "infinity"] {
            let value = parse_literal(word).expect(word);
            assert_eq!(value.as_string(), Some(word), "{}", word);
        }
        assert_eq!(parse_literal("1e3").expect("exponent"), StmlValue::Float(1000.0));
        assert_eq!(parse_literal("-.5").expect("leading dot"), StmlValue::Float(-0.5));
        assert_eq!(
            parse_literal("1e999").expect("overflow"),
            StmlValue::String("1e999".to_string())
        );
        assert_eq!(
            serde_json::to_string(&parse_literal("nan").expect("nan")).expect("json"),
            "\"nan\""
        );
    }

    #[test]
    fn accessors_match_only_their_variant() {
        let list = parse_literal("[true, 7, x, null]").expect("list");
        let items = list.as_list().expect("list items");
        assert_eq!(items[0].as_bool(), Some(true));
        assert_eq!(items[1].as_integer(), Some(7));
        assert_eq!(items[2].as_string(), Some("x"));
        assert!(items[3].is_null());

        assert_eq!(items[1].as_bool(), None);
        assert_eq!(items[0].as_integer(), None);
        assert_eq!(items[1].as_string(), None);
        assert_eq!(items[2].as_list(), None);
        assert!(!items[2].is_null());
        assert_eq!(StmlValue::Float(2.5).as_integer(), None);
    }
}
