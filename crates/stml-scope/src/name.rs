use std::sync::OnceLock;

use regex::Regex;
use stml_core::StmlError;

/// One parsed segment of a normalized address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Key(String),
    Index { key: Option<String>, index: usize },
    /// Empty trailing segment: "open a new anonymous scope here".
    Anonymous,
}

/// Expands shorthand dots in `name` against the remembered segments of the
/// last named scope.
///
/// Every dot of the leading run is replaced by the matching remembered
/// segment, left to right. Once a non-dot character has been seen, a dot may
/// only separate two segments or end the name (the anonymous marker). Spaces
/// outside quotes are dropped; quoted text is copied verbatim.
///
/// With remembered segments `["x", "y", "z"]`:
///
/// * `".. .c"` becomes `"x.y.z.c"`
/// * `"..a.b"` becomes `"x.y.a.b"`
/// * `"name."` stays `"name."`
/// * `"a..b"`, `"a.b.."` and `".. ..a.b"` are rejected
pub fn normalize_name(name: &str, current_content: &[String]) -> Result<String, StmlError> {
    let mut out = String::with_capacity(name.len());
    let mut quote: Option<char> = None;
    let mut seen_content = false;
    let mut last_was_dot = true;
    let mut dot_count = 0usize;

    for ch in name.chars() {
        if let Some(open) = quote {
            out.push(ch);
            if ch == open {
                quote = None;
            }
            continue;
        }

        match ch {
            ' ' => {}
            '.' if seen_content => {
                if last_was_dot {
                    return Err(StmlError::malformed(
                        "NAME_MISPLACED_DOT",
                        format!(
                            "Cannot use leading/trailing/multiple dots after non-dot characters in name \"{}\".",
                            name
                        ),
                    ));
                }
                last_was_dot = true;
                out.push('.');
            }
            '.' => {
                out.push_str(remembered_segment(name, current_content, dot_count)?);
                out.push('.');
                dot_count += 1;
            }
            _ => {
                if ch == '\'' || ch == '"' {
                    quote = Some(ch);
                }
                seen_content = true;
                last_was_dot = false;
                out.push(ch);
            }
        }
    }

    // A name made only of dots also fills the slot after its last dot. After
    // content, a trailing dot is the anonymous marker and stays.
    if last_was_dot && !seen_content {
        out.push_str(remembered_segment(name, current_content, dot_count)?);
    }

    log::trace!("normalized name {:?} to {:?}", name, out);
    Ok(out)
}

fn remembered_segment<'a>(
    name: &str,
    current_content: &'a [String],
    position: usize,
) -> Result<&'a str, StmlError> {
    current_content
        .get(position)
        .map(String::as_str)
        .ok_or_else(|| {
            StmlError::malformed(
                "NAME_TOO_MANY_DOTS",
                format!(
                    "Too many leading dots in name \"{}\": only {} segment(s) remembered.",
                    name,
                    current_content.len()
                ),
            )
        })
}

/// Splits a normalized name on dots outside quotes. Quotes are kept.
pub fn split_segments(normalized: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0usize;

    for (offset, ch) in normalized.char_indices() {
        match quote {
            Some(open) => {
                if ch == open {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                '.' => {
                    segments.push(&normalized[start..offset]);
                    start = offset + 1;
                }
                _ => {}
            },
        }
    }
    segments.push(&normalized[start..]);
    segments
}

/// Strips one pair of matching surrounding quotes, if present.
///
/// `'example'` and `"example"` become `example`; `example'` and `'example`
/// are returned unchanged.
pub fn remove_quotes(segment: &str) -> &str {
    if is_quoted(segment) {
        &segment[1..segment.len() - 1]
    } else {
        segment
    }
}

fn is_quoted(segment: &str) -> bool {
    segment.len() >= 2
        && ((segment.starts_with('\'') && segment.ends_with('\''))
            || (segment.starts_with('"') && segment.ends_with('"')))
}

/// Raw segments remembered for shorthand expansion: the trailing anonymous
/// marker is not part of them.
pub(crate) fn content_segments(normalized: &str) -> Vec<String> {
    let mut segments: Vec<String> = split_segments(normalized)
        .into_iter()
        .map(ToString::to_string)
        .collect();
    if segments.last().is_some_and(|last| last.is_empty()) {
        segments.pop();
    }
    segments
}

pub(crate) fn parse_path(normalized: &str) -> Result<Vec<Segment>, StmlError> {
    let raw_segments = split_segments(normalized);
    let last = raw_segments.len() - 1;
    raw_segments
        .iter()
        .enumerate()
        .map(|(position, raw)| {
            if raw.is_empty() && position != last {
                return Err(StmlError::malformed(
                    "NAME_EMPTY_SEGMENT",
                    format!("Empty segment before dot in name \"{}\".", normalized),
                ));
            }
            parse_segment(raw)
        })
        .collect()
}

pub(crate) fn parse_segment(raw: &str) -> Result<Segment, StmlError> {
    if raw.is_empty() {
        return Ok(Segment::Anonymous);
    }
    if is_quoted(raw) || !(raw.contains('[') || raw.contains(']')) {
        return Ok(Segment::Key(remove_quotes(raw).to_string()));
    }

    let Some(captures) = index_segment_regex().captures(raw) else {
        return Err(StmlError::malformed(
            "NAME_INDEX_SYNTAX",
            format!("Invalid index syntax in segment \"{}\".", raw),
        ));
    };
    let key = captures.name("key").map_or("", |m| m.as_str());
    let index_text = captures.name("index").map_or("", |m| m.as_str());
    let index = parse_index(raw, index_text)?;

    Ok(Segment::Index {
        key: (!key.is_empty()).then(|| remove_quotes(key).to_string()),
        index,
    })
}

fn parse_index(raw: &str, index_text: &str) -> Result<usize, StmlError> {
    let invalid = || {
        StmlError::malformed(
            "NAME_INDEX_INVALID",
            format!(
                "Index \"{}\" in segment \"{}\" is not a non-negative integer.",
                index_text, raw
            ),
        )
    };
    if index_text.is_empty() || !index_text.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(invalid());
    }
    index_text.parse::<usize>().map_err(|_| invalid())
}

fn index_segment_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"^(?P<key>'[^']*'|"[^"]*"|[^\[\]'"]*)\[(?P<index>[^\[\]]*)\]$"#)
            .expect("index segment regex")
    })
}
