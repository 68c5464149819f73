//! Line classification and word splitting for DSL text

use crate::error::ParseErrorKind;

/// A classified source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Comment,
    /// `@name: value`
    Header { name: &'a str, value: &'a str },
    /// `key: rest`
    Field { key: &'a str, body: &'a str },
}

/// One numbered line of DSL text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number
    pub number: usize,
    pub text: &'a str,
}

/// Split text into numbered lines
pub fn source_lines(text: &str) -> impl Iterator<Item = SourceLine<'_>> {
    text.lines().enumerate().map(|(index, line)| SourceLine {
        number: index + 1,
        text: line,
    })
}

/// Classify one line
pub fn classify(line: &str) -> Result<LineKind<'_>, ParseErrorKind> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(LineKind::Blank);
    }
    if trimmed.starts_with('#') {
        return Ok(LineKind::Comment);
    }
    if let Some(header) = trimmed.strip_prefix('@') {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| ParseErrorKind::UnknownHeader(header.to_string()))?;
        return Ok(LineKind::Header {
            name: name.trim(),
            value: value.trim(),
        });
    }

    let (key, body) = trimmed
        .split_once(':')
        .ok_or(ParseErrorKind::MissingSeparator)?;
    Ok(LineKind::Field {
        key: key.trim(),
        body: body.trim(),
    })
}

/// Split a declaration body into words.
///
/// Whitespace separates words except inside double-quoted strings and
/// `[...]` lists, which are kept verbatim as part of the surrounding word.
pub fn split_words(body: &str) -> Result<Vec<&str>, ParseErrorKind> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_quote = false;
    let mut escaped = false;
    let mut depth = 0usize;

    for (index, ch) in body.char_indices() {
        if in_quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_quote = false;
            }
            continue;
        }

        match ch {
            '"' => {
                start.get_or_insert(index);
                in_quote = true;
            }
            '[' => {
                start.get_or_insert(index);
                depth += 1;
            }
            ']' if depth > 0 => depth -= 1,
            c if c.is_whitespace() && depth == 0 => {
                if let Some(begin) = start.take() {
                    words.push(&body[begin..index]);
                }
            }
            _ => {
                start.get_or_insert(index);
            }
        }
    }

    if in_quote {
        return Err(ParseErrorKind::UnterminatedString);
    }
    if depth > 0 {
        return Err(ParseErrorKind::UnterminatedList);
    }
    if let Some(begin) = start {
        words.push(&body[begin..]);
    }

    Ok(words)
}

/// Decode a scalar: a double-quoted string is unescaped, anything else is
/// returned as written
pub fn decode_scalar(raw: &str) -> Result<String, ParseErrorKind> {
    if !raw.starts_with('"') {
        return Ok(raw.to_string());
    }

    let mut out = String::new();
    let mut chars = raw[1..].chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => return Err(ParseErrorKind::UnterminatedString),
            },
            '"' => {
                if chars.next().is_some() {
                    return Err(ParseErrorKind::invalid(
                        raw,
                        "unexpected text after closing quote",
                    ));
                }
                return Ok(out);
            }
            other => out.push(other),
        }
    }

    Err(ParseErrorKind::UnterminatedString)
}

/// Decode a `[a, "b c", d]` list
pub fn decode_list(raw: &str) -> Result<Vec<String>, ParseErrorKind> {
    let inner = raw
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseErrorKind::UnterminatedList)?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut escaped = false;

    for ch in inner.chars() {
        if in_quote {
            current.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_quote = false;
            }
            continue;
        }
        match ch {
            '"' => {
                in_quote = true;
                current.push(ch);
            }
            ',' => {
                items.push(decode_list_item(&current)?);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if in_quote {
        return Err(ParseErrorKind::UnterminatedString);
    }
    items.push(decode_list_item(&current)?);

    Ok(items)
}

fn decode_list_item(raw: &str) -> Result<String, ParseErrorKind> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseErrorKind::invalid("options", "empty list item"));
    }
    decode_scalar(trimmed)
}

/// Characters that force a string to be quoted when written back out
const RESERVED: &[char] = &['"', '\\', '[', ']', ',', '=', '!', '~', '<', '>', '(', ')', '#'];

/// Whether `value` can be written without quotes
pub fn is_bare(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || RESERVED.contains(&c))
}

/// Quote and escape a string
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Write a scalar bare when possible, quoted otherwise
pub fn encode_scalar(value: &str) -> String {
    if is_bare(value) {
        value.to_string()
    } else {
        quote(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify("   ").unwrap(), LineKind::Blank);
        assert_eq!(classify("# note").unwrap(), LineKind::Comment);
        assert_eq!(
            classify("@name: Task Tracker").unwrap(),
            LineKind::Header {
                name: "name",
                value: "Task Tracker"
            }
        );
        assert_eq!(
            classify("title: text required").unwrap(),
            LineKind::Field {
                key: "title",
                body: "text required"
            }
        );
        assert_eq!(
            classify("title text").unwrap_err(),
            ParseErrorKind::MissingSeparator
        );
    }

    #[test]
    fn test_split_words_keeps_quotes_and_lists() {
        let words =
            split_words(r#"select options=[open, "in progress"] label="Current Status" required"#)
                .unwrap();
        assert_eq!(
            words,
            vec![
                "select",
                r#"options=[open, "in progress"]"#,
                r#"label="Current Status""#,
                "required"
            ]
        );
    }

    #[test]
    fn test_split_words_reports_unterminated() {
        assert_eq!(
            split_words(r#"text label="oops"#).unwrap_err(),
            ParseErrorKind::UnterminatedString
        );
        assert_eq!(
            split_words("select options=[a,b").unwrap_err(),
            ParseErrorKind::UnterminatedList
        );
    }

    #[test]
    fn test_decode_list() {
        assert_eq!(
            decode_list(r#"[open, "in, progress", done]"#).unwrap(),
            vec!["open", "in, progress", "done"]
        );
        assert!(decode_list("[]").unwrap().is_empty());
        assert!(decode_list("[a,,b]").is_err());
    }

    #[test]
    fn test_quote_round_trip() {
        let original = "say \"hi\"\\\nbye";
        assert_eq!(decode_scalar(&quote(original)).unwrap(), original);
        assert_eq!(encode_scalar("gold"), "gold");
        assert_eq!(encode_scalar("gold plan"), "\"gold plan\"");
    }
}
