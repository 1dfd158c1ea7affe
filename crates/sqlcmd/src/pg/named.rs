//! Named `:placeholder` to positional `$n` rewriting.

use crate::error::DriverError;
use crate::value::{FieldMap, Value};

/// SQL with positional placeholders and the name bound at each position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Positional {
    pub sql: String,
    /// `names[i]` is bound to `$i+1`.
    pub names: Vec<String>,
}

/// Rewrite `:name` placeholders to `$1`, `$2`, ...
///
/// Quoted strings (including `E'...'` escapes and `$tag$` bodies), quoted
/// identifiers, comments and `::` casts are copied through untouched. A name
/// used more than once keeps its first index.
pub(crate) fn rewrite(sql: &str) -> Positional {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut names: Vec<String> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if let Some(end) = skipped_span(&chars, i) {
            out.extend(&chars[i..end]);
            i = end;
            continue;
        }

        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match (c, next) {
            (':', Some(':')) => {
                out.push_str("::");
                i += 2;
            }
            (':', Some(n)) if n.is_ascii_alphabetic() || n == '_' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && is_ident(chars[end]) {
                    end += 1;
                }
                let name: String = chars[start..end].iter().collect();
                let index = match names.iter().position(|existing| *existing == name) {
                    Some(pos) => pos + 1,
                    None => {
                        names.push(name);
                        names.len()
                    }
                };
                out.push('$');
                out.push_str(&index.to_string());
                i = end;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    Positional { sql: out, names }
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// End (exclusive) of a literal or comment starting at `i`, if one starts there.
fn skipped_span(chars: &[char], i: usize) -> Option<usize> {
    let next = chars.get(i + 1).copied();
    match (chars[i], next) {
        ('\'', _) => {
            let escaped = i >= 1
                && matches!(chars[i - 1], 'e' | 'E')
                && (i < 2 || !is_ident(chars[i - 2]));
            Some(quoted_end(chars, i, '\'', escaped))
        }
        ('"', _) => Some(quoted_end(chars, i, '"', false)),
        ('-', Some('-')) => Some(
            chars[i..]
                .iter()
                .position(|&c| c == '\n')
                .map_or(chars.len(), |pos| i + pos + 1),
        ),
        ('/', Some('*')) => Some(block_comment_end(chars, i)),
        ('$', _) => dollar_quoted_end(chars, i),
        _ => None,
    }
}

fn quoted_end(chars: &[char], start: usize, quote: char, backslash_escapes: bool) -> usize {
    let mut j = start + 1;
    while j < chars.len() {
        if backslash_escapes && chars[j] == '\\' {
            j += 2;
            continue;
        }
        if chars[j] == quote {
            return j + 1;
        }
        j += 1;
    }
    chars.len()
}

/// Block comments nest in Postgres.
fn block_comment_end(chars: &[char], start: usize) -> usize {
    let mut depth = 0;
    let mut j = start;
    while j + 1 < chars.len() {
        match (chars[j], chars[j + 1]) {
            ('/', '*') => {
                depth += 1;
                j += 2;
            }
            ('*', '/') => {
                depth -= 1;
                j += 2;
                if depth == 0 {
                    return j;
                }
            }
            _ => j += 1,
        }
    }
    chars.len()
}

/// `$$...$$` or `$tag$...$tag$`. `$1` and identifiers containing `$` are not quotes.
fn dollar_quoted_end(chars: &[char], start: usize) -> Option<usize> {
    if start >= 1 && is_ident(chars[start - 1]) {
        return None;
    }
    if chars.get(start + 1).is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut j = start + 1;
    while j < chars.len() && is_ident(chars[j]) {
        j += 1;
    }
    if chars.get(j) != Some(&'$') {
        return None;
    }

    let tag = &chars[start..=j];
    let body = j + 1;
    let end = chars[body..]
        .windows(tag.len())
        .position(|window| window == tag)
        .map_or(chars.len(), |pos| body + pos + tag.len());
    Some(end)
}

/// Order `params` by placeholder position.
///
/// Every name must have a value and every value must be used. Keys may be
/// written with or without the leading `:`.
pub(crate) fn bind<'p>(
    names: &[String],
    params: Option<&'p FieldMap>,
) -> Result<Vec<&'p Value>, DriverError> {
    let Some(params) = params else {
        return match names.first() {
            Some(name) => Err(DriverError::new(format!("missing value for parameter :{name}"))),
            None => Ok(Vec::new()),
        };
    };

    if let Some(unused) = params
        .keys()
        .find(|key| !names.iter().any(|name| name == key.trim_start_matches(':')))
    {
        return Err(DriverError::new(format!(
            "parameter :{} is not used by the statement",
            unused.trim_start_matches(':')
        )));
    }

    names
        .iter()
        .map(|name| {
            params
                .get(name.as_str())
                .or_else(|| params.get(format!(":{name}").as_str()))
                .ok_or_else(|| DriverError::new(format!("missing value for parameter :{name}")))
        })
        .collect()
}
