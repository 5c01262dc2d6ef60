use crate::{Result, SiteError};

/// Parsed subset of CSS selectors: comma lists, descendant combinators and
/// compound `tag#id.class[attr]` parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Vec<Compound>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttrMatch {
    pub(crate) name: String,
    pub(crate) op: AttrOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self> {
        let mut alternatives = Vec::new();
        for part in split_outside_brackets(source, |ch| ch == ',') {
            let compounds = split_outside_brackets(part, char::is_whitespace)
                .into_iter()
                .map(parse_compound)
                .collect::<Result<Vec<_>>>()?;
            if compounds.is_empty() {
                return Err(SiteError::msg(format!("empty selector in `{source}`")));
            }
            alternatives.push(compounds);
        }
        if alternatives.is_empty() {
            return Err(SiteError::InvalidInput("selector must not be empty"));
        }
        Ok(Self { alternatives })
    }

    pub(crate) fn alternatives(&self) -> &[Vec<Compound>] {
        &self.alternatives
    }
}

impl AttrMatch {
    pub(crate) fn matches(&self, value: Option<&str>) -> bool {
        match (&self.op, value) {
            (_, None) => false,
            (AttrOp::Exists, Some(_)) => true,
            (AttrOp::Equals(expected), Some(actual)) => actual == expected,
            (AttrOp::Prefix(prefix), Some(actual)) => actual.starts_with(prefix.as_str()),
        }
    }
}

fn split_outside_brackets(source: &str, is_separator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (index, ch) in source.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 && is_separator(ch) => {
                let part = source[start..index].trim();
                if !part.is_empty() {
                    parts.push(part);
                }
                start = index + ch.len_utf8();
            }
            _ => {}
        }
    }
    let tail = source[start..].trim();
    if !tail.is_empty() {
        parts.push(tail);
    }
    parts
}

fn is_delimiter(ch: char) -> bool {
    matches!(ch, '#' | '.' | '[')
}

fn parse_compound(source: &str) -> Result<Compound> {
    let mut compound = Compound::default();
    let tag_end = source.find(is_delimiter).unwrap_or(source.len());
    if tag_end > 0 {
        let tag = &source[..tag_end];
        if tag != "*" {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
    }

    let mut rest = &source[tag_end..];
    while let Some(first) = rest.chars().next() {
        match first {
            '#' | '.' => {
                let body = &rest[1..];
                let end = body.find(is_delimiter).unwrap_or(body.len());
                let name = &body[..end];
                if name.is_empty() {
                    return Err(SiteError::msg(format!("dangling `{first}` in `{source}`")));
                }
                if first == '#' {
                    compound.id = Some(name.to_string());
                } else {
                    compound.classes.push(name.to_string());
                }
                rest = &body[end..];
            }
            '[' => {
                let close = rest
                    .find(']')
                    .ok_or_else(|| SiteError::msg(format!("unclosed `[` in `{source}`")))?;
                compound.attrs.push(parse_attr(&rest[1..close])?);
                rest = &rest[close + 1..];
            }
            _ => {
                return Err(SiteError::msg(format!(
                    "unexpected `{first}` in selector `{source}`"
                )))
            }
        }
    }
    Ok(compound)
}

fn parse_attr(inner: &str) -> Result<AttrMatch> {
    let unquote = |value: &str| value.trim().trim_matches(|c| c == '"' || c == '\'').to_string();
    let (name, op) = if let Some((name, value)) = inner.split_once("^=") {
        (name, AttrOp::Prefix(unquote(value)))
    } else if let Some((name, value)) = inner.split_once('=') {
        (name, AttrOp::Equals(unquote(value)))
    } else {
        (inner, AttrOp::Exists)
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(SiteError::InvalidInput("attribute selector without a name"));
    }
    Ok(AttrMatch {
        name: name.to_string(),
        op,
    })
}
