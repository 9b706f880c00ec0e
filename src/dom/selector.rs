//! Compound CSS selectors for the in-memory document.
//!
//! Supports what the page scripts use: `tag`, `*`, `#id`, `.class`,
//! `[attr]`, `[attr=value]` (quoted or bare), `:checked`, `:disabled`,
//! and comma-separated lists. Combinators are not supported.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unsupported combinator in {0:?}")]
    Combinator(String),
    #[error("unterminated attribute selector in {0:?}")]
    Unterminated(String),
    #[error("unsupported pseudo-class :{0}")]
    Pseudo(String),
    #[error("unexpected character {1:?} in {0:?}")]
    Unexpected(String, char),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Part {
    Tag(String),
    Id(String),
    Class(String),
    HasAttr(String),
    AttrEq(String, String),
    Checked,
    Disabled,
}

/// One compound selector: every part must match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compound {
    pub parts: Vec<Part>,
}

/// Comma-separated alternatives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    pub alternatives: Vec<Compound>,
}

/// What the matcher needs to know about a node.
pub trait Inspect {
    fn tag(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;
    fn has_class_token(&self, class: &str) -> bool;
    fn is_checked(&self) -> bool;
    fn is_disabled(&self) -> bool;
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let alternatives = input
            .split(',')
            .map(|s| parse_compound(s.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SelectorList { alternatives })
    }

    pub fn matches(&self, node: &impl Inspect) -> bool {
        self.alternatives.iter().any(|c| c.matches(node))
    }
}

impl Compound {
    pub fn matches(&self, node: &impl Inspect) -> bool {
        self.parts.iter().all(|p| match p {
            Part::Tag(t) => node.tag().eq_ignore_ascii_case(t),
            Part::Id(id) => node.attribute("id").as_deref() == Some(id.as_str()),
            Part::Class(c) => node.has_class_token(c),
            Part::HasAttr(a) => node.attribute(a).is_some(),
            Part::AttrEq(a, v) => node.attribute(a).as_deref() == Some(v.as_str()),
            Part::Checked => node.is_checked(),
            Part::Disabled => node.is_disabled(),
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], mut i: usize) -> (String, usize) {
    let start = i;
    while i < chars.len() && is_ident_char(chars[i]) {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

fn parse_compound(input: &str) -> Result<Compound, SelectorError> {
    if input.is_empty() {
        return Err(SelectorError::Empty);
    }
    if input.contains(|c: char| c.is_whitespace() || c == '>' || c == '+' || c == '~')
        && !input.contains('[')
    {
        return Err(SelectorError::Combinator(input.to_string()));
    }

    let chars: Vec<char> = input.chars().collect();
    let mut parts = Vec::new();
    let mut i = 0;

    if chars[0] == '*' {
        i = 1;
    } else if is_ident_char(chars[0]) {
        let (tag, next) = take_ident(&chars, 0);
        parts.push(Part::Tag(tag));
        i = next;
    }

    while i < chars.len() {
        match chars[i] {
            '#' => {
                let (id, next) = take_ident(&chars, i + 1);
                parts.push(Part::Id(id));
                i = next;
            }
            '.' => {
                let (class, next) = take_ident(&chars, i + 1);
                parts.push(Part::Class(class));
                i = next;
            }
            ':' => {
                let (pseudo, next) = take_ident(&chars, i + 1);
                match pseudo.as_str() {
                    "checked" => parts.push(Part::Checked),
                    "disabled" => parts.push(Part::Disabled),
                    _ => return Err(SelectorError::Pseudo(pseudo)),
                }
                i = next;
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|p| p + i)
                    .ok_or_else(|| SelectorError::Unterminated(input.to_string()))?;
                let inner: String = chars[i + 1..close].iter().collect();
                match inner.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');
                        parts.push(Part::AttrEq(name.trim().to_string(), value.to_string()));
                    }
                    None => parts.push(Part::HasAttr(inner.trim().to_string())),
                }
                i = close + 1;
            }
            c if c.is_whitespace() || c == '>' || c == '+' || c == '~' => {
                return Err(SelectorError::Combinator(input.to_string()));
            }
            c => return Err(SelectorError::Unexpected(input.to_string(), c)),
        }
    }

    Ok(Compound { parts })
}
