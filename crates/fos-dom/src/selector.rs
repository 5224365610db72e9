//! Selector matching for querySelector
//!
//! Supports compound selectors (`tag`, `*`, `#id`, `.class`, `[attr]`,
//! `[attr=value]`) joined by the descendant combinator. Anything else is a
//! parse error rather than a silent mismatch.

use crate::node::Namespace;
use crate::{DomTree, NodeId};

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("Unexpected end of selector")]
    UnexpectedEnd,
}

/// Parsed selector, compounds in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

/// One compound selector (no combinators)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrMatch>,
}

/// `[name]` or `[name=value]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrMatch {
    pub name: String,
    pub value: Option<String>,
}

impl Selector {
    /// Parse a selector string
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut cursor = Cursor { src: input, pos: 0 };
        let mut compounds = Vec::new();

        cursor.skip_ws();
        while !cursor.at_end() {
            compounds.push(parse_compound(&mut cursor)?);
            let had_ws = cursor.skip_ws();
            if let Some(found) = cursor.peek() {
                if !had_ws {
                    return Err(SelectorError::Unexpected {
                        found,
                        offset: cursor.pos,
                    });
                }
            }
        }

        if compounds.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { compounds })
    }

    /// Compounds in source order
    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    /// Check whether an element matches
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some((last, rest)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(tree, id) {
            return false;
        }

        // Descendant-only chains can be matched greedily from the right.
        let mut ancestor = tree.parent(id);
        for compound in rest.iter().rev() {
            loop {
                let Some(candidate) = ancestor else {
                    return false;
                };
                ancestor = tree.parent(candidate);
                if compound.matches(tree, candidate) {
                    break;
                }
            }
        }
        true
    }
}

impl Compound {
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(elem) = tree.element(id) else {
            return false;
        };

        if let Some(tag) = &self.tag {
            let same = match elem.namespace {
                Namespace::Html => elem.name.eq_ignore_ascii_case(tag),
                _ => elem.name == *tag,
            };
            if !same {
                return false;
            }
        }
        if let Some(want) = &self.id {
            if elem.id() != Some(want.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| elem.classes().any(|have| have == c)) {
            return false;
        }
        self.attrs.iter().all(|attr| match (&attr.value, elem.get_attr(&attr.name)) {
            (None, found) => found.is_some(),
            (Some(want), Some(found)) => want == found,
            (Some(_), None) => false,
        })
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Skip whitespace, reporting whether any was consumed
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                found,
                offset: self.pos,
            },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn ident(&mut self, allow_colon: bool) -> Result<String, SelectorError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| is_ident_char(c) || (allow_colon && c == ':'))
        {
            self.bump();
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorError> {
        if self.peek() == Some(want) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn parse_compound(cursor: &mut Cursor<'_>) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();
    let mut any = false;

    match cursor.peek() {
        Some('*') => {
            cursor.bump();
            any = true;
        }
        Some(c) if is_ident_char(c) => {
            compound.tag = Some(cursor.ident(false)?);
            any = true;
        }
        _ => {}
    }

    loop {
        match cursor.peek() {
            Some('#') => {
                cursor.bump();
                compound.id = Some(cursor.ident(false)?);
            }
            Some('.') => {
                cursor.bump();
                compound.classes.push(cursor.ident(false)?);
            }
            Some('[') => {
                cursor.bump();
                compound.attrs.push(parse_attr(cursor)?);
            }
            _ => break,
        }
        any = true;
    }

    if !any {
        return Err(cursor.unexpected());
    }
    Ok(compound)
}

fn parse_attr(cursor: &mut Cursor<'_>) -> Result<AttrMatch, SelectorError> {
    cursor.skip_ws();
    let name = cursor.ident(true)?;
    cursor.skip_ws();

    let value = if cursor.peek() == Some('=') {
        cursor.bump();
        cursor.skip_ws();
        let value = match cursor.peek() {
            Some(quote @ ('"' | '\'')) => {
                cursor.bump();
                let start = cursor.pos;
                loop {
                    match cursor.bump() {
                        Some(c) if c == quote => break,
                        Some(_) => {}
                        None => return Err(SelectorError::UnexpectedEnd),
                    }
                }
                cursor.src[start..cursor.pos - 1].to_string()
            }
            _ => cursor.ident(false)?,
        };
        cursor.skip_ws();
        Some(value)
    } else {
        None
    };

    cursor.expect(']')?;
    Ok(AttrMatch { name, value })
}
