//! Route template parsing.
//!
//! A template is handled in two passes. Optional sections delimited by
//! `(` and `)` are first expanded into concrete alternatives, then each
//! alternative is tokenized into one group per `/`-delimited segment.

use crate::error::CompileError;

/// Character that starts a named variable.
pub const VARIABLE_MARKER: char = ':';

/// A fragment of a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text that must appear verbatim.
    Literal(String),
    /// A named variable (`:name`).
    Variable(String),
}

/// A single template rendering with every optional section resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    /// Template text with the optional delimiters removed.
    pub path: String,
    /// Number of optional sections included in `path`.
    pub optionals: usize,
}

/// Expand every optional section of `template` into concrete alternatives.
///
/// Each `(` freezes the alternatives built so far (the section is absent) and
/// keeps extending copies of them (the section is present). The matching `)`
/// merges both sets back so later characters reach all of them. The result
/// keeps the frozen variants ahead of the extended ones, so the first entry
/// never includes an optional section.
pub fn expand_alternatives(template: &str) -> Result<Vec<Alternative>, CompileError> {
    let mut active = vec![Alternative {
        path: String::new(),
        optionals: 0,
    }];
    let mut frozen: Vec<Vec<Alternative>> = Vec::new();

    for (position, ch) in template.char_indices() {
        match ch {
            '(' => {
                frozen.push(active.clone());
                for alternative in &mut active {
                    alternative.optionals += 1;
                }
            }
            ')' => {
                let mut merged = frozen.pop().ok_or_else(|| CompileError::UnbalancedClose {
                    template: template.to_string(),
                    position,
                })?;
                merged.append(&mut active);
                active = merged;
            }
            _ => {
                for alternative in &mut active {
                    alternative.path.push(ch);
                }
            }
        }
    }

    if !frozen.is_empty() {
        return Err(CompileError::UnclosedOptional {
            template: template.to_string(),
        });
    }

    Ok(active)
}

/// Split an optional-free path into segment groups.
///
/// A leading `/` is stripped and an empty path yields no groups. Empty
/// segments (for example the one after a trailing `/`) produce empty groups.
pub fn tokenize(path: &str) -> Result<Vec<Vec<Token>>, CompileError> {
    let (trimmed, mut offset) = match path.strip_prefix('/') {
        Some(rest) => (rest, 1),
        None => (path, 0),
    };
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut groups = Vec::new();
    for segment in trimmed.split('/') {
        groups.push(tokenize_segment(segment, offset, path)?);
        offset += segment.len() + 1;
    }
    Ok(groups)
}

/// Variable names of `groups` in left-to-right order.
pub fn variable_names(groups: &[Vec<Token>]) -> Vec<String> {
    groups
        .iter()
        .flatten()
        .filter_map(|token| match token {
            Token::Variable(name) => Some(name.clone()),
            Token::Literal(_) => None,
        })
        .collect()
}

fn tokenize_segment(segment: &str, offset: usize, path: &str) -> Result<Vec<Token>, CompileError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = segment.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if ch != VARIABLE_MARKER {
            literal.push(ch);
            continue;
        }

        let mut name = String::new();
        while let Some(&(_, next)) = chars.peek() {
            if !is_identifier(next) {
                break;
            }
            name.push(next);
            chars.next();
        }
        if name.is_empty() {
            return Err(CompileError::InvalidVariable {
                template: path.to_string(),
                position: offset + index,
            });
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(Token::Variable(name));
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

fn is_identifier(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
