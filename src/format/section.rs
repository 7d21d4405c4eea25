//! Resolution of `{...}|{...}` sections against a track record.

use crate::library::Track;

use super::types::Token;

/// Index of the `SectionClose` matching the `SectionOpen` at `open`, or the
/// end of the slice for an unterminated section.
fn section_end(tokens: &[Token], open: usize) -> usize {
    tokens[open + 1..]
        .iter()
        .position(|t| *t == Token::SectionClose)
        .map_or(tokens.len(), |i| open + 1 + i)
}

/// A section is satisfied when none of its variables are empty. Sections
/// without variables are always satisfied.
fn is_satisfied(inner: &[Token], track: &Track) -> bool {
    inner.iter().all(|t| match t {
        Token::Variable(var) => !var.is_empty(track),
        _ => true,
    })
}

/// Flatten a column's tokens for one record: tokens outside sections pass
/// through, and each chain of alternatives contributes the inner tokens of
/// its first satisfied section, or nothing.
pub fn resolve_tokens<'a>(tokens: &'a [Token], track: &Track) -> Vec<&'a Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i] != Token::SectionOpen {
            out.push(&tokens[i]);
            i += 1;
            continue;
        }

        let mut emitted = false;
        loop {
            let end = section_end(tokens, i);
            let inner = &tokens[i + 1..end];
            if !emitted && is_satisfied(inner, track) {
                out.extend(inner);
                emitted = true;
            }
            i = end + 1;
            // `|` is always followed by `{` in a compiled column.
            let chained = tokens.get(i) == Some(&Token::SectionOr)
                && tokens.get(i + 1) == Some(&Token::SectionOpen);
            if chained {
                i += 1;
            } else {
                break;
            }
        }
    }
    out
}
