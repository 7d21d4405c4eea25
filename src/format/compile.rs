//! Single-pass compiler from a template string to [`Column`]s.

use super::error::FormatError;
use super::types::{Alignment, Color, Column, Token};
use super::variable::Variable;

const ALIGNMENT: &str = "column alignment 'l', 'c' or 'r'";

/// Largest factor or size a column header accepts; widths end up as
/// terminal cells.
const MAX_COLUMN_NUMBER: usize = u16::MAX as usize;

struct Parser {
    chars: Vec<char>,
    pos: usize,
    /// Position of the `{` of the currently open section.
    open_section: Option<usize>,
}

impl Parser {
    fn new(template: &str) -> Self {
        Self {
            chars: template.chars().collect(),
            pos: 0,
            open_section: None,
        }
    }

    fn next(&mut self) -> Option<(usize, char)> {
        let ch = *self.chars.get(self.pos)?;
        self.pos += 1;
        Some((self.pos - 1, ch))
    }

    fn next_or(&mut self, expected: &'static str) -> Result<(usize, char), FormatError> {
        self.next().ok_or(FormatError::UnexpectedEnd { expected })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn expect(&mut self, want: char, expected: &'static str) -> Result<(), FormatError> {
        match self.next_or(expected)? {
            (_, ch) if ch == want => Ok(()),
            (pos, ch) => Err(FormatError::Unexpected { ch, pos, expected }),
        }
    }

    /// Read a non-empty decimal number closed by `terminator`.
    fn number(&mut self, terminator: char, expected: &'static str) -> Result<usize, FormatError> {
        let mut value: Option<usize> = None;
        let start = self.pos;
        loop {
            let (pos, ch) = self.next_or(expected)?;
            if ch == terminator {
                if let Some(v) = value {
                    return Ok(v);
                }
            }
            let Some(digit) = ch.to_digit(10) else {
                return Err(FormatError::Unexpected { ch, pos, expected });
            };
            let v = value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit as usize))
                .filter(|&v| v <= MAX_COLUMN_NUMBER)
                .ok_or(FormatError::NumberTooLarge {
                    ch: self.chars[start],
                    pos: start,
                })?;
            value = Some(v);
        }
    }

    /// `<align>:<factor>:<size>]`, with the opening `[` already consumed.
    fn column_header(&mut self) -> Result<Column, FormatError> {
        let (pos, key) = self.next_or(ALIGNMENT)?;
        let alignment = Alignment::from_key(key).ok_or(FormatError::Unexpected {
            ch: key,
            pos,
            expected: ALIGNMENT,
        })?;
        self.expect(':', "':' after the column alignment")?;
        let factor = self.number(':', "a digit or ':'")?;
        let size = self.number(']', "a digit or ']'")?;
        Ok(Column::new(alignment, factor, size))
    }

    fn content(&mut self, pos: usize, ch: char, column: &mut Column) -> Result<(), FormatError> {
        let token = match ch {
            '$' => {
                let (pos, key) = self.next_or("a variable key after '$'")?;
                let var = Variable::from_key(key)
                    .ok_or(FormatError::UnknownVariable { ch: key, pos })?;
                Token::Variable(var)
            }
            '%' => {
                let (pos, digit) = self.next_or("a color number after '%'")?;
                let color =
                    Color::from_digit(digit).ok_or(FormatError::UnknownColor { ch: digit, pos })?;
                self.expect('c', "'c' closing the color directive")?;
                Token::Color(color)
            }
            '{' => {
                if self.open_section.is_some() {
                    return Err(FormatError::NestedSection { pos });
                }
                self.open_section = Some(pos);
                Token::SectionOpen
            }
            '}' => {
                if self.open_section.take().is_none() {
                    return Err(FormatError::UnbalancedBraces { ch, pos });
                }
                Token::SectionClose
            }
            '|' => {
                let after_close = matches!(column.tokens.last(), Some(Token::SectionClose));
                if !after_close || self.peek() != Some('{') {
                    return Err(FormatError::MisplacedOr { pos });
                }
                Token::SectionOr
            }
            '\\' => {
                let (pos, escaped) = self.next_or("a character after '\\'")?;
                if escaped.is_control() {
                    return Err(FormatError::NonPrintable {
                        code: escaped as u32,
                        pos,
                    });
                }
                Token::Char(escaped)
            }
            c if c.is_control() => {
                return Err(FormatError::NonPrintable { code: c as u32, pos });
            }
            c => Token::Char(c),
        };
        column.tokens.push(token);
        Ok(())
    }

    fn run(mut self) -> Result<Vec<Column>, FormatError> {
        let mut columns = Vec::new();
        match self.next() {
            None => return Ok(columns),
            Some((_, '[')) => {}
            Some((pos, ch)) => return Err(FormatError::MissingColumn { ch, pos }),
        }

        let mut current = self.column_header()?;
        while let Some((pos, ch)) = self.next() {
            if ch == '[' {
                if self.open_section.is_some() {
                    return Err(FormatError::UnbalancedBraces { ch, pos });
                }
                columns.push(std::mem::replace(&mut current, self.column_header()?));
            } else {
                self.content(pos, ch, &mut current)?;
            }
        }

        if let Some(pos) = self.open_section {
            return Err(FormatError::UnbalancedBraces { ch: '{', pos });
        }
        columns.push(current);
        Ok(columns)
    }
}

/// Compile `template` into its columns. An empty template has none.
pub fn compile(template: &str) -> Result<Vec<Column>, FormatError> {
    Parser::new(template).run()
}
