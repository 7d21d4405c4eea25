use thiserror::Error;

/// Errors produced while compiling a display format.
///
/// Positions are 0-based character offsets into the template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("display format must start with a column definition '[', found '{ch}' at position {pos}")]
    MissingColumn { ch: char, pos: usize },

    #[error("unexpected character '{ch}' at position {pos}, expected {expected}")]
    Unexpected {
        ch: char,
        pos: usize,
        expected: &'static str,
    },

    #[error("unexpected end of display format, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("number starting with '{ch}' at position {pos} is too large")]
    NumberTooLarge { ch: char, pos: usize },

    #[error("unknown variable '{ch}' at position {pos}")]
    UnknownVariable { ch: char, pos: usize },

    #[error("unknown color '{ch}' at position {pos}, expected a digit from 1 to 8")]
    UnknownColor { ch: char, pos: usize },

    #[error("Sections can't be nested. ('{{' at position {pos})")]
    NestedSection { pos: usize },

    #[error("Unbalanced braces. ('{ch}' at position {pos})")]
    UnbalancedBraces { ch: char, pos: usize },

    #[error("'|' at position {pos} must stand between two sections, as in {{...}}|{{...}}")]
    MisplacedOr { pos: usize },

    #[error("non-printable character {code:#06x} at position {pos}")]
    NonPrintable { code: u32, pos: usize },
}

impl FormatError {
    /// Offset of the offending character, when the error points at one.
    pub fn position(&self) -> Option<usize> {
        match *self {
            FormatError::MissingColumn { pos, .. }
            | FormatError::Unexpected { pos, .. }
            | FormatError::NumberTooLarge { pos, .. }
            | FormatError::UnknownVariable { pos, .. }
            | FormatError::UnknownColor { pos, .. }
            | FormatError::NestedSection { pos }
            | FormatError::UnbalancedBraces { pos, .. }
            | FormatError::MisplacedOr { pos }
            | FormatError::NonPrintable { pos, .. } => Some(pos),
            FormatError::UnexpectedEnd { .. } => None,
        }
    }
}

/// Errors produced while fitting columns into the available width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Terminal too small!")]
    TerminalTooSmall { needed: i64, available: i64 },
}
