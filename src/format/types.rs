//! Compiled display format types.
//!
//! A compiled format is a list of [`Column`]s, each with its own alignment,
//! sizing rule and token sequence.

use super::variable::Variable;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub(crate) fn from_key(key: char) -> Option<Self> {
        match key {
            'l' => Some(Self::Left),
            'c' => Some(Self::Center),
            'r' => Some(Self::Right),
            _ => None,
        }
    }
}

/// Fixed eight-color palette addressed by `%1c` .. `%8c`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// Map a 1-based palette digit to its color.
    pub(crate) fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Self::Black),
            '2' => Some(Self::Red),
            '3' => Some(Self::Green),
            '4' => Some(Self::Yellow),
            '5' => Some(Self::Blue),
            '6' => Some(Self::Magenta),
            '7' => Some(Self::Cyan),
            '8' => Some(Self::White),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A single literal code point.
    Char(char),
    Variable(Variable),
    Color(Color),
    SectionOpen,
    SectionClose,
    /// The `|` between two alternative sections.
    SectionOr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub alignment: Alignment,
    /// Declared width; only meaningful for fixed columns.
    pub size: usize,
    /// Proportional weight; 0 marks a fixed-size column.
    pub factor: usize,
    /// Effective width, written by [`layout`](super::layout()).
    pub width: usize,
    pub tokens: Vec<Token>,
}

impl Column {
    pub(crate) fn new(alignment: Alignment, factor: usize, size: usize) -> Self {
        Self {
            alignment,
            size,
            factor,
            width: size,
            tokens: Vec::new(),
        }
    }

    pub fn is_proportional(&self) -> bool {
        self.factor > 0
    }
}
