//! Quake-style `^N` color codes embedded in player and server names.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const COLOR_MARKER: char = '^';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameColor {
    /// Whatever the surrounding text uses.
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
    Magenta,
    White,
}

pub static COLOR_CODES: Lazy<HashMap<char, NameColor>> = Lazy::new(|| {
    HashMap::from([
        ('0', NameColor::Black),
        ('1', NameColor::Red),
        ('2', NameColor::Green),
        ('3', NameColor::Yellow),
        ('4', NameColor::Blue),
        ('5', NameColor::Cyan),
        ('6', NameColor::Magenta),
        ('7', NameColor::White),
    ])
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSegment {
    pub text: String,
    pub color: NameColor,
}

/// Splits `name` into colored runs. A marker followed by an unknown character
/// is kept as literal text; empty runs are dropped.
pub fn decode(name: &str) -> Vec<NameSegment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut color = NameColor::Default;
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        let code = match chars.peek() {
            Some(next) if c == COLOR_MARKER => COLOR_CODES.get(next).copied(),
            _ => None,
        };

        let Some(next_color) = code else {
            current.push(c);
            continue;
        };

        chars.next();
        if !current.is_empty() {
            segments.push(NameSegment { text: std::mem::take(&mut current), color });
        }
        color = next_color;
    }

    if !current.is_empty() {
        segments.push(NameSegment { text: current, color });
    }
    segments
}
