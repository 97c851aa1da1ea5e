// Character cursor over one list entry: C-style numbers, button tokens

use crate::protocol::names::button_code;

#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.rest().is_empty()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    pub fn at_digit(&self) -> bool {
        self.peek().is_some_and(|c| c.is_ascii_digit())
    }

    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn eat_ignore_case(&mut self, word: &str) -> bool {
        let rest = self.rest();
        if rest.len() >= word.len()
            && rest.is_char_boundary(word.len())
            && rest[..word.len()].eq_ignore_ascii_case(word)
        {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    /// Unsigned C-style integer: `0x` hex, leading `0` octal, else decimal.
    pub fn unsigned(&mut self) -> Option<u32> {
        let rest = self.rest().as_bytes();
        if !rest.first().is_some_and(u8::is_ascii_digit) {
            return None;
        }
        let (radix, skip) = if rest.len() > 2
            && rest[0] == b'0'
            && (rest[1] == b'x' || rest[1] == b'X')
            && rest[2].is_ascii_hexdigit()
        {
            (16, 2)
        } else if rest[0] == b'0' {
            (8, 0)
        } else {
            (10, 0)
        };
        let digits = rest[skip..]
            .iter()
            .take_while(|b| (**b as char).is_digit(radix))
            .count();
        let text = &self.rest()[skip..skip + digits];
        let value = u32::from_str_radix(text, radix).ok()?;
        self.pos += skip + digits;
        Some(value)
    }

    /// Optionally signed C-style integer that must fit an `i32`.
    pub fn integer(&mut self) -> Option<i32> {
        let start = *self;
        let negative = self.eat('-');
        let value = self.unsigned().and_then(|magnitude| {
            let magnitude = i64::from(magnitude);
            i32::try_from(if negative { -magnitude } else { magnitude }).ok()
        });
        if value.is_none() {
            *self = start;
        }
        value
    }

    /// A button given as a number or as a symbolic name; leaves the cursor alone on failure.
    pub fn button(&mut self) -> Option<u32> {
        if self.at_digit() {
            return self.unsigned();
        }
        let word_len = self
            .rest()
            .bytes()
            .take_while(u8::is_ascii_alphanumeric)
            .count();
        let code = button_code(&self.rest()[..word_len])?;
        self.pos += word_len;
        Some(u32::from(code))
    }
}
