/// A byte cursor for the small hand-written grammars (tags, directive
/// headers, text directives).
///
/// All delimiters it is asked about are ASCII, so every position it stops at
/// is a char boundary of the underlying `&str`.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being parsed.
    pub s: &'a str,
    /// Current index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes()[self.i..].starts_with(pat)
    }

    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    pub fn bump_n(&mut self, n: usize) {
        self.i = (self.i + n).min(self.s.len());
    }

    /// Everything not yet consumed.
    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    pub fn slice(&self, start: usize) -> &'a str {
        &self.s[start..self.i]
    }

    /// Consume bytes while `pred` holds and return them.
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.i;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.i += 1;
        }
        self.slice(start)
    }

    pub fn skip_whitespace(&mut self) {
        self.eat_while(|b| b.is_ascii_whitespace());
    }

    /// Consume an identifier: an ASCII letter followed by bytes `rest` accepts.
    pub fn eat_name(&mut self, rest: impl Fn(u8) -> bool) -> Option<&'a str> {
        if !self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        let start = self.i;
        self.i += 1;
        self.eat_while(rest);
        Some(self.slice(start))
    }

    /// Consume a quoted string starting at the current quote byte and return
    /// its inner text. Returns `None` (cursor restored) if it never closes.
    pub fn eat_quoted(&mut self) -> Option<&'a str> {
        let quote = self.peek().filter(|b| *b == b'"' || *b == b'\'')?;
        let saved = self.i;
        self.i += 1;
        let inner_start = self.i;
        while let Some(b) = self.peek() {
            if b == quote {
                let inner = self.slice(inner_start);
                self.i += 1;
                return Some(inner);
            }
            self.i += 1;
        }
        self.i = saved;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello");
        assert_eq!(cur.pos(), 0);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some(b'h'));
        assert_eq!(cur.bump(), Some(b'h'));
        assert_eq!(cur.pos(), 1);
        assert_eq!(cur.rest(), "ello");
    }

    #[test]
    fn eat_name_requires_leading_letter() {
        let mut cur = Cursor::new("1abc");
        assert_eq!(cur.eat_name(|b| b.is_ascii_alphanumeric()), None);
        assert_eq!(cur.pos(), 0);

        let mut cur = Cursor::new("Tab value");
        assert_eq!(cur.eat_name(|b| b.is_ascii_alphanumeric()), Some("Tab"));
        assert_eq!(cur.rest(), " value");
    }

    #[test]
    fn eat_quoted_handles_both_quotes() {
        let mut cur = Cursor::new(r#""iOS" rest"#);
        assert_eq!(cur.eat_quoted(), Some("iOS"));
        assert_eq!(cur.rest(), " rest");

        let mut cur = Cursor::new("'a\"b'");
        assert_eq!(cur.eat_quoted(), Some("a\"b"));
    }

    #[test]
    fn unclosed_quote_restores_position() {
        let mut cur = Cursor::new("\"never closed");
        assert_eq!(cur.eat_quoted(), None);
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("");
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.pos(), 0);
    }
}
