// Character cursor shared by the tokenizer states.
//
// The scanner owns the raw input, the current machine state, and a
// pushdown of return states for sub-flows that need to resume their
// caller. State handlers drive it with consume/peek/reconsume/skip and
// may bail out of a consume loop mid-stream to switch state.

/// Whitespace per the tokenizer's character classes: space, newline,
/// tab, form feed.
pub fn is_space_char(ch: char) -> bool {
    matches!(ch, ' ' | '\n' | '\t' | '\x0C')
}

pub fn is_alpha_char(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

pub struct Scanner<S> {
    input: Vec<char>,
    index: usize,
    pub state: S,
    return_states: Vec<S>,
}

impl<S: Copy> Scanner<S> {
    pub fn new(input: &str, state: S) -> Self {
        Self {
            input: input.chars().collect(),
            index: 0,
            state,
            return_states: Vec::new(),
        }
    }

    /// Return the current character and advance. Callers check `eof()`
    /// (or match on the `Option`) rather than relying on a sentinel.
    pub fn consume(&mut self) -> Option<char> {
        let ch = self.input.get(self.index).copied();
        if ch.is_some() {
            self.index += 1;
        }
        ch
    }

    /// The next `n` characters without advancing, truncated at end of
    /// input.
    pub fn peek(&self, n: usize) -> String {
        let end = (self.index + n).min(self.input.len());
        self.input[self.index..end].iter().collect()
    }

    pub fn skip(&mut self, n: usize) {
        self.index += n;
    }

    /// Step back one character so it is re-processed under a new state.
    /// Never called twice without an intervening `consume()`.
    pub fn reconsume(&mut self) {
        self.index -= 1;
    }

    pub fn eof(&self) -> bool {
        self.index >= self.input.len()
    }

    pub fn set_state(&mut self, state: S) {
        self.state = state;
    }

    pub fn set_state_with_return(&mut self, state: S, return_state: S) {
        self.return_states.push(return_state);
        self.state = state;
    }

    pub fn pop_return_state(&mut self) {
        if let Some(state) = self.return_states.pop() {
            self.state = state;
        }
    }
}

/// Iterating the scanner yields consumed characters until end of input.
impl<S: Copy> Iterator for Scanner<S> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.consume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_advances_until_eof() {
        let mut s = Scanner::new("ab", ());
        assert_eq!(s.consume(), Some('a'));
        assert_eq!(s.consume(), Some('b'));
        assert!(s.eof());
        assert_eq!(s.consume(), None);
    }

    #[test]
    fn peek_does_not_advance_and_truncates() {
        let mut s = Scanner::new("abc", ());
        assert_eq!(s.peek(2), "ab");
        assert_eq!(s.peek(10), "abc");
        assert_eq!(s.consume(), Some('a'));
        assert_eq!(s.peek(10), "bc");
    }

    #[test]
    fn reconsume_steps_back_one() {
        let mut s = Scanner::new("xy", ());
        assert_eq!(s.consume(), Some('x'));
        s.reconsume();
        assert_eq!(s.consume(), Some('x'));
    }

    #[test]
    fn skip_advances_without_inspection() {
        let mut s = Scanner::new("abcd", ());
        Scanner::skip(&mut s, 3);
        assert_eq!(s.consume(), Some('d'));
    }

    #[test]
    fn return_state_pushdown() {
        let mut s = Scanner::new("", 0u8);
        s.set_state_with_return(1, 0);
        assert_eq!(s.state, 1);
        s.pop_return_state();
        assert_eq!(s.state, 0);
    }

    #[test]
    fn space_class_includes_form_feed() {
        assert!(is_space_char(' '));
        assert!(is_space_char('\n'));
        assert!(is_space_char('\t'));
        assert!(is_space_char('\x0C'));
        assert!(!is_space_char('a'));
    }
}
