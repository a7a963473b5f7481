// Markup tokenizer: a reduced, character-driven state machine in the
// shape of the WHATWG tokenization algorithm. Roughly twenty states;
// no character references, no RCDATA/RAWTEXT, no script data. Malformed
// input is absorbed, never rejected.
//
// Tokens come out of a pull iterator: finite, forward-only, not
// restartable. There is no EOF token; at end of input the iterator
// returns `None` and an unterminated tag in progress is dropped.

use std::collections::VecDeque;

use super::scanner::{is_alpha_char, is_space_char, Scanner};

/// Debug logging for tokenizer operations
const DEBUG_TOKENIZER: bool = false;

fn tokenizer_log(msg: &str) {
    if DEBUG_TOKENIZER {
        eprintln!("[TOKENIZER] {}", msg);
    }
}

/// A start or end tag. `attributes` is an ordered list of
/// (lower-cased name, raw value) pairs; duplicates are permitted here
/// and resolved by the tree builder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagToken {
    pub name: String,
    pub closing: bool,
    pub attributes: Vec<(String, String)>,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// One input character, emitted verbatim (no entity decoding).
    Character(char),
    Tag(TagToken),
    /// Lower-cased doctype name; carries no further semantics.
    Doctype { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum State {
    Data,
    TagOpen,
    EndTagOpen,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
    BogusComment,
    MarkupDeclarationOpen,
    Comment,
    Doctype,
    BeforeDoctypeName,
    DoctypeName,
    AfterDoctypeName,
}

pub struct Tokenizer {
    scanner: Scanner<State>,
    queue: VecDeque<Token>,
    tag: TagToken,
    doctype_name: String,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            scanner: Scanner::new(input, State::Data),
            queue: VecDeque::new(),
            tag: TagToken::default(),
            doctype_name: String::new(),
        }
    }

    /// Materialize the remaining tokens. Convenience for tests and
    /// debugging; the tree builder pulls lazily.
    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }

    fn emit_char(&mut self, ch: char) {
        self.queue.push_back(Token::Character(ch));
    }

    fn emit_tag(&mut self) {
        let tag = std::mem::take(&mut self.tag);
        tokenizer_log(&format!("Emit tag: {:?}", tag));
        self.queue.push_back(Token::Tag(tag));
    }

    fn emit_doctype(&mut self) {
        let name = std::mem::take(&mut self.doctype_name);
        tokenizer_log(&format!("Emit doctype: {:?}", name));
        self.queue.push_back(Token::Doctype { name });
    }

    fn new_tag(&mut self, closing: bool) {
        self.tag = TagToken {
            closing,
            ..TagToken::default()
        };
    }

    fn start_attribute(&mut self) {
        self.tag.attributes.push((String::new(), String::new()));
    }

    fn append_attribute_name(&mut self, ch: char) {
        if let Some((name, _)) = self.tag.attributes.last_mut() {
            name.push(ch.to_ascii_lowercase());
        }
    }

    fn append_attribute_value(&mut self, ch: char) {
        if let Some((_, value)) = self.tag.attributes.last_mut() {
            value.push(ch);
        }
    }

    fn set_state(&mut self, state: State) {
        tokenizer_log(&format!(
            "State transition: {:?} -> {:?}",
            self.scanner.state, state
        ));
        self.scanner.set_state(state);
    }

    /// Run the handler for the current state. Handlers consume input
    /// until they emit, switch state, or hit end of input.
    fn step(&mut self) {
        match self.scanner.state {
            State::Data => self.data_state(),
            State::TagOpen => self.tag_open_state(),
            State::EndTagOpen => self.end_tag_open_state(),
            State::TagName => self.tag_name_state(),
            State::BeforeAttributeName => self.before_attribute_name_state(),
            State::AttributeName => self.attribute_name_state(),
            State::AfterAttributeName => self.after_attribute_name_state(),
            State::BeforeAttributeValue => self.before_attribute_value_state(),
            State::AttributeValueDoubleQuoted => self.attribute_value_quoted_state('"'),
            State::AttributeValueSingleQuoted => self.attribute_value_quoted_state('\''),
            State::AttributeValueUnquoted => self.attribute_value_unquoted_state(),
            State::AfterAttributeValueQuoted => self.after_attribute_value_quoted_state(),
            State::SelfClosingStartTag => self.self_closing_start_tag_state(),
            State::BogusComment => self.bogus_comment_state(),
            State::MarkupDeclarationOpen => self.markup_declaration_open_state(),
            State::Comment => self.comment_state(),
            State::Doctype => self.doctype_state(),
            State::BeforeDoctypeName => self.before_doctype_name_state(),
            State::DoctypeName => self.doctype_name_state(),
            State::AfterDoctypeName => self.after_doctype_name_state(),
        }
    }

    fn data_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if ch == '<' {
                self.set_state(State::TagOpen);
                break;
            }
            self.emit_char(ch);
        }
    }

    fn tag_open_state(&mut self) {
        let Some(ch) = self.scanner.consume() else {
            return;
        };
        if ch == '!' {
            self.set_state(State::MarkupDeclarationOpen);
        } else if ch == '/' {
            self.set_state(State::EndTagOpen);
        } else if is_alpha_char(ch) {
            self.scanner.reconsume();
            self.new_tag(false);
            self.set_state(State::TagName);
        } else {
            // Stray `<`: no token for it, the offending character is
            // re-processed as data.
            self.scanner.reconsume();
            self.set_state(State::Data);
        }
    }

    fn end_tag_open_state(&mut self) {
        let Some(ch) = self.scanner.consume() else {
            return;
        };
        if is_alpha_char(ch) {
            self.scanner.reconsume();
            self.new_tag(true);
            self.set_state(State::TagName);
        } else {
            self.scanner.reconsume();
            self.set_state(State::BogusComment);
        }
    }

    fn tag_name_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if is_space_char(ch) {
                self.set_state(State::BeforeAttributeName);
                break;
            } else if ch == '/' {
                self.tag.self_closing = true;
                self.set_state(State::SelfClosingStartTag);
                break;
            } else if ch == '>' {
                self.emit_tag();
                self.set_state(State::Data);
                break;
            } else {
                self.tag.name.push(ch.to_ascii_lowercase());
            }
        }
    }

    fn before_attribute_name_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if is_space_char(ch) {
                continue;
            } else if ch == '/' || ch == '>' {
                self.scanner.reconsume();
                self.set_state(State::AfterAttributeName);
                break;
            } else if ch == '=' {
                // No attribute has been started yet; ignored.
            } else {
                self.start_attribute();
                self.scanner.reconsume();
                self.set_state(State::AttributeName);
                break;
            }
        }
    }

    fn attribute_name_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if is_space_char(ch) || ch == '/' || ch == '>' {
                self.scanner.reconsume();
                self.set_state(State::AfterAttributeName);
                break;
            } else if ch == '=' {
                self.set_state(State::BeforeAttributeValue);
                break;
            } else {
                self.append_attribute_name(ch);
            }
        }
    }

    fn after_attribute_name_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if is_space_char(ch) {
                continue;
            } else if ch == '/' {
                self.set_state(State::SelfClosingStartTag);
                break;
            } else if ch == '=' {
                self.set_state(State::BeforeAttributeValue);
                break;
            } else if ch == '>' {
                self.emit_tag();
                self.set_state(State::Data);
                break;
            } else {
                self.start_attribute();
                self.scanner.reconsume();
                self.set_state(State::AttributeName);
                break;
            }
        }
    }

    fn before_attribute_value_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if is_space_char(ch) {
                continue;
            }
            self.scanner.reconsume();
            break;
        }
        let Some(ch) = self.scanner.consume() else {
            return;
        };
        if ch == '"' {
            self.set_state(State::AttributeValueDoubleQuoted);
        } else if ch == '\'' {
            self.set_state(State::AttributeValueSingleQuoted);
        } else if ch == '>' {
            self.emit_tag();
            self.set_state(State::Data);
        } else {
            self.scanner.reconsume();
            self.set_state(State::AttributeValueUnquoted);
        }
    }

    fn attribute_value_quoted_state(&mut self, quote: char) {
        while let Some(ch) = self.scanner.consume() {
            if ch == quote {
                self.set_state(State::AfterAttributeValueQuoted);
                break;
            }
            self.append_attribute_value(ch);
        }
    }

    fn attribute_value_unquoted_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if is_space_char(ch) {
                self.set_state(State::BeforeAttributeName);
                break;
            } else if ch == '>' {
                self.emit_tag();
                self.set_state(State::Data);
                break;
            } else {
                self.append_attribute_value(ch);
            }
        }
    }

    fn after_attribute_value_quoted_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if is_space_char(ch) {
                self.set_state(State::BeforeAttributeName);
                break;
            } else if ch == '/' {
                self.set_state(State::SelfClosingStartTag);
                break;
            } else if ch == '>' {
                self.emit_tag();
                self.set_state(State::Data);
                break;
            } else {
                self.scanner.reconsume();
                self.set_state(State::BeforeAttributeName);
                break;
            }
        }
    }

    fn self_closing_start_tag_state(&mut self) {
        let Some(ch) = self.scanner.consume() else {
            return;
        };
        if ch == '>' {
            // The tag is marked self-closing but never emitted; the
            // whole `<foo/>` sequence produces no token.
            self.tag.self_closing = true;
            self.set_state(State::Data);
        } else {
            // Deliberate quirk: anything else derails into the doctype
            // name states, and the pending tag is lost. See DESIGN.md.
            self.scanner.reconsume();
            self.set_state(State::BeforeDoctypeName);
        }
    }

    fn bogus_comment_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if ch == '>' {
                self.set_state(State::Data);
                break;
            }
        }
    }

    fn markup_declaration_open_state(&mut self) {
        if self.scanner.peek(7).eq_ignore_ascii_case("doctype") {
            Scanner::skip(&mut self.scanner, 7);
            self.set_state(State::Doctype);
        } else if self.scanner.peek(2) == "--" {
            Scanner::skip(&mut self.scanner, 2);
            self.set_state(State::Comment);
        } else {
            // Unrecognized declaration: swallow it as a bogus comment
            // so the machine always makes progress. See DESIGN.md.
            tokenizer_log("unrecognized markup declaration");
            self.set_state(State::BogusComment);
        }
    }

    fn comment_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if ch == '-' && self.scanner.peek(2) == "->" {
                Scanner::skip(&mut self.scanner, 2);
                self.set_state(State::Data);
                break;
            }
        }
    }

    fn doctype_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if is_space_char(ch) {
                self.set_state(State::BeforeDoctypeName);
            } else {
                self.scanner.reconsume();
                self.set_state(State::BeforeDoctypeName);
            }
            break;
        }
    }

    fn before_doctype_name_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if is_space_char(ch) {
                continue;
            }
            self.scanner.reconsume();
            self.doctype_name.clear();
            self.set_state(State::DoctypeName);
            break;
        }
    }

    fn doctype_name_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if is_space_char(ch) {
                self.set_state(State::AfterDoctypeName);
                break;
            } else if ch == '>' {
                self.emit_doctype();
                self.set_state(State::Data);
                break;
            } else {
                self.doctype_name.push(ch.to_ascii_lowercase());
            }
        }
    }

    fn after_doctype_name_state(&mut self) {
        while let Some(ch) = self.scanner.consume() {
            if is_space_char(ch) {
                continue;
            } else if ch == '>' {
                self.set_state(State::Data);
                self.emit_doctype();
                break;
            }
            // Anything else between the name and `>` is dropped.
        }
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(token);
            }
            if self.scanner.eof() {
                return None;
            }
            self.step();
        }
    }
}
