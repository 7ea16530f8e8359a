//! ABOUTME: Syntax highlighter for the REPL — colors a line by lexing it with
//! the real `Lexer` and mapping each token kind to an ANSI color

use crate::lexer::Lexer;
use crate::token::TokenKind;
use rustyline::completion::Completer;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;
use std::borrow::Cow;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_KEYWORD: &str = "\x1b[1;35m";
const COLOR_PUNCTUATION: &str = "\x1b[1;34m";
const COLOR_NUMBER: &str = "\x1b[33m";
const COLOR_STRING: &str = "\x1b[32m";
const COLOR_BOOLEAN: &str = "\x1b[33m";
const COLOR_IDENTIFIER: &str = "\x1b[36m";

/// REPL line helper. `color` is false when the user passed `--no-color`;
/// in that case `highlight` is the identity function.
pub struct WispHelper {
    pub color: bool,
}

impl WispHelper {
    pub fn new(color: bool) -> Self {
        WispHelper { color }
    }
}

impl Helper for WispHelper {}

impl Completer for WispHelper {
    type Candidate = String;
}

impl Hinter for WispHelper {
    type Hint = String;
}

impl Validator for WispHelper {}

impl Highlighter for WispHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !self.color {
            return Cow::Borrowed(line);
        }

        let highlighted = highlight_line(line);
        if highlighted == line {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(highlighted)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        self.color
    }
}

fn highlight_line(line: &str) -> String {
    let mut lexer = Lexer::new(line);
    let mut out = String::new();

    loop {
        let token = lexer.next_token();
        if token.kind == TokenKind::Eof {
            break;
        }

        let color = match token.kind {
            TokenKind::Function
            | TokenKind::Let
            | TokenKind::If
            | TokenKind::Else
            | TokenKind::Return
            | TokenKind::Macro => Some(COLOR_KEYWORD),
            TokenKind::True | TokenKind::False => Some(COLOR_BOOLEAN),
            TokenKind::Int => Some(COLOR_NUMBER),
            TokenKind::String => Some(COLOR_STRING),
            TokenKind::Identifier => Some(COLOR_IDENTIFIER),
            TokenKind::Illegal => None,
            _ => Some(COLOR_PUNCTUATION),
        };

        match color {
            Some(code) => {
                out.push_str(code);
                if token.kind == TokenKind::String {
                    out.push('"');
                    out.push_str(&token.literal);
                    out.push('"');
                } else {
                    out.push_str(&token.literal);
                }
                out.push_str(COLOR_RESET);
            }
            None => out.push_str(&token.literal),
        }
        out.push(' ');
    }

    if !out.is_empty() {
        out.pop();
    }
    out
}
