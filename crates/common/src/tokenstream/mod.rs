// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! A lazily lexed, regex driven token stream.
//!
//! Tokens are produced on demand at the cursor from whatever rules are active at that moment,
//! so parsers can switch lexical rules with [`TokenStream::syntax`] as they descend and the
//! same input can be re-read under different rules after a rollback. The stream also carries
//! an indentation stack for block structured grammars and a side-channel `data` value owned
//! by the grammar built on top of it.

pub mod rules;
mod token;

pub use token::{EOF, INVALID, NEWLINE, Token, TokenPattern, WHITESPACE};

use crate::errors::{ParseResult, SyntaxError};
use crate::location::{SourceLocation, SourceText};
use rules::{RuleSet, match_at};
use std::rc::Rc;
use tracing::trace;

const BLANK: [char; 3] = [' ', '\t', '\r'];

#[derive(Debug, Clone)]
pub struct TokenStream<D> {
    source: Rc<SourceText>,
    pos: usize,
    rules: Rc<RuleSet>,
    ignored: Vec<&'static str>,
    indentation: Vec<usize>,
    current: Option<Token>,
    pub data: D,
}

/// Everything needed to return the stream to an earlier state.
#[derive(Debug, Clone)]
pub struct Checkpoint<D> {
    pos: usize,
    current: Option<Token>,
    indentation: Vec<usize>,
    data: D,
}

/// A cursor position. Unlike a [`Checkpoint`] it leaves `data` alone when restored.
#[derive(Debug, Clone)]
pub struct Mark {
    pos: usize,
    current: Option<Token>,
}

impl<D> TokenStream<D> {
    pub fn new(source: impl Into<String>, data: D) -> Self {
        Self {
            source: Rc::new(SourceText::new(source)),
            pos: 0,
            rules: Rc::new(RuleSet::default()),
            ignored: vec![WHITESPACE],
            indentation: vec![0],
            current: None,
            data,
        }
    }

    pub fn source(&self) -> &Rc<SourceText> {
        &self.source
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The last consumed token.
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// The end of the last consumed token, or the cursor when nothing was consumed yet.
    pub fn location(&self) -> SourceLocation {
        match &self.current {
            Some(token) => token.end_location,
            None => self.source.location(self.pos),
        }
    }

    pub fn location_at(&self, pos: usize) -> SourceLocation {
        self.source.location(pos)
    }

    fn is_ignored(&self, kind: &str) -> bool {
        self.ignored.contains(&kind)
    }

    fn make_token(&self, kind: &'static str, start: usize, end: usize) -> Token {
        Token {
            kind,
            value: self.source.as_str()[start..end].to_string(),
            location: self.source.location(start),
            end_location: self.source.location(end),
        }
    }

    fn lex(&self, mut at: usize) -> Token {
        let text = self.source.as_str();
        loop {
            if at >= text.len() {
                return self.make_token(EOF, text.len(), text.len());
            }
            let rest = &text[at..];

            let newline = if rest.starts_with('\n') {
                Some(1)
            } else if rest.starts_with("\r\n") {
                Some(2)
            } else {
                None
            };
            if let Some(len) = newline {
                if self.is_ignored(NEWLINE) {
                    at += len;
                    continue;
                }
                return self.make_token(NEWLINE, at, at + len);
            }

            let matched = self.rules.iter().find_map(|rule| {
                match_at(&rule.regex, text, at)
                    .filter(|len| *len > 0)
                    .map(|len| (rule.name, len))
            });
            if let Some((name, len)) = matched {
                return self.make_token(name, at, at + len);
            }

            let blank = rest.len() - rest.trim_start_matches(BLANK).len();
            if blank > 0 {
                if self.is_ignored(WHITESPACE) {
                    at += blank;
                    continue;
                }
                return self.make_token(WHITESPACE, at, at + blank);
            }

            // At least one char, even when it is whitespace the blank rule doesn't skip.
            let first = rest.chars().next().map_or(0, char::len_utf8);
            let len = rest[first..]
                .find(char::is_whitespace)
                .map_or(rest.len(), |end| first + end);
            return self.make_token(INVALID, at, at + len);
        }
    }

    /// The next token, without consuming it.
    pub fn peek(&self) -> Token {
        self.lex(self.pos)
    }

    pub fn peek_is(&self, patterns: &[TokenPattern]) -> bool {
        self.peek().matches_any(patterns)
    }

    fn advance(&mut self, token: Token) -> Token {
        self.pos = token.end_location.pos;
        self.current = Some(token.clone());
        token
    }

    /// Consume the next token, whatever it is.
    pub fn next_token(&mut self) -> Token {
        let token = self.peek();
        self.advance(token)
    }

    /// Consume the next token if it matches.
    pub fn get<'a>(&mut self, pattern: impl Into<TokenPattern<'a>>) -> Option<Token> {
        let token = self.peek();
        token.matches(pattern.into()).then(|| self.advance(token))
    }

    /// Consume the next token if it matches any of `patterns`, returning the index of the
    /// first pattern it matched.
    pub fn get_any(&mut self, patterns: &[TokenPattern]) -> Option<(usize, Token)> {
        let token = self.peek();
        let index = patterns.iter().position(|p| token.matches(*p))?;
        Some((index, self.advance(token)))
    }

    pub fn expect<'a>(&mut self, pattern: impl Into<TokenPattern<'a>>) -> ParseResult<Token> {
        let pattern = pattern.into();
        let token = self.peek();
        if token.matches(pattern) {
            return Ok(self.advance(token));
        }
        Err(SyntaxError::unexpected(&token, vec![pattern.to_string()]))
    }

    pub fn expect_any(&mut self, patterns: &[TokenPattern]) -> ParseResult<(usize, Token)> {
        let token = self.peek();
        match patterns.iter().position(|p| token.matches(*p)) {
            Some(index) => Ok((index, self.advance(token))),
            None => Err(SyntaxError::unexpected(
                &token,
                patterns.iter().map(ToString::to_string).collect(),
            )),
        }
    }

    /// Drive a delimited sequence: consume `close` and return true when it is next, fail at
    /// the end of the input, return false otherwise.
    pub fn at_close(&mut self, close: TokenPattern) -> ParseResult<bool> {
        let token = self.peek();
        if token.matches(close) {
            self.advance(token);
            return Ok(true);
        }
        if token.is_eof() {
            return Err(SyntaxError::unexpected(&token, vec![close.to_string()]));
        }
        Ok(false)
    }

    /// Run `f` with additional lexer rules. `None` disables a rule for the duration.
    pub fn syntax<T>(
        &mut self,
        overrides: &[(&'static str, Option<&str>)],
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let rules = Rc::new(self.rules.extend(overrides)?);
        let previous = std::mem::replace(&mut self.rules, rules);
        let result = f(self);
        self.rules = previous;
        result
    }

    /// Run `f` with tokens of `kind` skipped.
    pub fn ignore<T>(
        &mut self,
        kind: &'static str,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let previous = self.ignored.clone();
        if !self.ignored.contains(&kind) {
            self.ignored.push(kind);
        }
        let result = f(self);
        self.ignored = previous;
        result
    }

    /// Run `f` with tokens of `kind` visible again.
    pub fn intercept<T>(
        &mut self,
        kind: &'static str,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let previous = self.ignored.clone();
        self.ignored.retain(|k| *k != kind);
        let result = f(self);
        self.ignored = previous;
        result
    }

    pub fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            current: self.current.clone(),
        }
    }

    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.current = mark.current;
    }

    /// Indentation of the innermost block.
    pub fn indentation_level(&self) -> usize {
        self.indentation.last().copied().unwrap_or(0)
    }

    /// Run `f` inside a block indented at `level`.
    pub fn indented<T>(
        &mut self,
        level: usize,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.indentation.push(level);
        let result = f(self);
        self.indentation.pop();
        result
    }

    /// Move the cursor past blank lines and full-line `#` comments. Must be called at the
    /// start of a line or right before a line break.
    pub fn skip_blank_lines(&mut self) {
        let text = self.source.as_str();
        let mut at = self.pos;
        loop {
            let rest = &text[at..];
            let content = rest.trim_start_matches(BLANK);
            let offset = at + rest.len() - content.len();
            if content.starts_with('\n') {
                at = offset + 1;
            } else if content.starts_with('#') {
                at = offset + content.find('\n').unwrap_or(content.len());
            } else {
                break;
            }
        }
        self.pos = at;
    }

    /// If the current line continues on a following line indented deeper than the current
    /// block, move the cursor to the first token of that line and return true.
    pub fn consume_line_continuation(&mut self) -> bool {
        let text = self.source.as_str();
        let level = self.indentation_level();

        let rest = &text[self.pos..];
        let content = rest.trim_start_matches(BLANK);
        if !content.starts_with('\n') {
            return false;
        }

        let mut at = self.pos + rest.len() - content.len() + 1;
        loop {
            let line = &text[at..];
            let line_content = line.trim_start_matches(BLANK);
            let indent = line.len() - line_content.len();
            if line_content.starts_with('\n') {
                at += indent + 1;
                continue;
            }
            if line_content.starts_with('#') {
                match line_content.find('\n') {
                    Some(end) => {
                        at += indent + end + 1;
                        continue;
                    }
                    None => return false,
                }
            }
            if line_content.is_empty() || indent <= level {
                return false;
            }
            self.pos = at + indent;
            return true;
        }
    }
}

impl<D: Clone> TokenStream<D> {
    pub fn checkpoint(&self) -> Checkpoint<D> {
        Checkpoint {
            pos: self.pos,
            current: self.current.clone(),
            indentation: self.indentation.clone(),
            data: self.data.clone(),
        }
    }

    pub fn rollback(&mut self, checkpoint: Checkpoint<D>) {
        self.pos = checkpoint.pos;
        self.current = checkpoint.current;
        self.indentation = checkpoint.indentation;
        self.data = checkpoint.data;
    }

    /// Run `f`, restoring the stream and discarding the error if it fails.
    pub fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> Option<T> {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.rollback(checkpoint);
                None
            }
        }
    }

    /// Ordered choice. Each option is tried from the same starting state and the first
    /// success wins.
    ///
    /// When every option fails, the error that got furthest into the input is returned with
    /// all other failures, flattened, in its `alternatives`. At the same position a failure
    /// that rejected recognized input beats an unexpected token; otherwise the earliest
    /// option wins.
    pub fn choose<O: Copy, T>(
        &mut self,
        options: &[O],
        mut f: impl FnMut(&mut Self, O) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let checkpoint = self.checkpoint();
        let mut failures: Vec<SyntaxError> = Vec::with_capacity(options.len());

        for (index, option) in options.iter().enumerate() {
            match f(self, *option) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    trace!(alternative = index, error = %e, "alternative failed, rolling back");
                    self.rollback(checkpoint.clone());
                    failures.push(e);
                }
            }
        }

        if failures.is_empty() {
            return Err(SyntaxError::invalid("Nothing to choose from.").at(self.peek().span()));
        }
        let mut best = 0;
        for (index, failure) in failures.iter().enumerate() {
            if failure.outranks(&failures[best]) {
                best = index;
            }
        }

        let mut error = failures.remove(best);
        for mut failure in failures {
            let nested = std::mem::take(&mut failure.alternatives);
            error.alternatives.push(failure);
            error.alternatives.extend(nested);
        }
        Err(error)
    }
}
