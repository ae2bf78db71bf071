//! Keypath tokenizer: compiles a path string into a token program.
//!
//! Compilation is a single left-to-right character scan with explicit
//! state (accumulated word, pending prefix modifiers, an open collection
//! accumulator). Container contents are tokenized recursively. A path with
//! none of the active special characters never reaches the scanner at all:
//! fast detection splits it on the property separator directly, which is
//! also what marks the resulting program as fast-path eligible.

use crate::syntax::{is_digit, Container, ContainerKind, Prefix, Separator, Syntax, ESCAPE, WILDCARD};

use super::error::PathError;
use super::token::{Exec, Mods, Program, Token};

/// Maximum container nesting depth accepted by the scanner.
pub const MAX_DEPTH: usize = 64;

/// Compiles a path string against the given syntax.
pub fn tokenize(syntax: &Syntax, path: &str) -> Result<Program, PathError> {
    if !syntax.needs_scan(path) {
        // Fast detection: a plain split is the whole program, empty
        // segments included, exactly as a full scan would produce them.
        let tokens = path
            .split(syntax.property_separator())
            .map(|seg| Token::Plain(seg.to_string()))
            .collect();
        return Ok(Program::new(tokens));
    }
    let chars: Vec<char> = path.chars().collect();
    Scanner::new(syntax, &chars, 0, 0).run()
}

struct Scanner<'a> {
    syntax: &'a Syntax,
    chars: &'a [char],
    /// Absolute offset of `chars[0]`, for error positions in sub-scans.
    base: usize,
    depth: usize,
    pos: usize,
    word: String,
    mods: Mods,
    tokens: Vec<Token>,
    group: Option<Vec<Token>>,
    /// A container closed immediately before the current position.
    just_closed: bool,
    /// A property separator was the last significant character.
    trailing_sep: bool,
}

impl<'a> Scanner<'a> {
    fn new(syntax: &'a Syntax, chars: &'a [char], base: usize, depth: usize) -> Self {
        Scanner {
            syntax,
            chars,
            base,
            depth,
            pos: 0,
            word: String::new(),
            mods: Mods::default(),
            tokens: Vec::new(),
            group: None,
            just_closed: false,
            trailing_sep: false,
        }
    }

    fn run(mut self) -> Result<Program, PathError> {
        if self.depth > MAX_DEPTH {
            return Err(PathError::TooDeep { limit: MAX_DEPTH });
        }

        while self.pos < self.chars.len() {
            let ch = self.chars[self.pos];

            if ch == ESCAPE {
                match self.chars.get(self.pos + 1) {
                    Some(next) => {
                        self.word.push(*next);
                        self.pos += 2;
                        self.touch();
                    }
                    None => {
                        return Err(PathError::DanglingEscape {
                            position: self.base + self.pos,
                        })
                    }
                }
                continue;
            }

            if ch == WILDCARD {
                self.word.push(ch);
                self.mods.has_wildcard = true;
                self.pos += 1;
                self.touch();
                continue;
            }

            if let Some(prefix) = self.syntax.prefix(ch) {
                self.apply_prefix(prefix, ch)?;
                self.pos += 1;
                self.touch();
                continue;
            }

            if let Some(role) = self.syntax.separator(ch) {
                match role {
                    Separator::Property => {
                        let emit_empty = !self.just_closed;
                        self.flush(emit_empty)?;
                        self.trailing_sep = true;
                    }
                    Separator::Collection => {
                        self.collect()?;
                        self.trailing_sep = false;
                    }
                }
                self.just_closed = false;
                self.pos += 1;
                continue;
            }

            if let Some(container) = self.syntax.container(ch) {
                self.scan_container(ch, container)?;
                continue;
            }

            self.word.push(ch);
            self.pos += 1;
            self.touch();
        }

        // End of input: the trailing word flushes as a separator would.
        if !self.word.is_empty() || self.mods.any() {
            self.flush(false)?;
        } else if self.trailing_sep {
            self.flush(true)?;
        }
        if let Some(group) = self.group.take() {
            self.tokens.push(Token::Group(group));
        }
        Ok(Program::new(self.tokens))
    }

    /// Marks that the current position holds word content, not structure.
    fn touch(&mut self) {
        self.just_closed = false;
        self.trailing_sep = false;
    }

    fn apply_prefix(&mut self, prefix: Prefix, ch: char) -> Result<(), PathError> {
        let position = self.base + self.pos;
        match prefix {
            Prefix::Parent => self.mods.parent += 1,
            Prefix::Root => self.mods.root = true,
            Prefix::Placeholder => {
                if self.mods.placeholder.is_some() || self.mods.context.is_some() {
                    return Err(PathError::RepeatedPrefix { ch, position });
                }
                // index parsed from the word at flush time
                self.mods.placeholder = Some(0);
            }
            Prefix::Context => {
                if self.mods.placeholder.is_some() || self.mods.context.is_some() {
                    return Err(PathError::RepeatedPrefix { ch, position });
                }
                self.mods.context = Some(0);
            }
        }
        Ok(())
    }

    /// Closes the accumulated word into a token.
    ///
    /// With `emit_empty`, an empty word with no pending state still
    /// produces an empty `Plain`, mirroring what a plain split yields for
    /// doubled, leading, or trailing separators.
    fn flush(&mut self, emit_empty: bool) -> Result<(), PathError> {
        let word = std::mem::take(&mut self.word);
        let mut mods = std::mem::take(&mut self.mods);
        let position = self.base + self.pos;

        let token = if mods.any() {
            if word.is_empty() {
                return Err(PathError::OrphanModifier { position });
            }
            if mods.placeholder.is_some() || mods.context.is_some() {
                let index = if !word.is_empty() && word.chars().all(is_digit) {
                    word.parse::<usize>().ok().filter(|i| *i >= 1)
                } else {
                    None
                };
                let index = index.ok_or(PathError::BadArgIndex {
                    text: word.clone(),
                    position,
                })?;
                if mods.placeholder.is_some() {
                    mods.placeholder = Some(index);
                } else {
                    mods.context = Some(index);
                }
            }
            Some(Token::Word { text: word, mods })
        } else if !word.is_empty() || emit_empty {
            Some(Token::Plain(word))
        } else {
            None
        };

        if let Some(token) = token {
            self.push_element(token);
        }
        Ok(())
    }

    /// Appends a finished token to the open group, or the token list.
    fn push_element(&mut self, token: Token) {
        match self.group.as_mut() {
            Some(group) => group.push(token),
            None => self.tokens.push(token),
        }
    }

    /// Handles a collection separator: the current word (or the token a
    /// container just produced) becomes the next element of the group,
    /// opening one if necessary.
    fn collect(&mut self) -> Result<(), PathError> {
        if self.group.is_none() {
            if self.just_closed && self.word.is_empty() && !self.mods.any() {
                // the token the container produced seeds the group
                let seed = self.tokens.pop();
                self.group = Some(seed.into_iter().collect());
                return Ok(());
            }
            self.group = Some(Vec::new());
            return self.flush(true);
        }
        let emit_empty = !self.just_closed;
        self.flush(emit_empty)
    }

    fn scan_container(
        &mut self,
        opener: char,
        container: Container,
    ) -> Result<(), PathError> {
        // the word before the opener is a finished token
        if !self.word.is_empty() || self.mods.any() {
            self.flush(false)?;
        }

        let open_pos = self.pos;
        if container.kind.is_quote() {
            let (content, after) = self.scan_quote(opener, container.close, open_pos)?;
            self.push_element(Token::Plain(content));
            self.just_closed = true;
            self.trailing_sep = false;
            self.pos = after;
            return Ok(());
        }

        let close_pos = self.find_balanced_close(opener, container.close, open_pos)?;
        let inner = &self.chars[open_pos + 1..close_pos];
        let sub = if inner.is_empty() {
            Program::empty()
        } else {
            Scanner::new(self.syntax, inner, self.base + open_pos + 1, self.depth + 1).run()?
        };

        match container.kind {
            ContainerKind::Property => {
                let next_is_collection = self
                    .chars
                    .get(close_pos + 1)
                    .map_or(false, |c| self.syntax.separator(*c) == Some(Separator::Collection));
                if self.group.is_some() || next_is_collection {
                    self.push_element(Token::Sub {
                        program: sub,
                        exec: Exec::Property,
                    });
                } else {
                    // syntactic sugar for the property separator
                    self.tokens.extend(sub.tokens);
                }
            }
            ContainerKind::Call => {
                self.push_element(Token::Sub {
                    program: sub,
                    exec: Exec::Call,
                });
            }
            ContainerKind::EvalProperty => {
                self.push_element(Token::Sub {
                    program: sub,
                    exec: Exec::EvalProperty,
                });
            }
            ContainerKind::SingleQuote | ContainerKind::DoubleQuote => unreachable!("quotes scanned above"),
        }
        self.just_closed = true;
        self.trailing_sep = false;
        self.pos = close_pos + 1;
        Ok(())
    }

    /// Scans a quote container: contents are literal, escapes are
    /// stripped, and same-type openers never nest.
    fn scan_quote(
        &self,
        opener: char,
        close: char,
        open_pos: usize,
    ) -> Result<(String, usize), PathError> {
        let mut content = String::new();
        let mut j = open_pos + 1;
        while j < self.chars.len() {
            let ch = self.chars[j];
            if ch == ESCAPE {
                match self.chars.get(j + 1) {
                    Some(next) => {
                        content.push(*next);
                        j += 2;
                    }
                    None => {
                        return Err(PathError::DanglingEscape {
                            position: self.base + j,
                        })
                    }
                }
                continue;
            }
            if ch == close {
                return Ok((content, j + 1));
            }
            content.push(ch);
            j += 1;
        }
        Err(PathError::UnmatchedContainer {
            opener,
            position: self.base + open_pos,
        })
    }

    /// Finds the closing character balancing the opener at `open_pos`,
    /// honoring escapes and same-type nesting.
    fn find_balanced_close(
        &self,
        opener: char,
        close: char,
        open_pos: usize,
    ) -> Result<usize, PathError> {
        let mut depth = 1usize;
        let mut j = open_pos + 1;
        while j < self.chars.len() {
            let ch = self.chars[j];
            if ch == ESCAPE {
                j += 2;
                continue;
            }
            if ch == opener {
                depth += 1;
            } else if ch == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(j);
                }
            }
            j += 1;
        }
        Err(PathError::UnmatchedContainer {
            opener,
            position: self.base + open_pos,
        })
    }
}
