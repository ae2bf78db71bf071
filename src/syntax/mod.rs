//! Syntax configuration for the keypath grammar.
//!
//! A [`Syntax`] assigns grammar roles to single characters: prefixes
//! (parent, root, placeholder, context), separators (property, collection),
//! and containers (property, quotes, call, eval-property). No character may
//! hold two roles at once, and the wildcard and escape characters are
//! reserved and never assignable.
//!
//! The active configuration also owns a derived set of special characters
//! used by the tokenizer's fast detection, by `escape`, and by the reverse
//! locator's key quoting. The set is regenerated on every mutation.
//!
//! # Example
//!
//! ```
//! use keyquill::syntax::{Syntax, Separator};
//!
//! let mut syntax = Syntax::default();
//! assert_eq!(syntax.property_separator(), '.');
//!
//! // Switch to slash-separated paths
//! syntax.set_separator(Separator::Property, '/').unwrap();
//! assert_eq!(syntax.property_separator(), '/');
//! ```

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

/// The reserved wildcard character.
pub const WILDCARD: char = '*';

/// The reserved escape character.
pub const ESCAPE: char = '\\';

/// Prefix roles: modifiers attached to the token being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    /// Back-reference to an earlier context (`<`), may repeat
    Parent,
    /// Back-reference to the first context (`~`)
    Root,
    /// Substitute an extra argument's string form (`%1`)
    Placeholder,
    /// Use an extra argument directly as the token's result (`@1`)
    Context,
}

/// Separator roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// Closes the current word into a token (`.`)
    Property,
    /// Appends the current word to a collection (`,`)
    Collection,
}

/// Container roles: what the delimited sub-path is consumed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Sugar for the property separator (`[a.b]`)
    Property,
    /// Literal property name, never tokenized (`'a.b'`)
    SingleQuote,
    /// Literal property name, never tokenized (`"a.b"`)
    DoubleQuote,
    /// Invoke the current context as a function (`(args)`)
    Call,
    /// Resolve the contents to compute a property name (`{sub.path}`)
    EvalProperty,
}

impl ContainerKind {
    /// Quote containers take their contents literally and never nest.
    pub fn is_quote(&self) -> bool {
        matches!(self, ContainerKind::SingleQuote | ContainerKind::DoubleQuote)
    }
}

/// A container binding: its role and closing character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container {
    pub kind: ContainerKind,
    pub close: char,
}

/// Errors raised by syntax configuration setters.
///
/// These are programmer errors discovered at setup time, so unlike data
/// resolution failures they are surfaced as `Err` immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// The character is reserved (wildcard or escape).
    Reserved { ch: char },
    /// The character is already bound to a different role.
    Conflict { ch: char, bound_to: &'static str },
    /// A non-quote container was given identical open and close characters.
    DegenerateContainer { ch: char },
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::Reserved { ch } => {
                write!(f, "character '{}' is reserved and cannot be assigned", ch)
            }
            SyntaxError::Conflict { ch, bound_to } => {
                write!(f, "character '{}' is already bound to {}", ch, bound_to)
            }
            SyntaxError::DegenerateContainer { ch } => write!(
                f,
                "container open and close characters must differ, got '{}' for both",
                ch
            ),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// A partial syntax override, applied on top of the current configuration.
///
/// Every field is optional; container fields carry `(open, close)` pairs.
/// Deserializable so the binary's TOML config can carry overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyntaxPatch {
    pub parent: Option<char>,
    pub root: Option<char>,
    pub placeholder: Option<char>,
    pub context: Option<char>,
    pub property_separator: Option<char>,
    pub collection_separator: Option<char>,
    pub property_container: Option<(char, char)>,
    pub singlequote_container: Option<(char, char)>,
    pub doublequote_container: Option<(char, char)>,
    pub call_container: Option<(char, char)>,
    pub eval_container: Option<(char, char)>,
}

/// The active grammar: three disjoint character-to-role maps plus the
/// derived special-character set.
#[derive(Debug, Clone, PartialEq)]
pub struct Syntax {
    prefixes: IndexMap<char, Prefix>,
    separators: IndexMap<char, Separator>,
    containers: IndexMap<char, Container>,
    /// Derived: every character whose presence forces a full tokenizer
    /// scan. Excludes the property separator.
    special: HashSet<char>,
}

impl Default for Syntax {
    fn default() -> Self {
        let mut prefixes = IndexMap::new();
        prefixes.insert('<', Prefix::Parent);
        prefixes.insert('~', Prefix::Root);
        prefixes.insert('%', Prefix::Placeholder);
        prefixes.insert('@', Prefix::Context);

        let mut separators = IndexMap::new();
        separators.insert('.', Separator::Property);
        separators.insert(',', Separator::Collection);

        let mut containers = IndexMap::new();
        containers.insert(
            '[',
            Container {
                kind: ContainerKind::Property,
                close: ']',
            },
        );
        containers.insert(
            '\'',
            Container {
                kind: ContainerKind::SingleQuote,
                close: '\'',
            },
        );
        containers.insert(
            '"',
            Container {
                kind: ContainerKind::DoubleQuote,
                close: '"',
            },
        );
        containers.insert(
            '(',
            Container {
                kind: ContainerKind::Call,
                close: ')',
            },
        );
        containers.insert(
            '{',
            Container {
                kind: ContainerKind::EvalProperty,
                close: '}',
            },
        );

        let mut syntax = Syntax {
            prefixes,
            separators,
            containers,
            special: HashSet::new(),
        };
        syntax.regenerate();
        syntax
    }
}

impl Syntax {
    /// The reduced dot-paths-only grammar: a property separator and
    /// nothing else. Every path is a plain split under this preset.
    pub fn simple(separator: char) -> Self {
        let mut separators = IndexMap::new();
        separators.insert(separator, Separator::Property);
        let mut syntax = Syntax {
            prefixes: IndexMap::new(),
            separators,
            containers: IndexMap::new(),
            special: HashSet::new(),
        };
        syntax.regenerate();
        syntax
    }

    /// Returns the prefix role bound to `ch`, if any.
    pub fn prefix(&self, ch: char) -> Option<Prefix> {
        self.prefixes.get(&ch).copied()
    }

    /// Returns the separator role bound to `ch`, if any.
    pub fn separator(&self, ch: char) -> Option<Separator> {
        self.separators.get(&ch).copied()
    }

    /// Returns the container opened by `ch`, if any.
    pub fn container(&self, ch: char) -> Option<Container> {
        self.containers.get(&ch).copied()
    }

    /// The active property separator.
    pub fn property_separator(&self) -> char {
        self.separators
            .iter()
            .find(|(_, role)| **role == Separator::Property)
            .map(|(ch, _)| *ch)
            .unwrap_or('.')
    }

    /// The single-quote container binding, used by the reverse locator to
    /// wrap keys that contain special characters.
    pub fn singlequote_container(&self) -> Option<(char, char)> {
        self.containers
            .iter()
            .find(|(_, c)| c.kind == ContainerKind::SingleQuote)
            .map(|(open, c)| (*open, c.close))
    }

    /// True if `ch` forces a full tokenizer scan.
    pub fn is_special(&self, ch: char) -> bool {
        self.special.contains(&ch)
    }

    /// True if `ch` is significant anywhere in the grammar, including the
    /// property separator. This is the set `escape` protects against and
    /// the set that makes the locator quote a key.
    pub fn is_significant(&self, ch: char) -> bool {
        self.special.contains(&ch) || ch == self.property_separator()
    }

    /// True if the raw path contains any character that forces a full
    /// scan. When false, the path is a plain property-separator split.
    pub fn needs_scan(&self, path: &str) -> bool {
        path.chars().any(|ch| self.is_special(ch))
    }

    /// Assigns a prefix role to a character.
    pub fn set_prefix(&mut self, role: Prefix, ch: char) -> Result<(), SyntaxError> {
        let saved = self.prefixes.clone();
        self.prefixes.retain(|_, r| *r != role);
        if let Err(err) = self.check_free(ch) {
            self.prefixes = saved;
            return Err(err);
        }
        self.prefixes.insert(ch, role);
        self.regenerate();
        Ok(())
    }

    /// Assigns a separator role to a character.
    pub fn set_separator(&mut self, role: Separator, ch: char) -> Result<(), SyntaxError> {
        let saved = self.separators.clone();
        self.separators.retain(|_, r| *r != role);
        if let Err(err) = self.check_free(ch) {
            self.separators = saved;
            return Err(err);
        }
        self.separators.insert(ch, role);
        self.regenerate();
        Ok(())
    }

    /// Assigns a container role to an open/close character pair.
    pub fn set_container(
        &mut self,
        kind: ContainerKind,
        open: char,
        close: char,
    ) -> Result<(), SyntaxError> {
        if open == close && !kind.is_quote() {
            return Err(SyntaxError::DegenerateContainer { ch: open });
        }
        let saved = self.containers.clone();
        self.containers.retain(|_, c| c.kind != kind);
        let check = self.check_free(open).and_then(|_| {
            if close != open {
                self.check_free(close)
            } else {
                Ok(())
            }
        });
        if let Err(err) = check {
            self.containers = saved;
            return Err(err);
        }
        self.containers.insert(open, Container { kind, close });
        self.regenerate();
        Ok(())
    }

    /// Applies a partial override; stops at the first conflicting entry.
    pub fn apply(&mut self, patch: &SyntaxPatch) -> Result<(), SyntaxError> {
        if let Some(ch) = patch.parent {
            self.set_prefix(Prefix::Parent, ch)?;
        }
        if let Some(ch) = patch.root {
            self.set_prefix(Prefix::Root, ch)?;
        }
        if let Some(ch) = patch.placeholder {
            self.set_prefix(Prefix::Placeholder, ch)?;
        }
        if let Some(ch) = patch.context {
            self.set_prefix(Prefix::Context, ch)?;
        }
        if let Some(ch) = patch.property_separator {
            self.set_separator(Separator::Property, ch)?;
        }
        if let Some(ch) = patch.collection_separator {
            self.set_separator(Separator::Collection, ch)?;
        }
        if let Some((open, close)) = patch.property_container {
            self.set_container(ContainerKind::Property, open, close)?;
        }
        if let Some((open, close)) = patch.singlequote_container {
            self.set_container(ContainerKind::SingleQuote, open, close)?;
        }
        if let Some((open, close)) = patch.doublequote_container {
            self.set_container(ContainerKind::DoubleQuote, open, close)?;
        }
        if let Some((open, close)) = patch.call_container {
            self.set_container(ContainerKind::Call, open, close)?;
        }
        if let Some((open, close)) = patch.eval_container {
            self.set_container(ContainerKind::EvalProperty, open, close)?;
        }
        Ok(())
    }

    /// Verifies a character is assignable: not reserved and not bound.
    fn check_free(&self, ch: char) -> Result<(), SyntaxError> {
        if ch == WILDCARD || ch == ESCAPE {
            return Err(SyntaxError::Reserved { ch });
        }
        if let Some(bound_to) = self.role_of(ch) {
            return Err(SyntaxError::Conflict { ch, bound_to });
        }
        Ok(())
    }

    /// Names the role a character is currently bound to, if any.
    fn role_of(&self, ch: char) -> Option<&'static str> {
        if let Some(prefix) = self.prefixes.get(&ch) {
            return Some(match prefix {
                Prefix::Parent => "the parent prefix",
                Prefix::Root => "the root prefix",
                Prefix::Placeholder => "the placeholder prefix",
                Prefix::Context => "the context prefix",
            });
        }
        if let Some(sep) = self.separators.get(&ch) {
            return Some(match sep {
                Separator::Property => "the property separator",
                Separator::Collection => "the collection separator",
            });
        }
        for (open, container) in &self.containers {
            if *open == ch || container.close == ch {
                return Some(match container.kind {
                    ContainerKind::Property => "the property container",
                    ContainerKind::SingleQuote => "the single-quote container",
                    ContainerKind::DoubleQuote => "the double-quote container",
                    ContainerKind::Call => "the call container",
                    ContainerKind::EvalProperty => "the eval-property container",
                });
            }
        }
        None
    }

    /// Rebuilds the derived special-character set.
    ///
    /// A grammar with no prefixes, no containers, and no collection
    /// separator treats every character literally, so nothing (including
    /// the wildcard and escape) is special and every path takes the
    /// split fast path.
    fn regenerate(&mut self) {
        self.special.clear();
        let property_sep = self.property_separator();
        let structured = !self.prefixes.is_empty()
            || !self.containers.is_empty()
            || self.separators.len() > 1;
        if !structured {
            return;
        }
        for ch in self.prefixes.keys() {
            self.special.insert(*ch);
        }
        for ch in self.separators.keys() {
            if *ch != property_sep {
                self.special.insert(*ch);
            }
        }
        for (open, container) in &self.containers {
            self.special.insert(*open);
            self.special.insert(container.close);
        }
        self.special.insert(WILDCARD);
        self.special.insert(ESCAPE);
    }
}

/// True for ASCII decimal digits; placeholder and context tokens must be
/// made of these.
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}
