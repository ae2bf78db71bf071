//! Token program types: the compiled form of a keypath.

use std::fmt;

/// Modifiers attached to a [`Token::Word`] by prefix characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mods {
    /// Number of parent back-references to apply
    pub parent: usize,
    /// Jump back to the first context and reset the stack
    pub root: bool,
    /// 1-based extra-argument index substituted as text
    pub placeholder: Option<usize>,
    /// 1-based extra-argument index used directly as the result
    pub context: Option<usize>,
    /// The word text contains the wildcard character
    pub has_wildcard: bool,
}

impl Mods {
    /// True when any modifier or wildcard is pending.
    pub fn any(&self) -> bool {
        self.parent > 0
            || self.root
            || self.placeholder.is_some()
            || self.context.is_some()
            || self.has_wildcard
    }
}

/// How a nested sub-program is consumed during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exec {
    /// Spliced path segment (inside a collection)
    Property,
    /// Invoke the current context as a function
    Call,
    /// Resolve to compute a property name for the outer context
    EvalProperty,
}

impl fmt::Display for Exec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Exec::Property => "property",
            Exec::Call => "call",
            Exec::EvalProperty => "eval-property",
        };
        write!(f, "{}", name)
    }
}

/// A single step in a compiled keypath.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// An ordinary property name with no modifiers
    Plain(String),
    /// A property name (or wildcard pattern) carrying modifiers
    Word { text: String, mods: Mods },
    /// A collection of alternatives resolved against the same base
    Group(Vec<Token>),
    /// A nested program tagged with how it must be consumed
    Sub { program: Program, exec: Exec },
}

/// A compiled keypath: an ordered token sequence.
///
/// `simple` is true iff every token is [`Token::Plain`]; such programs are
/// eligible for the restricted fast-path evaluators.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub tokens: Vec<Token>,
    pub simple: bool,
}

impl Program {
    /// Builds a program, computing the `simple` flag structurally.
    pub fn new(tokens: Vec<Token>) -> Self {
        let simple = tokens.iter().all(|t| matches!(t, Token::Plain(_)));
        Program { tokens, simple }
    }

    /// A program with no tokens (an empty container's contents).
    pub fn empty() -> Self {
        Program {
            tokens: Vec::new(),
            simple: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Borrows the segment names of a simple program.
    ///
    /// Returns `None` when any token is not plain.
    pub fn segments(&self) -> Option<Vec<&str>> {
        self.tokens
            .iter()
            .map(|t| match t {
                Token::Plain(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}
