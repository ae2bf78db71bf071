//! Keypath tokenizer and resolver.
//!
//! A keypath is a string expression naming a location inside a [`Value`]
//! tree, built from the characters of a configurable [`Syntax`]. This
//! module turns path strings into reusable token programs and walks
//! those programs against a value tree for reads and writes.
//!
//! # Default grammar
//!
//! - `a.b.c` - property access, one segment per separator
//! - `a,b` - collection of alternatives, resolved to an array
//! - `<` / `~` - parent and root back-references
//! - `%1` / `@1` - positional argument as key text / as injected value
//! - `[key]`, `'key'`, `"key"` - bracketed and quoted segments
//! - `fn(args)` - invocation of a callable member
//! - `{path}` - property name computed by a nested path
//! - `*` - wildcard inside a segment
//!
//! # Examples
//!
//! ```
//! // accounts.0.balance - second-level array element field
//! // users.*name - every key matching the pattern
//! // items.{selector} - key named by another field
//! ```
//!
//! [`Value`]: crate::value::Value
//! [`Syntax`]: crate::syntax::Syntax

pub mod cache;
pub mod error;
pub mod fast;
pub mod locate;
pub mod resolver;
pub mod token;
pub mod tokenizer;
pub mod wildcard;

pub use cache::PathCache;
pub use error::PathError;
pub use resolver::Resolver;
pub use token::{Exec, Mods, Program, Token};
pub use tokenizer::{tokenize, MAX_DEPTH};
