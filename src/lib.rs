//! keyquill - a configurable keypath expression engine.
//!
//! Paths like `accounts.0.balance` or `users.{selected}.name` address
//! locations inside a JSON-like [`Value`](value::Value) tree. The grammar
//! is configurable per [`Engine`](engine::Engine), tokenized programs are
//! cached, and plain dot-paths skip tokenization entirely.

pub mod config;
pub mod engine;
pub mod keypath;
pub mod syntax;
pub mod value;

pub use engine::Engine;
pub use keypath::{PathError, Program};
pub use syntax::{Syntax, SyntaxError, SyntaxPatch};
pub use value::Value;
