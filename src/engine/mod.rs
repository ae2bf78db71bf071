//! The public keypath engine: a configured grammar, a token cache and
//! the read/write/find entry points built on top of them.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::keypath::{fast, locate, tokenize, PathCache, Program, Resolver};
use crate::syntax::{
    ContainerKind, Prefix, Separator, Syntax, SyntaxError, SyntaxPatch, ESCAPE, WILDCARD,
};
use crate::value::Value;

/// A keypath engine with its own grammar and program cache.
///
/// The engine is single-threaded: options must not be changed while a
/// resolution borrowed from the same instance is still in progress.
///
/// # Example
///
/// ```
/// use keyquill::engine::Engine;
/// use keyquill::value::Value;
///
/// let engine = Engine::new();
/// let root: Value = serde_json::json!({"a": {"b": 1}}).into();
/// assert!(engine.get(&root, "a.b", &[]).is_some());
/// ```
pub struct Engine {
    syntax: Syntax,
    cache: RefCell<PathCache>,
    caching: bool,
    force: bool,
    simple: bool,
}

impl Engine {
    pub fn new() -> Self {
        Engine {
            syntax: Syntax::default(),
            cache: RefCell::new(PathCache::new()),
            caching: true,
            force: false,
            simple: false,
        }
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Resolves `path` against `root`. Positional `args` feed the
    /// placeholder and context prefixes. `None` when the path is
    /// malformed or names nothing.
    pub fn get(&self, root: &Value, path: &str, args: &[Value]) -> Option<Value> {
        if !self.caching && !self.syntax.needs_scan(path) {
            return fast::get_split(root, path, self.syntax.property_separator());
        }
        let program = self.tokens(path)?;
        if let Some(segments) = program.segments() {
            return fast::get_segments(root, &segments);
        }
        Resolver::new(args, self.force).get(root, &program)
    }

    /// Writes `new` at the location named by `path`. Returns false when
    /// the path is malformed or does not reach a writable location.
    pub fn set(&self, root: &mut Value, path: &str, new: &Value, args: &[Value]) -> bool {
        if !self.caching && !self.syntax.needs_scan(path) {
            return fast::set_split(
                root,
                path,
                self.syntax.property_separator(),
                new,
                self.force,
            );
        }
        let Some(program) = self.tokens(path) else {
            return false;
        };
        if let Some(segments) = program.segments() {
            return fast::set_segments(root, &segments, new, self.force);
        }
        Resolver::new(args, self.force).set(root, &program, new)
    }

    /// Path of the first descendant of `root` equal to `target`.
    pub fn find(&self, root: &Value, target: &Value) -> Option<String> {
        locate::find(&self.syntax, root, target)
    }

    /// Paths of every descendant of `root` equal to `target`.
    pub fn find_all(&self, root: &Value, target: &Value) -> Option<Vec<String>> {
        locate::find_all(&self.syntax, root, target)
    }

    /// The token program for `path`, from the cache when enabled.
    /// `None` when the path does not tokenize under the active grammar.
    pub fn tokens(&self, path: &str) -> Option<Rc<Program>> {
        if self.caching {
            if let Some(hit) = self.cache.borrow().get(path) {
                return Some(hit);
            }
        }
        match tokenize(&self.syntax, path) {
            Ok(program) => {
                let program = Rc::new(program);
                if self.caching {
                    self.cache.borrow_mut().insert(path, Rc::clone(&program));
                }
                Some(program)
            }
            Err(err) => {
                debug!(path, error = %err, "path rejected");
                None
            }
        }
    }

    pub fn is_valid(&self, path: &str) -> bool {
        self.tokens(path).is_some()
    }

    /// Escapes every grammar character in `path` so the result
    /// tokenizes to the literal input as plain property segments.
    pub fn escape(&self, path: &str) -> String {
        let mut escaped = String::with_capacity(path.len());
        for ch in path.chars() {
            if self.syntax.is_significant(ch) || ch == WILDCARD || ch == ESCAPE {
                escaped.push(ESCAPE);
            }
            escaped.push(ch);
        }
        escaped
    }

    /// Applies a partial grammar override, all entries or none. Cached
    /// programs were built under the old grammar, so the cache is
    /// dropped on success.
    pub fn set_options(&mut self, patch: &SyntaxPatch) -> Result<(), SyntaxError> {
        let mut next = self.syntax.clone();
        next.apply(patch)?;
        self.syntax = next;
        self.invalidate();
        Ok(())
    }

    /// Restores the default grammar and drops the cache.
    pub fn reset_options(&mut self) {
        self.syntax = Syntax::default();
        self.simple = false;
        self.invalidate();
    }

    pub fn set_prefix_parent(&mut self, ch: char) -> Result<(), SyntaxError> {
        self.syntax.set_prefix(Prefix::Parent, ch)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_prefix_root(&mut self, ch: char) -> Result<(), SyntaxError> {
        self.syntax.set_prefix(Prefix::Root, ch)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_prefix_placeholder(&mut self, ch: char) -> Result<(), SyntaxError> {
        self.syntax.set_prefix(Prefix::Placeholder, ch)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_prefix_context(&mut self, ch: char) -> Result<(), SyntaxError> {
        self.syntax.set_prefix(Prefix::Context, ch)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_separator_property(&mut self, ch: char) -> Result<(), SyntaxError> {
        self.syntax.set_separator(Separator::Property, ch)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_separator_collection(&mut self, ch: char) -> Result<(), SyntaxError> {
        self.syntax.set_separator(Separator::Collection, ch)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_container_property(&mut self, open: char, close: char) -> Result<(), SyntaxError> {
        self.syntax
            .set_container(ContainerKind::Property, open, close)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_container_singlequote(
        &mut self,
        open: char,
        close: char,
    ) -> Result<(), SyntaxError> {
        self.syntax
            .set_container(ContainerKind::SingleQuote, open, close)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_container_doublequote(
        &mut self,
        open: char,
        close: char,
    ) -> Result<(), SyntaxError> {
        self.syntax
            .set_container(ContainerKind::DoubleQuote, open, close)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_container_call(&mut self, open: char, close: char) -> Result<(), SyntaxError> {
        self.syntax.set_container(ContainerKind::Call, open, close)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_container_eval(&mut self, open: char, close: char) -> Result<(), SyntaxError> {
        self.syntax
            .set_container(ContainerKind::EvalProperty, open, close)?;
        self.invalidate();
        Ok(())
    }

    /// Turns program caching on or off; turning it off drops the cache.
    pub fn set_cache(&mut self, on: bool) {
        self.caching = on;
        if !on {
            self.cache.borrow_mut().clear();
        }
    }

    /// Missing intermediate object members are created on write when on.
    pub fn set_force(&mut self, on: bool) {
        self.force = on;
    }

    /// Installs the dot-paths-only grammar (separator defaults to `.`),
    /// or restores the default grammar when turned off.
    pub fn set_simple(&mut self, on: bool, separator: Option<char>) {
        self.simple = on;
        self.syntax = if on {
            Syntax::simple(separator.unwrap_or('.'))
        } else {
            Syntax::default()
        };
        self.invalidate();
    }

    pub fn is_simple(&self) -> bool {
        self.simple
    }

    fn invalidate(&mut self) {
        let dropped = self.cache.borrow().len();
        if dropped > 0 {
            debug!(dropped, "grammar changed, cache cleared");
        }
        self.cache.borrow_mut().clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
