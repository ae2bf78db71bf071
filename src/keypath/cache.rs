//! Process-lifetime memoization of compiled paths.

use std::collections::HashMap;
use std::rc::Rc;

use super::token::Program;

/// Maps raw path strings to their compiled programs.
///
/// Owned by the engine instance; cleared whenever the syntax configuration
/// changes or caching is turned off. Only successful compilations are
/// stored, keyed by the exact input string.
#[derive(Debug, Default)]
pub struct PathCache {
    programs: HashMap<String, Rc<Program>>,
}

impl PathCache {
    pub fn new() -> Self {
        PathCache::default()
    }

    pub fn get(&self, path: &str) -> Option<Rc<Program>> {
        self.programs.get(path).cloned()
    }

    pub fn insert(&mut self, path: &str, program: Rc<Program>) {
        self.programs.insert(path.to_string(), program);
    }

    pub fn clear(&mut self) {
        self.programs.clear();
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
