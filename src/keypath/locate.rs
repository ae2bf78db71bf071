//! Reverse lookup: given a value, recover the keypath(s) leading to it.

use crate::syntax::{Syntax, ESCAPE};
use crate::value::Value;

/// Returns the path of the first child equal to `target`, searching
/// depth-first from `root`.
///
/// Array elements are visited in ascending index order. Object entries
/// are visited by lexicographically sorted key when the object has more
/// than one key, so the result is stable regardless of insertion order.
pub fn find(syntax: &Syntax, root: &Value, target: &Value) -> Option<String> {
    let mut walker = Walker::new(syntax, target, true);
    walker.descend(root, String::new());
    walker.found.into_iter().next()
}

/// Returns the paths of every child equal to `target`, in visit order.
/// `None` when nothing matches.
pub fn find_all(syntax: &Syntax, root: &Value, target: &Value) -> Option<Vec<String>> {
    let mut walker = Walker::new(syntax, target, false);
    walker.descend(root, String::new());
    if walker.found.is_empty() {
        None
    } else {
        Some(walker.found)
    }
}

struct Walker<'a> {
    syntax: &'a Syntax,
    target: &'a Value,
    first_only: bool,
    found: Vec<String>,
}

impl<'a> Walker<'a> {
    fn new(syntax: &'a Syntax, target: &'a Value, first_only: bool) -> Self {
        Walker {
            syntax,
            target,
            first_only,
            found: Vec::new(),
        }
    }

    fn done(&self) -> bool {
        self.first_only && !self.found.is_empty()
    }

    fn descend(&mut self, node: &Value, prefix: String) {
        match node {
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if self.done() {
                        return;
                    }
                    self.visit(item, &prefix, &idx.to_string());
                }
            }
            Value::Object(fields) => {
                let mut keys: Vec<&String> = fields.keys().collect();
                if keys.len() > 1 {
                    keys.sort();
                }
                for key in keys {
                    if self.done() {
                        return;
                    }
                    self.visit(&fields[key.as_str()], &prefix, key);
                }
            }
            _ => {}
        }
    }

    fn visit(&mut self, child: &Value, prefix: &str, key: &str) {
        let path = self.join(prefix, key);
        if child == self.target {
            self.found.push(path.clone());
            if self.first_only {
                return;
            }
        }
        self.descend(child, path);
    }

    fn join(&self, prefix: &str, key: &str) -> String {
        let segment = self.quote(key);
        if prefix.is_empty() {
            segment
        } else {
            let mut path = String::with_capacity(prefix.len() + segment.len() + 1);
            path.push_str(prefix);
            path.push(self.syntax.property_separator());
            path.push_str(&segment);
            path
        }
    }

    // Keys that contain grammar characters must be quoted, or the
    // produced path would not tokenize back to the same key.
    fn quote(&self, key: &str) -> String {
        if !key.chars().any(|ch| self.syntax.is_significant(ch)) {
            return key.to_string();
        }
        let Some((open, close)) = self.syntax.singlequote_container() else {
            return key.to_string();
        };
        let mut quoted = String::with_capacity(key.len() + 2);
        quoted.push(open);
        for ch in key.chars() {
            if ch == open || ch == close || ch == ESCAPE {
                quoted.push(ESCAPE);
            }
            quoted.push(ch);
        }
        quoted.push(close);
        quoted
    }
}
