//! The resolver: walks a token program against a live value graph.
//!
//! One walker serves both directions. A get runs the token loop and
//! returns the final context's value. A set runs the same loop over every
//! token but the last, asks the terminal token for its write targets
//! (concrete locations inside the root), then applies them through a
//! mutable descent and verifies each by read-back.
//!
//! Every context visited is pushed onto a value stack, which is what makes
//! parent and root back-references see the intermediate values in order.
//! The stack is cloned, never shared, into each sub-resolution (computed
//! keys, call arguments, collection alternatives), so sibling branches
//! cannot observe each other's pushes.

use indexmap::IndexMap;
use tracing::trace;

use crate::syntax::WILDCARD;
use crate::value::Value;

use super::token::{Exec, Mods, Program, Token};
use super::wildcard;

/// One step of a concrete location inside the root value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Key(String),
    Index(usize),
}

type Addr = Vec<Step>;

/// A visited context: its value plus, when the value still lives inside
/// the root, its concrete location. Detached values (call results,
/// injected arguments, collection aggregates) carry no address and cannot
/// be written through.
#[derive(Debug, Clone)]
struct Frame {
    value: Value,
    addr: Option<Addr>,
}

impl Frame {
    fn root(value: Value) -> Self {
        Frame {
            value,
            addr: Some(Vec::new()),
        }
    }

    fn detached(value: Value) -> Self {
        Frame { value, addr: None }
    }
}

/// A pending terminal write: the containing value's address plus the
/// final step into it.
#[derive(Debug, Clone)]
struct Write {
    parent: Addr,
    step: Step,
}

/// The effective word after its prefix modifiers have been applied.
struct WordSetup {
    ctx: Frame,
    text: String,
    wildcard: bool,
    /// An extra argument injected by the context modifier; when present
    /// no property lookup happens at all.
    injected: Option<Value>,
}

pub struct Resolver<'a> {
    args: &'a [Value],
    force: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(args: &'a [Value], force: bool) -> Self {
        Resolver { args, force }
    }

    /// Resolves a program to a value. `None` means some addressed location
    /// did not exist; that is an expected result, not an error.
    pub fn get(&self, root: &Value, program: &Program) -> Option<Value> {
        if program.tokens.is_empty() {
            return None;
        }
        let stack = vec![Frame::root(root.clone())];
        self.walk(&program.tokens, stack, false).map(|f| f.value)
    }

    /// Writes `new` at every location the program addresses. True iff no
    /// target failed; zero wildcard matches succeed vacuously.
    pub fn set(&self, root: &mut Value, program: &Program, new: &Value) -> bool {
        if program.tokens.is_empty() {
            return false;
        }
        let stack = vec![Frame::root(root.clone())];
        let writes = match self.plan(&program.tokens, stack) {
            Some(writes) => writes,
            None => return false,
        };
        let mut ok = true;
        for write in &writes {
            if !apply_write(root, write, new, self.force) {
                trace!(step = ?write.step, "write target could not be applied");
                ok = false;
            }
        }
        ok
    }

    /// The get-mode token loop: evaluate each token, push the result, and
    /// carry it forward as the next context.
    fn walk(&self, tokens: &[Token], mut stack: Vec<Frame>, vivify: bool) -> Option<Frame> {
        let mut ctx = stack.last()?.clone();
        for token in tokens {
            let ret = self.eval_token(token, &ctx, &mut stack, vivify)?;
            stack.push(ret.clone());
            ctx = ret;
        }
        Some(ctx)
    }

    /// The set-mode walk: get semantics up to the terminal token (with
    /// force-mode vivification), then collect write targets.
    fn plan(&self, tokens: &[Token], mut stack: Vec<Frame>) -> Option<Vec<Write>> {
        let (last, init) = tokens.split_last()?;
        let mut ctx = stack.last()?.clone();
        for token in init {
            let ret = self.eval_token(token, &ctx, &mut stack, self.force)?;
            stack.push(ret.clone());
            ctx = ret;
        }
        self.terminal_writes(last, &ctx, &mut stack)
    }

    fn eval_token(
        &self,
        token: &Token,
        ctx: &Frame,
        stack: &mut Vec<Frame>,
        vivify: bool,
    ) -> Option<Frame> {
        match token {
            Token::Plain(name) => self.access(ctx, name, vivify),
            Token::Word { text, mods } => {
                let mut setup = self.word_setup(text, mods, ctx, stack)?;
                if let Some(value) = setup.injected.take() {
                    return Some(Frame::detached(value));
                }
                if setup.wildcard {
                    return Some(Frame::detached(self.wildcard_values(&setup)));
                }
                if setup.ctx.value.is_callable() {
                    // implicit method-name lookup: the word stands for its
                    // own text so a following call container can consume it
                    return Some(Frame::detached(Value::String(setup.text)));
                }
                self.access(&setup.ctx, &setup.text, vivify)
            }
            Token::Group(alternatives) => {
                let mut results = Vec::with_capacity(alternatives.len());
                for alt in alternatives {
                    results.push(self.eval_alternative(alt, ctx, stack)?);
                }
                Some(Frame::detached(Value::Array(results)))
            }
            Token::Sub { program, exec } => match exec {
                Exec::Property => self.walk(&program.tokens, stack.clone(), vivify),
                Exec::EvalProperty => {
                    let key = self.eval_key(program, stack)?;
                    self.access(ctx, &key, vivify)
                }
                Exec::Call => self.call(program, ctx, stack),
            },
        }
    }

    /// Resolves one collection alternative against the shared base with an
    /// isolated copy of the stack.
    ///
    /// An eval-property alternative contributes its computed key itself —
    /// not the value at that key. The write direction is the other way
    /// around; see `terminal_writes`.
    fn eval_alternative(&self, alt: &Token, ctx: &Frame, stack: &[Frame]) -> Option<Value> {
        match alt {
            Token::Sub {
                program,
                exec: Exec::EvalProperty,
            } => {
                let key = self.eval_key(program, stack)?;
                Some(Value::String(key))
            }
            other => {
                let mut branch = stack.to_vec();
                let frame = self.eval_token(other, ctx, &mut branch, false)?;
                Some(frame.value)
            }
        }
    }

    /// Applies prefix modifiers in their fixed order: parent, root,
    /// placeholder, context.
    fn word_setup(
        &self,
        text: &str,
        mods: &Mods,
        ctx: &Frame,
        stack: &mut Vec<Frame>,
    ) -> Option<WordSetup> {
        let mut ctx = ctx.clone();
        let mut text = text.to_string();

        if mods.parent > 0 {
            let index = stack.len().checked_sub(1 + mods.parent)?;
            ctx = stack[index].clone();
        }
        if mods.root {
            ctx = stack.first()?.clone();
            // the stack resets: later back-references are relative to
            // this context as the new root
            let base = ctx.clone();
            stack.clear();
            stack.push(base);
        }
        if let Some(index) = mods.placeholder {
            text = self.args.get(index - 1)?.coerce_string();
        }
        let injected = match mods.context {
            Some(index) => Some(self.args.get(index - 1)?.clone()),
            None => None,
        };
        // a placeholder substitution may itself introduce a wildcard
        let wildcard = mods.has_wildcard
            || (mods.placeholder.is_some() && text.contains(WILDCARD));
        Some(WordSetup {
            ctx,
            text,
            wildcard,
            injected,
        })
    }

    /// Collects the values of every own key matching the wildcard
    /// template, in the context's enumeration order.
    fn wildcard_values(&self, setup: &WordSetup) -> Value {
        let matched: Vec<Value> = setup
            .ctx
            .value
            .own_keys()
            .iter()
            .filter(|key| wildcard::matches(&setup.text, key, WILDCARD))
            .filter_map(|key| setup.ctx.value.index(key).cloned())
            .collect();
        Value::Array(matched)
    }

    /// Resolves a nested program to a computed property key. The
    /// sub-resolution starts back at the root so the key source does not
    /// have to live under the current context; the outer stack is kept
    /// underneath for parent and root back-references.
    fn eval_key(&self, program: &Program, stack: &[Frame]) -> Option<String> {
        let mut branch = stack.to_vec();
        let base = branch.first()?.clone();
        branch.push(base);
        let frame = self.walk(&program.tokens, branch, false)?;
        Some(frame.value.coerce_string())
    }

    /// Invokes the current context as a function. The receiver is the
    /// value the function was retrieved from; argument paths resolve
    /// starting at that receiver.
    fn call(&self, program: &Program, ctx: &Frame, stack: &[Frame]) -> Option<Frame> {
        let func = match &ctx.value {
            Value::Func(func) => func.clone(),
            _ => return None,
        };
        let receiver = if stack.len() >= 2 {
            stack[stack.len() - 2].value.clone()
        } else {
            Value::Null
        };
        let args = if program.is_empty() {
            Vec::new()
        } else {
            let mut branch = stack.to_vec();
            if branch.len() >= 2 {
                branch.pop();
            }
            // an argument path that resolves to nothing means a zero-arg call
            match self.walk(&program.tokens, branch, false) {
                Some(frame) => match frame.value {
                    Value::Array(items) => items,
                    other => vec![other],
                },
                None => Vec::new(),
            }
        };
        Some(Frame::detached(func.call(&receiver, &args)))
    }

    /// Direct property access, producing a frame one step deeper.
    ///
    /// With `vivify` (set-mode force), a missing object key yields a
    /// virtual empty object whose address extends the parent's; arrays
    /// are presence-checked by index bounds and never auto-created.
    fn access(&self, ctx: &Frame, key: &str, vivify: bool) -> Option<Frame> {
        match ctx.value.index(key) {
            Some(child) => {
                let addr = ctx.addr.as_ref().map(|addr| {
                    let mut addr = addr.clone();
                    addr.push(step_for(&ctx.value, key));
                    addr
                });
                Some(Frame {
                    value: child.clone(),
                    addr,
                })
            }
            None => {
                if vivify && ctx.value.is_object() {
                    let addr = ctx.addr.as_ref().map(|addr| {
                        let mut addr = addr.clone();
                        addr.push(Step::Key(key.to_string()));
                        addr
                    });
                    Some(Frame {
                        value: Value::Object(IndexMap::new()),
                        addr,
                    })
                } else {
                    None
                }
            }
        }
    }

    /// Computes the write targets for the terminal token.
    fn terminal_writes(
        &self,
        token: &Token,
        ctx: &Frame,
        stack: &mut Vec<Frame>,
    ) -> Option<Vec<Write>> {
        match token {
            Token::Plain(name) => self.write_target(ctx, name),
            Token::Word { text, mods } => {
                let setup = self.word_setup(text, mods, ctx, stack)?;
                if setup.injected.is_some() {
                    // injected arguments are not locations in the root
                    return None;
                }
                if setup.wildcard {
                    let parent = setup.ctx.addr.clone()?;
                    let writes = setup
                        .ctx
                        .value
                        .own_keys()
                        .into_iter()
                        .filter(|key| wildcard::matches(&setup.text, key, WILDCARD))
                        .map(|key| Write {
                            parent: parent.clone(),
                            step: step_for(&setup.ctx.value, &key),
                        })
                        .collect();
                    return Some(writes);
                }
                if setup.ctx.value.is_callable() {
                    return None;
                }
                self.write_target(&setup.ctx, &setup.text)
            }
            Token::Group(alternatives) => {
                let mut writes = Vec::new();
                for alt in alternatives {
                    match alt {
                        Token::Sub {
                            program,
                            exec: Exec::EvalProperty,
                        } => {
                            // write direction of the eval asymmetry: the
                            // assignment lands at the computed key
                            let branch = stack.clone();
                            let key = self.eval_key(program, &branch)?;
                            writes.extend(self.write_target(ctx, &key)?);
                        }
                        Token::Sub {
                            program,
                            exec: Exec::Property,
                        } => {
                            writes.extend(self.plan(&program.tokens, stack.clone())?);
                        }
                        other => {
                            let mut branch = stack.clone();
                            writes.extend(self.terminal_writes(other, ctx, &mut branch)?);
                        }
                    }
                }
                Some(writes)
            }
            Token::Sub { program, exec } => match exec {
                Exec::EvalProperty => {
                    let key = self.eval_key(program, stack)?;
                    self.write_target(ctx, &key)
                }
                Exec::Property => self.plan(&program.tokens, stack.clone()),
                // a call result is a temporary, not a location
                Exec::Call => None,
            },
        }
    }

    fn write_target(&self, ctx: &Frame, key: &str) -> Option<Vec<Write>> {
        let parent = ctx.addr.clone()?;
        let step = match &ctx.value {
            Value::Array(_) => Step::Index(key.parse().ok()?),
            _ => Step::Key(key.to_string()),
        };
        Some(vec![Write { parent, step }])
    }
}

/// Returns the concrete step a textual key takes into a value.
fn step_for(value: &Value, key: &str) -> Step {
    match value {
        Value::Array(_) => match key.parse::<usize>() {
            Ok(index) => Step::Index(index),
            Err(_) => Step::Key(key.to_string()),
        },
        _ => Step::Key(key.to_string()),
    }
}

/// Descends the root along the write's parent address (creating missing
/// objects in force mode), assigns the new value, and verifies the
/// assignment stuck by reading it back.
fn apply_write(root: &mut Value, write: &Write, new: &Value, force: bool) -> bool {
    let mut cursor = root;
    for step in &write.parent {
        let next = match step {
            Step::Key(key) => match cursor {
                Value::Object(fields) => {
                    if force {
                        Some(
                            fields
                                .entry(key.clone())
                                .or_insert_with(|| Value::Object(IndexMap::new())),
                        )
                    } else {
                        fields.get_mut(key)
                    }
                }
                _ => None,
            },
            Step::Index(index) => match cursor {
                Value::Array(items) => items.get_mut(*index),
                _ => None,
            },
        };
        cursor = match next {
            Some(value) => value,
            None => return false,
        };
    }
    match (&write.step, cursor) {
        (Step::Key(key), Value::Object(fields)) => {
            fields.insert(key.clone(), new.clone());
            fields.get(key) == Some(new)
        }
        (Step::Index(index), Value::Array(items)) => {
            if *index < items.len() {
                items[*index] = new.clone();
                items[*index] == *new
            } else if *index == items.len() {
                items.push(new.clone());
                items[*index] == *new
            } else {
                false
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypath::tokenizer::tokenize;
    use crate::syntax::Syntax;
    use crate::value::{NativeFn, Number};
    use serde_json::json;

    fn get(root: &Value, path: &str) -> Option<Value> {
        get_with(root, path, &[])
    }

    fn get_with(root: &Value, path: &str, args: &[Value]) -> Option<Value> {
        let program = tokenize(&Syntax::default(), path).unwrap();
        Resolver::new(args, false).get(root, &program)
    }

    fn set(root: &mut Value, path: &str, new: Value, force: bool) -> bool {
        let program = tokenize(&Syntax::default(), path).unwrap();
        Resolver::new(&[], force).set(root, &program, &new)
    }

    fn int(i: i64) -> Value {
        Value::Number(Number::Integer(i))
    }

    #[test]
    fn test_get_plain_chain() {
        let root = Value::from(json!({"accounts": [{"id": 1}]}));
        assert_eq!(get(&root, "accounts.0.id"), Some(int(1)));
    }

    #[test]
    fn test_get_missing_intermediate() {
        let root = Value::from(json!({"a": {"b": 2}}));
        assert_eq!(get(&root, "a.x.y"), None);
    }

    #[test]
    fn test_get_parent_reference() {
        let root = Value::from(json!({"a": {"b": 1}, "c": 2}));
        // walk into a, then back up to the root level for c
        assert_eq!(get(&root, "a.<c"), Some(int(2)));
    }

    #[test]
    fn test_get_double_parent() {
        let root = Value::from(json!({"a": {"b": {"x": 1}}, "top": 9}));
        assert_eq!(get(&root, "a.b.<<top"), Some(int(9)));
    }

    #[test]
    fn test_parent_out_of_range() {
        let root = Value::from(json!({"a": 1}));
        assert_eq!(get(&root, "a.<<<b"), None);
    }

    #[test]
    fn test_get_root_reference() {
        let root = Value::from(json!({"a": {"b": {"c": 1}}, "top": 9}));
        assert_eq!(get(&root, "a.b.~top"), Some(int(9)));
    }

    #[test]
    fn test_root_resets_stack() {
        let root = Value::from(json!({"a": {"top": 0}, "top": 9}));
        // after ~, a parent reference is relative to the new root
        assert_eq!(get(&root, "a.~a.<top"), Some(int(9)));
    }

    #[test]
    fn test_placeholder_substitution() {
        let root = Value::from(json!({"users": {"alice": 1}}));
        assert_eq!(
            get_with(&root, "users.%1", &[Value::String("alice".to_string())]),
            Some(int(1))
        );
        // absent argument fails
        assert_eq!(get_with(&root, "users.%2", &[]), None);
    }

    #[test]
    fn test_context_injection() {
        let root = Value::from(json!({}));
        let injected = Value::from(json!({"x": 5}));
        assert_eq!(
            get_with(&root, "@1.x", &[injected]),
            Some(int(5))
        );
    }

    #[test]
    fn test_wildcard_get_enumeration_order() {
        let root = Value::from(json!({"a": 1, "ab": 2, "b": 3}));
        assert_eq!(
            get(&root, "a*"),
            Some(Value::Array(vec![int(1), int(2)]))
        );
    }

    #[test]
    fn test_wildcard_over_array_indices() {
        let root = Value::from(json!({"xs": [10, 20]}));
        assert_eq!(
            get(&root, "xs.*"),
            Some(Value::Array(vec![int(10), int(20)]))
        );
    }

    #[test]
    fn test_collection_get() {
        let root = Value::from(json!({"a": 1, "b": 2}));
        assert_eq!(
            get(&root, "a,b"),
            Some(Value::Array(vec![int(1), int(2)]))
        );
    }

    #[test]
    fn test_collection_failing_alternative_aborts() {
        let root = Value::from(json!({"a": 1}));
        assert_eq!(get(&root, "a,zz"), None);
    }

    #[test]
    fn test_eval_property_get() {
        let root = Value::from(json!({"k": "b", "b": 7}));
        // {k} computes "b" starting from the root, then reads root.b
        assert_eq!(get(&root, "{k}"), Some(int(7)));
    }

    #[test]
    fn test_eval_property_key_resolves_from_root() {
        // the key source lives beside the container, not under it
        let root = Value::from(json!({
            "selected": "second",
            "items": {"first": 1, "second": 2}
        }));
        assert_eq!(get(&root, "items.{selected}"), Some(int(2)));
    }

    #[test]
    fn test_eval_property_in_group_yields_key() {
        let root = Value::from(json!({"k": "b", "b": 7}));
        // inside a collection the eval alternative contributes the
        // computed key itself, not the value at it
        assert_eq!(
            get(&root, "{k},b"),
            Some(Value::Array(vec![
                Value::String("b".to_string()),
                int(7)
            ]))
        );
    }

    #[test]
    fn test_quoted_key_get() {
        let root = Value::from(json!({"a.b": 3}));
        assert_eq!(get(&root, "'a.b'"), Some(int(3)));
    }

    #[test]
    fn test_call_with_receiver() {
        let double = NativeFn::new(|recv, _| match recv.index("n") {
            Some(Value::Number(n)) => Value::Number(Number::Float(n.as_f64() * 2.0)),
            _ => Value::Null,
        });
        let mut obj = indexmap::IndexMap::new();
        obj.insert("n".to_string(), int(21));
        obj.insert("double".to_string(), Value::Func(double));
        let mut root = indexmap::IndexMap::new();
        root.insert("obj".to_string(), Value::Object(obj));
        let root = Value::Object(root);

        assert_eq!(
            get(&root, "obj.double()"),
            Some(Value::Number(Number::Float(42.0)))
        );
    }

    #[test]
    fn test_call_with_arguments() {
        let add = NativeFn::new(|_, args| {
            let total: f64 = args
                .iter()
                .filter_map(|a| match a {
                    Value::Number(n) => Some(n.as_f64()),
                    _ => None,
                })
                .sum();
            Value::Number(Number::Float(total))
        });
        let mut root = indexmap::IndexMap::new();
        root.insert("add".to_string(), Value::Func(add));
        root.insert("x".to_string(), int(2));
        root.insert("y".to_string(), int(3));
        let root = Value::Object(root);

        // x,y resolves to an array, spread as the argument list
        assert_eq!(
            get(&root, "add(x,y)"),
            Some(Value::Number(Number::Float(5.0)))
        );
    }

    #[test]
    fn test_call_with_unresolvable_arguments_passes_none() {
        let count = NativeFn::new(|_, args| int(args.len() as i64));
        let mut root = indexmap::IndexMap::new();
        root.insert("count".to_string(), Value::Func(count));
        let root = Value::Object(root);
        assert_eq!(get(&root, "count(no.such.path)"), Some(int(0)));
    }

    #[test]
    fn test_call_on_non_callable_fails() {
        let root = Value::from(json!({"a": 1}));
        assert_eq!(get(&root, "a()"), None);
    }

    #[test]
    fn test_word_on_callable_resolves_to_text() {
        let f = NativeFn::new(|_, _| Value::Null);
        let mut root = indexmap::IndexMap::new();
        root.insert("f".to_string(), Value::Func(f));
        let root = Value::Object(root);
        // a word with modifiers against a callable context stands for its text
        assert_eq!(
            get_with(&root, "f.%1", &[Value::String("anything".to_string())]),
            Some(Value::String("anything".to_string()))
        );
    }

    #[test]
    fn test_wildcard_over_callable_yields_empty_array() {
        let f = NativeFn::new(|_, _| Value::Null);
        let mut root = indexmap::IndexMap::new();
        root.insert("f".to_string(), Value::Func(f));
        let root = Value::Object(root);
        assert_eq!(get(&root, "f.x*"), Some(Value::Array(vec![])));
    }

    #[test]
    fn test_set_existing_key() {
        let mut root = Value::from(json!({"a": {"b": 1}}));
        assert!(set(&mut root, "a.b", int(5), false));
        assert_eq!(root, Value::from(json!({"a": {"b": 5}})));
    }

    #[test]
    fn test_set_missing_without_force() {
        let mut root = Value::from(json!({}));
        assert!(!set(&mut root, "a.b", int(5), false));
        assert_eq!(root, Value::from(json!({})));
    }

    #[test]
    fn test_set_missing_with_force() {
        let mut root = Value::from(json!({}));
        assert!(set(&mut root, "a.b", int(5), true));
        assert_eq!(root, Value::from(json!({"a": {"b": 5}})));
    }

    #[test]
    fn test_set_array_element() {
        let mut root = Value::from(json!({"xs": [1, 2, 3]}));
        assert!(set(&mut root, "xs.1", int(9), false));
        assert_eq!(root, Value::from(json!({"xs": [1, 9, 3]})));
    }

    #[test]
    fn test_set_array_append_at_len() {
        let mut root = Value::from(json!({"xs": [1]}));
        assert!(set(&mut root, "xs.1", int(2), false));
        assert_eq!(root, Value::from(json!({"xs": [1, 2]})));
    }

    #[test]
    fn test_set_array_beyond_len_fails() {
        let mut root = Value::from(json!({"xs": [1]}));
        assert!(!set(&mut root, "xs.5", int(2), true));
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut root = Value::from(json!({"a": 5}));
        assert!(!set(&mut root, "a.b", int(1), true));
        assert_eq!(root, Value::from(json!({"a": 5})));
    }

    #[test]
    fn test_set_wildcard_writes_all_matches() {
        let mut root = Value::from(json!({"a": 1, "ab": 2, "b": 3}));
        assert!(set(&mut root, "a*", int(0), false));
        assert_eq!(root, Value::from(json!({"a": 0, "ab": 0, "b": 3})));
    }

    #[test]
    fn test_set_wildcard_no_matches_is_vacuously_true() {
        let mut root = Value::from(json!({"b": 1}));
        assert!(set(&mut root, "zz*", int(0), false));
        assert_eq!(root, Value::from(json!({"b": 1})));
    }

    #[test]
    fn test_set_collection_writes_each_alternative() {
        let mut root = Value::from(json!({"a": 1, "b": 2, "c": 3}));
        assert!(set(&mut root, "a,b", int(0), false));
        assert_eq!(root, Value::from(json!({"a": 0, "b": 0, "c": 3})));
    }

    #[test]
    fn test_set_eval_in_group_writes_at_computed_key() {
        let mut root = Value::from(json!({"k": "b", "b": 7, "c": 8}));
        // the eval alternative's write lands at the computed key "b"
        assert!(set(&mut root, "{k},c", int(0), false));
        assert_eq!(root, Value::from(json!({"k": "b", "b": 0, "c": 0})));
    }

    #[test]
    fn test_set_eval_property_terminal() {
        let mut root = Value::from(json!({"k": "b", "b": 7}));
        assert!(set(&mut root, "{k}", int(0), false));
        assert_eq!(root, Value::from(json!({"k": "b", "b": 0})));
    }

    #[test]
    fn test_set_eval_property_key_from_root() {
        let mut root = Value::from(json!({
            "selected": "second",
            "items": {"first": 1, "second": 2}
        }));
        assert!(set(&mut root, "items.{selected}", int(9), false));
        assert_eq!(
            root,
            Value::from(json!({
                "selected": "second",
                "items": {"first": 1, "second": 9}
            }))
        );
    }

    #[test]
    fn test_set_through_call_result_fails() {
        let f = NativeFn::new(|_, _| Value::from(json!({"x": 1})));
        let mut root = indexmap::IndexMap::new();
        root.insert("f".to_string(), Value::Func(f));
        let mut root = Value::Object(root);
        let program = tokenize(&Syntax::default(), "f().x").unwrap();
        assert!(!Resolver::new(&[], false).set(&mut root, &program, &int(5)));
    }

    #[test]
    fn test_get_after_set_symmetry() {
        let mut root = Value::from(json!({"a": {"b": {"c": 1}}}));
        assert!(set(&mut root, "a.b.c", int(42), false));
        assert_eq!(get(&root, "a.b.c"), Some(int(42)));
    }

    #[test]
    fn test_get_call_result_chain() {
        let f = NativeFn::new(|_, _| Value::from(json!({"x": 1})));
        let mut root = indexmap::IndexMap::new();
        root.insert("f".to_string(), Value::Func(f));
        let root = Value::Object(root);
        assert_eq!(get(&root, "f().x"), Some(int(1)));
    }
}
