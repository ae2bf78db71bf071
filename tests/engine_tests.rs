//! Integration tests for end-to-end keypath resolution through the engine.

use keyquill::engine::Engine;
use keyquill::value::{NativeFn, Number, Value};

fn int(n: i64) -> Value {
    Value::Number(Number::Integer(n))
}

fn s(text: &str) -> Value {
    Value::String(text.to_string())
}

fn sample() -> Value {
    serde_json::json!({
        "accounts": [
            {"id": 1, "owner": "ada", "balance": 10},
            {"id": 2, "owner": "bob", "balance": 20}
        ],
        "selected": "1",
        "labels": {"primary": "main", "secondary": "alt"}
    })
    .into()
}

/// Plain dot paths walk objects and arrays by key and decimal index.
#[test]
fn test_plain_paths() {
    let engine = Engine::new();
    let root = sample();
    assert_eq!(engine.get(&root, "accounts.1.owner", &[]), Some(s("bob")));
    assert_eq!(engine.get(&root, "labels.primary", &[]), Some(s("main")));
    assert_eq!(engine.get(&root, "accounts.2.owner", &[]), None);
    assert_eq!(engine.get(&root, "labels.missing", &[]), None);
}

/// Bracketed and quoted segments name keys that contain grammar characters.
#[test]
fn test_container_segments() {
    let engine = Engine::new();
    let root: Value = serde_json::json!({
        "dot.key": {"inner": 1},
        "normal": {"a,b": 2}
    })
    .into();
    assert_eq!(engine.get(&root, "'dot.key'.inner", &[]), Some(int(1)));
    assert_eq!(engine.get(&root, "\"dot.key\".inner", &[]), Some(int(1)));
    assert_eq!(engine.get(&root, "normal['a,b']", &[]), Some(int(2)));
    assert_eq!(engine.get(&root, "[normal]['a,b']", &[]), Some(int(2)));
}

/// A wildcard segment collects every matching member in insertion order.
#[test]
fn test_wildcard_collects_in_insertion_order() {
    let engine = Engine::new();
    let root: Value = serde_json::json!({
        "zebra": 1, "alpha": 2, "zoo": 3
    })
    .into();
    assert_eq!(
        engine.get(&root, "z*", &[]),
        Some(Value::Array(vec![int(1), int(3)]))
    );
    assert_eq!(
        engine.get(&root, "*", &[]),
        Some(Value::Array(vec![int(1), int(2), int(3)]))
    );
}

/// Collections resolve each alternative and fail if any alternative fails.
#[test]
fn test_collections() {
    let engine = Engine::new();
    let root = sample();
    assert_eq!(
        engine.get(&root, "labels.primary,secondary", &[]),
        Some(Value::Array(vec![s("main"), s("alt")]))
    );
    assert_eq!(engine.get(&root, "labels.primary,missing", &[]), None);
}

/// Parent and root back-references rewind the walk.
#[test]
fn test_back_references() {
    let engine = Engine::new();
    let root = sample();
    assert_eq!(
        engine.get(&root, "labels.primary.<secondary", &[]),
        Some(s("alt"))
    );
    assert_eq!(
        engine.get(&root, "labels.primary.~selected", &[]),
        Some(s("1"))
    );
    // more parents than contexts
    assert_eq!(engine.get(&root, "labels.<<<primary", &[]), None);
}

/// Placeholder arguments substitute their string form as key text.
#[test]
fn test_placeholder_arguments() {
    let engine = Engine::new();
    let root = sample();
    assert_eq!(
        engine.get(&root, "accounts.%1.owner", &[int(0)]),
        Some(s("ada"))
    );
    // out-of-range argument index
    assert_eq!(engine.get(&root, "accounts.%2.owner", &[int(0)]), None);
    // index zero is malformed, not merely unresolvable
    assert!(!engine.is_valid("accounts.%0"));
}

/// Context arguments inject a value as the walk's next context.
#[test]
fn test_context_arguments() {
    let engine = Engine::new();
    let root = sample();
    let injected: Value = serde_json::json!({"x": 42}).into();
    assert_eq!(engine.get(&root, "@1.x", &[injected]), Some(int(42)));
}

/// Eval-property containers compute the key from a nested path.
#[test]
fn test_eval_property() {
    let engine = Engine::new();
    let root = sample();
    assert_eq!(
        engine.get(&root, "accounts.{selected}.owner", &[]),
        Some(s("bob"))
    );
}

/// Call containers invoke a callable member on its holder.
#[test]
fn test_call_invocation() {
    let engine = Engine::new();
    let balance_sum = NativeFn::new(|receiver, _| {
        let Some(Value::Array(accounts)) = receiver.index("accounts").cloned() else {
            return Value::Null;
        };
        let total: i64 = accounts
            .iter()
            .filter_map(|a| match a.index("balance") {
                Some(Value::Number(Number::Integer(n))) => Some(*n),
                _ => None,
            })
            .sum();
        Value::Number(Number::Integer(total))
    });
    let mut root = sample();
    if let Value::Object(fields) = &mut root {
        fields.insert("total".to_string(), Value::Func(balance_sum));
    }
    assert_eq!(engine.get(&root, "total()", &[]), Some(int(30)));
    // naming a callable without invoking it yields the callable
    assert!(matches!(
        engine.get(&root, "total", &[]),
        Some(Value::Func(_))
    ));
}

/// Call arguments are resolved as paths from the receiver.
#[test]
fn test_call_arguments_resolve_from_receiver() {
    let engine = Engine::new();
    let add = NativeFn::new(|_, args| {
        let total: i64 = args
            .iter()
            .filter_map(|a| match a {
                Value::Number(Number::Integer(n)) => Some(*n),
                _ => None,
            })
            .sum();
        Value::Number(Number::Integer(total))
    });
    let mut root: Value = serde_json::json!({"pair": {"x": 2, "y": 3}}).into();
    if let Value::Object(fields) = &mut root {
        if let Some(Value::Object(pair)) = fields.get_mut("pair") {
            pair.insert("add".to_string(), Value::Func(add));
        }
    }
    assert_eq!(engine.get(&root, "pair.add(x,y)", &[]), Some(int(5)));
}

/// Writes reach existing locations; force vivifies missing objects.
#[test]
fn test_set_behaviors() {
    let mut engine = Engine::new();
    let mut root = sample();

    assert!(engine.set(&mut root, "accounts.0.balance", &int(99), &[]));
    assert_eq!(engine.get(&root, "accounts.0.balance", &[]), Some(int(99)));

    assert!(!engine.set(&mut root, "audit.last.user", &s("ada"), &[]));
    engine.set_force(true);
    assert!(engine.set(&mut root, "audit.last.user", &s("ada"), &[]));
    assert_eq!(engine.get(&root, "audit.last.user", &[]), Some(s("ada")));

    // arrays accept in-bounds writes and single-slot appends only
    assert!(engine.set(&mut root, "accounts.2", &int(0), &[]));
    assert!(!engine.set(&mut root, "accounts.9", &int(0), &[]));
}

/// A wildcard write updates every matching member.
#[test]
fn test_set_wildcard() {
    let engine = Engine::new();
    let mut root: Value = serde_json::json!({"ax": 1, "ay": 2, "b": 3}).into();
    assert!(engine.set(&mut root, "a*", &int(0), &[]));
    assert_eq!(engine.get(&root, "ax", &[]), Some(int(0)));
    assert_eq!(engine.get(&root, "ay", &[]), Some(int(0)));
    assert_eq!(engine.get(&root, "b", &[]), Some(int(3)));
}

/// In get mode a group's eval alternative yields the computed key itself;
/// in terminal set mode the write lands at that key instead.
#[test]
fn test_group_eval_asymmetry() {
    let engine = Engine::new();
    let root: Value = serde_json::json!({"k": "b", "b": 7, "c": 8}).into();
    assert_eq!(
        engine.get(&root, "{k},c", &[]),
        Some(Value::Array(vec![s("b"), int(8)]))
    );

    let mut root = root;
    assert!(engine.set(&mut root, "{k},c", &int(0), &[]));
    assert_eq!(engine.get(&root, "b", &[]), Some(int(0)));
    assert_eq!(engine.get(&root, "c", &[]), Some(int(0)));
}

/// Call results are detached from the tree and cannot be written through.
#[test]
fn test_set_through_call_fails() {
    let engine = Engine::new();
    let make = NativeFn::new(|_, _| serde_json::json!({"x": 1}).into());
    let mut root: Value = {
        let mut fields = indexmap::IndexMap::new();
        fields.insert("make".to_string(), Value::Func(make));
        Value::Object(fields)
    };
    assert_eq!(engine.get(&root, "make().x", &[]), Some(int(1)));
    assert!(!engine.set(&mut root, "make().x", &int(9), &[]));
}

/// find returns sorted-key order while get returns insertion order.
#[test]
fn test_find_sorting_asymmetry() {
    let engine = Engine::new();
    let root: Value = serde_json::json!({"zx": 1, "ax": 1}).into();
    assert_eq!(
        engine.get(&root, "*x", &[]),
        Some(Value::Array(vec![int(1), int(1)]))
    );
    assert_eq!(engine.find(&root, &int(1)), Some("ax".to_string()));
    assert_eq!(
        engine.find_all(&root, &int(1)),
        Some(vec!["ax".to_string(), "zx".to_string()])
    );
}

/// Paths found by the locator resolve back to the located value.
#[test]
fn test_find_round_trips_through_get() {
    let engine = Engine::new();
    let root: Value = serde_json::json!({
        "outer": {"dot.key": {"deep": 31}}
    })
    .into();
    let path = engine.find(&root, &int(31)).unwrap();
    assert_eq!(path, "outer.'dot.key'.deep");
    assert_eq!(engine.get(&root, &path, &[]), Some(int(31)));
}

/// Malformed paths never resolve and never write.
#[test]
fn test_malformed_paths() {
    let engine = Engine::new();
    let mut root = sample();
    for path in ["a[open", "a.<", "trail\\", "%x", "%%1"] {
        assert!(!engine.is_valid(path), "expected invalid: {}", path);
        assert_eq!(engine.get(&root, path, &[]), None);
        assert!(!engine.set(&mut root, path, &int(0), &[]));
    }
}
