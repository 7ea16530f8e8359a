//! ABOUTME: Built-in function registry, organized by functional category

mod collections;
mod io;

use crate::object::Object;

/// Looks up a builtin by name. Builtins are not bound in any `Environment` —
/// identifier resolution falls back to this registry only after the
/// environment chain reports a miss (see `eval::eval_identifier`).
pub fn lookup(name: &str) -> Option<Object> {
    match name {
        "len" => Some(Object::Builtin(collections::len)),
        "first" => Some(Object::Builtin(collections::first)),
        "last" => Some(Object::Builtin(collections::last)),
        "rest" => Some(Object::Builtin(collections::rest)),
        "push" => Some(Object::Builtin(collections::push)),
        "puts" => Some(Object::Builtin(io::puts)),
        _ => None,
    }
}
