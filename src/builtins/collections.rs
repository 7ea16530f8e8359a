//! ABOUTME: Array and string builtins — len, first, last, rest, push

use crate::object::Object;

fn wrong_arity(received: usize, expected: usize) -> Object {
    Object::Error(format!(
        "wrong arguments amount: received {received}, expected {expected}"
    ))
}

fn unsupported_argument(name: &str, obj: &Object) -> Object {
    Object::Error(format!(
        "unsupported argument for builtin function {name}: {}",
        obj.type_name()
    ))
}

pub fn len(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }
    match &args[0] {
        Object::String(s) => Object::Integer(s.chars().count() as i64),
        Object::Array(elements) => Object::Integer(elements.len() as i64),
        other => unsupported_argument("len", other),
    }
}

pub fn first(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }
    match &args[0] {
        Object::Array(elements) => elements.first().cloned().unwrap_or(Object::Null),
        other => unsupported_argument("first", other),
    }
}

pub fn last(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }
    match &args[0] {
        Object::Array(elements) => elements.last().cloned().unwrap_or(Object::Null),
        other => unsupported_argument("last", other),
    }
}

pub fn rest(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }
    match &args[0] {
        Object::Array(elements) => {
            if elements.is_empty() {
                Object::Null
            } else {
                Object::Array(elements[1..].to_vec())
            }
        }
        other => unsupported_argument("rest", other),
    }
}

pub fn push(args: &[Object]) -> Object {
    if args.len() != 2 {
        return wrong_arity(args.len(), 2);
    }
    match &args[0] {
        Object::Array(elements) => {
            let mut extended = elements.clone();
            extended.push(args[1].clone());
            Object::Array(extended)
        }
        other => unsupported_argument("push", other),
    }
}
