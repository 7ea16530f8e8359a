//! ABOUTME: Runtime value model — values, hash keys, printable forms (C5)

use crate::ast::{BlockStatement, Expression, Identifier};
use crate::env::Environment;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A runtime value. `Return` and `Error` are control-flow sentinels: they
/// are never observed by user code, only unwrapped or propagated by the
/// evaluator (see `eval.rs`).
#[derive(Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    String(String),
    Array(Vec<Object>),
    Hash(HashMap<HashKey, (Object, Object)>),
    Function {
        parameters: Vec<Identifier>,
        body: BlockStatement,
        env: Rc<Environment>,
    },
    Builtin(fn(&[Object]) -> Object),
    Return(Box<Object>),
    Error(String),
    Quote(Expression),
    Macro {
        parameters: Vec<Identifier>,
        body: BlockStatement,
        env: Rc<Environment>,
    },
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::Null => "NULL",
            Object::String(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function { .. } => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::Return(_) => "RETURN",
            Object::Error(_) => "ERROR",
            Object::Quote(_) => "QUOTE",
            Object::Macro { .. } => "MACRO",
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Boolean(false) | Object::Null)
    }

    /// Derives a `HashKey` for values in the hashable subset
    /// (`Integer`, `Boolean`, `String`). Any other variant is not hashable.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Object::Integer(i) => Some(HashKey::Integer(*i)),
            Object::Boolean(b) => Some(HashKey::Boolean(*b)),
            Object::String(s) => Some(HashKey::Str(s.clone())),
            _ => None,
        }
    }
}

/// Two hashable values with equal content always produce an equal key:
/// the key is the hashable value itself rather than a derived tag+hash
/// pair, so there is no possibility of distinct values colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    Str(String),
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::String(a), Object::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(i) => write!(f, "{i}"),
            Object::Boolean(b) => write!(f, "{b}"),
            Object::Null => write!(f, "null"),
            Object::String(s) => write!(f, "{s}"),
            Object::Array(elements) => {
                let rendered: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Object::Hash(pairs) => {
                let rendered: Vec<String> = pairs
                    .values()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Object::Function { parameters, body, .. } => {
                let params: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
                write!(f, "fn({}) {{\n{}\n}}", params.join(", "), body)
            }
            Object::Builtin(_) => write!(f, "builtin function"),
            Object::Return(value) => write!(f, "{value}"),
            Object::Error(message) => write!(f, "[Error] {message}"),
            Object::Quote(node) => write!(f, "QUOTE({node})"),
            Object::Macro { parameters, body, .. } => {
                let params: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
                write!(f, "macro({}) {{\n{}\n}}", params.join(", "), body)
            }
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({})", self.type_name())
    }
}
