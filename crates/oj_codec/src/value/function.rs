use core::fmt;
use std::borrow::Cow;

use super::Value;
use crate::CodecError;
use crate::info::{derive_key, key_of};
use crate::json::DELIMITER;

/// Signature of a native function that can be stored in a document.
pub type NativeFn = fn(&[Value]) -> Result<Value, CodecError>;

/// Whether a callable is a free function or bound to a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKind {
    Function,
    Method,
}

impl CallableKind {
    pub const fn name(self) -> &'static str {
        match self {
            CallableKind::Function => "function",
            CallableKind::Method => "method",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "function" => Some(CallableKind::Function),
            "method" => Some(CallableKind::Method),
            _ => None,
        }
    }
}

/// A declared parameter: its name and the Type Key of its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamSpec {
    pub name: Cow<'static, str>,
    pub type_key: Cow<'static, str>,
}

/// A reference to a named function.
///
/// Encoded as `<key>::::<name>:<type>,...`. Only free functions that were
/// registered with the type registry can be resolved when decoding; a
/// method is written out but rejected on the way back in.
///
/// Equality ignores the function pointer.
#[derive(Clone)]
pub struct FunctionRef {
    module_path: Option<Cow<'static, str>>,
    name: Cow<'static, str>,
    params: Vec<ParamSpec>,
    kind: CallableKind,
    func: Option<NativeFn>,
}

impl FunctionRef {
    /// A free function living in `module_path`.
    ///
    /// ```
    /// use oj_codec::value::{FunctionRef, Value};
    ///
    /// fn double(args: &[Value]) -> Result<Value, oj_codec::CodecError> {
    ///     match args {
    ///         [Value::Int(n)] => Ok(Value::Int(n * 2)),
    ///         _ => Ok(Value::Null),
    ///     }
    /// }
    ///
    /// let f = FunctionRef::function("math::ops", "double", double).with_param::<i64>("n");
    /// assert_eq!(f.encode(), "math.ops.double::::n:i64");
    /// assert_eq!(f.call(&[Value::Int(4)]).unwrap(), Value::Int(8));
    /// ```
    pub fn function(module_path: &'static str, name: &'static str, func: NativeFn) -> Self {
        Self {
            module_path: Some(Cow::Borrowed(module_path)),
            name: Cow::Borrowed(name),
            params: Vec::new(),
            kind: CallableKind::Function,
            func: Some(func),
        }
    }

    /// A method bound to an instance of `owner`.
    pub fn method(owner: &'static str, name: &'static str) -> Self {
        Self {
            module_path: Some(Cow::Borrowed(owner)),
            name: Cow::Borrowed(name),
            params: Vec::new(),
            kind: CallableKind::Method,
            func: None,
        }
    }

    /// Appends a parameter whose type key is derived from `T`.
    pub fn with_param<T: ?Sized>(mut self, name: &'static str) -> Self {
        self.params.push(ParamSpec {
            name: Cow::Borrowed(name),
            type_key: Cow::Owned(key_of::<T>()),
        });
        self
    }

    #[inline]
    pub fn kind(&self) -> CallableKind {
        self.kind
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// The lowercase key, `module.name`.
    pub fn key(&self) -> String {
        derive_key(self.module_path.as_deref(), &self.name)
    }

    /// `name:type` pairs joined by commas.
    pub fn signature(&self) -> String {
        self.params
            .iter()
            .map(|p| format!("{}:{}", p.name, p.type_key))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The text stored in documents.
    pub fn encode(&self) -> String {
        format!("{}{DELIMITER}{}", self.key(), self.signature())
    }

    /// Invokes the function.
    pub fn call(&self, args: &[Value]) -> Result<Value, CodecError> {
        match self.func {
            Some(func) => func(args),
            None => Err(CodecError::UnsupportedCallable { key: self.key() }),
        }
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.module_path == other.module_path
            && self.params == other.params
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRef")
            .field("key", &self.key())
            .field("kind", &self.kind)
            .field("signature", &self.signature())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{CallableKind, FunctionRef};
    use crate::value::Value;

    fn noop(_: &[Value]) -> Result<Value, crate::CodecError> {
        Ok(Value::Null)
    }

    #[test]
    fn encoded_form() {
        let f = FunctionRef::function("jobs", "Retry", noop)
            .with_param::<u32>("times")
            .with_param::<String>("label");
        assert_eq!(f.key(), "jobs.retry");
        assert_eq!(f.encode(), "jobs.retry::::times:u32,label:string");
    }

    #[test]
    fn method_is_not_callable() {
        let m = FunctionRef::method("jobs::Worker", "run");
        assert_eq!(m.kind(), CallableKind::Method);
        assert!(m.call(&[]).is_err());
    }
}
