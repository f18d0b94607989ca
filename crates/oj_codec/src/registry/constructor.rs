use core::fmt;

use indexmap::IndexMap;

use crate::value::{FieldValue, Value};
use crate::{CodecError, Object};

/// A constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamInfo {
    name: &'static str,
    required: bool,
}

impl ParamInfo {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `false` when the parameter has a default.
    #[inline]
    pub fn is_required(&self) -> bool {
        self.required
    }
}

type Factory = Box<dyn Fn(&mut Arguments) -> Result<Box<dyn Object>, CodecError> + Send + Sync>;

/// Builds new instances of a registered type from named arguments.
pub struct Constructor {
    params: Vec<ParamInfo>,
    factory: Factory,
}

impl Constructor {
    /// A constructor with no parameters declared yet.
    pub fn new(
        factory: impl Fn(&mut Arguments) -> Result<Box<dyn Object>, CodecError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            params: Vec::new(),
            factory: Box::new(factory),
        }
    }

    /// A parameterless constructor returning `T::default()`.
    pub fn from_default<T: Object + Default>() -> Self {
        Self::new(|_| Ok(Box::new(T::default()) as Box<dyn Object>))
    }

    /// Declares a parameter that must be supplied.
    pub fn required(mut self, name: &'static str) -> Self {
        self.params.push(ParamInfo { name, required: true });
        self
    }

    /// Declares a parameter with a default.
    pub fn optional(mut self, name: &'static str) -> Self {
        self.params.push(ParamInfo { name, required: false });
        self
    }

    #[inline]
    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }

    /// Names of the required parameters, in declaration order.
    pub fn required_params(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().filter(|p| p.required).map(|p| p.name)
    }

    /// Runs the factory.
    pub fn construct(&self, mut args: Arguments) -> Result<Box<dyn Object>, CodecError> {
        (self.factory)(&mut args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Named arguments handed to a [`Constructor`].
#[derive(Debug, Default)]
pub struct Arguments {
    type_path: &'static str,
    values: IndexMap<String, Value>,
}

impl Arguments {
    pub fn new(type_path: &'static str, values: IndexMap<String, Value>) -> Self {
        Self { type_path, values }
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn convert<F: FieldValue>(&self, name: &str, value: Value) -> Result<F, CodecError> {
        F::from_value(value).map_err(|source| CodecError::Field {
            type_path: self.type_path,
            field: name.to_owned(),
            source,
        })
    }

    /// Removes and converts a required argument.
    pub fn take<F: FieldValue>(&mut self, name: &str) -> Result<F, CodecError> {
        match self.values.shift_remove(name) {
            Some(value) => self.convert(name, value),
            None => Err(CodecError::MissingParameters {
                type_path: self.type_path,
                params: vec![name.to_owned()],
            }),
        }
    }

    /// Removes and converts an argument, if present.
    pub fn take_opt<F: FieldValue>(&mut self, name: &str) -> Result<Option<F>, CodecError> {
        match self.values.shift_remove(name) {
            Some(value) => self.convert(name, value).map(Some),
            None => Ok(None),
        }
    }

    /// Removes and converts an argument, falling back to `F::default()`.
    pub fn take_or_default<F: FieldValue + Default>(&mut self, name: &str) -> Result<F, CodecError> {
        self.take_opt(name).map(Option::unwrap_or_default)
    }
}
