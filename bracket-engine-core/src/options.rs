//! # Generation Options
//!
//! A generation call accepts a key-value map of optional configuration. Every [`Format`]
//! declares the keys it understands, together with a human readable name and a default value,
//! as [`TournamentOptions`]. The values supplied by a caller are collected in a
//! [`TournamentOptionValues`] and checked against the declaration with
//! [`TournamentOptionValues::merge`] before any match is built.
//!
//! The only key declared today is `rounds`, which is reserved for a swiss format and has no
//! effect on any of the current formats.
//!
//! [`Format`]: crate::Format
#[cfg(feature = "serde")]
mod serde_impl;

use std::collections::hash_map::{Iter, Keys};
use std::collections::HashMap;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown key {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: expected {expected}, found {found}")]
    InvalidValue {
        key: String,
        found: &'static str,
        expected: &'static str,
    },
}

/// The options accepted by a format, including their names and default values.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TournamentOptions(HashMap<String, TournamentOption>);

impl TournamentOptions {
    /// Creates a new [`Builder`].
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the options accepted by every format.
    pub(crate) fn base() -> Builder {
        Self::builder().option(
            "rounds",
            "Number of rounds, reserved for the swiss format",
            0u64,
        )
    }

    /// Returns the option with the given `key`. Returns `None` if the given key does not exist.
    pub fn get(&self, key: &str) -> Option<&TournamentOption> {
        self.0.get(key)
    }

    /// Inserts a new [`TournamentOption`] with the provided `key`, overwriting the previous value
    /// if it exists.
    pub fn insert<K>(&mut self, key: K, option: TournamentOption)
    where
        K: ToString,
    {
        self.0.insert(key.to_string(), option);
    }

    /// Returns an iterator over all keys.
    pub fn keys(&self) -> Keys<'_, String, TournamentOption> {
        self.0.keys()
    }

    /// Returns an iterator over all [`TournamentOption`]s.
    pub fn iter(&self) -> Iter<'_, String, TournamentOption> {
        self.0.iter()
    }
}

/// The option values supplied for a single generation call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TournamentOptionValues(HashMap<String, OptionValue>);

impl TournamentOptionValues {
    /// Creates a new, empty `TournamentOptionValues`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the [`OptionValue`] with the given `key`. Returns `None` if no value exist for the
    /// given `key`.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: ToString,
        V: Into<OptionValue>,
    {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn iter(&self) -> Iter<'_, String, OptionValue> {
        self.0.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validates `self` against the declared `options` and fills every key that was not
    /// supplied with its default value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] if a key is not declared in `options`, or
    /// [`Error::InvalidValue`] if a value has a different type than the declared default.
    pub fn merge(mut self, mut declared: TournamentOptions) -> Result<Self, Error> {
        for (key, supplied) in &self.0 {
            let option = declared
                .0
                .remove(key)
                .ok_or_else(|| Error::UnknownKey(key.clone()))?;

            let expected = option.value.value_type();
            if supplied.value_type() != expected {
                return Err(Error::InvalidValue {
                    key: key.clone(),
                    found: supplied.value_type(),
                    expected,
                });
            }
        }

        // Whatever is left was not supplied.
        self.0
            .extend(declared.0.into_iter().map(|(key, option)| (key, option.value)));

        Ok(self)
    }
}

impl<K, V> FromIterator<(K, V)> for TournamentOptionValues
where
    K: ToString,
    V: Into<OptionValue>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut this = Self::new();
        for (key, value) in iter {
            this.set(key, value);
        }

        this
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TournamentOption {
    pub name: String,
    pub value: OptionValue,
}

/// The value of a [`TournamentOption`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    I64(i64),
    U64(u64),
    String(String),
}

impl OptionValue {
    /// Returns the name of the type of this value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bracket_engine_core::options::OptionValue;
    /// assert_eq!(OptionValue::U64(5).value_type(), "u64");
    /// assert_eq!(OptionValue::from("five").value_type(), "string");
    /// ```
    pub fn value_type(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I64(_) => "i64",
            Self::U64(_) => "u64",
            Self::String(_) => "string",
        }
    }
}

impl From<bool> for OptionValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    #[inline]
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<u64> for OptionValue {
    #[inline]
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl<'a> From<&'a str> for OptionValue {
    #[inline]
    fn from(value: &'a str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for OptionValue {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A builder for [`TournamentOptions`].
#[derive(Clone, Debug, Default)]
pub struct Builder {
    options: TournamentOptions,
}

impl Builder {
    /// Inserts a new [`TournamentOption`]. If the `key` already exists, it is overwritten.
    pub fn option<T, V>(mut self, key: &'static str, name: T, value: V) -> Self
    where
        T: ToString,
        V: Into<OptionValue>,
    {
        self.options.insert(
            key,
            TournamentOption {
                name: name.to_string(),
                value: value.into(),
            },
        );
        self
    }

    /// Consumes the `Builder`, returning the collected [`TournamentOptions`].
    #[inline]
    pub fn build(self) -> TournamentOptions {
        self.options
    }
}
