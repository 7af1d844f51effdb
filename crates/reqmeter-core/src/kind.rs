//! Error-kind derivation for the failure counter's `error` label.
//!
//! The label must stay low-cardinality: it names the category of a failure,
//! never its free-text message. `ErrorLabel::Message` exists for deployments
//! that need the older message-text behavior and accept the cardinality cost.

use std::borrow::Cow;
use std::fmt;

use serde::Deserialize;

/// A stable, coarse-grained category for a failure.
pub trait ErrorKind {
    fn kind(&self) -> Cow<'static, str>;
}

/// How the `error` label value is derived from a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorLabel {
    /// Category identifier from `ErrorKind::kind`.
    #[default]
    Kind,
    /// `Display` output of the failure. Unbounded cardinality.
    Message,
}

impl ErrorLabel {
    pub fn value<E>(self, err: &E) -> Cow<'static, str>
    where
        E: ErrorKind + fmt::Display + ?Sized,
    {
        match self {
            ErrorLabel::Kind => err.kind(),
            ErrorLabel::Message => {
                let msg = err.to_string();
                if msg.is_empty() {
                    // fall back so the series never carries an empty label
                    err.kind()
                } else {
                    Cow::Owned(msg)
                }
            }
        }
    }
}

/// Last path segment of `T`'s type name, without generic arguments.
///
/// `my_app::errors::ValidationError<u32>` becomes `ValidationError`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl ErrorKind for std::io::Error {
    fn kind(&self) -> Cow<'static, str> {
        Cow::Owned(format!("io::{:?}", std::io::Error::kind(self)))
    }
}

impl<E: ErrorKind + ?Sized> ErrorKind for Box<E> {
    fn kind(&self) -> Cow<'static, str> {
        (**self).kind()
    }
}
