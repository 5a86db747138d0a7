//! Forwarding policy for desktop variables missing from the sandbox.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Controls how an unset `XDG_*` variable is forwarded to the host process.
///
/// The default forwards the literal text `None`, which host applications
/// read as a relative directory name. A warning is logged whenever it
/// applies.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UnsetVariablePolicy {
    /// Forward `NAME=None`.
    #[default]
    Placeholder,
    /// Forward `NAME=` with an empty value.
    Empty,
    /// Leave the variable out of the host environment assignments.
    Omit,
}

impl UnsetVariablePolicy {
    /// Literal forwarded by [`UnsetVariablePolicy::Placeholder`].
    pub const PLACEHOLDER: &'static str = "None";

    /// Returns the value to forward for an unset variable, if any.
    #[must_use]
    pub const fn substitute(self) -> Option<&'static str> {
        match self {
            Self::Placeholder => Some(Self::PLACEHOLDER),
            Self::Empty => Some(""),
            Self::Omit => None,
        }
    }
}

/// Errors encountered while parsing an [`UnsetVariablePolicy`] from text.
pub type UnsetVariablePolicyParseError = strum::ParseError;
