// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

use crate::SlotId;

/// A specialized `Result` type for binding operations that return a binding [`Error`][enum@Error].
pub type Result<T> = std::result::Result<T, Error>;

/// An error that aborts a binding pass.
///
/// Slots that simply find nothing to bind are never errors. Only a slot that the binder decided to
/// bind but could not read or write, or a caller mistake detected before any mutation, ends up here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The binder could not read or write a slot it had decided to bind.
    #[error("cannot access slot {slot} of {target}: {source}")]
    SlotAccess {
        /// Type name of the object being bound.
        target: &'static str,
        /// The slot that failed.
        slot: SlotId,
        /// What went wrong with the slot.
        #[source]
        source: SlotAccessError,
    },

    /// The caller passed something the binder cannot work with.
    #[error("{0}")]
    InvalidArgument(String),
}

/// Why a single slot could not be read or written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SlotAccessError {
    /// The slot is visible but offers no access.
    #[error("slot is not accessible")]
    Inaccessible,

    /// The value does not fit the slot's type.
    #[error("expected a value of type {expected}, got {actual}")]
    TypeMismatch {
        /// Type name of the slot.
        expected: &'static str,
        /// Concrete type name of the value.
        actual: &'static str,
    },

    /// The target no longer reports the slot.
    #[error("slot is no longer reported by its target")]
    Missing,
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use super::*;
    use crate::TypeKey;

    struct Owner;

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(Error: Send, Sync);
        static_assertions::assert_impl_all!(SlotAccessError: Send, Sync);
    }

    #[test]
    fn slot_access_carries_identity() {
        let error = Error::SlotAccess {
            target: "app::Owner",
            slot: SlotId::new(TypeKey::of::<Owner>(), "clock"),
            source: SlotAccessError::Inaccessible,
        };

        assert_eq!(error.to_string(), "cannot access slot Owner::clock of app::Owner: slot is not accessible");
        assert_eq!(error.source().unwrap().to_string(), "slot is not accessible");
    }

    #[test]
    fn type_mismatch_message() {
        let error = SlotAccessError::TypeMismatch {
            expected: "app::Clock",
            actual: "app::Calendar",
        };

        assert_eq!(error.to_string(), "expected a value of type app::Clock, got app::Calendar");
    }
}
