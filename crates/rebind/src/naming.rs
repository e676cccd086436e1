// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::TypeKey;

/// Maps a slot-derived candidate name to the name a component is registered under.
///
/// Returning `None` vetoes by-name resolution for the slot; by-type resolution may still apply.
/// Implementations must be pure.
pub trait NamingFilter: Send + Sync + std::fmt::Debug {
    /// Maps `candidate` for a slot declared as `declared`.
    fn filter(&self, candidate: &str, declared: &TypeKey) -> Option<String>;
}

/// Uses every candidate name as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl NamingFilter for PassThrough {
    fn filter(&self, candidate: &str, _declared: &TypeKey) -> Option<String> {
        Some(candidate.to_string())
    }
}

/// The naming convention of components registered in a deployment-qualified container.
///
/// A qualified candidate such as `"billing.invoiceService"` collapses to its last segment, and slots
/// whose declared type has a disallowed character in its simple name (generic instantiations by
/// default) are never looked up by name.
///
/// # Examples
///
/// ```
/// use rebind::{NamingConvention, NamingFilter, TypeKey};
///
/// struct InvoiceService;
///
/// let convention = NamingConvention::new();
/// let key = TypeKey::of::<InvoiceService>();
///
/// assert_eq!(convention.filter("billing.invoiceService", &key).as_deref(), Some("invoiceService"));
/// assert_eq!(convention.filter("invoiceService", &key).as_deref(), Some("invoiceService"));
/// assert!(convention.filter("items", &TypeKey::of::<Vec<u8>>()).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct NamingConvention {
    separator: char,
    disallowed: Vec<char>,
}

impl NamingConvention {
    /// Splits on `.` and vetoes generic types.
    #[must_use]
    pub fn new() -> Self {
        Self {
            separator: '.',
            disallowed: vec!['<'],
        }
    }

    /// Sets the character separating the qualifier from the component name.
    #[must_use]
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the characters that veto by-name lookup when they appear in the declared type's simple name.
    #[must_use]
    pub fn disallowed(mut self, disallowed: impl IntoIterator<Item = char>) -> Self {
        self.disallowed = disallowed.into_iter().collect();
        self
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self::new()
    }
}

impl NamingFilter for NamingConvention {
    fn filter(&self, candidate: &str, declared: &TypeKey) -> Option<String> {
        if declared.simple_name().contains(self.disallowed.as_slice()) {
            return None;
        }

        let name = candidate.rsplit(self.separator).next().unwrap_or(candidate);
        if name.is_empty() {
            return None;
        }

        Some(name.to_string())
    }
}
