// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::mem;
use std::sync::Arc;

use crate::{Bindable, SlotAccess, SlotAccessError, SlotId, SlotValue, Writer};

/// A structural slot mutated by a binding pass, with the value it held before.
#[derive(Debug)]
pub struct BoundField {
    slot: SlotId,
    prior: SlotValue,
}

impl BoundField {
    pub(crate) fn new(slot: SlotId, prior: SlotValue) -> Self {
        Self { slot, prior }
    }

    /// The slot that was written.
    #[must_use]
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// What the slot held before the write.
    #[must_use]
    pub fn prior(&self) -> &SlotValue {
        &self.prior
    }
}

/// A property mutated by a binding pass, with the value it held before.
#[derive(Debug)]
pub struct BoundProperty {
    slot: SlotId,
    prior: SlotValue,
}

impl BoundProperty {
    pub(crate) fn new(slot: SlotId, prior: SlotValue) -> Self {
        Self { slot, prior }
    }

    /// The slot that was written.
    #[must_use]
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// What the slot held before the write.
    #[must_use]
    pub fn prior(&self) -> &SlotValue {
        &self.prior
    }
}

/// The ledger of one binding pass.
///
/// Records every slot mutated on the target, in mutation order, together with the results of the
/// nested passes run over injected values. Reverting consumes the recorded entries and leaves an
/// empty ledger behind; the target stays reachable for inspection.
pub struct BoundResult {
    target: Arc<dyn Bindable>,
    target_name: &'static str,
    fields: Vec<BoundField>,
    properties: Vec<BoundProperty>,
    nested: Vec<Self>,
}

impl BoundResult {
    pub(crate) fn new(target: Arc<dyn Bindable>, target_name: &'static str) -> Self {
        Self {
            target,
            target_name,
            fields: Vec::new(),
            properties: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// The object this pass bound.
    #[must_use]
    pub fn target(&self) -> &Arc<dyn Bindable> {
        &self.target
    }

    /// Type name of the target.
    #[must_use]
    pub fn target_name(&self) -> &'static str {
        self.target_name
    }

    /// Structural slots written by this pass, in mutation order.
    #[must_use]
    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    /// Properties written by this pass, in mutation order.
    #[must_use]
    pub fn properties(&self) -> &[BoundProperty] {
        &self.properties
    }

    /// Results of the nested passes run over injected values.
    #[must_use]
    pub fn nested(&self) -> &[Self] {
        &self.nested
    }

    /// Whether the pass, including its nested passes, changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.properties.is_empty() && self.nested.iter().all(Self::is_empty)
    }

    /// Number of slots changed by this pass and all of its nested passes.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.fields.len() + self.properties.len() + self.nested.iter().map(Self::mutation_count).sum::<usize>()
    }

    pub(crate) fn push_field(&mut self, field: BoundField) {
        self.fields.push(field);
    }

    pub(crate) fn push_property(&mut self, property: BoundProperty) {
        self.properties.push(property);
    }

    pub(crate) fn push_nested(&mut self, nested: Self) {
        self.nested.push(nested);
    }

    /// Restores every recorded slot, newest first: nested passes, then properties, then fields.
    ///
    /// A slot that cannot be restored is logged and skipped.
    pub(crate) fn revert(&mut self) {
        for mut nested in mem::take(&mut self.nested).into_iter().rev() {
            nested.revert();
        }

        let properties = mem::take(&mut self.properties);
        if !properties.is_empty() {
            let live = self.target.properties();
            for entry in properties.into_iter().rev() {
                let access = live
                    .iter()
                    .find(|property| property.id() == Some(entry.slot))
                    .ok_or(SlotAccessError::Missing)
                    .and_then(|property| property.writer().and_then(Writer::access).ok_or(SlotAccessError::Inaccessible));

                restore(self.target_name, entry.slot, access, entry.prior);
            }
        }

        let fields = mem::take(&mut self.fields);
        if !fields.is_empty() {
            let live = self.target.attributes();
            for entry in fields.into_iter().rev() {
                let access = live
                    .iter()
                    .find(|attribute| attribute.id() == entry.slot)
                    .ok_or(SlotAccessError::Missing)
                    .and_then(|attribute| attribute.access().ok_or(SlotAccessError::Inaccessible));

                restore(self.target_name, entry.slot, access, entry.prior);
            }
        }
    }
}

fn restore(target: &'static str, slot: SlotId, access: Result<&dyn SlotAccess, SlotAccessError>, prior: SlotValue) {
    if let Err(error) = access.and_then(|access| access.restore(prior)) {
        tracing::event!(
            name: "rebind.revert",
            tracing::Level::WARN,
            rebind.target = target,
            rebind.slot = %slot,
            rebind.error = %error,
            "failed to restore slot"
        );
    }
}

impl fmt::Debug for BoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundResult")
            .field("target", &self.target_name)
            .field("fields", &self.fields)
            .field("properties", &self.properties)
            .field("nested", &self.nested)
            .finish()
    }
}
