//! # Message Mapper
//!
//! Copies field values between two arbitrary Protobuf messages, matching fields by name.
//!
//! The source can be anything implementing [`ReflectMessage`] (generated types deriving it,
//! or a [`DynamicMessage`]); the destination is a [`DynamicMessage`], mutated in place and
//! handed back so calls can be chained. Fields present on only one side, or whose kinds do
//! not match, are skipped silently.
//!
//! * **populate**: copies every matching field. Unset source fields reset the destination.
//! * **populate non default**: skips source fields holding their default value, which makes
//!   it suitable for applying partial updates.
//! * **populate from fields with marker**: only copies source fields carrying a custom option.
//!
//! The pairs of matching fields for a (source, destination) type pair are computed once and
//! cached by the [`Mapper`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use pobla_core::PopulateExt;
//! use pobla_core::prost_reflect::{DescriptorPool, DynamicMessage};
//!
//! # fn run(pool: DescriptorPool, user: DynamicMessage, patch: DynamicMessage) {
//! let descriptor = pool.get_message_by_name("my.package.User").unwrap();
//!
//! let mut updated = DynamicMessage::new(descriptor);
//! updated.populate_with(&user).populate_with_non_default(&patch);
//! # }
//! ```
mod plan;

pub use plan::{FieldPair, MappingPlan};

use crate::metadata;
use prost_reflect::{DynamicMessage, ExtensionDescriptor, MessageDescriptor, ReflectMessage, Value};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use tracing::{debug, trace};

static GLOBAL_MAPPER: LazyLock<Mapper> = LazyLock::new(Mapper::new);

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Failed to transcode the populated message into '{message}': '{source}'")]
    Transcode {
        message: String,
        #[source]
        source: prost::DecodeError,
    },
}

/// Which source fields take part in a copy.
#[derive(Debug, Clone, Copy)]
enum Selection<'a> {
    All,
    NonDefault,
    Marked(&'a ExtensionDescriptor),
}

/// Copies fields between messages, caching a [`MappingPlan`] per pair of message types.
#[derive(Debug, Default)]
pub struct Mapper {
    plans: Mutex<HashMap<(String, String), Arc<MappingPlan>>>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide mapper used by [`PopulateExt`] and the free functions.
    pub fn global() -> &'static Mapper {
        &GLOBAL_MAPPER
    }

    /// Returns the cached plan for copying `source` messages into `target` messages.
    pub fn plan(
        &self,
        source: &MessageDescriptor,
        target: &MessageDescriptor,
    ) -> Arc<MappingPlan> {
        let key = (source.full_name().to_string(), target.full_name().to_string());
        let mut plans = self.plans.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(plan) = plans.get(&key) {
            // Same names may come from different pools.
            if plan.is_for(source, target) {
                return Arc::clone(plan);
            }
        }

        let plan = Arc::new(MappingPlan::build(source, target));

        debug!(
            source = source.full_name(),
            target = target.full_name(),
            fields = plan.pairs().len(),
            "Built mapping plan"
        );

        plans.insert(key, Arc::clone(&plan));
        plan
    }

    /// Copies every field of `source` with a matching field in `destination`.
    pub fn populate<'a>(
        &self,
        destination: &'a mut DynamicMessage,
        source: &impl ReflectMessage,
    ) -> &'a mut DynamicMessage {
        self.copy(destination, source, Selection::All)
    }

    /// Like [`Mapper::populate`], leaving out source fields that hold their default value.
    pub fn populate_non_default<'a>(
        &self,
        destination: &'a mut DynamicMessage,
        source: &impl ReflectMessage,
    ) -> &'a mut DynamicMessage {
        self.copy(destination, source, Selection::NonDefault)
    }

    /// Like [`Mapper::populate`], restricted to source fields carrying the `marker` option.
    pub fn populate_from_fields_with_marker<'a>(
        &self,
        destination: &'a mut DynamicMessage,
        source: &impl ReflectMessage,
        marker: &ExtensionDescriptor,
    ) -> &'a mut DynamicMessage {
        self.copy(destination, source, Selection::Marked(marker))
    }

    /// Creates a default `T` and populates it from `source`.
    pub fn translate_to<T>(&self, source: &impl ReflectMessage) -> Result<T, MapError>
    where
        T: ReflectMessage + Default,
    {
        let mut target = T::default().transcode_to_dynamic();
        self.populate(&mut target, source);

        target
            .transcode_to::<T>()
            .map_err(|source| MapError::Transcode {
                message: target.descriptor().full_name().to_string(),
                source,
            })
    }

    /// Creates an empty message of type `descriptor` and populates it from `source`.
    pub fn translate_to_dynamic(
        &self,
        descriptor: MessageDescriptor,
        source: &impl ReflectMessage,
    ) -> DynamicMessage {
        let mut target = DynamicMessage::new(descriptor);
        self.populate(&mut target, source);
        target
    }

    fn copy<'a>(
        &self,
        destination: &'a mut DynamicMessage,
        source: &impl ReflectMessage,
        selection: Selection<'_>,
    ) -> &'a mut DynamicMessage {
        let source = source.transcode_to_dynamic();
        let plan = self.plan(&source.descriptor(), &destination.descriptor());

        for pair in plan.pairs() {
            if let Selection::Marked(marker) = selection {
                if metadata::first_field_attribute(&pair.source, marker, true).is_none() {
                    continue;
                }
            }

            if !source.has_field(&pair.source) {
                if !matches!(selection, Selection::NonDefault) {
                    destination.clear_field(&pair.target);
                }
                continue;
            }

            let value = source.get_field(&pair.source);

            if matches!(selection, Selection::NonDefault)
                && *value == Value::default_value_for_field(&pair.source)
            {
                continue;
            }

            if let Err(error) = destination.try_set_field(&pair.target, value.into_owned()) {
                trace!(field = pair.target.name(), %error, "Skipping field that cannot be set");
            }
        }

        destination
    }
}

/// Chainable population methods for [`DynamicMessage`], backed by [`Mapper::global`].
pub trait PopulateExt {
    fn populate_with(&mut self, source: &impl ReflectMessage) -> &mut Self;

    fn populate_with_non_default(&mut self, source: &impl ReflectMessage) -> &mut Self;

    fn populate_from_fields_with_marker(
        &mut self,
        source: &impl ReflectMessage,
        marker: &ExtensionDescriptor,
    ) -> &mut Self;
}

impl PopulateExt for DynamicMessage {
    fn populate_with(&mut self, source: &impl ReflectMessage) -> &mut Self {
        Mapper::global().populate(self, source)
    }

    fn populate_with_non_default(&mut self, source: &impl ReflectMessage) -> &mut Self {
        Mapper::global().populate_non_default(self, source)
    }

    fn populate_from_fields_with_marker(
        &mut self,
        source: &impl ReflectMessage,
        marker: &ExtensionDescriptor,
    ) -> &mut Self {
        Mapper::global().populate_from_fields_with_marker(self, source, marker)
    }
}

/// Creates a default `T` populated from `source`, using [`Mapper::global`].
pub fn translate_to<T>(source: &impl ReflectMessage) -> Result<T, MapError>
where
    T: ReflectMessage + Default,
{
    Mapper::global().translate_to(source)
}

/// Creates a message of type `descriptor` populated from `source`, using [`Mapper::global`].
pub fn translate_to_dynamic(
    descriptor: MessageDescriptor,
    source: &impl ReflectMessage,
) -> DynamicMessage {
    Mapper::global().translate_to_dynamic(descriptor, source)
}
