//! # Type Metadata
//!
//! Protobuf has neither inheritance nor generics, so both are declared with the custom
//! options of `pobla/options.proto`:
//!
//! ```proto
//! import "pobla/options.proto";
//!
//! message Page {
//!   option (pobla.type_params) = "T";      // a generic template
//! }
//!
//! message UserPage {
//!   option (pobla.base) = "my.package.Page"; // derives from Page
//! }
//!
//! message UserList {
//!   option (pobla.generic_definition) = "my.package.Page"; // an instance of Page
//! }
//! ```
//!
//! The options are resolved in the descriptor pool of the inspected message. A pool that does
//! not know them simply has no base types and no generics.
//!
//! Annotations ("attributes") are any other custom option. [`first_message_attribute`] and
//! [`first_field_attribute`] return the first value found, optionally walking up the base
//! chain.
use prost_reflect::{DynamicMessage, ExtensionDescriptor, FieldDescriptor, MessageDescriptor, Value};
use std::collections::HashSet;

pub const BASE_OPTION: &str = "pobla.base";
pub const TYPE_PARAMS_OPTION: &str = "pobla.type_params";
pub const GENERIC_DEFINITION_OPTION: &str = "pobla.generic_definition";

const MESSAGE_OPTIONS: &str = "google.protobuf.MessageOptions";
const FIELD_OPTIONS: &str = "google.protobuf.FieldOptions";

/// Iterator over the base chain of a message, nearest base first.
///
/// Ends at the first base that is not declared, not in the pool, or already visited.
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<MessageDescriptor>,
    visited: HashSet<String>,
}

impl Iterator for Ancestors {
    type Item = MessageDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        if !self.visited.insert(current.full_name().to_string()) {
            return None;
        }

        self.next = base_type(&current);
        Some(current)
    }
}

/// The ancestors of `message`, excluding the message itself.
pub fn ancestors(message: &MessageDescriptor) -> Ancestors {
    Ancestors {
        next: base_type(message),
        visited: HashSet::from([message.full_name().to_string()]),
    }
}

/// The message `message` declares as its base with `(pobla.base)`.
pub fn base_type(message: &MessageDescriptor) -> Option<MessageDescriptor> {
    let name = string_option(message, BASE_OPTION)?;
    message.parent_pool().get_message_by_name(&name)
}

/// The type parameters a generic template declares. Empty for other messages.
pub fn type_params(message: &MessageDescriptor) -> Vec<String> {
    let Some(value) = option_value(message, TYPE_PARAMS_OPTION) else {
        return Vec::new();
    };

    value
        .as_list()
        .unwrap_or_default()
        .iter()
        .filter_map(|param| param.as_str().map(str::to_string))
        .collect()
}

/// The first value of `marker` on the options of `message`.
///
/// With `inherit`, the ancestors of `message` are searched too, nearest first. A marker that
/// is not a message option never matches. When the marker is repeated, its first element is
/// returned.
pub fn first_message_attribute(
    message: &MessageDescriptor,
    marker: &ExtensionDescriptor,
    inherit: bool,
) -> Option<Value> {
    if marker.containing_message().full_name() != MESSAGE_OPTIONS {
        return None;
    }

    std::iter::once(message.clone())
        .chain(inherit.then(|| ancestors(message)).into_iter().flatten())
        .find_map(|candidate| first_value(&candidate.options(), marker))
}

/// The first value of `marker` on the options of `field`.
///
/// With `inherit`, the field of the same name in each ancestor of the containing message is
/// searched too, nearest first.
pub fn first_field_attribute(
    field: &FieldDescriptor,
    marker: &ExtensionDescriptor,
    inherit: bool,
) -> Option<Value> {
    if marker.containing_message().full_name() != FIELD_OPTIONS {
        return None;
    }

    let inherited = inherit
        .then(|| {
            ancestors(field.parent_message())
                .filter_map(|ancestor| ancestor.get_field_by_name(field.name()))
        })
        .into_iter()
        .flatten();

    std::iter::once(field.clone())
        .chain(inherited)
        .find_map(|candidate| first_value(&candidate.options(), marker))
}

/// Whether `message` or any of its ancestors is a generic template or an instance of one.
pub fn is_generic_type(message: &MessageDescriptor) -> bool {
    std::iter::once(message.clone())
        .chain(ancestors(message))
        .any(|candidate| is_parameterized(&candidate))
}

/// The unbound template of the first parameterized type in the chain of `message`, starting
/// with `message` itself.
///
/// A template is its own definition; an instance resolves the template it names. Returns
/// `None` when no type in the chain is parameterized or the named template is not in the pool.
pub fn first_generic_type_definition(message: &MessageDescriptor) -> Option<MessageDescriptor> {
    let parameterized = std::iter::once(message.clone())
        .chain(ancestors(message))
        .find(is_parameterized)?;

    if !type_params(&parameterized).is_empty() {
        return Some(parameterized);
    }

    let name = string_option(&parameterized, GENERIC_DEFINITION_OPTION)?;
    parameterized.parent_pool().get_message_by_name(&name)
}

fn is_parameterized(message: &MessageDescriptor) -> bool {
    !type_params(message).is_empty()
        || string_option(message, GENERIC_DEFINITION_OPTION).is_some()
}

fn option_value(message: &MessageDescriptor, option: &str) -> Option<Value> {
    let extension = message.parent_pool().get_extension_by_name(option)?;
    let options = message.options();

    if !options.has_extension(&extension) {
        return None;
    }

    Some(options.get_extension(&extension).into_owned())
}

fn string_option(message: &MessageDescriptor, option: &str) -> Option<String> {
    option_value(message, option)?
        .as_str()
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn first_value(options: &DynamicMessage, marker: &ExtensionDescriptor) -> Option<Value> {
    if !options.has_extension(marker) {
        return None;
    }

    let value = options.get_extension(marker);

    if marker.is_list() {
        return value.as_list()?.first().cloned();
    }

    Some(value.into_owned())
}
