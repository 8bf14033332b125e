use prost_reflect::{FieldDescriptor, Kind, MessageDescriptor};
use tracing::trace;

/// A source field and the destination field it is copied into.
#[derive(Debug, Clone)]
pub struct FieldPair {
    pub source: FieldDescriptor,
    pub target: FieldDescriptor,
}

/// The fields two message types have in common.
///
/// Fields match when their names are equal and their kinds are compatible: same scalar or
/// message type, same cardinality. Maps match on their key and value kinds.
#[derive(Debug, Clone)]
pub struct MappingPlan {
    source: MessageDescriptor,
    target: MessageDescriptor,
    pairs: Vec<FieldPair>,
}

impl MappingPlan {
    pub fn build(source: &MessageDescriptor, target: &MessageDescriptor) -> Self {
        let pairs = source
            .fields()
            .filter_map(|source_field| {
                let target_field = target.get_field_by_name(source_field.name())?;

                if !kinds_compatible(&source_field, &target_field) {
                    trace!(
                        field = source_field.name(),
                        source = source.full_name(),
                        target = target.full_name(),
                        "Skipping field with incompatible kinds"
                    );
                    return None;
                }

                Some(FieldPair {
                    source: source_field,
                    target: target_field,
                })
            })
            .collect();

        Self {
            source: source.clone(),
            target: target.clone(),
            pairs,
        }
    }

    /// Whether this plan was built for exactly these descriptors.
    pub fn is_for(&self, source: &MessageDescriptor, target: &MessageDescriptor) -> bool {
        self.source == *source && self.target == *target
    }

    pub fn pairs(&self) -> &[FieldPair] {
        &self.pairs
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|pair| pair.source.name())
    }
}

fn kinds_compatible(source: &FieldDescriptor, target: &FieldDescriptor) -> bool {
    if source.is_map() || target.is_map() {
        return source.is_map() && target.is_map() && map_kinds_compatible(source, target);
    }

    source.is_list() == target.is_list() && source.kind() == target.kind()
}

fn map_kinds_compatible(source: &FieldDescriptor, target: &FieldDescriptor) -> bool {
    match (source.kind(), target.kind()) {
        (Kind::Message(source_entry), Kind::Message(target_entry)) => {
            source_entry.map_entry_key_field().kind() == target_entry.map_entry_key_field().kind()
                && source_entry.map_entry_value_field().kind()
                    == target_entry.map_entry_value_field().kind()
        }
        _ => false,
    }
}
