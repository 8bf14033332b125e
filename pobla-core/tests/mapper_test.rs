use fixture_protos::DESCRIPTOR_POOL;
use fixture_protos::pb::fixtures::{Address, User, UserPatch, UserSummary};
use pobla_core::mapper::Mapper;
use pobla_core::prost_reflect::{DynamicMessage, ReflectMessage, Value};
use pobla_core::{PopulateExt, translate_to, translate_to_dynamic};
use std::sync::Arc;

fn ada() -> User {
    User {
        id: "u-1".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        age: 36,
        active: true,
        score: Some(12),
        tags: vec!["admin".to_string()],
        address: Some(Address {
            city: "London".to_string(),
            country: "UK".to_string(),
        }),
    }
}

#[test]
fn test_populate_copies_matching_fields() {
    let mut summary = UserSummary {
        age: 7,
        nickname: "countess".to_string(),
        ..UserSummary::default()
    }
    .transcode_to_dynamic();

    summary.populate_with(&ada());
    let summary: UserSummary = summary.transcode_to().unwrap();

    assert_eq!(summary.id, "u-1");
    assert_eq!(summary.name, "Ada");
    assert_eq!(summary.address.unwrap().city, "London");
    // `age` is int32 on `User` and int64 on `UserSummary`.
    assert_eq!(summary.age, 7);
    // Only present on the destination.
    assert_eq!(summary.nickname, "countess");
}

#[test]
fn test_populate_resets_fields_unset_in_source() {
    let mut patch = UserPatch {
        score: Some(3),
        tags: vec!["stale".to_string()],
        ..UserPatch::default()
    }
    .transcode_to_dynamic();

    let source = User {
        name: "Grace".to_string(),
        ..User::default()
    };

    patch.populate_with(&source);
    let patch: UserPatch = patch.transcode_to().unwrap();

    assert_eq!(patch.name, "Grace");
    assert_eq!(patch.score, None);
    assert!(patch.tags.is_empty());
}

#[test]
fn test_populate_non_default_keeps_destination_values() {
    let mut stored = UserPatch {
        name: "Old".to_string(),
        email: "keep@example.com".to_string(),
        age: 40,
        active: true,
        score: Some(9),
        tags: vec!["keep".to_string()],
    }
    .transcode_to_dynamic();

    let update = User {
        name: "New".to_string(),
        // Explicitly set, but still the default value.
        score: Some(0),
        ..User::default()
    };

    stored.populate_with_non_default(&update);
    let stored: UserPatch = stored.transcode_to().unwrap();

    assert_eq!(stored.name, "New");
    assert_eq!(stored.email, "keep@example.com");
    assert_eq!(stored.age, 40);
    assert!(stored.active);
    assert_eq!(stored.score, Some(9));
    assert_eq!(stored.tags, vec!["keep".to_string()]);
}

#[test]
fn test_populate_from_fields_with_marker() {
    let audited = DESCRIPTOR_POOL
        .get_extension_by_name("fixtures.audited")
        .unwrap();

    let mut patch = UserPatch {
        age: 50,
        ..UserPatch::default()
    }
    .transcode_to_dynamic();

    patch.populate_from_fields_with_marker(&ada(), &audited);
    let patch: UserPatch = patch.transcode_to().unwrap();

    assert_eq!(patch.name, "Ada");
    assert_eq!(patch.email, "ada@example.com");
    assert_eq!(patch.age, 50);
    assert!(!patch.active);
}

#[test]
fn test_marker_of_another_option_kind_copies_nothing() {
    let table = DESCRIPTOR_POOL
        .get_extension_by_name("fixtures.table")
        .unwrap();

    let mut patch = UserPatch::default().transcode_to_dynamic();
    patch.populate_from_fields_with_marker(&ada(), &table);

    assert_eq!(patch.transcode_to::<UserPatch>().unwrap(), UserPatch::default());
}

#[test]
fn test_translate_to_matches_populate() {
    let user = ada();

    let translated: UserPatch = translate_to(&user).unwrap();

    let mut populated = UserPatch::default().transcode_to_dynamic();
    populated.populate_with(&user);

    assert_eq!(translated, populated.transcode_to::<UserPatch>().unwrap());
    assert_eq!(translated.name, "Ada");
    assert_eq!(translated.score, Some(12));
}

#[test]
fn test_translate_to_dynamic() {
    let descriptor = DESCRIPTOR_POOL
        .get_message_by_name("fixtures.UserSummary")
        .unwrap();

    let summary = translate_to_dynamic(descriptor, &ada());

    assert_eq!(
        summary.get_field_by_name("name").unwrap().as_ref(),
        &Value::String("Ada".to_string())
    );
    assert_eq!(
        summary.get_field_by_name("age").unwrap().as_ref(),
        &Value::I64(0)
    );
}

#[test]
fn test_dynamic_source_and_chaining() {
    let user_descriptor = DESCRIPTOR_POOL.get_message_by_name("fixtures.User").unwrap();
    let mut source = DynamicMessage::new(user_descriptor);
    source.set_field_by_name("name", Value::String("Lin".to_string()));
    source.set_field_by_name("age", Value::I32(29));

    let update = User {
        email: "lin@example.com".to_string(),
        ..User::default()
    };

    let mut patch = UserPatch::default().transcode_to_dynamic();
    patch
        .populate_with(&source)
        .populate_with_non_default(&update);

    let patch: UserPatch = patch.transcode_to().unwrap();

    assert_eq!(patch.name, "Lin");
    assert_eq!(patch.age, 29);
    assert_eq!(patch.email, "lin@example.com");
}

#[test]
fn test_plans_are_cached_per_type_pair() {
    let mapper = Mapper::new();
    let user = DESCRIPTOR_POOL.get_message_by_name("fixtures.User").unwrap();
    let summary = DESCRIPTOR_POOL
        .get_message_by_name("fixtures.UserSummary")
        .unwrap();

    let first = mapper.plan(&user, &summary);
    let second = mapper.plan(&user, &summary);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        first.field_names().collect::<Vec<_>>(),
        vec!["id", "name", "address"]
    );

    let reverse = mapper.plan(&summary, &user);
    assert!(!Arc::ptr_eq(&first, &reverse));
}

#[test]
fn test_mapper_instance_translates() {
    let mapper = Mapper::new();

    let summary: UserSummary = mapper.translate_to(&ada()).unwrap();

    assert_eq!(summary.id, "u-1");
    assert_eq!(summary.age, 0);
}
