//! Host object wrapper behavior as seen through the engine hooks.

mod common;

use common::*;
use hostbridge::host::{HostRef, HostValue, TypeBuilder};
use hostbridge::script::ScriptObject;
use hostbridge::{Engine, InteropOptions, InvocationError, ScriptValue};

fn obj_value(obj: &hostbridge::script::ObjectRef) -> ScriptValue {
    ScriptValue::Object(obj.clone())
}

#[test]
fn reads_host_properties() {
    init_tracing();
    let engine = Engine::default();
    let (obj, _) = wrap_test_object(&engine);
    let this = obj_value(&obj);

    assert_eq!(engine.get_member(&this, "TestProperty1"), Ok(ScriptValue::from(77)));
    assert_eq!(engine.get_member(&this, "StringProperty"), Ok(ScriptValue::from("hello")));
    assert_eq!(engine.get_member(&this, "BoolProperty"), Ok(ScriptValue::from(true)));
    assert_eq!(engine.get_member(&this, "NullProperty"), Ok(ScriptValue::Null));
    assert_eq!(engine.get_member(&this, "DoubleProperty"), Ok(ScriptValue::from(55.5)));
    assert_eq!(engine.get_member(&this, "NoSuchMember"), Ok(ScriptValue::Undefined));
}

#[test]
fn names_are_case_insensitive() {
    let engine = Engine::default();
    let (obj, _) = wrap_test_object(&engine);
    let this = obj_value(&obj);

    for name in ["TestMethod1", "testMethod1", "testmethod1", "TESTMETHOD1"] {
        assert_eq!(engine.call_method(&this, name, &[]), Ok(ScriptValue::from(12)));
    }
    assert_eq!(
        engine.call_method(&this, "testmethod2", &[ScriptValue::from(3), ScriptValue::from(4)]),
        Ok(ScriptValue::from(12))
    );
    assert_eq!(engine.get_member(&this, "testproperty1"), Ok(ScriptValue::from(77)));
}

#[test]
fn writes_reach_the_host_instance() {
    let engine = Engine::default();
    let (obj, target) = wrap_test_object(&engine);

    engine.set_member(&obj, "TestProperty1", ScriptValue::from(5)).unwrap();
    engine.set_member(&obj, "counter", ScriptValue::from(8)).unwrap();

    assert_eq!(target.with(|o: &TestNetObject| o.test_property1), Ok(5));
    assert_eq!(target.with(|o: &TestNetObject| o.counter), Ok(8));
    assert_eq!(engine.get_member(&obj_value(&obj), "Counter"), Ok(ScriptValue::from(8)));
}

#[test]
fn overloads_pick_the_closest_parameter_types() {
    let engine = Engine::default();
    let (obj, _) = wrap_test_object(&engine);
    let this = obj_value(&obj);

    assert_eq!(
        engine.call_method(&this, "Describe", &[ScriptValue::from(1)]),
        Ok(ScriptValue::from("int"))
    );
    assert_eq!(
        engine.call_method(&this, "Describe", &[ScriptValue::from("x")]),
        Ok(ScriptValue::from("string"))
    );
}

#[test]
fn optional_parameters_take_their_defaults() {
    let engine = Engine::default();
    let (obj, _) = wrap_test_object(&engine);
    let this = obj_value(&obj);

    assert_eq!(engine.call_method(&this, "Scale", &[ScriptValue::from(3)]), Ok(ScriptValue::from(30)));
    assert_eq!(
        engine.call_method(&this, "Scale", &[ScriptValue::from(3), ScriptValue::from(2)]),
        Ok(ScriptValue::from(6))
    );
}

#[test]
fn failing_host_methods_surface_as_type_errors() {
    init_tracing();
    let engine = Engine::default();
    let (obj, _) = wrap_test_object(&engine);
    let this = obj_value(&obj);

    let err = engine.call_method(&this, "Fail", &[]).unwrap_err();
    assert!(err.is_type_error());
    assert!(matches!(
        err.as_invocation(),
        Some(InvocationError::NoMatchingMethod { name, .. }) if name == "Fail"
    ));

    let err = engine.call_method(&this, "Explode", &[]).unwrap_err();
    assert!(err.to_string().starts_with("TypeError:"));

    let err = engine
        .call_method(&this, "TestMethod2", &[ScriptValue::from("a"), ScriptValue::from(1)])
        .unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn returned_host_objects_are_wrapped() {
    let engine = Engine::default();
    let (obj, _) = wrap_test_object(&engine);

    let encoding = engine.call_method(&obj_value(&obj), "getEncoding", &[]).unwrap();
    let wrapped = encoding.as_object().expect("wrapped encoding");
    assert_eq!(wrapped.class_name(), "Fixtures.Encoding");
    assert_eq!(engine.get_member(&encoding, "EncodingName"), Ok(ScriptValue::from("utf-8")));
}

#[test]
fn script_value_fields_pass_through() {
    let engine = Engine::default();
    let (obj, _) = wrap_test_object(&engine);
    let payload = ScriptValue::Object(engine.new_object());

    engine.set_member(&obj, "payload", payload.clone()).unwrap();
    assert_eq!(engine.get_member(&obj_value(&obj), "Payload"), Ok(payload));
}

#[test]
fn delete_then_read_is_undefined() {
    let engine = Engine::default();
    let (obj, target) = wrap_test_object(&engine);
    let this = obj_value(&obj);

    assert_eq!(engine.delete_member(&obj, "TestProperty1"), Ok(true));
    assert_eq!(engine.get_member(&this, "TestProperty1"), Ok(ScriptValue::Undefined));
    assert_eq!(engine.get_member(&this, "testproperty1"), Ok(ScriptValue::Undefined));
    assert_eq!(target.with(|o: &TestNetObject| o.test_property1), Ok(77));

    assert_eq!(engine.delete_member(&obj, "NeverResolved"), Ok(true));
}

#[test]
fn delete_then_write_severs_the_binding() {
    let engine = Engine::default();
    let (obj, target) = wrap_test_object(&engine);
    let this = obj_value(&obj);

    engine.delete_member(&obj, "TestProperty1").unwrap();
    engine.set_member(&obj, "TestProperty1", ScriptValue::from("hh")).unwrap();

    assert_eq!(engine.get_member(&this, "TestProperty1"), Ok(ScriptValue::from("hh")));
    assert_eq!(target.with(|o: &TestNetObject| o.test_property1), Ok(77));

    engine.set_member(&obj, "TestProperty1", ScriptValue::from(1)).unwrap();
    assert_eq!(engine.get_member(&this, "TestProperty1"), Ok(ScriptValue::from(1)));
    assert_eq!(target.with(|o: &TestNetObject| o.test_property1), Ok(77));
}

#[test]
fn methods_can_be_replaced() {
    let engine = Engine::default();
    let (obj, _) = wrap_test_object(&engine);
    let this = obj_value(&obj);

    let replacement = engine.new_function("replacement", |_, _, _| Ok(ScriptValue::from(99)));
    engine
        .set_member(&obj, "TestMethod1", ScriptValue::Object(replacement))
        .unwrap();
    assert_eq!(engine.call_method(&this, "testmethod1", &[]), Ok(ScriptValue::from(99)));

    let other = wrap_test_object(&engine).0;
    assert_eq!(engine.call_method(&obj_value(&other), "TestMethod1", &[]), Ok(ScriptValue::from(12)));
}

#[test]
fn unknown_writes_are_silent_by_default() {
    let engine = Engine::default();
    let (obj, _) = wrap_test_object(&engine);

    engine.set_member(&obj, "Extra", ScriptValue::from(1)).unwrap();
    assert_eq!(engine.get_member(&obj_value(&obj), "Extra"), Ok(ScriptValue::Undefined));
}

#[test]
fn strict_unknown_writes_fail() {
    let engine = Engine::new(InteropOptions::new().with_strict(true));
    let (obj, _) = wrap_test_object(&engine);

    let err = engine.set_member(&obj, "Extra", ScriptValue::from(1)).unwrap_err();
    assert!(matches!(err.as_invocation(), Some(InvocationError::UnknownMember { .. })));

    let err = engine.set_member(&obj, "StringProperty", ScriptValue::from("x")).unwrap_err();
    assert!(matches!(err.as_invocation(), Some(InvocationError::ReadOnly { .. })));
}

#[test]
fn expando_members_are_kept() {
    init_tracing();
    let engine = Engine::new(InteropOptions::new().with_expando_members(true));
    let (obj, _) = wrap_test_object(&engine);

    engine.set_member(&obj, "Extra", ScriptValue::from(1)).unwrap();
    assert_eq!(engine.get_member(&obj_value(&obj), "extra"), Ok(ScriptValue::from(1)));
}

#[test]
fn property_writes_shadow_on_conversion_failure() {
    init_tracing();
    let engine = Engine::default();
    let (obj, target) = wrap_test_object(&engine);
    let this = obj_value(&obj);

    engine.set_member(&obj, "Level", ScriptValue::from("abc")).unwrap();
    assert_eq!(engine.get_member(&this, "Level"), Ok(ScriptValue::from("abc")));
    assert_eq!(target.with(|o: &TestNetObject| o.level), Ok(1));

    engine.set_member(&obj, "Level", ScriptValue::from(4)).unwrap();
    assert_eq!(engine.get_member(&this, "Level"), Ok(ScriptValue::from(4)));
    assert_eq!(target.with(|o: &TestNetObject| o.level), Ok(4));
}

#[test]
fn field_writes_fail_on_conversion_failure() {
    let engine = Engine::default();
    let (obj, target) = wrap_test_object(&engine);

    let err = engine.set_member(&obj, "Counter", ScriptValue::from("abc")).unwrap_err();
    assert!(err.as_conversion().is_some());
    assert_eq!(engine.get_member(&obj_value(&obj), "Counter"), Ok(ScriptValue::from(0)));
    assert_eq!(target.with(|o: &TestNetObject| o.counter), Ok(0));
}

#[test]
fn length_tracks_the_collection() {
    let engine = Engine::default();
    let (list, target) = wrap_int_list(&engine, &[1, 2, 3]);
    let this = obj_value(&list);

    assert!(list.is_array_like());
    assert_eq!(engine.get_member(&this, "length"), Ok(ScriptValue::from(3)));

    engine.call_method(&this, "Add", &[ScriptValue::from(4)]).unwrap();
    assert_eq!(engine.get_member(&this, "length"), Ok(ScriptValue::from(4)));

    target.with_mut(|l: &mut IntList| l.items.truncate(1)).unwrap();
    assert_eq!(engine.get_member(&this, "length"), Ok(ScriptValue::from(1)));

    let desc = list.get_own_property(&engine, "length").unwrap().expect("length slot");
    assert!(!desc.is_writable());
    assert!(!desc.is_configurable());
}

#[test]
fn length_is_read_only() {
    let lenient = Engine::default();
    let (list, _) = wrap_int_list(&lenient, &[1, 2, 3]);
    lenient.set_member(&list, "length", ScriptValue::from(10)).unwrap();
    assert_eq!(lenient.get_member(&obj_value(&list), "length"), Ok(ScriptValue::from(3)));

    let strict = Engine::new(InteropOptions::new().with_strict(true));
    let (list, _) = wrap_int_list(&strict, &[1, 2, 3]);
    assert!(strict.set_member(&list, "length", ScriptValue::from(10)).is_err());
}

#[test]
fn indexers_read_and_write_elements() {
    let engine = Engine::default();
    let (list, target) = wrap_int_list(&engine, &[10, 20, 30]);
    let this = obj_value(&list);

    assert_eq!(engine.get_member(&this, "1"), Ok(ScriptValue::from(20)));
    assert_eq!(engine.get_member(&this, "7"), Ok(ScriptValue::Undefined));

    engine.set_member(&list, "0", ScriptValue::from(5)).unwrap();
    assert_eq!(target.with(|l: &IntList| l.items.clone()), Ok(vec![5, 20, 30]));
    assert!(engine.set_member(&list, "7", ScriptValue::from(1)).is_err());
}

#[test]
fn string_keyed_indexers_treat_missing_keys_as_undefined() {
    let engine = Engine::default();
    let settings = engine.wrap(hostbridge::host::HostRef::new(settings_type(), Settings::default()));
    let this = obj_value(&settings);

    assert_eq!(engine.get_member(&this, "alpha"), Ok(ScriptValue::Undefined));
    engine.set_member(&settings, "alpha", ScriptValue::from(5)).unwrap();
    assert_eq!(engine.get_member(&this, "alpha"), Ok(ScriptValue::from(5)));
    assert!(engine.array_like_values(&settings).is_err());
}

#[test]
fn wrapped_collections_spread() {
    let engine = Engine::default();
    let (list, _) = wrap_int_list(&engine, &[1, 2, 3]);
    assert_eq!(
        engine.array_like_values(&list),
        Ok(vec![ScriptValue::from(1), ScriptValue::from(2), ScriptValue::from(3)])
    );
}

#[test]
fn script_arrays_convert_for_array_parameters() {
    let engine = Engine::default();
    let (list, target) = wrap_int_list(&engine, &[]);
    let values = engine.new_array(vec![ScriptValue::from(4), ScriptValue::from(5)]);

    engine
        .call_method(&obj_value(&list), "AddAll", &[ScriptValue::Object(values)])
        .unwrap();
    assert_eq!(target.with(|l: &IntList| l.items.clone()), Ok(vec![4, 5]));
}

#[test]
fn explicit_interface_members() {
    let engine = Engine::default();
    let explicit = engine.wrap(hostbridge::host::HostRef::new(explicit_type(), Explicit));
    let this = obj_value(&explicit);

    assert_eq!(engine.get_member(&this, "Only"), Ok(ScriptValue::from("first")));
    assert_eq!(engine.call_method(&this, "ping", &[]), Ok(ScriptValue::from("pong")));
    // Declared by both interfaces, so it never picks one.
    assert_eq!(engine.get_member(&this, "Code"), Ok(ScriptValue::Undefined));
}

#[test]
fn resolution_is_stable_across_cold_and_warm_caches() {
    let engine = Engine::new(InteropOptions::new().with_isolated_cache(true));
    assert!(engine.cache().is_empty());

    let (first, _) = wrap_test_object(&engine);
    let cold = engine.get_member(&obj_value(&first), "TestProperty1");
    let cached = engine.cache().len();
    assert!(cached > 0);

    let (second, _) = wrap_test_object(&engine);
    let warm = engine.get_member(&obj_value(&second), "TestProperty1");
    assert_eq!(cold, warm);
    assert_eq!(engine.cache().len(), cached);

    engine.set_member(&second, "TestProperty1", ScriptValue::from(3)).unwrap();
    engine.set_member(&first, "TestProperty1", ScriptValue::from(3)).unwrap();
    assert_eq!(
        engine.get_member(&obj_value(&first), "TestProperty1"),
        engine.get_member(&obj_value(&second), "TestProperty1")
    );
}

#[test]
fn wrappers_unwrap_to_the_same_instance() {
    let engine = Engine::default();
    let (obj, target) = wrap_test_object(&engine);

    match engine.to_host(&obj_value(&obj), None).unwrap() {
        HostValue::Object(r) => assert!(r.ptr_eq(&target)),
        other => panic!("expected host object, got {other:?}"),
    }
}

#[test]
fn failed_overloads_fall_back_to_the_next_candidate() {
    init_tracing();
    let engine = Engine::default();
    let (obj, target) = wrap_ledger(&engine);
    let this = obj_value(&obj);

    // (int) ranks first and errors, (double) runs.
    assert_eq!(
        engine.call_method(&this, "Record", &[ScriptValue::from(5)]),
        Ok(ScriptValue::from(1))
    );
    // (string) ranks first and panics, (int) errors, (double) runs.
    assert_eq!(
        engine.call_method(&this, "record", &[ScriptValue::from("7")]),
        Ok(ScriptValue::from(2))
    );

    assert_eq!(
        target.with(|l: &Ledger| l.entries.clone()),
        Ok(vec!["double".to_string(); 2])
    );
    assert_eq!(engine.get_member(&this, "Count"), Ok(ScriptValue::from(2)));
}

#[test]
fn same_named_types_resolve_their_own_members() {
    struct FieldBacked {
        x: i32,
    }
    struct PropertyBacked;

    let engine = Engine::default();
    let first = TypeBuilder::<FieldBacked>::class("WrapperTests.Config")
        .field(
            "X",
            |c: &FieldBacked| c.x,
            |c: &mut FieldBacked, v: i32| c.x = v,
        )
        .build();
    let second = TypeBuilder::<PropertyBacked>::class("WrapperTests.Config")
        .property("X", |_: &PropertyBacked| 2)
        .build();
    assert_ne!(first, second);

    let a = ScriptValue::Object(engine.wrap(HostRef::new(first, FieldBacked { x: 1 })));
    let b = ScriptValue::Object(engine.wrap(HostRef::new(second, PropertyBacked)));
    assert_eq!(engine.get_member(&a, "x"), Ok(ScriptValue::from(1)));
    assert_eq!(engine.get_member(&b, "x"), Ok(ScriptValue::from(2)));
    assert_eq!(engine.get_member(&a, "X"), Ok(ScriptValue::from(1)));
}
