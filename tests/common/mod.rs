//! Shared host-type fixtures for integration tests.
//!
//! Types are built once per process and shared by every test.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::OnceLock;

use hostbridge::host::{
    HostRef, HostType, HostValue, ParamEntry, TypeBuilder, array_type, primitive_type, string_type,
};
use hostbridge::script::ObjectRef;
use hostbridge::{Engine, HostError, PrimitiveKind, ScriptValue};

/// Install a test-writer subscriber once. Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn int() -> HostType {
    primitive_type(PrimitiveKind::Int32)
}

fn no_params() -> Vec<ParamEntry> {
    Vec::new()
}

// ============================================================================
// Reference class with properties, fields and overloaded methods
// ============================================================================

pub struct TestNetObject {
    pub test_property1: i32,
    pub level: i32,
    pub counter: i32,
    pub payload: ScriptValue,
}

impl Default for TestNetObject {
    fn default() -> Self {
        Self {
            test_property1: 77,
            level: 1,
            counter: 0,
            payload: ScriptValue::Undefined,
        }
    }
}

pub struct Encoding {
    pub name: String,
}

pub fn encoding_type() -> HostType {
    static TY: OnceLock<HostType> = OnceLock::new();
    TY.get_or_init(|| {
        TypeBuilder::<Encoding>::class("Fixtures.Encoding")
            .property("EncodingName", |e: &Encoding| e.name.clone())
            .build()
    })
    .clone()
}

pub fn test_object_type() -> HostType {
    static TY: OnceLock<HostType> = OnceLock::new();
    TY.get_or_init(|| {
        TypeBuilder::<TestNetObject>::class("Fixtures.TestNetObject")
            .constructor(no_params(), |_| Ok(TestNetObject::default()))
            .property_rw(
                "TestProperty1",
                |o: &TestNetObject| o.test_property1,
                |o: &mut TestNetObject, v: i32| o.test_property1 = v,
            )
            .property_rw(
                "Level",
                |o: &TestNetObject| o.level,
                |o: &mut TestNetObject, v: i32| o.level = v,
            )
            .property("StringProperty", |_: &TestNetObject| "hello".to_string())
            .property("BoolProperty", |_: &TestNetObject| true)
            .property("NullProperty", |_: &TestNetObject| None::<String>)
            .property("DoubleProperty", |_: &TestNetObject| 55.5f64)
            .field(
                "Counter",
                |o: &TestNetObject| o.counter,
                |o: &mut TestNetObject, v: i32| o.counter = v,
            )
            .field(
                "Payload",
                |o: &TestNetObject| o.payload.clone(),
                |o: &mut TestNetObject, v: ScriptValue| o.payload = v,
            )
            .static_property("StaticProperty1", || 64)
            .method("TestMethod1", no_params(), |_| Ok(HostValue::Int32(12)))
            .method("TestMethod2", [int(), int()], |call| {
                let a: i32 = call.arg(0)?;
                let b: i32 = call.arg(1)?;
                Ok(HostValue::Int32(a * b))
            })
            .method("Describe", [int()], |_| Ok(HostValue::from("int")))
            .method("Describe", [string_type()], |_| Ok(HostValue::from("string")))
            .method(
                "Scale",
                [
                    ParamEntry::new(int()),
                    ParamEntry::optional(int(), || HostValue::Int32(10)),
                ],
                |call| {
                    let a: i32 = call.arg(0)?;
                    let b: i32 = call.arg(1)?;
                    Ok(HostValue::Int32(a * b))
                },
            )
            .method("Fail", no_params(), |_| Err(HostError::message("always fails")))
            .method("Explode", no_params(), |_| -> Result<HostValue, HostError> {
                panic!("host member blew up")
            })
            .method("getEncoding", no_params(), |_| {
                let encoding = Encoding {
                    name: "utf-8".to_string(),
                };
                Ok(HostValue::Object(HostRef::new(encoding_type(), encoding)))
            })
            .static_method("StaticMethod1", no_params(), |_| Ok(HostValue::Int32(66)))
            .build()
    })
    .clone()
}

pub fn wrap_test_object(engine: &Engine) -> (ObjectRef, HostRef) {
    let target = HostRef::new(test_object_type(), TestNetObject::default());
    (engine.wrap(target.clone()), target)
}

// ============================================================================
// Value type with a default instance
// ============================================================================

#[derive(Default)]
pub struct Point2 {
    pub x: i32,
    pub y: i32,
}

pub fn point_type() -> HostType {
    static TY: OnceLock<HostType> = OnceLock::new();
    TY.get_or_init(|| {
        TypeBuilder::<Point2>::value("Fixtures.Point2")
            .default_instance()
            .constructor([int(), int()], |call| {
                Ok(Point2 {
                    x: call.arg(0)?,
                    y: call.arg(1)?,
                })
            })
            .field("X", |p: &Point2| p.x, |p: &mut Point2, v: i32| p.x = v)
            .field("Y", |p: &Point2| p.y, |p: &mut Point2, v: i32| p.y = v)
            .build()
    })
    .clone()
}

// ============================================================================
// Enumeration
// ============================================================================

pub struct Color;

pub fn color_type() -> HostType {
    static TY: OnceLock<HostType> = OnceLock::new();
    TY.get_or_init(|| {
        TypeBuilder::<Color>::enumeration("Fixtures.Color")
            .constant("Red", 0)
            .constant("Green", 1)
            .constant("Blue", 2)
            .build()
    })
    .clone()
}

// ============================================================================
// Countable collection with an integer indexer
// ============================================================================

#[derive(Default)]
pub struct IntList {
    pub items: Vec<i32>,
}

fn slot(list: &IntList, index: i32) -> Result<usize, HostError> {
    usize::try_from(index)
        .ok()
        .filter(|i| *i < list.items.len())
        .ok_or_else(|| HostError::KeyNotFound(index.to_string()))
}

pub fn int_list_type() -> HostType {
    static TY: OnceLock<HostType> = OnceLock::new();
    TY.get_or_init(|| {
        TypeBuilder::<IntList>::class("Fixtures.IntList")
            .countable(|l: &IntList| l.items.len())
            .indexer_rw(
                |l: &IntList, index: i32| slot(l, index).map(|i| l.items[i]),
                |l: &mut IntList, index: i32, value: i32| {
                    let i = slot(l, index)?;
                    l.items[i] = value;
                    Ok(())
                },
            )
            .method("Add", [int()], |call| {
                let value: i32 = call.arg(0)?;
                call.with_this_mut(|l: &mut IntList| l.items.push(value))?;
                Ok(HostValue::Undefined)
            })
            .method("AddAll", [array_type()], |call| {
                let values: Vec<f64> = call.arg(0)?;
                call.with_this_mut(|l: &mut IntList| {
                    l.items.extend(values.iter().map(|v| *v as i32))
                })?;
                Ok(HostValue::Undefined)
            })
            .method("Clear", no_params(), |call| {
                call.with_this_mut(|l: &mut IntList| l.items.clear())?;
                Ok(HostValue::Undefined)
            })
            .build()
    })
    .clone()
}

pub fn wrap_int_list(engine: &Engine, items: &[i32]) -> (ObjectRef, HostRef) {
    let target = HostRef::new(
        int_list_type(),
        IntList {
            items: items.to_vec(),
        },
    );
    (engine.wrap(target.clone()), target)
}

// ============================================================================
// String-keyed dictionary
// ============================================================================

#[derive(Default)]
pub struct Settings {
    pub values: BTreeMap<String, i32>,
}

pub fn settings_type() -> HostType {
    static TY: OnceLock<HostType> = OnceLock::new();
    TY.get_or_init(|| {
        TypeBuilder::<Settings>::class("Fixtures.Settings")
            .indexer_rw(
                |s: &Settings, key: String| {
                    s.values
                        .get(&key)
                        .copied()
                        .ok_or(HostError::KeyNotFound(key))
                },
                |s: &mut Settings, key: String, value: i32| {
                    s.values.insert(key, value);
                    Ok(())
                },
            )
            .build()
    })
    .clone()
}

// ============================================================================
// Explicit interface implementations
// ============================================================================

pub struct Explicit;

pub fn first_interface() -> HostType {
    static TY: OnceLock<HostType> = OnceLock::new();
    TY.get_or_init(|| TypeBuilder::<()>::interface("Fixtures.IFirst").build())
        .clone()
}

pub fn second_interface() -> HostType {
    static TY: OnceLock<HostType> = OnceLock::new();
    TY.get_or_init(|| TypeBuilder::<()>::interface("Fixtures.ISecond").build())
        .clone()
}

pub fn explicit_type() -> HostType {
    static TY: OnceLock<HostType> = OnceLock::new();
    TY.get_or_init(|| {
        let first = first_interface();
        let second = second_interface();
        TypeBuilder::<Explicit>::class("Fixtures.Explicit")
            .explicit_property(&first, "Code", |_: &Explicit| 1)
            .explicit_property(&second, "Code", |_: &Explicit| 2)
            .explicit_property(&first, "Only", |_: &Explicit| "first".to_string())
            .explicit_method(&second, "Ping", no_params(), |_| Ok(HostValue::from("pong")))
            .build()
    })
    .clone()
}

// ============================================================================
// Overloaded constructors
// ============================================================================

pub struct Widget {
    pub kind: String,
    pub size: i32,
}

pub fn widget_type() -> HostType {
    static TY: OnceLock<HostType> = OnceLock::new();
    TY.get_or_init(|| {
        TypeBuilder::<Widget>::class("Fixtures.Widget")
            .constructor([int()], |call| {
                Ok(Widget {
                    kind: "int".to_string(),
                    size: call.arg(0)?,
                })
            })
            .constructor([string_type()], |call| {
                let label: String = call.arg(0)?;
                Ok(Widget {
                    kind: "string".to_string(),
                    size: label.len() as i32,
                })
            })
            .property("Kind", |w: &Widget| w.kind.clone())
            .property("Size", |w: &Widget| w.size)
            .build()
    })
    .clone()
}

// ============================================================================
// Overloads whose best match fails at invocation time
// ============================================================================

#[derive(Default)]
pub struct Ledger {
    pub entries: Vec<String>,
}

fn double() -> HostType {
    primitive_type(PrimitiveKind::Double)
}

/// Constructors and `Record` overloads where the `(int)` candidate returns an
/// error and the `(string)` candidate panics, leaving only `(double)` to
/// succeed.
pub fn ledger_type() -> HostType {
    static TY: OnceLock<HostType> = OnceLock::new();
    TY.get_or_init(|| {
        TypeBuilder::<Ledger>::class("Fixtures.Ledger")
            .constructor([int()], |_| Err(HostError::message("int constructor rejected")))
            .constructor([double()], |_| {
                Ok(Ledger {
                    entries: vec!["double".to_string()],
                })
            })
            .constructor([string_type()], |_| -> Result<Ledger, HostError> {
                panic!("string constructor blew up")
            })
            .method("Record", [int()], |_| Err(HostError::message("int overload rejected")))
            .method("Record", [double()], |call| {
                let len = call.with_this_mut(|l: &mut Ledger| {
                    l.entries.push("double".to_string());
                    l.entries.len()
                })?;
                Ok(HostValue::Int32(len as i32))
            })
            .method("Record", [string_type()], |call| -> Result<HostValue, HostError> {
                call.with_this_mut(|_: &mut Ledger| panic!("string overload blew up"))
            })
            .property("Count", |l: &Ledger| l.entries.len() as i32)
            .build()
    })
    .clone()
}

pub fn wrap_ledger(engine: &Engine) -> (ObjectRef, HostRef) {
    let target = HostRef::new(ledger_type(), Ledger::default());
    (engine.wrap(target.clone()), target)
}
