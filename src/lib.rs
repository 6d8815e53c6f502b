//! Host-interop bridge for an embedded scripting engine.
//!
//! Script code reads, writes, calls and constructs statically typed host
//! values as if they were native script objects. Host types are described
//! once with [`host::TypeBuilder`]; the [`Engine`] wraps instances and
//! types on demand, resolves members lazily through a shared
//! [`ResolutionCache`], and converts values in both directions.
//!
//! ```
//! use hostbridge::{Engine, ScriptValue};
//! use hostbridge::host::{ParamEntry, TypeBuilder, primitive_type};
//! use hostbridge::PrimitiveKind;
//!
//! struct Counter {
//!     hits: i32,
//! }
//!
//! let counter = TypeBuilder::<Counter>::class("Docs.Counter")
//!     .constructor([primitive_type(PrimitiveKind::Int32)], |call| {
//!         Ok(Counter { hits: call.arg(0)? })
//!     })
//!     .property("Hits", |c: &Counter| c.hits)
//!     .build();
//!
//! let engine = Engine::default();
//! let ctor = ScriptValue::Object(engine.type_reference(counter));
//! let made = engine.construct(&ctor, &[ScriptValue::from(3)]).unwrap();
//! assert_eq!(engine.get_member(&made, "hits").unwrap(), ScriptValue::from(3));
//! ```

pub mod cache;
pub mod engine;
pub mod error;
pub mod host;
pub mod interop;
pub mod names;
pub mod options;
pub mod primitive_kind;
pub mod resolver;
pub mod script;
pub mod type_hash;

pub use cache::ResolutionCache;
pub use engine::Engine;
pub use error::{BridgeError, BridgeResult, ConversionError, HostError, InvocationError};
pub use options::InteropOptions;
pub use primitive_kind::PrimitiveKind;
pub use resolver::{MemberScope, ResolvedMember};
pub use script::ScriptValue;
pub use type_hash::TypeHash;
