//! Named native-object state for command-driven hosts.
//!
//! objstate lets a host that speaks in words and command names keep native
//! Rust objects alive between commands. A [`Context`] owns a
//! [`VariableStore`] of type-erased [`Handle`]s and a [`TypeRegistry`] of
//! native types. Every object gets a generated name that is also bound as a
//! command in the host, so a script can drive it directly:
//!
//! ```text
//! set c [cobj create counter 10]   ;# -> cobj#0000
//! $c incr 5                        ;# -> 15
//! $c type                          ;# -> counter
//! cobj delete $c
//! ```
//!
//! # Crates
//!
//! - `objstate-core` - type hashing, handles, the variable store, errors
//! - `objstate-registry` - the type registry and native callables
//! - `objstate-modules` - bundled `counter` and `dict` types
//!
//! # Quick Start
//!
//! ```
//! use objstate::{Context, Interp, StateConfig, Value};
//!
//! let mut ctx = Context::new(StateConfig::default()).unwrap();
//! ctx.register_type(
//!     "greeting",
//!     |args| {
//!         let who: String = args.arg_or(0, "world".to_string())?;
//!         args.wrap(who)
//!     },
//!     |call| match call.subcommand() {
//!         "say" => Ok(Value::Str(format!("hello {}", call.this::<String>()?))),
//!         _ => Err(call.unknown_subcommand(&["say"])),
//!     },
//! )
//! .unwrap();
//!
//! let mut interp = Interp::new();
//! interp.install(ctx).unwrap();
//! let name = interp.eval("cobj create greeting rust").unwrap().to_string();
//! assert_eq!(interp.eval(&format!("{name} say")).unwrap().to_string(), "hello rust");
//! ```

pub mod config;
pub mod context;
pub mod host;
pub mod interp;

pub use config::{DEFAULT_COMMAND_NAME, DEFAULT_SUFFIX_WIDTH, StateConfig};
pub use context::{Context, INSTANCE_SUBCOMMANDS, ROOT_SUBCOMMANDS};
pub use host::{CommandHost, CommandTable, Route};
pub use interp::{Interp, split_words};

pub use objstate_core::{
    ConversionError, ErrorKind, FromArg, FromArgs, Handle, IntoValue, Overwrite, StateError,
    StateResult, TypeHash, Value, VariableStore, fnv1a,
};
pub use objstate_registry::{
    CreateArgs, DEFAULT_TYPE_CAPACITY, InstanceCall, NativeConstructor, NativeDispatcher,
    RegisteredType, TypeRegistry,
};
