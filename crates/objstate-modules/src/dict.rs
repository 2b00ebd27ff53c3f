//! `dict` - an insertion-ordered map of strings.
//!
//! ```text
//! cobj create dict ?key value ...?
//! $d set key value
//! $d get key ?default?
//! $d unset key
//! $d has key
//! $d keys
//! $d size
//! $d clear
//! $d merge otherDict
//! ```
//!
//! `merge` looks the other dict up by name in the same context, so it is the
//! bundled example of one object operating on another.

use indexmap::IndexMap;

use objstate_registry::{
    CreateArgs, Handle, InstanceCall, StateError, StateResult, TypeRegistry, Value,
};

/// Registered type name.
pub const TYPE_NAME: &str = "dict";

const SUBCOMMANDS: [&str; 8] = ["clear", "get", "has", "keys", "merge", "set", "size", "unset"];

/// Native state behind a `dict` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dict {
    entries: IndexMap<String, String>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dict from a flat `key value ...` list.
    pub fn from_pairs(words: &[String]) -> StateResult<Self> {
        if let [.., key] = words
            && words.len() % 2 != 0
        {
            return Err(StateError::InvalidArgs(format!(
                "missing value to go with key \"{key}\""
            )));
        }
        let entries = words
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert or replace `key`. Replacing keeps the key's position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove `key`, returning its value.
    pub fn unset(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Copy every entry of `other` into this dict.
    pub fn merge(&mut self, other: &Dict) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }
}

/// Register the `dict` type.
pub fn register(registry: &mut TypeRegistry) -> StateResult<()> {
    registry.register(TYPE_NAME, create, dispatch)
}

fn create(args: &mut CreateArgs<'_>) -> StateResult<Handle> {
    let dict = Dict::from_pairs(args.args())?;
    args.wrap(dict)
}

fn dispatch(call: &mut InstanceCall<'_>) -> StateResult<Value> {
    match call.subcommand() {
        "set" => {
            call.expect_args(2, "key value")?;
            let (key, value): (String, String) = call.parse()?;
            call.this_mut::<Dict>()?.set(key, value.clone());
            Ok(Value::Str(value))
        }
        "get" => {
            if !(1..=2).contains(&call.arg_count()) {
                return Err(call.wrong_args("key ?default?"));
            }
            let key = call.arg::<String>(0)?;
            let default = call.args().get(1).cloned();
            let dict = call.this::<Dict>()?;
            match (dict.get(&key), default) {
                (Some(value), _) => Ok(Value::from(value)),
                (None, Some(default)) => Ok(Value::Str(default)),
                (None, None) => Err(StateError::native(format!(
                    "key \"{key}\" not known in dictionary"
                ))),
            }
        }
        "unset" => {
            call.expect_args(1, "key")?;
            let key = call.arg::<String>(0)?;
            call.this_mut::<Dict>()?.unset(&key);
            Ok(Value::Empty)
        }
        "has" => {
            call.expect_args(1, "key")?;
            let key = call.arg::<String>(0)?;
            Ok(Value::Bool(call.this::<Dict>()?.contains(&key)))
        }
        "keys" => {
            call.expect_args(0, "")?;
            let keys: Vec<&str> = call.this::<Dict>()?.keys().collect();
            Ok(Value::from(keys))
        }
        "size" => {
            call.expect_args(0, "")?;
            Ok(Value::Int(call.this::<Dict>()?.len() as i64))
        }
        "clear" => {
            call.expect_args(0, "")?;
            call.this_mut::<Dict>()?.clear();
            Ok(Value::Empty)
        }
        "merge" => {
            call.expect_args(1, "otherDict")?;
            let other_name = call.arg::<String>(0)?;
            let other = call.resolve::<Dict>(&other_name, TYPE_NAME)?.clone();
            let dict = call.this_mut::<Dict>()?;
            dict.merge(&other);
            Ok(Value::Int(dict.len() as i64))
        }
        _ => Err(call.unknown_subcommand(&SUBCOMMANDS)),
    }
}
