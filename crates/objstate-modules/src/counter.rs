//! `counter` - an integer that steps up and down.
//!
//! ```text
//! cobj create counter ?start? ?step?
//! $c get
//! $c incr ?n?
//! $c decr ?n?
//! $c set value
//! $c reset
//! ```

use objstate_registry::{
    CreateArgs, Handle, InstanceCall, StateError, StateResult, TypeRegistry, Value,
};

/// Registered type name.
pub const TYPE_NAME: &str = "counter";

const SUBCOMMANDS: [&str; 5] = ["decr", "get", "incr", "reset", "set"];

/// Native state behind a `counter` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    start: i64,
    value: i64,
    step: i64,
}

impl Counter {
    /// Create a counter at `start` moving by `step`.
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            start,
            value: start,
            step,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Move up by `times` steps.
    pub fn incr(&mut self, times: i64) -> StateResult<i64> {
        self.advance(times)
    }

    /// Move down by `times` steps.
    pub fn decr(&mut self, times: i64) -> StateResult<i64> {
        let times = times
            .checked_neg()
            .ok_or_else(|| StateError::native("counter overflow"))?;
        self.advance(times)
    }

    pub fn set(&mut self, value: i64) {
        self.value = value;
    }

    /// Return to the starting value.
    pub fn reset(&mut self) {
        self.value = self.start;
    }

    fn advance(&mut self, times: i64) -> StateResult<i64> {
        self.value = times
            .checked_mul(self.step)
            .and_then(|delta| self.value.checked_add(delta))
            .ok_or_else(|| StateError::native("counter overflow"))?;
        Ok(self.value)
    }
}

/// Register the `counter` type.
pub fn register(registry: &mut TypeRegistry) -> StateResult<()> {
    registry.register(TYPE_NAME, create, dispatch)
}

fn create(args: &mut CreateArgs<'_>) -> StateResult<Handle> {
    if args.arg_count() > 2 {
        return Err(args.wrong_args("?start? ?step?"));
    }
    let start = args.arg_or(0, 0i64)?;
    let step = args.arg_or(1, 1i64)?;
    args.wrap(Counter::new(start, step))
}

fn dispatch(call: &mut InstanceCall<'_>) -> StateResult<Value> {
    match call.subcommand() {
        "get" => {
            call.expect_args(0, "")?;
            Ok(Value::Int(call.this::<Counter>()?.value()))
        }
        "incr" | "decr" => {
            if call.arg_count() > 1 {
                return Err(call.wrong_args("?n?"));
            }
            let times = call.arg_or(0, 1i64)?;
            let up = call.subcommand() == "incr";
            let counter = call.this_mut::<Counter>()?;
            let value = if up {
                counter.incr(times)?
            } else {
                counter.decr(times)?
            };
            Ok(Value::Int(value))
        }
        "set" => {
            call.expect_args(1, "value")?;
            let value = call.arg::<i64>(0)?;
            call.this_mut::<Counter>()?.set(value);
            Ok(Value::Int(value))
        }
        "reset" => {
            call.expect_args(0, "")?;
            let counter = call.this_mut::<Counter>()?;
            counter.reset();
            Ok(Value::Int(counter.value()))
        }
        _ => Err(call.unknown_subcommand(&SUBCOMMANDS)),
    }
}
