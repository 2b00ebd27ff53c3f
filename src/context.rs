//! Per-session object context and its command dispatch.
//!
//! A `Context` owns one [`VariableStore`] and one [`TypeRegistry`] and
//! implements the command surface on top of them:
//!
//! ```text
//! <root> create <type> ?args ...?   -> generated object name
//! <root> exists <name>              -> 0 / 1
//! <root> names ?pattern?            -> list of live names
//! <root> delete <name>              -> empty
//! <name> type                       -> type name
//! <name> <subcommand> ?args ...?    -> delegated to the type's dispatcher
//! ```
//!
//! Every object created through `create` gets a command bound in the host
//! under its generated name. The store entry and that binding are created
//! together and removed together.
//!
//! # Example
//!
//! ```
//! use objstate::{CommandTable, Context, StateConfig, Value};
//!
//! let mut host = CommandTable::new();
//! let mut ctx = Context::new(StateConfig::default()).unwrap();
//! ctx.register_type("widget", |args| args.wrap(0u32), |call| {
//!     Err(call.unknown_subcommand(&[]))
//! })
//! .unwrap();
//!
//! let name = ctx.create(&mut host, "widget", &[]).unwrap();
//! assert_eq!(name, "cobj#0000");
//! assert_eq!(
//!     ctx.dispatch_instance(&name, &["type".to_string()]).unwrap(),
//!     Value::from("widget")
//! );
//! ```

use std::any::Any;

use globset::Glob;
use rustc_hash::FxHashMap;

use objstate_core::{Handle, Overwrite, StateError, StateResult, Value, VariableStore};
use objstate_registry::{CreateArgs, InstanceCall, NativeDispatcher, TypeRegistry};

use crate::config::StateConfig;
use crate::host::{CommandHost, Route};

/// Subcommands the root command handles itself.
pub const ROOT_SUBCOMMANDS: [&str; 4] = ["create", "delete", "exists", "names"];

/// Subcommands every object command handles before delegating.
pub const INSTANCE_SUBCOMMANDS: [&str; 1] = ["type"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootSubcommand {
    Create,
    Delete,
    Exists,
    Names,
}

impl RootSubcommand {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "create" => Some(Self::Create),
            "delete" => Some(Self::Delete),
            "exists" => Some(Self::Exists),
            "names" => Some(Self::Names),
            _ => None,
        }
    }
}

/// The host-side half of an object: the command bound under its name.
#[derive(Debug)]
struct Binding {
    dispatcher: NativeDispatcher,
}

/// Owner of one session's objects and registered types.
#[derive(Debug)]
pub struct Context {
    config: StateConfig,
    store: VariableStore,
    registry: TypeRegistry,
    bindings: FxHashMap<String, Binding>,
}

impl Context {
    /// Create an empty context.
    pub fn new(config: StateConfig) -> StateResult<Self> {
        config.validate()?;
        let store = VariableStore::new(config.name_prefix(), config.suffix_width());
        let registry = match config.type_capacity() {
            Some(capacity) => TypeRegistry::with_capacity(capacity),
            None => TypeRegistry::unbounded(),
        };
        Ok(Self {
            config,
            store,
            registry,
            bindings: FxHashMap::default(),
        })
    }

    /// Create a context with the bundled `counter` and `dict` types registered.
    pub fn with_default_types(config: StateConfig) -> StateResult<Self> {
        let mut ctx = Self::new(config)?;
        objstate_modules::register_all(&mut ctx.registry)?;
        Ok(ctx)
    }

    /// The configuration this context was built with.
    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    /// Name of the root command.
    pub fn command_name(&self) -> &str {
        self.config.command_name()
    }

    /// Read-only access to the object store.
    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    /// Read-only access to the type registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Mutable access to the type registry, for bulk registration.
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    /// Register a native type with this context.
    pub fn register_type<C, D>(&mut self, name: &str, constructor: C, dispatcher: D) -> StateResult<()>
    where
        C: Fn(&mut CreateArgs<'_>) -> StateResult<Handle> + Send + Sync + 'static,
        D: Fn(&mut InstanceCall<'_>) -> StateResult<Value> + Send + Sync + 'static,
    {
        self.registry.register(name, constructor, dispatcher)
    }

    // ==========================================================================
    // Object lifecycle
    // ==========================================================================

    /// Create an object of `type_name` and bind it under a fresh name.
    ///
    /// Returns the generated name. On failure nothing is bound.
    pub fn create(
        &mut self,
        host: &mut dyn CommandHost,
        type_name: &str,
        args: &[String],
    ) -> StateResult<String> {
        let entry = self.registry.get_by_name(type_name)?;
        let constructor = entry.constructor().clone();
        let dispatcher = entry.dispatcher().clone();
        let expected_hash = entry.type_hash();

        let name = self.next_free_name(host);
        let handle = constructor.call(&mut CreateArgs::new(type_name, args, &self.store))?;
        if handle.type_hash() != expected_hash {
            return Err(StateError::TypeMismatch {
                name,
                expected: type_name.to_string(),
                actual: handle.type_name().to_string(),
            });
        }

        self.store.register(&name, handle, Overwrite::DeleteOld);
        self.bindings.insert(name.clone(), Binding { dispatcher });
        host.bind_command(&name, Route::Instance(self.command_name().to_string()));
        tracing::debug!(context = self.command_name(), name = %name, type_name, "created object");
        Ok(name)
    }

    /// Destroy the object bound under `name` and remove its command.
    pub fn delete(&mut self, host: &mut dyn CommandHost, name: &str) -> StateResult<()> {
        self.store.delete(name)?;
        if self.bindings.remove(name).is_some() {
            host.unbind_command(name);
        }
        tracing::debug!(context = self.command_name(), name, "deleted object");
        Ok(())
    }

    /// Check if an object is bound under `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.store.exists(name)
    }

    /// Live object names, optionally filtered by a glob pattern.
    pub fn names(&self, pattern: Option<&str>) -> StateResult<Vec<String>> {
        let names = self.store.names();
        let Some(pattern) = pattern else {
            return Ok(names);
        };
        let matcher = Glob::new(pattern)
            .map_err(|e| StateError::InvalidArgs(format!("bad pattern \"{pattern}\": {e}")))?
            .compile_matcher();
        Ok(names.into_iter().filter(|name| matcher.is_match(name)).collect())
    }

    /// Borrow the object bound under `name` as `T`, checking its type.
    pub fn resolve<T: Any>(&self, name: &str, expected_type: &str) -> StateResult<&T> {
        self.store.resolve_as::<T>(name, expected_type)
    }

    /// Mutably borrow the object bound under `name` as `T`, checking its type.
    pub fn resolve_mut<T: Any>(&mut self, name: &str, expected_type: &str) -> StateResult<&mut T> {
        self.store.resolve_as_mut::<T>(name, expected_type)
    }

    /// Destroy every object and remove every command this context bound,
    /// including the root command. Returns the number of objects destroyed.
    pub fn teardown(&mut self, host: &mut dyn CommandHost) -> usize {
        for name in self.bindings.keys() {
            host.unbind_command(name);
        }
        self.bindings.clear();
        host.unbind_command(self.config.command_name());
        let destroyed = self.store.clear();
        tracing::debug!(context = self.command_name(), destroyed, "context torn down");
        destroyed
    }

    fn next_free_name(&mut self, host: &dyn CommandHost) -> String {
        loop {
            let name = self.store.unique_name();
            if !host.has_command(&name) {
                return name;
            }
            tracing::trace!(name = %name, "generated name shadows a host command, skipping");
        }
    }

    // ==========================================================================
    // Dispatch
    // ==========================================================================

    /// Run the root command with `words` (the words after the command name).
    pub fn dispatch_root(&mut self, host: &mut dyn CommandHost, words: &[String]) -> StateResult<Value> {
        let Some((sub, rest)) = words.split_first() else {
            return Err(self.root_usage("option ?arg ...?"));
        };
        let Some(subcommand) = RootSubcommand::parse(sub) else {
            return Err(StateError::unknown_subcommand(sub, &ROOT_SUBCOMMANDS));
        };

        match subcommand {
            RootSubcommand::Create => {
                let Some((type_name, args)) = rest.split_first() else {
                    return Err(self.root_usage("create <type> ?args ...?"));
                };
                self.create(host, type_name, args).map(Value::Str)
            }
            RootSubcommand::Delete => match rest {
                [name] => self.delete(host, name).map(|()| Value::Empty),
                _ => Err(self.root_usage("delete <name>")),
            },
            RootSubcommand::Exists => match rest {
                [name] => Ok(Value::Bool(self.exists(name))),
                _ => Err(self.root_usage("exists <name>")),
            },
            RootSubcommand::Names => match rest {
                [] => Ok(Value::from(self.names(None)?)),
                [pattern] => Ok(Value::from(self.names(Some(pattern))?)),
                _ => Err(self.root_usage("names ?pattern?")),
            },
        }
    }

    /// Run the command bound to object `name` with `words` (the words after
    /// the object name).
    ///
    /// `type` is answered here; any other subcommand goes to the type's
    /// dispatcher untouched. No words yields an empty result.
    pub fn dispatch_instance(&mut self, name: &str, words: &[String]) -> StateResult<Value> {
        let binding = self
            .bindings
            .get(name)
            .ok_or_else(|| StateError::UnknownVariable(name.to_string()))?;
        let Some(sub) = words.first() else {
            return Ok(Value::Empty);
        };
        let handle = self.store.get(name)?;
        let type_name = handle.type_name().to_string();

        if INSTANCE_SUBCOMMANDS.contains(&sub.as_str()) {
            if words.len() != 1 {
                return Err(StateError::wrong_args(format!("{name} type")));
            }
            return Ok(Value::Str(type_name));
        }

        let dispatcher = binding.dispatcher.clone();
        tracing::trace!(name, type_name = %type_name, subcommand = %sub, "delegating to type dispatcher");
        dispatcher.call(&mut InstanceCall::new(name, &type_name, words, &mut self.store))
    }

    fn root_usage(&self, usage: &str) -> StateError {
        StateError::wrong_args(format!("{} {}", self.command_name(), usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CommandTable;
    use objstate_core::ErrorKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Widget {
        size: i64,
    }

    fn widget_ctor(args: &mut CreateArgs<'_>) -> StateResult<Handle> {
        let size = args.arg_or(0, 1)?;
        args.wrap(Widget { size })
    }

    fn widget_cmd(call: &mut InstanceCall<'_>) -> StateResult<Value> {
        match call.subcommand() {
            "size" => Ok(Value::Int(call.this::<Widget>()?.size)),
            "grow" => {
                let by: i64 = call.arg(0)?;
                call.this_mut::<Widget>()?.size += by;
                Ok(Value::Empty)
            }
            _ => Err(call.unknown_subcommand(&["size", "grow"])),
        }
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn setup() -> (Context, CommandTable) {
        let mut ctx = Context::new(StateConfig::default()).unwrap();
        ctx.register_type("widget", widget_ctor, widget_cmd).unwrap();
        (ctx, CommandTable::new())
    }

    #[test]
    fn create_binds_store_and_command() {
        let (mut ctx, mut host) = setup();
        let name = ctx.create(&mut host, "widget", &[]).unwrap();

        assert_eq!(name, "cobj#0000");
        assert!(ctx.exists(&name));
        assert_eq!(host.route(&name), Some(&Route::Instance("cobj".into())));
        assert_eq!(ctx.resolve::<Widget>(&name, "widget").unwrap().size, 1);
    }

    #[test]
    fn create_unknown_type_binds_nothing() {
        let (mut ctx, mut host) = setup();
        let err = ctx.create(&mut host, "nonexistent-type", &[]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("nonexistent-type"));
        assert!(ctx.store().is_empty());
        assert!(host.is_empty());
    }

    #[test]
    fn failing_constructor_binds_nothing() {
        let (mut ctx, mut host) = setup();
        let err = ctx.create(&mut host, "widget", &words(&["huge"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(ctx.store().is_empty());
        assert!(host.is_empty());
    }

    #[test]
    fn constructor_with_wrong_type_is_rejected() {
        let (mut ctx, mut host) = setup();
        ctx.register_type("liar", |_args| Handle::wrap(0u8, "widget"), widget_cmd)
            .unwrap();
        let err = ctx.create(&mut host, "liar", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(ctx.store().is_empty());
    }

    #[test]
    fn generated_names_avoid_host_commands() {
        let (mut ctx, mut host) = setup();
        host.bind_command("cobj#0000", Route::Root("other".into()));
        let name = ctx.create(&mut host, "widget", &[]).unwrap();
        assert_eq!(name, "cobj#0001");
    }

    #[test]
    fn delete_unbinds_command() {
        let (mut ctx, mut host) = setup();
        let name = ctx.create(&mut host, "widget", &[]).unwrap();
        ctx.delete(&mut host, &name).unwrap();

        assert!(!ctx.exists(&name));
        assert!(!host.has_command(&name));
        assert!(matches!(
            ctx.resolve::<Widget>(&name, "widget"),
            Err(StateError::UnknownVariable(_))
        ));
        assert!(matches!(
            ctx.dispatch_instance(&name, &words(&["type"])),
            Err(StateError::UnknownVariable(_))
        ));
        assert!(matches!(
            ctx.delete(&mut host, &name),
            Err(StateError::UnknownVariable(_))
        ));
    }

    #[test]
    fn root_dispatch() {
        let (mut ctx, mut host) = setup();
        let name = ctx
            .dispatch_root(&mut host, &words(&["create", "widget", "5"]))
            .unwrap();
        let name = name.as_str().unwrap().to_string();

        assert_eq!(
            ctx.dispatch_root(&mut host, &words(&["exists", name.as_str()])).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            ctx.dispatch_root(&mut host, &words(&["names"])).unwrap().to_string(),
            name
        );
        assert_eq!(
            ctx.dispatch_root(&mut host, &words(&["delete", name.as_str()])).unwrap(),
            Value::Empty
        );
        assert_eq!(
            ctx.dispatch_root(&mut host, &words(&["exists", name.as_str()])).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn root_usage_errors() {
        let (mut ctx, mut host) = setup();
        let err = ctx.dispatch_root(&mut host, &[]).unwrap_err();
        assert_eq!(err.to_string(), "wrong # args: should be \"cobj option ?arg ...?\"");

        let err = ctx.dispatch_root(&mut host, &words(&["create"])).unwrap_err();
        assert_eq!(err.to_string(), "wrong # args: should be \"cobj create <type> ?args ...?\"");

        let err = ctx.dispatch_root(&mut host, &words(&["exists"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);

        let err = ctx.dispatch_root(&mut host, &words(&["frob"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad subcommand \"frob\": must be create, delete, exists, or names"
        );
    }

    #[test]
    fn names_pattern() {
        let (mut ctx, mut host) = setup();
        for _ in 0..12 {
            ctx.create(&mut host, "widget", &[]).unwrap();
        }
        let filtered = ctx.names(Some("cobj#001*")).unwrap();
        assert_eq!(filtered, vec!["cobj#0010".to_string(), "cobj#0011".to_string()]);
        assert_eq!(ctx.names(None).unwrap().len(), 12);
        assert_eq!(ctx.names(Some("[")).unwrap_err().kind(), ErrorKind::InvalidArgs);
    }

    #[test]
    fn instance_dispatch() {
        let (mut ctx, mut host) = setup();
        let name = ctx.create(&mut host, "widget", &words(&["2"])).unwrap();

        assert_eq!(ctx.dispatch_instance(&name, &[]).unwrap(), Value::Empty);
        assert_eq!(
            ctx.dispatch_instance(&name, &words(&["type"])).unwrap(),
            Value::from("widget")
        );
        ctx.dispatch_instance(&name, &words(&["grow", "3"])).unwrap();
        assert_eq!(
            ctx.dispatch_instance(&name, &words(&["size"])).unwrap(),
            Value::Int(5)
        );

        let err = ctx.dispatch_instance(&name, &words(&["type", "x"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn type_specific_error_is_not_masked() {
        let (mut ctx, mut host) = setup();
        let name = ctx.create(&mut host, "widget", &[]).unwrap();
        let err = ctx.dispatch_instance(&name, &words(&["frob"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad subcommand \"frob\": must be type, size, or grow"
        );
    }

    #[test]
    fn teardown_destroys_and_unbinds() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&destroyed);
        let mut ctx = Context::new(StateConfig::default()).unwrap();
        ctx.register_type(
            "tracked",
            move |args| {
                let seen = Arc::clone(&seen);
                args.wrap_with_deleter((), move |()| {
                    seen.fetch_add(1, Ordering::SeqCst);
                })
            },
            |call| Err(call.unknown_subcommand(&[])),
        )
        .unwrap();

        let mut host = CommandTable::new();
        host.bind_command("cobj", Route::Root("cobj".into()));
        let first = ctx.create(&mut host, "tracked", &[]).unwrap();
        ctx.create(&mut host, "tracked", &[]).unwrap();
        ctx.create(&mut host, "tracked", &[]).unwrap();
        ctx.delete(&mut host, &first).unwrap();

        assert_eq!(ctx.teardown(&mut host), 2);
        assert!(host.is_empty());
        assert!(ctx.store().is_empty());
        drop(ctx);
        assert_eq!(destroyed.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn drop_cascades_destruction() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&destroyed);
        let mut ctx = Context::new(StateConfig::default()).unwrap();
        ctx.register_type(
            "tracked",
            move |args| {
                let seen = Arc::clone(&seen);
                args.wrap_with_deleter((), move |()| {
                    seen.fetch_add(1, Ordering::SeqCst);
                })
            },
            |call| Err(call.unknown_subcommand(&[])),
        )
        .unwrap();
        let mut host = CommandTable::new();
        ctx.create(&mut host, "tracked", &[]).unwrap();
        ctx.create(&mut host, "tracked", &[]).unwrap();
        drop(ctx);
        assert_eq!(destroyed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_types_are_registered() {
        let ctx = Context::with_default_types(StateConfig::default()).unwrap();
        assert!(ctx.registry().contains("counter"));
        assert!(ctx.registry().contains("dict"));
    }

    #[test]
    fn context_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Context>();
    }
}
