//! The boundary between a context and the host that calls into it.
//!
//! A context needs three things from its host: to know which command names
//! are taken, to bind a name to a route back into the context, and to remove
//! that binding again. [`CommandHost`] is that boundary; [`CommandTable`] is
//! the in-memory implementation used by [`Interp`](crate::Interp).

use rustc_hash::FxHashMap;

/// Where a bound command name leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// The root command of the context keyed by this command name.
    Root(String),
    /// An object command owned by the context keyed by this command name.
    Instance(String),
}

impl Route {
    /// Key of the context this route leads into.
    pub fn context(&self) -> &str {
        match self {
            Route::Root(key) | Route::Instance(key) => key,
        }
    }
}

/// Command binding facilities a context consumes from its host.
pub trait CommandHost {
    /// Check if `name` is bound to any command.
    fn has_command(&self, name: &str) -> bool;

    /// Bind `name` to `route`, replacing any previous binding.
    fn bind_command(&mut self, name: &str, route: Route);

    /// Remove the binding of `name`. Returns `true` if it was bound.
    fn unbind_command(&mut self, name: &str) -> bool;
}

/// In-memory table of bound command names.
#[derive(Debug, Default, Clone)]
pub struct CommandTable {
    routes: FxHashMap<String, Route>,
}

impl CommandTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up where `name` leads.
    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Bound names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.routes.keys().cloned().collect();
        names.sort();
        names
    }
}

impl CommandHost for CommandTable {
    fn has_command(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    fn bind_command(&mut self, name: &str, route: Route) {
        tracing::trace!(name, ?route, "bind command");
        self.routes.insert(name.to_string(), route);
    }

    fn unbind_command(&mut self, name: &str) -> bool {
        tracing::trace!(name, "unbind command");
        self.routes.remove(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_and_unbind() {
        let mut table = CommandTable::new();
        table.bind_command("cobj", Route::Root("cobj".into()));
        table.bind_command("cobj#0000", Route::Instance("cobj".into()));

        assert!(table.has_command("cobj"));
        assert_eq!(table.route("cobj#0000"), Some(&Route::Instance("cobj".into())));
        assert_eq!(table.names(), vec!["cobj".to_string(), "cobj#0000".to_string()]);

        assert!(table.unbind_command("cobj#0000"));
        assert!(!table.unbind_command("cobj#0000"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn route_context() {
        assert_eq!(Route::Root("img".into()).context(), "img");
        assert_eq!(Route::Instance("img".into()).context(), "img");
    }
}
