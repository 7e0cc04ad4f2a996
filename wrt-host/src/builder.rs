//! Collecting named host functions into a set of imports an embedder can
//! hand to [`wrt_runtime::instantiate`].

use std::rc::Rc;

use tracing::debug;
use wrt_error::Error;
use wrt_format::FuncType;
use wrt_runtime::{ExternVal, HostFunc, Store, Value};

use crate::function::HostFunction;

struct Entry {
    module: String,
    name: String,
    func: Rc<dyn HostFunc>,
}

/// Accumulates `(module, name, function)` triples, then allocates each into
/// a [`Store`] and hands back the resulting externs keyed the same way a
/// module's import section names them.
#[derive(Default)]
pub struct HostBuilder {
    entries: Vec<Entry>,
}

impl HostBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under `module.name`, callable from any module
    /// instantiated with the resulting [`Registry`] as its imports.
    pub fn add_function<F>(&mut self, module: &str, name: &str, ty: FuncType, func: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Result<Vec<Value>, Error> + 'static,
    {
        debug!(module, name, "registering host function");
        self.entries.push(Entry {
            module: module.to_string(),
            name: name.to_string(),
            func: Rc::new(HostFunction::new(ty, func)),
        });
        self
    }

    /// Allocate every registered function into `store` and return the
    /// resulting name-to-extern table.
    pub fn build(self, store: &mut Store) -> Registry {
        let mut resolved = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            let addr = store.alloc_func(wrt_runtime::FuncInst::Host(entry.func));
            resolved.push((entry.module, entry.name, ExternVal::Func(addr)));
        }
        Registry { resolved }
    }
}

/// Host functions already allocated into a store, ready to be passed as
/// `imports` to [`wrt_runtime::instantiate`].
pub struct Registry {
    resolved: Vec<(String, String, ExternVal)>,
}

impl Registry {
    /// Whether a function was registered under `module.name`.
    pub fn has_function(&self, module: &str, name: &str) -> bool {
        self.resolved.iter().any(|(m, n, _)| m == module && n == name)
    }

    /// Borrow the registered entries as `wrt_runtime::ImportValue`s.
    pub fn as_imports(&self) -> Vec<(&str, &str, ExternVal)> {
        self.resolved.iter().map(|(m, n, v)| (m.as_str(), n.as_str(), *v)).collect()
    }
}
