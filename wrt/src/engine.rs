//! [`Engine`]: the embedding surface an application actually holds onto.
//!
//! A [`wrt_runtime::Store`] is just pools of addresses; an [`Engine`] adds
//! the two things an embedder needs on top of it — a place to keep a
//! module's exports reachable by name after it was instantiated (mirroring
//! the conformance format's `register` directive, which lets one module's
//! exports satisfy a later module's imports), and the `instantiate`/`invoke`
//! entry points that thread a `Store` through [`wrt_runtime`] without the
//! caller having to juggle addresses directly.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::instrument;
use wrt_error::{codes, Error};
use wrt_format::Module;
use wrt_runtime::{ExternVal, ImportValue, ModuleInstance, Store, Value};

/// An instantiated module together with the engine that owns its store
/// addresses. Cheap to clone: it's just an `Rc`.
#[derive(Clone)]
pub struct Instance {
    module: Rc<ModuleInstance>,
}

impl Instance {
    /// Resolve an export to a value, if this instance has one by that name
    /// and it's a global.
    pub fn export(&self, name: &str) -> Option<ExternVal> {
        self.module.export(name)
    }

    /// The export names this instance makes available, in declaration order
    /// is not preserved (the underlying table is a `HashMap`).
    pub fn export_names(&self) -> impl Iterator<Item = &str> {
        self.module.exports.keys().map(String::as_str)
    }
}

/// The runtime: a store plus a namespace of registered module instances
/// other modules can import from.
pub struct Engine {
    store: Store,
    registered: HashMap<String, Rc<ModuleInstance>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self { store: Store::new(), registered: HashMap::new() }
    }

    /// Instantiate `module`, resolving its imports first against `imports`
    /// and then against any previously [`Engine::register`]ed module.
    #[instrument(skip(self, module, imports))]
    pub fn instantiate(&mut self, module: &Module, imports: &[ImportValue<'_>]) -> Result<Instance, Error> {
        let mut resolved: Vec<(&str, &str, ExternVal)> = imports.to_vec();
        for import in &module.imports {
            if resolved.iter().any(|(m, n, _)| *m == import.module && *n == import.name) {
                continue;
            }
            if let Some(found) = self.registered.get(import.module.as_str()).and_then(|inst| inst.export(&import.name)) {
                resolved.push((import.module.as_str(), import.name.as_str(), found));
            }
        }
        let module_instance = wrt_runtime::instantiate(&mut self.store, module, &resolved)?;
        Ok(Instance { module: module_instance })
    }

    /// Make `instance`'s exports available as imports under `name` to any
    /// module instantiated afterward, matching the conformance format's
    /// `register` directive.
    pub fn register(&mut self, name: impl Into<String>, instance: &Instance) {
        self.registered.insert(name.into(), Rc::clone(&instance.module));
    }

    /// Call an exported function by name.
    #[instrument(skip(self, instance, args))]
    pub fn invoke(&mut self, instance: &Instance, export: &str, args: &[Value]) -> Result<Vec<Value>, Error> {
        match instance.export(export) {
            Some(ExternVal::Func(addr)) => wrt_runtime::invoke(&mut self.store, addr, args),
            Some(_) => Err(Error::link(codes::MISSING_EXPORT, format!("export `{export}` is not a function"))),
            None => Err(Error::link(codes::MISSING_EXPORT, format!("no export named `{export}`"))),
        }
    }

    /// Read an exported global's current value.
    pub fn get_global(&self, instance: &Instance, export: &str) -> Result<Value, Error> {
        match instance.export(export) {
            Some(ExternVal::Global(addr)) => Ok(self.store.globals[addr].value),
            Some(_) => Err(Error::link(codes::MISSING_EXPORT, format!("export `{export}` is not a global"))),
            None => Err(Error::link(codes::MISSING_EXPORT, format!("no export named `{export}`"))),
        }
    }

    /// The current size, in pages, of an exported memory.
    pub fn memory_size(&self, instance: &Instance, export: &str) -> Result<u32, Error> {
        match instance.export(export) {
            Some(ExternVal::Memory(addr)) => Ok(self.store.mems[addr].size_pages()),
            Some(_) => Err(Error::link(codes::MISSING_EXPORT, format!("export `{export}` is not a memory"))),
            None => Err(Error::link(codes::MISSING_EXPORT, format!("no export named `{export}`"))),
        }
    }

    /// Direct access to the underlying store, for embedders that need to
    /// allocate host functions via [`wrt_host`] before instantiating.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }
}
