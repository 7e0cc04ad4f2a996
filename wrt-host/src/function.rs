//! Wrapping a native Rust closure as a [`wrt_runtime::HostFunc`].

use wrt_error::Error;
use wrt_format::FuncType;
use wrt_runtime::{HostFunc, Value};

/// A host function built from a declared signature and a closure. The
/// closure is trusted to accept exactly `ty.params` arguments and return
/// exactly `ty.results` values; nothing here re-checks that at call time,
/// since [`wrt_runtime::instantiate`] already checked the signature against
/// the importing module's expectation before this ever runs.
pub struct HostFunction<F> {
    ty: FuncType,
    func: F,
}

impl<F> HostFunction<F>
where
    F: Fn(&[Value]) -> Result<Vec<Value>, Error>,
{
    pub fn new(ty: FuncType, func: F) -> Self {
        Self { ty, func }
    }
}

impl<F> HostFunc for HostFunction<F>
where
    F: Fn(&[Value]) -> Result<Vec<Value>, Error>,
{
    fn ty(&self) -> &FuncType {
        &self.ty
    }

    fn call(&self, args: &[Value]) -> Result<Vec<Value>, Error> {
        (self.func)(args)
    }
}
