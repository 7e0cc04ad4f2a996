// WRT - wrt-host
// Module: Host Function Infrastructure
//
// SPDX-License-Identifier: MIT

//! Ergonomic host-function registration for embedders of [`wrt_runtime`].
//!
//! `wrt_runtime::Store` already supports host functions directly through
//! [`wrt_runtime::FuncInst::Host`], but building one by hand means writing a
//! [`wrt_runtime::HostFunc`] impl and an allocation call per function. This
//! crate is that boilerplate collapsed into a builder: register closures by
//! `module.name`, call [`builder::HostBuilder::build`] once, and pass the
//! resulting [`builder::Registry`] straight to [`wrt_runtime::instantiate`].

pub mod builder;
pub mod function;

pub use builder::{HostBuilder, Registry};
pub use function::HostFunction;
