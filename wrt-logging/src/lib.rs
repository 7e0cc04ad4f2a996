// WRT - wrt-logging
// Module: Logging Infrastructure
//
// SPDX-License-Identifier: MIT

//! A thin [`tracing`] facade, namespaced one level so every other crate in
//! the workspace emits through the same few entry points instead of calling
//! `tracing::*` macros directly with ad hoc targets.
//!
//! `Context` carries an optional span id so log calls coming from inside an
//! already-open [`tracing`] span (decoding a section, validating a
//! function, running a call frame) can be correlated with it without the
//! caller needing to know how the subscriber is wired up.

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Where a log record came from, beyond its message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    pub span_id: Option<u64>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_span(span_id: u64) -> Self {
        Self { span_id: Some(span_id) }
    }
}

/// Emit a single log record at `level`, tagged with `context`.
pub fn log(level: Level, context: Context, message: &str) {
    match (level, context.span_id) {
        (Level::Trace, Some(id)) => tracing::trace!(span_id = id, "{message}"),
        (Level::Trace, None) => tracing::trace!("{message}"),
        (Level::Debug, Some(id)) => tracing::debug!(span_id = id, "{message}"),
        (Level::Debug, None) => tracing::debug!("{message}"),
        (Level::Info, Some(id)) => tracing::info!(span_id = id, "{message}"),
        (Level::Info, None) => tracing::info!("{message}"),
        (Level::Warn, Some(id)) => tracing::warn!(span_id = id, "{message}"),
        (Level::Warn, None) => tracing::warn!("{message}"),
        (Level::Error, Some(id)) => tracing::error!(span_id = id, "{message}"),
        (Level::Error, None) => tracing::error!("{message}"),
    }
}

pub fn trace(context: Context, message: &str) {
    log(Level::Trace, context, message);
}

pub fn debug(context: Context, message: &str) {
    log(Level::Debug, context, message);
}

pub fn info(context: Context, message: &str) {
    log(Level::Info, context, message);
}

pub fn warn(context: Context, message: &str) {
    log(Level::Warn, context, message);
}

pub fn error(context: Context, message: &str) {
    log(Level::Error, context, message);
}
