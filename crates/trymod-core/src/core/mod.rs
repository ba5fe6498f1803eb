pub(crate) mod cache;
pub(crate) mod commands;
pub(crate) mod config;
pub(crate) mod packages;
pub(crate) mod runtime;
pub(crate) mod session;
pub(crate) mod tooling;
