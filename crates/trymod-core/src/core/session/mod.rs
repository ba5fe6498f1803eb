//! Binding loaded packages into a REPL scope and starting the REPL.

mod binder;
mod launcher;

pub use binder::{Binding, Namespace};
pub use launcher::{NodeSession, SessionPlan};

pub(crate) use binder::bind_packages;
pub(crate) use launcher::start_session;
