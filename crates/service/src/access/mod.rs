//! Request-gating pipeline guarding protected routes.
//!
//! Every protected request runs the same fixed chain: resolve the bearer
//! credential into a [`Principal`], check the principal's role against the
//! route's allow-set, then run the route's resource-state gates (provider
//! approval, active subscription). The first failing stage rejects the
//! request; the handler only ever sees a fully vetted principal.
//!
//! All stages are read-only: the pipeline never writes to any store, so an
//! aborted request can be discarded at any point without cleanup.

pub mod errors;
pub mod principal;
pub mod gates;
pub mod pipeline;
pub mod store;

pub use errors::AccessError;
pub use gates::Gate;
pub use pipeline::{AccessPipeline, AccessPolicy};
pub use principal::{Principal, Role};
