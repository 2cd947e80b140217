//! microk8s-pilot-core: addon reconciliation for microk8s-pilot

pub mod reconciler;
pub mod types;

pub use reconciler::{ReconcileOptions, Reconciler};
pub use types::{AddonAction, AddonState, Changes, Comment, ReconcileResult};
