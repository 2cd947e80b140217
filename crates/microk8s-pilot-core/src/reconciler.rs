//! Addon reconciler
//!
//! Brings one addon to a desired state. The current state is always read
//! back from microk8s first and a mutating command runs only when it
//! differs from the target.

use crate::types::{AddonAction, AddonState, ReconcileResult};
use microk8s_rs::{CommandRunner, Microk8s, Microk8sError};
use std::path::PathBuf;

/// Per-reconciler options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Report what would change instead of changing it
    pub dry_run: bool,
}

/// Reconciles addon states through a microk8s installation
#[derive(Debug, Clone)]
pub struct Reconciler<R> {
    microk8s: Microk8s<R>,
    options: ReconcileOptions,
}

impl<R: CommandRunner> Reconciler<R> {
    /// Probe `binary` and build a reconciler on top of it
    ///
    /// Returns [`Microk8sError::BinaryNotFound`] when microk8s is not
    /// installed at `binary`.
    pub fn new(
        binary: impl Into<PathBuf>,
        runner: R,
        options: ReconcileOptions,
    ) -> Result<Self, Microk8sError> {
        Ok(Self::with_microk8s(Microk8s::new(binary, runner)?, options))
    }

    pub fn with_microk8s(microk8s: Microk8s<R>, options: ReconcileOptions) -> Self {
        Self { microk8s, options }
    }

    pub fn options(&self) -> ReconcileOptions {
        self.options
    }

    /// Ensure addon `name` is enabled
    pub fn addon_enabled(&self, name: &str) -> Result<ReconcileResult, Microk8sError> {
        self.reconcile(name, AddonAction::Enable)
    }

    /// Ensure addon `name` is disabled
    pub fn addon_disabled(&self, name: &str) -> Result<ReconcileResult, Microk8sError> {
        self.reconcile(name, AddonAction::Disable)
    }

    /// Bring addon `name` to the state `action` targets
    ///
    /// Expected failures (non-zero exit, missing confirmation) come back as
    /// a result with `result: Some(false)`. `Err` means a command could not
    /// be run at all.
    pub fn reconcile(
        &self,
        name: &str,
        action: AddonAction,
    ) -> Result<ReconcileResult, Microk8sError> {
        let target = action.target_state();

        let current = self.microk8s.addon_status(name)?;
        tracing::info!("current status of {} is {:?}", name, current);

        if AddonState::from_status_output(&current.stdout) == Some(target) {
            tracing::info!("Already {}", target);
            let ret =
                ReconcileResult::unchanged(name, format!("Addon {} is already {}", name, target));
            tracing::debug!("returning {:?}", ret);
            return Ok(ret);
        }

        if self.options.dry_run {
            tracing::info!(
                "Test mode, would {} (expected {} before change)",
                action,
                action.opposite_state()
            );
            let ret = ReconcileResult::pending(name, format!("Would {} addon {}", action, name));
            tracing::debug!("returning {:?}", ret);
            return Ok(ret);
        }

        let output = match action {
            AddonAction::Enable => self.microk8s.enable(name)?,
            AddonAction::Disable => self.microk8s.disable(name)?,
        };
        tracing::info!("Output from {} is {:?}", action, output);

        let ret = if output.success() && output.stdout.contains(&action.confirmation()) {
            tracing::info!("{} successfully", target);
            ReconcileResult::changed(
                name,
                action.changes(),
                format!("Successfully {} addon {}", target, name),
            )
        } else {
            tracing::warn!("Could not {} addon {} (retcode {})", action, name, output.retcode);
            let mut lines = vec![format!("Could not {} addon {}", action, name)];
            lines.extend(output.stdout_lines());
            ReconcileResult::failed(name, lines)
        };

        tracing::info!("returning {:?}", ret);
        Ok(ret)
    }
}
