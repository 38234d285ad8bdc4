//! Per-user vault gates.
//!
//! Each user gets one [`VaultGate`] and an unlocked flag. The flag is the
//! only source of `ViewSpec::vault_unlocked`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::engine::{needs_unlock, Clock, VaultDelays, VaultEvent, VaultGate, VaultStatus};

/// Vault state reported to clients.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VaultReport {
    pub status: VaultStatus,
    pub unlocked: bool,
    /// Set after a cancel: the client must drop its `private` tag selection.
    pub clear_tag: bool,
}

/// Report for a user without a vault entry.
const LOCKED: VaultReport = VaultReport {
    status: VaultStatus::Idle,
    unlocked: false,
    clear_tag: false,
};

struct UserVault {
    gate: VaultGate,
    unlocked: bool,
}

/// Vault gates of all users, keyed by user id.
///
/// A user only gets an entry once a prompt is opened for them.
pub struct VaultRegistry {
    clock: Arc<dyn Clock>,
    delays: VaultDelays,
    users: Mutex<HashMap<String, UserVault>>,
}

impl VaultRegistry {
    pub fn new(clock: Arc<dyn Clock>, delays: VaultDelays) -> Self {
        Self {
            clock,
            delays,
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Advance the user's gate and report its state.
    pub async fn poll(&self, user_id: &str) -> VaultReport {
        let now = self.clock.now();
        let mut users = self.users.lock().await;
        match users.get_mut(user_id) {
            Some(vault) => {
                step(vault, user_id, now);
                report(vault, false)
            }
            None => LOCKED,
        }
    }

    /// Start the unlock prompt unless the vault is already open.
    pub async fn open(&self, user_id: &str) -> VaultReport {
        let now = self.clock.now();
        let mut users = self.users.lock().await;
        let vault = self.entry(&mut users, user_id);
        step(vault, user_id, now);
        if !vault.unlocked && vault.gate.open(now) {
            tracing::info!("Vault prompt started for user {}", user_id);
        }
        report(vault, false)
    }

    /// Dismiss the prompt.
    pub async fn cancel(&self, user_id: &str) -> VaultReport {
        let mut users = self.users.lock().await;
        let Some(vault) = users.get_mut(user_id) else {
            return VaultReport {
                clear_tag: true,
                ..LOCKED
            };
        };
        let clear_tag = vault.gate.cancel() == VaultEvent::Cancelled;
        tracing::info!("Vault prompt cancelled for user {}", user_id);
        report(vault, clear_tag)
    }

    /// Lock the vault again.
    pub async fn lock(&self, user_id: &str) -> VaultReport {
        let mut users = self.users.lock().await;
        if users.remove(user_id).is_some() {
            tracing::info!("Vault locked for user {}", user_id);
        }
        LOCKED
    }

    /// Called when a list view is rendered: advances the gate, opens it when
    /// the view asks for the private tag while locked, and returns whether
    /// the vault is unlocked.
    pub async fn visit(&self, user_id: &str, tag: Option<&str>) -> bool {
        let now = self.clock.now();
        let mut users = self.users.lock().await;

        if !users.contains_key(user_id) && !needs_unlock(tag, false) {
            return false;
        }

        let vault = self.entry(&mut users, user_id);
        step(vault, user_id, now);

        if needs_unlock(tag, vault.unlocked) && vault.gate.open(now) {
            tracing::info!("Vault prompt started for user {}", user_id);
        }
        vault.unlocked
    }

    #[cfg(test)]
    async fn tracked_users(&self) -> usize {
        self.users.lock().await.len()
    }

    fn entry<'a>(
        &self,
        users: &'a mut HashMap<String, UserVault>,
        user_id: &str,
    ) -> &'a mut UserVault {
        users
            .entry(user_id.to_string())
            .or_insert_with(|| UserVault {
                gate: VaultGate::new(self.delays),
                unlocked: false,
            })
    }
}

fn step(vault: &mut UserVault, user_id: &str, now: std::time::Instant) {
    if vault.gate.advance(now) == Some(VaultEvent::Unlocked) {
        vault.unlocked = true;
        tracing::info!("Vault unlocked for user {}", user_id);
    }
}

fn report(vault: &UserVault, clear_tag: bool) -> VaultReport {
    VaultReport {
        status: vault.gate.status(),
        unlocked: vault.unlocked,
        clear_tag,
    }
}
