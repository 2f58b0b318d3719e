use crate::core::context::AppContext;
use crate::core::events::{AlertLevel, Event};
use crate::core::state::{StateUpdate, WalletUpdate};
use crate::error::{Result, Severity, VaultError, UNRECOGNIZED_CHAIN_CODE, USER_REJECTED_CODE};
use crate::wallet::provider::WalletProvider;
use log::{error, info, warn};
use std::fmt;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Error => write!(f, "error"),
        }
    }
}

/// Negotiates a session with the wallet and mirrors it into the store
pub struct WalletConnector {
    ctx: AppContext,
    provider: Arc<dyn WalletProvider>,
    state: RwLock<ConnectionState>,
}

impl WalletConnector {
    pub fn new(ctx: AppContext, provider: Arc<dyn WalletProvider>) -> WalletConnector {
        WalletConnector {
            ctx,
            provider,
            state: RwLock::new(ConnectionState::Disconnected),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn connection_state(&self) -> ConnectionState {
        match self.state.read() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Connect to the wallet and move it to the configured chain
    ///
    /// Returns `Ok(false)` without doing anything while another connection
    /// attempt is in progress.
    pub fn connect(&self) -> Result<bool> {
        {
            let mut state = self.state.write().unwrap_or_else(|poisoned| {
                warn!("Connection state lock was poisoned, recovering");
                poisoned.into_inner()
            });
            if *state == ConnectionState::Connecting {
                drop(state);
                self.ctx
                    .alerts
                    .show("Connection already in progress...", AlertLevel::Info);
                return Ok(false);
            }
            *state = ConnectionState::Connecting;
        }

        self.ctx
            .store
            .set_loading(true, "Please approve the connection request in your wallet");
        let outcome = self.establish();
        self.ctx.store.set_loading(false, "");

        match outcome {
            Ok((account, chain_id)) => {
                self.set_state(ConnectionState::Connected);
                info!("Wallet {account} connected on chain {chain_id}");
                self.ctx.bus.emit(Event::WalletConnected {
                    account: Some(account),
                    chain_id: Some(chain_id),
                });
                self.ctx
                    .alerts
                    .show("Wallet connected successfully", AlertLevel::Success);
                Ok(true)
            }
            Err(e) => {
                self.set_state(ConnectionState::Error);
                error!("Wallet connection failed: {e}");
                let (message, severity) = e.user_message();
                let level = match severity {
                    Severity::Warning => AlertLevel::Warning,
                    Severity::Error => AlertLevel::Error,
                };
                self.ctx.alerts.show(message, level);
                self.ctx.bus.emit(Event::WalletError {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Clear the session and every piece of account data
    pub fn disconnect(&self) {
        self.disconnect_with_reason(None);
    }

    pub fn disconnect_with_reason(&self, reason: Option<String>) {
        self.set_state(ConnectionState::Disconnected);
        self.ctx.store.reset_state();
        info!("Wallet disconnected");
        self.ctx.bus.emit(Event::WalletDisconnected { reason });
        self.ctx
            .alerts
            .show("Wallet disconnected", AlertLevel::Info);
    }

    fn establish(&self) -> Result<(String, String)> {
        if !self.provider.is_available() {
            return Err(VaultError::WalletNotFound);
        }

        let accounts = self.provider.request_accounts().map_err(|e| match e {
            VaultError::Provider { code, .. } if code == USER_REJECTED_CODE => {
                VaultError::UserRejected
            }
            other => other,
        })?;
        let account = accounts.into_iter().next().ok_or(VaultError::NoAccounts)?;

        self.ensure_network()?;
        let chain_id = self.provider.chain_id()?;

        self.ctx.store.update_state(
            StateUpdate {
                wallet: Some(WalletUpdate {
                    address: Some(account.clone()),
                    is_connected: Some(true),
                    network_id: Some(Some(chain_id.clone())),
                }),
                ..Default::default()
            },
            false,
        );
        Ok((account, chain_id))
    }

    fn ensure_network(&self) -> Result<()> {
        let target = &self.ctx.settings.chain;
        let current = self.provider.chain_id()?;
        if current.eq_ignore_ascii_case(&target.chain_id) {
            return Ok(());
        }

        info!("Switching wallet from chain {current} to {}", target.chain_id);
        match self.provider.switch_chain(&target.chain_id) {
            Ok(()) => Ok(()),
            Err(VaultError::Provider { code, .. }) if code == UNRECOGNIZED_CHAIN_CODE => {
                self.provider.add_chain(target).map_err(|e| {
                    error!("Failed to add {} network: {e}", target.chain_name);
                    VaultError::NetworkAddFailed
                })?;
                self.ctx.bus.emit(Event::NetworkAdded {
                    chain_id: target.chain_id.clone(),
                    chain_name: target.chain_name.clone(),
                });
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn set_state(&self, next: ConnectionState) {
        let mut state = self.state.write().unwrap_or_else(|poisoned| {
            warn!("Connection state lock was poisoned, recovering");
            poisoned.into_inner()
        });
        *state = next;
    }
}
