use crate::core::events::{AlertLevel, Event};
use crate::core::state::{StateUpdate, WalletUpdate};
use crate::error::Result;
use crate::transactions::VaultActions;
use crate::wallet::connector::{ConnectionState, WalletConnector};
use log::{debug, info, warn};
use std::sync::Arc;

/// Notifications pushed by the wallet provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<String>),
    ChainChanged(String),
    Connect { chain_id: String },
    Disconnect { message: Option<String> },
}

/// Reacts to provider notifications for an established session
pub struct WalletEvents {
    connector: Arc<WalletConnector>,
    actions: Option<Arc<VaultActions>>,
}

impl WalletEvents {
    pub fn new(connector: Arc<WalletConnector>) -> WalletEvents {
        WalletEvents {
            connector,
            actions: None,
        }
    }

    /// Reload account data through `actions` after an account switch
    pub fn with_actions(mut self, actions: Arc<VaultActions>) -> WalletEvents {
        self.actions = Some(actions);
        self
    }

    pub fn handle(&self, event: ProviderEvent) -> Result<()> {
        debug!("Provider event: {event:?}");
        match event {
            ProviderEvent::AccountsChanged(accounts) => self.on_accounts_changed(accounts),
            ProviderEvent::ChainChanged(chain_id) => {
                self.on_chain_changed(chain_id);
                Ok(())
            }
            ProviderEvent::Connect { chain_id } => {
                self.connector.context().bus.emit(Event::WalletConnected {
                    account: None,
                    chain_id: Some(chain_id),
                });
                Ok(())
            }
            ProviderEvent::Disconnect { message } => {
                self.connector.disconnect_with_reason(message);
                Ok(())
            }
        }
    }

    fn on_accounts_changed(&self, accounts: Vec<String>) -> Result<()> {
        let Some(account) = accounts.into_iter().next() else {
            self.connector.disconnect();
            return Ok(());
        };
        if self.connector.connection_state() != ConnectionState::Connected {
            debug!("Ignoring account change to {account} without a session");
            return Ok(());
        }

        let ctx = self.connector.context();
        ctx.store.update_state(
            StateUpdate {
                wallet: Some(WalletUpdate {
                    address: Some(account.clone()),
                    is_connected: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            },
            false,
        );
        info!("Active account changed to {account}");
        ctx.bus.emit(Event::WalletAccountChanged { account });
        ctx.alerts
            .show("Account changed successfully", AlertLevel::Info);

        if let Some(actions) = &self.actions {
            actions.refresh_account_data()?;
        }
        Ok(())
    }

    fn on_chain_changed(&self, chain_id: String) {
        let ctx = self.connector.context();
        let is_supported = chain_id.eq_ignore_ascii_case(&ctx.settings.chain.chain_id);
        if !is_supported {
            warn!("Wallet moved to unsupported chain {chain_id}");
            ctx.alerts.show(
                format!("Please switch to {} Network", ctx.settings.chain.chain_name),
                AlertLevel::Warning,
            );
        }

        ctx.store.update_state(
            StateUpdate {
                wallet: Some(WalletUpdate {
                    network_id: Some(Some(chain_id.clone())),
                    ..Default::default()
                }),
                ..Default::default()
            },
            false,
        );
        ctx.bus.emit(Event::NetworkChanged {
            chain_id,
            is_supported,
        });
    }
}
