//! In-memory wallet and chain doubles for unit tests
//!
//! `MockWallet` stands in for an injected provider and `MockChain` for the
//! vault contract. Both can be told to fail in the ways real providers do.

use crate::config::{ChainConfig, Settings};
use crate::core::bus::EventBus;
use crate::core::context::AppContext;
use crate::core::events::{Event, EventKind};
use crate::error::{Result, VaultError, UNRECOGNIZED_CHAIN_CODE, USER_REJECTED_CODE};
use crate::transactions::contract::{
    ContractCall, GasParameters, RankInfo, TransactionReceipt, VaultContract,
};
use crate::wallet::WalletProvider;
use num_bigint::BigUint;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const TEST_ACCOUNT: &str = "0x1111111111111111111111111111111111111111";
pub const OTHER_ACCOUNT: &str = "0x3333333333333333333333333333333333333333";
pub const TEST_VAULT: &str = "0x2222222222222222222222222222222222222222";

/// Context wired to a test vault address with no retry delay
pub fn test_context() -> AppContext {
    let mut settings = Settings::default();
    settings.contracts.vault = TEST_VAULT.to_string();
    settings.transactions.retry_delay_ms = 0;
    AppContext::new(settings)
}

/// Collect every event of the given kinds
pub fn record_events(bus: &EventBus, kinds: &[EventKind]) -> Arc<Mutex<Vec<Event>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    for kind in kinds {
        let sink = Arc::clone(&seen);
        bus.on(*kind, move |event| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        });
    }
    seen
}

/// Kinds of the recorded events, in order
pub fn kinds(seen: &Arc<Mutex<Vec<Event>>>) -> Vec<EventKind> {
    seen.lock().unwrap().iter().map(Event::kind).collect()
}

pub struct MockWallet {
    available: bool,
    accounts: Vec<String>,
    reject_accounts: bool,
    fail_add_chain: bool,
    chain_id: Mutex<String>,
    known_chains: Mutex<Vec<String>>,
}

impl MockWallet {
    /// Wallet with one account, already on `chain_id`
    pub fn on_chain(chain_id: &str) -> MockWallet {
        MockWallet {
            available: true,
            accounts: vec![TEST_ACCOUNT.to_string()],
            reject_accounts: false,
            fail_add_chain: false,
            chain_id: Mutex::new(chain_id.to_string()),
            known_chains: Mutex::new(vec![chain_id.to_string()]),
        }
    }

    pub fn missing() -> MockWallet {
        MockWallet {
            available: false,
            ..MockWallet::on_chain("0x1")
        }
    }

    pub fn with_accounts(mut self, accounts: &[&str]) -> MockWallet {
        self.accounts = accounts.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn rejecting(mut self) -> MockWallet {
        self.reject_accounts = true;
        self
    }

    pub fn knowing(self, chain_id: &str) -> MockWallet {
        self.known_chains.lock().unwrap().push(chain_id.to_string());
        self
    }

    pub fn failing_add_chain(mut self) -> MockWallet {
        self.fail_add_chain = true;
        self
    }

    pub fn current_chain(&self) -> String {
        self.chain_id.lock().unwrap().clone()
    }
}

impl WalletProvider for MockWallet {
    fn is_available(&self) -> bool {
        self.available
    }

    fn request_accounts(&self) -> Result<Vec<String>> {
        if self.reject_accounts {
            return Err(VaultError::Provider {
                code: USER_REJECTED_CODE,
                message: "User rejected the request.".to_string(),
            });
        }
        Ok(self.accounts.clone())
    }

    fn chain_id(&self) -> Result<String> {
        Ok(self.current_chain())
    }

    fn switch_chain(&self, chain_id: &str) -> Result<()> {
        if !self.known_chains.lock().unwrap().iter().any(|c| c == chain_id) {
            return Err(VaultError::Provider {
                code: UNRECOGNIZED_CHAIN_CODE,
                message: format!("Unrecognized chain ID {chain_id}"),
            });
        }
        *self.chain_id.lock().unwrap() = chain_id.to_string();
        Ok(())
    }

    fn add_chain(&self, chain: &ChainConfig) -> Result<()> {
        if self.fail_add_chain {
            return Err(VaultError::Provider {
                code: -32603,
                message: "Internal JSON-RPC error.".to_string(),
            });
        }
        self.known_chains.lock().unwrap().push(chain.chain_id.clone());
        *self.chain_id.lock().unwrap() = chain.chain_id.clone();
        Ok(())
    }
}

/// Mutable chain state behind [`MockChain`]
pub struct ChainState {
    /// `None` makes the gas price query fail
    pub gas_price: Option<BigUint>,
    /// `None` makes gas estimation fail
    pub gas_estimate: Option<u64>,
    /// Number of upcoming sends that fail with a network error
    pub send_failures: u32,
    pub reject_send: bool,
    pub revert_all: bool,
    pub receipt_error: bool,
    pub usdc: BigUint,
    pub allowance: BigUint,
    pub deposits: BigUint,
    pub reward: BigUint,
    pub rank: RankInfo,
    pub sent: Vec<ContractCall>,
    pub block_number: u64,
    receipts: HashMap<String, bool>,
}

/// Vault and USDC token that settle calls in memory
///
/// Balances move when a call is sent; a call the account cannot afford is
/// mined as reverted.
pub struct MockChain {
    state: Mutex<ChainState>,
}

impl MockChain {
    /// 1 gwei gas, 1000 USDC in the wallet, nothing deposited
    pub fn new() -> MockChain {
        MockChain {
            state: Mutex::new(ChainState {
                gas_price: Some(BigUint::from(1_000_000_000u64)),
                gas_estimate: Some(100_000),
                send_failures: 0,
                reject_send: false,
                revert_all: false,
                receipt_error: false,
                usdc: BigUint::from(1_000_000_000u64),
                allowance: BigUint::from(0u32),
                deposits: BigUint::from(0u32),
                reward: BigUint::from(0u32),
                rank: RankInfo {
                    rank_name: "Bronze".to_string(),
                    bonus_rate: 250,
                    progress_to_next_rank: 4_200,
                },
                sent: Vec::new(),
                block_number: 100,
                receipts: HashMap::new(),
            }),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut ChainState)) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn sent(&self) -> Vec<ContractCall> {
        self.state.lock().unwrap().sent.clone()
    }

    fn settle(state: &mut ChainState, call: &ContractCall) -> bool {
        match call {
            ContractCall::Approve { amount, .. } => {
                state.allowance = amount.clone();
                true
            }
            ContractCall::Deposit { amount, .. } => {
                if *amount > state.usdc || *amount > state.allowance {
                    return false;
                }
                state.usdc -= amount;
                state.allowance -= amount;
                state.deposits += amount;
                true
            }
            ContractCall::Withdraw { amount } => {
                if *amount > state.deposits {
                    return false;
                }
                state.deposits -= amount;
                state.usdc += amount;
                true
            }
            ContractCall::ClaimDepositReward => {
                let reward = std::mem::take(&mut state.reward);
                state.usdc += reward;
                true
            }
            ContractCall::ClaimReferralReward | ContractCall::GenerateReferralCode => true,
        }
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultContract for MockChain {
    fn gas_price(&self) -> Result<BigUint> {
        self.state
            .lock()
            .unwrap()
            .gas_price
            .clone()
            .ok_or_else(|| VaultError::Network("eth_gasPrice unavailable".to_string()))
    }

    fn estimate_gas(&self, _from: &str, _call: &ContractCall) -> Result<u64> {
        self.state
            .lock()
            .unwrap()
            .gas_estimate
            .ok_or_else(|| VaultError::Network("execution reverted".to_string()))
    }

    fn send(&self, _from: &str, call: &ContractCall, _gas: &GasParameters) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        if state.reject_send {
            return Err(VaultError::Provider {
                code: USER_REJECTED_CODE,
                message: "User denied transaction signature.".to_string(),
            });
        }
        if state.send_failures > 0 {
            state.send_failures -= 1;
            return Err(VaultError::Network("connection reset".to_string()));
        }

        let hash = format!("0x{}", hex::encode(rand::random::<[u8; 32]>()));
        let success = !state.revert_all && Self::settle(&mut state, call);
        state.receipts.insert(hash.clone(), success);
        state.sent.push(call.clone());
        Ok(hash)
    }

    fn wait_for_receipt(&self, hash: &str, _confirmations: u64) -> Result<TransactionReceipt> {
        let mut state = self.state.lock().unwrap();
        if state.receipt_error {
            return Err(VaultError::Network("receipt not found".to_string()));
        }
        let success = *state
            .receipts
            .get(hash)
            .ok_or_else(|| VaultError::Transaction(format!("Unknown transaction {hash}")))?;
        state.block_number += 1;
        Ok(TransactionReceipt {
            hash: hash.to_string(),
            block_number: Some(state.block_number),
            success,
        })
    }

    fn usdc_balance(&self, _owner: &str) -> Result<BigUint> {
        Ok(self.state.lock().unwrap().usdc.clone())
    }

    fn allowance(&self, _owner: &str, _spender: &str) -> Result<BigUint> {
        Ok(self.state.lock().unwrap().allowance.clone())
    }

    fn deposits(&self, _owner: &str) -> Result<BigUint> {
        Ok(self.state.lock().unwrap().deposits.clone())
    }

    fn calculate_reward(&self, _owner: &str) -> Result<BigUint> {
        Ok(self.state.lock().unwrap().reward.clone())
    }

    fn user_rank(&self, _owner: &str) -> Result<RankInfo> {
        Ok(self.state.lock().unwrap().rank.clone())
    }
}
