//! Contract transactions
//!
//! Gas estimation, the submit-and-confirm executor and the vault actions
//! built on top of it. Chain access goes through [`VaultContract`].

pub mod actions;
pub mod contract;
pub mod executor;
pub mod gas;

pub use actions::VaultActions;
pub use contract::{ContractCall, GasParameters, RankInfo, TransactionReceipt, VaultContract};
pub use executor::{TransactionExecutor, TransactionRequest};
pub use gas::{transaction_cost, GasEstimator, TransactionCost};
