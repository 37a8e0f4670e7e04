
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod config;
pub mod constants;
pub mod error;
pub mod fixtures;
pub mod mock;
pub mod node;
pub mod poll;
pub mod rpc;
pub mod template;
pub mod util;
pub mod validate;

pub use config::{Config, NodeParams, WalletParams};
pub use error::{Error, Result};
pub use mock::ScriptedRpc;
pub use node::{
	check_synced, enable_mining, validate_client, wait_for_blocks, wait_for_confirmations,
	wait_for_tx_confirmed_blocking,
};
pub use poll::{poll_until, Check, PollPolicy};
pub use rpc::{create_client, GetInfo, KomodoRpcExt, RpcErrorExt};
