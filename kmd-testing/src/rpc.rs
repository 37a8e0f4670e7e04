use std::borrow::Borrow;

use bitcoincore_rpc::{jsonrpc, Client, Error, Result as RpcResult, RpcApi};
use serde::{Deserialize, Serialize};

use crate::config::NodeParams;
use crate::constants::rpc::CLIENT_TIMEOUT;

/// Build an RPC client for the node.
///
/// Nothing is sent to the node here, a daemon that is down is only
/// noticed by the first call.
pub fn create_client(params: &NodeParams) -> Result<Client, crate::Error> {
	let addr = params.rpc_addr();
	let transport = jsonrpc::simple_http::Builder::new()
		.timeout(CLIENT_TIMEOUT)
		.url(&params.rpc_url())
		.map_err(|e| crate::Error::Connection { addr: addr.clone(), source: e.into() })?
		.auth(params.rpc_user.as_str(), Some(params.rpc_password.as_str()))
		.build();
	debug!("Created RPC client for {}", addr);
	Ok(Client::from_jsonrpc(jsonrpc::Client::with_transport(transport)))
}

/// The part of the `getinfo` response the helpers look at.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GetInfo {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub blocks: Option<u64>,
	#[serde(default)]
	pub synced: Option<bool>,
	/// Only reported when the daemon runs with `-pubkey=`.
	#[serde(default)]
	pub pubkey: Option<String>,
	#[serde(default)]
	pub balance: Option<f64>,
	#[serde(default)]
	pub connections: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
struct ValidateAddress {
	#[serde(default)]
	ismine: bool,
}

/// Shorthand for converting a variable into a serde_json::Value.
fn into_json<T>(val: T) -> RpcResult<serde_json::Value>
where
	T: serde::ser::Serialize,
{
	Ok(serde_json::to_value(val)?)
}

/// Reads an integer confirmations field, anything else is `None`.
fn confirmations_field(v: &serde_json::Value) -> Option<i64> {
	v.get("confirmations").and_then(|c| c.as_i64())
}

pub trait RpcErrorExt: Borrow<Error> {
	/// Whether the error may go away by asking again later.
	///
	/// These are the errors a daemon throws at us while it is still
	/// starting up: error responses and failures to reach it at all.
	fn is_transient(&self) -> bool {
		matches!(self.borrow(), Error::JsonRpc(_) | Error::Io(_))
	}
}
impl RpcErrorExt for Error {}

/// The Komodo daemon calls used by the test helpers.
///
/// Method names stay clear of those on [RpcApi] so both traits can be
/// in scope at once.
pub trait KomodoRpcExt: RpcApi {
	fn node_info(&self) -> RpcResult<GetInfo> {
		self.call("getinfo", &[])
	}

	fn import_wif(&self, wif: &str, label: &str, rescan: bool) -> RpcResult<serde_json::Value> {
		self.call("importprivkey", &[into_json(wif)?, into_json(label)?, into_json(rescan)?])
	}

	fn address_is_mine(&self, address: &str) -> RpcResult<bool> {
		let res: ValidateAddress = self.call("validateaddress", &[into_json(address)?])?;
		Ok(res.ismine)
	}

	fn chain_verifies(&self) -> RpcResult<bool> {
		self.call("verifychain", &[])
	}

	fn wallet_balance(&self) -> RpcResult<f64> {
		self.call("getbalance", &[])
	}

	fn set_mining(&self, generate: bool, threads: usize) -> RpcResult<serde_json::Value> {
		self.call("setgenerate", &[into_json(generate)?, into_json(threads)?])
	}

	/// Confirmations of the tx as reported by `getrawtransaction`.
	///
	/// `None` while the field is absent, which is the case for txs that
	/// are still in the mempool.
	fn raw_tx_confirmations(&self, txid: &str) -> RpcResult<Option<i64>> {
		let tx: serde_json::Value = self.call("getrawtransaction", &[into_json(txid)?, into_json(1)?])?;
		Ok(confirmations_field(&tx))
	}

	/// Confirmations of a wallet tx, a missing or malformed value is zero.
	fn wallet_tx_confirmations(&self, txid: &str) -> RpcResult<i64> {
		let tx: serde_json::Value = self.call("gettransaction", &[into_json(txid)?])?;
		Ok(confirmations_field(&tx).unwrap_or(0))
	}
}

impl<T: RpcApi> KomodoRpcExt for T {}
