//! Bringing test nodes into shape and waiting for the chain.

use bitcoincore_rpc::RpcApi;

use crate::config::WalletParams;
use crate::constants::poll::*;
use crate::error::{Error, Result};
use crate::poll::{poll_until, Check, PollPolicy};
use crate::rpc::{GetInfo, KomodoRpcExt, RpcErrorExt};

/// Check that the node answers and holds the test wallet of node `node`.
///
/// Any error from `getinfo` is retried, the checks after it are not.
pub async fn validate_client<R: RpcApi>(
	wallet: &WalletParams,
	client: &R,
	node: usize,
) -> Result<()> {
	let policy = PollPolicy::bounded(HEALTH_INTERVAL, HEALTH_ATTEMPTS);
	let info = poll_until(policy, "getinfo", || match client.node_info() {
		Ok(info) => Ok::<_, Error>(Check::Ready(info)),
		Err(e) => {
			info!("Connection to node {} failed, retrying: {}", node, e);
			Ok(Check::Pending)
		},
	}).await?;
	let info = info.ok_or(Error::NodeUnresponsive { node, attempts: HEALTH_ATTEMPTS })?;
	debug!("Node {} info: {:?}", node, info);

	info!("Importing privkey for node {}", node);
	let res = client.import_wif(wallet.wif(node)?, "", true)?;
	debug!("importprivkey: {}", res);

	let address = wallet.address(node)?;
	if !client.address_is_mine(address)? {
		return Err(Error::Assertion(format!("address {} is not in the wallet of node {}", address, node)));
	}

	match (wallet.pubkey(node), client.node_info()?.pubkey) {
		(Some(expected), Some(actual)) => if expected != actual {
			return Err(Error::Assertion(format!(
				"node {} runs with pubkey {}, expected {}", node, actual, expected,
			)));
		},
		_ => info!("No -pubkey= runtime parameter specified for node {}", node),
	}

	if !client.chain_verifies()? {
		return Err(Error::Assertion(format!("verifychain failed on node {}", node)));
	}

	tokio::time::sleep(CHAIN_SETTLE_TIME).await;
	info!("Node {} balance: {}", node, client.wallet_balance()?);
	Ok(())
}

/// Number of mining threads: all cores but two, at least one.
fn mining_threads() -> usize {
	let cores = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
	cores.saturating_sub(2).max(1)
}

/// Start mining, waiting for the chain to come up if needed.
///
/// Returns the number of threads mining was started with.
pub async fn enable_mining<R: RpcApi>(client: &R) -> Result<usize> {
	let threads = mining_threads();
	let mut last = None;
	let policy = PollPolicy::bounded(MINING_INTERVAL, MINING_ATTEMPTS);
	let started = poll_until(policy, "setgenerate", || match client.set_mining(true, threads) {
		Ok(_) => Ok(Check::Ready(())),
		Err(e) if e.is_transient() => {
			info!("{}, waiting for chain startup", e);
			last = Some(e.to_string());
			Ok(Check::Pending)
		},
		Err(e) => Err(Error::Rpc(e)),
	}).await?;

	match started {
		Some(()) => {
			info!("Mining with {} threads", threads);
			Ok(threads)
		},
		None => Err(Error::NodeStartupFailed {
			attempts: MINING_ATTEMPTS,
			last: last.unwrap_or_default(),
		}),
	}
}

/// Wait for every client to report it is synced, one after the other.
///
/// Returns `false` as soon as one of them doesn't make it in time.
pub async fn check_synced<R: RpcApi>(clients: &[&R]) -> Result<bool> {
	let policy = PollPolicy::bounded(SYNC_INTERVAL, SYNC_ATTEMPTS);
	for (idx, client) in clients.iter().enumerate() {
		let synced = poll_until(policy, "synced", || {
			let info = client.node_info()?;
			client.ping()?;
			if info.synced.unwrap_or(false) {
				Ok::<_, Error>(Check::Ready(()))
			} else {
				Ok(Check::Pending)
			}
		}).await?;

		if synced.is_none() {
			warn!("Node {} did not sync", idx);
			return Ok(false);
		}
		debug!("Node {} synced", idx);
	}
	Ok(true)
}

/// Wait until `txid` has `min_confirmations` according to `getrawtransaction`.
///
/// A tx the node doesn't report confirmations for is probably still in the
/// mempool, we give it 100 tries before returning `false`.
pub async fn wait_for_confirmations<R: RpcApi>(
	client: &R,
	txid: &str,
	min_confirmations: i64,
) -> Result<bool> {
	if min_confirmations <= 0 {
		return Ok(true);
	}

	let policy = PollPolicy::bounded(CONFIRMATION_INTERVAL, CONFIRMATION_ATTEMPTS);
	let confirmed = poll_until(policy, "confirmations", || {
		Ok::<_, Error>(match client.raw_tx_confirmations(txid)? {
			Some(c) if c >= min_confirmations => Check::Ready(()),
			Some(c) => {
				debug!("tx {} has {} of {} confirmations", txid, c, min_confirmations);
				Check::Advancing
			},
			None => {
				debug!("tx {} is probably still in the mempool", txid);
				Check::Pending
			},
		})
	}).await?;

	if confirmed.is_none() {
		warn!("Waited too long for tx {}, probably stuck", txid);
	}
	Ok(confirmed.is_some())
}

/// Wait until the wallet tx `txid` has `min_confirmations`, without limit.
pub async fn wait_for_tx_confirmed_blocking<R: RpcApi>(
	client: &R,
	txid: &str,
	min_confirmations: i64,
) -> Result<bool> {
	if min_confirmations <= 0 {
		return Ok(true);
	}

	let policy = PollPolicy::forever(TX_CONFIRMED_INTERVAL);
	let confirmed = poll_until(policy, "gettransaction", || {
		let confs = client.wallet_tx_confirmations(txid)?;
		if confs >= min_confirmations {
			Ok::<_, Error>(Check::Ready(()))
		} else {
			trace!("tx {} has {} of {} confirmations", txid, confs, min_confirmations);
			Ok(Check::Pending)
		}
	}).await?;
	Ok(confirmed.is_some())
}

fn block_height(info: &GetInfo) -> Result<u64> {
	info.blocks.ok_or_else(|| Error::UnexpectedResponse("getinfo without blocks".into()))
}

/// Wait until the chain grew by `n_blocks` from the current height.
pub async fn wait_for_blocks<R: RpcApi>(client: &R, n_blocks: u64) -> Result<bool> {
	let start = block_height(&client.node_info()?)?;
	let policy = PollPolicy::forever(BLOCKS_INTERVAL);
	let reached = poll_until(policy, "blocks", || {
		let height = block_height(&client.node_info()?)?;
		if height.saturating_sub(start) >= n_blocks {
			Ok::<_, Error>(Check::Ready(height))
		} else {
			trace!("at height {}, waiting for {}", height, start + n_blocks);
			Ok(Check::Pending)
		}
	}).await?;

	if let Some(height) = reached {
		debug!("Reached height {}", height);
	}
	Ok(reached.is_some())
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn leaves_two_cores_free() {
		assert!(mining_threads() >= 1);
		let cores = std::thread::available_parallelism().unwrap().get();
		if cores > 2 {
			assert_eq!(mining_threads(), cores - 2);
		}
	}
}
