use std::io;
use std::path::PathBuf;

use bitcoincore_rpc::jsonrpc;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The RPC client could not be built. Probably no daemon on that port.
	#[error("connection error for {addr}, probably no daemon on selected port: {source}")]
	Connection {
		addr: String,
		#[source]
		source: jsonrpc::Error,
	},
	/// The node never answered `getinfo`.
	#[error("node {node} does not respond after {attempts} attempts")]
	NodeUnresponsive { node: usize, attempts: usize },
	/// `setgenerate` kept failing while the chain was starting up.
	#[error("node did not start correctly after {attempts} attempts: {last}")]
	NodeStartupFailed { attempts: usize, last: String },
	#[error("block template does not match the schema: {0}")]
	SchemaValidation(String),
	#[error("file not found: {}", .0.display())]
	FileNotFound(PathBuf),
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),
	#[error("RPC error: {0}")]
	Rpc(#[from] bitcoincore_rpc::Error),
	/// A sanity check on the node failed. Not retried.
	#[error("check failed: {0}")]
	Assertion(String),
	#[error("unexpected RPC response: {0}")]
	UnexpectedResponse(String),
	#[error("invalid configuration: {0}")]
	Config(String),
}
