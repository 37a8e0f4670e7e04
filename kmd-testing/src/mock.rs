//! An in-memory [RpcApi] that answers from a script.
//!
//! Replies are queued per method and handed out in order. Once a
//! method's queue runs dry its last reply keeps being returned, so a
//! single `reply` scripts a node that always answers the same.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Mutex;

use bitcoincore_rpc::{jsonrpc, Error, Result as RpcResult, RpcApi};

#[derive(Debug, Clone)]
enum Reply {
	Ok(serde_json::Value),
	RpcError { code: i32, message: String },
	Transport(String),
	Fatal(String),
}

impl Reply {
	fn into_result(self) -> RpcResult<serde_json::Value> {
		match self {
			Reply::Ok(v) => Ok(v),
			Reply::RpcError { code, message } => Err(ScriptedRpc::rpc_error(code, message)),
			Reply::Transport(msg) => Err(ScriptedRpc::transport_error(msg)),
			Reply::Fatal(msg) => Err(ScriptedRpc::fatal_error(msg)),
		}
	}
}

#[derive(Debug, Default)]
struct Script {
	queued: VecDeque<Reply>,
	last: Option<Reply>,
}

#[derive(Debug, Default)]
pub struct ScriptedRpc {
	scripts: Mutex<HashMap<String, Script>>,
	calls: Mutex<Vec<(String, Vec<serde_json::Value>)>>,
}

impl ScriptedRpc {
	pub fn new() -> Self {
		Self::default()
	}

	/// A JSON-RPC error response as the daemon would send it.
	pub fn rpc_error(code: i32, message: impl Into<String>) -> Error {
		Error::JsonRpc(jsonrpc::Error::Rpc(jsonrpc::error::RpcError {
			code,
			message: message.into(),
			data: None,
		}))
	}

	/// The daemon could not be reached.
	pub fn transport_error(message: impl Into<String>) -> Error {
		let err = io::Error::new(io::ErrorKind::ConnectionRefused, message.into());
		Error::JsonRpc(jsonrpc::Error::Transport(Box::new(err)))
	}

	/// An error that is not worth retrying.
	pub fn fatal_error(message: impl Into<String>) -> Error {
		Error::ReturnedError(message.into())
	}

	fn push(&self, method: &str, reply: Reply) -> &Self {
		self.scripts.lock().unwrap()
			.entry(method.to_owned())
			.or_default()
			.queued.push_back(reply);
		self
	}

	pub fn reply(&self, method: &str, value: serde_json::Value) -> &Self {
		self.push(method, Reply::Ok(value))
	}

	pub fn reply_rpc_error(&self, method: &str, code: i32, message: &str) -> &Self {
		self.push(method, Reply::RpcError { code, message: message.to_owned() })
	}

	pub fn reply_transport_error(&self, method: &str, message: &str) -> &Self {
		self.push(method, Reply::Transport(message.to_owned()))
	}

	pub fn reply_fatal(&self, method: &str, message: &str) -> &Self {
		self.push(method, Reply::Fatal(message.to_owned()))
	}

	/// All calls made so far with their arguments, oldest first.
	pub fn calls(&self) -> Vec<(String, Vec<serde_json::Value>)> {
		self.calls.lock().unwrap().clone()
	}

	pub fn call_count(&self, method: &str) -> usize {
		self.calls.lock().unwrap().iter().filter(|(m, _)| m == method).count()
	}

	fn next_reply(&self, method: &str) -> Option<Reply> {
		let mut scripts = self.scripts.lock().unwrap();
		let script = scripts.get_mut(method)?;
		if let Some(reply) = script.queued.pop_front() {
			script.last = Some(reply);
		}
		script.last.clone()
	}
}

impl RpcApi for ScriptedRpc {
	fn call<T: for<'a> serde::de::Deserialize<'a>>(
		&self, cmd: &str, args: &[serde_json::Value],
	) -> RpcResult<T> {
		self.calls.lock().unwrap().push((cmd.to_owned(), args.to_vec()));
		trace!("scripted rpc: {} {:?}", cmd, args);

		let reply = self.next_reply(cmd)
			.unwrap_or_else(|| Reply::Fatal(format!("no reply scripted for {}", cmd)));
		let value = reply.into_result()?;
		Ok(serde_json::from_value(value)?)
	}
}
