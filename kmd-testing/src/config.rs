use std::io;
use std::path::Path;

use anyhow::Context;
use config::{Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::env::{TEST_CONFIG, TEST_CONFIG_PREFIX};
use crate::error::Error;

/// Where to reach the RPC of one test node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeParams {
	pub rpc_user: String,
	pub rpc_password: String,
	pub rpc_ip: String,
	pub rpc_port: u16,
}

impl NodeParams {
	/// The RPC address without credentials, safe to log.
	pub fn rpc_addr(&self) -> String {
		format!("{}:{}", self.rpc_ip, self.rpc_port)
	}

	pub fn rpc_url(&self) -> String {
		format!("http://{}", self.rpc_addr())
	}
}

/// Wallet material for the test nodes, indexed by node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WalletParams {
	#[serde(default)]
	pub test_wif: Vec<String>,
	#[serde(default)]
	pub test_address: Vec<String>,
	/// Only set for nodes started with `-pubkey=`.
	#[serde(default)]
	pub test_pubkey: Vec<String>,
}

impl WalletParams {
	pub fn wif(&self, node: usize) -> Result<&str, Error> {
		self.test_wif.get(node).map(String::as_str)
			.ok_or_else(|| Error::Config(format!("no test_wif for node {}", node)))
	}

	pub fn address(&self, node: usize) -> Result<&str, Error> {
		self.test_address.get(node).map(String::as_str)
			.ok_or_else(|| Error::Config(format!("no test_address for node {}", node)))
	}

	pub fn pubkey(&self, node: usize) -> Option<&str> {
		self.test_pubkey.get(node).map(String::as_str)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
	#[serde(default)]
	pub nodes: Vec<NodeParams>,
	#[serde(default)]
	pub wallet: WalletParams,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			nodes: Vec::new(),
			wallet: WalletParams::default(),
		}
	}
}

impl Config {
	fn load_with_custom_env(
		config_file: Option<&Path>,
		#[cfg(test)]
		custom_env: Option<std::collections::HashMap<String, String>>,
	) -> anyhow::Result<Self> {
		let default = config::Config::try_from(&Self::default())
			.expect("default config failed to deconstruct");

		// Three layers, later ones win:
		// - the defaults from Config's Default impl
		// - the config file, if any
		// - environment variables prefixed with `KMD_TEST`
		let mut builder = config::Config::builder()
			.add_source(default);
		if let Some(file) = config_file {
			builder = builder.add_source(File::from(file));
		}

		let env = Environment::with_prefix(TEST_CONFIG_PREFIX)
			.separator("__")
			.list_separator(",")
			.with_list_parse_key("wallet.test_wif")
			.with_list_parse_key("wallet.test_address")
			.with_list_parse_key("wallet.test_pubkey")
			.try_parsing(true);
		#[cfg(test)]
		let env = env.source(custom_env);
		builder = builder.add_source(env);

		let cfg = builder.build().context("error building config")?;
		cfg.try_deserialize().context("error parsing config")
	}

	pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
		Self::load_with_custom_env(config_file, #[cfg(test)] None)
	}

	/// Load the config from the file named by `KMD_TEST_CONFIG`, if set.
	pub fn from_env() -> anyhow::Result<Self> {
		match std::env::var_os(TEST_CONFIG) {
			Some(path) => {
				let path = Path::new(&path);
				debug!("Loading test config from {}", path.display());
				Self::load(Some(path))
					.with_context(|| format!("failed to load {}", path.display()))
			},
			None => Self::load(None),
		}
	}

	pub fn node(&self, idx: usize) -> Result<&NodeParams, Error> {
		self.nodes.get(idx)
			.ok_or_else(|| Error::Config(format!("no node with index {} configured", idx)))
	}

	/// Write the config into the writer.
	pub fn write_into(&self, writer: &mut dyn io::Write) -> anyhow::Result<()> {
		let s = toml::to_string_pretty(self).context("config serialization error")?;
		writer.write_all(s.as_bytes()).context("error writing config to writer")?;
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;
	use std::io::Write;

	use super::*;

	fn sample() -> Config {
		Config {
			nodes: vec![NodeParams {
				rpc_user: "test".into(),
				rpc_password: "hunter2".into(),
				rpc_ip: "127.0.0.1".into(),
				rpc_port: 7000,
			}],
			wallet: WalletParams {
				test_wif: vec!["UwFAoL2Y1nB3xRvAj5hNF9QmSvfa5dLGRrHgdqP1YyHbh5vWjLWM".into()],
				test_address: vec!["RHzK4C4HckhZ6DBVkFRBfEBDL8JrKFWySe".into()],
				test_pubkey: vec![],
			},
		}
	}

	#[test]
	fn default_config_loads() {
		let cfg = Config::load_with_custom_env(None, Some(HashMap::new())).unwrap();
		assert_eq!(cfg, Config::default());
		assert!(cfg.node(0).is_err());
	}

	#[test]
	fn config_file_round_trips_through_toml() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("kmd.toml");

		let mut file = std::fs::File::create(&path).unwrap();
		sample().write_into(&mut file).unwrap();
		file.flush().unwrap();

		let cfg = Config::load_with_custom_env(Some(&path), Some(HashMap::new())).unwrap();
		assert_eq!(cfg, sample());
		assert_eq!(cfg.node(0).unwrap().rpc_addr(), "127.0.0.1:7000");
		assert_eq!(cfg.node(0).unwrap().rpc_url(), "http://127.0.0.1:7000");
		assert!(cfg.wallet.pubkey(0).is_none());
	}

	#[test]
	fn env_overrides_wallet_lists() {
		let env = HashMap::from([
			("KMD_TEST__WALLET__TEST_PUBKEY".to_string(), "02aa,03bb".to_string()),
		]);
		let cfg = Config::load_with_custom_env(None, Some(env)).unwrap();
		assert_eq!(cfg.wallet.pubkey(0), Some("02aa"));
		assert_eq!(cfg.wallet.pubkey(1), Some("03bb"));
		assert!(cfg.wallet.wif(0).is_err());
	}
}
