pub mod env {
	/// Path of the config file with node and wallet parameters.
	pub const TEST_CONFIG: &str = "KMD_TEST_CONFIG";
	/// Prefix for config overrides from the environment.
	pub const TEST_CONFIG_PREFIX: &str = "KMD_TEST";
	/// Log level filter for [crate::util::init_logging].
	pub const TEST_LOG: &str = "TEST_LOG";
}

pub mod rpc {
	use std::time::Duration;

	pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);
}

/// Pacing and budgets of the polling helpers in [crate::node].
pub mod poll {
	use std::time::Duration;

	pub const HEALTH_INTERVAL: Duration = Duration::from_secs(10);
	pub const HEALTH_ATTEMPTS: usize = 16;

	/// Time given to the chain to settle after a node has been validated.
	pub const CHAIN_SETTLE_TIME: Duration = Duration::from_secs(15);

	pub const MINING_INTERVAL: Duration = Duration::from_secs(10);
	pub const MINING_ATTEMPTS: usize = 31;

	/// 121 checks 10 seconds apart, about 20 minutes per node.
	pub const SYNC_INTERVAL: Duration = Duration::from_secs(10);
	pub const SYNC_ATTEMPTS: usize = 121;

	pub const CONFIRMATION_INTERVAL: Duration = Duration::from_secs(5);
	pub const CONFIRMATION_ATTEMPTS: usize = 100;

	pub const TX_CONFIRMED_INTERVAL: Duration = Duration::from_secs(2);

	pub const BLOCKS_INTERVAL: Duration = Duration::from_secs(5);
}

/// Confirmations most tests wait for after sending a tx.
pub const DEFAULT_MIN_CONFIRMATIONS: i64 = 2;

/// Slack used by [crate::validate::compare_rough].
pub const DEFAULT_ROUGH_LIMIT: f64 = 30.0;
