use regex::Regex;
use serde_json::Value;

use crate::constants::DEFAULT_ROUGH_LIMIT;
use crate::error::{Error, Result};

lazy_static! {
	static ref TXID_PATTERN: Regex = Regex::new(r"^[0-9a-f]{64}$").unwrap();
	static ref ADDRESS_PATTERN: Regex = Regex::new(r"^R[a-zA-Z0-9]{33}$").unwrap();
}

/// Something that might hold a string, like an RPC response field.
pub trait AsText {
	fn as_text(&self) -> Option<&str>;
}

impl AsText for str {
	fn as_text(&self) -> Option<&str> { Some(self) }
}

impl AsText for String {
	fn as_text(&self) -> Option<&str> { Some(self.as_str()) }
}

impl AsText for Value {
	fn as_text(&self) -> Option<&str> { self.as_str() }
}

/// Whether `value` is a string of exactly 64 lowercase hex characters.
pub fn is_valid_txid(value: &(impl AsText + ?Sized)) -> bool {
	value.as_text().map(|s| TXID_PATTERN.is_match(s)).unwrap_or(false)
}

/// Whether `value` looks like a transparent address: `R` and 33 alphanumerics.
pub fn is_valid_address(value: &(impl AsText + ?Sized)) -> bool {
	value.as_text().map(|s| ADDRESS_PATTERN.is_match(s)).unwrap_or(false)
}

/// Collect the `id` of every entry of the list under `key`, as strings.
pub fn collect_order_ids(response: &Value, key: &str) -> Result<Vec<String>> {
	let items = response.get(key).and_then(Value::as_array)
		.ok_or_else(|| Error::UnexpectedResponse(format!("no list under '{}'", key)))?;

	Ok(items.iter().map(|item| match item.get("id") {
		Some(Value::String(s)) => s.clone(),
		Some(v) => v.to_string(),
		None => Value::Null.to_string(),
	}).collect())
}

/// Whether `compare` is at least 99% of `base`.
pub fn in_99_range(compare: f64, base: f64) -> bool {
	compare >= 0.99 * base
}

/// Whether `base` is no more than 30 below `comp`.
pub fn compare_rough(base: f64, comp: f64) -> bool {
	compare_rough_within(base, comp, DEFAULT_ROUGH_LIMIT)
}

pub fn compare_rough_within(base: f64, comp: f64, limit: f64) -> bool {
	base >= comp - limit
}

#[cfg(test)]
mod test {
	use serde_json::json;

	use super::*;

	#[test]
	fn txids() {
		assert!(is_valid_txid(&"a".repeat(64)));
		assert!(is_valid_txid("8f3b0a1c5e0d4f7a9b2c6d1e3f5a7b9c0d2e4f6a8b1c3d5e7f9a0b2c4d6e8f0a"));
		assert!(!is_valid_txid(&"a".repeat(63)));
		assert!(!is_valid_txid(&"a".repeat(65)));
		assert!(!is_valid_txid(&format!("G{}", "a".repeat(63))));
		assert!(!is_valid_txid(&"A".repeat(64)));
		assert!(is_valid_txid(&json!("b".repeat(64))));
		assert!(!is_valid_txid(&json!(42)));
		assert!(!is_valid_txid(&Value::Null));
	}

	#[test]
	fn addresses() {
		assert!(is_valid_address("Ra1B2c3D4e5F6g7H8i9J0k1L2m3N4o5P6q"));
		assert!(is_valid_address(&json!("RHzK4C4HckhZ6DBVkFRBfEBDL8JrKFWySe")));
		assert!(!is_valid_address("Ra1B2c3D4e5F6g7H8i9J0k1L2m3N4o5P6"));
		assert!(!is_valid_address("Ra1B2c3D4e5F6g7H8i9J0k1L2m3N4o5P6qr"));
		assert!(!is_valid_address("ra1B2c3D4e5F6g7H8i9J0k1L2m3N4o5P6q"));
		assert!(!is_valid_address("Ra1B2c3D4e5F6g7H8i9J0k1L2m3N4o5P6q\n"));
		assert!(!is_valid_address(&json!(["RHzK4C4HckhZ6DBVkFRBfEBDL8JrKFWySe"])));
	}

	#[test]
	fn order_ids_keep_order() {
		let response = json!({ "orders": [{ "id": 5 }, { "id": "x" }, { "price": 1 }] });
		assert_eq!(collect_order_ids(&response, "orders").unwrap(), vec!["5", "x", "null"]);
		assert_eq!(collect_order_ids(&json!({ "orders": [] }), "orders").unwrap(), Vec::<String>::new());
		assert!(matches!(
			collect_order_ids(&response, "matches"),
			Err(Error::UnexpectedResponse(_)),
		));
	}

	#[test]
	fn tolerances() {
		assert!(in_99_range(99.0, 100.0));
		assert!(in_99_range(120.0, 100.0));
		assert!(!in_99_range(98.0, 100.0));

		assert!(compare_rough(70.0, 100.0));
		assert!(!compare_rough(69.0, 100.0));
		assert!(compare_rough_within(99.5, 100.0, 0.5));
		assert!(!compare_rough_within(99.0, 100.0, 0.5));
	}
}
