//! Block template checks, see BIP 0022.

use serde_json::{json, Value};

use crate::error::{Error, Result};

lazy_static! {
	static ref BLOCK_TEMPLATE_SCHEMA: Value = json!({
		"type": "object",
		"required": ["bits", "curtime", "height", "previousblockhash", "version", "coinbasetxn"],
		"properties": {
			"capabilities": { "type": "array", "items": { "type": "string" } },
			"version": { "type": ["integer", "number"] },
			"previousblockhash": { "type": "string" },
			"finalsaplingroothash": { "type": "string" },
			"transactions": { "type": "array", "items": { "type": "object" } },
			"coinbasetxn": {
				"type": "object",
				"required": ["data", "hash", "depends", "fee", "required", "sigops"],
				"properties": {
					"data": { "type": "string" },
					"hash": { "type": "string" },
					"depends": { "type": "array" },
					"fee": { "type": ["integer", "number"] },
					"sigops": { "type": ["integer", "number"] },
					"coinbasevalue": { "type": ["integer", "number"] },
					"required": { "type": "boolean" }
				}
			},
			"longpollid": { "type": "string" },
			"target": { "type": "string" },
			"mintime": { "type": ["integer", "number"] },
			"mutable": { "type": "array", "items": { "type": "string" } },
			"noncerange": { "type": "string" },
			"sigoplimit": { "type": ["integer", "number"] },
			"sizelimit": { "type": ["integer", "number"] },
			"curtime": { "type": ["integer", "number"] },
			"bits": { "type": "string" },
			"height": { "type": ["integer", "number"] }
		}
	});
}

/// The schema `getblocktemplate` responses are checked against by default.
pub fn default_block_template_schema() -> &'static Value {
	&BLOCK_TEMPLATE_SCHEMA
}

/// Validate a `getblocktemplate` response against `schema`, or against
/// [default_block_template_schema] if none is given.
pub fn validate_block_template(template: &Value, schema: Option<&Value>) -> Result<()> {
	let schema = schema.unwrap_or(&BLOCK_TEMPLATE_SCHEMA);
	let validator = jsonschema::validator_for(schema)
		.map_err(|e| Error::SchemaValidation(format!("invalid schema: {}", e)))?;

	let errors = validator.iter_errors(template)
		.map(|e| format!("{} at '{}'", e, e.instance_path))
		.collect::<Vec<_>>();
	if errors.is_empty() {
		Ok(())
	} else {
		Err(Error::SchemaValidation(errors.join("; ")))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn template() -> Value {
		json!({
			"capabilities": ["proposal"],
			"version": 4,
			"previousblockhash": "027e3758c3a65b12aa1046462b486d0a63bfa1beae327897f56c5cfb7daaae71",
			"finalsaplingroothash": "3e49b5f954aa9d3545bc6c37744661eea48d7c34e3000d82b7f0010c30f4c2fb",
			"transactions": [],
			"coinbasetxn": {
				"data": "0400008085202f89010000000000",
				"hash": "9e4a3f1a8e6b1c8c55ec5ab7d3d0d8d3e0b6e4f0b36c5e4f7a7c51a0a8b31b8c",
				"depends": [],
				"fee": 0,
				"sigops": 1,
				"coinbasevalue": 300000000,
				"required": true
			},
			"longpollid": "027e3758c3a65b12aa1046462b486d0a63bfa1beae327897f56c5cfb7daaae7112",
			"target": "0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f",
			"mintime": 1586960843,
			"mutable": ["time", "transactions", "prevblock"],
			"noncerange": "00000000ffffffff",
			"sigoplimit": 20000,
			"sizelimit": 2000000,
			"curtime": 1586961264,
			"bits": "200f0f0f",
			"height": 12
		})
	}

	#[test]
	fn accepts_a_regtest_template() {
		validate_block_template(&template(), None).unwrap();
	}

	#[test]
	fn reports_missing_fields() {
		let mut tpl = template();
		tpl.as_object_mut().unwrap().remove("bits");
		tpl["coinbasetxn"].as_object_mut().unwrap().remove("sigops");

		match validate_block_template(&tpl, None) {
			Err(Error::SchemaValidation(msg)) => {
				assert!(msg.contains("bits"), "{}", msg);
				assert!(msg.contains("sigops"), "{}", msg);
			},
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn reports_wrong_types() {
		let mut tpl = template();
		tpl["height"] = json!("twelve");
		tpl["coinbasetxn"]["required"] = json!(1);
		assert!(matches!(validate_block_template(&tpl, None), Err(Error::SchemaValidation(_))));
	}

	#[test]
	fn custom_schema() {
		let schema = json!({ "type": "object", "required": ["height"] });
		validate_block_template(&json!({ "height": 1 }), Some(&schema)).unwrap();
		assert!(validate_block_template(&json!({ "bits": "1" }), Some(&schema)).is_err());
		assert!(validate_block_template(&json!({ "bits": "1" }), None).is_err());

		let broken = json!({ "type": "no such type" });
		assert!(matches!(
			validate_block_template(&json!({}), Some(&broken)),
			Err(Error::SchemaValidation(_)),
		));
	}
}
