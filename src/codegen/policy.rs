use anyhow::{Context, Result};
use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Decode a policy document as returned by IAM: a percent-encoded JSON string.
///
/// Both a failed percent-decode and a failed JSON parse are reported as
/// recoverable errors; callers attach the owning resource so the failure can
/// be diagnosed.
pub fn decode_policy_document(raw: &str) -> Result<Value> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .context("policy document is not valid percent-encoded UTF-8")?;

    serde_json::from_str(&decoded).context("policy document is not valid JSON")
}

/// Collapse a policy statement field that may be a single string or a list of
/// strings into a uniform list. Any other shape yields an empty list.
///
/// IAM serializes `Action` and `Resource` either way depending on how the
/// policy was written, so templates always go through this.
pub fn string_or_seq(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_policy_document() {
        let raw = "%7B%22Version%22%3A%222012-10-17%22%2C%22Statement%22%3A%5B%5D%7D";
        let doc = decode_policy_document(raw).unwrap();

        assert_eq!(doc["Version"], "2012-10-17");
        assert!(doc["Statement"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_decode_policy_document_plain_json() {
        // Documents that were never percent-encoded decode unchanged.
        let doc = decode_policy_document(r#"{"Statement":[{"Action":"sts:AssumeRole"}]}"#).unwrap();
        assert_eq!(doc["Statement"][0]["Action"], "sts:AssumeRole");
    }

    #[test]
    fn test_decode_policy_document_invalid_json() {
        let err = decode_policy_document("%7Bnot-json").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_decode_policy_document_invalid_utf8() {
        let err = decode_policy_document("%FF%FE").unwrap_err();
        assert!(err.to_string().contains("percent-encoded"));
    }

    #[test]
    fn test_string_or_seq_scalar() {
        assert_eq!(
            string_or_seq(&json!("dynamodb:GetItem")),
            vec!["dynamodb:GetItem".to_string()]
        );
    }

    #[test]
    fn test_string_or_seq_list() {
        assert_eq!(
            string_or_seq(&json!(["sqs:SendMessage", "sqs:ReceiveMessage"])),
            vec!["sqs:SendMessage".to_string(), "sqs:ReceiveMessage".to_string()]
        );
    }

    #[test]
    fn test_string_or_seq_other_shapes() {
        assert!(string_or_seq(&json!(null)).is_empty());
        assert!(string_or_seq(&json!(42)).is_empty());
        assert!(string_or_seq(&json!({"Action": "x"})).is_empty());
    }
}
