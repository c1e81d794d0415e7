use crate::core::errors::BuildError;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Query parameters keyed in canonical (lexicographic) order.
pub type QueryPairs = BTreeMap<String, String>;

/// Flattens typed params into string pairs.
///
/// Strings are kept verbatim, numbers and booleans use their JSON text, and
/// `null` fields are skipped. `()` and unit structs yield no pairs. Nested
/// arrays or objects cannot be expressed as a flat query and are rejected.
pub fn to_query_pairs<P>(params: &P) -> Result<QueryPairs, BuildError>
where
    P: Serialize + ?Sized,
{
    let object = match serde_json::to_value(params)? {
        Value::Null => return Ok(QueryPairs::new()),
        Value::Object(object) => object,
        other => return Err(BuildError::NotAnObject(json_kind(&other))),
    };

    let mut pairs = QueryPairs::new();
    for (key, value) in object {
        let rendered = match value {
            Value::Null => continue,
            Value::String(text) => text,
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => number.to_string(),
            other @ (Value::Array(_) | Value::Object(_)) => {
                return Err(BuildError::UnsupportedField {
                    key,
                    kind: json_kind(&other),
                })
            }
        };
        pairs.insert(key, rendered);
    }
    Ok(pairs)
}

/// URL-encodes pairs as `k=v&k=v` in key order.
pub fn encode(pairs: &QueryPairs) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct OrderParams {
        symbol: String,
        side: &'static str,
        quantity: f64,
        reduce_only: bool,
        new_client_order_id: Option<String>,
    }

    #[test]
    fn test_pairs_are_sorted_and_rendered() {
        let params = OrderParams {
            symbol: "ETHUSDT".into(),
            side: "BUY",
            quantity: 0.02,
            reduce_only: false,
            new_client_order_id: None,
        };
        let pairs = to_query_pairs(&params).unwrap();
        assert_eq!(
            encode(&pairs),
            "quantity=0.02&reduceOnly=false&side=BUY&symbol=ETHUSDT"
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let mut a = HashMap::new();
        a.insert("symbol", "BTCUSDT");
        a.insert("interval", "1m");
        a.insert("limit", "5");
        a.insert("endTime", "1700000000000");
        let first = encode(&to_query_pairs(&a).unwrap());
        let second = encode(&to_query_pairs(&a).unwrap());
        assert_eq!(first, second);
        assert_eq!(
            first,
            "endTime=1700000000000&interval=1m&limit=5&symbol=BTCUSDT"
        );
    }

    #[test]
    fn test_unit_params_are_empty() {
        assert!(to_query_pairs(&()).unwrap().is_empty());
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let mut params = BTreeMap::new();
        params.insert("newClientOrderId", "a b&c");
        assert_eq!(
            encode(&to_query_pairs(&params).unwrap()),
            "newClientOrderId=a%20b%26c"
        );
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let params = serde_json::json!({ "symbols": ["BTCUSDT", "ETHUSDT"] });
        let err = to_query_pairs(&params).unwrap_err();
        assert!(matches!(
            err,
            BuildError::UnsupportedField { ref key, kind: "array" } if key == "symbols"
        ));
    }

    #[test]
    fn test_non_object_params_are_rejected() {
        let err = to_query_pairs(&42).unwrap_err();
        assert!(matches!(err, BuildError::NotAnObject("number")));
    }
}
