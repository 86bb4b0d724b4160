//! Loose shapes for BotSocket / StaMP protocol payloads.
//!
//! The client does not parse or validate protocol messages; payloads stay
//! structurally loose (`serde_json` values) and only the fields the stock
//! leafs touch are named. The merge helpers encode the convention every
//! supplementing leaf follows: shallow merge where later layers win, with
//! the nested `data` object merged one level deep.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object, the common currency of supplement hooks.
pub type JsonObject = Map<String, Value>;

/// The handshake payload the server sends after a connection is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerHandshake {
    /// Id of the user the server recognised, if any.
    pub user_id: Value,
    /// Server-assigned id for this client connection.
    pub client_id: Value,
    #[serde(flatten)]
    pub rest: JsonObject,
}

impl ServerHandshake {
    /// The identity this client should adopt: the server's `userId` when
    /// present, otherwise the connection's `clientId`. Null and the empty
    /// string both count as absent.
    pub fn assigned_user_id(&self) -> Value {
        match &self.user_id {
            Value::Null => self.client_id.clone(),
            Value::String(s) if s.is_empty() => self.client_id.clone(),
            other => other.clone(),
        }
    }
}

/// An inbound render request: a "letter" of StaMP messages to present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderLetterData {
    pub letter: Vec<Value>,
    #[serde(flatten)]
    pub rest: JsonObject,
}

/// Shallow-merges `input`, then the fold accumulator, then `extra` into a
/// fresh object. Later layers win on key collision.
pub fn supplement(input: &Value, acc: Option<&Value>, extra: JsonObject) -> Value {
    let mut out = JsonObject::new();
    copy_fields(&mut out, Some(input));
    copy_fields(&mut out, acc);
    out.extend(extra);
    Value::Object(out)
}

/// Like [`supplement`], but also merges the nested `data` objects of
/// `input` and the accumulator one level deep before applying `data_extra`.
pub fn supplement_data(input: &Value, acc: Option<&Value>, data_extra: JsonObject) -> Value {
    let mut out = JsonObject::new();
    copy_fields(&mut out, Some(input));
    copy_fields(&mut out, acc);

    let mut data = JsonObject::new();
    copy_fields(&mut data, input.get("data"));
    copy_fields(&mut data, acc.and_then(|a| a.get("data")));
    data.extend(data_extra);

    out.insert("data".to_owned(), Value::Object(data));
    Value::Object(out)
}

fn copy_fields(out: &mut JsonObject, value: Option<&Value>) {
    if let Some(Value::Object(fields)) = value {
        for (key, value) in fields {
            out.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assigned_user_id_prefers_user_id() {
        let handshake: ServerHandshake =
            serde_json::from_value(json!({ "userId": "u-1", "clientId": "c-1" })).unwrap();
        assert_eq!(handshake.assigned_user_id(), json!("u-1"));
    }

    #[test]
    fn test_assigned_user_id_falls_back_to_client_id() {
        let handshake: ServerHandshake =
            serde_json::from_value(json!({ "clientId": "c-1" })).unwrap();
        assert_eq!(handshake.assigned_user_id(), json!("c-1"));

        let handshake: ServerHandshake =
            serde_json::from_value(json!({ "userId": "", "clientId": "c-1" })).unwrap();
        assert_eq!(handshake.assigned_user_id(), json!("c-1"));
    }

    #[test]
    fn test_supplement_later_layers_win() {
        let merged = supplement(
            &json!({ "a": 1, "b": "input" }),
            Some(&json!({ "b": "acc", "c": 3 })),
            [("c".to_owned(), json!("extra"))].into_iter().collect(),
        );
        assert_eq!(merged, json!({ "a": 1, "b": "acc", "c": "extra" }));
    }

    #[test]
    fn test_supplement_ignores_non_object_accumulator() {
        let merged = supplement(&json!({ "a": 1 }), Some(&json!(null)), JsonObject::new());
        assert_eq!(merged, json!({ "a": 1 }));
    }

    #[test]
    fn test_supplement_data_merges_one_level_deep() {
        let merged = supplement_data(
            &json!({ "query": "hi", "data": { "lang": "en" } }),
            Some(&json!({ "data": { "tone": "formal" } })),
            [("senderId".to_owned(), json!("u-1"))].into_iter().collect(),
        );
        assert_eq!(
            merged,
            json!({
                "query": "hi",
                "data": { "lang": "en", "tone": "formal", "senderId": "u-1" }
            })
        );
    }
}
