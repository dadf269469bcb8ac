use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Error;

/// Thin JSON-RPC client against a Sui full node. Transaction bytes are
/// built node-side through the `unsafe_` builder endpoints; this crate only
/// signs and submits them.
pub struct SuiRpcClient {
    http: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct RpcResponse<R> {
    result: Option<R>,
    error: Option<RpcError>,
}

#[derive(Deserialize, Debug)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBytes {
    pub tx_bytes: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TxResponse {
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub effects: Option<TxEffects>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TxEffects {
    pub status: ExecutionStatus,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStatus {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl TxResponse {
    pub fn is_success(&self) -> bool {
        self.effects
            .as_ref()
            .is_some_and(|e| e.status.status == "success")
    }

    pub fn failure_reason(&self) -> String {
        self.effects
            .as_ref()
            .and_then(|e| e.status.error.clone())
            .unwrap_or_else(|| "execution status was not success".to_string())
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldPage {
    pub data: Vec<DynamicFieldInfo>,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub next_cursor: Option<Value>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldInfo {
    pub name: DynamicFieldName,
    pub object_id: String,
}

#[derive(Deserialize, Debug)]
pub struct DynamicFieldName {
    pub value: Value,
}

/// One Move call inside a node-built batch transaction.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MoveCallParams {
    pub package_object_id: String,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

// Serializes to {"moveCallRequestParams": {...}}, the shape
// unsafe_batchTransaction expects for each entry.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub enum BatchTransactionParams {
    MoveCallRequestParams(MoveCallParams),
}

impl SuiRpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> eyre::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, Error> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::submission(format!("{method} request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::submission(format!("{method} returned error status: {e}")))?;

        let body: RpcResponse<R> = response
            .json()
            .await
            .map_err(|e| Error::submission(format!("{method} response malformed: {e}")))?;

        if let Some(err) = body.error {
            return Err(Error::submission(format!(
                "{method} rpc error {}: {}",
                err.code, err.message
            )));
        }

        body.result
            .ok_or_else(|| Error::submission(format!("{method} response missing result")))
    }

    pub async fn get_object(&self, object_id: &str) -> Result<Value, Error> {
        self.call("sui_getObject", json!([object_id, { "showContent": true }]))
            .await
    }

    pub async fn get_dynamic_fields(
        &self,
        parent_id: &str,
        cursor: Option<&Value>,
    ) -> Result<DynamicFieldPage, Error> {
        self.call("suix_getDynamicFields", json!([parent_id, cursor]))
            .await
    }

    pub async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
    ) -> Result<Value, Error> {
        self.call(
            "suix_getOwnedObjects",
            json!([
                owner,
                {
                    "filter": { "StructType": struct_type },
                    "options": { "showContent": true }
                }
            ]),
        )
        .await
    }

    /// Builds a single-call transaction on the node.
    pub async fn move_call(
        &self,
        signer: &str,
        call: &MoveCallParams,
        gas_budget: u64,
    ) -> Result<TransactionBytes, Error> {
        self.call(
            "unsafe_moveCall",
            json!([
                signer,
                &call.package_object_id,
                &call.module,
                &call.function,
                &call.type_arguments,
                &call.arguments,
                Value::Null,
                gas_budget.to_string(),
            ]),
        )
        .await
    }

    /// Builds one transaction containing every call in `calls`.
    pub async fn batch_transaction(
        &self,
        signer: &str,
        calls: &[BatchTransactionParams],
        gas_budget: u64,
    ) -> Result<TransactionBytes, Error> {
        self.call(
            "unsafe_batchTransaction",
            json!([signer, calls, Value::Null, gas_budget.to_string()]),
        )
        .await
    }

    pub async fn dry_run(&self, tx_bytes: &str) -> Result<TxResponse, Error> {
        self.call("sui_dryRunTransactionBlock", json!([tx_bytes]))
            .await
    }

    pub async fn execute(&self, tx_bytes: &str, signature: &str) -> Result<TxResponse, Error> {
        self.call(
            "sui_executeTransactionBlock",
            json!([
                tx_bytes,
                [signature],
                { "showEffects": true },
                "WaitForLocalExecution"
            ]),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_params_serialize_to_expected_wire_shape() {
        let params = BatchTransactionParams::MoveCallRequestParams(MoveCallParams {
            package_object_id: "0x1".to_string(),
            module: "stamp".to_string(),
            function: "mint_to".to_string(),
            type_arguments: vec!["0x2::foo::Bar".to_string()],
            arguments: vec![json!("0x3")],
        });

        let value = serde_json::to_value(&params).unwrap();
        let call = &value["moveCallRequestParams"];
        assert_eq!(call["packageObjectId"], "0x1");
        assert_eq!(call["typeArguments"][0], "0x2::foo::Bar");
    }

    #[test]
    fn success_status_classification() {
        let ok: TxResponse = serde_json::from_value(json!({
            "digest": "abc",
            "effects": { "status": { "status": "success" } }
        }))
        .unwrap();
        assert!(ok.is_success());

        let failed: TxResponse = serde_json::from_value(json!({
            "effects": { "status": { "status": "failure", "error": "MoveAbort" } }
        }))
        .unwrap();
        assert!(!failed.is_success());
        assert_eq!(failed.failure_reason(), "MoveAbort");

        let missing: TxResponse = serde_json::from_value(json!({})).unwrap();
        assert!(!missing.is_success());
    }
}
