use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;
use url::Url;

use super::{ChainReadError, ChainReader, ViewFunction};
use crate::constants::RPC_REQUEST_TIMEOUT;

const BLOCK_TAG: &str = "latest";

/// JSON-RPC reader over plain HTTP (`eth_call`, `eth_getBalance`).
#[derive(Debug)]
pub struct JsonRpcChainReader {
    http: Client,
    endpoint: Url,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Serialize)]
struct CallRequest {
    to: Address,
    data: Bytes,
}

impl JsonRpcChainReader {
    pub fn new(endpoint: Url) -> Result<Self, ChainReadError> {
        let http = Client::builder().timeout(RPC_REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(http, endpoint))
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn request<P, T>(
        &self,
        method: &str,
        params: P,
    ) -> Result<T, ChainReadError>
    where
        P: Serialize + Send,
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let envelope: RpcResponse<T> = response.json().await?;
        if let Some(error) = envelope.error {
            return Err(ChainReadError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        envelope.result.ok_or_else(|| {
            ChainReadError::Malformed(format!(
                "{method} response carried neither result nor error"
            ))
        })
    }
}

#[async_trait]
impl ChainReader for JsonRpcChainReader {
    async fn read_uint(
        &self,
        contract: Address,
        function: ViewFunction,
    ) -> Result<U256, ChainReadError> {
        debug!(%contract, %function, "eth_call");
        let call = CallRequest {
            to: contract,
            data: Bytes::copy_from_slice(&function.selector()),
        };
        let output: Bytes = self.request("eth_call", (call, BLOCK_TAG)).await?;
        decode_uint(function, &output)
    }

    async fn native_balance(
        &self,
        address: Address,
    ) -> Result<U256, ChainReadError> {
        debug!(%address, "eth_getBalance");
        self.request("eth_getBalance", (address, BLOCK_TAG)).await
    }
}

/// Decode the first ABI word of a call result.
fn decode_uint(
    function: ViewFunction,
    output: &[u8],
) -> Result<U256, ChainReadError> {
    if output.is_empty() {
        return Err(ChainReadError::EmptyReturn { function });
    }
    if output.len() < 32 {
        return Err(ChainReadError::Malformed(format!(
            "{function} returned {} bytes, expected at least 32",
            output.len()
        )));
    }
    Ok(U256::from_be_slice(&output[..32]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_first_word() {
        let mut word = [0u8; 32];
        word[31] = 42;
        assert_eq!(
            decode_uint(ViewFunction::TotalMinted, &word).unwrap(),
            U256::from(42u64)
        );
    }

    #[test]
    fn empty_output_means_function_absent() {
        assert!(matches!(
            decode_uint(ViewFunction::MaxSupply, &[]),
            Err(ChainReadError::EmptyReturn {
                function: ViewFunction::MaxSupply
            })
        ));
    }

    #[test]
    fn short_output_is_malformed() {
        assert!(matches!(
            decode_uint(ViewFunction::MaxSupply, &[1, 2, 3]),
            Err(ChainReadError::Malformed(_))
        ));
    }
}
