//! `JsonRpcChainReader` against a local JSON-RPC stub.

use std::num::NonZeroU64;

use alloy_primitives::{U256, hex};
use anyhow::Result;
use axum::{Json, Router, routing::post};
use mintu_core::{
    chain::{ChainReadError, ChainReader, JsonRpcChainReader, ViewFunction},
    constants::DEFAULT_CONTRACT_ADDRESS,
    progress::resolve_mint_progress,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

fn selector_hex(function: ViewFunction) -> String {
    hex::encode(function.selector())
}

async fn rpc(Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let outcome = match request["method"].as_str() {
        Some("eth_call") => {
            let data = request["params"][0]["data"]
                .as_str()
                .unwrap_or_default()
                .trim_start_matches("0x")
                .to_string();
            if data == selector_hex(ViewFunction::TotalMinted) {
                Ok(json!(format!("0x{:064x}", 42)))
            } else if data == selector_hex(ViewFunction::MaxSupply) {
                Ok(json!("0x"))
            } else {
                Err(json!({ "code": 3, "message": "execution reverted" }))
            }
        }
        Some("eth_getBalance") => Ok(json!("0xde0b6b3a7640000")),
        _ => Err(json!({ "code": -32601, "message": "method not found" })),
    };

    Json(match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(error) => json!({ "jsonrpc": "2.0", "id": id, "error": error }),
    })
}

async fn spawn_stub() -> Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let app = Router::new().route("/", post(rpc));
        let _ = axum::serve(listener, app).await;
    });
    Ok(Url::parse(&format!("http://{addr}/"))?)
}

#[tokio::test]
async fn reads_view_function_word() -> Result<()> {
    let reader = JsonRpcChainReader::new(spawn_stub().await?)?;
    let contract = DEFAULT_CONTRACT_ADDRESS.parse()?;

    let minted = reader.read_uint(contract, ViewFunction::TotalMinted).await?;
    assert_eq!(minted, U256::from(42));
    Ok(())
}

#[tokio::test]
async fn maps_revert_and_empty_return() -> Result<()> {
    let reader = JsonRpcChainReader::new(spawn_stub().await?)?;
    let contract = DEFAULT_CONTRACT_ADDRESS.parse()?;

    let reverted = reader
        .read_uint(contract, ViewFunction::MaxTotalSupply)
        .await
        .unwrap_err();
    assert!(matches!(reverted, ChainReadError::Rpc { code: 3, .. }));

    let empty = reader
        .read_uint(contract, ViewFunction::MaxSupply)
        .await
        .unwrap_err();
    assert!(matches!(
        empty,
        ChainReadError::EmptyReturn {
            function: ViewFunction::MaxSupply
        }
    ));
    Ok(())
}

#[tokio::test]
async fn reads_native_balance() -> Result<()> {
    let reader = JsonRpcChainReader::new(spawn_stub().await?)?;
    let wei = reader.native_balance(DEFAULT_CONTRACT_ADDRESS.parse()?).await?;
    assert_eq!(wei, U256::from(1_000_000_000_000_000_000u64));
    Ok(())
}

#[tokio::test]
async fn resolver_falls_back_per_source() -> Result<()> {
    let reader = JsonRpcChainReader::new(spawn_stub().await?)?;
    let fallback = NonZeroU64::new(100).unwrap();

    let progress = resolve_mint_progress(
        &reader,
        DEFAULT_CONTRACT_ADDRESS.parse()?,
        fallback,
    )
    .await;

    assert_eq!(progress.minted, 42);
    assert_eq!(progress.total, 100);
    Ok(())
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let reader = JsonRpcChainReader::new(Url::parse(&format!("http://{addr}/"))?)?;
    let err = reader
        .read_uint(DEFAULT_CONTRACT_ADDRESS.parse()?, ViewFunction::TotalMinted)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainReadError::Transport(_)));
    Ok(())
}
