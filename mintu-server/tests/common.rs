#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, time::Duration};

use alloy_primitives::{Address, U256};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum_test::TestServer;
use mintu_core::{
    chain::{ChainReadError, ChainReader, ViewFunction},
    config::{ConfigLoader, EnvConfig},
};
use mintu_server::{AppState, create_app, sessions::SessionLimits};

/// Contract with 3 of 10 minted; every wallet holds exactly 1 ETH.
pub struct StaticChain;

#[async_trait]
impl ChainReader for StaticChain {
    async fn read_uint(
        &self,
        _contract: Address,
        function: ViewFunction,
    ) -> Result<U256, ChainReadError> {
        match function {
            ViewFunction::TotalMinted => Ok(U256::from(3)),
            ViewFunction::MaxSupply => Ok(U256::from(10)),
            _ => Err(ChainReadError::Rpc {
                code: 3,
                message: "execution reverted".into(),
            }),
        }
    }

    async fn native_balance(
        &self,
        _address: Address,
    ) -> Result<U256, ChainReadError> {
        Ok(U256::from(1_000_000_000_000_000_000u64))
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

pub fn build_test_app(vars: &[(&str, &str)]) -> Result<TestApp> {
    build_test_app_with(vars, SessionLimits::default())
}

pub fn build_test_app_with(
    vars: &[(&str, &str)],
    limits: SessionLimits,
) -> Result<TestApp> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let load = ConfigLoader::new()
        .compose(EnvConfig::from_lookup(|name| vars.get(name).cloned()))?;

    let state = AppState::new(
        Arc::new(load.config),
        Arc::new(StaticChain),
        limits,
    );
    let server = TestServer::new(create_app(state.clone(), None))
        .map_err(|err| anyhow!(err.to_string()))?;
    Ok(TestApp { server, state })
}

/// Give a freshly mounted view time to run its first poll and startup.
pub async fn let_timers_run() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
