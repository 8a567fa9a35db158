//! # Mint U Core
//!
//! Core library for the Mint U mini app: a single page, opened inside a
//! Farcaster client, that shows mint progress for an ERC721 drop on Base and
//! lets a connected wallet claim one token.
//!
//! ## Overview
//!
//! - **Configuration**: environment driven, with defaults and warnings instead
//!   of hard failures ([`config`])
//! - **Chain reads**: JSON-RPC `eth_call` against the drop contract ([`chain`])
//! - **Mint progress**: best-effort minted/total resolution ([`progress`])
//! - **Images**: manifest building and a failure-aware carousel
//!   ([`manifest`], [`carousel`])
//! - **Collaborators**: host, wallet and claim widget traits ([`host`],
//!   [`wallet`], [`claim`])
//! - **View model**: the page state, its timers and teardown ([`view`])
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mintu_core::{
//!     chain::JsonRpcChainReader, config::ConfigLoader, host::SocialHost,
//!     view::MiniAppView, wallet::Wallet,
//! };
//!
//! async fn open_page(
//!     host: Arc<dyn SocialHost>,
//!     wallet: Arc<dyn Wallet>,
//! ) -> Result<(), Box<dyn std::error::Error>> {
//!     let load = ConfigLoader::new().load()?;
//!     let config = Arc::new(load.config);
//!     let chain = Arc::new(JsonRpcChainReader::new(config.chain.rpc_url.clone())?);
//!
//!     let view = MiniAppView::new(config, chain, host, wallet);
//!     view.mount()?;
//!     println!("{}", view.snapshot().progress_label);
//!     view.unmount();
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]

pub mod carousel;
pub mod chain;
pub mod claim;
pub mod config;
pub mod constants;
pub mod embed;
pub mod error;
pub mod host;
pub mod manifest;
pub mod progress;
pub mod view;
pub mod wallet;

pub use carousel::Carousel;
pub use error::{Result, ViewError};
pub use manifest::{ImageManifest, build_image_manifest};
pub use progress::{MintProgress, resolve_mint_progress};
pub use view::{MiniAppView, ViewSnapshot};
