//! # gamo
//!
//! Client for a narrative choice game whose story, characters and endings are
//! generated by a remote backend. The crate collects player input, sends it to
//! the backend over HTTP, and keeps a typed [`Page`] describing what to show.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gamo::api::{ApiClient, HttpTransport, LoadingFlag};
//! use gamo::flow::{GameFlow, GameOptions, Notifier};
//! use gamo::preferences::PreferenceStore;
//! use gamo::session::ClientContext;
//! use gamo::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! struct Stderr;
//! impl Notifier for Stderr {
//!     fn alert(&self, message: &str) {
//!         eprintln!("{message}");
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new("https://gamo.onrender.com", None)?;
//! let api = ApiClient::new(Arc::new(transport), Arc::new(LoadingFlag::new()));
//! let ctx = ClientContext::init(PreferenceStore::new(Arc::new(MemoryStore::new())));
//! let mut flow = GameFlow::new(ctx, api, Arc::new(Stderr), GameOptions::default());
//!
//! flow.set_tag_input("isekai, comedy");
//! flow.start().await?;
//! for block in &flow.page().history {
//!     println!("{}", block.text());
//! }
//! if let Some(event) = flow.current_event() {
//!     if let Some(first) = event.options.first() {
//!         flow.choose(first.id).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod flow;
pub mod i18n;
pub mod preferences;
pub mod presets;
pub mod render;
pub mod session;
pub mod storage;
pub mod tags;
pub mod testing;
pub mod types;

pub use api::{ApiClient, ApiError};
pub use config::ClientConfig;
pub use flow::{FlowError, GameFlow, GameState};
pub use types::{Language, Page};
