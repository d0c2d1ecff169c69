// ABOUTME: Main library entry point for the vidstream backend client.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, Options, ApiError, ErrorCode, token providers, OwnerProfile.

//! HTTP access to the video-listing backend.
//!
//! [`Client`] implements [`vidstream_feed::PageFetcher`], so it can be handed
//! straight to a [`vidstream_feed::FeedSession`].
//!
//! # Example
//!
//! ```no_run
//! use vidstream_api::{ApiError, Client};
//! use vidstream_feed::{FeedConfig, FeedSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ApiError> {
//!     let client = Client::builder()
//!         .base_url("http://localhost:8000")
//!         .bearer_token("token")
//!         .build()?;
//!     let mut session = FeedSession::new(client, FeedConfig::default());
//!     session.start("cats");
//!     session.settle_all().await;
//!     println!("{} videos", session.state().items().len());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod options;
pub mod profile;
pub mod resource;
pub mod wire;

pub use crate::auth::{EnvToken, NoToken, StaticToken, TokenProvider};
pub use crate::client::Client;
pub use crate::error::{ApiError, ErrorCode};
pub use crate::options::{ClientBuilder, Options, DEFAULT_BASE_URL};
pub use crate::profile::OwnerProfile;
