//! Client SDK for the Cove overlay shell.
//!
//! Applications embed this crate to present live activities, lock screen
//! widgets, and notch experiences through the privileged Cove shell
//! process. The [`Client`] facade validates descriptors from
//! [`cove_model`] locally, then forwards them over a framed msgpack
//! channel on a unix socket managed by [`Session`].
//!
//! ```no_run
//! use cove_model::{IconDescriptor, LiveActivityDescriptor};
//! use cove_sdk::{Client, HostConfig};
//!
//! # async fn demo() -> Result<(), cove_sdk::CoveError> {
//! let client = Client::connect(HostConfig::new("com.example.player"));
//! client.check_compatibility("2.1").await?;
//!
//! let activity = LiveActivityDescriptor::new(
//!     "track-1",
//!     "com.example.player",
//!     "Now Playing",
//!     IconDescriptor::symbol("music.note"),
//! );
//! client.present_live_activity(&activity).await?;
//! client.on_activity_dismiss("track-1", || println!("user dismissed it"));
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod presence;
pub mod protocol;
mod session;
mod version;

pub use client::Client;
pub use config::{HostConfig, DEFAULT_INSTALL_PATH, SERVICE_NAME};
pub use error::CoveError;
pub use presence::{FixedPresence, HostPresence, InstallProbe};
pub use session::{
    AuthorizationCallback, DismissCallback, EntityKind, HostSession, LinkState, Session,
};
pub use version::is_version_compatible;
