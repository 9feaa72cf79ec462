//! Client-side synchronization for the ridelink app: conversation and feed
//! stores kept consistent with the REST API and the realtime message channel.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod realtime;
pub mod store;
pub mod telemetry;
pub mod utils;

pub use app::{AppMessage, MessageSender, SyncSession, SyncStatus};
pub use error::{ParticipantNotFoundError, RealtimeError};
pub use utils::format_relative;
