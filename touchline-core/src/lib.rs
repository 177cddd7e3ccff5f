//! Touchline Core Library
//!
//! This crate provides the data model, typed match metadata and replay
//! source trait shared by the trajectory analysis and reporting crates.

pub mod error;
pub mod metadata;
pub mod model;
pub mod source;
pub mod units;

pub use error::AnalysisError;
pub use metadata::{MatchMetadata, MetadataKey, MetadataValue};
pub use model::{ActorId, ActorKind, BallTouch, GameObjectState, PlayerInfo, RigidBodyState, Team};
pub use source::{ActorProperty, ActorUpdate, ReplayFrame, ReplaySource};
