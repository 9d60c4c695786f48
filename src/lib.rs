//! Player performance forecasting core for an NBA statistics app.
//!
//! Pipeline: roster records → fixed-order feature vectors → synthetic
//! next-season targets → a small feed-forward regressor fitted with Adam →
//! top-N and breakout rankings. Everything is synchronous and
//! batch-oriented; a training call blocks until done.

pub mod artifact;
pub mod error;
pub mod features;
pub mod gamelog;
pub mod model;
pub mod player;
pub mod rank;
pub mod report;
pub mod scaling;
pub mod service;
pub mod targets;
pub mod train;

pub use error::{ForecastError, Result};
pub use player::{PlayerId, PlayerRecord};
pub use rank::{BreakoutEntry, Stat, StatLeader};
pub use service::{ForecastService, PlayerForecast, ServiceConfig};
pub use targets::TargetConfig;
pub use train::TrainConfig;
