//! Roster console library exports.

pub mod api_client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod events;
pub mod keys;
pub mod logging;
pub mod nav;
pub mod notifications;
pub mod persistence;
pub mod service;
pub mod state;
pub mod tasks;
pub mod theme;
pub mod views;
pub mod widgets;
