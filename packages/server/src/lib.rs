//! Presence and real-time signaling server for LinkClub.
//!
//! Tracks which users are online, relays WebRTC call signaling between them,
//! and drives the `sent → delivered → seen` status of direct messages.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
