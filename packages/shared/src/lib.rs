//! Utilities shared by the LinkClub server binary and its tests.

pub mod logger;
pub mod time;
