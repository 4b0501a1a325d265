//! EduConnect Chat - Realtime chat and admin messaging for the EduConnect
//! tuition marketplace.
//!
//! Authenticated WebSocket connections join chat rooms and per-user admin
//! channels. Room messages are moderated, persisted and fanned out to the
//! room; admins send direct notifications that reach the recipient live.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
