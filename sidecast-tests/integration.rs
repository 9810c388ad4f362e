//! Integration tests for Sidecast
//!
//! These tests drive the stream, episode and handover components together
//! the way a presentation layer would.

#[path = "integration/common.rs"]
mod common;
#[path = "integration/episode_flow.rs"]
mod episode_flow;
#[path = "integration/handover_flow.rs"]
mod handover_flow;
