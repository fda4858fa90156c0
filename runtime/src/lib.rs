// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Slice Scanner runtime: drives vendor ordering sites through a browser
//! surface and streams canonical catalog entities to a sink.
//!
//! This library crate exposes the runtime modules for integration testing.

pub mod cli;
pub mod config;
pub mod orchestrator;
pub mod output;
pub mod scheduler;
pub mod sink;
pub mod surface;
pub mod vendors;
