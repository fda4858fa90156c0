// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI subcommand implementations for the `slicescan` binary.

pub mod collect;
pub mod next_cmd;
pub mod vendors_cmd;
