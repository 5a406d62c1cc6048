// Copyright (c) 2025-2026 the sentinel-packs contributors
// SPDX-License-Identifier: Apache-2.0

pub mod dry_run;
pub mod error;
pub mod formatting;
pub mod progress;
pub mod summary;
