// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod event_publisher;
pub mod metrics_sink;
pub mod service_registry;
pub mod user_service;

#[cfg(test)]
mod user_service_test;
