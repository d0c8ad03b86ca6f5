// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod cache;
pub mod database;
pub mod messaging;
pub mod observability;
pub mod registry;
pub mod repositories;
