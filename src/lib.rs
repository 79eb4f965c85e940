// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod cd;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod events;
pub mod kubernetes;
pub mod provisioners;
pub mod reconcilers;
pub mod store;
pub mod types;

#[cfg(test)]
pub mod test_utils;
