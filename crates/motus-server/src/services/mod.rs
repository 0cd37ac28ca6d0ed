// SPDX-License-Identifier: Apache-2.0

pub mod clearance;
pub mod summary;
pub mod wearable;
