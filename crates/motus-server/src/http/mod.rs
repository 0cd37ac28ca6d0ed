// SPDX-License-Identifier: Apache-2.0

pub(crate) mod athletes;
pub(crate) mod ops;
pub(crate) mod rehab;
pub(crate) mod rewrites;
pub(crate) mod screening;
mod support;
pub(crate) mod users;
pub(crate) mod wearable;
