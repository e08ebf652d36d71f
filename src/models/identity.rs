// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Identity record owned by the authentication provider.

use serde::{Deserialize, Serialize};

/// The provider's view of a user.
///
/// Only `email_verified` ever changes, and only a fresh reload from the
/// provider makes that flag trustworthy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque, provider-assigned ID (also the profile document ID)
    pub id: String,
    pub email: String,
    pub email_verified: bool,
}
