// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// Stripe 计费集成
pub mod signature;
pub mod stripe_client;

pub use signature::StripeWebhookVerifier;
pub use stripe_client::StripeClient;
