// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod plan_gating_test;
mod seo_report_test;
mod webhook_signature_test;
