// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod admin_test;
mod auth_test;
mod content_test;
mod playlist_test;
mod rate_limit_test;
mod view_progress_test;
