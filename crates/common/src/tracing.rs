// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Shared tracing initialization for the bolt binaries.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Initialize tracing from `RUST_LOG`, falling back to `debug` or `info` when it is not set.
///
/// Output is compact and leaves out file and thread details; library crates only emit
/// events, binaries call this once at startup.
pub fn init_tracing(debug_fallback: bool) -> Result<(), eyre::Report> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter,
        Err(_) => {
            let level = if debug_fallback { "debug" } else { "info" };
            EnvFilter::new(level)
        }
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_ansi(true)
                .with_file(false)
                .with_target(false)
                .with_line_number(false)
                .with_thread_names(false)
                .with_writer(std::io::stderr)
                .with_span_events(fmt::format::FmtSpan::NONE),
        )
        .with(filter)
        .try_init()?;

    Ok(())
}
