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

mod args;

use crate::args::{Args, Config, OutputFormat};
use bolt_common::tracing::init_tracing;
use bolt_compiler::{Node, emit_syntax_error, format_syntax_error, parse_source};
use clap::Parser;
use std::path::Path;
use tracing::{debug, error, info};

fn print_tree(node: &Node, format: OutputFormat) -> Result<(), eyre::Report> {
    match format {
        OutputFormat::Debug => println!("{node:#?}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(node)?),
        OutputFormat::Quiet => {}
    }
    Ok(())
}

/// Parse one file, reporting a syntax error on stderr. Returns whether the file parsed.
fn compile_file(path: &Path, config: &Config) -> Result<bool, eyre::Report> {
    let source = std::fs::read_to_string(path)?;
    debug!(path = ?path, "parsing");

    match parse_source(&source, &config.parse) {
        Ok(node) => {
            print_tree(&node, config.format)?;
            Ok(true)
        }
        Err(e) => {
            let options = config.render_options();
            if options.use_graphics {
                emit_syntax_error(&e, &source, &path.display().to_string(), options.use_color);
            } else {
                for line in format_syntax_error(&e, Some(&source), options) {
                    eprintln!("{line}");
                }
            }
            Ok(false)
        }
    }
}

fn main() -> Result<(), eyre::Report> {
    color_eyre::install()?;
    let args: Args = Args::parse();
    init_tracing(args.debug)?;

    let config = args.load_config()?;
    info!("boltc {}", env!("CARGO_PKG_VERSION"));

    let mut failures = 0;
    for path in &args.sources {
        if !compile_file(path, &config)? {
            error!(path = ?path, "failed to parse");
            failures += 1;
        }
    }

    if failures > 0 {
        error!("{failures} of {} files failed to parse", args.sources.len());
        std::process::exit(1);
    }
    Ok(())
}
