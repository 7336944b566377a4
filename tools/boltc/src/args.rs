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

use bolt_compiler::{DiagnosticRenderOptions, DiagnosticVerbosity, ParseOptions};
use clap::ValueHint;
use clap_derive::{Parser, ValueEnum};
use eyre::eyre;
use figment::Figment;
use figment::providers::{Format as ProviderFormat, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Pretty printed debug representation of the tree.
    Debug,
    /// The tree serialized as JSON.
    Json,
    /// Print nothing on success.
    Quiet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    Summary,
    Context,
    Detailed,
    Graphical,
}

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    #[arg(help = "Bolt source files to parse", value_hint = ValueHint::FilePath, required = true)]
    pub sources: Vec<PathBuf>,

    #[arg(
        long,
        value_name = "config",
        help = "Path to configuration (YAML) file to use, if any. Command line arguments override its values.",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[arg(
        long,
        help = "Resource location of the unit (e.g. `demo:utils/math`), used to resolve relative locations"
    )]
    pub resource_location: Option<String>,

    #[arg(
        short,
        long = "builtin",
        value_name = "NAME",
        help = "Name that is readable before the first statement; may be repeated"
    )]
    pub builtins: Vec<String>,

    #[arg(long, help = "Keep primitive command arguments literal instead of interpolating expressions")]
    pub no_interpolation: bool,

    #[arg(long, help = "Require blocks to start on the line after their `:`")]
    pub no_inline_blocks: bool,

    #[arg(long, value_enum, help = "How to print the parsed tree")]
    pub format: Option<OutputFormat>,

    #[arg(long, value_enum, help = "How much detail to include in syntax errors")]
    pub verbosity: Option<Verbosity>,

    #[arg(long, help = "Use ANSI colors in diagnostics")]
    pub color: bool,

    #[arg(long, help = "Enable debug logging")]
    pub debug: bool,
}

/// Everything `boltc` needs besides the file list, as read from the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parse: ParseOptions,
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            format: OutputFormat::Debug,
            verbosity: Verbosity::Detailed,
            color: false,
        }
    }
}

impl Config {
    pub fn render_options(&self) -> DiagnosticRenderOptions {
        let (verbosity, use_graphics) = match self.verbosity {
            Verbosity::Summary => (DiagnosticVerbosity::Summary, false),
            Verbosity::Context => (DiagnosticVerbosity::SourceContext, false),
            Verbosity::Detailed => (DiagnosticVerbosity::Detailed, false),
            Verbosity::Graphical => (DiagnosticVerbosity::Detailed, true),
        };
        DiagnosticRenderOptions {
            verbosity,
            use_graphics,
            use_color: self.color,
        }
    }
}

impl Args {
    fn merge_config(&self, mut config: Config) -> Config {
        if let Some(location) = &self.resource_location {
            config.parse.resource_location = Some(location.clone());
        }
        config.parse.builtins.extend(self.builtins.iter().cloned());
        if self.no_interpolation {
            config.parse.interpolation = false;
        }
        if self.no_inline_blocks {
            config.parse.inline_blocks = false;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(verbosity) = self.verbosity {
            config.verbosity = verbosity;
        }
        config.color |= self.color;
        config
    }

    /// Load the configuration file if there is one, then apply the command line on top of it.
    pub fn load_config(&self) -> Result<Config, eyre::Report> {
        let config = match &self.config_file {
            Some(config_path) => Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Yaml::file(config_path))
                .extract::<Config>()
                .map_err(|e| {
                    eyre!(
                        "Failed to parse configuration from {:?}: {}",
                        config_path,
                        e
                    )
                })?,
            None => Config::default(),
        };
        Ok(self.merge_config(config))
    }
}
