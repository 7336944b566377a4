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

//! A small line-oriented command language for the dialect to live in.

pub mod command;
pub mod literals;
pub mod root;
pub mod tree;

use crate::database::CompilationDatabase;
use crate::parsers::Parsers;
use command::CommandParser;
use root::{NestedRootParser, RootParser};
use std::rc::Rc;
use tree::COMMAND_TREE;

/// The parsers of the host grammar: `root`, `nested_root`, `command` and the primitive
/// argument parsers.
pub fn get_host_parsers(database: Rc<CompilationDatabase>, inline_blocks: bool) -> Parsers {
    let mut parsers = Parsers::default();
    parsers.insert("root", RootParser);
    parsers.insert("nested_root", NestedRootParser::new(inline_blocks));
    parsers.insert("command", CommandParser::new(&COMMAND_TREE));
    literals::register(&mut parsers, database);
    parsers
}
