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

//! Building blocks shared by the bolt parser front end: source locations, the token stream,
//! the syntax error model and identifier suggestions.

pub mod errors;
pub mod location;
pub mod suggest;
pub mod tokenstream;
pub mod tracing;

pub use errors::{ParseResult, SyntaxError, SyntaxErrorKind};
pub use location::{SourceLocation, SourceText, Span};
pub use tokenstream::{Token, TokenPattern, TokenStream};
