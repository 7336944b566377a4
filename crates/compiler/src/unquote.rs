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

//! String literal unquoting with JSON escape rules, for both quote styles.

use bolt_common::{ParseResult, SyntaxError, Token};

/// Unquote the text of a string token.
pub fn unquote_string(token: &Token) -> ParseResult<String> {
    unquote_str(&token.value).map_err(|message| SyntaxError::invalid(message).at(token.span()))
}

pub fn unquote_str(s: &str) -> Result<String, String> {
    let mut chars = s.chars();
    let quote = match chars.next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err("Expected quote at beginning of string.".to_string()),
    };
    if s.len() < 2 || !s.ends_with(quote) {
        return Err("Unterminated string.".to_string());
    }
    let body = &s[1..s.len() - 1];

    let mut output = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => output.push('"'),
            Some('\'') if quote == '\'' => output.push('\''),
            Some('\\') => output.push('\\'),
            Some('/') => output.push('/'),
            Some('b') => output.push('\u{8}'),
            Some('f') => output.push('\u{c}'),
            Some('n') => output.push('\n'),
            Some('r') => output.push('\r'),
            Some('t') => output.push('\t'),
            Some('u') => output.push(unicode_escape(&mut chars)?),
            Some(other) => return Err(format!("Invalid escape sequence '\\{other}'.")),
            None => return Err("Unterminated escape sequence.".to_string()),
        }
    }
    Ok(output)
}

fn hex4(chars: &mut std::str::Chars) -> Result<u32, String> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 {
        return Err("Truncated unicode escape.".to_string());
    }
    u32::from_str_radix(&digits, 16).map_err(|_| format!("Invalid escape sequence '\\u{digits}'."))
}

fn unpaired(code: u32) -> String {
    format!("Invalid escape sequence '\\u{code:04x}': unpaired surrogate.")
}

fn unicode_escape(chars: &mut std::str::Chars) -> Result<char, String> {
    let high = hex4(chars)?;
    let code = if (0xD800..0xDC00).contains(&high) {
        if !chars.as_str().starts_with("\\u") {
            return Err(unpaired(high));
        }
        chars.nth(1);
        let low = hex4(chars)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(unpaired(high));
        }
        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
    } else {
        high
    };
    char::from_u32(code).ok_or_else(|| unpaired(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(r#""hello""#, "hello"; "double quoted")]
    #[test_case(r#"'it\'s'"#, "it's"; "escaped single quote")]
    #[test_case(r#"'say "hi"'"#, "say \"hi\""; "double quotes inside single")]
    #[test_case(r#""a\nb\t\\""#, "a\nb\t\\"; "control escapes")]
    #[test_case(r#""\u00e9\ud83d\ude00""#, "é😀"; "unicode escapes")]
    #[test_case(r#""{{x}}""#, "{{x}}"; "braces untouched")]
    fn test_unquote(input: &str, expected: &str) {
        assert_eq!(unquote_str(input).unwrap(), expected);
    }

    #[test]
    fn test_invalid_escapes() {
        assert_eq!(
            unquote_str(r#""\q""#).unwrap_err(),
            "Invalid escape sequence '\\q'."
        );
        assert!(unquote_str(r#""\'""#).is_err());
        assert_eq!(
            unquote_str(r#""\ud83d""#).unwrap_err(),
            "Invalid escape sequence '\\ud83d': unpaired surrogate."
        );
        assert_eq!(
            unquote_str(r#""\ude00x""#).unwrap_err(),
            "Invalid escape sequence '\\ude00': unpaired surrogate."
        );
        assert_eq!(
            unquote_str(r#""\uzzzz""#).unwrap_err(),
            "Invalid escape sequence '\\uzzzz'."
        );
        assert!(unquote_str("\"open").is_err());
    }
}
