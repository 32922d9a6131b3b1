//! Pretty JSON output in the classic ASCII-only layout
//!
//! Two-space indentation, every non-ASCII character escaped as `\uXXXX`
//! (surrogate pairs above U+FFFF) and floats written in shortest
//! round-trip form with a `.0` on integral values and a signed two-digit
//! exponent outside `1e-4 <= |x| < 1e16`.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};

/// Decimal exponents outside this window switch to scientific notation
const POSITIONAL_MIN_EXP: i32 = -4;
const POSITIONAL_MAX_EXP: i32 = 16;

/// [`PrettyFormatter`] with ASCII escaping and classic float spelling
pub struct AsciiPrettyFormatter<'a> {
    pretty: PrettyFormatter<'a>,
}

impl AsciiPrettyFormatter<'_> {
    pub fn new() -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Default for AsciiPrettyFormatter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn write_f64<W: ?Sized + Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(format_float(value).as_bytes())
    }

    fn write_f32<W: ?Sized + Write>(&mut self, writer: &mut W, value: f32) -> io::Result<()> {
        self.write_f64(writer, value as f64)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if (' '..='~').contains(&c) {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }

    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }
}

/// Serialize `value` with [`AsciiPrettyFormatter`]
pub fn to_string<T: ?Sized + Serialize>(value: &T) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, AsciiPrettyFormatter::new());
    value.serialize(&mut ser)?;
    // Every byte written is ASCII
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Shortest round-trip spelling of a finite float, `1.0`, `0.0001`,
/// `1e-05`, `1.5e+16` style
fn format_float(value: f64) -> String {
    let sign = if value.is_sign_negative() { "-" } else { "" };
    // `{:e}` gives the shortest digits that round-trip, as `d.ddde<exp>`
    let sci = format!("{:e}", value.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    // Position of the decimal point relative to the first digit
    let point = exp + 1;
    if point <= POSITIONAL_MIN_EXP || point > POSITIONAL_MAX_EXP {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}e{exp_sign}{:02}", exp.abs());
    }

    let body = if point <= 0 {
        format!("0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else {
        let point = point as usize;
        if point >= digits.len() {
            format!("{digits}{}.0", "0".repeat(point - digits.len()))
        } else {
            format!("{}.{}", &digits[..point], &digits[point..])
        }
    };
    format!("{sign}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_float_spelling() {
        let cases = [
            (0.0, "0.0"),
            (-0.0, "-0.0"),
            (1.0, "1.0"),
            (-2.5, "-2.5"),
            (0.1, "0.1"),
            (0.0001, "0.0001"),
            (0.00012, "0.00012"),
            (1e-5, "1e-05"),
            (1e-7, "1e-07"),
            (1.5e-7, "1.5e-07"),
            (123.456, "123.456"),
            (1e15, "1000000000000000.0"),
            (1e16, "1e+16"),
            (1.5e16, "1.5e+16"),
            (-1e100, "-1e+100"),
            (1.7976931348623157e308, "1.7976931348623157e+308"),
        ];
        for (value, expected) in cases {
            assert_eq!(format_float(value), expected, "{value:e}");
        }
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let text = to_string(&json!({ "name": "Gerüst 足場 🏗", "tab": "a\tb", "del": "\u{7f}" })).unwrap();
        assert_eq!(
            text,
            "{\n  \"name\": \"Ger\\u00fcst \\u8db3\\u5834 \\ud83c\\udfd7\",\n  \"tab\": \"a\\tb\",\n  \"del\": \"\\u007f\"\n}"
        );
    }

    #[test]
    fn test_layout_matches_two_space_indent() {
        let value = json!({ "parts": [], "meta": {}, "ids": [1, 2], "ok": true, "none": null });
        let text = to_string(&value).unwrap();
        assert_eq!(
            text,
            "{\n  \"parts\": [],\n  \"meta\": {},\n  \"ids\": [\n    1,\n    2\n  ],\n  \"ok\": true,\n  \"none\": null\n}"
        );
    }
}
