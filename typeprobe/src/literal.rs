//! Parsing of C integer, floating and character constants.
//!
//! The base an integer constant is written in only matters here: once
//! parsed, `85`, `0125` and `0x55` are the same `int`.

use std::os::raw::{
    c_char, c_double, c_float, c_int, c_long, c_longlong, c_uint, c_ulong, c_ulonglong,
};

use anyhow::{anyhow, bail, ensure, Result};
use funty::Integral;
use serde::Serialize;

use crate::{format::FloatStyle, CharValue, FloatingValue, IntegralValue, Layout, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Radix {
    Decimal,
    Octal,
    Hexadecimal,
}

impl Radix {
    pub fn base(self) -> u32 {
        match self {
            Self::Decimal => 10,
            Self::Octal => 8,
            Self::Hexadecimal => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Decimal => "decimal",
            Self::Octal => "octal",
            Self::Hexadecimal => "hexadecimal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegerType {
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
}

impl IntegerType {
    pub fn c_name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::UnsignedInt => "unsigned int",
            Self::Long => "long",
            Self::UnsignedLong => "unsigned long",
            Self::LongLong => "long long",
            Self::UnsignedLongLong => "unsigned long long",
        }
    }

    pub fn layout(self) -> Layout {
        match self {
            Self::Int => Layout::of::<c_int>(),
            Self::UnsignedInt => Layout::of::<c_uint>(),
            Self::Long => Layout::of::<c_long>(),
            Self::UnsignedLong => Layout::of::<c_ulong>(),
            Self::LongLong => Layout::of::<c_longlong>(),
            Self::UnsignedLongLong => Layout::of::<c_ulonglong>(),
        }
    }

    fn max(self) -> u128 {
        match self {
            Self::Int => max_of::<c_int>(),
            Self::UnsignedInt => max_of::<c_uint>(),
            Self::Long => max_of::<c_long>(),
            Self::UnsignedLong => max_of::<c_ulong>(),
            Self::LongLong => max_of::<c_longlong>(),
            Self::UnsignedLongLong => max_of::<c_ulonglong>(),
        }
    }

    // callers guarantee `v <= self.max()`
    fn narrow(self, v: u128) -> IntegralValue {
        match self {
            Self::Int => IntegralValue::from(v as c_int),
            Self::UnsignedInt => IntegralValue::from(v as c_uint),
            Self::Long => IntegralValue::from(v as c_long),
            Self::UnsignedLong => IntegralValue::from(v as c_ulong),
            Self::LongLong => IntegralValue::from(v as c_longlong),
            Self::UnsignedLongLong => IntegralValue::from(v as c_ulonglong),
        }
    }

    /// Types an unsuffixed-or-suffixed constant may take, in order of preference (C11 6.4.4.1).
    fn candidates(radix: Radix, suffix: Suffix) -> &'static [IntegerType] {
        use IntegerType::*;
        let decimal = radix == Radix::Decimal;
        match (suffix.unsigned, suffix.long, decimal) {
            (false, LongSuffix::None, true) => &[Int, Long, LongLong],
            (false, LongSuffix::None, false) => {
                &[Int, UnsignedInt, Long, UnsignedLong, LongLong, UnsignedLongLong]
            }
            (true, LongSuffix::None, _) => &[UnsignedInt, UnsignedLong, UnsignedLongLong],
            (false, LongSuffix::Long, true) => &[Long, LongLong],
            (false, LongSuffix::Long, false) => &[Long, UnsignedLong, LongLong, UnsignedLongLong],
            (true, LongSuffix::Long, _) => &[UnsignedLong, UnsignedLongLong],
            (false, LongSuffix::LongLong, true) => &[LongLong],
            (false, LongSuffix::LongLong, false) => &[LongLong, UnsignedLongLong],
            (true, LongSuffix::LongLong, _) => &[UnsignedLongLong],
        }
    }
}

fn max_of<T: Integral>() -> u128 {
    let signed = T::MIN != T::ZERO;
    if signed {
        (1u128 << (T::BITS - 1)) - 1
    } else {
        u128::MAX >> (128 - T::BITS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LongSuffix {
    None,
    Long,
    LongLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Suffix {
    unsigned: bool,
    long: LongSuffix,
}

impl Suffix {
    fn parse(text: &str) -> Result<Self> {
        let (unsigned, rest) = if let Some(rest) = text.strip_prefix(['u', 'U']) {
            (true, rest)
        } else if let Some(rest) = text.strip_suffix(['u', 'U']) {
            (true, rest)
        } else {
            (false, text)
        };
        let long = match rest {
            "" => LongSuffix::None,
            "l" | "L" => LongSuffix::Long,
            "ll" | "LL" => LongSuffix::LongLong,
            _ => bail!("invalid integer suffix: {:?}", text),
        };
        Ok(Self { unsigned, long })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegerLiteral {
    pub radix: Radix,
    pub ty: IntegerType,
    pub value: IntegralValue,
}

impl IntegerLiteral {
    pub fn parse(text: &str) -> Result<Self> {
        ensure!(!text.is_empty(), "empty integer literal");
        let body = text.trim_end_matches(['u', 'U', 'l', 'L']);
        let suffix = Suffix::parse(&text[body.len()..])?;

        let (radix, digits) = if let Some(hex) =
            body.strip_prefix("0x").or_else(|| body.strip_prefix("0X"))
        {
            (Radix::Hexadecimal, hex)
        } else if body.starts_with('0') {
            // a lone `0` is an octal constant in C, too
            (Radix::Octal, body)
        } else {
            (Radix::Decimal, body)
        };
        ensure!(
            !digits.is_empty(),
            "{} literal {:?} has no digits",
            radix.name(),
            text
        );
        if let Some(bad) = digits.chars().find(|c| !c.is_digit(radix.base())) {
            bail!("invalid digit {:?} in {} literal {:?}", bad, radix.name(), text);
        }
        let value = u128::from_str_radix(digits, radix.base())
            .map_err(|e| anyhow!("integer literal {:?} is too large: {}", text, e))?;

        let ty = IntegerType::candidates(radix, suffix)
            .iter()
            .copied()
            .find(|ty| value <= ty.max())
            .ok_or_else(|| anyhow!("integer literal {:?} is too large for its type", text))?;
        Ok(Self {
            radix,
            ty,
            value: ty.narrow(value),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatType {
    Float,
    Double,
    /// Evaluated at double precision; Rust has no wider float.
    LongDouble,
}

impl FloatType {
    pub fn c_name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Double => "double",
            Self::LongDouble => "long double",
        }
    }

    pub fn layout(self) -> Layout {
        match self {
            Self::Float => Layout::of::<c_float>(),
            Self::Double | Self::LongDouble => Layout::of::<c_double>(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatingLiteral {
    pub ty: FloatType,
    pub value: FloatingValue,
}

impl FloatingLiteral {
    pub fn parse(text: &str) -> Result<Self> {
        ensure!(
            !text.starts_with("0x") && !text.starts_with("0X"),
            "hexadecimal floating literals are not supported: {:?}",
            text
        );
        let (body, ty) = match text.char_indices().last() {
            Some((i, 'f' | 'F')) => (&text[..i], FloatType::Float),
            Some((i, 'l' | 'L')) => (&text[..i], FloatType::LongDouble),
            Some(_) => (text, FloatType::Double),
            None => bail!("empty floating literal"),
        };
        validate_decimal_float(body).map_err(|e| anyhow!("{:?}: {}", text, e))?;

        let value = match ty {
            FloatType::Float => FloatingValue::F32(body.parse()?),
            FloatType::Double | FloatType::LongDouble => FloatingValue::F64(body.parse()?),
        };
        Ok(Self { ty, value })
    }
}

// digits [. digits] [(e|E) [+|-] digits], with at least one of `.` or an exponent
fn validate_decimal_float(body: &str) -> Result<()> {
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (mantissa, None),
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    ensure!(
        all_digits(int_part) && frac_part.map_or(true, all_digits),
        "malformed mantissa"
    );
    ensure!(
        !int_part.is_empty() || frac_part.map_or(false, |f| !f.is_empty()),
        "mantissa has no digits"
    );
    ensure!(
        frac_part.is_some() || exponent.is_some(),
        "neither a fraction nor an exponent"
    );
    if let Some(exponent) = exponent {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        ensure!(!digits.is_empty() && all_digits(digits), "malformed exponent");
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharLiteral {
    pub value: CharValue,
}

impl CharLiteral {
    pub fn parse(text: &str) -> Result<Self> {
        let inner = text
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .filter(|inner| !inner.is_empty())
            .ok_or_else(|| anyhow!("not a character literal: {:?}", text))?;
        let byte = match inner.strip_prefix('\\') {
            Some(escape) => parse_escape(escape),
            None => {
                let mut chars = inner.chars();
                match (chars.next(), chars.next()) {
                    (Some('\''), None) => Err(anyhow!("unescaped quote")),
                    (Some(c), None) => u8::try_from(c)
                        .ok()
                        .filter(u8::is_ascii)
                        .ok_or_else(|| anyhow!("{:?} does not fit in a single byte", c)),
                    _ => Err(anyhow!("multi-character constant")),
                }
            }
        }
        .map_err(|e| anyhow!("{:?}: {}", text, e))?;
        Ok(Self {
            value: CharValue(byte),
        })
    }
}

fn parse_escape(escape: &str) -> Result<u8> {
    let simple = match escape {
        "n" => Some(b'\n'),
        "t" => Some(b'\t'),
        "r" => Some(b'\r'),
        "a" => Some(0x07),
        "b" => Some(0x08),
        "f" => Some(0x0C),
        "v" => Some(0x0B),
        "\\" => Some(b'\\'),
        "'" => Some(b'\''),
        "\"" => Some(b'"'),
        "?" => Some(b'?'),
        _ => None,
    };
    if let Some(byte) = simple {
        return Ok(byte);
    }
    let (digits, base) = match escape.strip_prefix('x') {
        Some(hex) => (hex, 16),
        None => {
            ensure!(escape.len() <= 3, "octal escape is longer than 3 digits");
            (escape, 8)
        }
    };
    ensure!(
        !digits.is_empty() && digits.chars().all(|c| c.is_digit(base)),
        "unknown escape sequence \\{}",
        escape
    );
    let value = u32::from_str_radix(digits, base)?;
    u8::try_from(value).map_err(|_| anyhow!("escape \\{} is out of range for char", escape))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Literal {
    Integer(IntegerLiteral),
    Floating(FloatingLiteral),
    Char(CharLiteral),
}

impl Literal {
    pub fn parse(text: &str) -> Result<Self> {
        let is_hex = text.starts_with("0x") || text.starts_with("0X");
        let is_floating = if is_hex {
            text.contains(['p', 'P'])
        } else {
            text.contains(['.', 'e', 'E'])
        };
        if text.starts_with('\'') {
            Ok(Self::Char(CharLiteral::parse(text)?))
        } else if is_floating {
            Ok(Self::Floating(FloatingLiteral::parse(text)?))
        } else {
            Ok(Self::Integer(IntegerLiteral::parse(text)?))
        }
    }

    pub fn value(&self) -> Value {
        match self {
            Self::Integer(i) => i.value.into(),
            Self::Floating(f) => f.value.into(),
            Self::Char(c) => c.value.into(),
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            Self::Integer(i) => i.ty.layout(),
            Self::Floating(f) => f.ty.layout(),
            Self::Char(_) => Layout::of::<c_char>(),
        }
    }

    /// e.g. `0213: 139 (octal int), size: 4 bytes`
    pub fn describe(&self, text: &str, style: FloatStyle) -> String {
        let size = self.layout().size;
        match self {
            Self::Integer(i) => format!(
                "{}: {} ({} {}), size: {} bytes",
                text,
                i.value,
                i.radix.name(),
                i.ty.c_name(),
                size
            ),
            Self::Floating(f) => format!(
                "{}: {} ({}), size: {} bytes",
                text,
                style.render(f.value),
                f.ty.c_name(),
                size
            ),
            Self::Char(c) => format!(
                "{}: {}, ASCII: {} (char), size: {} bytes",
                text,
                c.value.escaped(),
                c.value.code_point(),
                size
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::mem;

    use super::*;

    #[test]
    fn test_integer_bases() {
        let dec = IntegerLiteral::parse("85").unwrap();
        let oct = IntegerLiteral::parse("0213").unwrap();
        let hex = IntegerLiteral::parse("0x4b").unwrap();
        assert_eq!(dec.radix, Radix::Decimal);
        assert_eq!(oct.radix, Radix::Octal);
        assert_eq!(hex.radix, Radix::Hexadecimal);
        assert_eq!(dec.value.widen(), 85);
        assert_eq!(oct.value.widen(), 139);
        assert_eq!(hex.value.widen(), 75);
        for lit in [&dec, &oct, &hex] {
            assert_eq!(lit.ty, IntegerType::Int);
            assert_eq!(lit.ty.layout().size, mem::size_of::<c_int>());
        }
        assert_eq!(IntegerLiteral::parse("0X4B").unwrap().value.widen(), 75);
        assert_eq!(IntegerLiteral::parse("0").unwrap().radix, Radix::Octal);
    }

    #[test]
    fn test_integer_type_selection() {
        let dec = IntegerLiteral::parse("4294967295").unwrap();
        assert!(matches!(dec.ty, IntegerType::Long | IntegerType::LongLong));
        let hex = IntegerLiteral::parse("0xFFFFFFFF").unwrap();
        assert_eq!(hex.ty, IntegerType::UnsignedInt);
        assert_eq!(hex.value, IntegralValue::U32(u32::MAX));
        assert_eq!(IntegerLiteral::parse("1u").unwrap().ty, IntegerType::UnsignedInt);
        assert_eq!(IntegerLiteral::parse("1UL").unwrap().ty, IntegerType::UnsignedLong);
        assert_eq!(IntegerLiteral::parse("1lu").unwrap().ty, IntegerType::UnsignedLong);
        assert_eq!(IntegerLiteral::parse("1LL").unwrap().ty, IntegerType::LongLong);
        let widest = IntegerLiteral::parse("0xFFFFFFFFFFFFFFFF").unwrap();
        let expected = if mem::size_of::<c_ulong>() == 8 {
            IntegerType::UnsignedLong
        } else {
            IntegerType::UnsignedLongLong
        };
        assert_eq!(widest.ty, expected);
        assert_eq!(widest.value, IntegralValue::U64(u64::MAX));
    }

    #[test]
    fn test_integer_errors() {
        assert!(IntegerLiteral::parse("").is_err());
        assert!(IntegerLiteral::parse("08").is_err());
        assert!(IntegerLiteral::parse("0x").is_err());
        assert!(IntegerLiteral::parse("0xG1").is_err());
        assert!(IntegerLiteral::parse("1lL").is_err());
        assert!(IntegerLiteral::parse("1uu").is_err());
        assert!(IntegerLiteral::parse("+1").is_err());
        assert!(IntegerLiteral::parse("18446744073709551616").is_err());
        // fits only unsigned long long, which decimal constants never pick
        assert!(IntegerLiteral::parse("18446744073709551615").is_err());
    }

    #[test]
    fn test_floating() {
        let a = FloatingLiteral::parse("3.14159").unwrap();
        assert_eq!(a.ty, FloatType::Double);
        assert_eq!(f32::try_from(a.value).unwrap(), 3.14159f32);

        let b = FloatingLiteral::parse("314159E-5L").unwrap();
        assert_eq!(b.ty, FloatType::LongDouble);
        assert_eq!(b.value, FloatingValue::F64(3.14159));

        let f = FloatingLiteral::parse("2.5f").unwrap();
        assert_eq!(f.value, FloatingValue::F32(2.5));
        assert_eq!(f.ty.layout().size, 4);

        assert_eq!(FloatingLiteral::parse(".5e+2").unwrap().value.widen(), 50.0);
        assert_eq!(FloatingLiteral::parse("1.").unwrap().value.widen(), 1.0);
    }

    #[test]
    fn test_floating_errors() {
        assert!(FloatingLiteral::parse("").is_err());
        assert!(FloatingLiteral::parse("12").is_err());
        assert!(FloatingLiteral::parse(".").is_err());
        assert!(FloatingLiteral::parse("1e").is_err());
        assert!(FloatingLiteral::parse("1e+").is_err());
        assert!(FloatingLiteral::parse("1.2.3").is_err());
        assert!(FloatingLiteral::parse("0x1p3").is_err());
        assert!(FloatingLiteral::parse("inf").is_err());
    }

    #[test]
    fn test_char() {
        assert_eq!(CharLiteral::parse("'a'").unwrap().value.code_point(), 97);
        assert_eq!(CharLiteral::parse("'\\n'").unwrap().value.0, b'\n');
        assert_eq!(CharLiteral::parse("'\\101'").unwrap().value.0, b'A');
        assert_eq!(CharLiteral::parse("'\\x41'").unwrap().value.0, b'A');
        assert_eq!(CharLiteral::parse("'\\0'").unwrap().value.0, 0);
        assert_eq!(CharLiteral::parse("'\\''").unwrap().value.0, b'\'');
        assert!(CharLiteral::parse("''").is_err());
        assert!(CharLiteral::parse("'ab'").is_err());
        assert!(CharLiteral::parse("'\\q'").is_err());
        assert!(CharLiteral::parse("'\\x100'").is_err());
        assert!(CharLiteral::parse("'é'").is_err());
        assert!(CharLiteral::parse("a").is_err());
        assert!(CharLiteral::parse("'''").is_err());
    }

    #[test]
    fn test_high_bit_char() {
        let literal = Literal::parse("'\\377'").unwrap();
        let expected = if c_char::MIN == 0 { 255 } else { -1 };
        assert_eq!(
            literal.describe("'\\377'", FloatStyle::Fixed),
            format!("'\\377': \\377, ASCII: {} (char), size: 1 bytes", expected)
        );
    }

    #[test]
    fn test_dispatch_and_describe() {
        let style = FloatStyle::Fixed;
        let int_size = mem::size_of::<c_int>();
        assert_eq!(
            Literal::parse("0213").unwrap().describe("0213", style),
            format!("0213: 139 (octal int), size: {} bytes", int_size)
        );
        let b = Literal::parse("314159E-5L").unwrap();
        assert_eq!(
            b.describe("314159E-5L", FloatStyle::Scientific),
            format!(
                "314159E-5L: 3.141590e+00 (long double), size: {} bytes",
                mem::size_of::<c_double>()
            )
        );
        assert_eq!(
            Literal::parse("'a'").unwrap().describe("'a'", style),
            "'a': a, ASCII: 97 (char), size: 1 bytes"
        );
        assert!(matches!(Literal::parse("0x1e").unwrap(), Literal::Integer(_)));
        assert!(Literal::parse("0x1p3").is_err());
    }
}
