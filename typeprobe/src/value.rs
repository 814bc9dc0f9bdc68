use std::fmt;
use std::os::raw::c_char;

use serde::{ser::SerializeStruct, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegralValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl IntegralValue {
    /// Widens to `i128`, which holds every variant without loss.
    pub fn widen(self) -> i128 {
        match self {
            Self::I8(v) => v.into(),
            Self::I16(v) => v.into(),
            Self::I32(v) => v.into(),
            Self::I64(v) => v.into(),
            Self::U8(v) => v.into(),
            Self::U16(v) => v.into(),
            Self::U32(v) => v.into(),
            Self::U64(v) => v.into(),
        }
    }

    pub fn byte_len(self) -> usize {
        match self {
            Self::I8(_) | Self::U8(_) => 1,
            Self::I16(_) | Self::U16(_) => 2,
            Self::I32(_) | Self::U32(_) => 4,
            Self::I64(_) | Self::U64(_) => 8,
        }
    }
}

impl fmt::Display for IntegralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.widen())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FloatingValue {
    F32(f32),
    F64(f64),
}

impl FloatingValue {
    pub fn widen(self) -> f64 {
        match self {
            Self::F32(f) => f.into(),
            Self::F64(d) => d,
        }
    }
}

/// A C `char`, kept as its byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharValue(pub u8);

impl Serialize for CharValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("CharValue", 2)?;
        s.serialize_field("glyph", &self.glyph())?;
        s.serialize_field("code_point", &self.code_point())?;
        s.end()
    }
}

impl CharValue {
    pub fn glyph(self) -> char {
        char::from(self.0)
    }

    /// The value C sees, so high bytes are negative where `char` is signed.
    pub fn code_point(self) -> i32 {
        (self.0 as c_char).into()
    }

    /// The glyph for printable ASCII, a C octal escape otherwise.
    pub fn escaped(self) -> String {
        match self.0 {
            b'\'' | b'\\' => format!("\\{}", self.glyph()),
            b if b.is_ascii_graphic() || b == b' ' => self.glyph().to_string(),
            b => format!("\\{:03o}", b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumVariant {
    pub name: String,
    pub discriminant: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub type_name: String,
    pub variant: EnumVariant,
    pub variants: Vec<EnumVariant>,
}

impl EnumValue {
    /// `0=RED, 1=GREEN, 2=BLUE`
    pub fn legend(&self) -> String {
        self.variants
            .iter()
            .map(|v| format!("{}={}", v.discriminant, v.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordField {
    pub name: String,
    pub value: IntegralValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordValue {
    pub type_name: String,
    pub fields: Vec<RecordField>,
}

impl RecordValue {
    pub fn field(&self, name: &str) -> Option<IntegralValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Value {
    Integral(IntegralValue),
    Floating(FloatingValue),
    Char(CharValue),
    Enum(EnumValue),
    Record(RecordValue),
}
