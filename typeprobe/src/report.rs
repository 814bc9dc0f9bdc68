use std::io::{self, Write};
use std::os::raw::{c_char, c_double, c_float, c_int};

use anyhow::{bail, ensure, Result};
use funty::{Floating, Integral};
use serde::{Serialize, Serializer};
use zerocopy::AsBytes;

use crate::{
    ctypes::{Color, Point, PointAlias, N},
    format::FloatStyle,
    layout::RecordLayout,
    literal::Literal,
    CharValue, FloatingValue, IntegralValue, Layout, Value,
};

/// One reported value: what it is, how it was written and how much room it takes.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    pub value: Value,
    pub layout: Layout,
    #[serde(serialize_with = "serialize_hex")]
    pub raw: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordLayout>,
}

impl Entry {
    pub fn integral<T>(label: &str, literal: &str, value: T) -> Self
    where
        T: Integral + AsBytes,
        IntegralValue: From<T>,
    {
        Self {
            label: label.to_string(),
            literal: Some(literal.to_string()),
            value: IntegralValue::from(value).into(),
            layout: Layout::of_val(&value),
            raw: value.as_bytes().to_vec(),
            record: None,
        }
    }

    pub fn floating<T>(label: &str, literal: &str, value: T) -> Self
    where
        T: Floating + AsBytes,
        FloatingValue: From<T>,
    {
        Self {
            label: label.to_string(),
            literal: Some(literal.to_string()),
            value: FloatingValue::from(value).into(),
            layout: Layout::of_val(&value),
            raw: value.as_bytes().to_vec(),
            record: None,
        }
    }

    pub fn char(label: &str, literal: &str, value: c_char) -> Self {
        Self {
            label: label.to_string(),
            literal: Some(literal.to_string()),
            value: CharValue(value as u8).into(),
            layout: Layout::of_val(&value),
            raw: value.as_bytes().to_vec(),
            record: None,
        }
    }

    pub fn color(label: &str, value: Color) -> Self {
        Self {
            label: label.to_string(),
            literal: Some(value.name().to_string()),
            value: value.to_value().into(),
            layout: Layout::of_val(&value),
            raw: value.as_bytes().to_vec(),
            record: None,
        }
    }

    pub fn point(label: &str, value: &Point) -> Self {
        Self {
            label: label.to_string(),
            literal: None,
            value: value.to_value().into(),
            layout: Layout::of_val(value),
            raw: value.as_bytes().to_vec(),
            record: Some(Point::record_layout()),
        }
    }

    /// Checks the stored value against a fresh parse of its source literal.
    fn verify_literal(&self) -> Result<()> {
        let text = match (&self.literal, &self.value) {
            (Some(text), Value::Integral(_) | Value::Floating(_) | Value::Char(_)) => text,
            _ => return Ok(()),
        };
        let parsed = Literal::parse(text)?;
        let agrees = match (&self.value, &parsed) {
            (Value::Integral(stored), Literal::Integer(lit)) => {
                stored.widen() == lit.value.widen()
            }
            (Value::Floating(FloatingValue::F32(stored)), Literal::Floating(lit)) => {
                f32::try_from(lit.value)? == *stored
            }
            (Value::Floating(FloatingValue::F64(stored)), Literal::Floating(lit)) => {
                lit.value.widen() == *stored
            }
            (Value::Char(stored), Literal::Char(lit)) => *stored == lit.value,
            _ => bail!("{}: literal {:?} is of a different kind", self.label, text),
        };
        ensure!(
            agrees,
            "{}: stored value {:?} does not match literal {:?}",
            self.label,
            self.value,
            text
        );
        Ok(())
    }

    pub fn write_text(&self, mut w: impl Write, style: FloatStyle) -> io::Result<()> {
        let label = &self.label;
        let size = self.layout.size;
        match &self.value {
            Value::Integral(i) => {
                writeln!(w, "value of {label}: {i}, size of {label}: {size} bytes")
            }
            Value::Floating(f) => writeln!(
                w,
                "value of {label}: {}, size of {label}: {size} bytes",
                style.render(*f)
            ),
            Value::Char(c) => writeln!(
                w,
                "value of {label}: {}, ASCII: {}, size of {label}: {size} bytes",
                c.glyph(),
                c.code_point()
            ),
            Value::Enum(e) => writeln!(
                w,
                "{label}: {} ({}), size of enum: {size} bytes",
                e.variant.discriminant,
                e.legend()
            ),
            Value::Record(r) => {
                let fields = r
                    .fields
                    .iter()
                    .map(|f| f.value.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(
                    w,
                    "{} coordinates: ({fields}), size of struct: {size} bytes",
                    r.type_name
                )
            }
        }
    }
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    serializer.serialize_str(&hex)
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub entries: Vec<Entry>,
}

impl Report {
    /// The fixed set of declarations, in the order they are printed.
    pub fn standard() -> Result<Self> {
        let x: c_int = N;
        let y: c_int = 85;
        let z: c_int = 0o213;
        let t: c_int = 0x4b;
        let a: c_float = 3.14159;
        let b: c_double = 314159E-5;
        let ch = b'a' as c_char;
        let favorite_color = Color::Blue;

        let mut p1 = Point::default();
        p1.x = 10;
        p1.y = 20;
        let p2 = Point::from((10, 20));
        let p3: PointAlias = PointAlias::new(10, 20);

        let report = Self {
            entries: vec![
                Entry::integral("x", "50", x),
                Entry::integral("y", "85", y),
                Entry::integral("z", "0213", z),
                Entry::integral("t", "0x4b", t),
                Entry::floating("a", "3.14159", a),
                Entry::floating("b", "314159E-5L", b),
                Entry::char("ch", "'a'", ch),
                Entry::color("Favorite color", favorite_color),
                Entry::point("p1", &p1),
                Entry::point("p2", &p2),
                Entry::point("p3", &p3),
            ],
        };
        report.verify()?;
        Ok(report)
    }

    fn verify(&self) -> Result<()> {
        let mut record_size = None;
        for entry in &self.entries {
            tracing::debug!(label = %entry.label, size = entry.layout.size, "verifying entry");
            entry.verify_literal()?;
            if let Some(record) = &entry.record {
                ensure!(
                    record.layout == entry.layout,
                    "{}: computed layout {:?} differs from the compiler's {:?}",
                    entry.label,
                    record.layout,
                    entry.layout
                );
                let size = *record_size.get_or_insert(entry.layout.size);
                ensure!(
                    size == entry.layout.size,
                    "{}: record size {} differs from {}",
                    entry.label,
                    entry.layout.size,
                    size
                );
            }
        }
        Ok(())
    }

    pub fn write_text(&self, mut w: impl Write, style: FloatStyle) -> io::Result<()> {
        for entry in &self.entries {
            entry.write_text(&mut w, style)?;
        }
        Ok(())
    }

    pub fn write_json(&self, w: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(w, self)?;
        Ok(())
    }
}
