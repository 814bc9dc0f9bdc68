use anyhow::{anyhow, ensure};

use crate::{
    macros::define_casting_integral, CharValue, EnumValue, FloatingValue, IntegralValue,
    RecordValue, Value,
};

define_casting_integral!(i8, I8);
define_casting_integral!(i16, I16);
define_casting_integral!(i32, I32);
define_casting_integral!(i64, I64);
define_casting_integral!(u8, U8);
define_casting_integral!(u16, U16);
define_casting_integral!(u32, U32);
define_casting_integral!(u64, U64);

impl TryFrom<Value> for IntegralValue {
    type Error = anyhow::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Integral(i) => Ok(i),
            other => Err(anyhow!("expected an integral value, got {:?}", other)),
        }
    }
}

impl From<f32> for FloatingValue {
    fn from(f: f32) -> Self {
        Self::F32(f)
    }
}

impl From<f64> for FloatingValue {
    fn from(f: f64) -> Self {
        Self::F64(f)
    }
}

impl TryFrom<FloatingValue> for f32 {
    type Error = anyhow::Error;

    fn try_from(value: FloatingValue) -> Result<Self, Self::Error> {
        match value {
            FloatingValue::F32(f) => Ok(f),
            FloatingValue::F64(d) => {
                let f = d as f32;
                ensure!(f.is_finite() || d.is_infinite(), "overflow: {} for f32", d);
                Ok(f)
            }
        }
    }
}

impl From<IntegralValue> for Value {
    fn from(i: IntegralValue) -> Self {
        Self::Integral(i)
    }
}

impl From<FloatingValue> for Value {
    fn from(f: FloatingValue) -> Self {
        Self::Floating(f)
    }
}

impl From<CharValue> for Value {
    fn from(c: CharValue) -> Self {
        Self::Char(c)
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Self::Enum(e)
    }
}

impl From<RecordValue> for Value {
    fn from(r: RecordValue) -> Self {
        Self::Record(r)
    }
}
