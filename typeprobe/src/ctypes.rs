//! The C declarations being probed.

use std::os::raw::c_int;

use zerocopy::{AsBytes, FromBytes};

use crate::{
    layout::{RecordBuilder, RecordLayout},
    EnumValue, EnumVariant, Layout, RecordField, RecordValue,
};

/// Stands in for `#define N 50`.
pub const N: c_int = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes)]
#[repr(C)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
        }
    }

    pub fn discriminant(self) -> c_int {
        self as c_int
    }

    pub fn to_value(self) -> EnumValue {
        let variant = |color: Color| EnumVariant {
            name: color.name().to_string(),
            discriminant: color.discriminant().into(),
        };
        EnumValue {
            type_name: "Color".to_string(),
            variant: variant(self),
            variants: Self::ALL.into_iter().map(variant).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, AsBytes, FromBytes)]
#[repr(C)]
pub struct Point {
    pub x: c_int,
    pub y: c_int,
}

/// Another name for the same layout, like a C `typedef`.
pub type PointAlias = Point;

impl Point {
    pub const fn new(x: c_int, y: c_int) -> Self {
        Self { x, y }
    }

    pub fn record_layout() -> RecordLayout {
        RecordBuilder::new()
            .field("x", Layout::of::<c_int>())
            .field("y", Layout::of::<c_int>())
            .build()
    }

    pub fn to_value(&self) -> RecordValue {
        RecordValue {
            type_name: "Point".to_string(),
            fields: vec![
                RecordField {
                    name: "x".to_string(),
                    value: self.x.into(),
                },
                RecordField {
                    name: "y".to_string(),
                    value: self.y.into(),
                },
            ],
        }
    }
}

impl From<(c_int, c_int)> for Point {
    fn from((x, y): (c_int, c_int)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use std::mem;

    use super::*;

    #[test]
    fn test_color_encoding() {
        assert_eq!(Color::Red.discriminant(), 0);
        assert_eq!(Color::Green.discriminant(), 1);
        assert_eq!(Color::Blue.discriminant(), 2);
        let blue = Color::Blue.to_value();
        assert_eq!(blue.variant.discriminant, 2);
        assert_eq!(blue.variant.name, "BLUE");
        assert_eq!(Color::Blue.as_bytes().len(), mem::size_of::<Color>());
    }

    #[test]
    fn test_point_paths_agree() {
        let mut p1 = Point::default();
        p1.x = 10;
        p1.y = 20;
        let p2 = Point::from((10, 20));
        let p3: PointAlias = PointAlias::new(10, 20);
        assert_eq!(p1, p2);
        assert_eq!(p2, p3);
        assert_eq!(mem::size_of_val(&p1), mem::size_of_val(&p3));
        assert_eq!(p1.as_bytes(), p3.as_bytes());
    }

    #[test]
    fn test_point_record_layout() {
        let record = Point::record_layout();
        assert_eq!(record.layout, Layout::of::<Point>());
        assert_eq!(record.offset_of("x"), Some(0));
        assert_eq!(record.offset_of("y"), Some(mem::size_of::<c_int>()));
        assert_eq!(Point::new(10, 20).to_value().field("y"), Some(20i32.into()));
    }
}
