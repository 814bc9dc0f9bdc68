pub mod ctypes;
pub mod format;
mod helper_impl;
pub mod layout;
pub mod literal;
mod macros;
pub mod report;
mod value;

pub use format::FloatStyle;
pub use layout::Layout;
pub use literal::Literal;
pub use report::{Entry, Report};
pub use value::{
    CharValue, EnumValue, EnumVariant, FloatingValue, IntegralValue, RecordField, RecordValue,
    Value,
};
