use std::mem;

use serde::Serialize;

/// Size and alignment of a type, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub size: usize,
    pub align: usize,
}

impl Layout {
    pub const fn of<T>() -> Self {
        Self {
            size: mem::size_of::<T>(),
            align: mem::align_of::<T>(),
        }
    }

    pub fn of_val<T>(val: &T) -> Self {
        Self {
            size: mem::size_of_val(val),
            align: mem::align_of_val(val),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLayout {
    pub name: String,
    pub offset: usize,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordLayout {
    pub fields: Vec<FieldLayout>,
    pub layout: Layout,
}

impl RecordLayout {
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.offset)
    }
}

/// Lays out fields one after another the way a `#[repr(C)]` struct is laid out.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: Vec<FieldLayout>,
    end: usize,
    align: usize,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, layout: Layout) -> Self {
        self.push(name.into(), layout);
        self
    }

    fn push(&mut self, name: String, layout: Layout) {
        debug_assert!(layout.align.is_power_of_two());
        let offset = round_up(self.end, layout.align);
        self.end = offset + layout.size;
        self.align = self.align.max(layout.align);
        self.fields.push(FieldLayout {
            name,
            offset,
            size: layout.size,
        });
    }

    pub fn align(&self) -> usize {
        self.align.max(1)
    }

    /// Size including trailing padding up to the record alignment.
    pub fn byte_len(&self) -> usize {
        round_up(self.end, self.align())
    }

    pub fn build(self) -> RecordLayout {
        let layout = Layout {
            size: self.byte_len(),
            align: self.align(),
        };
        RecordLayout {
            fields: self.fields,
            layout,
        }
    }
}

impl<S> Extend<(S, Layout)> for RecordBuilder
where
    S: Into<String>,
{
    fn extend<T: IntoIterator<Item = (S, Layout)>>(&mut self, iter: T) {
        for (name, layout) in iter {
            self.push(name.into(), layout);
        }
    }
}

// align is a power of two
fn round_up(n: usize, align: usize) -> usize {
    (n + align - 1) & !(align - 1)
}
