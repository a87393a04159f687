//! Shared rendering rules for diagnostic reports
//!
//! Every format printer walks its record tree through a [`Report`], which
//! owns the layout rules: section titles with a dashed underline, two spaces
//! of indentation per nesting level, `label: value` field lines and a blank
//! line after each section. Values render through [`Field`]:
//!
//! - integers as `<decimal> (0x<hex>)`, hex padded to the type width
//! - byte runs as space-separated uppercase hex pairs
//! - absent optional values as `[NULL]`
//! - zero-length byte runs and count-prefixed names as `[EMPTY]`

const UNDERLINE: &str = "-------------------------";

/// A value that can appear on the right-hand side of a report field
pub trait Field {
    /// Render the value as it appears after `label: `
    fn render(&self) -> String;
}

macro_rules! unsigned_field {
    ($($ty:ty => $width:literal),*) => {
        $(
            impl Field for $ty {
                fn render(&self) -> String {
                    format!("{} (0x{:0width$X})", self, self, width = $width)
                }
            }
        )*
    };
}

macro_rules! signed_field {
    ($($ty:ty as $unsigned:ty => $width:literal),*) => {
        $(
            impl Field for $ty {
                fn render(&self) -> String {
                    format!("{} (0x{:0width$X})", self, *self as $unsigned, width = $width)
                }
            }
        )*
    };
}

unsigned_field!(u8 => 2, u16 => 4, u32 => 8, u64 => 16);
signed_field!(i8 as u8 => 2, i16 as u16 => 4, i32 as u32 => 8, i64 as u64 => 16);

impl Field for bool {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl Field for str {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl Field for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl Field for [u8] {
    fn render(&self) -> String {
        if self.is_empty() {
            return "[EMPTY]".to_string();
        }
        self.iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Field for Vec<u8> {
    fn render(&self) -> String {
        self.as_slice().render()
    }
}

impl<const N: usize> Field for [u8; N] {
    fn render(&self) -> String {
        self.as_slice().render()
    }
}

macro_rules! list_field {
    ($($ty:ty),*) => {
        $(
            impl Field for [$ty] {
                fn render(&self) -> String {
                    if self.is_empty() {
                        return "[EMPTY]".to_string();
                    }
                    self.iter().map(Field::render).collect::<Vec<_>>().join(", ")
                }
            }

            impl Field for Vec<$ty> {
                fn render(&self) -> String {
                    self.as_slice().render()
                }
            }

            impl<const N: usize> Field for [$ty; N] {
                fn render(&self) -> String {
                    self.as_slice().render()
                }
            }
        )*
    };
}

list_field!(u16, u32, u64);

impl<T: Field> Field for Option<T> {
    fn render(&self) -> String {
        self.as_ref().map_or_else(|| "[NULL]".to_string(), Field::render)
    }
}

impl<T: Field + ?Sized> Field for &T {
    fn render(&self) -> String {
        (**self).render()
    }
}

/// Indented writer over a caller-supplied text buffer
#[derive(Debug)]
pub struct Report<'a> {
    out: &'a mut String,
    depth: usize,
}

impl<'a> Report<'a> {
    /// Start a report at depth 0, appending to `out`
    pub fn new(out: &'a mut String) -> Self {
        Self { out, depth: 0 }
    }

    /// A writer one nesting level deeper, sharing the same buffer
    pub fn indented(&mut self) -> Report<'_> {
        Report {
            out: &mut *self.out,
            depth: self.depth + 1,
        }
    }

    /// Write a single indented line
    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    /// Write an empty line
    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Write a title followed by its underline
    pub fn title(&mut self, title: impl AsRef<str>) {
        self.line(title);
        self.line(UNDERLINE);
    }

    /// Write `label: value`
    pub fn field<T: Field + ?Sized>(&mut self, label: &str, value: &T) {
        self.line(format!("{label}: {}", value.render()));
    }

    /// Write a count-prefixed name, `[EMPTY]` when it has no characters
    pub fn name(&mut self, label: &str, value: &str) {
        if value.is_empty() {
            self.line(format!("{label}: [EMPTY]"));
        } else {
            self.line(format!("{label}: {value}"));
        }
    }

    /// Write the `[NULL]` placeholder for an absent entry
    pub fn null(&mut self) {
        self.line("[NULL]");
    }

    /// Write a titled section, or `missing` when the section is absent
    pub fn section<T>(
        &mut self,
        title: &str,
        missing: &str,
        value: Option<&T>,
        body: impl FnOnce(&mut Report<'_>, &T),
    ) {
        self.title(title);
        match value {
            Some(value) => body(self, value),
            None => self.line(missing),
        }
        self.blank();
    }

    /// Write a titled table with one zero-based header line per entry
    ///
    /// An empty table prints `empty` instead of entries.
    pub fn table<T>(
        &mut self,
        title: &str,
        empty: &str,
        entry: &str,
        items: &[T],
        mut body: impl FnMut(&mut Report<'_>, &T),
    ) {
        self.title(title);
        if items.is_empty() {
            self.line(empty);
        }
        for (index, item) in items.iter().enumerate() {
            self.line(format!("{entry} {index}"));
            body(&mut self.indented(), item);
        }
        self.blank();
    }

    /// Like [`Report::table`] for tables whose entries may be absent
    pub fn sparse_table<T>(
        &mut self,
        title: &str,
        empty: &str,
        entry: &str,
        items: &[Option<T>],
        mut body: impl FnMut(&mut Report<'_>, &T),
    ) {
        self.table(title, empty, entry, items, |report, item| match item {
            Some(item) => body(report, item),
            None => report.null(),
        });
    }
}
