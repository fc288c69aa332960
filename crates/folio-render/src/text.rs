use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Width of the widest line.
    pub width: f64,
    pub line_count: usize,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str) -> TextMetrics;
}

/// Fixed advance per terminal column; wide glyphs count as two columns.
#[derive(Debug, Clone)]
pub struct ColumnMeasurer {
    pub column_width: f64,
}

impl Default for ColumnMeasurer {
    fn default() -> Self {
        Self { column_width: 8.3 }
    }
}

impl ColumnMeasurer {
    pub fn lines(text: &str) -> impl Iterator<Item = &str> {
        text.split('\n')
    }
}

impl TextMeasurer for ColumnMeasurer {
    fn measure(&self, text: &str) -> TextMetrics {
        let mut columns = 0usize;
        let mut line_count = 0usize;
        for line in Self::lines(text) {
            columns = columns.max(UnicodeWidthStr::width(line));
            line_count += 1;
        }
        TextMetrics {
            width: columns as f64 * self.column_width,
            line_count,
        }
    }
}
