//! Tabular results with an explicit empty variant.

use polars::prelude::*;

/// A loaded or filtered table.
///
/// Zero-row frames are always held as `Empty`, so callers branch on
/// [`Table::is_empty`] instead of inspecting the frame.
#[derive(Debug, Clone)]
pub enum Table {
    /// No rows. Keeps the column names so the schema survives.
    Empty(Vec<String>),
    Rows(DataFrame),
}

impl Table {
    pub fn from_frame(df: DataFrame) -> Self {
        if df.height() == 0 {
            Table::Empty(df.get_column_names().iter().map(|s| s.to_string()).collect())
        } else {
            Table::Rows(df)
        }
    }

    /// Empty table with the given string columns.
    pub fn empty_with_schema(columns: &[&str]) -> Self {
        Table::Empty(columns.iter().map(|c| c.to_string()).collect())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Table::Empty(_))
    }

    pub fn height(&self) -> usize {
        match self {
            Table::Empty(_) => 0,
            Table::Rows(df) => df.height(),
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        match self {
            Table::Empty(columns) => columns.clone(),
            Table::Rows(df) => df.get_column_names().iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn frame(&self) -> Option<&DataFrame> {
        match self {
            Table::Empty(_) => None,
            Table::Rows(df) => Some(df),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_row_frame_is_empty_variant() {
        let df = df![
            "Country" => Vec::<&str>::new(),
            "Company" => Vec::<&str>::new()
        ]
        .unwrap();

        let table = Table::from_frame(df);
        assert!(table.is_empty());
        assert_eq!(table.height(), 0);
        assert_eq!(table.column_names(), vec!["Country", "Company"]);
        assert!(table.frame().is_none());
    }

    #[test]
    fn test_rows_variant() {
        let df = df!["Country" => ["US"], "Company" => ["Acme"]].unwrap();
        let table = Table::from_frame(df);
        assert!(!table.is_empty());
        assert_eq!(table.height(), 1);
    }
}
