//! In-memory column tables parsed from CSV.

use crate::error::{DataError, LoadError};

/// A single typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// 64-bit float values.
    Float(Vec<f64>),
    /// 64-bit integer values.
    Int(Vec<i64>),
    /// Free-form string values.
    Str(Vec<String>),
}

impl Column {
    /// Number of values in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Str(v) => v.len(),
        }
    }

    /// Whether the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type name, used in error messages and diagnostics.
    pub fn dtype(&self) -> &'static str {
        match self {
            Column::Float(_) => "float",
            Column::Int(_) => "int",
            Column::Str(_) => "str",
        }
    }
}

/// An immutable tabular dataset with named, typed columns.
///
/// Built once at startup and shared read-only across requests; nothing
/// here mutates after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    headers: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Parse a CSV document into a typed table.
    ///
    /// Column types are inferred per column: all-integer cells become
    /// [`Column::Int`], all-numeric become [`Column::Float`], anything
    /// else stays [`Column::Str`].
    pub fn from_csv(name: &str, text: &str) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| LoadError::Csv {
                name: name.to_string(),
                source,
            })?
            .iter()
            .map(str::to_string)
            .collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        let mut rows = 0usize;
        for record in reader.records() {
            let record = record.map_err(|source| LoadError::Csv {
                name: name.to_string(),
                source,
            })?;
            for (i, field) in record.iter().enumerate() {
                cells[i].push(field.trim().to_string());
            }
            rows += 1;
        }

        if rows == 0 || headers.is_empty() {
            return Err(LoadError::Empty {
                name: name.to_string(),
            });
        }

        let columns = cells.into_iter().map(infer_column).collect();

        Ok(Self {
            name: name.to_string(),
            headers,
            columns,
            rows,
        })
    }

    /// Dataset identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of data rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column names in source order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// (name, type) pairs for every column, in source order.
    pub fn schema(&self) -> Vec<(&str, &'static str)> {
        self.headers
            .iter()
            .zip(&self.columns)
            .map(|(h, c)| (h.as_str(), c.dtype()))
            .collect()
    }

    fn column(&self, column: &str) -> Result<&Column, DataError> {
        self.headers
            .iter()
            .position(|h| h == column)
            .map(|i| &self.columns[i])
            .ok_or_else(|| DataError::ColumnNotFound {
                dataset: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Numeric values of a column; integer columns are promoted to f64.
    pub fn f64s(&self, column: &str) -> Result<Vec<f64>, DataError> {
        match self.column(column)? {
            Column::Float(v) => Ok(v.clone()),
            Column::Int(v) => Ok(v.iter().map(|&x| x as f64).collect()),
            Column::Str(_) => Err(self.type_error(column, "numeric")),
        }
    }

    /// Integer values of a column.
    pub fn i64s(&self, column: &str) -> Result<&[i64], DataError> {
        match self.column(column)? {
            Column::Int(v) => Ok(v),
            _ => Err(self.type_error(column, "int")),
        }
    }

    /// String values of a column.
    pub fn strs(&self, column: &str) -> Result<&[String], DataError> {
        match self.column(column)? {
            Column::Str(v) => Ok(v),
            _ => Err(self.type_error(column, "str")),
        }
    }

    /// Unique string values of a column, in first-appearance order.
    pub fn categories(&self, column: &str) -> Result<Vec<String>, DataError> {
        let values = self.strs(column)?;
        let mut seen = Vec::new();
        for v in values {
            if !seen.contains(v) {
                seen.push(v.clone());
            }
        }
        Ok(seen)
    }

    /// Numeric values of `column` on the rows where string column `by`
    /// equals `value`.
    pub fn f64s_where_str(
        &self,
        column: &str,
        by: &str,
        value: &str,
    ) -> Result<Vec<f64>, DataError> {
        let values = self.f64s(column)?;
        let keys = self.strs(by)?;
        Ok(values
            .iter()
            .zip(keys)
            .filter(|(_, k)| k.as_str() == value)
            .map(|(&v, _)| v)
            .collect())
    }

    /// Numeric values of `column` on the rows where integer column `by`
    /// equals `value`.
    pub fn f64s_where_i64(&self, column: &str, by: &str, value: i64) -> Result<Vec<f64>, DataError> {
        let values = self.f64s(column)?;
        let keys = self.i64s(by)?;
        Ok(values
            .iter()
            .zip(keys)
            .filter(|(_, &k)| k == value)
            .map(|(&v, _)| v)
            .collect())
    }

    fn type_error(&self, column: &str, expected: &'static str) -> DataError {
        DataError::ColumnType {
            dataset: self.name.clone(),
            column: column.to_string(),
            expected,
        }
    }
}

fn infer_column(cells: Vec<String>) -> Column {
    if cells.iter().all(|c| c.parse::<i64>().is_ok()) {
        return Column::Int(cells.iter().map(|c| c.parse().unwrap_or(0)).collect());
    }
    if cells.iter().all(|c| c.parse::<f64>().is_ok()) {
        return Column::Float(cells.iter().map(|c| c.parse().unwrap_or(0.0)).collect());
    }
    Column::Str(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CSV: &str = "\
model,displ,cyl,class
a4,1.8,4,compact
a4,2.0,4,compact
forester,2.5,4,suv
caravan,3.3,6,minivan
corvette,5.7,8,2seater
";

    fn table() -> Dataset {
        Dataset::from_csv("mpg", CSV).unwrap()
    }

    #[test]
    fn infers_column_types() {
        let t = table();
        assert_eq!(
            t.schema(),
            vec![
                ("model", "str"),
                ("displ", "float"),
                ("cyl", "int"),
                ("class", "str"),
            ]
        );
        assert_eq!(t.rows(), 5);
    }

    #[test]
    fn int_columns_promote_to_f64() {
        let t = table();
        assert_eq!(t.f64s("cyl").unwrap(), vec![4.0, 4.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let t = table();
        assert!(matches!(
            t.f64s("hwy"),
            Err(DataError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn string_column_is_not_numeric() {
        let t = table();
        assert!(matches!(t.f64s("model"), Err(DataError::ColumnType { .. })));
        assert!(matches!(t.i64s("displ"), Err(DataError::ColumnType { .. })));
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let t = table();
        assert_eq!(
            t.categories("class").unwrap(),
            vec!["compact", "suv", "minivan", "2seater"]
        );
    }

    #[test]
    fn filters_select_matching_rows() {
        let t = table();
        assert_eq!(
            t.f64s_where_str("displ", "class", "compact").unwrap(),
            vec![1.8, 2.0]
        );
        assert_eq!(t.f64s_where_i64("displ", "cyl", 8).unwrap(), vec![5.7]);
        assert!(t.f64s_where_str("displ", "class", "pickup").unwrap().is_empty());
    }

    #[test]
    fn empty_csv_is_a_load_error() {
        assert!(matches!(
            Dataset::from_csv("empty", "a,b\n"),
            Err(LoadError::Empty { .. })
        ));
    }

    #[test]
    fn ragged_csv_is_a_load_error() {
        assert!(matches!(
            Dataset::from_csv("bad", "a,b\n1,2\n3\n"),
            Err(LoadError::Csv { .. })
        ));
    }
}
