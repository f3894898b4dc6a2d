// csv_utils.rs
use crate::error::VizError;
use crate::stats_utils::ColumnStats;
use csv::ReaderBuilder;
use std::path::Path;

/// The inferred type of one column. Inference runs exactly once, at load
/// time, over a fixed enumeration of cell types; it is never re-derived ad
/// hoc afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Every non-missing cell parses as a finite float. A column whose cells
    /// are all missing also lands here, mirroring an all-null float column;
    /// it is later skipped as empty rather than treated as text.
    Numeric,
    Text,
}

/// Column names split by role: `numeric` are plottable (after exclusions),
/// `categorical` are candidates for grouping. Both preserve the original
/// column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

/// An in-memory tabular dataset: a header row naming columns, rows of string
/// cells, and the per-column type cached at construction. Immutable once
/// loaded; the pipeline only ever derives row subsets from it.
#[derive(Debug, Clone)]
pub struct CsvTable {
    headers: Vec<String>,
    data: Vec<Vec<String>>,
    column_types: Vec<ColumnType>,
}

impl CsvTable {
    /// Loads a UTF-8 delimited file with a header row.
    ///
    /// Fails with `SourceNotFound` when the path does not exist and with
    /// `EmptyData` when the file parses to zero rows or zero columns. No
    /// coercion is applied beyond the per-column numeric/text inference.
    pub fn from_csv(file_path: &str) -> Result<Self, VizError> {
        let path = Path::new(file_path);
        if !path.exists() {
            return Err(VizError::SourceNotFound(path.to_path_buf()));
        }
        let mut reader = ReaderBuilder::new().from_path(path)?;
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut data = Vec::new();
        for record in reader.records() {
            let record = record?;
            data.push(record.iter().map(|cell| cell.to_string()).collect());
        }
        if headers.is_empty() || data.is_empty() {
            return Err(VizError::EmptyData(path.to_path_buf()));
        }
        let column_types = infer_column_types(&headers, &data);
        Ok(Self {
            headers,
            data,
            column_types,
        })
    }

    /// Builds a table directly from headers and rows, applying the same
    /// emptiness check and type inference as `from_csv`.
    pub fn from_rows(headers: Vec<String>, data: Vec<Vec<String>>) -> Result<Self, VizError> {
        if headers.is_empty() || data.is_empty() {
            return Err(VizError::EmptyData("<in-memory>".into()));
        }
        let column_types = infer_column_types(&headers, &data);
        Ok(Self {
            headers,
            data,
            column_types,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn column_type(&self, column: usize) -> ColumnType {
        self.column_types
            .get(column)
            .copied()
            .unwrap_or(ColumnType::Text)
    }

    /// Returns the raw cell, or "" when the coordinates fall outside the
    /// table (short rows are treated as trailing missing cells).
    pub fn value(&self, row: usize, column: usize) -> &str {
        self.data
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// A cell is missing when it is empty after trimming whitespace.
    pub fn is_missing(cell: &str) -> bool {
        cell.trim().is_empty()
    }

    /// Parses the non-missing cells of `column` across the given rows.
    /// Non-finite parses (NaN, infinities) are dropped along with missing
    /// cells.
    pub fn numeric_values(&self, column: usize, rows: &[usize]) -> Vec<f64> {
        rows.iter()
            .filter_map(|&row| {
                let cell = self.value(row, column);
                if Self::is_missing(cell) {
                    return None;
                }
                cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
            })
            .collect()
    }

    /// Splits the columns into plottable numeric names (minus `excluded`) and
    /// categorical text names. Exclusion names that match nothing are
    /// silently ignored; they simply fail to remove anything.
    pub fn classify_columns(&self, excluded: &[String]) -> ColumnSet {
        let mut set = ColumnSet::default();
        for (i, name) in self.headers.iter().enumerate() {
            match self.column_types[i] {
                ColumnType::Numeric if !excluded.contains(name) => set.numeric.push(name.clone()),
                ColumnType::Numeric => {}
                ColumnType::Text => set.categorical.push(name.clone()),
            }
        }
        set
    }

    /// Prints a describe-style summary table (count, mean, std, min,
    /// quartiles, max) over every numeric column of the table.
    pub fn describe(&self) {
        println!("\n=== data summary ===");
        println!(
            "{:<20} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        );
        let all_rows: Vec<usize> = (0..self.row_count()).collect();
        for (i, name) in self.headers.iter().enumerate() {
            if self.column_types[i] != ColumnType::Numeric {
                continue;
            }
            let values = self.numeric_values(i, &all_rows);
            match ColumnStats::from_values(&values) {
                Some(s) => println!(
                    "{:<20} {:>8} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
                    name, s.count, s.mean, s.std_dev, s.min, s.q1, s.median, s.q3, s.max
                ),
                None => println!("{:<20} {:>8}", name, 0),
            }
        }
    }
}

fn infer_column_types(headers: &[String], data: &[Vec<String>]) -> Vec<ColumnType> {
    (0..headers.len())
        .map(|col| {
            let numeric = data.iter().all(|row| {
                let cell = row.get(col).map(String::as_str).unwrap_or("").trim();
                cell.is_empty() || cell.parse::<f64>().map(|v| v.is_finite()).unwrap_or(false)
            });
            if numeric {
                ColumnType::Numeric
            } else {
                ColumnType::Text
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(csv: &str) -> CsvTable {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(csv.as_bytes()).unwrap();
        file.flush().unwrap();
        CsvTable::from_csv(file.path().to_str().unwrap()).unwrap()
    }

    #[test]
    fn loads_and_infers_column_types() {
        let t = table("id,name,score\n1,alice,9.5\n2,bob,7.25\n");
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column_count(), 3);
        assert_eq!(t.column_type(0), ColumnType::Numeric);
        assert_eq!(t.column_type(1), ColumnType::Text);
        assert_eq!(t.column_type(2), ColumnType::Numeric);
    }

    #[test]
    fn missing_cells_do_not_break_numeric_inference() {
        let t = table("a,b\n1,\n,x\n3,y\n");
        assert_eq!(t.column_type(0), ColumnType::Numeric);
        assert_eq!(t.column_type(1), ColumnType::Text);
        assert_eq!(t.numeric_values(0, &[0, 1, 2]), vec![1.0, 3.0]);
    }

    #[test]
    fn all_missing_column_counts_as_numeric() {
        let t = table("a,b\n,x\n,y\n");
        assert_eq!(t.column_type(0), ColumnType::Numeric);
        assert!(t.numeric_values(0, &[0, 1]).is_empty());
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let err = CsvTable::from_csv("no/such/file.csv").unwrap_err();
        assert!(matches!(err, VizError::SourceNotFound(_)));
    }

    #[test]
    fn header_only_file_is_empty_data() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"a,b,c\n").unwrap();
        file.flush().unwrap();
        let err = CsvTable::from_csv(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, VizError::EmptyData(_)));
    }

    #[test]
    fn empty_file_is_empty_data() {
        let file = NamedTempFile::new().unwrap();
        let err = CsvTable::from_csv(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, VizError::EmptyData(_)));
    }

    #[test]
    fn classification_applies_exclusions() {
        let t = table("id,group,value\n1,A,10\n2,B,20\n");
        let set = t.classify_columns(&["id".to_string()]);
        assert_eq!(set.numeric, vec!["value".to_string()]);
        assert_eq!(set.categorical, vec!["group".to_string()]);
    }

    #[test]
    fn unknown_exclusion_names_are_ignored() {
        let t = table("id,group,value\n1,A,10\n2,B,20\n");
        let set = t.classify_columns(&["nope".to_string()]);
        assert_eq!(set.numeric, vec!["id".to_string(), "value".to_string()]);
    }
}
