// viz_utils.rs
use crate::csv_utils::{ColumnSet, ColumnType, CsvTable};
use crate::error::VizError;
use crate::plot_utils::{self, PlotArtifact, PlotSelection, RenderContext};
use std::collections::HashMap;
use std::path::PathBuf;

/// Label of the single pseudo-partition used when no categorical column is
/// available, matching the original tool's "overall" label.
pub const WHOLE_TABLE_LABEL: &str = "全体";

/// Configuration for [`visualize_csv_data`]. Column lists, the figure size
/// and the plot selector are parsed once at the CLI boundary into these typed
/// fields; the pipeline never re-interprets strings.
#[derive(Debug, Clone)]
pub struct VizConfig {
    pub output_dir: PathBuf,
    /// Figure size in abstract units, rendered at 100 px per unit.
    pub figsize: (f64, f64),
    /// Display-only mode: emit terminal previews, never touch the filesystem.
    pub show_only: bool,
    /// Category columns to split on; empty means "infer" (first text column).
    pub category_columns: Vec<String>,
    pub plot_selection: PlotSelection,
    /// Numeric columns to leave out of plotting.
    pub exclude_columns: Vec<String>,
    /// Delete and recreate the output directory before writing.
    pub initialize_dir: bool,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plots"),
            figsize: (12.0, 4.0),
            show_only: false,
            category_columns: Vec::new(),
            plot_selection: PlotSelection::All,
            exclude_columns: Vec::new(),
            initialize_dir: false,
        }
    }
}

/// Distinguishes a completed run from the expected "nothing to do" outcome
/// (no plottable numeric columns after exclusions), so callers never have to
/// string-match diagnostics.
#[derive(Debug)]
pub enum VizOutcome {
    Completed { artifacts: Vec<PlotArtifact> },
    NothingToDo,
}

/// One partition of the table: the (column, value) pairs identifying it, the
/// display label joined as `col=value` fragments, and the matching row
/// indices. The whole-table pseudo-partition has an empty key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub key: Vec<(String, String)>,
    pub label: String,
    pub row_indices: Vec<usize>,
}

/// Applies the category selection policy:
///
/// 1. requested names that exist in the table, in the requested order
///    (missing names are dropped with a warning);
/// 2. else the first text column of the table;
/// 3. else nothing (the caller renders the whole table unsplit).
pub fn select_category_columns(
    table: &CsvTable,
    columns: &ColumnSet,
    requested: &[String],
) -> Vec<String> {
    if !requested.is_empty() {
        let mut selected = Vec::new();
        for name in requested {
            if table.column_index(name).is_some() {
                println!("using category column: {name}");
                selected.push(name.clone());
            } else {
                log::warn!("requested category column '{name}' not found, ignoring");
            }
        }
        if !selected.is_empty() {
            return selected;
        }
        log::warn!(
            "none of the requested category columns exist; available columns: {:?}",
            table.headers()
        );
    }
    match columns.categorical.first() {
        Some(first) => {
            println!("using first text column as category: {first}");
            vec![first.clone()]
        }
        None => Vec::new(),
    }
}

/// Splits the table into one partition per distinct combination of values
/// over `selected`, in first-appearance order. Rows with a missing value in
/// any selected column belong to no partition. With an empty selection the
/// whole table becomes one pseudo-partition labeled [`WHOLE_TABLE_LABEL`].
pub fn partition_table(table: &CsvTable, selected: &[String]) -> Vec<Partition> {
    if selected.is_empty() {
        return vec![Partition {
            key: Vec::new(),
            label: WHOLE_TABLE_LABEL.to_string(),
            row_indices: (0..table.row_count()).collect(),
        }];
    }

    let indices: Vec<usize> = selected
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();

    let mut discovery: Vec<Vec<String>> = Vec::new();
    let mut rows_by_key: Vec<Vec<usize>> = Vec::new();
    let mut lookup: HashMap<Vec<String>, usize> = HashMap::new();

    for row in 0..table.row_count() {
        let mut key_values = Vec::with_capacity(indices.len());
        let mut missing = false;
        for &col in &indices {
            let cell = table.value(row, col);
            if CsvTable::is_missing(cell) {
                missing = true;
                break;
            }
            key_values.push(cell.trim().to_string());
        }
        if missing {
            continue;
        }
        match lookup.get(&key_values) {
            Some(&slot) => rows_by_key[slot].push(row),
            None => {
                lookup.insert(key_values.clone(), discovery.len());
                discovery.push(key_values);
                rows_by_key.push(vec![row]);
            }
        }
    }

    discovery
        .into_iter()
        .zip(rows_by_key)
        .map(|(values, row_indices)| {
            let key: Vec<(String, String)> = selected.iter().cloned().zip(values).collect();
            let label = key
                .iter()
                .map(|(col, value)| format!("{col}={value}"))
                .collect::<Vec<_>>()
                .join("_");
            Partition {
                key,
                label,
                row_indices,
            }
        })
        .collect()
}

/// Runs the whole pipeline over one CSV file: load, classify, partition,
/// render each numeric column of each partition, and print the run summary.
///
/// File-level failures (missing file, empty data) abort the run; column- and
/// partition-level conditions are skipped with a diagnostic. The expected
/// "no plottable columns" case is reported as `VizOutcome::NothingToDo`.
pub fn visualize_csv_data(csv_file_path: &str, config: &VizConfig) -> Result<VizOutcome, VizError> {
    let table = CsvTable::from_csv(csv_file_path)?;
    println!("loaded data: {csv_file_path}");
    println!(
        "shape: {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );

    if !config.show_only {
        plot_utils::prepare_output_dir(&config.output_dir, config.initialize_dir)?;
    }

    let columns = table.classify_columns(&config.exclude_columns);
    let excluded_numeric: Vec<&String> = config
        .exclude_columns
        .iter()
        .filter(|name| {
            table
                .column_index(name)
                .map(|i| table.column_type(i) == ColumnType::Numeric)
                .unwrap_or(false)
        })
        .collect();
    if !excluded_numeric.is_empty() {
        println!("excluded numeric columns: {}", excluded_numeric.len());
        for name in &excluded_numeric {
            println!("  - {name}");
        }
    }

    if columns.numeric.is_empty() {
        println!("no numeric columns to plot after exclusions");
        return Ok(VizOutcome::NothingToDo);
    }
    println!("numeric columns: {:?}", columns.numeric);
    println!("text columns: {:?}", columns.categorical);
    println!("plot selection: {}", config.plot_selection.file_tag());

    let selected = select_category_columns(&table, &columns, &config.category_columns);
    let partitions = partition_table(&table, &selected);
    if !selected.is_empty() {
        println!("category columns: {selected:?}");
        println!("category combinations: {}", partitions.len());
    }

    let ctx = RenderContext {
        figsize: config.figsize,
        selection: config.plot_selection,
        output_dir: if config.show_only {
            None
        } else {
            Some(config.output_dir.clone())
        },
    };

    let mut artifacts = Vec::new();
    for partition in &partitions {
        println!("\n=== category '{}' ===", partition.label);
        println!("rows: {}", partition.row_indices.len());
        if partition.row_indices.is_empty() {
            log::warn!("category '{}' has no rows, skipping", partition.label);
            continue;
        }
        let category = if partition.key.is_empty() {
            None
        } else {
            Some(partition.label.as_str())
        };
        for name in &columns.numeric {
            let col = match table.column_index(name) {
                Some(col) => col,
                None => continue,
            };
            let values = table.numeric_values(col, &partition.row_indices);
            let mut produced = plot_utils::render_column(&values, name, category, &ctx)?;
            artifacts.append(&mut produced);
        }
    }

    table.describe();
    match &ctx.output_dir {
        Some(dir) => println!("\nall visualizations completed, output: {}", dir.display()),
        None => println!("\nall visualizations completed"),
    }
    Ok(VizOutcome::Completed { artifacts })
}
