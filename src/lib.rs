// lib.rs
//! # csvviz
//!
//! Visualize the numeric columns of a CSV file as histograms, box plots and
//! violin plots, optionally split by the values of one or more categorical
//! columns, plus a few small companion utilities exposed by the `csvviz`
//! binary.
//!
//! ## `csv_utils`
//!
//! - **Purpose**: Load a delimited UTF-8 file with a header row into an
//!   in-memory table.
//! - **Features**: Per-column numeric/text inference performed once at load
//!   time and cached, a missing-cell convention (empty after trimming),
//!   column classification with a user exclusion set, and a describe-style
//!   stdout summary of every numeric column.
//!
//! ## `viz_utils`
//!
//! - **Purpose**: The visualization pipeline itself.
//! - **Features**: Category-column selection (explicit request, else first
//!   text column, else whole-table), partitioning by distinct value
//!   combinations in first-appearance order, and `visualize_csv_data`, which
//!   drives load -> classify -> partition -> render -> emit for every numeric
//!   column of every partition and reports an explicit outcome value.
//!
//! ## `plot_utils`
//!
//! - **Purpose**: Render one figure per (partition, numeric column).
//! - **Features**: Histogram with dashed mean and ±1σ rules, box plot
//!   annotated with the IQR-fence outlier count, Gaussian-KDE violin with a
//!   stats block, deterministic sanitized file names, output-directory
//!   lifecycle, and a terminal preview for display-only mode.
//!
//! ## `stats_utils`
//!
//! - **Purpose**: Descriptive statistics for one column within one partition.
//! - **Features**: Count, mean, sample standard deviation, median, quartiles
//!   with linear interpolation, IQR, and the 1.5·IQR outlier count.
//!
//! ## `math_utils`
//!
//! - **Purpose**: Small integer helpers behind the `gcd` and `lcm`
//!   subcommands.
//!
//! ## `error`
//!
//! - **Purpose**: The pipeline's fatal-error taxonomy. Expected "nothing to
//!   do" outcomes are modeled as values, not errors.

pub mod csv_utils;
pub mod error;
pub mod math_utils;
pub mod plot_utils;
pub mod stats_utils;
pub mod viz_utils;
