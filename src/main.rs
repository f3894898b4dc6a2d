// main.rs
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use csvviz::math_utils;
use csvviz::plot_utils::PlotSelection;
use csvviz::viz_utils::{visualize_csv_data, VizConfig, VizOutcome};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "csvviz", version, about = "A collection of useful commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Visualize the numeric columns of a CSV file
    Visualize {
        /// Path of the CSV file to visualize
        csv_file: String,
        /// Directory the PNG files are written to
        #[arg(long, default_value = "plots")]
        output_dir: PathBuf,
        /// Figure size as a width,height pair
        #[arg(long, default_value = "12,4")]
        figsize: String,
        /// Print terminal previews instead of saving files
        #[arg(long)]
        show_only: bool,
        /// Comma-separated category column names (default: infer)
        #[arg(long)]
        category_columns: Option<String>,
        /// Plots to draw: all, hist, box or violin
        #[arg(long, default_value = "all")]
        plot_types: String,
        /// Comma-separated column names to exclude from plotting
        #[arg(long)]
        exclude_columns: Option<String>,
        /// Delete and recreate the output directory before writing
        #[arg(long)]
        initialize_dir: bool,
    },
    /// Greatest common divisor
    Gcd { x: u64, y: u64 },
    /// Least common multiple
    Lcm { x: u64, y: u64 },
    /// Show the local date
    Now,
}

fn parse_figsize(value: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        bail!("figsize must be a width,height pair, got '{value}'");
    }
    let width = parts[0]
        .parse()
        .with_context(|| format!("invalid figure width '{}'", parts[0]))?;
    let height = parts[1]
        .parse()
        .with_context(|| format!("invalid figure height '{}'", parts[1]))?;
    Ok((width, height))
}

fn parse_column_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|s| {
            s.split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Visualize {
            csv_file,
            output_dir,
            figsize,
            show_only,
            category_columns,
            plot_types,
            exclude_columns,
            initialize_dir,
        } => {
            let config = VizConfig {
                output_dir,
                figsize: parse_figsize(&figsize)?,
                show_only,
                category_columns: parse_column_list(category_columns.as_deref()),
                plot_selection: PlotSelection::parse(&plot_types),
                exclude_columns: parse_column_list(exclude_columns.as_deref()),
                initialize_dir,
            };
            match visualize_csv_data(&csv_file, &config)? {
                VizOutcome::Completed { artifacts } => {
                    println!("{} artifacts produced", artifacts.len());
                }
                VizOutcome::NothingToDo => {}
            }
        }
        Commands::Gcd { x, y } => println!("{}", math_utils::gcd(x, y)),
        Commands::Lcm { x, y } => println!("{}", math_utils::lcm(x, y)),
        Commands::Now => println!("{}", chrono::Local::now().format("%A, %B %d, %Y")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figsize_parses_a_pair() {
        assert_eq!(parse_figsize("12,4").unwrap(), (12.0, 4.0));
        assert_eq!(parse_figsize(" 6 , 3.5 ").unwrap(), (6.0, 3.5));
        assert!(parse_figsize("12").is_err());
        assert!(parse_figsize("a,b").is_err());
    }

    #[test]
    fn column_lists_split_on_commas() {
        assert_eq!(
            parse_column_list(Some("a, b ,c")),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(parse_column_list(Some(" , ")).is_empty());
        assert!(parse_column_list(None).is_empty());
    }
}
