// visualize_tests.rs
use csvviz::error::VizError;
use csvviz::plot_utils::{Destination, PlotKind, PlotSelection};
use csvviz::viz_utils::{visualize_csv_data, VizConfig, VizOutcome};
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn completed(outcome: VizOutcome) -> Vec<csvviz::plot_utils::PlotArtifact> {
    match outcome {
        VizOutcome::Completed { artifacts } => artifacts,
        VizOutcome::NothingToDo => panic!("expected a completed run"),
    }
}

#[test]
fn grouped_histogram_yields_one_artifact_per_partition() {
    let file = write_csv("id,group,value\n1,A,10\n2,A,20\n3,B,30\n4,B,40\n");
    let config = VizConfig {
        show_only: true,
        category_columns: vec!["group".to_string()],
        plot_selection: PlotSelection::Histogram,
        exclude_columns: vec!["id".to_string()],
        ..VizConfig::default()
    };
    let artifacts = completed(visualize_csv_data(file.path().to_str().unwrap(), &config).unwrap());

    assert_eq!(artifacts.len(), 2);
    assert!(artifacts
        .iter()
        .all(|a| a.kind == PlotKind::Histogram && a.column == "value"));
    let labels: Vec<_> = artifacts
        .iter()
        .map(|a| a.category.clone().unwrap())
        .collect();
    assert_eq!(labels, vec!["group=A".to_string(), "group=B".to_string()]);
    assert!(artifacts
        .iter()
        .all(|a| a.destination == Destination::Display));
}

#[test]
fn requesting_all_yields_three_kinds_in_fixed_order() {
    let file = write_csv("group,value\nA,1\nA,2\nB,3\n");
    let config = VizConfig {
        show_only: true,
        plot_selection: PlotSelection::All,
        ..VizConfig::default()
    };
    let artifacts = completed(visualize_csv_data(file.path().to_str().unwrap(), &config).unwrap());

    // Two partitions (group=A, group=B via inference) x three kinds.
    assert_eq!(artifacts.len(), 6);
    let kinds: Vec<_> = artifacts.iter().take(3).map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![PlotKind::Histogram, PlotKind::BoxPlot, PlotKind::Violin]
    );
}

#[test]
fn unknown_plot_kind_behaves_like_all() {
    let file = write_csv("group,value\nA,1\nA,2\nB,3\n");
    let all = VizConfig {
        show_only: true,
        plot_selection: PlotSelection::All,
        ..VizConfig::default()
    };
    let unknown = VizConfig {
        show_only: true,
        plot_selection: PlotSelection::parse("scatter"),
        ..VizConfig::default()
    };
    let path = file.path().to_str().unwrap().to_string();
    let a = completed(visualize_csv_data(&path, &all).unwrap());
    let b = completed(visualize_csv_data(&path, &unknown).unwrap());
    assert_eq!(a.len(), b.len());
    assert_eq!(
        a.iter().map(|x| x.kind).collect::<Vec<_>>(),
        b.iter().map(|x| x.kind).collect::<Vec<_>>()
    );
}

#[test]
fn rows_with_missing_category_values_are_dropped() {
    let file = write_csv("group,value\nA,1\n,2\nB,3\n");
    let config = VizConfig {
        show_only: true,
        plot_selection: PlotSelection::Histogram,
        ..VizConfig::default()
    };
    let artifacts = completed(visualize_csv_data(file.path().to_str().unwrap(), &config).unwrap());
    let labels: Vec<_> = artifacts
        .iter()
        .map(|a| a.category.clone().unwrap())
        .collect();
    assert_eq!(labels, vec!["group=A".to_string(), "group=B".to_string()]);
}

#[test]
fn zero_rows_report_empty_data_and_no_artifacts() {
    let file = write_csv("a,b,c\n");
    let config = VizConfig {
        show_only: true,
        ..VizConfig::default()
    };
    let err = visualize_csv_data(file.path().to_str().unwrap(), &config).unwrap_err();
    assert!(matches!(err, VizError::EmptyData(_)));
}

#[test]
fn missing_file_reports_source_not_found() {
    let config = VizConfig {
        show_only: true,
        ..VizConfig::default()
    };
    let err = visualize_csv_data("definitely/not/here.csv", &config).unwrap_err();
    assert!(matches!(err, VizError::SourceNotFound(_)));
}

#[test]
fn fully_excluded_numeric_columns_are_nothing_to_do() {
    let file = write_csv("value\n1\n2\n3\n");
    let config = VizConfig {
        show_only: true,
        exclude_columns: vec!["value".to_string()],
        ..VizConfig::default()
    };
    let outcome = visualize_csv_data(file.path().to_str().unwrap(), &config).unwrap();
    assert!(matches!(outcome, VizOutcome::NothingToDo));
}

#[test]
fn excluding_an_absent_column_changes_nothing() {
    let file = write_csv("value\n1\n2\n3\n");
    let base = VizConfig {
        show_only: true,
        plot_selection: PlotSelection::Histogram,
        ..VizConfig::default()
    };
    let with_bogus = VizConfig {
        exclude_columns: vec!["nope".to_string()],
        ..base.clone()
    };
    let path = file.path().to_str().unwrap().to_string();
    let a = completed(visualize_csv_data(&path, &base).unwrap());
    let b = completed(visualize_csv_data(&path, &with_bogus).unwrap());
    assert_eq!(a.len(), b.len());
}

#[test]
fn whole_table_artifacts_carry_no_category() {
    let file = write_csv("x,y\n1,2\n3,4\n");
    let config = VizConfig {
        show_only: true,
        plot_selection: PlotSelection::BoxPlot,
        ..VizConfig::default()
    };
    let artifacts = completed(visualize_csv_data(file.path().to_str().unwrap(), &config).unwrap());
    assert_eq!(artifacts.len(), 2); // columns x and y, one box plot each
    assert!(artifacts.iter().all(|a| a.category.is_none()));
}

#[test]
fn saving_writes_one_png_per_partition_and_column() {
    let file = write_csv("id,group,value\n1,A,10\n2,A,20\n3,B,30\n4,B,40\n");
    let dir = tempdir().unwrap();
    let output_dir = dir.path().join("plots");
    let config = VizConfig {
        output_dir: output_dir.clone(),
        category_columns: vec!["group".to_string()],
        plot_selection: PlotSelection::Histogram,
        exclude_columns: vec!["id".to_string()],
        ..VizConfig::default()
    };
    let artifacts = completed(visualize_csv_data(file.path().to_str().unwrap(), &config).unwrap());

    assert_eq!(artifacts.len(), 2);
    for expected in [
        "value_groupA_hist_visualization.png",
        "value_groupB_hist_visualization.png",
    ] {
        assert!(
            output_dir.join(expected).is_file(),
            "missing artifact file {expected}"
        );
    }
}

#[test]
fn saving_all_kinds_writes_one_combined_figure_per_partition() {
    let file = write_csv("group,value\nA,10\nA,20\nB,30\nB,42\n");
    let dir = tempdir().unwrap();
    let output_dir = dir.path().join("plots");
    let config = VizConfig {
        output_dir: output_dir.clone(),
        plot_selection: PlotSelection::All,
        ..VizConfig::default()
    };
    let artifacts = completed(visualize_csv_data(file.path().to_str().unwrap(), &config).unwrap());

    // Two partitions (group=A, group=B via inference) x three kinds.
    assert_eq!(artifacts.len(), 6);
    for expected in [
        "value_groupA_all_visualization.png",
        "value_groupB_all_visualization.png",
    ] {
        assert!(
            output_dir.join(expected).is_file(),
            "missing artifact file {expected}"
        );
    }
    // The three kinds of one partition share a single figure file.
    let file_of = |a: &csvviz::plot_utils::PlotArtifact| match &a.destination {
        Destination::File(path) => path.clone(),
        Destination::Display => panic!("expected a file destination"),
    };
    assert_eq!(file_of(&artifacts[0]), file_of(&artifacts[1]));
    assert_eq!(file_of(&artifacts[1]), file_of(&artifacts[2]));
    assert_ne!(file_of(&artifacts[2]), file_of(&artifacts[3]));
}

#[test]
fn saving_a_box_plot_only_figure_succeeds() {
    let file = write_csv("value\n1\n2\n3\n4\n100\n");
    let dir = tempdir().unwrap();
    let output_dir = dir.path().join("plots");
    let config = VizConfig {
        output_dir: output_dir.clone(),
        plot_selection: PlotSelection::BoxPlot,
        ..VizConfig::default()
    };
    let artifacts = completed(visualize_csv_data(file.path().to_str().unwrap(), &config).unwrap());
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].kind, PlotKind::BoxPlot);
    assert!(output_dir.join("value_box_visualization.png").is_file());
}

fn png_dimensions(path: &std::path::Path) -> (u32, u32) {
    // IHDR starts right after the 8-byte signature and 8 bytes of
    // length/type; width and height are the first two big-endian u32s.
    let bytes = std::fs::read(path).unwrap();
    let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
    let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
    (width, height)
}

#[test]
fn single_kind_figures_use_one_third_of_the_multi_kind_width() {
    let file = write_csv("value\n1\n2\n3\n4\n5\n");
    let dir = tempdir().unwrap();
    let multi_dir = dir.path().join("multi");
    let single_dir = dir.path().join("single");
    let path = file.path().to_str().unwrap().to_string();

    let multi = VizConfig {
        output_dir: multi_dir.clone(),
        plot_selection: PlotSelection::All,
        ..VizConfig::default()
    };
    let single = VizConfig {
        output_dir: single_dir.clone(),
        plot_selection: PlotSelection::Histogram,
        ..VizConfig::default()
    };
    completed(visualize_csv_data(&path, &multi).unwrap());
    completed(visualize_csv_data(&path, &single).unwrap());

    let (multi_width, multi_height) =
        png_dimensions(&multi_dir.join("value_all_visualization.png"));
    let (single_width, single_height) =
        png_dimensions(&single_dir.join("value_hist_visualization.png"));
    assert_eq!(single_width * 3, multi_width);
    assert_eq!(single_height, multi_height);
}

#[test]
fn initialize_dir_wipes_stale_artifacts() {
    let file = write_csv("value\n1\n2\n");
    let dir = tempdir().unwrap();
    let output_dir = dir.path().join("plots");
    std::fs::create_dir_all(&output_dir).unwrap();
    let stale = output_dir.join("stale.png");
    std::fs::write(&stale, b"old").unwrap();

    let config = VizConfig {
        output_dir: output_dir.clone(),
        plot_selection: PlotSelection::Histogram,
        initialize_dir: true,
        ..VizConfig::default()
    };
    completed(visualize_csv_data(file.path().to_str().unwrap(), &config).unwrap());

    assert!(!stale.exists());
    assert!(output_dir.join("value_hist_visualization.png").is_file());
}
