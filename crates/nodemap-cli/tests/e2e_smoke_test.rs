use std::{fs, path::Path};

use tempfile::tempdir;

use nodemap::Graph;
use nodemap_cli::{AlgorithmArg, Args, Command};

const GRAPH: &str = r#"{
    "nodes": {
        "a": {"x": 0, "y": 0, "label": "A"},
        "b": {"x": 0, "y": 0, "label": "B"},
        "c": {"x": 0, "y": 0, "label": "C"},
        "m": {"x": 50, "y": 60, "label": "Member"}
    },
    "edges": [
        {"id": "ab", "source": "a", "target": "b"},
        {"id": "bc", "source": "b", "target": "c"}
    ],
    "boxes": {
        "team": {
            "id": "team",
            "x": 0, "y": 0, "width": 200, "height": 150,
            "label": "Team",
            "nodeIds": ["m"]
        }
    }
}"#;

fn write_input(dir: &Path) -> String {
    let path = dir.join("graph.json");
    fs::write(&path, GRAPH).expect("Failed to write input graph");
    path.to_string_lossy().to_string()
}

fn args(command: Command) -> Args {
    Args {
        config: None,
        log_level: "off".to_string(),
        command,
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path).expect("Output should exist");
    serde_json::from_str(&text).expect("Output should be JSON")
}

#[test]
fn e2e_every_layout_writes_a_graph() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = write_input(temp_dir.path());

    for kind in ["grid", "circle", "hierarchical", "force", "weightedTree"] {
        let output = temp_dir.path().join(format!("{kind}.json"));
        let command = Command::Layout {
            input: input.clone(),
            kind: Some(kind.to_string()),
            output: output.to_string_lossy().to_string(),
            overrides: vec![("iterations".to_string(), 20.0)],
        };

        nodemap_cli::run(&args(command)).unwrap_or_else(|err| panic!("{kind} failed: {err}"));

        let text = fs::read_to_string(&output).expect("Output should exist");
        let graph = Graph::from_json(&text).expect("Output should be a graph");
        assert_eq!(graph.nodes_count(), 4, "{kind}");
        let team = graph.boxes().next().expect("Box survives");
        assert_eq!(team.node_ids(), ["m".to_string()], "{kind}");
    }
}

#[test]
fn e2e_unknown_layout_writes_input_unchanged() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = write_input(temp_dir.path());
    let output = temp_dir.path().join("out.json");

    let command = Command::Layout {
        input: input.clone(),
        kind: Some("spiral".to_string()),
        output: output.to_string_lossy().to_string(),
        overrides: Vec::new(),
    };
    nodemap_cli::run(&args(command)).expect("Unknown layout is not fatal");

    let original = Graph::from_json(GRAPH).unwrap();
    let written = Graph::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, original);
}

#[test]
fn e2e_analyze_reports_path() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = write_input(temp_dir.path());
    let output = temp_dir.path().join("report.json");

    let command = Command::Analyze {
        input,
        from: Some("a".to_string()),
        to: Some("c".to_string()),
        algorithm: Some(AlgorithmArg::Bfs),
        output: Some(output.to_string_lossy().to_string()),
    };
    nodemap_cli::run(&args(command)).expect("Analyze should succeed");

    let report = read_json(&output);
    assert_eq!(report["path"]["nodes"], serde_json::json!(["a", "b", "c"]));
    assert_eq!(report["stats"]["nodeCount"], 4);
    assert!(report["pathError"].is_null());
}

#[test]
fn e2e_snap_rounds_to_grid() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = write_input(temp_dir.path());
    let output = temp_dir.path().join("snap.json");

    let command = Command::Snap {
        input,
        target: "a".to_string(),
        is_box: false,
        x: 1003.0,
        y: 2017.0,
        output: Some(output.to_string_lossy().to_string()),
    };
    nodemap_cli::run(&args(command)).expect("Snap should succeed");

    let result = read_json(&output);
    assert_eq!(result["x"], 1000.0);
    assert_eq!(result["y"], 2020.0);
    assert_eq!(result["snappedX"], true);
}

#[test]
fn e2e_invalid_document_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("broken.json");
    fs::write(&input, "{\"nodes\": [}").unwrap();

    let command = Command::Layout {
        input: input.to_string_lossy().to_string(),
        kind: Some("grid".to_string()),
        output: temp_dir.path().join("out.json").to_string_lossy().to_string(),
        overrides: Vec::new(),
    };

    let err = nodemap_cli::run(&args(command)).unwrap_err();
    assert!(matches!(err, nodemap::NodemapError::Document { .. }));
}
