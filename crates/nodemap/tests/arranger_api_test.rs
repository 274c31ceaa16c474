//! Integration tests for the Arranger API
//!
//! These tests drive whole graph documents through the public facade.

use nodemap::{
    Arranger, Graph, NodemapError,
    analytics::{AnalyticsRequest, PathAlgorithm},
    config::AppConfig,
    geometry::Point,
    layout::{LayoutKind, LayoutOverrides, UnknownLayout},
    snap::{SnapRequest, SnapTarget},
};

const DOCUMENT: &str = r#"{
    "nodes": {
        "a": {"x": 10, "y": 10, "label": "Alpha"},
        "b": {"x": 20, "y": 10, "label": "Beta"},
        "c": {"x": 30, "y": 10, "label": "Gamma", "shape": "rect", "width": 60, "height": 40},
        "d": {"x": 40, "y": 10, "label": "Delta"}
    },
    "edges": [
        {"id": "ab", "source": "a", "target": "b", "weight": 1},
        {"id": "bc", "source": "b", "target": "c", "weight": 1},
        {"id": "ac", "source": "a", "target": "c", "weight": 5},
        {"id": "dangling", "source": "d", "target": "nowhere"}
    ],
    "boxes": {
        "team": {
            "id": "team",
            "x": 0, "y": 0, "width": 300, "height": 200,
            "label": "Team",
            "nodeIds": ["c", "d"]
        },
        "ops": {
            "id": "ops",
            "x": 0, "y": 0, "width": 300, "height": 200,
            "label": "Ops",
            "nodeIds": []
        }
    },
    "view": {"scale": 1, "tx": 0, "ty": 0}
}"#;

fn load() -> Graph {
    Arranger::default()
        .parse_graph(DOCUMENT)
        .expect("Document should parse")
}

fn memberships(graph: &Graph) -> Vec<Vec<String>> {
    graph.boxes().map(|group| group.node_ids().to_vec()).collect()
}

#[test]
fn test_every_layout_preserves_membership_and_entities() {
    let arranger = Arranger::default();
    for kind in LayoutKind::ALL {
        let mut graph = load();
        let before = memberships(&graph);

        let applied = arranger
            .arrange(&mut graph, kind.as_str(), &LayoutOverrides::new())
            .expect("Known layout");

        assert_eq!(applied, kind);
        assert_eq!(memberships(&graph), before, "{kind} changed membership");
        assert_eq!(graph.nodes_count(), 4);
        assert_eq!(graph.edges().len(), 4);
        assert_eq!(graph.boxes_count(), 2);
        for node in graph.nodes() {
            assert!(node.position().x().is_finite(), "{kind} produced NaN");
            assert!(node.position().y().is_finite(), "{kind} produced NaN");
        }
    }
}

#[test]
fn test_unknown_layout_is_reported() {
    let arranger = Arranger::default();
    let mut graph = load();
    let before = graph.clone();

    let result = arranger.arrange(&mut graph, "radial", &LayoutOverrides::new());

    assert_eq!(result, Err(UnknownLayout("radial".to_string())));
    assert_eq!(graph, before);
}

#[test]
fn test_layout_round_trips_through_json() {
    let arranger = Arranger::default();
    let mut graph = load();
    arranger
        .arrange(&mut graph, "grid", &LayoutOverrides::new())
        .expect("Known layout");

    let json = graph.to_json_pretty().expect("Serializable");
    let reloaded = arranger.parse_graph(&json).expect("Round trip");

    assert_eq!(reloaded, graph);
    assert!(json.contains("\"nodeIds\""));
    assert!(json.contains("\"boxId\": \"team\""));
}

#[test]
fn test_default_layout_comes_from_config() {
    let config: AppConfig = toml::from_str("[layout]\ndefault_kind = \"hierarchical\"\n").unwrap();
    let arranger = Arranger::new(config);
    let mut graph = load();

    let kind = arranger.arrange_default(&mut graph, &LayoutOverrides::new());

    assert_eq!(kind, LayoutKind::Hierarchical);
}

#[test]
fn test_analytics_through_facade() {
    let arranger = Arranger::default();
    let graph = load();

    let report = arranger.analyze(
        &graph,
        &AnalyticsRequest::new()
            .with_path("a", "c")
            .with_algorithm(PathAlgorithm::Dijkstra),
    );

    let path = report.path().expect("Path exists");
    assert_eq!(path.nodes(), ["a", "b", "c"]);
    assert_eq!(path.edges(), ["ab", "bc"]);
    assert_eq!(path.cost(), Some(2.0));
    assert_eq!(report.stats().edge_count, 4);
    assert_eq!(report.stats().components, 2);
}

#[test]
fn test_snap_through_facade() {
    let arranger = Arranger::default();
    let graph = load();

    let result = arranger
        .snap(
            &graph,
            &SnapRequest::new(SnapTarget::Node("a".to_string()), Point::new(1003.0, 2017.0)),
        )
        .expect("Node exists");
    assert_eq!(result.position(), Point::new(1000.0, 2020.0));

    let missing = arranger.snap(
        &graph,
        &SnapRequest::new(SnapTarget::Node("zzz".to_string()), Point::new(0.0, 0.0)),
    );
    assert!(matches!(missing, Err(NodemapError::Graph(_))));
}

#[test]
fn test_invalid_document_keeps_source() {
    let result = Arranger::default().parse_graph("{\"nodes\": [}");
    match result {
        Err(NodemapError::Document { src, .. }) => assert_eq!(src, "{\"nodes\": [}"),
        other => panic!("Expected document error, got {other:?}"),
    }
}
