/// End-to-end integration tests for the chunklens pipeline.
///
/// Tests the complete flow for both tools:
///   Corpus file → load → analyze / graph → JSON report
use std::fs;

use chunklens::config::{Config, Thresholds};
use chunklens::corpus::Corpus;
use chunklens::relations::RelationGraph;
use chunklens::sizes;
use tempfile::tempdir;

fn fixture_json() -> String {
    serde_json::json!({
        "chunks": [
            {
                "id": "aaa111",
                "file_path": "cmd/root.go",
                "start_line": 1,
                "end_line": 40,
                "content": "func Execute() {}",
                "language": "go",
                "symbols": ["Execute"],
                "related_chunks": ["bbb222", "ccc333"],
                "token_count": 10
            },
            {
                "id": "bbb222",
                "file_path": "internal/chunker/chunker.go",
                "start_line": 12,
                "end_line": 80,
                "content": "func Chunk() {}",
                "language": "go",
                "symbols": ["Chunk"],
                "related_chunks": ["ccc333"],
                "token_count": 100
            },
            {
                "id": "ccc333",
                "file_path": "web/app.tsx",
                "start_line": 1,
                "end_line": 120,
                "content": "export const App = () => null",
                "language": "typescript",
                "framework": "react",
                "symbols": ["App"],
                "token_count": 1000
            }
        ]
    })
    .to_string()
}

/// Full size-analyzer flow: write corpus → load → analyze → verify report
#[test]
fn test_size_analysis_pipeline() {
    // 1. Setup temp dir with a corpus file
    let temp_dir = tempdir().unwrap();
    let corpus_path = temp_dir.path().join("chunks.json");
    fs::write(&corpus_path, fixture_json()).unwrap();

    // 2. Load
    let corpus = Corpus::from_file(&corpus_path).unwrap();
    assert_eq!(corpus.len(), 3);

    // 3. Analyze with default thresholds
    let report = sizes::analyze(&corpus, &Thresholds::default());

    assert_eq!(report.statistics.count, corpus.len(), "count equals N");
    assert_eq!(report.statistics.min, 10);
    assert_eq!(report.statistics.max, 1000);
    assert_eq!(report.statistics.median, 100.0);
    assert_eq!(
        report.distribution.total(),
        corpus.len(),
        "every chunk falls into exactly one bucket"
    );

    // max (1000) > 5x median (100) must produce a recommendation
    assert!(
        !report.recommendations.is_empty(),
        "Expected at least one recommendation, got: {:?}",
        report.recommendations
    );

    // 4. Report serializes with the expected top-level keys
    let value = serde_json::to_value(&report).unwrap();
    for key in [
        "statistics",
        "percentiles",
        "distribution",
        "small_outliers",
        "large_outliers",
        "recommendations",
    ] {
        assert!(value.get(key).is_some(), "Report should contain {key}");
    }
    assert_eq!(value["distribution"]["101-200"], 0);
    assert_eq!(value["distribution"]["501-1000"], 1);
}

/// Full relation-explorer flow: summary, neighborhood, and error object
#[test]
fn test_relation_exploration_pipeline() {
    let temp_dir = tempdir().unwrap();
    let corpus_path = temp_dir.path().join("chunks.json");
    fs::write(&corpus_path, fixture_json()).unwrap();

    let corpus = Corpus::from_file(&corpus_path).unwrap();
    let graph = RelationGraph::build(&corpus);
    let config = Config::default();

    // 1. Corpus-wide summary
    let summary = graph.summary(config.top_connected);
    assert_eq!(summary.total_chunks, 3);
    assert_eq!(summary.chunks_with_relations, 2);
    assert_eq!(summary.max_relations, 2);
    assert_eq!(summary.connected_components, 1);
    assert_eq!(summary.most_connected[0].id, "aaa111");

    // 2. Neighborhood around the root chunk
    let report = graph.explore("aaa111", 2).expect("target exists");
    assert_eq!(report.neighborhood_size, 3);
    assert_eq!(report.depth, 2);

    // target_chunk reproduces the input record minus related_chunks
    let target = serde_json::to_value(&report.target_chunk).unwrap();
    let mut want = serde_json::to_value(corpus.get("aaa111").unwrap()).unwrap();
    want.as_object_mut().unwrap().remove("related_chunks");
    assert_eq!(target, want);

    // both neighbors are one hop away (direct edges)
    assert_eq!(report.connections.len(), 2);
    for conn in &report.connections {
        assert_eq!(conn.distance, 1);
        assert_eq!(conn.paths[0].from_file, "cmd/root.go");
    }

    // 3. Depth 0 returns only the target
    let report = graph.explore("ccc333", 0).expect("target exists");
    assert_eq!(report.neighborhood_size, 1);
    assert!(report.connections.is_empty());

    // 4. Unknown target yields no report; the binary emits the error object
    assert!(graph.explore("zzz999", 2).is_none());
}

/// JSON and JSONL corpora with the same chunks produce identical reports
#[test]
fn test_jsonl_parity() {
    let temp_dir = tempdir().unwrap();

    let json_path = temp_dir.path().join("chunks.json");
    fs::write(&json_path, fixture_json()).unwrap();

    // Re-emit the same chunks one object per line
    let parsed: serde_json::Value = serde_json::from_str(&fixture_json()).unwrap();
    let lines: Vec<String> = parsed["chunks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect();
    let jsonl_path = temp_dir.path().join("chunks.jsonl");
    fs::write(&jsonl_path, lines.join("\n")).unwrap();

    let from_json = Corpus::from_file(&json_path).unwrap();
    let from_jsonl = Corpus::from_file(&jsonl_path).unwrap();
    assert_eq!(from_json.chunks, from_jsonl.chunks);

    let a = sizes::analyze(&from_json, &Thresholds::default());
    let b = sizes::analyze(&from_jsonl, &Thresholds::default());
    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        serde_json::to_value(&b).unwrap()
    );
}

/// Empty corpus fails loading with a descriptive error
#[test]
fn test_empty_corpus_fails() {
    let temp_dir = tempdir().unwrap();
    let corpus_path = temp_dir.path().join("empty.json");
    fs::write(&corpus_path, r#"{"chunks": []}"#).unwrap();

    let err = Corpus::from_file(&corpus_path).unwrap_err();
    assert!(err.to_string().contains("contains no chunks"));
}
