use std::fs;
use std::path::PathBuf;

use hoopgrade::stat_fetch::{RawStatBundle, parse_stats_response_json, parse_stats_table_json};
use hoopgrade::stat_normalize::clean_bundle;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn structured_parse_reads_headers_and_rows() {
    let raw = read_fixture("leaguedash_base.json");
    let table = parse_stats_response_json(&raw).expect("fixture should parse");
    assert_eq!(table.rows.len(), 3);
    assert!(table.headers.iter().any(|h| h == "PLAYER_ID"));
    assert!(table.headers.iter().any(|h| h == "FG3_PCT"));
}

#[test]
fn raw_parse_matches_structured_parse() {
    let raw = read_fixture("leaguedash_base.json");
    let structured = parse_stats_response_json(&raw).expect("structured parse");
    let generic = parse_stats_table_json(&raw).expect("generic parse");
    assert_eq!(structured.headers, generic.headers);
    assert_eq!(structured.rows.len(), generic.rows.len());
}

#[test]
fn filters_to_the_requested_player() {
    let raw = read_fixture("leaguedash_base.json");
    let table = parse_stats_table_json(&raw).expect("fixture should parse");

    let row = table
        .first_row_for_player(201939)
        .expect("curry row present");
    assert_eq!(row.text("PLAYER_NAME"), Some("Stephen Curry"));
    assert_eq!(row.num("FG3M"), 4.7);

    assert!(table.first_row_for_player(999_999).is_none());
}

#[test]
fn fixture_bundle_normalizes_without_derivation() {
    let raw_base = read_fixture("leaguedash_base.json");
    let raw_adv = read_fixture("leaguedash_advanced.json");
    let base = parse_stats_response_json(&raw_base).expect("base parse");
    let adv = parse_stats_response_json(&raw_adv).expect("advanced parse");

    let bundle = RawStatBundle {
        season: "2025-26".to_string(),
        base: base.first_row_for_player(1641705),
        advanced: adv.first_row_for_player(1641705),
        defense: None,
    };
    let stats = clean_bundle(&bundle);
    assert_eq!(stats.player_name, "Victor Wembanyama");
    assert_eq!(stats.true_shooting_pct, 0.598);
    assert_eq!(stats.block_pct, 7.9);
    assert!(!stats.insufficient_sample);
}

#[test]
fn base_only_bundle_derives_advanced_fields() {
    let raw_base = read_fixture("leaguedash_base.json");
    let base = parse_stats_response_json(&raw_base).expect("base parse");

    let bundle = RawStatBundle {
        season: "2025-26".to_string(),
        base: base.first_row_for_player(2544),
        advanced: None,
        defense: None,
    };
    let stats = clean_bundle(&bundle);
    let expected_ts = 24.9 / (2.0 * (18.1 + 0.44 * 5.3));
    assert!((stats.true_shooting_pct - expected_ts).abs() < 1e-9);
    assert!(stats.assist_pct > 0.0);
    assert!(stats.steal_pct > 0.0);
}

#[test]
fn malformed_payloads_are_faults() {
    assert!(parse_stats_table_json("").is_err());
    assert!(parse_stats_table_json("null").is_err());
    assert!(parse_stats_table_json("{\"resultSets\": []}").is_err());
    assert!(parse_stats_table_json("<html>rate limited</html>").is_err());

    assert!(parse_stats_response_json("null").is_err());
    assert!(parse_stats_response_json("{}").is_err());
}
