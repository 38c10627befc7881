//! Versions tab end-to-end tests

mod helper;

use std::collections::HashSet;

use serde_json::json;

use doc_versions::config::VersionsConfig;
use doc_versions::version::details::{build_versions_details, fetch_versions_details};
use doc_versions::version::error::VersionsError;
use doc_versions::version::format::format_version;
use doc_versions::version::repository::JsonVersionRepository;
use doc_versions::version::semver::classify;
use doc_versions::version::types::{RawVersion, VersionQuery, VersionsDetails};
use doc_versions::version::vulns::{AffectedRange, VulnEntry};
use helper::{FailingVulnLookup, RecordingVulnLookup, TestUrlBuilder, record};

const MODULE: &str = "test.com/module";

fn build(query: &VersionQuery, records: Vec<RawVersion>) -> VersionsDetails {
    build_versions_details(
        query,
        records,
        &TestUrlBuilder,
        &RecordingVulnLookup::default(),
        &VersionsConfig::default(),
    )
    .unwrap()
}

fn entry_versions(details: &VersionsDetails) -> Vec<Vec<&str>> {
    details
        .this_module
        .iter()
        .map(|list| list.entries.iter().map(|e| e.version.as_str()).collect())
        .collect()
}

#[test]
fn releases_of_one_major_form_a_single_list() {
    let query = VersionQuery::new(MODULE, MODULE);
    let records = vec![
        record(MODULE, "v1.2.1", MODULE),
        record(MODULE, "v1.3.0", MODULE),
        record(MODULE, "v1.2.3", MODULE),
    ];

    let details = build(&query, records);

    assert_eq!(details.this_module.len(), 1);
    let key = &details.this_module[0].key;
    assert_eq!(key.module_path, MODULE);
    assert_eq!(key.major.to_string(), "v1");
    assert!(!key.incompatible);
    assert_eq!(
        entry_versions(&details),
        vec![vec!["v1.3.0", "v1.2.3", "v1.2.1"]]
    );
}

#[test]
fn incompatible_versions_are_listed_separately() {
    let query = VersionQuery::new(MODULE, MODULE);
    let records = vec![
        record(MODULE, "v2.1.0+incompatible", MODULE),
        record(MODULE, "v1.0.0", MODULE),
    ];

    let details = build(&query, records);

    assert_eq!(details.incompatible_modules.len(), 1);
    let list = &details.incompatible_modules[0];
    assert_eq!(list.key.module_path, MODULE);
    assert_eq!(list.key.major.to_string(), "v2");
    assert!(list.key.incompatible);
    assert_eq!(list.entries[0].version, "v2.1.0+incompatible");
    assert!(
        details
            .this_module
            .iter()
            .flat_map(|list| &list.entries)
            .all(|e| e.version != "v2.1.0+incompatible")
    );
}

#[test]
fn pseudo_and_prerelease_versions_are_formatted_for_display() {
    let limit = VersionsConfig::default().prerelease_display_limit;
    let pseudo = classify("v1.0.0-20190311183353-d8887717615a").unwrap();
    let prerelease = classify("v1.2.3-alpha.1").unwrap();

    assert_eq!(format_version(&pseudo, limit), "v1.0.0-...-d888771");
    assert_eq!(format_version(&prerelease, limit), "v1.2.3-alpha.1");
}

#[test]
fn other_modules_are_deduplicated_and_sorted() {
    let unit = "test.com/module/pkg";
    let query = VersionQuery::new(MODULE, unit);
    let records = vec![
        record(MODULE, "v1.0.0", unit),
        record("zeta.com/fork", "v1.0.0", unit),
        record("alpha.com/vendor", "v0.3.0", unit),
        record("zeta.com/fork", "v1.1.0", unit),
        record("test.com/module/v2", "v2.0.0", unit),
    ];

    let details = build(&query, records);

    assert_eq!(
        details.other_modules,
        vec!["alpha.com/vendor", "test.com/module/v2", "zeta.com/fork"]
    );
    assert_eq!(entry_versions(&details), vec![vec!["v1.0.0"]]);
}

#[test]
fn empty_input_produces_empty_details() {
    let query = VersionQuery::new(MODULE, MODULE);

    let details = build(&query, vec![]);

    assert_eq!(details, VersionsDetails::default());
}

#[test]
fn every_well_formed_record_appears_exactly_once() {
    let unit = "test.com/module/pkg";
    let query = VersionQuery::new(MODULE, unit);
    let versions = [
        "v0.1.0",
        "v0.2.0-rc.1",
        "v1.0.0",
        "v1.0.1-0.20200101000000-0123456789ab",
        "v1.1.0",
        "v3.0.0+incompatible",
        "v3.1.0-beta+incompatible",
    ];
    let mut records: Vec<_> = versions.iter().map(|v| record(MODULE, v, unit)).collect();
    records.push(record(MODULE, "not-semver", unit));
    records.push(record("fork.com/module", "v1.0.0", unit));

    let details = build(&query, records);

    let rendered: Vec<&str> = details
        .this_module
        .iter()
        .chain(&details.incompatible_modules)
        .flat_map(|list| &list.entries)
        .map(|e| e.version.as_str())
        .collect();
    let unique: HashSet<&str> = rendered.iter().copied().collect();
    let expected: HashSet<&str> = versions.iter().copied().collect();
    assert_eq!(rendered.len(), versions.len());
    assert_eq!(unique, expected);
    assert_eq!(details.other_modules, vec!["fork.com/module"]);
}

#[test]
fn entries_are_strictly_decreasing_within_each_list() {
    let query = VersionQuery::new(MODULE, MODULE);
    let records = [
        "v1.0.0",
        "v1.10.0",
        "v1.2.0",
        "v1.2.0-rc.2",
        "v1.2.0-rc.10",
        "v1.2.1-0.20210101000000-aaaaaaaaaaaa",
        "v1.2.1-0.20210102000000-bbbbbbbbbbbb",
        "v0.9.0",
        "v0.0.0-20180101000000-cccccccccccc",
    ]
    .iter()
    .map(|v| record(MODULE, v, MODULE))
    .collect();

    let details = build(&query, records);

    for list in &details.this_module {
        let parsed: Vec<_> = list
            .entries
            .iter()
            .map(|e| classify(&e.version).unwrap())
            .collect();
        assert!(parsed.windows(2).all(|pair| pair[0] > pair[1]));
    }
    assert_eq!(
        entry_versions(&details),
        vec![
            vec![
                "v1.10.0",
                "v1.2.1-0.20210102000000-bbbbbbbbbbbb",
                "v1.2.1-0.20210101000000-aaaaaaaaaaaa",
                "v1.2.0",
                "v1.2.0-rc.10",
                "v1.2.0-rc.2",
                "v1.0.0",
            ],
            vec!["v0.9.0", "v0.0.0-20180101000000-cccccccccccc"],
        ]
    );
}

#[test]
fn building_twice_yields_equal_details() {
    let query = VersionQuery::new(MODULE, MODULE);
    let records = vec![
        record(MODULE, "v1.0.0", MODULE),
        record(MODULE, "v2.0.0+incompatible", MODULE),
        record(MODULE, "v0.0.0-20190311183353-d8887717615a", MODULE),
    ];

    let first = build(&query, records.clone());
    let second = build(&query, records);

    assert_eq!(first, second);
}

#[test]
fn vulnerabilities_are_looked_up_once_and_matched_per_version() {
    let query = VersionQuery::new(MODULE, MODULE);
    let vulns = RecordingVulnLookup::default().with_entries(
        MODULE,
        vec![VulnEntry {
            id: "GO-2021-0100".to_string(),
            summary: "denial of service".to_string(),
            affected: vec![AffectedRange {
                introduced: Some("0".to_string()),
                fixed: Some("1.1.0".to_string()),
            }],
        }],
    );
    let records = vec![
        record(MODULE, "v1.1.0", MODULE),
        record(MODULE, "v1.0.0", MODULE),
        record(MODULE, "v2.0.0+incompatible", MODULE),
    ];

    let details = build_versions_details(
        &query,
        records,
        &TestUrlBuilder,
        &vulns,
        &VersionsConfig::default(),
    )
    .unwrap();

    assert_eq!(vulns.calls(), vec![MODULE.to_string()]);
    let ids: Vec<Vec<&str>> = details.this_module[0]
        .entries
        .iter()
        .map(|e| e.vulnerabilities.iter().map(|v| v.id.as_str()).collect())
        .collect();
    assert_eq!(ids, vec![vec![], vec!["GO-2021-0100"]]);
}

#[test]
fn vulnerability_lookup_failure_aborts_the_build() {
    let query = VersionQuery::new(MODULE, MODULE);

    let result = build_versions_details(
        &query,
        vec![record(MODULE, "v1.0.0", MODULE)],
        &TestUrlBuilder,
        &FailingVulnLookup,
        &VersionsConfig::default(),
    );

    assert!(matches!(result, Err(VersionsError::Vulns { .. })));
}

#[test]
fn stdlib_versions_use_go_labels_and_development_group_first() {
    let query = VersionQuery::new("std", "net/http");
    let records = vec![
        record("std", "v1.20.0", "net/http"),
        record("std", "v1.21.0", "net/http"),
        record("std", "v0.0.0-20230801000000-abcdefabcdef", "net/http"),
    ];

    let details = build(&query, records);

    let majors: Vec<String> = details
        .this_module
        .iter()
        .map(|list| list.key.major.to_string())
        .collect();
    assert_eq!(majors, vec!["master", "go1"]);
    assert_eq!(entry_versions(&details)[1], vec!["go1.21.0", "go1.20"]);
}

#[test]
fn details_serialize_with_stable_field_names() {
    let query = VersionQuery::new(MODULE, MODULE);
    let mut retracted = record(MODULE, "v1.0.1", MODULE);
    retracted.retraction = Some("bad release".to_string());
    let records = vec![record(MODULE, "v1.0.0", MODULE), retracted];

    let details = build(&query, records);

    assert_eq!(
        serde_json::to_value(&details).unwrap(),
        json!({
            "thisModule": [{
                "key": {"modulePath": MODULE, "major": "v1", "incompatible": false},
                "deprecation": null,
                "entries": [
                    {
                        "version": "v1.0.1",
                        "displayText": "v1.0.1",
                        "link": "/test.com/module@v1.0.1",
                        "commitTimeText": "Jan 30, 2019",
                        "isMinor": false,
                        "retracted": true,
                        "retractionRationale": "bad release",
                        "vulnerabilities": []
                    },
                    {
                        "version": "v1.0.0",
                        "displayText": "v1.0.0",
                        "link": "/test.com/module@v1.0.0",
                        "commitTimeText": "Jan 30, 2019",
                        "isMinor": true,
                        "retracted": false,
                        "retractionRationale": null,
                        "vulnerabilities": []
                    }
                ]
            }],
            "incompatibleModules": [],
            "otherModules": []
        })
    );
}

#[test]
fn fetch_reads_records_through_repository() {
    let unit = "test.com/module/pkg";
    let repo = JsonVersionRepository::new(vec![
        record(MODULE, "v1.0.0", unit),
        record(MODULE, "v1.1.0", "test.com/module/other"),
    ]);
    let query = VersionQuery::new(MODULE, unit);

    let details = fetch_versions_details(
        &repo,
        &query,
        &TestUrlBuilder,
        &RecordingVulnLookup::default(),
        &VersionsConfig::default(),
    )
    .unwrap();

    assert_eq!(entry_versions(&details), vec![vec!["v1.0.0"]]);
}
