//! End-to-end checks of the relevance filter against the built-in tables

use std::ptr;

use toolsift_core::{FilterError, Tool, ToolRelevanceFilter};

const QUERIES: &[&str] = &[
    "",
    "list all devices",
    "create a firewall policy for the branch adom",
    "show ipsec tunnel status",
    "install policy package to FGT-01",
    "show me something unrelated to anything",
    "   ",
    "DEVICE device device",
];

fn filter() -> ToolRelevanceFilter {
    ToolRelevanceFilter::builtin().unwrap()
}

fn catalog() -> Vec<Tool> {
    vec![
        Tool::new("list_devices", "List managed FortiGate devices in an ADOM"),
        Tool::new("create_policy", "Create a firewall policy in a policy package"),
        Tool::new("list_policy_packages", "List policy packages"),
        Tool::new("get_device_status", "Get connectivity status for a device"),
        Tool::new("create_vpn_tunnel", "Create an IPsec VPN tunnel"),
        Tool::new("install_package", "Install a policy package to devices"),
        Tool::new("list_adoms", "List administrative domains"),
        Tool::new("delete_address", "Delete a firewall address object"),
        Tool::new("frobnicate", ""),
        Tool::new("list_devices", "Duplicate entry of list_devices"),
    ]
}

fn names(tools: &[&Tool]) -> Vec<String> {
    tools.iter().map(|t| t.name.clone()).collect()
}

fn index_of(catalog: &[Tool], tool: &Tool) -> usize {
    catalog
        .iter()
        .position(|t| ptr::eq(t, tool))
        .expect("output tool must come from the catalog")
}

#[test]
fn output_is_bounded() {
    let filter = filter();
    let catalog = catalog();

    for query in QUERIES {
        for k in [0, 1, 2, 5, 10, 50, 128] {
            let out = filter.filter(query, &catalog, k).unwrap();
            assert!(out.len() <= k.min(catalog.len()), "query {:?} k {}", query, k);
        }
    }
}

#[test]
fn output_is_a_subset_of_the_catalog() {
    let filter = filter();
    let catalog = catalog();

    for query in QUERIES {
        for tool in filter.filter(query, &catalog, 100).unwrap() {
            index_of(&catalog, tool);
        }
    }
}

#[test]
fn output_is_deterministic() {
    let filter = filter();
    let catalog = catalog();

    for query in QUERIES {
        let first = filter.filter(query, &catalog, 5).unwrap();
        let second = filter.filter(query, &catalog, 5).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert!(ptr::eq(*a, *b));
        }
    }
}

#[test]
fn output_is_sorted_by_score_then_catalog_order() {
    let filter = filter();
    let catalog = catalog();

    for query in QUERIES {
        let ranked = filter.rank(query, &catalog);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                assert!(index_of(&catalog, pair[0].tool) < index_of(&catalog, pair[1].tool));
            }
        }

        // filter output is the head of the ranking whenever something scored
        if !ranked.is_empty() {
            let out = filter.filter(query, &catalog, 3).unwrap();
            for (selected, scored) in out.iter().zip(ranked.iter()) {
                assert!(ptr::eq(*selected, scored.tool));
            }
        }
    }
}

#[test]
fn keyword_match_is_included() {
    let filter = filter();
    let catalog = vec![Tool::new("create_address", ""), Tool::new("frobnicate_widget", "")];

    let out = filter.filter("widget", &catalog, 1).unwrap();
    assert_eq!(names(&out), ["frobnicate_widget"]);
}

#[test]
fn fallback_is_non_empty_when_a_read_tool_exists() {
    let filter = filter();
    let catalog = vec![Tool::new("create_address", ""), Tool::new("get_zebra", "")];

    let out = filter.filter("qqq zzz", &catalog, 10).unwrap();
    assert_eq!(names(&out), ["get_zebra"]);
}

#[test]
fn empty_catalog_is_safe() {
    let filter = filter();
    let empty: Vec<Tool> = Vec::new();

    for query in QUERIES {
        for k in [0, 1, 100] {
            assert!(filter.filter(query, &empty, k).unwrap().is_empty());
        }
    }
}

#[test]
fn scenario_list_all_devices() {
    let catalog = vec![
        Tool::new("list_devices", ""),
        Tool::new("create_policy", ""),
        Tool::new("list_policy_packages", ""),
    ];

    let out = filter().filter("list all devices", &catalog, 2).unwrap();
    assert_eq!(names(&out), ["list_devices", "list_policy_packages"]);
}

#[test]
fn scenario_nothing_scores_and_nothing_to_fall_back_to() {
    let catalog = vec![Tool::new("create_address", ""), Tool::new("create_vpn", "")];

    let out = filter()
        .filter("show me something unrelated to anything", &catalog, 10)
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn scenario_empty_query_falls_back() {
    let catalog = vec![Tool::new("list_devices", ""), Tool::new("get_device_status", "")];

    let out = filter().filter("", &catalog, 10).unwrap();
    assert_eq!(names(&out), ["list_devices", "get_device_status"]);
}

#[test]
fn scenario_zero_results() {
    let filter = filter();
    let catalog = catalog();

    for query in QUERIES {
        assert!(filter.filter(query, &catalog, 0).unwrap().is_empty());
    }
}

#[test]
fn scenario_duplicate_names_are_independent() {
    let catalog = vec![Tool::new("list_devices", ""), Tool::new("list_devices", "")];

    let out = filter().filter("list devices", &catalog, 10).unwrap();
    assert_eq!(out.len(), 2);
    assert!(ptr::eq(out[0], &catalog[0]));
    assert!(ptr::eq(out[1], &catalog[1]));
}

#[test]
fn limit_above_ceiling_is_rejected() {
    let err = filter().filter("devices", &catalog(), 129).unwrap_err();
    assert_eq!(err, FilterError::LimitExceeded { requested: 129, ceiling: 128 });
}

#[test]
fn filter_is_shareable_across_threads() {
    let filter = std::sync::Arc::new(filter());
    let catalog = std::sync::Arc::new(catalog());

    let handles: Vec<_> = QUERIES
        .iter()
        .map(|query| {
            let filter = filter.clone();
            let catalog = catalog.clone();
            let query = query.to_string();
            std::thread::spawn(move || names(&filter.filter(&query, catalog.as_slice(), 5).unwrap()))
        })
        .collect();

    for (handle, query) in handles.into_iter().zip(QUERIES) {
        let expected = names(&filter.filter(query, catalog.as_slice(), 5).unwrap());
        assert_eq!(handle.join().unwrap(), expected);
    }
}
