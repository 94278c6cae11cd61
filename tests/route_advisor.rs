//! Integration tests for the route advisor

use std::collections::{BTreeSet, HashSet};

use civicroute::advisor::{MAX_DISTANCE_KM, find_nearest_with_distance};
use civicroute::{Coordinate, IssueLocation, Priority, Status, classify_region, find_nearest, haversine_km, plan_route};
use civicroute::region::default_regions;
use rstest::{fixture, rstest};

fn coord(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new(latitude, longitude).expect("valid test coordinate")
}

fn issue(id: &str, lat: f64, lng: f64, priority: Priority, status: Status) -> IssueLocation {
    IssueLocation::new(id, coord(lat, lng), priority, status)
}

#[fixture]
fn start() -> Coordinate {
    coord(13.0, 80.0)
}

/// A (High), B (Low, far away), C (Emergency)
#[fixture]
fn field_issues() -> Vec<IssueLocation> {
    vec![
        issue("A", 13.01, 80.0, Priority::High, Status::Submitted),
        issue("B", 13.5, 80.5, Priority::Low, Status::Submitted),
        issue("C", 13.02, 80.01, Priority::Emergency, Status::Submitted),
    ]
}

#[rstest]
fn test_unfiltered_route_visits_a_then_c_then_b(start: Coordinate, field_issues: Vec<IssueLocation>) {
    let plan = plan_route(&start, &field_issues, None);

    assert_eq!(plan.issue_ids(), vec!["A", "C", "B"]);
    assert!((plan.steps[0].leg_distance_km - 1.11).abs() < 0.01);

    let total: f64 = plan.steps.iter().map(|s| s.leg_distance_km).sum();
    assert_eq!(plan.total_distance_km, total);
}

#[rstest]
fn test_emergency_and_high_filter_drops_b(start: Coordinate, field_issues: Vec<IssueLocation>) {
    let filter: HashSet<Priority> = [Priority::Emergency, Priority::High].into_iter().collect();
    let plan = plan_route(&start, &field_issues, Some(&filter));

    assert_eq!(plan.issue_ids(), vec!["A", "C"]);

    let a = field_issues[0].coordinate;
    let c = field_issues[2].coordinate;
    let expected = haversine_km(&start, &a) + haversine_km(&a, &c);
    assert!((plan.total_distance_km - expected).abs() < 1e-12);
}

#[rstest]
fn test_route_visits_every_eligible_issue_once(start: Coordinate) {
    let statuses = [Status::Submitted, Status::Acknowledged, Status::InProgress, Status::Resolved];
    let issues: Vec<IssueLocation> = (0..24_u32)
        .map(|n| {
            let lat = 12.5 + f64::from(n % 5) * 0.13 + f64::from(n) * 0.001;
            let lng = 79.6 + f64::from(n % 7) * 0.11;
            issue(
                &format!("ISS{n:03}"),
                lat,
                lng,
                Priority::ALL[n as usize % 4],
                statuses[n as usize % 4],
            )
        })
        .collect();

    let filter: HashSet<Priority> = [Priority::Medium, Priority::Emergency].into_iter().collect();
    for priority_filter in [None, Some(&filter)] {
        let plan = plan_route(&start, &issues, priority_filter);

        let eligible: BTreeSet<&str> = issues
            .iter()
            .filter(|i| i.status != Status::Resolved)
            .filter(|i| priority_filter.is_none_or(|f| f.contains(&i.priority)))
            .map(|i| i.id.as_str())
            .collect();
        let visited: BTreeSet<&str> = plan.issue_ids().into_iter().collect();

        assert_eq!(plan.len(), eligible.len());
        assert_eq!(visited, eligible);
        assert!(plan.steps.iter().all(|s| s.leg_distance_km >= 0.0));
    }
}

#[rstest]
fn test_route_over_resolved_only_is_empty(start: Coordinate) {
    let issues = vec![
        issue("R1", 13.01, 80.0, Priority::High, Status::Resolved),
        issue("R2", 13.02, 80.0, Priority::Emergency, Status::Resolved),
    ];
    let plan = plan_route(&start, &issues, None);
    assert!(plan.is_empty());
    assert_eq!(plan.total_distance_km, 0.0);
}

#[rstest]
fn test_nearest_never_returns_resolved(start: Coordinate) {
    let issues = vec![
        issue("closest-but-done", 13.0001, 80.0, Priority::High, Status::Resolved),
        issue("open", 13.3, 80.3, Priority::Low, Status::Acknowledged),
    ];
    let nearest = find_nearest(&start, &issues).expect("one open issue");
    assert_eq!(nearest.id, "open");
    assert_ne!(nearest.status, Status::Resolved);
}

#[rstest]
fn test_nearest_with_equal_distances_takes_first(start: Coordinate) {
    // Exactly representable offsets so north and south are bitwise equal distances
    let issues = vec![
        issue("north", 13.0625, 80.0, Priority::Low, Status::Submitted),
        issue("south", 12.9375, 80.0, Priority::Low, Status::Submitted),
        issue("north-again", 13.0625, 80.0, Priority::Low, Status::Submitted),
    ];
    let (first, distance) = find_nearest_with_distance(&start, &issues).unwrap();
    assert_eq!(first.id, "north");
    assert!(distance > 6.0 && distance < 8.0);
}

#[rstest]
#[case(coord(0.0, 0.0), coord(0.0, 0.0))]
#[case(coord(13.0827, 80.2707), coord(28.6139, 77.2090))]
#[case(coord(-33.8688, 151.2093), coord(51.5074, -0.1278))]
#[case(coord(90.0, 0.0), coord(-90.0, 45.0))]
#[case(coord(0.0, -180.0), coord(0.0, 180.0))]
fn test_distance_properties(#[case] a: Coordinate, #[case] b: Coordinate) {
    let ab = haversine_km(&a, &b);
    assert_eq!(ab, haversine_km(&b, &a));
    assert!((0.0..=MAX_DISTANCE_KM).contains(&ab));
    assert_eq!(haversine_km(&a, &a), 0.0);
}

#[rstest]
#[case(coord(13.0827, 80.2707), coord(28.6139, 77.2090))]
#[case(coord(46.8182, 8.2275), coord(45.0, 6.0))]
#[case(coord(13.0, 80.0), coord(13.01, 80.0))]
fn test_distance_agrees_with_haversine_crate(#[case] a: Coordinate, #[case] b: Coordinate) {
    let reference = haversine::distance(
        haversine::Location {
            latitude: a.latitude,
            longitude: a.longitude,
        },
        haversine::Location {
            latitude: b.latitude,
            longitude: b.longitude,
        },
        haversine::Units::Kilometers,
    );
    let ours = haversine_km(&a, &b);
    assert!((ours - reference).abs() < 1e-9 * reference.max(1.0), "{ours} vs {reference}");
}

#[test]
fn test_classify_region_returns_pool_member() {
    let regions = default_regions();
    let address = classify_region(&coord(12.5, 79.5), &regions).expect("inside district box");
    assert!(regions[0].addresses.contains(&address));
}
