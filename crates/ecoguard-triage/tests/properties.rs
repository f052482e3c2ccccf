//! Property tests for filtering, stats and dispatch tracking

use ecoguard_triage::{apply, apply_predicates, DispatchTracker, ReportFilter, TriageStats};
use ecoguard_types::{Category, Coordinates, Report, ReportId, ReportStatus, Score, Severity};
use proptest::prelude::*;

fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![Just(Category::Landfill), Just(Category::Deforestation)]
}

fn arb_status() -> impl Strategy<Value = ReportStatus> {
    prop_oneof![
        Just(ReportStatus::Safe),
        Just(ReportStatus::SuspiciousSite),
        Just(ReportStatus::IllegalDumping),
        Just(ReportStatus::Medium),
        Just(ReportStatus::Critical),
    ]
}

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High),
        Just(Severity::Critical),
    ]
}

fn arb_reports() -> impl Strategy<Value = Vec<Report>> {
    prop::collection::vec(
        (
            arb_category(),
            0.0f64..=1.0,
            arb_status(),
            prop::option::of((-90.0f64..=90.0, -180.0f64..=180.0)),
        ),
        0..30,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (category, score, status, at))| Report {
                id: ReportId::from(i as u64 + 1),
                category,
                score: Score::new(score).unwrap(),
                status,
                location: at.and_then(|(lat, lng)| Coordinates::new(lat, lng).ok()),
                timestamp: chrono::Utc::now(),
                image_path: None,
            })
            .collect()
    })
}

fn arb_filter() -> impl Strategy<Value = ReportFilter> {
    (
        prop::option::of(arb_category()),
        prop::option::of(arb_status()),
        prop::option::of(arb_severity()),
        "[0-9a-z.]{0,3}",
    )
        .prop_map(|(category, status, severity, search)| ReportFilter {
            category: category.into(),
            status: status.into(),
            severity: severity.into(),
            ..ReportFilter::any()
        }
        .with_search(&search))
}

#[derive(Debug, Clone)]
enum Op {
    Dispatch(u64),
    Evict(u64),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            (1u64..40).prop_map(Op::Dispatch),
            (1u64..40).prop_map(Op::Evict),
        ],
        0..60,
    )
}

proptest! {
    #[test]
    fn predicates_commute(reports in arb_reports(), filter in arb_filter(), seed in any::<u64>()) {
        let mut predicates = filter.predicates();
        let expected = apply(&reports, &filter);
        prop_assert_eq!(&apply_predicates(&reports, &predicates), &expected);

        predicates.reverse();
        prop_assert_eq!(&apply_predicates(&reports, &predicates), &expected);

        if !predicates.is_empty() {
            let len = predicates.len();
            predicates.rotate_left((seed as usize) % len);
        }
        prop_assert_eq!(&apply_predicates(&reports, &predicates), &expected);

        // narrowing one predicate at a time lands on the same set
        let mut narrowed = reports.clone();
        for predicate in &predicates {
            narrowed = apply_predicates(&narrowed, std::slice::from_ref(predicate));
        }
        prop_assert_eq!(narrowed, expected);
    }

    #[test]
    fn unconstrained_filter_is_identity(reports in arb_reports()) {
        prop_assert_eq!(apply(&reports, &ReportFilter::any()), reports);
    }

    #[test]
    fn filtering_preserves_order(reports in arb_reports(), filter in arb_filter()) {
        let positions: Vec<usize> = apply(&reports, &filter)
            .iter()
            .map(|r| reports.iter().position(|x| x.id == r.id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn filtering_is_idempotent(reports in arb_reports(), filter in arb_filter()) {
        let once = apply(&reports, &filter);
        prop_assert_eq!(apply(&once, &filter), once);
    }

    #[test]
    fn pending_never_negative(reports in arb_reports(), ops in arb_ops()) {
        let mut tracker = DispatchTracker::new();
        for op in ops {
            match op {
                Op::Dispatch(id) => { tracker.dispatch(&ReportId::from(id), None); }
                Op::Evict(id) => { tracker.evict(&ReportId::from(id)); }
            }
            let stats = TriageStats::compute(&reports, &tracker);
            prop_assert_eq!(stats.pending, stats.total.saturating_sub(tracker.len()));
            prop_assert!(stats.pending <= stats.total);
        }
    }

    #[test]
    fn dispatch_twice_equals_once(ops in arb_ops(), id in 1u64..40) {
        let mut tracker = DispatchTracker::new();
        for op in ops {
            if let Op::Dispatch(other) = op {
                tracker.dispatch(&ReportId::from(other), None);
            }
        }
        tracker.dispatch(&ReportId::from(id), Some("a"));
        let once = tracker.clone();
        tracker.dispatch(&ReportId::from(id), Some("b"));
        prop_assert_eq!(tracker, once);
    }
}
