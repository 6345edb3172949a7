//! Scenario: price drift uses a strict > 0.05 band, quantity drift is exact.

use mor_reconcile::{assess, ListedState, ReconcileNotice, ReconcileReport, StoredState};

#[test]
fn tolerance_band_boundaries() {
    // (stored, listed, expect_flag)
    let cases: &[(f64, f64, bool)] = &[
        (0.03, 0.03, false),
        (0.03, 0.08, false),
        (10.00, 10.04, false),
        (10.00, 10.05, false),
        (10.00, 10.06, true),
        (10.00, 9.94, true),
        (99.90, 1234.56, true),
    ];

    for &(s, l, expect) in cases {
        let a = assess(
            &StoredState {
                quantity: 1,
                price: s,
            },
            &ListedState {
                quantity: 1,
                price: l,
            },
        );
        assert_eq!(a.price_dirty, expect, "stored={s} listed={l}");
        assert!(!a.quantity_dirty);
    }
}

#[test]
fn report_counts_notices_by_kind() {
    let report = ReconcileReport {
        notices: vec![
            ReconcileNotice::UnknownListing {
                listing_id: "X1".into(),
                code: "A".into(),
            },
            ReconcileNotice::OutOfStockControlDisabled {
                listing_id: "X1".into(),
                code: "A".into(),
            },
            ReconcileNotice::OutOfStockControlDisabled {
                listing_id: "X2".into(),
                code: "B".into(),
            },
        ],
        ..Default::default()
    };

    assert_eq!(report.unknown_listings(), 1);
    assert_eq!(report.out_of_stock_control_disabled(), 2);
}

#[test]
fn notices_serialize_with_kind_tag() {
    let n = ReconcileNotice::UnknownListing {
        listing_id: "X1".into(),
        code: "ABC0000001".into(),
    };
    let v = serde_json::to_value(&n).unwrap();
    assert_eq!(v["kind"], "unknown_listing");
    assert_eq!(v["listing_id"], "X1");
    assert_eq!(v["code"], "ABC0000001");
}
