// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests for the invariants spec.md §8 calls out directly,
//! following the teacher's `job_tests.rs` `proptest!` convention rather
//! than hand-enumerated example cases.

use proptest::prelude::*;

use crate::bulk::{BulkItemError, BulkOpId, BulkProgress};
use crate::escalation::Severity;
use crate::time::{add_hours, hours_between};
use crate::transition::StageTransition;
use crate::{ApplicationId, StageId, TransitionId};

proptest! {
    /// §3 invariant 2 / §8: `sla_deadline` always equals
    /// `entered_at + stage.sla_hours`, recomputed from the same two
    /// inputs a caller would have on hand.
    #[test]
    fn sla_deadline_matches_entered_at_plus_sla_hours(entered_at in 0u64..1_000_000_000_000, sla_hours in 0u32..10_000) {
        let deadline = add_hours(entered_at, sla_hours);
        let t = StageTransition::open(
            TransitionId::new(),
            ApplicationId::new(),
            StageId::new(),
            entered_at,
            deadline,
            None,
        );
        prop_assert_eq!(t.sla_deadline, entered_at + u64::from(sla_hours) * 3_600_000);
    }

    /// `hours_between`/`add_hours` round-trip for any non-negative offset:
    /// the overdue-hours math the monitor and escalation service both
    /// depend on must agree with the deadline math the engine writes.
    #[test]
    fn hours_between_inverts_add_hours(base in 0u64..1_000_000_000_000, hours in 0u32..10_000) {
        let advanced = add_hours(base, hours);
        prop_assert_eq!(hours_between(base, advanced), f64::from(hours));
    }

    /// §4.3: severity classification is a total, monotonic function of
    /// overdue hours — every value lands in exactly one band, and a
    /// larger overdue duration never yields a *less* severe band.
    #[test]
    fn severity_classification_is_monotonic(
        overdue_a in 0.0f64..500.0,
        overdue_b in 0.0f64..500.0,
        warning_cap in 1u32..200,
        critical_cap in 1u32..400,
    ) {
        let critical_cap = critical_cap.max(warning_cap + 1);
        let (lo, hi) = if overdue_a <= overdue_b { (overdue_a, overdue_b) } else { (overdue_b, overdue_a) };
        let sev_lo = Severity::classify(lo, warning_cap, critical_cap);
        let sev_hi = Severity::classify(hi, warning_cap, critical_cap);
        let rank = |s: Severity| match s {
            Severity::Warning => 0,
            Severity::Critical => 1,
            Severity::Overdue => 2,
        };
        prop_assert!(rank(sev_lo) <= rank(sev_hi));
    }

    /// §8: bulk progress keeps `processed = successful + failed` and
    /// `processed <= total` after any sequence of item outcomes, and
    /// `progress_percentage` never leaves `[0, 100]`.
    #[test]
    fn bulk_progress_invariants_hold_after_any_outcome_sequence(outcomes in prop::collection::vec(any::<bool>(), 0..50)) {
        let total = outcomes.len();
        let mut progress = BulkProgress::new(BulkOpId::new(), total, 0);

        for ok in outcomes {
            if ok {
                progress.successful += 1;
            } else {
                progress.failed += 1;
                progress.errors.push(BulkItemError::new(ApplicationId::new(), "failed"));
            }
            progress.processed += 1;

            prop_assert_eq!(progress.processed, progress.successful + progress.failed);
            prop_assert!(progress.processed <= progress.total);
            let pct = progress.progress_percentage();
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }
}
