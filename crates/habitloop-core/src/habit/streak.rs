//! Streak computation over a habit's completion dates.
//!
//! A streak is the number of consecutive calendar days, ending at the most
//! recent completion, with no gaps. Completing on the day after `last_done`
//! extends the streak; any other gap restarts it at 1. Undoing a completion
//! never decrements: the streak is recomputed from the remaining dates, so
//! the cached value stays correct under any edit order.

use chrono::{Duration, NaiveDate};

/// New streak value after recording a completion on `on`.
///
/// `streak` and `last_done` are the habit's current cached values. A gap of
/// exactly one day continues the streak; anything else (longer gaps, or a
/// completion dated before `last_done`) restarts at 1. A gap of zero cannot
/// reach this function: the per-day uniqueness check rejects it first.
pub fn streak_after_completion(streak: u32, last_done: Option<NaiveDate>, on: NaiveDate) -> u32 {
    match last_done {
        None => 1,
        Some(prev) => {
            if (on - prev).num_days() == 1 {
                streak + 1
            } else {
                1
            }
        }
    }
}

/// Recompute `(streak, last_done)` from the completion dates that remain
/// after an undo.
///
/// `dates` must be the habit's completion dates in descending order, unique
/// per day. The most recent date anchors the streak; the walk counts
/// consecutive predecessor days and stops at the first missing one.
pub fn recompute(dates: &[NaiveDate]) -> (u32, Option<NaiveDate>) {
    let Some(&anchor) = dates.first() else {
        return (0, None);
    };

    let mut streak = 1u32;
    let mut expected = anchor - Duration::days(1);
    for &date in &dates[1..] {
        if date == expected {
            streak += 1;
            expected -= Duration::days(1);
        } else {
            break;
        }
    }
    (streak, Some(anchor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_completion_starts_at_one() {
        assert_eq!(streak_after_completion(0, None, day(2024, 3, 10)), 1);
    }

    #[test]
    fn consecutive_day_extends_streak() {
        let streak = streak_after_completion(4, Some(day(2024, 3, 9)), day(2024, 3, 10));
        assert_eq!(streak, 5);
    }

    #[test]
    fn multi_day_gap_resets_to_one() {
        for gap in 2..10 {
            let last = day(2024, 3, 10) - Duration::days(gap);
            assert_eq!(streak_after_completion(7, Some(last), day(2024, 3, 10)), 1);
        }
    }

    #[test]
    fn out_of_order_completion_resets_to_one() {
        // Backfilling an earlier date: negative gap, streak restarts.
        let streak = streak_after_completion(3, Some(day(2024, 3, 10)), day(2024, 3, 5));
        assert_eq!(streak, 1);
    }

    #[test]
    fn recompute_of_empty_set_is_zero() {
        assert_eq!(recompute(&[]), (0, None));
    }

    #[test]
    fn recompute_counts_trailing_run() {
        // Days 1,2,3 completed, day 3 undone: anchor moves to day 2.
        let dates = [day(2024, 3, 2), day(2024, 3, 1)];
        assert_eq!(recompute(&dates), (2, Some(day(2024, 3, 2))));
    }

    #[test]
    fn recompute_stops_at_first_gap() {
        // Days 1,2,4 completed, day 4 undone: streak walks back from day 2.
        let dates = [day(2024, 3, 2), day(2024, 3, 1)];
        assert_eq!(recompute(&dates), (2, Some(day(2024, 3, 2))));

        // Days 1,3,4 remain: day 2 missing, streak is 4..=3 only.
        let dates = [day(2024, 3, 4), day(2024, 3, 3), day(2024, 3, 1)];
        assert_eq!(recompute(&dates), (2, Some(day(2024, 3, 4))));
    }

    #[test]
    fn recompute_of_single_date_is_one() {
        let dates = [day(2024, 3, 7)];
        assert_eq!(recompute(&dates), (1, Some(day(2024, 3, 7))));
    }

    fn descending(dates: &BTreeSet<NaiveDate>) -> Vec<NaiveDate> {
        dates.iter().rev().copied().collect()
    }

    fn trailing_run_oracle(dates: &BTreeSet<NaiveDate>) -> u32 {
        let Some(&last) = dates.iter().next_back() else {
            return 0;
        };
        let mut streak = 0u32;
        let mut cursor = last;
        while dates.contains(&cursor) {
            streak += 1;
            cursor -= Duration::days(1);
        }
        streak
    }

    fn arb_dates() -> impl Strategy<Value = BTreeSet<NaiveDate>> {
        let base = day(2024, 1, 1);
        proptest::collection::btree_set(0i64..120, 0..40)
            .prop_map(move |offsets| offsets.into_iter().map(|o| base + Duration::days(o)).collect())
    }

    proptest! {
        #[test]
        fn recompute_matches_trailing_run(dates in arb_dates()) {
            let (streak, last_done) = recompute(&descending(&dates));
            prop_assert_eq!(streak, trailing_run_oracle(&dates));
            prop_assert_eq!(last_done, dates.iter().next_back().copied());
        }

        #[test]
        fn completion_rule_agrees_with_recompute(dates in arb_dates(), offset in 1i64..5) {
            // Completing a fresh date after the whole history must leave the
            // cache equal to a from-scratch recompute.
            prop_assume!(!dates.is_empty());
            let last = *dates.iter().next_back().unwrap();
            let on = last + Duration::days(offset);

            let (cached_streak, cached_last) = recompute(&descending(&dates));
            let incremental = streak_after_completion(cached_streak, cached_last, on);

            let mut with_new = dates.clone();
            with_new.insert(on);
            let (recomputed, _) = recompute(&descending(&with_new));
            prop_assert_eq!(incremental, recomputed);
        }
    }
}
