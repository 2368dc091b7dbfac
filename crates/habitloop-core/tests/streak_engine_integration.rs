//! Integration tests for the streak engine.
//!
//! Drives complete/uncomplete through the public Database API and checks
//! that the cached streak/last_done always match the completion history.

use chrono::NaiveDate;
use habitloop_core::{CoreError, Database, HabitError};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn consecutive_days_build_a_streak() {
    let db = Database::open_memory().unwrap();
    let habit = db.create_habit("Morning Run", None).unwrap();

    assert_eq!(db.complete_habit(habit.id, day(2024, 3, 1)).unwrap().streak, 1);
    assert_eq!(db.complete_habit(habit.id, day(2024, 3, 2)).unwrap().streak, 2);
    assert_eq!(db.complete_habit(habit.id, day(2024, 3, 3)).unwrap().streak, 3);

    let fetched = db.get_habit(habit.id).unwrap().unwrap();
    assert_eq!(fetched.streak, 3);
    assert_eq!(fetched.last_done, Some(day(2024, 3, 3)));
}

#[test]
fn a_gap_resets_the_streak_to_one() {
    let db = Database::open_memory().unwrap();
    let habit = db.create_habit("Morning Run", None).unwrap();

    db.complete_habit(habit.id, day(2024, 3, 1)).unwrap();
    db.complete_habit(habit.id, day(2024, 3, 2)).unwrap();

    // Two-day gap: back to 1, not 0.
    let outcome = db.complete_habit(habit.id, day(2024, 3, 5)).unwrap();
    assert_eq!(outcome.streak, 1);
}

#[test]
fn undo_walks_the_streak_back_day_by_day() {
    let db = Database::open_memory().unwrap();
    let habit = db.create_habit("Morning Run", None).unwrap();

    for d in 1..=3 {
        db.complete_habit(habit.id, day(2024, 3, d)).unwrap();
    }
    assert_eq!(db.get_habit(habit.id).unwrap().unwrap().streak, 3);

    let undo = db.uncomplete_habit(habit.id, day(2024, 3, 3)).unwrap();
    assert_eq!(undo.streak, 2);
    assert_eq!(undo.last_done, Some(day(2024, 3, 2)));

    let undo = db.uncomplete_habit(habit.id, day(2024, 3, 2)).unwrap();
    assert_eq!(undo.streak, 1);
    assert_eq!(undo.last_done, Some(day(2024, 3, 1)));

    let undo = db.uncomplete_habit(habit.id, day(2024, 3, 1)).unwrap();
    assert_eq!(undo.streak, 0);
    assert_eq!(undo.last_done, None);

    let fetched = db.get_habit(habit.id).unwrap().unwrap();
    assert_eq!(fetched.streak, 0);
    assert_eq!(fetched.last_done, None);
}

#[test]
fn undo_recomputes_across_gaps_instead_of_decrementing() {
    let db = Database::open_memory().unwrap();
    let habit = db.create_habit("Morning Run", None).unwrap();

    // Days 1, 2, 4: the gap at day 3 means undoing day 4 must anchor the
    // recomputed streak at day 2.
    db.complete_habit(habit.id, day(2024, 3, 1)).unwrap();
    db.complete_habit(habit.id, day(2024, 3, 2)).unwrap();
    db.complete_habit(habit.id, day(2024, 3, 4)).unwrap();
    assert_eq!(db.get_habit(habit.id).unwrap().unwrap().streak, 1);

    let undo = db.uncomplete_habit(habit.id, day(2024, 3, 4)).unwrap();
    assert_eq!(undo.streak, 2);
    assert_eq!(undo.last_done, Some(day(2024, 3, 2)));
}

#[test]
fn complete_then_undo_restores_prior_state_exactly() {
    let db = Database::open_memory().unwrap();
    let habit = db.create_habit("Morning Run", None).unwrap();

    db.complete_habit(habit.id, day(2024, 3, 1)).unwrap();
    db.complete_habit(habit.id, day(2024, 3, 2)).unwrap();
    let before = db.get_habit(habit.id).unwrap().unwrap();

    db.complete_habit(habit.id, day(2024, 3, 3)).unwrap();
    db.uncomplete_habit(habit.id, day(2024, 3, 3)).unwrap();

    let after = db.get_habit(habit.id).unwrap().unwrap();
    assert_eq!(after.streak, before.streak);
    assert_eq!(after.last_done, before.last_done);
}

#[test]
fn backfilled_completion_resets_then_undo_repairs() {
    let db = Database::open_memory().unwrap();
    let habit = db.create_habit("Morning Run", None).unwrap();

    db.complete_habit(habit.id, day(2024, 3, 9)).unwrap();
    db.complete_habit(habit.id, day(2024, 3, 10)).unwrap();

    // Completing an earlier date is a non-consecutive gap: reset to 1.
    let outcome = db.complete_habit(habit.id, day(2024, 3, 5)).unwrap();
    assert_eq!(outcome.streak, 1);

    // Undoing it recomputes from the full remaining history, restoring
    // the run ending at the 10th.
    let undo = db.uncomplete_habit(habit.id, day(2024, 3, 5)).unwrap();
    assert_eq!(undo.streak, 2);
    assert_eq!(undo.last_done, Some(day(2024, 3, 10)));
}

#[test]
fn preseeded_history_recomputes_correctly_on_first_undo() {
    let db = Database::open_memory().unwrap();
    let habit = db.create_habit("Morning Run", None).unwrap();

    // Simulate imported history written in arbitrary order.
    for d in [4, 1, 3, 2, 7] {
        db.complete_habit(habit.id, day(2024, 3, d)).unwrap();
    }

    let undo = db.uncomplete_habit(habit.id, day(2024, 3, 7)).unwrap();
    assert_eq!(undo.streak, 4);
    assert_eq!(undo.last_done, Some(day(2024, 3, 4)));
}

#[test]
fn errors_are_distinct_and_nonfatal() {
    let db = Database::open_memory().unwrap();
    let habit = db.create_habit("Morning Run", None).unwrap();
    let today = day(2024, 3, 10);

    assert!(matches!(
        db.complete_habit(9999, today).unwrap_err(),
        CoreError::Habit(HabitError::NotFound { id: 9999 })
    ));

    db.complete_habit(habit.id, today).unwrap();
    assert!(matches!(
        db.complete_habit(habit.id, today).unwrap_err(),
        CoreError::Habit(HabitError::AlreadyCompleted { .. })
    ));
    assert!(matches!(
        db.uncomplete_habit(habit.id, day(2024, 3, 9)).unwrap_err(),
        CoreError::Habit(HabitError::NotCompleted { .. })
    ));

    // The failed calls must not have disturbed the stored state.
    let fetched = db.get_habit(habit.id).unwrap().unwrap();
    assert_eq!(fetched.streak, 1);
    assert_eq!(fetched.last_done, Some(today));
    assert_eq!(db.completion_dates(habit.id).unwrap(), vec![today]);
}

#[test]
fn completion_history_is_descending() {
    let db = Database::open_memory().unwrap();
    let habit = db.create_habit("Morning Run", None).unwrap();
    for d in [2, 5, 3] {
        db.complete_habit(habit.id, day(2024, 3, d)).unwrap();
    }

    let dates = db.completion_dates(habit.id).unwrap();
    assert_eq!(dates, vec![day(2024, 3, 5), day(2024, 3, 3), day(2024, 3, 2)]);

    let records = db.completion_history(habit.id).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].date, day(2024, 3, 5));
    assert_eq!(records[0].habit_id, habit.id);
}
