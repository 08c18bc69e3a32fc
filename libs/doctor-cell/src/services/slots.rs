//! Slot availability engine.
//!
//! Slots are 30 minute steps between 10:00 and 21:00 local time, offered for
//! today and the following six days. Today starts at the next whole hour
//! (never before 10:00), on the half hour when the current minute is past 30.
//! A slot is identified by a date key (`day_month_year`, no zero padding) and
//! a 12-hour label (`hh:mm AM`).

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

use shared_models::BookedSlots;

pub const LOOKAHEAD_DAYS: i64 = 7;
pub const SLOT_MINUTES: i64 = 30;
pub const OPENING_HOUR: u32 = 10;
pub const CLOSING_HOUR: u32 = 21;

const LABEL_FORMAT: &str = "%I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCandidate {
    pub datetime: NaiveDateTime,
    pub date_key: String,
    pub time: String,
}

impl SlotCandidate {
    fn at(datetime: NaiveDateTime) -> Self {
        Self {
            datetime,
            date_key: date_key(datetime.date()),
            time: time_label(datetime),
        }
    }
}

pub fn date_key(date: NaiveDate) -> String {
    format!("{}_{}_{}", date.day(), date.month(), date.year())
}

pub fn time_label(datetime: NaiveDateTime) -> String {
    datetime.format(LABEL_FORMAT).to_string()
}

/// Inverse of [`date_key`] and [`time_label`]. Only canonical spellings parse,
/// so a stored key always round-trips to itself.
pub fn parse_slot(slot_date: &str, slot_time: &str) -> Option<NaiveDateTime> {
    let mut parts = slot_date.split('_');
    let day = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let year = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::parse_from_str(slot_time, LABEL_FORMAT).ok()?;
    let datetime = date.and_time(time);

    (date_key(date) == slot_date && time_label(datetime) == slot_time).then_some(datetime)
}

/// Every grid step for one day of the window, booked or not.
/// Restartable: each call builds a fresh iterator from `now`.
pub fn day_candidates(now: NaiveDateTime, offset: i64) -> impl Iterator<Item = NaiveDateTime> {
    let date = now.date() + Duration::days(offset);
    let midnight = date.and_time(NaiveTime::MIN);
    let end = midnight + Duration::hours(i64::from(CLOSING_HOUR));

    let start = if offset == 0 {
        let hour = (now.hour() + 1).max(OPENING_HOUR);
        let minute = if now.minute() > 30 { 30 } else { 0 };
        // Late in the evening this lands past closing, or on the next day,
        // and the bucket comes out empty.
        midnight + Duration::hours(i64::from(hour)) + Duration::minutes(minute)
    } else {
        midnight + Duration::hours(i64::from(OPENING_HOUR))
    };

    std::iter::successors(Some(start), |slot| Some(*slot + Duration::minutes(SLOT_MINUTES)))
        .take_while(move |slot| *slot < end)
}

/// Seven day-buckets of free slots, in chronological order.
pub fn available_slots(booked: &BookedSlots, now: NaiveDateTime) -> Vec<Vec<SlotCandidate>> {
    (0..LOOKAHEAD_DAYS)
        .map(|offset| {
            day_candidates(now, offset)
                .map(SlotCandidate::at)
                .filter(|candidate| {
                    !booked
                        .get(&candidate.date_key)
                        .is_some_and(|times| times.contains(&candidate.time))
                })
                .collect()
        })
        .collect()
}

/// Whether the slot lies on the grid offered at `now`, ignoring bookings.
pub fn is_offered(now: NaiveDateTime, slot_date: &str, slot_time: &str) -> bool {
    let Some(slot) = parse_slot(slot_date, slot_time) else {
        return false;
    };
    let offset = (slot.date() - now.date()).num_days();
    if !(0..LOOKAHEAD_DAYS).contains(&offset) {
        return false;
    }
    day_candidates(now, offset).any(|candidate| candidate == slot)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn booked(entries: &[(&str, &[&str])]) -> BookedSlots {
        entries
            .iter()
            .map(|(date, times)| {
                (
                    date.to_string(),
                    times.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
                )
            })
            .collect()
    }

    fn labels(bucket: &[SlotCandidate]) -> Vec<&str> {
        bucket.iter().map(|c| c.time.as_str()).collect()
    }

    #[test]
    fn keys_and_labels_are_formatted_without_date_padding() {
        let slot = at(2024, 6, 5, 20, 30);
        assert_eq!(date_key(slot.date()), "5_6_2024");
        assert_eq!(time_label(slot), "08:30 PM");
        assert_eq!(time_label(at(2024, 6, 5, 10, 0)), "10:00 AM");
    }

    #[test]
    fn morning_request_skips_the_booked_opening_slot() {
        let slots = available_slots(&booked(&[("5_6_2024", &["10:00 AM"])]), at(2024, 6, 5, 9, 0));
        let today = labels(&slots[0]);

        assert_eq!(today.first(), Some(&"10:30 AM"));
        assert_eq!(today.last(), Some(&"08:30 PM"));
        assert!(!today.contains(&"10:00 AM"));
        // 10:00..21:00 is 22 steps, one of them booked
        assert_eq!(today.len(), 21);
    }

    #[test]
    fn window_is_seven_buckets_and_later_days_start_at_opening() {
        let slots = available_slots(&BookedSlots::new(), at(2024, 6, 5, 15, 10));
        assert_eq!(slots.len(), 7);
        for bucket in &slots[1..] {
            assert_eq!(bucket.len(), 22);
            assert_eq!(bucket[0].time, "10:00 AM");
        }
        assert_eq!(slots[6][0].date_key, "11_6_2024");
    }

    #[test]
    fn today_starts_after_the_current_time() {
        let now = at(2024, 6, 5, 15, 10);
        let today = &available_slots(&BookedSlots::new(), now)[0];
        assert_eq!(today[0].time, "04:00 PM");
        assert!(today.iter().all(|c| c.datetime > now));

        let half_past = &available_slots(&BookedSlots::new(), at(2024, 6, 5, 15, 45))[0];
        assert_eq!(half_past[0].time, "04:30 PM");
    }

    #[test]
    fn no_candidate_precedes_now_rounded_up() {
        for hour in 0..24 {
            for minute in [0, 15, 30, 31, 59] {
                let now = at(2024, 6, 5, hour, minute);
                let rounded = if minute == 0 || minute == 30 {
                    now
                } else if minute < 30 {
                    at(2024, 6, 5, hour, 30)
                } else {
                    now + Duration::minutes(i64::from(60 - minute))
                };
                let floor = rounded.max(at(2024, 6, 5, OPENING_HOUR, 0));
                for candidate in &available_slots(&BookedSlots::new(), now)[0] {
                    assert!(candidate.datetime >= floor, "{} at {}", candidate.time, now);
                }
            }
        }
    }

    #[test]
    fn evening_requests_yield_an_empty_first_bucket() {
        assert!(available_slots(&BookedSlots::new(), at(2024, 6, 5, 20, 0))[0].is_empty());
        assert!(available_slots(&BookedSlots::new(), at(2024, 6, 5, 20, 45))[0].is_empty());
        // 23:xx rolls the start onto the next day, still past the bound
        let late = available_slots(&BookedSlots::new(), at(2024, 6, 5, 23, 40));
        assert!(late[0].is_empty());
        assert_eq!(late[1][0].date_key, "6_6_2024");
    }

    #[test]
    fn last_offered_slot_before_closing() {
        let today = &available_slots(&BookedSlots::new(), at(2024, 6, 5, 19, 40))[0];
        assert_eq!(labels(today), vec!["08:30 PM"]);
    }

    #[test]
    fn booked_pairs_never_appear() {
        let taken = booked(&[
            ("6_6_2024", &["10:00 AM", "02:30 PM", "08:30 PM"]),
            ("8_6_2024", &["11:00 AM"]),
        ]);
        let slots = available_slots(&taken, at(2024, 6, 5, 9, 0));
        for bucket in &slots {
            for candidate in bucket {
                assert!(!taken
                    .get(&candidate.date_key)
                    .is_some_and(|times| times.contains(&candidate.time)));
            }
        }
        assert_eq!(slots[1].len(), 19);
        assert_eq!(slots[3].len(), 21);
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let taken = booked(&[("5_6_2024", &["10:00 AM"])]);
        let now = at(2024, 6, 5, 9, 0);
        assert_eq!(available_slots(&taken, now), available_slots(&taken, now));
    }

    #[test]
    fn month_and_year_boundaries() {
        let slots = available_slots(&BookedSlots::new(), at(2024, 12, 29, 9, 0));
        assert_eq!(slots[3][0].date_key, "1_1_2025");
    }

    #[test]
    fn parse_slot_accepts_only_canonical_spellings() {
        assert_eq!(parse_slot("5_6_2024", "08:30 PM"), Some(at(2024, 6, 5, 20, 30)));
        assert_eq!(parse_slot("05_6_2024", "08:30 PM"), None);
        assert_eq!(parse_slot("5_6_2024", "8:30 PM"), None);
        assert_eq!(parse_slot("31_2_2024", "10:00 AM"), None);
        assert_eq!(parse_slot("5_6_2024_1", "10:00 AM"), None);
        assert_eq!(parse_slot("5-6-2024", "10:00 AM"), None);
        assert_eq!(parse_slot("5_6_2024", "20:30"), None);
    }

    #[test]
    fn offered_slots_follow_the_grid() {
        let now = at(2024, 6, 5, 9, 0);
        assert!(is_offered(now, "5_6_2024", "10:00 AM"));
        assert!(is_offered(now, "11_6_2024", "08:30 PM"));
        // outside the window
        assert!(!is_offered(now, "12_6_2024", "10:00 AM"));
        assert!(!is_offered(now, "4_6_2024", "10:00 AM"));
        // off the grid or outside hours
        assert!(!is_offered(now, "6_6_2024", "10:15 AM"));
        assert!(!is_offered(now, "6_6_2024", "09:30 AM"));
        assert!(!is_offered(now, "6_6_2024", "09:00 PM"));
        // already past today
        assert!(!is_offered(at(2024, 6, 5, 14, 0), "5_6_2024", "02:00 PM"));
    }
}
