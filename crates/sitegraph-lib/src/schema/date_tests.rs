use super::date::{format_date, is_date, parse_date};

#[test]
fn detects_iso_dates() {
    assert!(is_date("2019-01-31"));
    assert!(is_date("2019-01-31T10:15:00"));
    assert!(is_date("2019-01-31T10:15:00.123Z"));
    assert!(is_date("2019-01-31T10:15:00+02:00"));

    assert!(!is_date("2019"));
    assert!(!is_date("31-01-2019"));
    assert!(!is_date("2019-13-01"));
    assert!(!is_date("hello world"));
}

#[test]
fn offsets_normalize_to_utc() {
    let dt = parse_date("2019-01-31T01:00:00+02:00").unwrap();
    assert_eq!(format_date(&dt, "YYYY-MM-DD HH:mm"), "2019-01-30 23:00");
}

#[test]
fn moment_tokens() {
    let dt = parse_date("2021-03-02T15:04:05").unwrap();

    assert_eq!(format_date(&dt, "DD.MM.YYYY"), "02.03.2021");
    assert_eq!(format_date(&dt, "MMMM Do, YYYY"), "March 2nd, 2021");
    assert_eq!(format_date(&dt, "ddd, MMM D YY"), "Tue, Mar 2 21");
    assert_eq!(format_date(&dt, "dddd h:mm A"), "Tuesday 3:04 PM");
    assert_eq!(format_date(&dt, "[Today is] dddd"), "Today is Tuesday");
}

#[test]
fn ordinals() {
    let fmt = |s: &str| format_date(&parse_date(s).unwrap(), "Do");

    assert_eq!(fmt("2021-01-01"), "1st");
    assert_eq!(fmt("2021-01-11"), "11th");
    assert_eq!(fmt("2021-01-22"), "22nd");
    assert_eq!(fmt("2021-01-23"), "23rd");
}
