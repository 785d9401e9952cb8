//! Template filters for prototype pages that want "recent" dates in
//! their copy (notification banners, status tags and the like)
//! without hardcoding them.

use std::time::SystemTime;

use chrono::{DateTime, Datelike, Days, NaiveDate, Timelike};
use chrono_tz::Tz;
use minijinja::Environment;

pub const fn wdays_long() -> &'static [&'static str; 7] {
    &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday",
      "Saturday", "Sunday"]
}

fn to_zoned(t: SystemTime, zone: Tz) -> DateTime<Tz> {
    let unixtime: u64 = t.duration_since(SystemTime::UNIX_EPOCH)
        .expect("no overflow for sensible times")
        .as_secs();
    use chrono::TimeZone;
    match zone.timestamp_opt(unixtime as i64, 0) {
        chrono::LocalResult::None =>
            panic!("Error converting to DateTime, is SystemTime in invalid range?: {t:?}"),
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(dt1, _dt2) => dt1,
    }
}

/// "12:23pm" style: 12-hour clock, no leading zero on the hour,
/// lower-case meridiem.
pub fn clock_short(dt: &DateTime<Tz>) -> String {
    let h24 = dt.hour();
    let meridiem = if h24 >= 12 { "pm" } else { "am" };
    let h = match h24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02}{}", h, dt.minute(), meridiem)
}

pub fn day_name(date: NaiveDate) -> &'static str {
    wdays_long()[date.weekday().num_days_from_monday() as usize]
}

pub fn time_one_hour_ago(now: SystemTime, zone: Tz) -> String {
    clock_short(&(to_zoned(now, zone) - chrono::Duration::hours(1)))
}

// Going back by calendar days, not by 24h blocks, so the names stay
// right across DST switches.
pub fn day_name_days_ago(now: SystemTime, zone: Tz, days: u64) -> String {
    let date = to_zoned(now, zone).date_naive() - Days::new(days);
    day_name(date).to_string()
}

pub fn yesterday_day_name(now: SystemTime, zone: Tz) -> String {
    day_name_days_ago(now, zone, 1)
}

pub fn day_before_yesterday_name(now: SystemTime, zone: Tz) -> String {
    day_name_days_ago(now, zone, 2)
}

/// Register everything under its template-visible name. The piped
/// value is ignored; pages write `{{ "" | timeOneHourAgo }}`.
pub fn register_filters(env: &mut Environment<'static>, zone: Tz) {
    env.add_filter("timeOneHourAgo", move |_value: minijinja::Value| {
        time_one_hour_ago(SystemTime::now(), zone)
    });
    env.add_filter("yesterdayDayName", move |_value: minijinja::Value| {
        yesterday_day_name(SystemTime::now(), zone)
    });
    env.add_filter("dayBeforeYesterdayName", move |_value: minijinja::Value| {
        day_before_yesterday_name(SystemTime::now(), zone)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use chrono::TimeZone;
    use chrono_tz::UTC;

    // 2023-11-14 22:13:20 UTC, a Tuesday
    const T0: u64 = 1700000000;

    fn at(unixtime: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(unixtime)
    }

    #[test]
    fn t_clock_short() {
        fn t(h: u32, m: u32, expected: &str) {
            let dt = UTC.with_ymd_and_hms(2023, 11, 14, h, m, 0).unwrap();
            assert_eq!(clock_short(&dt), expected);
        }
        t(0, 5, "12:05am");
        t(1, 0, "1:00am");
        t(11, 59, "11:59am");
        t(12, 0, "12:00pm");
        t(13, 5, "1:05pm");
        t(23, 30, "11:30pm");
    }

    #[test]
    fn t_time_one_hour_ago() {
        assert_eq!(time_one_hour_ago(at(T0), UTC), "9:13pm");
        // across midnight
        let half_past_midnight =
            UTC.with_ymd_and_hms(2023, 11, 14, 0, 30, 0).unwrap().timestamp();
        assert_eq!(time_one_hour_ago(at(half_past_midnight as u64), UTC),
                   "11:30pm");
        // zone matters: 22:13 UTC is 23:13 in Zurich that day
        assert_eq!(time_one_hour_ago(at(T0), chrono_tz::Europe::Zurich),
                   "10:13pm");
    }

    #[test]
    fn t_day_names() {
        assert_eq!(yesterday_day_name(at(T0), UTC), "Monday");
        assert_eq!(day_before_yesterday_name(at(T0), UTC), "Sunday");
        // Monday's yesterday is Sunday
        let monday =
            UTC.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap().timestamp();
        assert_eq!(yesterday_day_name(at(monday as u64), UTC), "Sunday");
        assert_eq!(day_before_yesterday_name(at(monday as u64), UTC),
                   "Saturday");
    }

    #[test]
    fn t_registered_names_render() {
        fn is_clock_short(s: &str) -> bool {
            let (hm, meridiem) = match s.strip_suffix("am") {
                Some(hm) => (hm, "am"),
                None => match s.strip_suffix("pm") {
                    Some(hm) => (hm, "pm"),
                    None => return false,
                }
            };
            assert!(meridiem == "am" || meridiem == "pm");
            match hm.split_once(':') {
                Some((h, m)) => {
                    matches!(h.parse::<u32>(), Ok(1..=12))
                        && m.len() == 2
                        && matches!(m.parse::<u32>(), Ok(0..=59))
                }
                None => false,
            }
        }

        let mut env = Environment::new();
        register_filters(&mut env, UTC);
        env.add_template(
            "t",
            "{{ '' | timeOneHourAgo }}|{{ '' | yesterdayDayName }}\
             |{{ '' | dayBeforeYesterdayName }}").unwrap();
        let out = env.get_template("t").unwrap()
            .render(minijinja::context!()).unwrap();
        let parts: Vec<&str> = out.split('|').collect();
        assert_eq!(parts.len(), 3);
        assert!(is_clock_short(parts[0]), "got {:?}", parts[0]);
        assert!(wdays_long().contains(&parts[1]));
        assert!(wdays_long().contains(&parts[2]));
    }
}
