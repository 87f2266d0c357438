use {
    chrono::{
        naive::{NaiveDate, NaiveDateTime, NaiveTime},
        offset::FixedOffset,
        DateTime, Utc,
    },
    lazy_static::lazy_static,
    regex::{Captures, Regex},
    std::str::FromStr,
};

lazy_static! {
    /// ISO 8601 timestamp format
    static ref ISO_8601_REGEX: Regex = Regex::new(
        r"(?x)^
        (?P<year>\d{4})-?
        (?P<month>0[1-9]|1[0-2])-?
        (?P<day>0[1-9]|[12][0-9]|3[01])
        T
        (?P<hour>[01][0-9]|2[0-3]):?
        (?P<minute>[0-5][0-9]):?
        (?P<second>[0-5][0-9])
        (?P<offset>[-+][01][0-9]:?[0-5][0-9]|Z)$").unwrap();
}

/// Parse an ISO 8601 timestamp in either basic (`20150830T123600Z`) or extended (`2015-08-30T12:36:00Z`) format and
/// convert it to UTC. Returns `None` if the string is not a valid timestamp.
pub(crate) fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    let cap = ISO_8601_REGEX.captures(s)?;

    let naive_date = NaiveDate::from_ymd_opt(capture(&cap, "year")?, capture(&cap, "month")?, capture(&cap, "day")?)?;
    let naive_time =
        NaiveTime::from_hms_opt(capture(&cap, "hour")?, capture(&cap, "minute")?, capture(&cap, "second")?)?;
    let naive_dt = NaiveDateTime::new(naive_date, naive_time);

    let offset_str = cap.name("offset")?.as_str();
    let offset_secs = if offset_str == "Z" {
        0
    } else {
        let offset_condensed = offset_str.replace(':', "");
        // Must be [+-]HHMM at this point
        let (sign_str, hm) = offset_condensed.split_at(1);
        let (hour_off_str, minute_off_str) = hm.split_at(2);

        let sign = if sign_str == "-" {
            -1
        } else {
            1
        };

        let hour = i32::from_str(hour_off_str).ok()?;
        let min = i32::from_str(minute_off_str).ok()?;
        sign * (hour * 3600 + min * 60)
    };

    let offset = FixedOffset::east_opt(offset_secs)?;
    let local = naive_dt.and_local_timezone(offset).single()?;
    Some(local.with_timezone(&Utc))
}

fn capture<T: FromStr>(cap: &Captures<'_>, name: &str) -> Option<T> {
    T::from_str(cap.name(name)?.as_str()).ok()
}
