//! Conversions between the transport date-time format used by the finance
//! service, the local date-time form input, and structured timestamps.
//!
//! Every function here is total: malformed input yields `None`, never a panic
//! or an error.

use time::{
    Date, PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

/// `dd/mm/yyyy HH:mm:ss`, 24-hour and zero-padded.
const TRANSPORT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month]/[year] [hour]:[minute]:[second]");

const TRANSPORT_FORMAT_NO_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month]/[year] [hour]:[minute]");

const TRANSPORT_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month]/[year]");

/// `yyyy-mm-ddThh:mm`, as produced by a local date-time form input. Some inputs
/// append seconds, which are accepted and then dropped.
const LOCAL_INPUT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute][optional [:[second]]]");

/// Parse a transport date-time string such as `"15/01/2025 13:45:00"`.
///
/// A missing time of day is read as midnight and missing seconds as zero.
/// Returns `None` for anything else that is not a real calendar date-time.
pub fn parse_transport_datetime(input: &str) -> Option<PrimitiveDateTime> {
    let input = input.trim();

    if input.is_empty() {
        return None;
    }

    PrimitiveDateTime::parse(input, TRANSPORT_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(input, TRANSPORT_FORMAT_NO_SECONDS))
        .or_else(|_| Date::parse(input, TRANSPORT_DATE_FORMAT).map(Date::midnight))
        .ok()
}

/// Format a timestamp in the transport format, e.g. `"05/03/2025 09:07:02"`.
pub fn format_transport_datetime(datetime: PrimitiveDateTime) -> String {
    format!(
        "{:02}/{:02}/{:04} {:02}:{:02}:{:02}",
        datetime.day(),
        u8::from(datetime.month()),
        datetime.year(),
        datetime.hour(),
        datetime.minute(),
        datetime.second()
    )
}

/// Convert a local form input such as `"2025-01-15T13:45"` into the transport
/// format `"15/01/2025 13:45:00"`.
///
/// The seconds are always sent as zero. Returns `None` for empty or malformed
/// input.
pub fn local_input_to_transport(input: &str) -> Option<String> {
    let input = input.trim();

    if input.is_empty() {
        return None;
    }

    let datetime = PrimitiveDateTime::parse(input, LOCAL_INPUT_FORMAT).ok()?;
    let datetime = datetime.replace_second(0).ok()?;

    Some(format_transport_datetime(datetime))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{format_transport_datetime, local_input_to_transport, parse_transport_datetime};

    #[test]
    fn parses_transport_datetime() {
        assert_eq!(
            parse_transport_datetime("15/01/2025 13:45:09"),
            Some(datetime!(2025-01-15 13:45:09))
        );
    }

    #[test]
    fn missing_time_of_day_is_midnight() {
        assert_eq!(
            parse_transport_datetime("15/01/2025"),
            Some(datetime!(2025-01-15 00:00:00))
        );
        assert_eq!(
            parse_transport_datetime("15/01/2025 08:30"),
            Some(datetime!(2025-01-15 08:30:00))
        );
    }

    #[test]
    fn malformed_transport_datetimes_are_absent() {
        let inputs = [
            "",
            "   ",
            "not a date",
            "2025-01-15 13:45:09",
            "32/01/2025 10:00:00",
            "29/02/2023 10:00:00",
            "15/13/2025 10:00:00",
            "15/01/2025 24:00:00",
            "15/01/2025 10:60:00",
            "15/01/2025 10:00:00 extra",
            "1/1/2025 10:00:00",
            "15/01/25 10:00:00",
            "15/01/2025T10:00:00",
            "//",
            "15/01/2025 ::",
            "ça/va/bien 日本:語:00",
        ];

        for input in inputs {
            assert_eq!(
                parse_transport_datetime(input),
                None,
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn transport_datetime_round_trips() {
        let inputs = [
            "01/01/2000 00:00:00",
            "29/02/2024 23:59:59",
            "05/03/2025 09:07:02",
            "31/12/1999 12:00:00",
        ];

        for input in inputs {
            let parsed = parse_transport_datetime(input).unwrap();
            let formatted = format_transport_datetime(parsed);

            assert_eq!(formatted, input);
            assert_eq!(parse_transport_datetime(&formatted), Some(parsed));
        }
    }

    #[test]
    fn converts_local_input_to_transport_format() {
        assert_eq!(
            local_input_to_transport("2025-01-15T13:45"),
            Some("15/01/2025 13:45:00".to_owned())
        );
    }

    #[test]
    fn local_input_seconds_are_dropped() {
        assert_eq!(
            local_input_to_transport("2025-01-15T13:45:31"),
            Some("15/01/2025 13:45:00".to_owned())
        );
    }

    #[test]
    fn malformed_local_inputs_are_absent() {
        let inputs = [
            "",
            "2025-01-15",
            "2025-01-15 13:45",
            "15/01/2025 13:45:00",
            "2025-02-30T10:00",
            "2025-01-15T25:00",
            "2025-01-15T13",
            "T13:45",
            "garbage",
            "2025-01-15T13:45Z",
        ];

        for input in inputs {
            assert_eq!(
                local_input_to_transport(input),
                None,
                "expected {input:?} to be rejected"
            );
        }
    }
}
