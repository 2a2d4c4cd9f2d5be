pub mod time;

pub use self::time::{days_before, EARLIEST_TIMESTAMP, format_timestamp, now_timestamp, parse_timestamp};
