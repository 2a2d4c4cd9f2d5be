use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime, UtcOffset};

/// Primo istante rappresentabile in RFC3339 (anno 0000).
pub const EARLIEST_TIMESTAMP: &str = "0000-01-01T00:00:00Z";

/// Formatta un istante come RFC3339 UTC troncato ai secondi (es. "2025-11-02T12:34:56Z").
///
/// L'anno deve stare in 0..=9999: `now` e i valori di `parse_timestamp` ci stanno sempre,
/// per date calcolate usa `days_before`.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let utc = at.to_offset(UtcOffset::UTC);
    let truncated = utc - Duration::nanoseconds(i64::from(utc.nanosecond()));
    truncated.format(&Rfc3339).expect("error formatting timestamp")
}

/// Restituisce l'istante corrente in UTC formattato come RFC3339.
pub fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

/// Timestamp di `days` giorni prima di `from`; `None` se cade fuori dagli anni 0..=9999.
pub fn days_before(from: OffsetDateTime, days: i64) -> Option<String> {
    let span = Duration::seconds(days.checked_mul(86_400)?);
    let at = from.to_offset(UtcOffset::UTC).checked_sub(span)?;
    if !(0..=9999).contains(&at.year()) {
        return None;
    }
    Some(format_timestamp(at))
}

/// Interpreta un timestamp RFC3339 (qualsiasi offset).
pub fn parse_timestamp(s: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(s, &Rfc3339)
}
