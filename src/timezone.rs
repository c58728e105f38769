use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The UTC offset in effect right now for `canonical_timezone`, e.g.
/// "America/Sao_Paulo".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current date-time in `canonical_timezone`.
///
/// # Errors
///
/// Returns [Error::InvalidTimezoneError] if the timezone is not known.
pub(crate) fn local_now(canonical_timezone: &str) -> Result<OffsetDateTime, Error> {
    let offset = get_local_offset(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {canonical_timezone}");
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })?;

    Ok(OffsetDateTime::now_utc().to_offset(offset))
}

#[cfg(test)]
mod timezone_tests {
    use time::UtcOffset;

    use crate::{
        Error,
        timezone::{get_local_offset, local_now},
    };

    #[test]
    fn sao_paulo_is_three_hours_behind_utc() {
        let offset = get_local_offset("America/Sao_Paulo");

        assert_eq!(offset, UtcOffset::from_hms(-3, 0, 0).ok());
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        assert_eq!(get_local_offset("Mars/Olympus_Mons"), None);
        assert_eq!(
            local_now("Mars/Olympus_Mons"),
            Err(Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()))
        );
    }
}
