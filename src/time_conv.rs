/// Error returned when a field of a stored timestamp is outside its
/// documented range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDateTime;

/// Parse an 8-byte ProDOS timestamp as stored in NuFX headers.
///
/// Field order: second, minute, hour, year, day, month, filler, weekday.
/// The year counts from 1900 and wraps into the 2000s below 1940; day and
/// month are stored zero-based. An all-zero field means "no date recorded"
/// and decodes to `None`.
///
/// ShrinkIt shipped archives whose minute field exceeds 59 and whose hour
/// field exceeds 23; those overflows cascade into the next field instead of
/// being rejected.
pub fn parse_prodos_datetime(
    raw: &[u8; 8],
) -> Result<Option<time::PrimitiveDateTime>, InvalidDateTime> {
    if raw.iter().all(|&b| b == 0) {
        return Ok(None);
    }

    let [second, minute, hour, year, day, month, _filler, weekday] = *raw;

    if second > 59 || day > 30 || month > 11 || weekday > 7 {
        return Err(InvalidDateTime);
    }

    let mut hour = hour as u16 + minute as u16 / 60;
    let minute = minute % 60;
    let mut day = day as u16 + 1 + hour / 24;
    hour %= 24;

    let mut year = 1900 + year as i32;
    if year < 1940 {
        year += 100;
    }

    let month = time::Month::try_from(month + 1).map_err(|_| InvalidDateTime)?;
    let date =
        time::Date::from_calendar_date(year, month, day as u8).map_err(|_| InvalidDateTime)?;
    let time =
        time::Time::from_hms(hour as u8, minute, second).map_err(|_| InvalidDateTime)?;

    Ok(Some(time::PrimitiveDateTime::new(date, time)))
}

#[test]
fn test_parse_prodos_datetime() {
    // 1988-07-06, 19:11 stored as 18:71.
    assert_eq!(
        format!(
            "{}",
            parse_prodos_datetime(&[0, 71, 18, 88, 5, 6, 0, 4])
                .unwrap()
                .unwrap()
        ),
        "1988-07-06 19:11:00.0",
    );
    // 1988-06-30, 23:53 stored as day 29, hour 47.
    assert_eq!(
        format!(
            "{}",
            parse_prodos_datetime(&[0, 53, 47, 88, 28, 5, 0, 6])
                .unwrap()
                .unwrap()
        ),
        "1988-06-30 23:53:00.0",
    );
    // Years below 1940 roll into the 2000s.
    assert_eq!(
        format!(
            "{}",
            parse_prodos_datetime(&[30, 15, 9, 5, 0, 0, 0, 1])
                .unwrap()
                .unwrap()
        ),
        "2005-01-01 9:15:30.0",
    );
}

#[test]
fn test_parse_prodos_datetime_sentinel_and_range() {
    assert_eq!(parse_prodos_datetime(&[0; 8]), Ok(None));
    // Month 12 is out of range (stored zero-based).
    assert_eq!(
        parse_prodos_datetime(&[0, 0, 0, 88, 0, 12, 0, 1]),
        Err(InvalidDateTime)
    );
    // Second 60 is never valid.
    assert_eq!(
        parse_prodos_datetime(&[60, 0, 0, 88, 0, 0, 0, 1]),
        Err(InvalidDateTime)
    );
    // Weekday 8 is out of range.
    assert_eq!(
        parse_prodos_datetime(&[0, 0, 0, 88, 0, 0, 0, 8]),
        Err(InvalidDateTime)
    );
}
