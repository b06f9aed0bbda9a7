//! Date/time encoding
//!
//! ISO9660 has two datetime formats: the 7-byte binary form used in
//! directory records and the 17-byte ASCII form used in volume
//! descriptors. All timestamps are recorded as UTC (GMT offset 0).

use chrono::{DateTime, Datelike, Timelike, Utc};

/// 7-byte directory record datetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDateTime([u8; 7]);

impl RecordDateTime {
    /// Encode a timestamp into the 7-byte directory record form.
    ///
    /// Years outside the representable 1900-2155 window are clamped.
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        let year = dt.year().clamp(1900, 2155) - 1900;
        Self([
            year as u8,
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            0, // GMT offset: UTC
        ])
    }

    /// Raw bytes as stored in a directory record
    pub fn as_bytes(&self) -> &[u8; 7] {
        &self.0
    }
}

/// 17-byte ASCII descriptor datetime ("YYYYMMDDHHMMSSCC" + GMT offset)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorDateTime([u8; 17]);

impl DescriptorDateTime {
    /// Encode a timestamp into the 17-byte descriptor form
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        let mut buf = [0u8; 17];
        let text = format!(
            "{:04}{:02}{:02}{:02}{:02}{:02}{:02}",
            dt.year().clamp(0, 9999),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
            dt.timestamp_subsec_millis() / 10,
        );
        buf[..16].copy_from_slice(text.as_bytes());
        buf[16] = 0; // GMT offset: UTC
        Self(buf)
    }

    /// The "not specified" value: sixteen ASCII zeros and a zero offset
    pub fn unset() -> Self {
        let mut buf = [b'0'; 17];
        buf[16] = 0;
        Self(buf)
    }

    /// Raw bytes as stored in a volume descriptor
    pub fn as_bytes(&self) -> &[u8; 17] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_datetime() {
        let dt = Utc.with_ymd_and_hms(2003, 7, 14, 12, 30, 45).unwrap();
        let enc = RecordDateTime::from_datetime(&dt);
        assert_eq!(enc.as_bytes(), &[103, 7, 14, 12, 30, 45, 0]);
    }

    #[test]
    fn test_record_datetime_clamps_year() {
        let dt = Utc.with_ymd_and_hms(1899, 1, 1, 0, 0, 0).unwrap();
        let enc = RecordDateTime::from_datetime(&dt);
        assert_eq!(enc.as_bytes()[0], 0);
    }

    #[test]
    fn test_descriptor_datetime() {
        let dt = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 58).unwrap();
        let enc = DescriptorDateTime::from_datetime(&dt);
        assert_eq!(&enc.as_bytes()[..16], b"1999123123595800");
        assert_eq!(enc.as_bytes()[16], 0);
    }

    #[test]
    fn test_descriptor_datetime_unset() {
        let enc = DescriptorDateTime::unset();
        assert_eq!(&enc.as_bytes()[..16], b"0000000000000000");
    }
}
