//! Human-readable record numbers.
//!
//! Numbers are built from a tenant prefix, a date scope and a sequence
//! value allocated by the store, so two concurrent requests can never
//! produce the same number.

use chrono::{Datelike, NaiveDate};

use crate::config::CodeFormats;

/// The kinds of numbered records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
    /// Patient account record number, sequenced per year.
    Arn,
    /// Patient bill number, sequenced per day.
    Bill,
    /// F&B order number, sequenced per day.
    Order,
}

impl CodeKind {
    /// Key segment used for the sequence counter.
    pub fn sequence_name(self) -> &'static str {
        match self {
            CodeKind::Arn => "arn",
            CodeKind::Bill => "bill",
            CodeKind::Order => "order",
        }
    }

    /// The scope a sequence restarts in: the year for ARNs, else the day.
    pub fn scope(self, date: NaiveDate) -> String {
        match self {
            CodeKind::Arn => date.year().to_string(),
            CodeKind::Bill | CodeKind::Order => date.format("%Y%m%d").to_string(),
        }
    }

    /// Formats a record number from an allocated sequence value.
    ///
    /// # Example
    ///
    /// ```
    /// use bizhub::config::CodeFormats;
    /// use bizhub::rules::CodeKind;
    /// use chrono::NaiveDate;
    ///
    /// let codes = CodeFormats::default();
    /// let day = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
    /// assert_eq!(CodeKind::Arn.format(&codes, day, 42), "ARN-2026-000042");
    /// assert_eq!(CodeKind::Bill.format(&codes, day, 7), "BILL-20261015-0007");
    /// assert_eq!(CodeKind::Order.format(&codes, day, 12345), "ORD-20261015-12345");
    /// ```
    pub fn format(self, codes: &CodeFormats, date: NaiveDate, sequence: u64) -> String {
        let scope = self.scope(date);
        match self {
            CodeKind::Arn => format!("{}-{}-{:06}", codes.arn_prefix, scope, sequence),
            CodeKind::Bill => format!("{}-{}-{:04}", codes.bill_prefix, scope, sequence),
            CodeKind::Order => format!("{}-{}-{:04}", codes.order_prefix, scope, sequence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_tenant_prefixes() {
        let codes = CodeFormats {
            arn_prefix: "SMD".to_string(),
            bill_prefix: "SMB".to_string(),
            order_prefix: "ORD".to_string(),
        };
        assert_eq!(CodeKind::Arn.format(&codes, day(2027, 1, 2), 1), "SMD-2027-000001");
        assert_eq!(CodeKind::Bill.format(&codes, day(2027, 1, 2), 1), "SMB-20270102-0001");
    }

    #[test]
    fn test_scopes() {
        assert_eq!(CodeKind::Arn.scope(day(2026, 12, 31)), "2026");
        assert_eq!(CodeKind::Order.scope(day(2026, 12, 31)), "20261231");
        assert_eq!(CodeKind::Bill.sequence_name(), "bill");
    }
}
