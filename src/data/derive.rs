use super::model::AttendanceRecord;

/// Attendance per million of payroll.
///
/// `None` when either input is missing or payroll is zero; never infinite
/// or NaN.
pub fn efficiency(attendance: Option<f64>, payroll: Option<f64>) -> Option<f64> {
    let (attendance, payroll) = (attendance?, payroll?);
    if payroll == 0.0 {
        return None;
    }
    let value = attendance / payroll * 1_000_000.0;
    value.is_finite().then_some(value)
}

/// Recompute every derived column of a row from its raw columns.
pub fn derive_metrics(mut record: AttendanceRecord) -> AttendanceRecord {
    record.efficiency = efficiency(record.attendance, record.estimated_payroll);
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_per_million() {
        assert_eq!(efficiency(Some(3_000_000.0), Some(150_000_000.0)), Some(20_000.0));
    }

    #[test]
    fn zero_or_missing_payroll_is_null() {
        assert_eq!(efficiency(Some(100.0), Some(0.0)), None);
        assert_eq!(efficiency(Some(100.0), None), None);
        assert_eq!(efficiency(None, Some(100.0)), None);
    }

    #[test]
    fn rederiving_is_stable() {
        let raw = AttendanceRecord::raw("A", 2000, Some(2.0e6), None, Some(1.0e8));
        let once = derive_metrics(raw);
        let twice = derive_metrics(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.efficiency, Some(20_000.0));
    }
}
