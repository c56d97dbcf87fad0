//! Column names of the payroll and agency tables.

pub const EMPLOYEE_NAME: &str = "EmployeeName";
pub const JOB_TITLE: &str = "JobTitle";
pub const AGENCY: &str = "Agency";
pub const STATUS: &str = "Status";
pub const NOTES: &str = "Notes";

pub const BASE_PAY: &str = "BasePay";
pub const OVERTIME_PAY: &str = "OvertimePay";
pub const OTHER_PAY: &str = "OtherPay";
pub const BENEFITS: &str = "Benefits";
pub const TOTAL_PAY: &str = "TotalPay";
pub const TOTAL_PAY_BENEFITS: &str = "TotalPayBenefits";
pub const YEAR: &str = "Year";

pub const IS_MANAGER: &str = "Is_Manager";

pub const AGENCY_CODE: &str = "Agency_Code";
pub const DEPARTMENT_TYPE: &str = "Department_Type";

/// Filled with 0 during cleaning. `Year` is integral, the rest are amounts.
pub const NUMERIC_COLUMNS: [&str; 7] = [
    BASE_PAY,
    OVERTIME_PAY,
    OTHER_PAY,
    BENEFITS,
    TOTAL_PAY,
    TOTAL_PAY_BENEFITS,
    YEAR,
];

/// Filled with [`MISSING_TEXT`] during cleaning.
pub const TEXT_COLUMNS: [&str; 4] = [EMPLOYEE_NAME, JOB_TITLE, AGENCY, STATUS];

pub const LOOKUP_COLUMNS: [&str; 3] = [AGENCY, AGENCY_CODE, DEPARTMENT_TYPE];

/// Rows containing this text anywhere are dropped during cleaning.
pub const SENTINEL: &str = "not provided";

pub const MISSING_TEXT: &str = "N/A";

/// Every column the cleaning operation requires in the raw file.
pub fn raw_required_columns() -> impl Iterator<Item = &'static str> {
    std::iter::once(NOTES)
        .chain(NUMERIC_COLUMNS)
        .chain(TEXT_COLUMNS)
}
