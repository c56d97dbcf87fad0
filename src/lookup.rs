//! Bundled agency lookup table.

use crate::error::Result;
use crate::schema::{AGENCY, AGENCY_CODE, DEPARTMENT_TYPE};
use polars::prelude::*;

const AGENCIES: [(&str, &str, &str); 10] = [
    ("San Francisco", "SF-001", "General"),
    ("San Francisco Police Department", "SF-PD", "Public Safety"),
    ("San Francisco Fire Department", "SF-FD", "Public Safety"),
    ("San Francisco Sheriff's Department", "SF-SD", "Public Safety"),
    ("San Francisco Public Works", "SF-PW", "Infrastructure"),
    ("San Francisco Municipal Transportation Agency", "SF-MTA", "Transportation"),
    ("San Francisco Recreation and Parks", "SF-RP", "Recreation"),
    ("San Francisco Public Health", "SF-PH", "Health"),
    ("San Francisco Public Utilities Commission", "SF-PUC", "Utilities"),
    ("San Francisco City Attorney", "SF-CA", "Legal"),
];

pub fn default_agency_codes() -> Result<DataFrame> {
    Ok(df!(
        AGENCY => AGENCIES.iter().map(|a| a.0).collect::<Vec<_>>(),
        AGENCY_CODE => AGENCIES.iter().map(|a| a.1).collect::<Vec<_>>(),
        DEPARTMENT_TYPE => AGENCIES.iter().map(|a| a.2).collect::<Vec<_>>()
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agencies_are_unique_keys() {
        let df = default_agency_codes().unwrap();
        assert_eq!(df.height(), 10);
        assert_eq!(df.column(AGENCY).unwrap().as_materialized_series().n_unique().unwrap(), 10);
    }
}
