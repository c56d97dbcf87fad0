#![allow(dead_code)]

use payscope::lookup::default_agency_codes;
use payscope::store::save_csv;
use payscope::{DataPaths, Workspace};
use std::fs;
use tempfile::TempDir;

/// Seven raw rows: one all-"Not Provided" row, one exact duplicate of row 3,
/// and one row with missing BasePay, EmployeeName and Status.
pub const RAW_CSV: &str = "\
EmployeeName,JobTitle,BasePay,OvertimePay,OtherPay,Benefits,TotalPay,TotalPayBenefits,Year,Notes,Agency,Status
NATHANIEL FORD,GENERAL MANAGER-METROPOLITAN TRANSIT AUTHORITY,167411.18,0,400184.25,,567595.43,567595.43,2011,,San Francisco,
GARY JIMENEZ,CAPTAIN III (POLICE DEPARTMENT),155966.02,245131.88,137811.38,,538909.28,538909.28,2011,,San Francisco Police Department,
ALBERT PARDINI,CAPTAIN III (POLICE DEPARTMENT),212739.13,106088.18,16452.6,,335279.91,335279.91,2012,,San Francisco Police Department,FT
Not Provided,Not Provided,Not Provided,Not Provided,Not Provided,Not Provided,0,0,2014,,San Francisco,
,Firefighter,,1000,0,0,1000,1000,2013,,San Francisco Fire Department,PT
ALBERT PARDINI,CAPTAIN III (POLICE DEPARTMENT),212739.13,106088.18,16452.6,,335279.91,335279.91,2012,,San Francisco Police Department,FT
PATRICIA JACKSON,FIRE CHIEF,100000,0,0,20000,100000,120000,2013,,Unknown Agency,FT
";

pub const RAW_ROWS: usize = 7;
pub const CLEANED_ROWS: usize = 5;

/// A temp directory holding only the raw file.
pub fn raw_workspace() -> (TempDir, Workspace) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let paths = DataPaths::under(dir.path());
    fs::write(&paths.data, RAW_CSV).unwrap();
    (dir, Workspace::new(paths))
}

/// A temp directory with the raw file, the bundled lookup table and the
/// cleaned table already produced.
pub fn cleaned_workspace() -> (TempDir, Workspace) {
    let (dir, workspace) = raw_workspace();
    let mut lookup = default_agency_codes().unwrap();
    save_csv(&mut lookup, &workspace.paths.lookup).unwrap();
    workspace.clean().unwrap();
    (dir, workspace)
}
