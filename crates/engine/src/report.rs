// SPDX-License-Identifier: MIT

//! Run report serialization
//!
//! Run verbs hand `autopkg` a `--report-plist=<path>` argument and read
//! the property list back after the process exits. Any read or decode
//! failure collapses to [`TaskError::ReportDecodeFailure`]; callers get
//! the error alongside empty results rather than a partial report.

use ph_core::{RunReport, TaskError};
use std::path::Path;

/// Read and decode a report written by a run verb.
pub fn read_report(path: &Path) -> Result<RunReport, TaskError> {
    plist::from_file(path).map_err(|e| TaskError::ReportDecodeFailure(e.to_string()))
}

/// Write a report as an XML property list.
pub fn write_report(report: &RunReport, path: &Path) -> Result<(), TaskError> {
    plist::to_file_xml(path, report).map_err(|e| TaskError::ReportDecodeFailure(e.to_string()))
}

/// Serialize a report to XML property list bytes.
pub fn report_bytes(report: &RunReport) -> Result<Vec<u8>, TaskError> {
    let mut out = Vec::new();
    plist::to_writer_xml(&mut out, report)
        .map_err(|e| TaskError::ReportDecodeFailure(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
