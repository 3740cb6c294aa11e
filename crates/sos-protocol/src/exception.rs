//! `ows:ExceptionReport` error documents.

use quick_xml::escape::escape;
use sos_common::SosError;

use crate::namespaces;

/// Render the error as an OWS 1.1 exception report.
///
/// The same document is produced whichever response format was requested.
pub fn exception_report(error: &SosError) -> String {
    let locator = error
        .locator()
        .map(|l| format!(r#" locator="{}""#, escape(l)))
        .unwrap_or_default();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ows:ExceptionReport xmlns:ows="{}" version="1.0.0">
  <ows:Exception exceptionCode="{}"{}>
    <ows:ExceptionText>{}</ows:ExceptionText>
  </ows:Exception>
</ows:ExceptionReport>"#,
        namespaces::OWS,
        error.exception_code(),
        locator,
        escape(&error.message())
    )
}
