//! O&M 1.0.0 observation documents.
//!
//! An [`ObservationCollection`] is the formatter-independent result of a
//! GetObservation request. [`ObservationCollection::to_xml`] renders it in
//! either supported response format:
//!
//! - OOSTethys: `swe:TextBlock` with a space block separator
//! - IOOS SOS 1.0: newline block separator, plus a `swe:DataRecord` describing
//!   each field's units and fill value

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use sos_common::LatLonBounds;
use thiserror::Error;

use crate::format::ResponseFormat;
use crate::{gml_id, namespaces};

/// Definition URL of the sampling-time field.
pub const SAMPLING_TIME_DEFINITION: &str = "http://www.opengis.net/def/property/OGC/0/SamplingTime";

const EPSG_4326: &str = "http://www.opengis.net/def/crs/EPSG/0/4326";

/// Record delimiter of extractor data blocks.
pub const RECORD_SEPARATOR: char = ';';
/// Field delimiter of extractor data blocks.
pub const FIELD_SEPARATOR: char = ',';
/// Decimal mark of extractor data blocks.
pub const DECIMAL_SEPARATOR: char = '.';

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Metadata of one observed property or record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    /// Variable name in the dataset.
    pub name: String,
    /// Observed-property URL, when the variable has a standard name.
    pub url: Option<String>,
    pub units: Option<String>,
    pub fill_value: Option<String>,
}

impl PropertyInfo {
    /// Reference used for `xlink:href` and `definition` attributes.
    pub fn definition(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.name)
    }
}

/// Observations of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationMember {
    /// URN of the entity.
    pub procedure: String,
    pub name: String,
    pub bounds: Option<LatLonBounds>,
    pub start: Option<String>,
    pub end: Option<String>,
    /// Non-empty records, each `time,field1,field2,...`.
    pub records: Vec<String>,
}

/// Result of a GetObservation request, ready for formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationCollection {
    pub offering: String,
    /// Envelope of every member.
    pub bounds: Option<LatLonBounds>,
    /// Requested properties, without auto-completed vertical axes.
    pub observed_properties: Vec<PropertyInfo>,
    /// Record fields after the leading time field.
    pub fields: Vec<PropertyInfo>,
    pub members: Vec<ObservationMember>,
}

/// Separators of a `swe:TextBlock`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEncoding {
    pub decimal_separator: char,
    pub token_separator: char,
    pub block_separator: char,
}

impl TextEncoding {
    pub fn for_format(format: ResponseFormat) -> Self {
        let block_separator = match format {
            ResponseFormat::OosTethys => ' ',
            ResponseFormat::Ioos10 => '\n',
        };
        Self {
            decimal_separator: '.',
            token_separator: ',',
            block_separator,
        }
    }

    /// Rewrite a data block into this encoding's separators.
    pub fn encode(&self, block: &str) -> String {
        block
            .chars()
            .map(|c| match c {
                DECIMAL_SEPARATOR => self.decimal_separator,
                FIELD_SEPARATOR => self.token_separator,
                RECORD_SEPARATOR => self.block_separator,
                other => other,
            })
            .collect()
    }

    /// Join records and rewrite them into this encoding.
    pub fn encode_records(&self, records: &[String]) -> String {
        self.encode(&records.join(&RECORD_SEPARATOR.to_string()))
    }

    fn block_separator_attribute(&self) -> String {
        match self.block_separator {
            '\n' => "&#10;".to_string(),
            c => quick_xml::escape::escape(&c.to_string()).into_owned(),
        }
    }
}

impl ObservationCollection {
    /// Render the collection in the given response format.
    pub fn to_xml(&self, format: ResponseFormat) -> Result<String, DocumentError> {
        let encoding = TextEncoding::for_format(format);
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer
            .create_element("om:ObservationCollection")
            .with_attributes([
                ("xmlns:om", namespaces::OM),
                ("xmlns:gml", namespaces::GML),
                ("xmlns:swe", namespaces::SWE),
                ("xmlns:xlink", namespaces::XLINK),
                ("xmlns:xsi", namespaces::XSI),
                ("gml:id", gml_id(&self.offering).as_str()),
            ])
            .write_inner_content(|w| {
                w.create_element("gml:name")
                    .write_text_content(BytesText::new(&self.offering))?;
                if let Some(bounds) = &self.bounds {
                    write_bounds(w, bounds)?;
                }
                for member in &self.members {
                    w.create_element("om:member").write_inner_content(|w| {
                        self.write_observation(w, member, format, &encoding)
                    })?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(String::from_utf8(bytes)?)
    }

    fn write_observation(
        &self,
        w: &mut Writer<Vec<u8>>,
        member: &ObservationMember,
        format: ResponseFormat,
        encoding: &TextEncoding,
    ) -> quick_xml::Result<()> {
        w.create_element("om:Observation")
            .with_attribute(("gml:id", gml_id(&member.name).as_str()))
            .write_inner_content(|w| {
                w.create_element("gml:name")
                    .write_text_content(BytesText::new(&member.name))?;
                if let Some(bounds) = &member.bounds {
                    write_bounds(w, bounds)?;
                }

                w.create_element("om:samplingTime").write_inner_content(|w| {
                    w.create_element("gml:TimePeriod").write_inner_content(|w| {
                        write_position(w, "gml:beginPosition", member.start.as_deref())?;
                        write_position(w, "gml:endPosition", member.end.as_deref())?;
                        Ok::<(), quick_xml::Error>(())
                    })?;
                    Ok::<(), quick_xml::Error>(())
                })?;

                w.create_element("om:procedure")
                    .with_attribute(("xlink:href", member.procedure.as_str()))
                    .write_empty()?;
                for property in &self.observed_properties {
                    w.create_element("om:observedProperty")
                        .with_attribute(("xlink:href", property.definition()))
                        .write_empty()?;
                }
                w.create_element("om:featureOfInterest")
                    .with_attribute(("xlink:href", member.procedure.as_str()))
                    .write_empty()?;

                w.create_element("om:result").write_inner_content(|w| {
                    self.write_data_array(w, member, format, encoding)
                })?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    }

    fn write_data_array(
        &self,
        w: &mut Writer<Vec<u8>>,
        member: &ObservationMember,
        format: ResponseFormat,
        encoding: &TextEncoding,
    ) -> quick_xml::Result<()> {
        w.create_element("swe:DataArray").write_inner_content(|w| {
            w.create_element("swe:elementCount").write_inner_content(|w| {
                w.create_element("swe:Count").write_inner_content(|w| {
                    w.create_element("swe:value")
                        .write_text_content(BytesText::new(&member.records.len().to_string()))?;
                    Ok::<(), quick_xml::Error>(())
                })?;
                Ok::<(), quick_xml::Error>(())
            })?;

            if format == ResponseFormat::Ioos10 {
                w.create_element("swe:elementType")
                    .with_attribute(("name", "observations"))
                    .write_inner_content(|w| {
                        w.create_element("swe:DataRecord")
                            .write_inner_content(|w| self.write_fields(w))?;
                        Ok::<(), quick_xml::Error>(())
                    })?;
            }

            // Pre-escaped: a literal newline would be normalized away by parsers.
            let block_separator = encoding.block_separator_attribute();
            let raw_block_separator: (&[u8], &[u8]) =
                (b"blockSeparator", block_separator.as_bytes());
            let decimal = encoding.decimal_separator.to_string();
            let token = encoding.token_separator.to_string();
            w.create_element("swe:encoding").write_inner_content(|w| {
                w.create_element("swe:TextBlock")
                    .with_attribute(("decimalSeparator", decimal.as_str()))
                    .with_attribute(("tokenSeparator", token.as_str()))
                    .with_attribute(Attribute::from(raw_block_separator))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;

            w.create_element("swe:values")
                .write_text_content(BytesText::new(&encoding.encode_records(&member.records)))?;
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok(())
    }

    fn write_fields(&self, w: &mut Writer<Vec<u8>>) -> quick_xml::Result<()> {
        w.create_element("swe:field")
            .with_attribute(("name", "time"))
            .write_inner_content(|w| {
                w.create_element("swe:Time")
                    .with_attribute(("definition", SAMPLING_TIME_DEFINITION))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;

        for field in &self.fields {
            w.create_element("swe:field")
                .with_attribute(("name", field.name.as_str()))
                .write_inner_content(|w| {
                    w.create_element("swe:Quantity")
                        .with_attribute(("definition", field.definition()))
                        .write_inner_content(|w| {
                            if let Some(units) = &field.units {
                                w.create_element("swe:uom")
                                    .with_attribute(("code", units.as_str()))
                                    .write_empty()?;
                            }
                            if let Some(fill) = &field.fill_value {
                                w.create_element("swe:nilValues").write_inner_content(|w| {
                                    w.create_element("swe:nilValue")
                                        .with_attribute(("reason", "missing"))
                                        .write_text_content(BytesText::new(fill))?;
                                    Ok::<(), quick_xml::Error>(())
                                })?;
                            }
                            Ok::<(), quick_xml::Error>(())
                        })?;
                    Ok::<(), quick_xml::Error>(())
                })?;
        }
        Ok(())
    }
}

fn write_bounds(w: &mut Writer<Vec<u8>>, bounds: &LatLonBounds) -> quick_xml::Result<()> {
    w.create_element("gml:boundedBy").write_inner_content(|w| {
        w.create_element("gml:Envelope")
            .with_attribute(("srsName", EPSG_4326))
            .write_inner_content(|w| {
                w.create_element("gml:lowerCorner")
                    .write_text_content(BytesText::new(&bounds.lower_corner()))?;
                w.create_element("gml:upperCorner")
                    .write_text_content(BytesText::new(&bounds.upper_corner()))?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_position(
    w: &mut Writer<Vec<u8>>,
    name: &str,
    value: Option<&str>,
) -> quick_xml::Result<()> {
    match value {
        Some(v) => {
            w.create_element(name).write_text_content(BytesText::new(v))?;
        }
        None => {
            w.create_element(name)
                .with_attribute(("indeterminatePosition", "unknown"))
                .write_empty()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> ObservationCollection {
        let temp = PropertyInfo {
            name: "temp".to_string(),
            url: Some("http://mmisw.org/ont/cf/parameter/sea_water_temperature".to_string()),
            units: Some("degC".to_string()),
            fill_value: Some("-999".to_string()),
        };
        ObservationCollection {
            offering: "urn:ioos:station:test:buoy1".to_string(),
            bounds: Some(LatLonBounds::point(41.5, -70.6)),
            observed_properties: vec![temp.clone()],
            fields: vec![temp],
            members: vec![ObservationMember {
                procedure: "urn:ioos:station:test:buoy1".to_string(),
                name: "buoy1".to_string(),
                bounds: Some(LatLonBounds::point(41.5, -70.6)),
                start: Some("2020-01-01T00:00:00Z".to_string()),
                end: Some("2020-01-01T01:00:00Z".to_string()),
                records: vec![
                    "2020-01-01T00:00:00Z,10.5".to_string(),
                    "2020-01-01T01:00:00Z,11".to_string(),
                ],
            }],
        }
    }

    #[test]
    fn test_text_encoding() {
        let oos = TextEncoding::for_format(ResponseFormat::OosTethys);
        assert_eq!(oos.encode("a,1.5;b,2"), "a,1.5 b,2");

        let ioos = TextEncoding::for_format(ResponseFormat::Ioos10);
        assert_eq!(
            ioos.encode_records(&["a,1".to_string(), "b,2".to_string()]),
            "a,1\nb,2"
        );
    }

    #[test]
    fn test_oostethys_document() {
        let xml = collection().to_xml(ResponseFormat::OosTethys).unwrap();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"gml:id="urn_-_ioos_-_station_-_test_-_buoy1""#));
        assert!(xml.contains("<gml:lowerCorner>41.5000 -70.6000</gml:lowerCorner>"));
        assert!(xml.contains(r#"<om:procedure xlink:href="urn:ioos:station:test:buoy1"/>"#));
        assert!(xml.contains(r#"blockSeparator=" ""#));
        assert!(xml.contains(
            "<swe:values>2020-01-01T00:00:00Z,10.5 2020-01-01T01:00:00Z,11</swe:values>"
        ));
        assert!(!xml.contains("swe:DataRecord"));
    }

    #[test]
    fn test_ioos_document_describes_fields() {
        let xml = collection().to_xml(ResponseFormat::Ioos10).unwrap();

        assert!(xml.contains(r#"blockSeparator="&#10;""#));
        assert!(xml.contains(r#"<swe:uom code="degC"/>"#));
        assert!(xml.contains(r#"<swe:nilValue reason="missing">-999</swe:nilValue>"#));
        assert!(xml.contains(SAMPLING_TIME_DEFINITION));
    }

    #[test]
    fn test_missing_times_are_indeterminate() {
        let mut c = collection();
        c.members[0].start = None;
        let xml = c.to_xml(ResponseFormat::OosTethys).unwrap();
        assert!(xml.contains(r#"<gml:beginPosition indeterminatePosition="unknown"/>"#));
    }
}
