//! WPS 1.0.0 `Execute` request bodies.

use crate::error::TriggerError;
use crate::models::{StagePayload, StageRequest};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

type XmlResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

const EXECUTE_NAMESPACES: &[(&str, &str)] = &[
    ("version", "1.0.0"),
    ("service", "WPS"),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("xmlns", "http://www.opengis.net/wps/1.0.0"),
    ("xmlns:wfs", "http://www.opengis.net/wfs"),
    ("xmlns:wps", "http://www.opengis.net/wps/1.0.0"),
    ("xmlns:ows", "http://www.opengis.net/ows/1.1"),
    ("xmlns:gml", "http://www.opengis.net/gml"),
    ("xmlns:ogc", "http://www.opengis.net/ogc"),
    ("xmlns:wcs", "http://www.opengis.net/wcs/1.1.1"),
    ("xmlns:xlink", "http://www.w3.org/1999/xlink"),
    (
        "xsi:schemaLocation",
        "http://www.opengis.net/wps/1.0.0 http://schemas.opengis.net/wps/1.0.0/wpsAll.xsd",
    ),
];

/// Output identifier requested as raw data from every stage
pub const RAW_OUTPUT_IDENTIFIER: &str = "result";

/// Serialize a stage request into its `wps:Execute` document
pub fn encode_execute(request: &StageRequest) -> Result<String, TriggerError> {
    let encode_err = |reason: String| TriggerError::Encode {
        stage: request.stage,
        reason,
    };

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_execute(&mut writer, request).map_err(|e| encode_err(e.to_string()))?;

    String::from_utf8(writer.into_inner()).map_err(|e| encode_err(e.to_string()))
}

/// Encode a request and keep it alongside its body
pub fn prepare(request: StageRequest) -> Result<StagePayload, TriggerError> {
    let body = encode_execute(&request)?;
    Ok(StagePayload { request, body })
}

fn write_execute<W: Write>(writer: &mut Writer<W>, request: &StageRequest) -> XmlResult {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("wps:Execute");
    for attr in EXECUTE_NAMESPACES {
        root.push_attribute(*attr);
    }
    writer.write_event(Event::Start(root))?;

    text_element(writer, "ows:Identifier", request.identifier)?;

    start(writer, "wps:DataInputs")?;
    for input in request.inputs {
        start(writer, "wps:Input")?;
        text_element(writer, "ows:Identifier", input.name)?;
        start(writer, "wps:Data")?;
        text_element(writer, "wps:LiteralData", &input.value.to_string())?;
        end(writer, "wps:Data")?;
        end(writer, "wps:Input")?;
    }
    end(writer, "wps:DataInputs")?;

    start(writer, "wps:ResponseForm")?;
    start(writer, "wps:RawDataOutput")?;
    text_element(writer, "ows:Identifier", RAW_OUTPUT_IDENTIFIER)?;
    end(writer, "wps:RawDataOutput")?;
    end(writer, "wps:ResponseForm")?;

    end(writer, "wps:Execute")
}

fn start<W: Write>(writer: &mut Writer<W>, name: &str) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> XmlResult {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> XmlResult {
    start(writer, name)?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    end(writer, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PARSE_REQUEST, PROCESS_REQUEST};
    use quick_xml::reader::Reader;

    /// Process identifier, input pairs and raw output identifier of an Execute document
    fn read_execute(xml: &str) -> (String, Vec<(String, String)>, String) {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut path: Vec<String> = Vec::new();

        let mut identifier = String::new();
        let mut inputs = Vec::new();
        let mut output = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                }
                Ok(Event::End(_)) => {
                    path.pop();
                }
                Ok(Event::Text(e)) => {
                    let txt = String::from_utf8_lossy(e.as_ref()).to_string();
                    let parent = path.iter().rev().nth(1).map(String::as_str);
                    match (path.last().map(String::as_str), parent) {
                        (Some("ows:Identifier"), Some("wps:Execute")) => identifier = txt,
                        (Some("ows:Identifier"), Some("wps:Input")) => {
                            inputs.push((txt, String::new()))
                        }
                        (Some("wps:LiteralData"), _) => {
                            if let Some(last) = inputs.last_mut() {
                                last.1 = txt;
                            }
                        }
                        (Some("ows:Identifier"), Some("wps:RawDataOutput")) => output = txt,
                        _ => (),
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => panic!("invalid XML: {}", e),
                _ => (),
            }
            buf.clear();
        }

        (identifier, inputs, output)
    }

    #[test]
    fn test_parse_request_document() {
        let xml = encode_execute(&PARSE_REQUEST).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<wps:Execute version="1.0.0" service="WPS""#));

        let (identifier, inputs, output) = read_execute(&xml);
        assert_eq!(identifier, "groovy:nc_parse");
        assert_eq!(
            inputs,
            vec![("processFileLimit".to_string(), "20".to_string())]
        );
        assert_eq!(output, "result");
    }

    #[test]
    fn test_process_request_document() {
        let xml = encode_execute(&PROCESS_REQUEST).unwrap();

        let (identifier, inputs, output) = read_execute(&xml);
        assert_eq!(identifier, "groovy:nc_process");
        assert_eq!(
            inputs,
            vec![
                ("locationPrecisionFilter".to_string(), "20".to_string()),
                ("processTracksLimit".to_string(), "20".to_string()),
            ]
        );
        assert_eq!(output, "result");
    }

    #[test]
    fn test_prepare_is_stable() {
        let first = prepare(PARSE_REQUEST).unwrap();
        let second = prepare(PARSE_REQUEST).unwrap();
        assert_eq!(first.body, second.body);
        assert_eq!(first.stage(), crate::models::Stage::Parse);
    }
}
