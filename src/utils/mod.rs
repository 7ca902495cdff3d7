pub mod wps_xml;
