//! A small XML element tree for Query-protocol responses.
//!
//! Elements are matched by local name, so namespace prefixes and the default
//! `xmlns` on AWS responses never matter. Attributes are dropped; no AWS
//! Query response carries data in them.

use crate::error::ClientError;
use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    /// Local element name.
    pub name: String,
    /// Concatenated character data directly inside this element.
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Parse a whole document and return its root element.
    pub fn parse(xml: &str) -> Result<XmlNode, ClientError> {
        // Character data is kept exactly as received.
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    stack.push(XmlNode {
                        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                        ..Default::default()
                    });
                }
                Ok(Event::Empty(e)) => {
                    let node = XmlNode {
                        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                        ..Default::default()
                    };
                    attach(&mut stack, &mut root, node)?;
                }
                Ok(Event::End(_)) => {
                    let mut node = stack
                        .pop()
                        .ok_or_else(|| ClientError::parse("unbalanced closing tag"))?;
                    // Indentation between child elements is not data.
                    if !node.children.is_empty() && node.text.trim().is_empty() {
                        node.text.clear();
                    }
                    attach(&mut stack, &mut root, node)?;
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| ClientError::parse(format!("bad XML text: {}", e)))?;
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text);
                    }
                }
                Ok(Event::CData(c)) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(ClientError::parse(format!(
                        "malformed XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
            }
        }

        if !stack.is_empty() {
            return Err(ClientError::parse("unexpected end of XML document"));
        }
        root.ok_or_else(|| ClientError::parse("empty XML document"))
    }

    /// Parse a Query-protocol success body and return the `{action}Result`
    /// element. The root must be `{action}Response`; a missing result
    /// element (operations with no output) yields an empty node.
    pub fn parse_result(xml: &str, action: &str) -> Result<XmlNode, ClientError> {
        let root = Self::parse(xml)?;
        let expected = format!("{}Response", action);
        if root.name != expected {
            return Err(ClientError::parse(format!(
                "expected <{}> but found <{}>",
                expected, root.name
            )));
        }
        let result_name = format!("{}Result", action);
        Ok(root
            .children
            .into_iter()
            .find(|c| c.name == result_name)
            .unwrap_or_else(|| XmlNode {
                name: result_name,
                ..Default::default()
            }))
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a path of child names, e.g. `["Error", "Code"]`.
    pub fn path(&self, names: &[&str]) -> Option<&XmlNode> {
        names.iter().try_fold(self, |node, name| node.child(name))
    }

    /// The `<member>` elements of list `name`; empty when the list is absent.
    pub fn members(&self, name: &str) -> Vec<&XmlNode> {
        self.child(name)
            .map(|list| list.children_named("member").collect())
            .unwrap_or_default()
    }

    /// Decode each `<member>` of list `name`.
    pub fn member_list<T, F>(&self, name: &str, decode: F) -> Result<Vec<T>, ClientError>
    where
        F: Fn(&XmlNode) -> Result<T, ClientError>,
    {
        self.members(name).into_iter().map(decode).collect()
    }

    /// Text of child `name`.
    pub fn string(&self, name: &str) -> Option<String> {
        self.child(name).map(|c| c.text.clone())
    }

    pub fn string_list(&self, name: &str) -> Vec<String> {
        self.members(name).into_iter().map(|m| m.text.clone()).collect()
    }

    /// `<entry><key/><value/></entry>` map encoding.
    pub fn entries(&self, name: &str) -> Vec<(String, String)> {
        self.child(name)
            .map(|map| {
                map.children_named("entry")
                    .filter_map(|e| Some((e.string("key")?, e.string("value").unwrap_or_default())))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn int(&self, name: &str) -> Result<Option<i32>, ClientError> {
        self.scalar(name, "integer", |s| s.parse::<i32>().ok())
    }

    pub fn long(&self, name: &str) -> Result<Option<i64>, ClientError> {
        self.scalar(name, "long", |s| s.parse::<i64>().ok())
    }

    pub fn double(&self, name: &str) -> Result<Option<f64>, ClientError> {
        self.scalar(name, "double", |s| s.parse::<f64>().ok())
    }

    pub fn bool(&self, name: &str) -> Result<Option<bool>, ClientError> {
        self.scalar(name, "boolean", |s| match s {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        })
    }

    /// ISO-8601 timestamp, with or without an explicit offset (UTC assumed).
    pub fn timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>, ClientError> {
        self.scalar(name, "timestamp", parse_iso8601)
    }

    fn scalar<T>(
        &self,
        name: &str,
        type_name: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, ClientError> {
        match self.child(name) {
            None => Ok(None),
            Some(node) => {
                let raw = node.text.trim();
                parse(raw).map(Some).ok_or_else(|| {
                    ClientError::parse(format!(
                        "<{}> is not a valid {}: '{}'",
                        name, type_name, raw
                    ))
                })
            }
        }
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<(), ClientError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(ClientError::parse("multiple root elements")),
    }
    Ok(())
}

pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DescribeThingsResponse xmlns="http://example.com/doc/2012-06-01/">
  <DescribeThingsResult>
    <Things>
      <member><Name>a</Name><Port>80</Port></member>
      <member><Name>b &amp; c</Name><Port>443</Port></member>
    </Things>
    <Empty/>
    <Enabled>true</Enabled>
    <Created>2014-01-17T18:55:04.870Z</Created>
    <Attrs>
      <entry><key>k1</key><value>v1</value></entry>
      <entry><key>k2</key><value></value></entry>
    </Attrs>
    <Unknown><Nested>ignored</Nested></Unknown>
  </DescribeThingsResult>
  <ResponseMetadata><RequestId>req-1</RequestId></ResponseMetadata>
</DescribeThingsResponse>"#;

    #[test]
    fn parse_result_unwraps_result_element() {
        let result = XmlNode::parse_result(DOC, "DescribeThings").unwrap();
        assert_eq!(result.name, "DescribeThingsResult");
        let things = result.members("Things");
        assert_eq!(things.len(), 2);
        assert_eq!(things[1].string("Name").as_deref(), Some("b & c"));
        assert_eq!(things[0].int("Port").unwrap(), Some(80));
    }

    #[test]
    fn wrong_root_is_rejected() {
        let err = XmlNode::parse_result(DOC, "CreateThing").unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[test]
    fn missing_result_element_is_empty() {
        let xml = "<DeleteThingResponse><ResponseMetadata><RequestId>r</RequestId></ResponseMetadata></DeleteThingResponse>";
        let result = XmlNode::parse_result(xml, "DeleteThing").unwrap();
        assert!(result.children.is_empty());
    }

    #[test]
    fn absent_and_empty_lists() {
        let result = XmlNode::parse_result(DOC, "DescribeThings").unwrap();
        assert!(result.members("Missing").is_empty());
        assert!(result.string_list("Empty").is_empty());
    }

    #[test]
    fn scalars_are_strict() {
        let node = XmlNode::parse("<R><N>12x</N><B>yes</B><T>2014-01-17T18:55:04Z</T></R>").unwrap();
        assert!(node.int("N").is_err());
        assert!(node.bool("B").is_err());
        assert_eq!(node.int("Missing").unwrap(), None);
        assert_eq!(
            node.timestamp("T").unwrap(),
            Some(Utc.with_ymd_and_hms(2014, 1, 17, 18, 55, 4).unwrap())
        );
    }

    #[test]
    fn timestamps_with_fraction() {
        let result = XmlNode::parse_result(DOC, "DescribeThings").unwrap();
        let created = result.timestamp("Created").unwrap().unwrap();
        assert_eq!(created.timestamp_subsec_millis(), 870);
        assert_eq!(result.bool("Enabled").unwrap(), Some(true));
    }

    #[test]
    fn entry_maps() {
        let result = XmlNode::parse_result(DOC, "DescribeThings").unwrap();
        assert_eq!(
            result.entries("Attrs"),
            vec![("k1".to_string(), "v1".to_string()), ("k2".to_string(), String::new())]
        );
    }

    #[test]
    fn path_lookup() {
        let root = XmlNode::parse(DOC).unwrap();
        assert_eq!(
            root.path(&["ResponseMetadata", "RequestId"]).map(|n| n.text.as_str()),
            Some("req-1")
        );
    }

    #[test]
    fn string_values_keep_surrounding_whitespace() {
        let node = XmlNode::parse(
            "<R>\n  <V>  two leading, one trailing </V>\n  <S> </S>\n  <E>a &lt; b &amp; café</E>\n</R>",
        )
        .unwrap();
        assert_eq!(node.string("V").as_deref(), Some("  two leading, one trailing "));
        assert_eq!(node.string("S").as_deref(), Some(" "));
        assert_eq!(node.string("E").as_deref(), Some("a < b & café"));
        assert_eq!(node.text, "");
    }

    #[test]
    fn formatting_between_elements_is_dropped() {
        let result = XmlNode::parse_result(DOC, "DescribeThings").unwrap();
        assert_eq!(result.text, "");
        assert_eq!(result.members("Things")[0].text, "");
        assert_eq!(result.int("Port").unwrap(), None);
        let padded = XmlNode::parse("<R><N> 42 </N></R>").unwrap();
        assert_eq!(padded.int("N").unwrap(), Some(42));
    }

    #[test]
    fn malformed_documents() {
        assert!(XmlNode::parse("<a><b></a>").is_err());
        assert!(XmlNode::parse("").is_err());
        assert!(XmlNode::parse("not xml").is_err());
    }
}
