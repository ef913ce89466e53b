//! SOAP 1.1 envelope construction and XML → JSON conversion of responses.
use roxmltree::Node;
use serde_json::{Map, Value};
use thiserror::Error;

pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid XML element name: {0:?}")]
pub struct InvalidElementName(pub String);

/// Accepts names made of letters, digits, `_`, `-`, `.` and `:`, not starting with a digit, `-`, `.` or `:`.
pub fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

fn element_name(name: &str) -> Result<&str, InvalidElementName> {
    if is_valid_element_name(name) {
        Ok(name)
    } else {
        Err(InvalidElementName(name.to_string()))
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Value of the `SOAPAction` header when the descriptor does not declare one.
pub fn default_soap_action(operation: &str, namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) => format!("{}/{operation}", ns.trim_end_matches('/')),
        None => operation.to_string(),
    }
}

/// Wraps `operation` and its `args` in a SOAP 1.1 envelope.
///
/// Object args become child elements, arrays become repeated elements and any
/// other value becomes the operation's text content. The operation and every
/// object key must be a valid XML element name.
pub fn build_envelope(
    operation: &str,
    namespace: Option<&str>,
    args: Option<&Value>,
) -> Result<String, InvalidElementName> {
    let operation = element_name(operation)?;
    let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    xml.push_str(&format!(
        r#"<soap:Envelope xmlns:soap="{SOAP_ENVELOPE_NS}"><soap:Body>"#
    ));
    match namespace {
        Some(ns) => xml.push_str(&format!(r#"<{operation} xmlns="{}">"#, escape_xml(ns))),
        None => xml.push_str(&format!("<{operation}>")),
    }
    match args {
        Some(Value::Object(map)) => {
            for (name, value) in map {
                write_element(&mut xml, name, value)?;
            }
        }
        Some(Value::Null) | None => {}
        Some(other) => write_text(&mut xml, other),
    }
    xml.push_str(&format!("</{operation}></soap:Body></soap:Envelope>"));
    Ok(xml)
}

fn write_text(xml: &mut String, value: &Value) {
    match value {
        Value::String(s) => xml.push_str(&escape_xml(s)),
        other => xml.push_str(&escape_xml(&other.to_string())),
    }
}

fn write_element(xml: &mut String, name: &str, value: &Value) -> Result<(), InvalidElementName> {
    let name = element_name(name)?;
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(xml, name, item)?;
            }
        }
        Value::Null => xml.push_str(&format!("<{name}/>")),
        Value::Object(map) => {
            xml.push_str(&format!("<{name}>"));
            for (child, value) in map {
                write_element(xml, child, value)?;
            }
            xml.push_str(&format!("</{name}>"));
        }
        other => {
            xml.push_str(&format!("<{name}>"));
            write_text(xml, other);
            xml.push_str(&format!("</{name}>"));
        }
    }
    Ok(())
}

/// Converts a SOAP response to JSON.
///
/// The Envelope and Body wrappers are dropped so the operation response (or a
/// `Fault`) sits at the top level. Namespace prefixes are dropped, text-only
/// elements become strings, repeated siblings become arrays and `xsi:nil`
/// elements become null.
pub fn response_to_json(xml: &str) -> Result<Value, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    if root.tag_name().name() == "Envelope" {
        if let Some(body) = root
            .children()
            .find(|child| child.is_element() && child.tag_name().name() == "Body")
        {
            return Ok(children_to_object(body));
        }
    }

    let mut wrapped = Map::new();
    wrapped.insert(root.tag_name().name().to_string(), element_to_value(root));
    Ok(Value::Object(wrapped))
}

fn is_nil(node: Node) -> bool {
    node.attributes()
        .any(|attr| attr.name() == "nil" && attr.value() == "true")
}

fn element_to_value(node: Node) -> Value {
    if is_nil(node) {
        return Value::Null;
    }
    if node.children().any(|child| child.is_element()) {
        return children_to_object(node);
    }
    let text: String = node
        .children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect();
    Value::String(text.trim().to_string())
}

fn children_to_object(node: Node) -> Value {
    let mut map = Map::new();
    for child in node.children().filter(|child| child.is_element()) {
        let name = child.tag_name().name().to_string();
        let value = element_to_value(child);
        match map.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(name, value);
            }
        }
    }
    Value::Object(map)
}
