//! Wire types for the export file (`jukaconfig.json`).
//!
//! These mirror the JSON shape one-to-one. Conversion to and from the
//! in-memory model is done by `emitter` and `parser`. Readers are lenient
//! the way the player is: numbers may arrive as strings, dimensions may be
//! `null` or `"auto"`, and absent keys fall back to defaults.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Default name of the exported file.
pub const EXPORT_FILE_NAME: &str = "jukaconfig.json";

/// Top-level export object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub author: String,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub description: String,
    /// User variables flattened together with the reserved metadata keys.
    #[serde(default, deserialize_with = "de_lenient_map")]
    pub variables: Map<String, Value>,
    /// `None` only when the key is absent, which is rejected on import.
    #[serde(default)]
    pub scenes: Option<Vec<WireScene>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireScene {
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub name: String,
    #[serde(default)]
    pub elements: Vec<WireElement>,
}

/// One element object. Field order is emit order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireElement {
    #[serde(rename = "type", default, deserialize_with = "de_lenient_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "de_lenient_int")]
    pub x: i32,
    #[serde(default, deserialize_with = "de_lenient_int")]
    pub y: i32,
    #[serde(default, deserialize_with = "de_dimension", skip_serializing_if = "Option::is_none")]
    pub width: Option<WireDimension>,
    #[serde(default, deserialize_with = "de_dimension", skip_serializing_if = "Option::is_none")]
    pub height: Option<WireDimension>,

    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Fraction in `[0, 1]`.
    #[serde(default, deserialize_with = "de_lenient_f64", skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub scene_change: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub external_app_path: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub external_app_return: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub variable_change: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub variable_change_value: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Generic trigger target written by older editors; read-only.
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing)]
    pub trigger_target: Option<String>,
    /// Generic trigger value written by older editors; read-only.
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing)]
    pub trigger_value: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub list_variable: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub video_variable: Option<String>,
}

// ─── Dimensions ──────────────────────────────────────────────────────────

/// A width or height on the wire: an integer, or `null` for "size me from
/// my content". Strings holding a number are accepted; any other string
/// (including `"auto"`) reads as `Auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireDimension {
    Px(i32),
    Auto,
}

impl Serialize for WireDimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WireDimension::Px(n) => serializer.serialize_i32(*n),
            WireDimension::Auto => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for WireDimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(WireDimension::Auto),
            Value::Number(n) => n
                .as_f64()
                .map(|f| WireDimension::Px(f.round() as i32))
                .ok_or_else(|| D::Error::custom("dimension out of range")),
            Value::String(s) => Ok(lenient_number(&s)
                .map(|f| WireDimension::Px(f.round() as i32))
                .unwrap_or(WireDimension::Auto)),
            other => Err(D::Error::custom(format!(
                "expected a number or null for a dimension, got {other}"
            ))),
        }
    }
}

// ─── Lenient field readers ───────────────────────────────────────────────

/// Leading numeric prefix of a string, the way the browser's `parseInt`
/// reads `"120px"`.
pub fn lenient_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse::<f64>().ok()
}

/// A JSON scalar as a string. `None` for null, arrays and objects.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn de_lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).unwrap_or_default())
}

fn de_opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

fn de_lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let n = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => lenient_number(s),
        _ => None,
    };
    Ok(n.map(|f| f.round() as i32).unwrap_or(0))
}

fn de_lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => lenient_number(s),
        _ => None,
    })
}

/// An object, or empty for `null` and any other non-object.
fn de_lenient_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Map<String, Value>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => {
            log::warn!("ignoring non-object variables: {other}");
            Ok(Map::new())
        }
    }
}

fn de_dimension<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<WireDimension>, D::Error> {
    WireDimension::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dimension_variants() {
        let el: WireElement =
            serde_json::from_str(r#"{"type":"button","width":null,"height":"40px"}"#).unwrap();
        assert_eq!(el.width, Some(WireDimension::Auto));
        assert_eq!(el.height, Some(WireDimension::Px(40)));

        let el: WireElement = serde_json::from_str(r#"{"type":"button","width":"auto"}"#).unwrap();
        assert_eq!(el.width, Some(WireDimension::Auto));
        assert_eq!(el.height, None);
    }

    #[test]
    fn coordinates_accept_strings_and_floats() {
        let el: WireElement =
            serde_json::from_str(r#"{"type":"label","x":"12","y":7.6}"#).unwrap();
        assert_eq!((el.x, el.y), (12, 8));
    }

    #[test]
    fn opacity_accepts_strings() {
        let el: WireElement =
            serde_json::from_str(r#"{"type":"label","opacity":"0.25"}"#).unwrap();
        assert_eq!(el.opacity, Some(0.25));

        let el: WireElement =
            serde_json::from_str(r#"{"type":"label","opacity":"half"}"#).unwrap();
        assert_eq!(el.opacity, None);
    }

    #[test]
    fn null_variables_read_as_empty() {
        let doc: Document =
            serde_json::from_str(r#"{"variables":null,"scenes":[]}"#).unwrap();
        assert!(doc.variables.is_empty());

        let doc: Document = serde_json::from_str(r#"{"variables":"x","scenes":[]}"#).unwrap();
        assert!(doc.variables.is_empty());
    }

    #[test]
    fn null_strings_read_as_absent() {
        let el: WireElement =
            serde_json::from_str(r#"{"type":"video","videoVariable":null,"text":5}"#).unwrap();
        assert_eq!(el.video_variable, None);
        assert_eq!(el.text.as_deref(), Some("5"));
    }

    #[test]
    fn legacy_trigger_fields_are_read_not_written() {
        let el: WireElement = serde_json::from_str(
            r#"{"type":"button","trigger":"change_scene","triggerTarget":"Menu"}"#,
        )
        .unwrap();
        assert_eq!(el.trigger_target.as_deref(), Some("Menu"));

        let out = serde_json::to_value(&el).unwrap();
        assert!(out.get("triggerTarget").is_none());
    }

    #[test]
    fn auto_dimension_serializes_as_null() {
        let el = WireElement {
            kind: "button".into(),
            width: Some(WireDimension::Auto),
            height: Some(WireDimension::Px(40)),
            ..Default::default()
        };
        let out = serde_json::to_value(&el).unwrap();
        assert_eq!(out["width"], Value::Null);
        assert_eq!(out["height"], Value::from(40));
    }

    #[test]
    fn lenient_number_prefix() {
        assert_eq!(lenient_number("120px"), Some(120.0));
        assert_eq!(lenient_number(" -3 "), Some(-3.0));
        assert_eq!(lenient_number("auto"), None);
    }
}
