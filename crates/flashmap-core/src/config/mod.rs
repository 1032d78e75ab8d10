use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Layered JSON configuration.
///
/// Consumers read one top-level section each (`parse`, `layout`, `levels`, `glyphs`, `wrap`,
/// `fonts`, `svg`) through [`FlashmapConfig::section`]; keys missing from the JSON keep their
/// defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashmapConfig(Value);

impl Default for FlashmapConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl FlashmapConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(Error::InvalidConfig {
                section: String::new(),
                message: "top-level config must be a JSON object".to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.lookup(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?.as_f64()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // `from_value` accepts any JSON value; coerce to an object so this never panics.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    /// Deserializes one top-level section.
    ///
    /// The section is merged over `T::default()` first, so nested structs keep their own
    /// defaults for keys the JSON leaves out.
    pub fn section<T>(&self, key: &str) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let invalid = |err: serde_json::Error| Error::InvalidConfig {
            section: key.to_string(),
            message: err.to_string(),
        };
        match self.0.as_object().and_then(|root| root.get(key)) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => {
                let mut merged = serde_json::to_value(T::default()).map_err(invalid)?;
                deep_merge_value(&mut merged, value);
                T::deserialize(&merged).map_err(invalid)
            }
        }
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    #[serde(default, rename_all = "camelCase")]
    struct Probe {
        leaf_gap: f64,
        name: String,
        inner: Inner,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default, rename_all = "camelCase")]
    struct Inner {
        width: f64,
        height: f64,
    }

    impl Default for Inner {
        fn default() -> Self {
            Self {
                width: 3.0,
                height: 4.0,
            }
        }
    }

    #[test]
    fn deep_merge_keeps_sibling_keys() {
        let mut cfg = FlashmapConfig::from_value(json!({"layout": {"leafGap": 15, "rootX": 160}}));
        cfg.deep_merge(&json!({"layout": {"leafGap": 30}}));
        assert_eq!(cfg.get_f64("layout.leafGap"), Some(30.0));
        assert_eq!(cfg.get_f64("layout.rootX"), Some(160.0));
    }

    #[test]
    fn set_value_creates_intermediate_objects() {
        let mut cfg = FlashmapConfig::default();
        cfg.set_value("wrap.shortLineUnits", json!(4));
        assert_eq!(cfg.get_f64("wrap.shortLineUnits"), Some(4.0));
    }

    #[test]
    fn set_value_coerces_non_object_root() {
        let mut cfg = FlashmapConfig::from_value(json!(42));
        cfg.set_value("a.b", json!("x"));
        assert_eq!(cfg.get_str("a.b"), Some("x"));
    }

    #[test]
    fn missing_section_uses_defaults() {
        let cfg = FlashmapConfig::default();
        let probe: Probe = cfg.section("probe").unwrap();
        assert_eq!(probe, Probe::default());
    }

    #[test]
    fn partial_section_fills_defaults() {
        let cfg = FlashmapConfig::from_value(json!({"probe": {"leafGap": 2.5}}));
        let probe: Probe = cfg.section("probe").unwrap();
        assert_eq!(probe.leaf_gap, 2.5);
        assert_eq!(probe.name, "");
        assert_eq!(probe.inner, Inner::default());
    }

    #[test]
    fn nested_section_keeps_sibling_defaults() {
        let cfg = FlashmapConfig::from_value(json!({"probe": {"inner": {"width": 9}}}));
        let probe: Probe = cfg.section("probe").unwrap();
        assert_eq!(probe.inner.width, 9.0);
        assert_eq!(probe.inner.height, 4.0);
    }

    #[test]
    fn mistyped_section_reports_section_name() {
        let cfg = FlashmapConfig::from_value(json!({"probe": {"leafGap": "wide"}}));
        let err = cfg.section::<Probe>("probe").unwrap_err();
        match err {
            Error::InvalidConfig { section, .. } => assert_eq!(section, "probe"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_json_str_rejects_non_objects() {
        assert!(FlashmapConfig::from_json_str("[1, 2]").is_err());
        assert!(FlashmapConfig::from_json_str("{\"parse\": {}}").is_ok());
    }
}
