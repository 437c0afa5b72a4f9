//! Property values and property definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Own properties declared on a sitemap entry, keyed by property name.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Resolved property values of an entry, keyed by property name.
pub type ComputedProperties = BTreeMap<String, String>;

/// A property declared on an entry.
///
/// Carries two channels: the value for the entry itself (`own`) and the
/// value handed down to descendants that don't override it (`inherited`).
/// A plain string in a sitemap document sets both.
///
/// ```json
/// "properties": {
///     "title": "News",
///     "template": { "value": "/t/overview.jsp", "inherit": "/t/article.jsp" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawPropertyValue")]
pub struct PropertyValue {
    /// Value on this entry.
    #[serde(rename = "value", skip_serializing_if = "Option::is_none")]
    pub own: Option<String>,
    /// Value for descendants.
    #[serde(rename = "inherit", skip_serializing_if = "Option::is_none")]
    pub inherited: Option<String>,
}

impl PropertyValue {
    /// A value applying to the entry and its descendants alike.
    pub fn simple(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            own: Some(value.clone()),
            inherited: Some(value),
        }
    }

    /// Distinct own and descendant values.
    pub fn split(own: Option<String>, inherited: Option<String>) -> Self {
        Self { own, inherited }
    }

    /// Value for the entry itself, falling back to the inherited channel.
    pub fn effective(&self) -> Option<&str> {
        self.own.as_deref().or(self.inherited.as_deref())
    }

    /// Value for descendants, falling back to the own channel.
    pub fn for_descendants(&self) -> Option<&str> {
        self.inherited.as_deref().or(self.own.as_deref())
    }
}

/// Serde shape accepted for property values: a plain string or an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPropertyValue {
    Simple(String),
    Split {
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        inherit: Option<String>,
    },
}

impl From<RawPropertyValue> for PropertyValue {
    fn from(raw: RawPropertyValue) -> Self {
        match raw {
            RawPropertyValue::Simple(v) => Self::simple(v),
            RawPropertyValue::Split { value, inherit } => Self::split(value, inherit),
        }
    }
}

/// Definition of a property a sitemap supports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDefinition {
    /// Value used when neither the entry nor an ancestor sets the property.
    pub default: Option<String>,
    /// Human-readable description for editors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The property definitions declared by one sitemap document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyDefinitions(BTreeMap<String, PropertyDefinition>);

impl PropertyDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, definition: PropertyDefinition) {
        self.0.insert(name.into(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDefinition> {
        self.0.get(name)
    }

    /// Default value of a defined property.
    pub fn default_value(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|d| d.default.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyDefinition)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, PropertyDefinition)> for PropertyDefinitions {
    fn from_iter<I: IntoIterator<Item = (String, PropertyDefinition)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_simple_and_split() {
        let json = r#"{
            "title": "News",
            "template": { "value": "overview", "inherit": "article" },
            "hidden": { "inherit": "true" }
        }"#;
        let props: PropertyMap = serde_json::from_str(json).unwrap();

        assert_eq!(props["title"], PropertyValue::simple("News"));
        assert_eq!(props["template"].effective(), Some("overview"));
        assert_eq!(props["template"].for_descendants(), Some("article"));
        assert_eq!(props["hidden"].own, None);
        assert_eq!(props["hidden"].effective(), Some("true"));
    }

    #[test]
    fn test_definitions_default_value() {
        let defs: PropertyDefinitions = serde_json::from_str(
            r#"{ "template": { "default": "/t/default.jsp" }, "title": {} }"#,
        )
        .unwrap();
        assert_eq!(defs.default_value("template"), Some("/t/default.jsp"));
        assert_eq!(defs.default_value("title"), None);
        assert_eq!(defs.default_value("missing"), None);
        assert_eq!(defs.len(), 2);
    }
}
