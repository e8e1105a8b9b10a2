//! Core value types and operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date format used when a date travels as text.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Value represents a dynamically typed node of a serialized object tree.
///
/// Scalars carry property values, `Map` carries the serialized form of one
/// object and `List` carries repeated entries under a single key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    List(Vec<Value>),
    Map(Map),
}

/// Map represents a key-value map where keys are strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Map {
    pub fields: BTreeMap<String, Value>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Returns true for every variant that is neither a list nor a map.
    pub fn is_scalar(&self) -> bool {
        !self.is_list() && !self.is_map()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Text form of a scalar. Null, lists and maps have none.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null | Value::List(_) | Value::Map(_) => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
        }
    }

    /// Levels of List and Map nesting. Scalars have depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Value::List(items) => 1 + items.iter().map(Value::depth).max().unwrap_or(0),
            Value::Map(map) => map.depth(),
            _ => 0,
        }
    }

    /// Lenient integer conversion. Strings are parsed, floats truncated.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.is_finite() => Some(*f as i64),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
            }
            _ => None,
        }
    }

    pub fn to_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Lenient boolean conversion: "true"/"false", "1"/"0" and numbers.
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Dates convert from themselves or from `YYYY-MM-DD` text.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::String(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl Map {
    pub fn new() -> Self {
        Map {
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Levels of nesting, counting this map as one.
    pub fn depth(&self) -> usize {
        1 + self.fields.values().map(Value::depth).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Adds `value` under `key`, escalating repeated keys into a list.
    ///
    /// The first insertion stores the value as is. The second replaces it
    /// with `[first, second]` and later insertions append. A list added
    /// under an occupied key contributes its items, so repeated insertions
    /// never nest one list inside another.
    pub fn add_mapped(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let Some(existing) = self.fields.get_mut(&key) else {
            self.fields.insert(key, value);
            return;
        };
        if !existing.is_list() {
            let first = std::mem::take(existing);
            *existing = Value::List(vec![first]);
        }
        if let Value::List(items) = existing {
            match value {
                Value::List(more) => items.extend(more),
                other => items.push(other),
            }
        }
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Map {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kinds() {
        assert!(Value::Null.is_null());
        assert!(Value::Int(42).is_scalar());
        assert!(Value::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()).is_scalar());
        assert!(Value::List(vec![]).is_list());
        assert!(Value::Map(Map::new()).is_map());
        assert!(!Value::Map(Map::new()).is_scalar());
    }

    #[test]
    fn test_map_operations() {
        let mut map = Map::new();
        assert!(map.is_empty());

        map.set("key", "value");
        assert!(map.has("key"));
        assert_eq!(map.get("key"), Some(&Value::String("value".into())));

        map.delete("key");
        assert!(!map.has("key"));
    }

    #[test]
    fn test_add_mapped_escalates_to_list() {
        let mut map = Map::new();
        map.add_mapped("k", 1);
        assert_eq!(map.get("k"), Some(&Value::Int(1)));

        map.add_mapped("k", 2);
        assert_eq!(map.get("k"), Some(&Value::List(vec![1.into(), 2.into()])));

        map.add_mapped("k", 3);
        assert_eq!(
            map.get("k"),
            Some(&Value::List(vec![1.into(), 2.into(), 3.into()]))
        );
    }

    #[test]
    fn test_add_mapped_keeps_maps_as_elements() {
        let mut first = Map::new();
        first.set("species", "dog");
        let mut second = Map::new();
        second.set("species", "cat");

        let mut map = Map::new();
        map.add_mapped("Pet", first.clone());
        assert_eq!(map.get("Pet"), Some(&Value::Map(first.clone())));

        map.add_mapped("Pet", second.clone());
        assert_eq!(
            map.get("Pet"),
            Some(&Value::List(vec![first.into(), second.into()]))
        );
    }

    #[test]
    fn test_add_mapped_list_does_not_nest() {
        let mut map = Map::new();
        map.add_mapped("tags", Value::List(vec!["a".into(), "b".into()]));
        assert_eq!(map.get("tags"), Some(&Value::List(vec!["a".into(), "b".into()])));

        map.add_mapped("tags", Value::List(vec!["c".into()]));
        assert_eq!(
            map.get("tags"),
            Some(&Value::List(vec!["a".into(), "b".into(), "c".into()]))
        );

        let mut scalar_first = Map::new();
        scalar_first.add_mapped("x", 1);
        scalar_first.add_mapped("x", Value::List(vec![2.into(), 3.into()]));
        assert_eq!(
            scalar_first.get("x"),
            Some(&Value::List(vec![1.into(), 2.into(), 3.into()]))
        );
    }

    #[test]
    fn test_depth() {
        assert_eq!(Value::Int(1).depth(), 0);
        assert_eq!(Map::new().depth(), 1);

        let mut inner = Map::new();
        inner.set("tags", vec![Value::from("a")]);
        let mut outer = Map::new();
        outer.set("name", "x");
        outer.set("child", Value::List(vec![Value::Map(inner), 1.into()]));
        assert_eq!(outer.depth(), 4);
    }

    #[test]
    fn test_lenient_conversions() {
        assert_eq!(Value::from("170").to_int(), Some(170));
        assert_eq!(Value::from(" 12.9 ").to_int(), Some(12));
        assert_eq!(Value::Float(3.5).to_int(), Some(3));
        assert_eq!(Value::from("abc").to_int(), None);

        assert_eq!(Value::from("true").to_bool(), Some(true));
        assert_eq!(Value::from("0").to_bool(), Some(false));
        assert_eq!(Value::Int(2).to_bool(), Some(true));

        assert_eq!(Value::from(" 2.5").to_float(), Some(2.5));
        assert_eq!(Value::Int(4).to_float(), Some(4.0));
        assert_eq!(Value::Bool(true).to_float(), None);

        let date = NaiveDate::from_ymd_opt(1969, 7, 20).unwrap();
        assert_eq!(Value::from("1969-07-20").to_date(), Some(date));
        assert_eq!(Value::Date(date).to_text().as_deref(), Some("1969-07-20"));
        assert_eq!(Value::from("July").to_date(), None);

        assert_eq!(Value::Null.to_text(), None);
        assert_eq!(Value::Bool(false).to_text().as_deref(), Some("false"));
    }
}
