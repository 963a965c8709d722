use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::value::StateValue;

/// 저장소 키를 정규화한다. 대소문자를 구분하지 않도록 대문자로 바꾼다.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_uppercase()
}

/// 직렬화 형태의 표 항목.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    key: String,
    value: StateValue,
}

/// 삽입 순서를 유지하는 키-값 표. 키는 정규화된 대문자로 저장한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TableEntry>", into = "Vec<TableEntry>")]
pub struct ParameterTable {
    entries: Vec<TableEntry>,
    index: HashMap<String, usize>,
}

impl From<Vec<TableEntry>> for ParameterTable {
    fn from(entries: Vec<TableEntry>) -> Self {
        let mut table = ParameterTable::default();
        for entry in entries {
            table.insert(&entry.key, entry.value);
        }
        table
    }
}

impl From<ParameterTable> for Vec<TableEntry> {
    fn from(table: ParameterTable) -> Self {
        table.entries
    }
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&normalize_key(key))
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        let i = *self.index.get(&normalize_key(key))?;
        Some(&self.entries[i].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut StateValue> {
        let i = *self.index.get(&normalize_key(key))?;
        Some(&mut self.entries[i].value)
    }

    /// 값을 넣는다. 키가 이미 있으면 자리를 유지한 채 값만 바꾸고 이전 값을 반환한다.
    pub fn insert(&mut self, key: &str, value: StateValue) -> Option<StateValue> {
        let key = normalize_key(key);
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].value, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(TableEntry { key, value });
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<StateValue> {
        let i = self.index.remove(&normalize_key(key))?;
        let entry = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(entry.value)
    }

    /// 삽입 순서대로 (정규화된 키, 값)을 순회한다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateValue)> {
        self.entries.iter().map(|e| (e.key.as_str(), &e.value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut StateValue)> {
        self.entries.iter_mut().map(|e| (e.key.as_str(), &mut e.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_case_insensitive_and_ordered() {
        let mut table = ParameterTable::new();
        table.insert("b.Key", StateValue::Flag(true));
        table.insert("A.key", StateValue::Integer(3));
        table.insert("B.KEY", StateValue::Flag(false));
        assert_eq!(table.len(), 2);
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["B.KEY", "A.KEY"]);
        assert_eq!(table.get("b.key"), Some(&StateValue::Flag(false)));
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut table = ParameterTable::new();
        for (i, k) in ["a", "b", "c"].iter().enumerate() {
            table.insert(k, StateValue::Integer(i as i64));
        }
        assert_eq!(table.remove("A"), Some(StateValue::Integer(0)));
        assert_eq!(table.get("c"), Some(&StateValue::Integer(2)));
        assert!(!table.contains_key("a"));
    }

    #[test]
    fn serde_preserves_order() {
        let mut table = ParameterTable::new();
        table.insert("z", StateValue::Text("last".into()));
        table.insert("y", StateValue::Integer(1));
        let json = serde_json::to_string(&table).unwrap();
        let back: ParameterTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
        assert_eq!(back.keys().collect::<Vec<_>>(), vec!["Z", "Y"]);
    }
}
