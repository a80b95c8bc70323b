//! In-memory search index. Records every write call so mirror traffic can be asserted on.

use crate::search::{is_match_all, SearchError, SearchHits, SearchIndex};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchCall {
    Index { index: String, id: i64 },
    Remove { index: String, id: i64 },
}

#[derive(Default)]
pub struct MemorySearchIndex {
    documents: Mutex<BTreeMap<(String, i64), Value>>,
    calls: Mutex<Vec<SearchCall>>,
    fail_writes: AtomicBool,
}

impl MemorySearchIndex {
    pub fn new() -> Self {
        MemorySearchIndex::default()
    }

    /// Make every subsequent index/remove call fail (the call is still recorded).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().await.clone()
    }

    pub async fn index_calls(&self, index: &str) -> Vec<i64> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|c| match c {
                SearchCall::Index { index: i, id } if i == index => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub async fn remove_calls(&self, index: &str) -> Vec<i64> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|c| match c {
                SearchCall::Remove { index: i, id } if i == index => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub async fn document(&self, index: &str, id: i64) -> Option<Value> {
        self.documents.lock().await.get(&(index.to_string(), id)).cloned()
    }

    fn check_writable(&self) -> Result<(), SearchError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SearchError::Unavailable("writes disabled".into()));
        }
        Ok(())
    }
}

/// Lower-cased text of every scalar leaf in the document.
fn document_text(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => {
            out.push_str(&s.to_lowercase());
            out.push(' ');
        }
        Value::Number(n) => {
            out.push_str(&n.to_string());
            out.push(' ');
        }
        Value::Bool(b) => {
            out.push_str(if *b { "true " } else { "false " });
        }
        Value::Array(items) => items.iter().for_each(|v| document_text(v, out)),
        Value::Object(map) => map.values().for_each(|v| document_text(v, out)),
        Value::Null => {}
    }
}

fn matches(document: &Value, query: &str) -> bool {
    if is_match_all(query) {
        return true;
    }
    let mut text = String::new();
    document_text(document, &mut text);
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .all(|term| text.contains(&term))
}

#[async_trait]
impl SearchIndex for MemorySearchIndex {
    async fn index(&self, index: &str, id: i64, document: Value) -> Result<(), SearchError> {
        self.calls.lock().await.push(SearchCall::Index {
            index: index.to_string(),
            id,
        });
        self.check_writable()?;
        self.documents.lock().await.insert((index.to_string(), id), document);
        Ok(())
    }

    async fn remove(&self, index: &str, id: i64) -> Result<(), SearchError> {
        self.calls.lock().await.push(SearchCall::Remove {
            index: index.to_string(),
            id,
        });
        self.check_writable()?;
        self.documents.lock().await.remove(&(index.to_string(), id));
        Ok(())
    }

    async fn search(
        &self,
        index: &str,
        query: &str,
        limit: Option<u64>,
        offset: u64,
    ) -> Result<SearchHits, SearchError> {
        let documents = self.documents.lock().await;
        let hits: Vec<Value> = documents
            .iter()
            .filter(|((i, _), doc)| i == index && matches(doc, query))
            .map(|(_, doc)| doc.clone())
            .collect();
        let total = hits.len() as u64;
        let documents = hits
            .into_iter()
            .skip(offset as usize)
            .take(limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .collect();
        Ok(SearchHits { total, documents })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn every_term_must_match() {
        let idx = MemorySearchIndex::new();
        idx.index("countries", 1, json!({"id": 1, "countryName": "Viet Nam"})).await.unwrap();
        idx.index("countries", 2, json!({"id": 2, "countryName": "France"})).await.unwrap();
        idx.index("regions", 1, json!({"id": 1, "regionName": "Viet"})).await.unwrap();

        assert_eq!(idx.search("countries", "viet nam", None, 0).await.unwrap().total, 1);
        assert_eq!(idx.search("countries", "viet france", None, 0).await.unwrap().total, 0);
        assert_eq!(idx.search("countries", "*", None, 0).await.unwrap().total, 2);
        let page = idx.search("countries", "", Some(1), 1).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.documents, vec![json!({"id": 2, "countryName": "France"})]);
    }

    #[tokio::test]
    async fn failing_writes_are_still_recorded() {
        let idx = MemorySearchIndex::new();
        idx.set_fail_writes(true);
        assert!(idx.index("tasks", 3, json!({"id": 3})).await.is_err());
        assert!(idx.remove("tasks", 3).await.is_err());
        assert_eq!(
            idx.calls().await,
            vec![
                SearchCall::Index { index: "tasks".into(), id: 3 },
                SearchCall::Remove { index: "tasks".into(), id: 3 },
            ]
        );
        assert!(idx.document("tasks", 3).await.is_none());
    }
}
