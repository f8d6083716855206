//! Per-conversation retrieval index.
//!
//! Each conversation owns an independent in-memory vector store behind its
//! own `RwLock`: queries share the lock, a re-index takes it exclusively and
//! replaces the store wholesale. Tokio's lock is fair, so a waiting re-index
//! is not starved by a stream of queries.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use oi_protocol::Document;

use crate::embedding::{Embedder, cosine};
use crate::error::{RetrievalError, RetrievalResult};

#[derive(Debug, Clone)]
struct Entry {
    document: Document,
    embedding: Vec<f32>,
}

#[derive(Debug, Default)]
struct ConversationIndex {
    entries: Vec<Entry>,
}

/// Registry of per-conversation vector stores.
pub struct RetrievalIndex {
    embedder: Arc<dyn Embedder>,
    conversations: RwLock<HashMap<Uuid, Arc<RwLock<ConversationIndex>>>>,
}

impl RetrievalIndex {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            conversations: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the conversation's index with `documents`, creating it on
    /// first use. Nothing from a previous index survives.
    pub async fn index(&self, conversation_id: Uuid, documents: Vec<Document>) {
        let entries: Vec<Entry> = documents
            .into_iter()
            .map(|document| Entry {
                embedding: self.embedder.embed(&document.text),
                document,
            })
            .collect();
        let count = entries.len();

        let slot = {
            let mut conversations = self.conversations.write().await;
            conversations.entry(conversation_id).or_default().clone()
        };
        slot.write().await.entries = entries;

        tracing::info!(conversation_id = %conversation_id, documents = count, "conversation indexed");
    }

    /// The `k` documents most similar to `text`, best first. Equal scores
    /// keep their original insertion order.
    pub async fn query(
        &self,
        conversation_id: Uuid,
        text: &str,
        k: usize,
    ) -> RetrievalResult<Vec<Document>> {
        let slot = self
            .conversations
            .read()
            .await
            .get(&conversation_id)
            .cloned()
            .ok_or(RetrievalError::IndexNotFound(conversation_id))?;

        let query = self.embedder.embed(text);
        let store = slot.read().await;
        let mut scored: Vec<(usize, f32)> = store
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine(&query, &e.embedding)))
            .collect();

        // sort_by is stable, which gives the insertion-order tie-break.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        tracing::debug!(
            conversation_id = %conversation_id,
            hits = scored.len(),
            "retrieval query"
        );
        Ok(scored
            .into_iter()
            .map(|(i, _)| store.entries[i].document.clone())
            .collect())
    }

    /// Discard a conversation's index. Returns false if there was none.
    pub async fn remove(&self, conversation_id: Uuid) -> bool {
        let removed = self
            .conversations
            .write()
            .await
            .remove(&conversation_id)
            .is_some();
        if removed {
            tracing::info!(conversation_id = %conversation_id, "conversation index removed");
        }
        removed
    }

    pub async fn contains(&self, conversation_id: Uuid) -> bool {
        self.conversations.read().await.contains_key(&conversation_id)
    }

    /// Number of documents indexed for a conversation.
    pub async fn document_count(&self, conversation_id: Uuid) -> RetrievalResult<usize> {
        let slot = self
            .conversations
            .read()
            .await
            .get(&conversation_id)
            .cloned()
            .ok_or(RetrievalError::IndexNotFound(conversation_id))?;
        let count = slot.read().await.entries.len();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use oi_protocol::{DocumentKind, DocumentSource};

    fn doc(id: &str, text: &str) -> Document {
        Document {
            text: text.into(),
            source: DocumentSource {
                kind: DocumentKind::Metric,
                id: id.into(),
            },
        }
    }

    fn index() -> RetrievalIndex {
        RetrievalIndex::new(Arc::new(HashingEmbedder::default()))
    }

    /// Embeds every text to the same vector so every score ties.
    struct ConstantEmbedder;

    impl Embedder for ConstantEmbedder {
        fn embed(&self, _text: &str) -> Vec<f32> {
            vec![1.0, 0.0]
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn query_before_index_is_not_found() {
        let id = Uuid::now_v7();
        let err = index().query(id, "rpm", 3).await.unwrap_err();
        assert!(matches!(err, RetrievalError::IndexNotFound(got) if got == id));
    }

    #[tokio::test]
    async fn nearest_document_first() {
        let idx = index();
        let id = Uuid::now_v7();
        idx.index(
            id,
            vec![
                doc("battery_voltage", "battery_voltage is 13.9V, status normal"),
                doc("coolant_temp", "coolant_temp is 125°C, status critical"),
                doc("fuel_level", "fuel_level is 63%, status normal"),
            ],
        )
        .await;

        let hits = idx.query(id, "Is my coolant temperature too high?", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source.id, "coolant_temp");
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let idx = RetrievalIndex::new(Arc::new(ConstantEmbedder));
        let id = Uuid::now_v7();
        idx.index(id, vec![doc("a", "first"), doc("b", "second"), doc("c", "third")])
            .await;
        let ids: Vec<_> = idx
            .query(id, "anything", 3)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.source.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn k_larger_than_index_and_zero() {
        let idx = index();
        let id = Uuid::now_v7();
        idx.index(id, vec![doc("a", "engine_rpm is 900RPM, status normal")]).await;
        assert_eq!(idx.query(id, "rpm", 10).await.unwrap().len(), 1);
        assert!(idx.query(id, "rpm", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reindex_replaces_previous_documents() {
        let idx = index();
        let id = Uuid::now_v7();
        idx.index(id, vec![doc("coolant_temp", "coolant_temp is 125°C, status critical")])
            .await;
        idx.index(id, vec![doc("engine_rpm", "engine_rpm is 900RPM, status normal")])
            .await;

        let hits = idx.query(id, "coolant", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source.id, "engine_rpm");
        assert_eq!(idx.document_count(id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_index_is_queryable() {
        let idx = index();
        let id = Uuid::now_v7();
        idx.index(id, Vec::new()).await;
        assert!(idx.query(id, "anything", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn conversations_are_isolated() {
        let idx = index();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        idx.index(a, vec![doc("a", "coolant_temp is 90°C, status normal")]).await;
        idx.index(b, vec![doc("b", "engine_rpm is 900RPM, status normal")]).await;
        assert_eq!(idx.query(a, "rpm", 5).await.unwrap()[0].source.id, "a");
        assert_eq!(idx.query(b, "coolant", 5).await.unwrap()[0].source.id, "b");
    }

    #[tokio::test]
    async fn remove_discards_index() {
        let idx = index();
        let id = Uuid::now_v7();
        idx.index(id, vec![doc("a", "x")]).await;
        assert!(idx.contains(id).await);
        assert!(idx.remove(id).await);
        assert!(!idx.contains(id).await);
        assert!(!idx.remove(id).await);
        assert!(matches!(
            idx.query(id, "x", 1).await,
            Err(RetrievalError::IndexNotFound(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_queries_share_the_index() {
        let idx = Arc::new(index());
        let id = Uuid::now_v7();
        idx.index(id, vec![doc("coolant_temp", "coolant_temp is 90°C, status normal")])
            .await;
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let idx = idx.clone();
                tokio::spawn(async move { idx.query(id, "coolant", 1).await })
            })
            .collect();
        for h in handles {
            assert_eq!(h.await.unwrap().unwrap().len(), 1);
        }
    }
}
