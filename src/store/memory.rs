use super::{ArticleStore, FetchAttempt};
use crate::error::Result;
use crate::models::{Article, ArticleDraft, SourceRecord, Upserted};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Serializable state shared by the in-memory and snapshot backends.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StoreState {
    pub next_id: u64,
    pub articles: HashMap<String, Article>,
    pub sources: BTreeMap<String, SourceRecord>,
}

/// Cloneable handle; clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: StoreState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Copy of the full state, for snapshots.
    pub async fn snapshot(&self) -> StoreState {
        self.state.read().await.clone()
    }
}

impl ArticleStore for MemoryStore {
    async fn get(&self, url: &str) -> Result<Option<Article>> {
        Ok(self.state.read().await.articles.get(url).cloned())
    }

    async fn upsert(&self, draft: ArticleDraft) -> Result<Upserted> {
        let now = Utc::now();
        // One write guard covers lookup and insert, so racing upserts of the
        // same URL cannot both create.
        let mut state = self.state.write().await;
        if let Some(existing) = state.articles.get_mut(&draft.url) {
            existing.apply(draft, now);
            return Ok(Upserted {
                article: existing.clone(),
                created: false,
            });
        }

        state.next_id += 1;
        let article = Article::from_draft(state.next_id, draft, now);
        state.articles.insert(article.url.clone(), article.clone());
        Ok(Upserted {
            article,
            created: true,
        })
    }

    async fn save(&self, mut article: Article) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.articles.get_mut(&article.url) {
            Some(slot) => {
                article.updated_at = Utc::now();
                *slot = article;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn filter<P>(&self, predicate: P, limit: Option<usize>) -> Result<Vec<Article>>
    where
        P: Fn(&Article) -> bool,
    {
        let state = self.state.read().await;
        let mut matched: Vec<Article> = state
            .articles
            .values()
            .filter(|a| predicate(a))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(b.id.cmp(&a.id)));
        if let Some(limit) = limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut state = self.state.write().await;
        let before = state.articles.len();
        state.articles.retain(|_, a| a.published_at >= cutoff);
        Ok(before - state.articles.len())
    }

    async fn record_fetch(&self, attempt: FetchAttempt<'_>) -> Result<()> {
        let mut state = self.state.write().await;
        let record = state
            .sources
            .entry(attempt.key.to_string())
            .or_insert_with(|| SourceRecord {
                key: attempt.key.to_string(),
                name: attempt.name.to_string(),
                url: attempt.url.to_string(),
                continent: attempt.continent,
                is_active: true,
                last_fetched: None,
                fetch_count: 0,
                error_count: 0,
            });
        record.name = attempt.name.to_string();
        record.url = attempt.url.to_string();
        record.continent = attempt.continent;
        record.last_fetched = Some(attempt.at);
        record.fetch_count += 1;
        if !attempt.succeeded {
            record.error_count += 1;
        }
        Ok(())
    }

    async fn sources(&self) -> Result<Vec<SourceRecord>> {
        Ok(self.state.read().await.sources.values().cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.state.read().await.articles.len())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Continent};
    use chrono::Duration;

    fn draft(url: &str, days_old: i64) -> ArticleDraft {
        ArticleDraft {
            url: url.to_string(),
            title: format!("Story at {url}"),
            description: String::new(),
            author: None,
            source: "Test Wire".to_string(),
            feed: "GL".to_string(),
            continent: Continent::Global,
            published_at: Utc::now() - Duration::days(days_old),
            image_url: None,
            category: None,
            region: None,
            is_indian_news: false,
            translation: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_same_url_updates() {
        let store = MemoryStore::new();
        let first = store.upsert(draft("https://a", 0)).await.unwrap();
        let mut again = draft("https://a", 0);
        again.title = "Updated".to_string();
        let second = store.upsert(again).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.article.id, second.article.id);
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.get("https://a").await.unwrap().unwrap().title, "Updated");
    }

    #[tokio::test]
    async fn test_concurrent_upserts_create_once() {
        let store = MemoryStore::new();
        let results = futures::future::join_all(
            (0..8).map(|_| store.upsert(draft("https://same", 0))),
        )
        .await;
        let created = results.iter().filter(|r| r.as_ref().unwrap().created).count();
        assert_eq!(created, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_filter_newest_first_with_limit() {
        let store = MemoryStore::new();
        store.upsert(draft("https://old", 5)).await.unwrap();
        store.upsert(draft("https://new", 0)).await.unwrap();
        store.upsert(draft("https://mid", 2)).await.unwrap();

        let got = store.filter(|_| true, Some(2)).await.unwrap();
        let urls: Vec<&str> = got.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://new", "https://mid"]);
    }

    #[tokio::test]
    async fn test_delete_older_than() {
        let store = MemoryStore::new();
        store.upsert(draft("https://old", 10)).await.unwrap();
        store.upsert(draft("https://fresh", 1)).await.unwrap();
        let removed = store
            .delete_older_than(Utc::now() - Duration::days(7))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.get("https://old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_does_not_resurrect() {
        let store = MemoryStore::new();
        let mut article = store.upsert(draft("https://a", 0)).await.unwrap().article;
        article.category = Category::Health;
        assert!(store.save(article.clone()).await.unwrap());
        assert_eq!(
            store.get("https://a").await.unwrap().unwrap().category,
            Category::Health
        );

        store.delete_older_than(Utc::now() + Duration::days(1)).await.unwrap();
        assert!(!store.save(article).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_record_fetch_counts_errors() {
        let store = MemoryStore::new();
        let attempt = |succeeded| FetchAttempt {
            key: "in:the-hindu",
            name: "The Hindu",
            url: "https://www.thehindu.com/feeder/default.rss",
            continent: Continent::Asia,
            succeeded,
            at: Utc::now(),
        };
        store.record_fetch(attempt(true)).await.unwrap();
        store.record_fetch(attempt(false)).await.unwrap();

        let sources = store.sources().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].fetch_count, 2);
        assert_eq!(sources[0].error_count, 1);
        assert!(sources[0].last_fetched.is_some());
    }
}
