//! A cached feed of financial news articles.

use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::{
    Error,
    cache::{Clock, TtlCache},
};

/// How long fetched articles are reused before asking the source again.
pub const NEWS_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// The topic of a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsCategory {
    /// The wider economy, e.g. interest rates and inflation.
    Economy,
    /// Investment products and strategies.
    Investments,
    /// Stock and currency markets.
    Markets,
    /// Cryptocurrencies.
    Crypto,
    /// Company and industry news.
    Business,
}

/// A news article summary.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsArticle {
    /// The headline.
    pub title: String,
    /// A one or two sentence summary.
    pub summary: String,
    /// Where to read the full article.
    pub url: String,
    /// The publisher's name.
    pub source: String,
    /// When the article was published.
    pub published_at: OffsetDateTime,
    /// The article's topic.
    pub category: NewsCategory,
}

/// Somewhere news articles can be fetched from.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch the latest articles.
    async fn fetch(&self) -> Result<Vec<NewsArticle>, Error>;
}

/// Serves articles from a [NewsSource], re-fetching at most once per TTL.
pub struct NewsFeed<S, C> {
    source: S,
    clock: C,
    cache: Mutex<TtlCache<Vec<NewsArticle>>>,
}

impl<S: NewsSource, C: Clock> NewsFeed<S, C> {
    /// Create a feed that caches articles from `source` for `ttl`.
    pub fn new(source: S, clock: C, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            cache: Mutex::new(TtlCache::new(ttl)),
        }
    }

    /// The latest articles.
    ///
    /// A fresh, non-empty cache is returned without contacting the source.
    /// If the source fails, the last articles fetched are returned instead,
    /// or nothing if there are none.
    ///
    /// The cache stays locked while the source is fetched, so concurrent
    /// callers wait for that one fetch and share its result rather than each
    /// contacting the source.
    pub async fn articles(&self) -> Vec<NewsArticle> {
        let now = self.clock.now();
        let mut cache = self.cache.lock().await;

        if let Some(articles) = cache.fresh(now).filter(|articles| !articles.is_empty()) {
            return articles.clone();
        }

        match self.source.fetch().await {
            Ok(articles) => {
                cache.store(articles.clone(), now);
                articles
            }
            Err(error) => {
                tracing::warn!("Could not fetch news, serving cached articles: {error}");
                cache.last().cloned().unwrap_or_default()
            }
        }
    }
}
