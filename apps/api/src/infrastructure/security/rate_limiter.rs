use async_trait::async_trait;
use redis::{AsyncCommands, Client};

/// Fixed-window hit counter keyed by an arbitrary string.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Counts one hit against `key` and returns the running total. The key
    /// expires `window_seconds` after its first hit.
    async fn hit(&self, key: &str, window_seconds: u64) -> anyhow::Result<u64>;
}

pub struct RedisRateLimitStore {
    client: Client,
}

impl RedisRateLimitStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn hit(&self, key: &str, window_seconds: u64) -> anyhow::Result<u64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let count: u64 = conn.incr(key, 1_u64).await?;
        if count == 1 {
            let ttl = i64::try_from(window_seconds).unwrap_or(i64::MAX);
            let _: () = conn.expire(key, ttl).await?;
        }
        Ok(count)
    }
}

/// Key for the window containing `now_secs`.
pub fn window_key(ip: &str, now_secs: i64, window_seconds: u64) -> String {
    let window = i64::try_from(window_seconds.max(1)).unwrap_or(i64::MAX);
    format!("rate_limit:{}:{}", ip, now_secs.div_euclid(window))
}
