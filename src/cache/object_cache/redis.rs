use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

// 在服务端原子执行 GET + DEL
const REMOVE_IF_EQ_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
end
return 0
"#;

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    ttl: u64, // TTL in seconds
}

impl RedisObjectCache {
    pub async fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        let cache = Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            ttl: config.cache.default_ttl,
        };

        // 启动时探测连接
        let mut conn = cache.get_connection().await.map_err(|e| {
            error!(
                "Failed to connect to Redis: {}. Check Redis server status and URL: {}",
                e, redis_config.url
            );
            format!("Redis connection failed: {e}")
        })?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| format!("Redis ping failed: {e}"))?;
        debug!(
            "RedisObjectCache connected ({}) with prefix: '{}', TTL: {}s",
            pong, cache.key_prefix, cache.ttl
        );

        Ok(cache)
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return CacheResult::ExistsButNoValue;
            }
        };

        let result: redis::RedisResult<Option<String>> = redis::cmd("GET")
            .arg(self.make_key(key))
            .query_async(&mut conn)
            .await;

        match result {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return;
            }
        };

        let effective_ttl = if ttl == 0 { self.ttl } else { ttl };
        let result: redis::RedisResult<()> = redis::cmd("SETEX")
            .arg(self.make_key(&key))
            .arg(effective_ttl)
            .arg(value)
            .query_async(&mut conn)
            .await;

        if let Err(e) = result {
            error!("Failed to insert key '{}' into cache: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return;
            }
        };

        let result: redis::RedisResult<i64> = redis::cmd("DEL")
            .arg(self.make_key(key))
            .query_async(&mut conn)
            .await;
        match result {
            Ok(0) => debug!("Key not found in cache for removal: {}", key),
            Ok(_) => debug!("Removed key from cache: {}", key),
            Err(e) => error!("Failed to remove key '{}': {}", key, e),
        }
    }

    async fn remove_if_eq(&self, key: &str, expected: &str) -> bool {
        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return false;
            }
        };

        let result: redis::RedisResult<i64> = redis::cmd("EVAL")
            .arg(REMOVE_IF_EQ_SCRIPT)
            .arg(1)
            .arg(self.make_key(key))
            .arg(expected)
            .query_async(&mut conn)
            .await;
        match result {
            Ok(removed) => removed > 0,
            Err(e) => {
                error!("Failed to compare-and-remove key '{}': {}", key, e);
                false
            }
        }
    }

    async fn invalidate_all(&self) {
        // 共享实例上不做全库清理
        warn!("RedisObjectCache does not implement invalidate_all");
    }
}
