use redis::aio::ConnectionManager;

use crate::config::Config;
use crate::error::Result;

/// Connects to Redis and returns a multiplexed connection handle that
/// reconnects on its own; commands fail with `Unavailable` while the server
/// is unreachable.
pub async fn create_redis(config: &Config) -> Result<ConnectionManager> {
    let client = redis::Client::open(config.redis_url.as_str())?;
    let conn = ConnectionManager::new(client).await?;
    Ok(conn)
}
