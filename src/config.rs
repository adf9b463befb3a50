pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
/// Default database on localhost, used when REDIS_URL is not configured.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379/0";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub redis_url: String,
    pub counter_key: String,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            counter_key: crate::domain::value_objects::CounterKey::DEFAULT.to_string(),
            debug: false,
        }
    }
}

impl Config {
    /// Build a config from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr = var("PAGE_TRACKER_LISTEN_ADDR").unwrap_or(defaults.listen_addr);

        let redis_url = var("REDIS_URL").unwrap_or(defaults.redis_url);

        let counter_key = var("PAGE_TRACKER_COUNTER_KEY").unwrap_or(defaults.counter_key);

        let debug = lookup("DEBUG").is_some();

        Self {
            listen_addr,
            redis_url,
            counter_key,
            debug,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    Ok(Config::from_lookup(|key| std::env::var(key).ok()))
}
