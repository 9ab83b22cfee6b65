use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub youtube_api_key: String,
    pub log_level: String,
    pub channels_path: PathBuf,
    pub cache_dir: PathBuf,
    pub cache_ttl_hours: u64,
    pub video_request_timeout_secs: u64,
    pub video_max_results: u32,
    pub video_max_retries: u32,
    pub video_retry_backoff_base_ms: u64,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub geocoder_min_interval_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("youtube_api_key", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("channels_path", &self.channels_path)
            .field("cache_dir", &self.cache_dir)
            .field("cache_ttl_hours", &self.cache_ttl_hours)
            .field(
                "video_request_timeout_secs",
                &self.video_request_timeout_secs,
            )
            .field("video_max_results", &self.video_max_results)
            .field("video_max_retries", &self.video_max_retries)
            .field(
                "video_retry_backoff_base_ms",
                &self.video_retry_backoff_base_ms,
            )
            .field("geocoder_user_agent", &self.geocoder_user_agent)
            .field("geocoder_timeout_secs", &self.geocoder_timeout_secs)
            .field("geocoder_min_interval_ms", &self.geocoder_min_interval_ms)
            .finish()
    }
}
