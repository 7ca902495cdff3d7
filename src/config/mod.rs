use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// What the sequencer does with the remaining stages once one has failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StagePolicy {
    /// Attempt every stage each cycle, whatever happened before it
    #[default]
    AlwaysBoth,
    /// Skip the remaining stages of the cycle after the first failure
    StopOnFailure,
}

impl FromStr for StagePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always_both" | "always-both" | "always" => Ok(Self::AlwaysBoth),
            "stop_on_failure" | "stop-on-failure" | "stop" => Ok(Self::StopOnFailure),
            other => Err(format!("unknown stage policy '{}'", other)),
        }
    }
}

/// Upload watcher and WPS endpoint configuration
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Directory the upload process drops archives into
    pub watch_dir: PathBuf,

    /// Suffix a file name must end with to count as a pending upload (default: ".zip")
    pub suffix: String,

    /// Processing server base URL (default: "http://localhost:8090/geoserver")
    pub wps_base_url: String,

    /// Sub-path of the WPS service under the base URL (default: "/wps")
    pub wps_path: String,

    /// Delay between two trigger cycles (default: 5 seconds)
    pub poll_interval: Duration,

    /// Per-request timeout; `None` leaves the HTTP client unbounded
    pub request_timeout: Option<Duration>,

    pub stage_policy: StagePolicy,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("/home/onomap/geoserver/data_dir/onomap_uploading"),
            suffix: ".zip".to_string(),
            wps_base_url: "http://localhost:8090/geoserver".to_string(),
            wps_path: "/wps".to_string(),
            poll_interval: Duration::from_secs(5),
            request_timeout: None,
            stage_policy: StagePolicy::AlwaysBoth,
        }
    }
}

impl TriggerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup, falling back to
    /// the defaults for missing or unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        Self {
            watch_dir: lookup("UPLOAD_WATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.watch_dir),

            suffix: lookup("UPLOAD_SUFFIX")
                .filter(|v| !v.is_empty())
                .unwrap_or(default.suffix),

            wps_base_url: lookup("WPS_BASE_URL").unwrap_or(default.wps_base_url),

            wps_path: lookup("WPS_PATH").unwrap_or(default.wps_path),

            poll_interval: lookup("POLL_INTERVAL_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(default.poll_interval),

            request_timeout: match lookup("WPS_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
            {
                Some(0) | None => default.request_timeout,
                Some(secs) => Some(Duration::from_secs(secs)),
            },

            stage_policy: lookup("STAGE_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.stage_policy),
        }
    }

    /// Local GeoServer, uploads under `./uploading`, requests capped at 30 seconds
    pub fn development() -> Self {
        Self {
            watch_dir: PathBuf::from("uploading"),
            request_timeout: Some(Duration::from_secs(30)),
            ..Self::default()
        }
    }

    /// Full URL the stage requests are posted to
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}",
            self.wps_base_url.trim_end_matches('/'),
            self.wps_path.trim_start_matches('/')
        )
    }
}
