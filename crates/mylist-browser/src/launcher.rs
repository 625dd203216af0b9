//! Chrome process launcher.
//!
//! Every session gets its own Chrome process and profile directory. The
//! DevTools port is chosen by Chrome (`--remote-debugging-port=0`) and read
//! back from the `DevToolsActivePort` file it writes into the profile.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use mylist_config::BrowserConfig;
use mylist_protocols::SessionError;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

const PORT_FILE: &str = "DevToolsActivePort";
const PORT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A running Chrome process owned by one session.
pub struct ChromeProcess {
    child: Child,
    profile_dir: PathBuf,
    ws_url: String,
}

impl ChromeProcess {
    /// Browser-level DevTools WebSocket URL.
    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    pub fn profile_dir(&self) -> &Path {
        &self.profile_dir
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Kill the process and remove the profile directory.
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.child.kill().await {
            debug!("Chrome already exited: {}", e);
        }
        if let Err(e) = tokio::fs::remove_dir_all(&self.profile_dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    "Failed to remove profile {}: {}",
                    self.profile_dir.display(),
                    e
                );
            }
        }
    }
}

impl Drop for ChromeProcess {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
        let _ = std::fs::remove_dir_all(&self.profile_dir);
    }
}

/// Launches headless Chrome processes.
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    config: BrowserConfig,
}

impl ChromeLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/opt/chrome/chrome",
            "/snap/bin/chromium",
        ];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Fresh profile directory path for one session.
    pub fn new_profile_dir(&self) -> PathBuf {
        self.config.profile_root().join(format!(
            "mylist-chrome-{}-{}",
            std::process::id(),
            uuid::Uuid::new_v4().simple()
        ))
    }

    /// Command line switches for a session using `profile_dir`.
    pub fn chrome_args(&self, profile_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "--remote-debugging-port=0".to_string(),
            format!("--user-data-dir={}", profile_dir.display()),
            format!(
                "--window-size={},{}",
                self.config.window_width, self.config.window_height
            ),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--no-sandbox".to_string(),
            "--no-zygote".to_string(),
            "--disable-gpu".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-extensions".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
            "--disable-translate".to_string(),
            "--mute-audio".to_string(),
        ];

        if self.config.headless {
            args.push("--headless=new".to_string());
        }
        if self.config.disable_images {
            args.push("--blink-settings=imagesEnabled=false".to_string());
        }
        args.extend(self.config.extra_args.iter().cloned());
        args.push("about:blank".to_string());
        args
    }

    /// Launch Chrome and wait for its DevTools endpoint.
    pub async fn launch(&self) -> Result<ChromeProcess, SessionError> {
        let chrome_path = match self.config.chrome_path {
            Some(ref path) => path.clone(),
            None => Self::find_chrome().ok_or_else(|| {
                SessionError::LaunchFailed("Chrome executable not found".to_string())
            })?,
        };

        let profile_dir = self.new_profile_dir();
        tokio::fs::create_dir_all(&profile_dir).await.map_err(|e| {
            SessionError::LaunchFailed(format!(
                "Failed to create profile {}: {}",
                profile_dir.display(),
                e
            ))
        })?;

        let child = Command::new(&chrome_path)
            .args(self.chrome_args(&profile_dir))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                let _ = std::fs::remove_dir_all(&profile_dir);
                SessionError::LaunchFailed(format!("{}: {}", chrome_path.display(), e))
            })?;

        let mut process = ChromeProcess {
            child,
            profile_dir,
            ws_url: String::new(),
        };
        info!("Chrome launched with PID: {:?}", process.pid());

        match self.wait_for_port_file(&mut process).await {
            Ok(ws_url) => {
                process.ws_url = ws_url;
                Ok(process)
            }
            Err(e) => {
                process.shutdown().await;
                Err(e)
            }
        }
    }

    async fn wait_for_port_file(&self, process: &mut ChromeProcess) -> Result<String, SessionError> {
        let port_file = process.profile_dir.join(PORT_FILE);
        let timeout = self.config.launch_timeout();
        let start = Instant::now();

        loop {
            if let Ok(content) = tokio::fs::read_to_string(&port_file).await {
                if let Some(ws_url) = parse_devtools_active_port(&content) {
                    debug!("DevTools endpoint: {}", ws_url);
                    return Ok(ws_url);
                }
            }

            if let Ok(Some(status)) = process.child.try_wait() {
                return Err(SessionError::LaunchFailed(format!(
                    "Chrome exited during startup: {}",
                    status
                )));
            }

            if start.elapsed() > timeout {
                return Err(SessionError::LaunchFailed(
                    "Chrome failed to start within timeout".to_string(),
                ));
            }

            tokio::time::sleep(PORT_POLL_INTERVAL).await;
        }
    }
}

/// Parse `DevToolsActivePort`: the port on the first line, the browser
/// target path on the second.
pub fn parse_devtools_active_port(content: &str) -> Option<String> {
    let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());
    let port: u16 = lines.next()?.parse().ok()?;
    let path = lines.next()?;
    if port == 0 || !path.starts_with('/') {
        return None;
    }
    Some(format!("ws://127.0.0.1:{}{}", port, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_file() {
        let ws = parse_devtools_active_port("40123\n/devtools/browser/abc-def\n").unwrap();
        assert_eq!(ws, "ws://127.0.0.1:40123/devtools/browser/abc-def");
    }

    #[test]
    fn test_parse_port_file_incomplete() {
        assert!(parse_devtools_active_port("").is_none());
        assert!(parse_devtools_active_port("40123\n").is_none());
        assert!(parse_devtools_active_port("port\n/devtools/browser/x").is_none());
    }

    #[test]
    fn test_chrome_args_defaults() {
        let launcher = ChromeLauncher::new(BrowserConfig::default());
        let args = launcher.chrome_args(Path::new("/tmp/profile"));
        assert!(args.contains(&"--remote-debugging-port=0".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/profile".to_string()));
        assert!(args.contains(&"--window-size=1366,768".to_string()));
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--blink-settings=imagesEnabled=false".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("about:blank"));
    }

    #[test]
    fn test_chrome_args_headed_with_extras() {
        let config = BrowserConfig {
            headless: false,
            disable_images: false,
            extra_args: vec!["--lang=ja".to_string()],
            ..BrowserConfig::default()
        };
        let args = ChromeLauncher::new(config).chrome_args(Path::new("/p"));
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
        assert!(!args.iter().any(|a| a.starts_with("--blink-settings")));
        assert!(args.contains(&"--lang=ja".to_string()));
    }

    #[test]
    fn test_profile_dirs_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let config = BrowserConfig {
            profile_root: Some(dir.path().to_path_buf()),
            ..BrowserConfig::default()
        };
        let launcher = ChromeLauncher::new(config);
        let a = launcher.new_profile_dir();
        let b = launcher.new_profile_dir();
        assert_ne!(a, b);
        assert!(a.starts_with(dir.path()));
        assert!(a
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("mylist-chrome-")));
    }

    #[tokio::test]
    async fn test_launch_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let config = BrowserConfig {
            chrome_path: Some(dir.path().join("no-such-chrome")),
            profile_root: Some(dir.path().to_path_buf()),
            ..BrowserConfig::default()
        };
        let result = ChromeLauncher::new(config).launch().await;
        assert!(matches!(result, Err(SessionError::LaunchFailed(_))));
        // The profile directory is cleaned up on spawn failure.
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 0);
    }
}
