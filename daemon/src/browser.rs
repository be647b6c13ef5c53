use anyhow::{Context, Result};
use common::VideoId;
use reqwest::Url;
use std::collections::BTreeMap;
use std::io;
use std::time::Duration;
use tokio::process::{Child, Command};

use crate::config::BrowserSettings;

const URL_PLACEHOLDER: &str = "{url}";

/// A browser that shows one page at a time in kiosk mode
#[allow(async_fn_in_trait)]
pub trait Browser {
    /// Show `url`, replacing whatever is currently shown
    async fn open(&mut self, url: &Url) -> Result<()>;

    /// Close the browser. Closing an already closed browser is not an error.
    async fn close(&mut self) -> Result<()>;
}

/// Build the embed URL that autoplays `id` from `start`
pub fn embed_url(embed_base: &str, id: &VideoId, start: Duration) -> Result<Url> {
    let mut url =
        Url::parse(embed_base).with_context(|| format!("Invalid embed URL: {}", embed_base))?;

    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Embed URL cannot take a path: {}", embed_base))?
        .pop_if_empty()
        .push(id.as_str());

    url.query_pairs_mut()
        .append_pair("autoplay", "1")
        .append_pair("start", &start.as_secs().to_string());

    Ok(url)
}

/// Substitute the URL into a command template
fn expand_template(template: &[String], url: &Url) -> Vec<String> {
    template
        .iter()
        .map(|arg| arg.replace(URL_PLACEHOLDER, url.as_str()))
        .collect()
}

/// Browser launched as a child process from a configured command line
#[derive(Debug)]
pub struct KioskBrowser {
    command: Vec<String>,
    env: BTreeMap<String, String>,
    child: Option<Child>,
}

impl KioskBrowser {
    pub fn new(settings: &BrowserSettings) -> Self {
        Self {
            command: settings.command.clone(),
            env: settings.env.clone(),
            child: None,
        }
    }

    /// Process id of the running browser, if any
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(|child| child.id())
    }
}

impl Browser for KioskBrowser {
    async fn open(&mut self, url: &Url) -> Result<()> {
        self.close().await?;

        let argv = expand_template(&self.command, url);
        let (program, args) = argv.split_first().context("No browser command configured")?;

        log::info!("Launching {} for {}", program, url);

        let child = Command::new(program)
            .args(args)
            .envs(&self.env)
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to launch browser {}", program))?;

        log::info!(
            "Spawned process {}",
            child.id().map(|pid| pid.to_string()).unwrap_or_default()
        );
        self.child = Some(child);

        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let pid = self.pid();
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        // Always attempt the kill, the browser may have exited on its own
        match child.start_kill() {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => {
                log::debug!("Browser already exited");
            }
            Err(e) => return Err(e).context("Failed to kill browser"),
        }

        let status = child.wait().await.context("Failed to reap browser")?;
        log::info!(
            "Browser process {} terminated ({})",
            pid.map(|pid| pid.to_string()).unwrap_or_default(),
            status
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_url() {
        let url = embed_url(
            "https://www.youtube.com/embed",
            &VideoId::new("dQw4w9WgXcQ"),
            Duration::from_secs(95),
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1&start=95"
        );
    }

    #[test]
    fn test_embed_url_trailing_slash() {
        let url = embed_url(
            "https://www.youtube.com/embed/",
            &VideoId::new("abc"),
            Duration::ZERO,
        )
        .unwrap();

        assert_eq!(url.as_str(), "https://www.youtube.com/embed/abc?autoplay=1&start=0");
    }

    #[test]
    fn test_embed_url_invalid_base() {
        assert!(embed_url("not a url", &VideoId::new("abc"), Duration::ZERO).is_err());
    }

    #[test]
    fn test_expand_template() {
        let url = Url::parse("https://example.com/embed/abc?autoplay=1").unwrap();

        let firefox = expand_template(&["firefox".to_string(), "--kiosk={url}".to_string()], &url);
        assert_eq!(
            firefox,
            vec!["firefox", "--kiosk=https://example.com/embed/abc?autoplay=1"]
        );

        let chrome = expand_template(
            &["google-chrome".to_string(), "--kiosk".to_string(), "{url}".to_string()],
            &url,
        );
        assert_eq!(chrome[2], "https://example.com/embed/abc?autoplay=1");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_open_and_close_running_browser() {
        let mut browser = KioskBrowser::new(&BrowserSettings {
            command: vec!["sleep".to_string(), "30".to_string()],
            env: BTreeMap::new(),
        });
        let url = Url::parse("https://example.com/").unwrap();

        browser.open(&url).await.unwrap();
        assert!(browser.pid().is_some());

        browser.close().await.unwrap();
        assert!(browser.pid().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_close_after_browser_exited() {
        let mut browser = KioskBrowser::new(&BrowserSettings {
            command: vec!["true".to_string()],
            env: BTreeMap::new(),
        });
        let url = Url::parse("https://example.com/").unwrap();

        browser.open(&url).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(browser.close().await.is_ok());
        // Second close is a no-op
        assert!(browser.close().await.is_ok());
    }

    #[tokio::test]
    async fn test_launch_failure() {
        let mut browser = KioskBrowser::new(&BrowserSettings {
            command: vec!["catkiosk-no-such-browser".to_string()],
            env: BTreeMap::new(),
        });
        let url = Url::parse("https://example.com/").unwrap();

        assert!(browser.open(&url).await.is_err());
        assert!(browser.pid().is_none());
    }
}
