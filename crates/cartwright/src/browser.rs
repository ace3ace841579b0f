//! Chromium driver over the Chrome `DevTools` Protocol.
//!
//! Every [`Driver`](crate::driver::Driver) call is answered by evaluating a
//! script built from the locator's element query, so a locator is resolved
//! afresh on each call. The scripts live in [`script`] and compile without
//! the `browser` feature; the CDP connection itself needs it.

/// Script builders shared by every driver call
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
pub(crate) mod script {
    use crate::locator::Locator;

    /// Status returned when the action ran
    pub(crate) const OK: &str = "ok";
    /// Status returned when the locator resolved to nothing
    pub(crate) const MISSING: &str = "missing";

    /// Run `body` against the first match; `body` may `return` an error text
    pub(crate) fn act(locator: &Locator, body: &str) -> String {
        format!(
            "(() => {{ const el = ({elements})[0]; if (!el) return {MISSING:?}; {body} return {OK:?}; }})()",
            elements = locator.to_elements_js()
        )
    }

    /// Evaluate `expr` against the first match, `null` when absent
    pub(crate) fn read(locator: &Locator, expr: &str) -> String {
        format!(
            "(() => {{ const el = ({elements})[0]; if (!el) return null; return {expr}; }})()",
            elements = locator.to_elements_js()
        )
    }

    pub(crate) fn count(locator: &Locator) -> String {
        locator.to_count_js()
    }

    pub(crate) fn click() -> &'static str {
        "el.scrollIntoView({block: 'center'}); el.click();"
    }

    pub(crate) fn fill(value: &str) -> String {
        format!(
            "if (!('value' in el)) return 'element is not an input'; \
             el.focus(); el.value = {value:?}; \
             el.dispatchEvent(new Event('input', {{bubbles: true}})); \
             el.dispatchEvent(new Event('change', {{bubbles: true}}));"
        )
    }

    pub(crate) fn focus() -> &'static str {
        "el.focus();"
    }

    pub(crate) fn select_option(value: &str) -> String {
        format!(
            "if (el.tagName !== 'SELECT') return 'element is not a select'; \
             const opt = Array.from(el.options).find(o => o.value === {value:?} || o.text.trim() === {value:?}); \
             if (!opt) return 'no option ' + {value:?}; \
             el.value = opt.value; \
             el.dispatchEvent(new Event('change', {{bubbles: true}}));"
        )
    }

    pub(crate) fn set_checked(checked: bool) -> String {
        format!(
            "if (!('checked' in el)) return 'element is not checkable'; \
             if (el.checked !== {checked}) el.click();"
        )
    }

    pub(crate) fn scroll() -> &'static str {
        "el.scrollIntoView({block: 'center'});"
    }

    pub(crate) fn visible() -> &'static str {
        "!!(el.offsetWidth || el.offsetHeight || el.getClientRects().length) \
         && getComputedStyle(el).visibility !== 'hidden'"
    }

    pub(crate) fn enabled() -> &'static str {
        "!el.disabled"
    }

    pub(crate) fn text() -> &'static str {
        "el.textContent || ''"
    }

    pub(crate) fn value() -> &'static str {
        "String(el.value ?? '')"
    }
}

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening)]
mod cdp {
    use super::script;
    use crate::config::BrowserConfig;
    use crate::driver::Driver;
    use crate::locator::Locator;
    use crate::result::{CartwrightError, CartwrightResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use tokio::sync::Mutex;
    use tracing::{debug, info};

    /// Real browser with one page, driven over CDP
    #[derive(Debug)]
    pub struct ChromiumDriver {
        browser: Mutex<CdpBrowser>,
        page: CdpPage,
        handle: tokio::task::JoinHandle<()>,
    }

    impl ChromiumDriver {
        /// Launch Chromium and open a blank page
        ///
        /// # Errors
        ///
        /// Returns `BrowserNotFound` if no executable can be located and
        /// `BrowserLaunch` if the process or page fails to start
        pub async fn launch(config: &BrowserConfig) -> CartwrightResult<Self> {
            let mut builder =
                CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder.build().map_err(|message| {
                if message.contains("executable") {
                    CartwrightError::BrowserNotFound
                } else {
                    CartwrightError::BrowserLaunch { message }
                }
            })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                CartwrightError::BrowserLaunch {
                    message: e.to_string(),
                }
            })?;

            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser.new_page("about:blank").await.map_err(|e| {
                CartwrightError::BrowserLaunch {
                    message: e.to_string(),
                }
            })?;

            info!(headless = config.headless, "chromium launched");
            Ok(Self {
                browser: Mutex::new(browser),
                page,
                handle,
            })
        }

        async fn eval<T: DeserializeOwned>(&self, source: &str) -> CartwrightResult<T> {
            let result = self
                .page
                .evaluate(source)
                .await
                .map_err(|e| CartwrightError::driver(e.to_string()))?;
            result
                .into_value()
                .map_err(|e| CartwrightError::driver(format!("unexpected script result: {e}")))
        }

        async fn act(&self, locator: &Locator, body: &str) -> CartwrightResult<()> {
            let status: String = self.eval(&script::act(locator, body)).await?;
            match status.as_str() {
                script::OK => Ok(()),
                script::MISSING => Err(CartwrightError::ElementNotFound {
                    selector: locator.to_string(),
                }),
                other => Err(CartwrightError::driver(format!("{locator}: {other}"))),
            }
        }

        async fn read<T: DeserializeOwned>(
            &self,
            locator: &Locator,
            expr: &str,
        ) -> CartwrightResult<Option<T>> {
            self.eval(&script::read(locator, expr)).await
        }
    }

    #[async_trait]
    impl Driver for ChromiumDriver {
        async fn navigate(&self, url: &str) -> CartwrightResult<()> {
            debug!(url, "navigate");
            self.page
                .goto(url)
                .await
                .map_err(|e| CartwrightError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn current_url(&self) -> CartwrightResult<String> {
            let url = self
                .page
                .url()
                .await
                .map_err(|e| CartwrightError::driver(e.to_string()))?;
            Ok(url.unwrap_or_else(|| "about:blank".to_string()))
        }

        async fn count(&self, locator: &Locator) -> CartwrightResult<usize> {
            self.eval(&script::count(locator)).await
        }

        async fn click(&self, locator: &Locator) -> CartwrightResult<()> {
            self.act(locator, script::click()).await
        }

        async fn fill(&self, locator: &Locator, value: &str) -> CartwrightResult<()> {
            self.act(locator, &script::fill(value)).await
        }

        async fn type_text(&self, locator: &Locator, text: &str) -> CartwrightResult<()> {
            self.act(locator, script::focus()).await?;
            for ch in text.chars() {
                self.page
                    .execute(InsertTextParams::new(ch.to_string()))
                    .await
                    .map_err(|e| CartwrightError::driver(e.to_string()))?;
            }
            Ok(())
        }

        async fn select_option(&self, locator: &Locator, value: &str) -> CartwrightResult<()> {
            self.act(locator, &script::select_option(value)).await
        }

        async fn set_checked(&self, locator: &Locator, checked: bool) -> CartwrightResult<()> {
            self.act(locator, &script::set_checked(checked)).await
        }

        async fn scroll_into_view(&self, locator: &Locator) -> CartwrightResult<()> {
            self.act(locator, script::scroll()).await
        }

        async fn is_visible(&self, locator: &Locator) -> CartwrightResult<bool> {
            Ok(self
                .read(locator, script::visible())
                .await?
                .unwrap_or(false))
        }

        async fn is_enabled(&self, locator: &Locator) -> CartwrightResult<bool> {
            Ok(self
                .read(locator, script::enabled())
                .await?
                .unwrap_or(false))
        }

        async fn text_content(&self, locator: &Locator) -> CartwrightResult<Option<String>> {
            self.read(locator, script::text()).await
        }

        async fn input_value(&self, locator: &Locator) -> CartwrightResult<Option<String>> {
            self.read(locator, script::value()).await
        }

        async fn screenshot(&self) -> CartwrightResult<Vec<u8>> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();
            let shot = self
                .page
                .execute(params)
                .await
                .map_err(|e| CartwrightError::Screenshot {
                    message: e.to_string(),
                })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&shot.data)
                .map_err(|e| CartwrightError::Screenshot {
                    message: e.to_string(),
                })
        }

        async fn close(&self) -> CartwrightResult<()> {
            self.page
                .clone()
                .close()
                .await
                .map_err(|e| CartwrightError::driver(e.to_string()))?;
            let mut browser = self.browser.lock().await;
            browser
                .close()
                .await
                .map_err(|e| CartwrightError::driver(e.to_string()))?;
            self.handle.abort();
            info!("chromium closed");
            Ok(())
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::ChromiumDriver;
