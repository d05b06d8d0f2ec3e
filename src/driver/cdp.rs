use super::Driver;
use crate::locators::Locator;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use eoka::Page;
use std::path::Path;
use tracing::debug;

/// [`Driver`] backed by an `eoka` CDP page.
pub struct EokaDriver {
    page: Page,
}

impl EokaDriver {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Get a reference to the underlying Page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Evaluate `body` with `el` bound to the located element (or null).
    async fn eval_on<T: serde::de::DeserializeOwned>(
        &self,
        locator: &Locator,
        body: &str,
    ) -> Result<T> {
        let js = format!("((el) => {{ {} }})({})", body, element_js(locator));
        Ok(self.page.evaluate(&js).await?)
    }

    /// Run a script that answers "ok" or an error code.
    async fn eval_status(&self, locator: &Locator, body: &str, what: &str) -> Result<()> {
        let status: String = self.eval_on(locator, body).await?;
        match status.as_str() {
            "ok" => Ok(()),
            "element_not_found" => Err(Error::ElementNotFound(locator.to_string())),
            "option_not_found" => Err(Error::ElementNotFound(format!(
                "option {} in {}",
                what, locator
            ))),
            other => Err(Error::ElementNotFound(format!(
                "{} on {} failed: {}",
                what, locator, other
            ))),
        }
    }
}

/// JS string literal for `s`.
fn js_str(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// JS expression evaluating to the located element or null.
fn element_js(locator: &Locator) -> String {
    match locator {
        Locator::Css(sel) => format!("document.querySelector({})", js_str(sel)),
        Locator::XPath(xpath) => format!(
            "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
            js_str(xpath)
        ),
    }
}

/// Assign `value` through the prototype setter so React's value tracker
/// sees the change, then fire the events it listens for.
const SET_NATIVE_VALUE_JS: &str = r#"
    const proto = Object.getPrototypeOf(el);
    const setter = Object.getOwnPropertyDescriptor(proto, 'value')?.set;
    if (setter) { setter.call(el, value); } else { el.value = value; }
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
"#;

const VISIBLE_JS: &str = r#"
    if (!el) return false;
    const rect = el.getBoundingClientRect();
    const style = getComputedStyle(el);
    return rect.width > 0 && rect.height > 0
        && style.display !== 'none'
        && style.visibility !== 'hidden'
        && parseFloat(style.opacity) > 0;
"#;

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[async_trait(?Send)]
impl Driver for EokaDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn exists(&self, locator: &Locator) -> Result<bool> {
        self.eval_on(locator, "return !!el;").await
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        self.eval_on(locator, VISIBLE_JS).await
    }

    async fn is_checked(&self, locator: &Locator) -> Result<bool> {
        let checked: Option<bool> = self
            .eval_on(locator, "return el ? !!el.checked : null;")
            .await?;
        checked.ok_or_else(|| Error::ElementNotFound(locator.to_string()))
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        debug!("click {}", locator);
        self.eval_status(
            locator,
            r#"
            if (!el) return 'element_not_found';
            el.scrollIntoView({ block: 'center' });
            el.click();
            return 'ok';
            "#,
            "click",
        )
        .await
    }

    async fn set_value(&self, locator: &Locator, value: &str) -> Result<()> {
        debug!("set_value {} = '{}'", locator, value);
        match locator {
            Locator::Css(sel) => {
                self.page.fill(sel, value).await?;
                Ok(())
            }
            Locator::XPath(_) => {
                let body = format!(
                    "if (!el) return 'element_not_found'; const value = {}; {} return 'ok';",
                    js_str(value),
                    SET_NATIVE_VALUE_JS
                );
                self.eval_status(locator, &body, "set value").await
            }
        }
    }

    async fn press_enter(&self, locator: &Locator) -> Result<()> {
        self.eval_status(
            locator,
            "if (!el) return 'element_not_found'; el.focus(); return 'ok';",
            "focus",
        )
        .await?;
        self.page.human().press_key("Enter").await?;
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, option: &str) -> Result<()> {
        debug!("select {} = '{}'", locator, option);
        let body = format!(
            r#"
            if (!el) return 'element_not_found';
            const wanted = {};
            const opt = Array.from(el.options).find(o => o.value === wanted || o.text === wanted);
            if (!opt) return 'option_not_found';
            const value = opt.value;
            {}
            return 'ok';
            "#,
            js_str(option),
            SET_NATIVE_VALUE_JS
        );
        self.eval_status(locator, &body, &format!("'{}'", option))
            .await
    }

    async fn upload_file(&self, locator: &Locator, path: &Path) -> Result<()> {
        let data = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!("upload {} ({} bytes) to {}", name, data.len(), locator);

        let body = format!(
            r#"
            if (!el) return 'element_not_found';
            const bin = atob({data});
            const bytes = new Uint8Array(bin.length);
            for (let i = 0; i < bin.length; i++) bytes[i] = bin.charCodeAt(i);
            const transfer = new DataTransfer();
            transfer.items.add(new File([bytes], {name}, {{ type: {mime} }}));
            el.files = transfer.files;
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return 'ok';
            "#,
            data = js_str(&BASE64.encode(&data)),
            name = js_str(&name),
            mime = js_str(mime_for(path)),
        );
        self.eval_status(locator, &body, "upload").await
    }

    async fn text(&self, locator: &Locator) -> Result<Option<String>> {
        self.eval_on(locator, "return el ? (el.innerText || el.textContent || '').trim() : null;")
            .await
    }

    async fn read_field_value(&self, locator: &Locator) -> Result<String> {
        let value: Option<String> = self
            .eval_on(locator, "return el ? String(el.value ?? '') : null;")
            .await?;
        value.ok_or_else(|| Error::ElementNotFound(locator.to_string()))
    }
}
