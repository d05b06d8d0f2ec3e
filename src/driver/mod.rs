//! Browser capability consumed by the form workflow.
//!
//! Every method is a single probe or action; none of them waits for a
//! condition. Waiting is the caller's job (see [`crate::wait`]).

mod cdp;

pub use cdp::EokaDriver;

use crate::locators::Locator;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait(?Send)]
pub trait Driver {
    /// Load `url` in the current page.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Whether `locator` matches an element right now.
    async fn exists(&self, locator: &Locator) -> Result<bool>;

    /// Whether the element is rendered and visible. `false` when absent.
    async fn is_visible(&self, locator: &Locator) -> Result<bool>;

    /// Checked state of a checkbox or radio input.
    async fn is_checked(&self, locator: &Locator) -> Result<bool>;

    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Replace the element's value with `value`.
    async fn set_value(&self, locator: &Locator, value: &str) -> Result<()>;

    /// Focus the element and press Enter.
    async fn press_enter(&self, locator: &Locator) -> Result<()>;

    /// Pick the `<option>` whose value or visible text equals `option`.
    async fn select_option(&self, locator: &Locator, option: &str) -> Result<()>;

    /// Attach the file at `path` to a file input.
    async fn upload_file(&self, locator: &Locator, path: &Path) -> Result<()>;

    /// Visible text of the element, `None` when nothing matches.
    async fn text(&self, locator: &Locator) -> Result<Option<String>>;

    /// Current `value` of an input, read straight from the live DOM.
    async fn read_field_value(&self, locator: &Locator) -> Result<String>;
}
