//! # practice-form
//!
//! Drives the DemoQA student registration form through a browser, submits it,
//! and checks the values echoed back in the confirmation modal.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use practice_form::{EokaDriver, ExpectedValues, PracticeFormPage};
//!
//! # #[tokio::main]
//! # async fn main() -> practice_form::Result<()> {
//! let browser = eoka::Browser::launch().await?;
//! let driver = EokaDriver::new(browser.new_page("about:blank").await?);
//!
//! PracticeFormPage::open_url(&driver)
//!     .await?
//!     .with_firstname("Jane")
//!     .await?
//!     .with_lastname("Doe")
//!     .await?
//!     .with_gender("Female")
//!     .await?
//!     .with_date_of_birth(10, "August", "1998")
//!     .await?
//!     .submit()
//!     .await?;
//!
//! let expected = ExpectedValues::new()
//!     .with("Student Name", "Jane Doe")
//!     .with("Gender", "Female")
//!     .with("Date of Birth", "10 August,1998");
//! PracticeFormPage::assert_practice_form(&driver, &expected).await?;
//!
//! browser.close().await?;
//! # Ok(())
//! # }
//! ```

mod config;
pub mod driver;
pub mod form;
pub mod locators;
mod runner;
pub mod wait;

use std::path::PathBuf;

pub use config::{
    BrowserConfig, Config, DateOfBirthInput, FormInput, OnFailure, ParamDef, Params, Viewport,
};
pub use driver::{Driver, EokaDriver};
pub use form::{DateSpec, ExpectedValues, FormOptions, PracticeFormPage, BASE_URL};
pub use locators::{Field, Locator, Template};
pub use runner::{run_scenario, RunResult, Runner};
pub use wait::{wait_until, WaitConfig, WaitTimeout};

/// Result type for practice-form operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while driving, submitting or verifying the form.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("date picker: {0}")]
    DatePicker(String),

    #[error("{field} never read back as '{expected}' (last read: '{actual}')")]
    VerificationTimeout {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("assertion failed for '{key}': expected '{expected}', {}", observed(.actual))]
    Assertion {
        key: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),
}

fn observed(actual: &Option<String>) -> String {
    match actual {
        Some(a) => format!("got '{}'", a),
        None => "row is missing".to_string(),
    }
}
