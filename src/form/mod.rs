//! The student registration form as a fluent, chainable workflow.
//!
//! ```rust,no_run
//! # use practice_form::{Driver, PracticeFormPage};
//! # async fn fill(driver: &impl Driver) -> practice_form::Result<()> {
//! PracticeFormPage::open_url(driver)
//!     .await?
//!     .with_firstname("Jane")
//!     .await?
//!     .with_hobbies(&["Sports", "Music"])
//!     .await?
//!     .submit()
//!     .await
//! # }
//! ```

mod date_picker;
mod expected;

pub use date_picker::DateSpec;
pub use expected::ExpectedValues;
pub(crate) use expected::Scalar;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::driver::Driver;
use crate::locators::{self, Field, Locator, Template};
use crate::wait::{wait_until, WaitConfig};
use crate::{Error, Result};
use date_picker::DatePicker;

/// The form under test.
pub const BASE_URL: &str = "https://demoqa.com/automation-practice-form";

const DEFAULT_ASSETS_DIR: &str = "resources/images";

/// Workflow settings.
#[derive(Debug, Clone)]
pub struct FormOptions {
    /// Budget for every condition wait.
    pub wait: WaitConfig,
    /// Directory uploaded pictures are resolved against.
    pub assets_dir: PathBuf,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            wait: WaitConfig::default(),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
        }
    }
}

/// An open registration form.
///
/// Only [`open_url`](Self::open_url) creates one, and [`submit`](Self::submit)
/// consumes it, so setters always run against a loaded form.
pub struct PracticeFormPage<'a, D: Driver + ?Sized> {
    driver: &'a D,
    options: FormOptions,
}

impl<'a, D: Driver + ?Sized> PracticeFormPage<'a, D> {
    /// Load the form with default options.
    pub async fn open_url(driver: &'a D) -> Result<Self> {
        Self::open_url_with(driver, FormOptions::default()).await
    }

    /// Load the form and wait for its heading.
    pub async fn open_url_with(driver: &'a D, options: FormOptions) -> Result<Self> {
        info!("Open practice form: {}", BASE_URL);
        driver
            .goto(BASE_URL)
            .await
            .map_err(|e| Error::Navigation(format!("{}: {}", BASE_URL, e)))?;

        let header = &locators::field(Field::MainHeader);
        wait_until(&options.wait, || async move { driver.is_visible(header).await })
            .await
            .map_err(|e| {
                Error::Navigation(format!("heading {} never became visible: {}", header, e))
            })?;

        Ok(Self { driver, options })
    }

    /// Settings this form was opened with.
    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    // =========================================================================
    // Text inputs
    // =========================================================================

    /// Type the first name.
    pub async fn with_firstname(self, first_name: &str) -> Result<Self> {
        info!("Fill first name: {}", first_name);
        self.fill(Field::FirstName, first_name).await?;
        Ok(self)
    }

    /// Type the last name.
    pub async fn with_lastname(self, last_name: &str) -> Result<Self> {
        info!("Fill last name: {}", last_name);
        self.fill(Field::LastName, last_name).await?;
        Ok(self)
    }

    /// The value goes in as given, malformed or not; the form validates it.
    pub async fn with_email(self, email: &str) -> Result<Self> {
        info!("Fill e-mail: {}", email);
        self.fill(Field::Email, email).await?;
        Ok(self)
    }

    /// Type the current address.
    pub async fn with_address(self, address: &str) -> Result<Self> {
        info!("Fill address: {}", address);
        self.fill(Field::CurrentAddress, address).await?;
        Ok(self)
    }

    /// Type the number, then poll the live value until it reads back exactly.
    ///
    /// The field masks and truncates input, so a mismatch that persists for
    /// the whole wait budget is a [`Error::VerificationTimeout`].
    pub async fn with_mobile_number(self, number: &str) -> Result<Self> {
        info!("Fill mobile number: {}", number);
        let driver = self.driver;
        let input = &locators::field(Field::MobileNumber);
        self.require(input).await?;
        driver.set_value(input, number).await?;

        let last_read = &std::cell::RefCell::new(String::new());
        let matched = wait_until(&self.options.wait, || async move {
            let actual = driver.read_field_value(input).await?;
            let same = actual == number;
            *last_read.borrow_mut() = actual;
            Ok::<_, Error>(same)
        })
        .await;

        if matched.is_err() {
            return Err(Error::VerificationTimeout {
                field: "mobile number".into(),
                expected: number.to_string(),
                actual: last_read.take(),
            });
        }
        Ok(self)
    }

    // =========================================================================
    // Choices
    // =========================================================================

    /// `gender` must be one of the rendered options ("Male", "Female", "Other").
    pub async fn with_gender(self, gender: &str) -> Result<Self> {
        info!("Select gender: {}", gender);
        let option = locators::locator_for(Template::Gender, gender);
        self.require(&option).await?;
        self.driver.click(&option).await?;
        Ok(self)
    }

    /// Pick the date through the calendar popup: month, year, then day.
    pub async fn with_date_of_birth(self, day: u32, month: &str, year: &str) -> Result<Self> {
        info!("Select date of birth: {}, {}, {}", day, month, year);
        let date = DateSpec::new(day, month, year)?;
        DatePicker::new(self.driver, self.options.wait)
            .pick(&date)
            .await?;
        Ok(self)
    }

    /// Type each subject into the autocomplete and commit it with Enter.
    ///
    /// The widget drops names it does not recognise without any signal, so
    /// a misspelt subject only shows up in the confirmation check.
    pub async fn with_subjects<S: AsRef<str>>(self, subjects: &[S]) -> Result<Self> {
        let input = locators::field(Field::SubjectsInput);
        for subject in subjects {
            let subject = subject.as_ref();
            info!("Add subject: {}", subject);
            self.require(&input).await?;
            self.driver.set_value(&input, subject).await?;
            self.driver.press_enter(&input).await?;
        }
        Ok(self)
    }

    /// Tick each hobby by its label. Hobbies that are already ticked are left
    /// alone so repeating a call never unticks one.
    pub async fn with_hobbies<S: AsRef<str>>(self, hobbies: &[S]) -> Result<Self> {
        for hobby in hobbies {
            let hobby = hobby.as_ref();
            info!("Select hobby: {}", hobby);
            let label = locators::locator_for(Template::Hobby, hobby);
            self.require(&label).await?;

            let checkbox = locators::locator_for(Template::HobbyCheckbox, hobby);
            if self.driver.is_checked(&checkbox).await? {
                debug!("hobby '{}' already selected", hobby);
                continue;
            }
            self.driver.click(&label).await?;
        }
        Ok(self)
    }

    // =========================================================================
    // Upload and address
    // =========================================================================

    /// Attach `file_name` from the assets directory.
    pub async fn with_uploaded_picture(self, file_name: &str) -> Result<Self> {
        let path = self.asset_path(file_name);
        info!("Upload file: {}", path.display());
        if let Err(e) = tokio::fs::metadata(&path).await {
            return Err(match e.kind() {
                std::io::ErrorKind::NotFound => Error::FileNotFound(path),
                _ => Error::Io(e),
            });
        }
        let input = locators::field(Field::UploadPicture);
        self.require(&input).await?;
        self.driver.upload_file(&input, &path).await?;
        Ok(self)
    }

    /// Commit the state, then the city. The city list depends on the state,
    /// so `city` has to belong to `state`.
    pub async fn with_state_and_city(self, state: &str, city: &str) -> Result<Self> {
        info!("Select state: {} and city: {}", state, city);
        for (field, value) in [(Field::StateInput, state), (Field::CityInput, city)] {
            let input = locators::field(field);
            self.require(&input).await?;
            self.driver.set_value(&input, value).await?;
            self.driver.press_enter(&input).await?;
        }
        Ok(self)
    }

    // =========================================================================
    // Submit and verify
    // =========================================================================

    /// Submit the form. Outcomes are checked with [`Self::assert_practice_form`].
    pub async fn submit(self) -> Result<()> {
        info!("Click on SUBMIT button");
        let button = locators::field(Field::Submit);
        self.require(&button).await?;
        self.driver.click(&button).await
    }

    /// Check every expected row of the confirmation modal, in order, with the
    /// default wait budget.
    pub async fn assert_practice_form(driver: &D, expected: &ExpectedValues) -> Result<()> {
        Self::assert_practice_form_with(driver, expected, &WaitConfig::default()).await
    }

    /// Each value cell must equal its expected text exactly. The first
    /// missing row or mismatch fails the whole check.
    ///
    /// A modal that never shows up (the form refused to submit) fails on the
    /// first expected row as missing.
    pub async fn assert_practice_form_with(
        driver: &D,
        expected: &ExpectedValues,
        wait: &WaitConfig,
    ) -> Result<()> {
        info!("Verify practice values the same as: {}", expected);
        let modal = &locators::field(Field::ConfirmationModal);
        let shown = wait_until(wait, || async move { driver.is_visible(modal).await }).await;
        if let Err(e) = shown {
            let Some((key, value)) = expected.iter().next() else {
                return Ok(());
            };
            warn!("Confirmation modal {} never appeared: {}", modal, e);
            return Err(Error::Assertion {
                key: key.to_string(),
                expected: value.to_string(),
                actual: None,
            });
        }

        for (key, value) in expected.iter() {
            let cell = &locators::locator_for(Template::ConfirmationValue, key);
            let last_seen = &std::cell::RefCell::new(None);
            let matched = wait_until(wait, || async move {
                let text = driver.text(cell).await?;
                let same = text.as_deref() == Some(value);
                *last_seen.borrow_mut() = text;
                Ok::<_, Error>(same)
            })
            .await;

            if matched.is_err() {
                return Err(Error::Assertion {
                    key: key.to_string(),
                    expected: value.to_string(),
                    actual: last_seen.take(),
                });
            }
            debug!("'{}' = '{}'", key, value);
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Wait for `locator` to exist.
    async fn require(&self, locator: &Locator) -> Result<()> {
        let driver = self.driver;
        wait_until(&self.options.wait, || async move { driver.exists(locator).await })
            .await
            .map_err(|e| Error::ElementNotFound(format!("{}: {}", locator, e)))
    }

    async fn fill(&self, field: Field, value: &str) -> Result<()> {
        let input = locators::field(field);
        self.require(&input).await?;
        self.driver.set_value(&input, value).await
    }

    fn asset_path(&self, file_name: &str) -> PathBuf {
        resolve_asset(&self.options.assets_dir, file_name)
    }
}

fn resolve_asset(assets_dir: &Path, file_name: &str) -> PathBuf {
    assets_dir.join(file_name)
}
