use crate::config::{BrowserConfig, Config, FormInput};
use crate::driver::{Driver, EokaDriver};
use crate::form::{FormOptions, PracticeFormPage};
use crate::Result;
use eoka::Browser;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Result of running a scenario.
#[derive(Debug)]
pub struct RunResult {
    /// Whether every step completed.
    pub success: bool,
    /// Error message if failed.
    pub error: Option<String>,
    /// Workflow steps that completed (open, each setter, submit, verify).
    pub steps_executed: usize,
    /// Wall-clock time of the run.
    pub duration_ms: u64,
}

/// Runs scenarios against a browser it owns.
pub struct Runner {
    browser: Browser,
    driver: EokaDriver,
}

impl Runner {
    /// Launch a browser for `config`.
    pub async fn new(config: &BrowserConfig) -> Result<Self> {
        let stealth = eoka::StealthConfig {
            headless: config.headless,
            proxy: config.proxy.clone(),
            user_agent: config.user_agent.clone(),
            viewport_width: config.viewport.as_ref().map(|v| v.width).unwrap_or(1280),
            viewport_height: config.viewport.as_ref().map(|v| v.height).unwrap_or(720),
            ..Default::default()
        };

        debug!(
            "Launching browser (headless: {}, proxy: {:?})",
            config.headless, config.proxy
        );
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            driver: EokaDriver::new(page),
        })
    }

    /// Driver over the runner's page.
    pub fn driver(&self) -> &EokaDriver {
        &self.driver
    }

    /// Fill, submit and verify. Workflow failures are reported in the
    /// [`RunResult`]; only browser setup problems are returned as `Err`.
    pub async fn run(&self, config: &Config) -> Result<RunResult> {
        let start = Instant::now();
        let mut steps = 0;

        let outcome = run_scenario(&self.driver, config, &mut steps).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => Ok(RunResult {
                success: true,
                error: None,
                steps_executed: steps,
                duration_ms,
            }),
            Err(e) => {
                warn!("Scenario '{}' failed after {} steps: {}", config.name, steps, e);
                self.handle_failure(config).await;
                Ok(RunResult {
                    success: false,
                    error: Some(e.to_string()),
                    steps_executed: steps,
                    duration_ms,
                })
            }
        }
    }

    async fn handle_failure(&self, config: &Config) {
        let Some(path) = config
            .on_failure
            .as_ref()
            .and_then(|f| f.screenshot.as_ref())
        else {
            return;
        };
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let path = path.replace("{timestamp}", &timestamp.to_string());
        info!("Saving failure screenshot to: {}", path);
        match self.driver.page().screenshot().await {
            Ok(data) => {
                if let Err(e) = std::fs::write(&path, data) {
                    warn!("Failed to save screenshot: {}", e);
                }
            }
            Err(e) => warn!("Failed to take screenshot: {}", e),
        }
    }

    /// Close the browser.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

/// Drive one scenario through `driver`, counting completed steps.
///
/// Fields are entered in the order they appear on the form.
pub async fn run_scenario<D: Driver + ?Sized>(
    driver: &D,
    config: &Config,
    steps: &mut usize,
) -> Result<()> {
    let options = FormOptions {
        wait: config.wait,
        assets_dir: config.assets_dir.clone(),
    };
    let form = PracticeFormPage::open_url_with(driver, options).await?;
    *steps += 1;

    let form = fill(form, &config.form, steps).await?;
    form.submit().await?;
    *steps += 1;

    if !config.expect.is_empty() {
        PracticeFormPage::assert_practice_form_with(driver, &config.expect, &config.wait).await?;
        *steps += 1;
    }
    Ok(())
}

async fn fill<'a, D: Driver + ?Sized>(
    mut form: PracticeFormPage<'a, D>,
    input: &FormInput,
    steps: &mut usize,
) -> Result<PracticeFormPage<'a, D>> {
    if let Some(ref v) = input.first_name {
        form = form.with_firstname(v).await?;
        *steps += 1;
    }
    if let Some(ref v) = input.last_name {
        form = form.with_lastname(v).await?;
        *steps += 1;
    }
    if let Some(ref v) = input.email {
        form = form.with_email(v).await?;
        *steps += 1;
    }
    if let Some(ref v) = input.gender {
        form = form.with_gender(v).await?;
        *steps += 1;
    }
    if let Some(ref v) = input.mobile {
        form = form.with_mobile_number(v).await?;
        *steps += 1;
    }
    if let Some(ref dob) = input.date_of_birth {
        form = form
            .with_date_of_birth(dob.day, &dob.month, &dob.year)
            .await?;
        *steps += 1;
    }
    if !input.subjects.is_empty() {
        form = form.with_subjects(&input.subjects).await?;
        *steps += 1;
    }
    if !input.hobbies.is_empty() {
        form = form.with_hobbies(&input.hobbies).await?;
        *steps += 1;
    }
    if let Some(ref v) = input.picture {
        form = form.with_uploaded_picture(v).await?;
        *steps += 1;
    }
    if let Some(ref v) = input.address {
        form = form.with_address(v).await?;
        *steps += 1;
    }
    if let (Some(state), Some(city)) = (&input.state, &input.city) {
        form = form.with_state_and_city(state, city).await?;
        *steps += 1;
    }
    Ok(form)
}
