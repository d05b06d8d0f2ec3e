//! Calendar popup protocol for the date-of-birth input.
//!
//! The picker re-renders its day grid whenever month or year changes, so the
//! selections go month, year, then day, and the panel closing is the signal
//! that the day click was accepted.

use std::fmt;

use tracing::debug;

use crate::driver::Driver;
use crate::locators::{self, Field, Template};
use crate::wait::{wait_until, WaitConfig};
use crate::{Error, Result};

/// A date as the picker's three selectors see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSpec {
    /// Day of month, 1..=31.
    pub day: u32,
    /// Month name as listed in the month dropdown, e.g. "August".
    pub month: String,
    /// Year as listed in the year dropdown, e.g. "1998".
    pub year: String,
}

impl DateSpec {
    pub fn new(day: u32, month: impl Into<String>, year: impl Into<String>) -> Result<Self> {
        if !(1..=31).contains(&day) {
            return Err(Error::DatePicker(format!(
                "day {} is outside 1..=31",
                day
            )));
        }
        Ok(Self {
            day,
            month: month.into(),
            year: year.into(),
        })
    }
}

/// Renders the way the confirmation modal shows it: `10 August,1998`.
impl fmt::Display for DateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02} {},{}", self.day, self.month, self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PickerState {
    Closed,
    Open,
    MonthYearSet,
}

impl fmt::Display for PickerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::MonthYearSet => "month/year set",
        })
    }
}

pub(crate) struct DatePicker<'a, D: Driver + ?Sized> {
    driver: &'a D,
    wait: WaitConfig,
    state: PickerState,
}

impl<'a, D: Driver + ?Sized> DatePicker<'a, D> {
    pub(crate) fn new(driver: &'a D, wait: WaitConfig) -> Self {
        Self {
            driver,
            wait,
            state: PickerState::Closed,
        }
    }

    /// Drive the full protocol for `date`.
    pub(crate) async fn pick(&mut self, date: &DateSpec) -> Result<()> {
        self.open().await?;
        self.select_month_year(&date.month, &date.year).await?;
        self.select_day(date.day).await
    }

    fn expect_state(&self, expected: PickerState, step: &str) -> Result<()> {
        if self.state != expected {
            return Err(Error::DatePicker(format!(
                "cannot {} while picker is {}",
                step, self.state
            )));
        }
        Ok(())
    }

    fn transition(&mut self, to: PickerState) {
        debug!("date picker: {} -> {}", self.state, to);
        self.state = to;
    }

    /// Closed -> Open: click the input and wait for the panel.
    pub(crate) async fn open(&mut self) -> Result<()> {
        self.expect_state(PickerState::Closed, "open")?;
        let driver = self.driver;
        let input = locators::field(Field::DateOfBirthInput);
        driver.click(&input).await?;

        let panel = &locators::field(Field::DatePicker);
        wait_until(&self.wait, || async move { driver.is_visible(panel).await })
            .await
            .map_err(|e| Error::DatePicker(format!("panel did not open: {}", e)))?;
        self.transition(PickerState::Open);
        Ok(())
    }

    /// Open -> MonthYearSet. Month first: the year list can depend on it.
    pub(crate) async fn select_month_year(&mut self, month: &str, year: &str) -> Result<()> {
        self.expect_state(PickerState::Open, "select month and year")?;
        self.driver
            .select_option(&locators::field(Field::DatePickerMonth), month)
            .await?;
        self.driver
            .select_option(&locators::field(Field::DatePickerYear), year)
            .await?;
        self.transition(PickerState::MonthYearSet);
        Ok(())
    }

    /// MonthYearSet -> Closed: click the day and wait for the panel to go away.
    pub(crate) async fn select_day(&mut self, day: u32) -> Result<()> {
        self.expect_state(PickerState::MonthYearSet, "select a day")?;
        let driver = self.driver;
        let cell = &locators::locator_for(Template::DatePickerDay, &day.to_string());
        wait_until(&self.wait, || async move { driver.exists(cell).await })
            .await
            .map_err(|e| Error::DatePicker(format!("no day cell {} in view: {}", day, e)))?;
        driver.click(cell).await?;

        let panel = &locators::field(Field::DatePicker);
        wait_until(&self.wait, || async move {
            driver.is_visible(panel).await.map(|visible| !visible)
        })
        .await
        .map_err(|e| {
            Error::DatePicker(format!("panel still open after picking day {}: {}", day, e))
        })?;
        self.transition(PickerState::Closed);
        Ok(())
    }
}
