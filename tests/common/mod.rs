//! In-memory stand-in for the DemoQA practice form.
//!
//! Models just enough of the page for the workflow: inputs, the gender
//! radios, the date picker popup, the subject/state/city autocompletes,
//! hobby checkboxes and the confirmation modal.

#![allow(dead_code)]

use async_trait::async_trait;
use practice_form::locators::{field, locator_for};
use practice_form::{Driver, Error, Field, Locator, Result, Template, WaitConfig, BASE_URL};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

pub const GENDERS: &[&str] = &["Male", "Female", "Other"];
pub const HOBBIES: &[&str] = &["Sports", "Reading", "Music"];
pub const SUBJECTS: &[&str] = &["Maths", "Physics", "Computer Science", "English", "Arts"];
pub const MONTHS: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
pub const STATES: &[(&str, &[&str])] = &[
    ("NCR", &["Delhi", "Gurgaon", "Noida"]),
    ("Uttar Pradesh", &["Agra", "Lucknow", "Merrut"]),
    ("Haryana", &["Karnal", "Panipat"]),
];
pub const ROWS: &[&str] = &[
    "Student Name",
    "Student Email",
    "Gender",
    "Mobile",
    "Date of Birth",
    "Subjects",
    "Hobbies",
    "Picture",
    "Address",
    "State and City",
];

/// Short budget so failing waits finish quickly.
pub fn fast_wait() -> WaitConfig {
    WaitConfig::new(150, 5)
}

/// Ways the fake page can misbehave.
#[derive(Debug, Default, Clone)]
pub struct Quirks {
    /// The heading never renders.
    pub no_header: bool,
    /// The mobile input keeps only this many characters.
    pub mobile_max_len: Option<usize>,
    /// Clicking the date input does not open the picker.
    pub picker_never_opens: bool,
    /// The picker ignores day clicks and stays open.
    pub picker_sticks_open: bool,
    /// Confirmation rows that are not rendered.
    pub missing_rows: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Element {
    Input(Field),
    GenderOption(String),
    Day(u32),
    HobbyLabel(String),
    HobbyCheckbox(String),
    ConfirmationValue(String),
}

#[derive(Debug, Default)]
struct Page {
    loaded: bool,
    inputs: HashMap<&'static str, String>,
    gender: Option<String>,
    picker_open: bool,
    month: Option<String>,
    year: Option<String>,
    date: Option<String>,
    subjects: Vec<String>,
    hobbies: Vec<String>,
    picture: Option<String>,
    state: Option<String>,
    city: Option<String>,
    submitted: bool,
    log: Vec<String>,
}

pub struct FakeForm {
    elements: HashMap<Locator, Element>,
    quirks: Quirks,
    page: RefCell<Page>,
}

impl FakeForm {
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        let mut elements = HashMap::new();
        for f in [
            Field::MainHeader,
            Field::FirstName,
            Field::LastName,
            Field::Email,
            Field::MobileNumber,
            Field::DateOfBirthInput,
            Field::DatePicker,
            Field::DatePickerMonth,
            Field::DatePickerYear,
            Field::SubjectsInput,
            Field::UploadPicture,
            Field::CurrentAddress,
            Field::StateInput,
            Field::CityInput,
            Field::Submit,
            Field::ConfirmationModal,
        ] {
            elements.insert(field(f), Element::Input(f));
        }
        for g in GENDERS {
            elements.insert(
                locator_for(Template::Gender, g),
                Element::GenderOption(g.to_string()),
            );
        }
        for day in 1..=31u32 {
            elements.insert(
                locator_for(Template::DatePickerDay, &day.to_string()),
                Element::Day(day),
            );
        }
        for h in HOBBIES {
            elements.insert(
                locator_for(Template::Hobby, h),
                Element::HobbyLabel(h.to_string()),
            );
            elements.insert(
                locator_for(Template::HobbyCheckbox, h),
                Element::HobbyCheckbox(h.to_string()),
            );
        }
        for row in ROWS {
            elements.insert(
                locator_for(Template::ConfirmationValue, row),
                Element::ConfirmationValue(row.to_string()),
            );
        }

        Self {
            elements,
            quirks,
            page: RefCell::new(Page::default()),
        }
    }

    /// Interaction log, e.g. `["select month May", "click day 15"]`.
    pub fn log(&self) -> Vec<String> {
        self.page.borrow().log.clone()
    }

    pub fn hobbies(&self) -> Vec<String> {
        self.page.borrow().hobbies.clone()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.page.borrow().subjects.clone()
    }

    pub fn input(&self, f: Field) -> Option<String> {
        self.page.borrow().inputs.get(input_key(f)).cloned()
    }

    pub fn picker_open(&self) -> bool {
        self.page.borrow().picker_open
    }

    pub fn submitted(&self) -> bool {
        self.page.borrow().submitted
    }

    fn element(&self, locator: &Locator) -> Result<&Element> {
        self.elements
            .get(locator)
            .ok_or_else(|| Error::ElementNotFound(locator.to_string()))
    }

    fn present(&self, element: &Element) -> bool {
        let page = self.page.borrow();
        if !page.loaded {
            return false;
        }
        match element {
            Element::Input(Field::MainHeader) => !self.quirks.no_header,
            Element::Input(Field::DatePicker)
            | Element::Input(Field::DatePickerMonth)
            | Element::Input(Field::DatePickerYear) => page.picker_open,
            Element::Input(Field::ConfirmationModal) => page.submitted,
            Element::Input(Field::CityInput) => page.state.is_some(),
            Element::Input(_) => !page.submitted,
            Element::Day(_) => page.picker_open && page.month.is_some() && page.year.is_some(),
            Element::ConfirmationValue(row) => {
                page.submitted && !self.quirks.missing_rows.iter().any(|r| r == row)
            }
            _ => !page.submitted,
        }
    }

    fn require(&self, locator: &Locator) -> Result<&Element> {
        let element = self.element(locator)?;
        if !self.present(element) {
            return Err(Error::ElementNotFound(locator.to_string()));
        }
        Ok(element)
    }

    fn row_value(&self, row: &str) -> String {
        let page = self.page.borrow();
        let input = |f: Field| page.inputs.get(input_key(f)).cloned().unwrap_or_default();
        match row {
            "Student Name" => format!("{} {}", input(Field::FirstName), input(Field::LastName))
                .trim()
                .to_string(),
            "Student Email" => input(Field::Email),
            "Gender" => page.gender.clone().unwrap_or_default(),
            "Mobile" => input(Field::MobileNumber),
            "Date of Birth" => page.date.clone().unwrap_or_default(),
            "Subjects" => page.subjects.join(", "),
            "Hobbies" => page.hobbies.join(", "),
            "Picture" => page.picture.clone().unwrap_or_default(),
            "Address" => input(Field::CurrentAddress),
            "State and City" => match (&page.state, &page.city) {
                (Some(s), Some(c)) => format!("{} {}", s, c),
                (Some(s), None) => s.clone(),
                _ => String::new(),
            },
            _ => String::new(),
        }
    }
}

fn input_key(f: Field) -> &'static str {
    match f {
        Field::FirstName => "firstName",
        Field::LastName => "lastName",
        Field::Email => "userEmail",
        Field::MobileNumber => "userNumber",
        Field::CurrentAddress => "currentAddress",
        Field::SubjectsInput => "subjectsInput",
        Field::StateInput => "stateInput",
        Field::CityInput => "cityInput",
        _ => "other",
    }
}

#[async_trait(?Send)]
impl Driver for FakeForm {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut page = self.page.borrow_mut();
        page.log.push(format!("goto {}", url));
        page.loaded = url == BASE_URL;
        Ok(())
    }

    async fn exists(&self, locator: &Locator) -> Result<bool> {
        Ok(self
            .elements
            .get(locator)
            .map(|e| self.present(e))
            .unwrap_or(false))
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        self.exists(locator).await
    }

    async fn is_checked(&self, locator: &Locator) -> Result<bool> {
        match self.require(locator)? {
            Element::HobbyCheckbox(h) => Ok(self.page.borrow().hobbies.contains(h)),
            _ => Ok(false),
        }
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let element = self.require(locator)?.clone();
        let mut page = self.page.borrow_mut();
        match element {
            Element::GenderOption(g) => {
                page.log.push(format!("click gender {}", g));
                page.gender = Some(g);
            }
            Element::Input(Field::DateOfBirthInput) => {
                page.log.push("open picker".into());
                page.picker_open = !self.quirks.picker_never_opens;
            }
            Element::Day(day) => {
                page.log.push(format!("click day {}", day));
                if !self.quirks.picker_sticks_open {
                    let month = page.month.clone().unwrap_or_default();
                    let year = page.year.clone().unwrap_or_default();
                    page.date = Some(format!("{:02} {},{}", day, month, year));
                    page.picker_open = false;
                }
            }
            Element::HobbyLabel(h) => {
                page.log.push(format!("click hobby {}", h));
                if let Some(pos) = page.hobbies.iter().position(|x| *x == h) {
                    page.hobbies.remove(pos);
                } else {
                    page.hobbies.push(h);
                }
            }
            Element::Input(Field::Submit) => {
                page.log.push("submit".into());
                page.submitted = true;
                page.picker_open = false;
            }
            other => page.log.push(format!("click {:?}", other)),
        }
        Ok(())
    }

    async fn set_value(&self, locator: &Locator, value: &str) -> Result<()> {
        let Element::Input(f) = self.require(locator)?.clone() else {
            return Err(Error::ElementNotFound(format!("{} is not an input", locator)));
        };
        let mut page = self.page.borrow_mut();
        let value = match (f, self.quirks.mobile_max_len) {
            (Field::MobileNumber, Some(max)) => value.chars().take(max).collect(),
            _ => value.to_string(),
        };
        page.log.push(format!("type {} {}", input_key(f), value));
        page.inputs.insert(input_key(f), value);
        Ok(())
    }

    async fn press_enter(&self, locator: &Locator) -> Result<()> {
        let Element::Input(f) = self.require(locator)?.clone() else {
            return Err(Error::ElementNotFound(format!("{} is not an input", locator)));
        };
        let mut page = self.page.borrow_mut();
        let typed = page.inputs.remove(input_key(f)).unwrap_or_default();
        page.log.push(format!("enter {} {}", input_key(f), typed));
        match f {
            Field::SubjectsInput => {
                if let Some(s) = SUBJECTS.iter().find(|s| s.eq_ignore_ascii_case(&typed)) {
                    if !page.subjects.iter().any(|x| x == s) {
                        page.subjects.push(s.to_string());
                    }
                }
            }
            Field::StateInput => {
                if let Some((s, _)) = STATES.iter().find(|(s, _)| s.eq_ignore_ascii_case(&typed)) {
                    page.state = Some(s.to_string());
                    page.city = None;
                }
            }
            Field::CityInput => {
                let cities = STATES
                    .iter()
                    .find(|(s, _)| Some(*s) == page.state.as_deref())
                    .map(|(_, c)| *c)
                    .unwrap_or(&[]);
                if let Some(c) = cities.iter().find(|c| c.eq_ignore_ascii_case(&typed)) {
                    page.city = Some(c.to_string());
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, option: &str) -> Result<()> {
        let element = self.require(locator)?.clone();
        let mut page = self.page.borrow_mut();
        match element {
            Element::Input(Field::DatePickerMonth) if MONTHS.contains(&option) => {
                page.log.push(format!("select month {}", option));
                page.month = Some(option.to_string());
            }
            Element::Input(Field::DatePickerYear)
                if option.parse::<u32>().map_or(false, |y| (1900..=2100).contains(&y)) =>
            {
                page.log.push(format!("select year {}", option));
                page.year = Some(option.to_string());
            }
            _ => {
                return Err(Error::ElementNotFound(format!(
                    "option '{}' in {}",
                    option, locator
                )))
            }
        }
        Ok(())
    }

    async fn upload_file(&self, locator: &Locator, path: &Path) -> Result<()> {
        self.require(locator)?;
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let mut page = self.page.borrow_mut();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        page.log.push(format!("upload {}", name));
        page.picture = Some(name);
        Ok(())
    }

    async fn text(&self, locator: &Locator) -> Result<Option<String>> {
        let Some(element) = self.elements.get(locator) else {
            return Ok(None);
        };
        if !self.present(element) {
            return Ok(None);
        }
        match element {
            Element::ConfirmationValue(row) => Ok(Some(self.row_value(row))),
            _ => Ok(Some(String::new())),
        }
    }

    async fn read_field_value(&self, locator: &Locator) -> Result<String> {
        match self.require(locator)? {
            Element::Input(f) => Ok(self
                .page
                .borrow()
                .inputs
                .get(input_key(*f))
                .cloned()
                .unwrap_or_default()),
            _ => Err(Error::ElementNotFound(format!("{} has no value", locator))),
        }
    }
}
