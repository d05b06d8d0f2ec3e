//! Element locators for the practice form.
//!
//! All selector text lives here. Interpolated templates go through
//! [`locator_for`], which quotes the key for the target syntax.

use std::fmt;

/// How an element is addressed in the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// CSS selector, resolved with `document.querySelector`.
    Css(String),
    /// XPath expression, resolved with `document.evaluate`.
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// The raw selector or expression text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css '{}'", s),
            Self::XPath(s) => write!(f, "xpath '{}'", s),
        }
    }
}

/// Fixed elements of the form and its confirmation modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    MainHeader,
    FirstName,
    LastName,
    Email,
    MobileNumber,
    DateOfBirthInput,
    DatePicker,
    DatePickerMonth,
    DatePickerYear,
    SubjectsInput,
    UploadPicture,
    CurrentAddress,
    StateInput,
    CityInput,
    Submit,
    ConfirmationModal,
}

/// Locator for a fixed element.
pub fn field(field: Field) -> Locator {
    let css = match field {
        Field::MainHeader => ".practice-form-wrapper h5",
        Field::FirstName => "#firstName",
        Field::LastName => "#lastName",
        Field::Email => "#userEmail",
        Field::MobileNumber => "#userNumber",
        Field::DateOfBirthInput => "#dateOfBirthInput",
        Field::DatePicker => ".react-datepicker",
        Field::DatePickerMonth => ".react-datepicker .react-datepicker__month-select",
        Field::DatePickerYear => ".react-datepicker .react-datepicker__year-select",
        Field::SubjectsInput => "#subjectsContainer input",
        Field::UploadPicture => "#uploadPicture",
        Field::CurrentAddress => "#currentAddress",
        Field::StateInput => "#state input",
        Field::CityInput => "#city input",
        Field::Submit => "#submit",
        Field::ConfirmationModal => ".modal-content .table-responsive",
    };
    Locator::css(css)
}

/// Templates that take a caller-supplied key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Label of the gender radio whose value is the key.
    Gender,
    /// Day cell of the open picker's current month whose label is the key.
    DatePickerDay,
    /// Hobby label with the key as its exact text.
    Hobby,
    /// Checkbox that belongs to the hobby label.
    HobbyCheckbox,
    /// Value cell of the confirmation row labelled with the key.
    ConfirmationValue,
}

/// Build the locator for `template` addressed by `key`.
pub fn locator_for(template: Template, key: &str) -> Locator {
    match template {
        Template::Gender => Locator::css(format!(
            "#genterWrapper input[name=\"gender\"][value={}] + label",
            css_string(key)
        )),
        Template::DatePickerDay => Locator::xpath(format!(
            "//div[contains(@class, 'react-datepicker__month-container')]\
             //div[contains(concat(' ', normalize-space(@class), ' '), ' react-datepicker__day ')\
             and not(contains(@class, 'react-datepicker__day--outside-month'))\
             and normalize-space(text())={}]",
            xpath_literal(key)
        )),
        Template::Hobby => Locator::xpath(format!(
            "//div[@id='hobbiesWrapper']//label[text()={}]",
            xpath_literal(key)
        )),
        Template::HobbyCheckbox => Locator::xpath(format!(
            "//div[@id='hobbiesWrapper']//label[text()={}]/preceding-sibling::input[@type='checkbox']",
            xpath_literal(key)
        )),
        Template::ConfirmationValue => Locator::xpath(format!(
            "//div[contains(@class, 'table-responsive')]//td[text()={}]/following-sibling::td",
            xpath_literal(key)
        )),
    }
}

/// Quote `s` as a CSS string.
fn css_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Quote `s` as an XPath 1.0 string literal.
///
/// XPath has no escapes, so a value holding both quote kinds becomes a
/// `concat()` of single-quoted runs and `"'"` pieces.
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{}'", s);
    }
    if !s.contains('"') {
        return format!("\"{}\"", s);
    }
    let parts: Vec<String> = s
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}
