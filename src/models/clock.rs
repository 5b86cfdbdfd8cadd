//! Calendar helpers shared by the date validations

use chrono::{Local, NaiveDate};

use super::error::{ModelError, ModelResult};

/// The local calendar date all "not in the future" checks compare against
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Fail if `date` is after today
pub(crate) fn ensure_not_future(field: &'static str, date: NaiveDate) -> ModelResult<()> {
    let today = today();
    if date > today {
        return Err(ModelError::validation(
            field,
            format!("{} is in the future (today is {})", date, today),
        ));
    }
    Ok(())
}
