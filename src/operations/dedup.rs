//! Deduplicated opportunity planning.

use std::collections::HashSet;

use chrono::{Months, NaiveDate};

use crate::config::OpportunityDefaults;
use crate::error::ValidationError;
use crate::record::{Opportunity, RecordId};

/// Compute the default close date: `today` plus `months` calendar months,
/// clamped to the last day of the target month.
///
/// # Errors
/// `InvalidCloseDate` if the result falls outside the calendar.
pub fn close_date(today: NaiveDate, months: u32) -> Result<NaiveDate, ValidationError> {
    today
        .checked_add_months(Months::new(months))
        .ok_or(ValidationError::InvalidCloseDate { from: today, months })
}

/// Build new opportunities for every candidate name not in `existing_names`.
///
/// Candidate order is preserved. Candidates are checked only against
/// `existing_names`, never against each other, so a name repeated in the
/// input yields repeated records. Matching is exact and case-sensitive.
///
/// # Errors
/// `InvalidCloseDate` if the default close date overflows.
pub fn plan_new_opportunities<S: AsRef<str>>(
    parent_id: RecordId,
    candidates: &[S],
    existing_names: &HashSet<String>,
    defaults: &OpportunityDefaults,
    today: NaiveDate,
) -> Result<Vec<Opportunity>, ValidationError> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let close = close_date(today, defaults.close_in_months)?;
    Ok(candidates
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|name| !existing_names.contains(*name))
        .map(|name| Opportunity {
            id: None,
            name: name.to_string(),
            account_id: parent_id,
            stage: defaults.stage.clone(),
            amount: defaults.amount,
            close_date: close,
        })
        .collect())
}
