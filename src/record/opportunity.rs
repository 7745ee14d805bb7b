//! Opportunity: a dependent record owned by exactly one account.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FieldValue, Record, RecordId};

/// A sales opportunity linked to an [`Account`](super::Account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    /// Store id, `None` until inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Display name, unique per account within this crate's upsert paths.
    pub name: String,

    /// Parent account.
    pub account_id: RecordId,

    /// Sales stage.
    pub stage: String,

    /// Expected amount.
    pub amount: Decimal,

    /// Expected close date.
    pub close_date: NaiveDate,
}

impl Opportunity {
    /// Field name of [`Opportunity::name`].
    pub const NAME: &'static str = "name";
    /// Field name of [`Opportunity::account_id`].
    pub const ACCOUNT_ID: &'static str = "account_id";
    /// Field name of [`Opportunity::stage`].
    pub const STAGE: &'static str = "stage";
    /// Field name of [`Opportunity::amount`].
    pub const AMOUNT: &'static str = "amount";
    /// Field name of [`Opportunity::close_date`].
    pub const CLOSE_DATE: &'static str = "close_date";
}

impl Record for Opportunity {
    const KIND: &'static str = "Opportunity";
    const FIELDS: &'static [&'static str] = &[
        "id",
        Self::NAME,
        Self::ACCOUNT_ID,
        Self::STAGE,
        Self::AMOUNT,
        Self::CLOSE_DATE,
    ];

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            Self::NAME => Some(self.name.as_str().into()),
            Self::ACCOUNT_ID => Some(self.account_id.into()),
            Self::STAGE => Some(self.stage.as_str().into()),
            Self::AMOUNT => Some(self.amount.into()),
            Self::CLOSE_DATE => Some(self.close_date.into()),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        if self.stage.trim().is_empty() {
            return Err("stage is required".to_string());
        }
        if self.account_id.is_nil() {
            return Err("account_id must reference an account".to_string());
        }
        Ok(())
    }
}
