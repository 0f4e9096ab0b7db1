//! Field validation for incoming requests
//!
//! Raw request fields are checked here before anything reaches storage. Each
//! rule short-circuits with its own [`ValidationError`], and the error
//! messages are part of the HTTP contract.

use thiserror::Error;

use crate::{NewSubscription, Period, SubscriptionFilter, SubscriptionUpdate, UserId};

/// Validation failures, one per rejected condition
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty service name")]
    EmptyServiceName,

    #[error("request price is invalid")]
    InvalidPrice,

    #[error("empty user id")]
    EmptyUserId,

    #[error("request user id is invalid")]
    InvalidUserId,

    #[error("empty start date")]
    EmptyStartDate,

    #[error("request start date is invalid")]
    InvalidStartDate,

    #[error("empty end date")]
    EmptyEndDate,

    #[error("request end date is invalid")]
    InvalidEndDate,

    #[error("request start date greater than end date")]
    StartAfterEnd,

    #[error("user id filter is invalid")]
    InvalidUserIdFilter,

    #[error("no offset value while limit is set")]
    MissingOffset,

    #[error("no limit value while offset is set")]
    MissingLimit,

    #[error("invalid limit value (less than zero)")]
    NegativeLimit,

    #[error("invalid offset value (less than zero)")]
    NegativeOffset,

    #[error("no fields to update")]
    EmptyUpdate,
}

/// Raw fields of a create request
#[derive(Debug, Clone, Default)]
pub struct CreateSubscriptionInput {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: String,
    /// Empty or absent means "one month after start"
    pub end_date: Option<String>,
}

impl CreateSubscriptionInput {
    /// Check every field in order and build the creation spec
    pub fn validate(&self) -> Result<NewSubscription, ValidationError> {
        let service_name = validate_service_name(&self.service_name)?;
        let price = validate_price(self.price)?;

        if self.user_id.is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        let user_id = UserId::parse(&self.user_id).map_err(|_| ValidationError::InvalidUserId)?;

        let start = validate_start(&self.start_date)?;

        let end = match non_empty(self.end_date.as_deref()) {
            Some(raw) => {
                let end = parse_end(raw)?;
                if start.is_after(&end) {
                    return Err(ValidationError::StartAfterEnd);
                }
                end
            }
            None => start.add_months(0, 1),
        };

        Ok(NewSubscription {
            service_name,
            price,
            user_id,
            start,
            end,
        })
    }
}

/// Raw fields of a partial update request
#[derive(Debug, Clone, Default)]
pub struct UpdateSubscriptionInput {
    pub service_name: Option<String>,
    pub price: Option<i64>,
    pub start_date: Option<String>,
    /// Empty means "leave unchanged"
    pub end_date: Option<String>,
}

impl UpdateSubscriptionInput {
    /// Check the supplied fields and build the update
    pub fn validate(&self) -> Result<SubscriptionUpdate, ValidationError> {
        let service_name = self
            .service_name
            .as_deref()
            .map(validate_service_name)
            .transpose()?;
        let price = self.price.map(validate_price).transpose()?;
        let start = self.start_date.as_deref().map(validate_start).transpose()?;
        let end = non_empty(self.end_date.as_deref())
            .map(parse_end)
            .transpose()?;

        if let (Some(start), Some(end)) = (start, end) {
            if start.is_after(&end) {
                return Err(ValidationError::StartAfterEnd);
            }
        }

        let update = SubscriptionUpdate {
            service_name,
            price,
            start,
            end,
        };
        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }

        Ok(update)
    }
}

/// Raw fields of a total-cost request
#[derive(Debug, Clone, Default)]
pub struct TotalCostInput {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

impl TotalCostInput {
    /// Check the window and optional filters
    pub fn validate(&self) -> Result<SubscriptionFilter, ValidationError> {
        let start = validate_start(self.start_date.as_deref().unwrap_or_default())?;

        let end_raw = non_empty(self.end_date.as_deref()).ok_or(ValidationError::EmptyEndDate)?;
        let end = parse_end(end_raw)?;

        if start.is_after(&end) {
            return Err(ValidationError::StartAfterEnd);
        }

        let mut filter = SubscriptionFilter::window(start, end);

        if let Some(raw) = non_empty(self.user_id.as_deref()) {
            let user_id = UserId::parse(raw).map_err(|_| ValidationError::InvalidUserIdFilter)?;
            filter = filter.with_user(user_id);
        }

        if let Some(name) = non_empty(self.service_name.as_deref()) {
            filter = filter.with_service_name(name);
        }

        Ok(filter)
    }
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// Pair up optional limit and offset.
    ///
    /// Both absent means "no paging". Exactly one present is an error.
    pub fn from_parts(
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Option<Self>, ValidationError> {
        match (limit, offset) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ValidationError::MissingOffset),
            (None, Some(_)) => Err(ValidationError::MissingLimit),
            (Some(limit), _) if limit < 0 => Err(ValidationError::NegativeLimit),
            (_, Some(offset)) if offset < 0 => Err(ValidationError::NegativeOffset),
            (Some(limit), Some(offset)) => Ok(Some(Self { limit, offset })),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn validate_service_name(name: &str) -> Result<String, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyServiceName);
    }
    Ok(name.to_string())
}

fn validate_price(price: i64) -> Result<i32, ValidationError> {
    if price < 0 {
        return Err(ValidationError::InvalidPrice);
    }
    i32::try_from(price).map_err(|_| ValidationError::InvalidPrice)
}

fn validate_start(raw: &str) -> Result<Period, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::EmptyStartDate);
    }
    Period::parse_compact(raw).map_err(|_| ValidationError::InvalidStartDate)
}

fn parse_end(raw: &str) -> Result<Period, ValidationError> {
    Period::parse_compact(raw).map_err(|_| ValidationError::InvalidEndDate)
}
