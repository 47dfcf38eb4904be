use super::ToolContext;
use crate::types::{Tool, ToolCallError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize, JsonSchema, Default)]
#[schemars(
    title = "get_current_date",
    description = "Get the current date and time. Use this for questions like 'what day is today', 'what is the date', 'current time'."
)]
pub struct GetCurrentDate {}

#[async_trait]
impl Tool for GetCurrentDate {
    type Context = ToolContext;

    async fn apply(&self, _: &Self::Context) -> Result<String, ToolCallError> {
        debug!("get_current_date called");
        Ok(format_date(&Local::now()))
    }
}

pub(crate) fn format_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%A, %Y-%m-%d, %H:%M:%S").to_string()
}
