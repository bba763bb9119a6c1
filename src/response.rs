//! Chat backend responses.
//!
//! This is the only place raw JSON is interpreted. Rows come out as [`Row`]
//! values and column metadata as [`ColumnMetadata`]; nothing downstream looks
//! at `serde_json::Value` again.

use std::io::Read;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    data::{Row, row_from_json},
    metadata::ColumnMetadata,
};

pub const NO_RESPONSE_ANSWER: &str = "No response received";
pub const BACKEND_FAILURE_MESSAGE: &str = "Failed to process your request. Please try again.";

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid response JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data row {index} is not an object")]
    InvalidRow { index: usize },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    status: Option<String>,
    error: Option<String>,
    answer: Option<String>,
    data: Option<Vec<serde_json::Value>>,
    columns: Option<Vec<ColumnMetadata>>,
    suggested_questions: Option<Vec<String>>,
    clarifying_question: Option<String>,
    pipeline: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub answer: String,
    pub data: Vec<Row>,
    pub columns: Vec<ColumnMetadata>,
    pub suggested_questions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarifying_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<Vec<serde_json::Value>>,
}

impl QueryResponse {
    pub fn from_json(input: &str) -> Result<Self, ResponseError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ResponseError> {
        let value: serde_json::Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Accepts either a full response object or a bare array of rows.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ResponseError> {
        let raw = match value {
            serde_json::Value::Array(data) => RawResponse {
                data: Some(data),
                ..RawResponse::default()
            },
            other => serde_json::from_value(other)?,
        };

        if raw.status.as_deref() == Some("error") {
            let message = raw
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| BACKEND_FAILURE_MESSAGE.to_string());
            warn!("Backend reported an error: {message}");
            return Err(ResponseError::Backend(message));
        }

        let data = raw
            .data
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, value)| row_from_json(value).ok_or(ResponseError::InvalidRow { index }))
            .collect::<Result<Vec<_>, _>>()?;

        let answer = raw
            .answer
            .filter(|a| !a.is_empty())
            .or_else(|| raw.clarifying_question.clone().filter(|q| !q.is_empty()))
            .unwrap_or_else(|| NO_RESPONSE_ANSWER.to_string());

        Ok(Self {
            answer,
            data,
            columns: raw.columns.unwrap_or_default(),
            suggested_questions: raw.suggested_questions.unwrap_or_default(),
            clarifying_question: raw.clarifying_question,
            pipeline: raw.pipeline,
        })
    }
}
