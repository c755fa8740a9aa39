/*
 * Teacher Dashboard, keeping class tracking organized
 * Copyright (C) 2019-2020 Adrien 'Litarvan' Navratil
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */
use std::fmt;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use log::warn;
use serde::{Serialize, Deserialize, Deserializer};
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};

use crate::session::Role;

/// Read endpoints answer `{ "data": ... }`, some deployments send the bare object.
///
/// A `data` key always means the wrapped form: a bad inner value is an error,
/// never a second try on the envelope itself.
pub fn unwrap_payload<T: DeserializeOwned>(body: Value) -> serde_json::Result<T> {
    match body {
        Value::Object(mut fields) => match fields.remove("data") {
            Some(data) => serde_json::from_value(data),
            None => serde_json::from_value(Value::Object(fields))
        },
        other => serde_json::from_value(other)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub fa_modes: Vec<String>
}

/// A statistic shown as the server sent it, `72.5` stays `72.5` and `"N/A"` stays `N/A`.
/// A class without any marks yet gets `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Number(Number),
    Text(String),
    Missing
}

impl Default for Metric {
    fn default() -> Metric {
        Metric::Number(Number::from(0u64))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Metric::Number(n) => write!(f, "{}", n),
            Metric::Text(s) => write!(f, "{}", s),
            Metric::Missing => write!(f, "N/A")
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStats {
    #[serde(default)]
    pub avg_marks: Metric,
    #[serde(default)]
    pub pending_queries: u64,
    #[serde(default)]
    pub total_students: u64,
    #[serde(default)]
    pub submissions_received: u64,
    #[serde(default)]
    pub fa_mode_set: bool,

    // Only filled when the request was scoped for them
    #[serde(default)]
    pub submissions: Vec<SubmissionRecord>,
    #[serde(default)]
    pub subjects: Vec<String>
}

impl fmt::Display for ClassStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Avg. Marks: {}%", self.avg_marks)?;
        writeln!(f, "Pending Queries: {}", self.pending_queries)?;
        writeln!(f, "Total Students: {}", self.total_students)?;
        writeln!(f, "Submissions Received: {}", self.submissions_received)?;
        write!(f, "FA Mode Set: {}", if self.fa_mode_set { "Yes" } else { "No" })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub prn: String,
    pub name: String,
    #[serde(default)]
    pub submitted: bool
}

/// Only the id is needed to answer a query, everything else is display.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub student_name: String,
    pub student_id: String,
    pub subject: String,
    pub division: String,
    pub department: String,
    pub year: String,
    pub message: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>
}

// RFC 3339, a naive ISO date taken as UTC, or epoch milliseconds. Anything else is dropped.
fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .map(|d| d.with_timezone(&Utc))
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f").ok()
                .map(|n| Utc.from_utc_datetime(&n))),
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None
    })
}

#[derive(Deserialize)]
pub(crate) struct QueryList {
    #[serde(default)]
    queries: Vec<Value>
}

impl QueryList {
    /// Keeps every usable record, one broken query doesn't hide the others.
    pub fn into_records(self) -> Vec<QueryRecord> {
        self.queries.into_iter()
            .filter_map(|raw| match serde_json::from_value::<QueryRecord>(raw) {
                Ok(r) if !r.id.is_empty() => Some(r),
                Ok(_) => {
                    warn!("Skipping a query without id");
                    None
                },
                Err(e) => {
                    warn!("Skipping an unreadable query : {}", e);
                    None
                }
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FaModeStatus {
    #[serde(default)]
    pub mode: Option<String>
}

/// What every write endpoint answers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub message: Option<String>
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StudentRegistration {
    pub name: String,
    pub prn: String,
    pub department: String,
    pub division: String,
    pub email: String,
    pub password: String
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TeacherRegistration {
    pub name: String,
    pub email: String,
    pub department: String,
    pub password: String
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub query_id: String,
    pub response: String
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FaModeRequest {
    pub department: String,
    pub subject: String,
    pub division: String,
    pub year: String,
    pub mode: String
}

pub const MARK_SHEET_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

#[derive(Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>
}

impl Attachment {
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Attachment {
        Attachment {
            file_name: file_name.to_string(),
            bytes
        }
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name).extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }

    pub fn is_mark_sheet(&self) -> bool {
        match self.extension() {
            Some(e) => MARK_SHEET_EXTENSIONS.contains(&e.as_str()),
            None => false
        }
    }
}

// Don't dump whole spreadsheets in the logs
impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Attachment({}, {} bytes)", self.file_name, self.bytes.len())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MarksUpload {
    pub file: Attachment,
    pub subject: String,
    pub division: String,
    pub department: String,
    pub year: String,
    pub paper: String
}
