//! Schema definitions for `sf package:version:create:list --json` output

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format used by the packaging CLI for `CreatedDate`
const CREATED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Local failure value attached to a status record.
///
/// Holds either captured stderr / parse diagnostics, or the non-zero
/// status code reported by the packaging CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusErr {
    Code(i64),
    Text(String),
}

impl std::fmt::Display for StatusErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusErr::Code(code) => write!(f, "{}", code),
            StatusErr::Text(text) => f.write_str(text),
        }
    }
}

/// Error payload reported by the job itself (string or list of messages)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobErrorPayload {
    Message(String),
    List(Vec<serde_json::Value>),
}

/// One package version creation request as reported by the packaging CLI
///
/// Every field is optional: the CLI omits whatever it does not know yet,
/// and a default record (serialized as `{}`) means "no result".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreationStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Locally produced failure (not part of the CLI payload)
    #[serde(rename = "err", default, skip_serializing_if = "Option::is_none")]
    pub err: Option<StatusErr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package2_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package2_version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber_package_version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JobErrorPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
}

impl CreationStatus {
    /// Create a record that only carries a local failure
    pub fn from_err(err: StatusErr) -> Self {
        Self {
            err: Some(err),
            ..Default::default()
        }
    }

    /// True when no field is set (timeout result)
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Identifier for log lines
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("unknown")
    }

    /// Parse `CreatedDate` (`YYYY-MM-DD HH:MM`, local time)
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_date
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), CREATED_DATE_FORMAT).ok())
    }

    /// Time since the request was created as human-readable string
    pub fn job_age(&self) -> Option<String> {
        self.created_at().map(|t| {
            let duration = Local::now().naive_local().signed_duration_since(t);

            if duration.num_seconds() < 60 {
                format!("{}s ago", duration.num_seconds().max(0))
            } else if duration.num_minutes() < 60 {
                format!("{}m ago", duration.num_minutes())
            } else if duration.num_hours() < 24 {
                format!("{}h ago", duration.num_hours())
            } else {
                format!("{}d ago", duration.num_days())
            }
        })
    }
}

/// Top-level JSON envelope printed by the packaging CLI
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandResponse {
    /// 0 when the command itself succeeded
    pub status: i64,
    /// Creation requests, most recent first
    #[serde(default)]
    pub result: Option<Vec<CreationStatus>>,
    /// Error name on failure envelopes
    #[serde(default)]
    pub name: Option<String>,
    /// Error message on failure envelopes
    #[serde(default)]
    pub message: Option<String>,
}

impl CommandResponse {
    /// The most recent creation request, if any
    pub fn latest(self) -> Option<CreationStatus> {
        self.result.and_then(|r| r.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success_response() {
        let json = r#"{"status":0,"result":[{"Id":"0Ab1","Status":"Success","SubscriberPackageVersionId":"04t1"}]}"#;
        let resp: CommandResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, 0);

        let latest = resp.latest().unwrap();
        assert_eq!(latest.id.as_deref(), Some("0Ab1"));
        assert_eq!(latest.status.as_deref(), Some("Success"));
        assert_eq!(latest.subscriber_package_version_id.as_deref(), Some("04t1"));
    }

    #[test]
    fn test_only_first_record_is_latest() {
        let json = r#"{"status":0,"result":[
            {"Id":"new","Status":"Queued"},
            {"Id":"old","Status":"Success"}
        ]}"#;
        let resp: CommandResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.latest().unwrap().id.as_deref(), Some("new"));
    }

    #[test]
    fn test_parse_failure_envelope() {
        let json = r#"{"status":1,"name":"NoDefaultDevHubError","message":"No default dev hub found."}"#;
        let resp: CommandResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, 1);
        assert!(resp.result.is_none());
        assert_eq!(resp.name.as_deref(), Some("NoDefaultDevHubError"));
    }

    #[test]
    fn test_job_error_payload_variants() {
        let json = r#"{"Status":"Error","Error":["first","second"]}"#;
        let status: CreationStatus = serde_json::from_str(json).unwrap();
        assert!(matches!(status.error, Some(JobErrorPayload::List(ref l)) if l.len() == 2));

        let json = r#"{"Status":"Error","Error":"boom"}"#;
        let status: CreationStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.error, Some(JobErrorPayload::Message("boom".to_string())));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{"Id":"08c1","Status":"InProgress","HasMetadataRemoved":false,"CodeCoverage":null}"#;
        let status: CreationStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.status.as_deref(), Some("InProgress"));
    }

    #[test]
    fn test_empty_record_serializes_as_empty_object() {
        let status = CreationStatus::default();
        assert!(status.is_empty());
        assert_eq!(serde_json::to_string(&status).unwrap(), "{}");
    }

    #[test]
    fn test_err_serialization() {
        let status = CreationStatus::from_err(StatusErr::Code(1));
        assert_eq!(serde_json::to_string(&status).unwrap(), r#"{"err":1}"#);

        let status = CreationStatus::from_err(StatusErr::Text("auth error".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), r#"{"err":"auth error"}"#);
    }

    #[test]
    fn test_created_at_parsing() {
        let status = CreationStatus {
            created_date: Some("2020-04-22 11:15".to_string()),
            ..Default::default()
        };
        let created = status.created_at().unwrap();
        assert_eq!(created.format("%Y-%m-%d %H:%M").to_string(), "2020-04-22 11:15");
        assert!(status.job_age().unwrap().ends_with("d ago"));

        let status = CreationStatus {
            created_date: Some("not a date".to_string()),
            ..Default::default()
        };
        assert!(status.created_at().is_none());
    }
}
