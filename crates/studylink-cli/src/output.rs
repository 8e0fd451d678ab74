//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use studylink_domain::{ActorId, RequestStatus, StudyRequest};
use studylink_service::Removal;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Get the output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format requests output.
    pub fn format_requests(&self, requests: &[StudyRequest]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_requests_json(requests),
            OutputFormat::Table => Ok(self.format_requests_table(requests)),
            OutputFormat::Quiet => Ok(self.format_requests_quiet(requests)),
        }
    }

    /// Format a single request.
    pub fn format_request(&self, request: &StudyRequest) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&request_json(request))?),
            _ => self.format_requests(std::slice::from_ref(request)),
        }
    }

    /// Format a list of partners.
    pub fn format_partners(&self, partners: &[ActorId]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let names: Vec<&str> = partners.iter().map(ActorId::as_str).collect();
                Ok(serde_json::to_string_pretty(&names)?)
            }
            OutputFormat::Quiet => Ok(partners
                .iter()
                .map(ActorId::as_str)
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if partners.is_empty() {
                    return Ok(self.colorize("No study partners.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Partner"]);
                for partner in partners {
                    builder.push_record([partner.as_str()]);
                }
                Ok(self.finish_table(builder))
            }
        }
    }

    /// Format a partner removal confirmation.
    pub fn format_removal(&self, removal: &Removal) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "link_id": removal.link_id().to_string(),
                    "member_a": removal.link.member_a.as_str(),
                    "member_b": removal.link.member_b.as_str(),
                    "linked_at": removal.link.created_at,
                    "history": request_json(&removal.history),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(removal.link_id().to_string()),
            OutputFormat::Table => Ok(self.success(&format!(
                "No longer study partners with {}",
                removal.history.receiver
            ))),
        }
    }

    /// Format requests as JSON.
    fn format_requests_json(&self, requests: &[StudyRequest]) -> Result<String> {
        let json_requests: Vec<serde_json::Value> = requests.iter().map(request_json).collect();
        Ok(serde_json::to_string_pretty(&json_requests)?)
    }

    /// Format requests as a table.
    fn format_requests_table(&self, requests: &[StudyRequest]) -> String {
        if requests.is_empty() {
            return self.colorize("No requests found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "From", "To", "Status", "Created", "Updated"]);

        for request in requests {
            builder.push_record([
                request.id.to_string(),
                request.sender.to_string(),
                request.receiver.to_string(),
                request.status.to_string(),
                request.created_at.to_string(),
                request.updated_at.to_string(),
            ]);
        }

        self.finish_table(builder)
    }

    /// Format requests in quiet mode (IDs only).
    fn format_requests_quiet(&self, requests: &[StudyRequest]) -> String {
        let ids: Vec<String> = requests.iter().map(|r| r.id.to_string()).collect();
        ids.join("\n")
    }

    fn finish_table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a request status, colored by outcome.
    pub fn status(&self, status: RequestStatus) -> String {
        let color = match status {
            RequestStatus::Pending => "yellow",
            RequestStatus::Approved => "green",
            RequestStatus::Declined => "red",
            RequestStatus::Closed => "blue",
        };
        self.colorize(status.as_str(), color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn request_json(request: &StudyRequest) -> serde_json::Value {
    serde_json::json!({
        "id": request.id.to_string(),
        "sender": request.sender.as_str(),
        "receiver": request.receiver.as_str(),
        "status": request.status.as_str(),
        "created_at": request.created_at,
        "updated_at": request.updated_at,
    })
}
