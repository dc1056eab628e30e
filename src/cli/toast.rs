use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// User-facing outcome of a mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: Option<String>,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }

    pub fn error_titled(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }

    pub fn render(&self, output_format: &OutputFormat) -> anyhow::Result<()> {
        match output_format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&json!({ "toast": self }))?);
            }
            OutputFormat::Text => {
                let line = match &self.title {
                    Some(title) => format!("{} {}", title, self.description),
                    None => self.description.clone(),
                };
                if self.is_error() {
                    eprintln!("✗ {}", line);
                } else {
                    println!("✓ {}", line);
                }
            }
        }
        Ok(())
    }
}
