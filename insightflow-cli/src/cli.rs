//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "insightflow", author, version, about = "InsightFlow feedback-form core", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory override (defaults to config value)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in (identity is self-asserted; no credential check)
    Login {
        /// Email address
        email: String,

        /// Role: SUPER_ADMIN, INSTITUTION_ADMIN or DEPT_ADMIN
        #[arg(long, value_name = "ROLE")]
        role: Option<String>,

        /// Institution id (defaults to the default tenant)
        #[arg(long, value_name = "ID")]
        institution: Option<String>,

        /// Department id (DEPT_ADMIN only)
        #[arg(long, value_name = "ID")]
        department: Option<String>,
    },

    /// Log out and clear the persisted session
    Logout,

    /// Show the current session user
    Whoami,

    /// Form operations
    Form {
        #[command(subcommand)]
        form_cmd: FormCommands,
    },

    /// Submit a response to a form (public link path; no login required)
    Submit {
        /// Form id
        form_id: String,

        /// Answers as field=value pairs; numeric values are detected
        #[arg(short = 'a', long = "answer", value_name = "FIELD=VALUE")]
        answers: Vec<String>,
    },

    /// Run AI analysis over a form's responses
    Analyze {
        /// Form id
        form_id: String,
    },

    /// Export a form's responses as CSV
    Export {
        /// Form id
        form_id: String,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Institution operations
    Institution {
        #[command(subcommand)]
        institution_cmd: InstitutionCommands,
    },

    /// Department operations
    Department {
        #[command(subcommand)]
        department_cmd: DepartmentCommands,
    },

    /// Watch the data directory and reconcile external changes until
    /// interrupted
    Watch,
}

#[derive(Subcommand)]
pub enum FormCommands {
    /// List forms visible to the current session
    List,

    /// Show one form as JSON
    Show {
        /// Form id
        id: String,
    },

    /// Create a form from a JSON template file
    Create {
        /// Path to a FormTemplate JSON file
        #[arg(long, value_name = "PATH")]
        from_file: PathBuf,
    },

    /// Generate a form with AI from a free-text goal
    Generate {
        /// What the form should find out
        goal: String,
    },
}

#[derive(Subcommand)]
pub enum InstitutionCommands {
    /// List institutions
    List,

    /// Add an institution
    Add {
        /// Display name
        name: String,

        /// Logo URL
        #[arg(long, value_name = "URL", default_value = "")]
        logo_url: String,
    },

    /// Update institution branding fields
    Update {
        /// Institution id
        id: String,

        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        #[arg(long, value_name = "URL")]
        logo_url: Option<String>,

        #[arg(long, value_name = "COLOR")]
        primary_color: Option<String>,

        #[arg(long, value_name = "COLOR")]
        secondary_color: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum DepartmentCommands {
    /// Add a department to an institution
    Add {
        /// Display name
        name: String,

        /// Owning institution id
        #[arg(long, value_name = "ID")]
        institution: String,
    },
}

/// Parse `field=value` pairs from the command line. Values that parse as
/// numbers become numeric answers.
pub fn parse_answers(
    pairs: &[String],
) -> Result<std::collections::HashMap<String, insightflow_core::AnswerValue>, String> {
    let mut answers = std::collections::HashMap::new();
    for pair in pairs {
        let (field, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("'{}' is not a FIELD=VALUE pair", pair))?;
        if field.is_empty() {
            return Err(format!("'{}' has an empty field name", pair));
        }
        let answer = match value.parse::<f64>() {
            Ok(n) => insightflow_core::AnswerValue::Number(n),
            Err(_) => insightflow_core::AnswerValue::Text(value.to_string()),
        };
        answers.insert(field.to_string(), answer);
    }
    Ok(answers)
}
