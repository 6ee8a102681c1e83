use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use insightflow_cli::cli::{
    parse_answers, Cli, Commands, DepartmentCommands, FormCommands, InstitutionCommands,
};
use insightflow_cli::AppService;
use insightflow_config::ConfigLoader;
use insightflow_core::{FormTemplate, InstitutionUpdate, UserRole};

fn init_logging(level: Option<&str>, config_level: &str) {
    let env_filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| {
            eprintln!("Invalid log level '{}', using 'info'", level);
            EnvFilter::new("info")
        }),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config_level.to_string())),
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = ConfigLoader::new();
    let mut config = loader
        .load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir.clone() {
        config.storage.data_dir = data_dir;
    }

    init_logging(cli.log_level.as_deref(), config.logging.level.as_filter_str());

    let mut service = AppService::init(config).context("Failed to initialize")?;

    match &cli.command {
        Commands::Watch => {
            service.start_sync().context("Failed to start sync watcher")?;
            let result = run_watch().await;
            service.shutdown().await;
            result
        }
        command => run_command(&service, command).await,
    }
}

async fn run_command(service: &AppService, command: &Commands) -> Result<()> {
    match command {
        Commands::Login {
            email,
            role,
            institution,
            department,
        } => {
            let role = role
                .as_deref()
                .map(|r| r.parse::<UserRole>().map_err(|e| anyhow!(e)))
                .transpose()?;
            let user = service
                .login(email, role, institution.clone(), department.clone())
                .await?;
            println!("Logged in as {} ({})", user.email, user.role);
            Ok(())
        }

        Commands::Logout => {
            service.logout().await?;
            println!("Logged out");
            Ok(())
        }

        Commands::Whoami => {
            match service.current_user().await {
                Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
                None => println!("Not logged in"),
            }
            Ok(())
        }

        Commands::Form { form_cmd } => run_form_command(service, form_cmd).await,

        Commands::Submit { form_id, answers } => {
            let answers = parse_answers(answers).map_err(|e| anyhow!(e))?;
            let response = service.submit_response(form_id, answers).await?;
            println!("Submitted response {}", response.id);
            Ok(())
        }

        Commands::Analyze { form_id } => {
            let record = service.analyze_form(form_id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }

        Commands::Export { form_id, output } => {
            let csv = service.export_form_csv(form_id).await?;
            match output {
                Some(path) => {
                    std::fs::write(path, &csv)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => print!("{}", csv),
            }
            Ok(())
        }

        Commands::Institution { institution_cmd } => {
            run_institution_command(service, institution_cmd).await
        }

        Commands::Department { department_cmd } => match department_cmd {
            DepartmentCommands::Add { name, institution } => {
                let department = service
                    .add_department(name.clone(), institution.clone())
                    .await?;
                println!("Added department {}", department.id);
                Ok(())
            }
        },

        // handled in main, where the watcher lifecycle lives
        Commands::Watch => Ok(()),
    }
}

async fn run_form_command(service: &AppService, command: &FormCommands) -> Result<()> {
    match command {
        FormCommands::List => {
            let forms = service.visible_forms().await;
            if forms.is_empty() {
                println!("No forms visible to the current session");
                return Ok(());
            }
            for form in forms {
                println!("{}  {}", form.id, form.title);
            }
            Ok(())
        }

        FormCommands::Show { id } => {
            let form = service
                .get_form(id)
                .await
                .ok_or_else(|| anyhow!("Form '{}' not found", id))?;
            println!("{}", serde_json::to_string_pretty(&form)?);
            Ok(())
        }

        FormCommands::Create { from_file } => {
            let template = read_template(from_file)?;
            let stored = service.create_form(template).await?;
            println!("Created form {} in {}", stored.id, stored.institution_id);
            Ok(())
        }

        FormCommands::Generate { goal } => {
            let form = service.generate_form(goal).await?;
            println!("Generated form {} ({} fields)", form.id, form.fields.len());
            Ok(())
        }
    }
}

async fn run_institution_command(
    service: &AppService,
    command: &InstitutionCommands,
) -> Result<()> {
    match command {
        InstitutionCommands::List => {
            for institution in service.institutions().await {
                println!("{}  {}", institution.id, institution.name);
            }
            Ok(())
        }

        InstitutionCommands::Add { name, logo_url } => {
            let institution = service
                .add_institution(name.clone(), logo_url.clone())
                .await?;
            println!("Added institution {}", institution.id);
            Ok(())
        }

        InstitutionCommands::Update {
            id,
            name,
            logo_url,
            primary_color,
            secondary_color,
        } => {
            let update = InstitutionUpdate {
                name: name.clone(),
                logo_url: logo_url.clone(),
                primary_color: primary_color.clone(),
                secondary_color: secondary_color.clone(),
            };
            service.update_institution(id, update).await?;
            println!("Updated institution {}", id);
            Ok(())
        }
    }
}

fn read_template(path: &PathBuf) -> Result<FormTemplate> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid form template in {}", path.display()))
}

/// Keep the process alive with the sync watcher running so external
/// writes to the data directory are reconciled into this context.
async fn run_watch() -> Result<()> {
    println!("Watching data directory; press ctrl-c to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    warn!("Shutdown signal received");
    Ok(())
}
