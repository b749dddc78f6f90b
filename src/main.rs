//! Sales Predictor CLI
//!
//! Command-line client for the Sales Predictor service:
//! - Log in / sign up / log out
//! - Run EDA and model training on a CSV
//! - Manage saved results
//! - Render pages headlessly

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sales_predictor::config::{generate_default_config, Config, LoggingConfig};
use sales_predictor::{
    App, AuthService, Dispatcher, FileTokenStore, Location, ModelKind, Page, PredictApi,
    PredictWorkflow, ReqwestTransport, TokenStore, UploadFile,
};

#[derive(Parser)]
#[command(name = "sales-predictor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for the Sales Predictor service")]
#[command(long_about = "Sales Predictor turns a CSV of historical sales into an EDA report and a trained forecasting model.\nThis client logs in, uploads datasets and manages saved results.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overriding the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with username and password
    Login {
        username: String,
        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account
    Signup {
        username: String,
        email: String,
        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log in with a Google ID token
    GoogleLogin {
        id_token: String,
        /// Use the older google-login endpoint
        #[arg(long)]
        legacy: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show session status
    Status,

    /// Upload a CSV for exploratory data analysis
    Eda {
        /// Path to the CSV file
        path: PathBuf,
    },

    /// Train a model on a CSV
    Train {
        path: PathBuf,
        /// random_forest, linear_regression, decision_tree, xgboost, lightgbm, pytorch_nn
        #[arg(short, long, default_value = "random_forest")]
        model: ModelKind,
    },

    /// EDA, optional training and optional save in one session
    Predict {
        path: PathBuf,
        /// Also train this model
        #[arg(short, long)]
        model: Option<ModelKind>,
        /// Save the result afterwards
        #[arg(long)]
        save: bool,
        /// Notes stored with the saved result
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// Manage saved results
    Results {
        #[command(subcommand)]
        action: ResultsCommand,
    },

    /// Render a page headlessly and print its markup
    Render {
        /// home, about, contact, predict, login, signup
        page: Page,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ResultsCommand {
    /// List saved results
    List {
        /// Case-insensitive filter on file name or date
        #[arg(short, long, default_value = "")]
        filter: String,
    },
    /// Replace the notes of a result
    Edit { id: i64, notes: String },
    /// Delete a result
    Delete { id: i64 },
    /// Download a result as result_{id}.json
    Download {
        id: i64,
        /// Target directory (default: configured downloads dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    init_logging(&config.logging);

    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.session.token_file));
    let transport = Arc::new(ReqwestTransport::new(config.api.request_timeout())?);
    let dispatcher = Dispatcher::new(&config.api.base_url, transport, store.clone(), Location::new());
    let auth = AuthService::new(dispatcher.clone());
    let json = cli.format == "json";

    match cli.command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            let pair = auth.login(&username, &password).await?;
            auth.save_tokens(&pair)?;
            println!("Logged in successfully!");
        }

        Commands::Signup {
            username,
            email,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            let user = auth.signup(&username, &email, &password).await?;
            println!("Account created (id {}). Please log in.", user.id);
        }

        Commands::GoogleLogin { id_token, legacy } => {
            let pair = if legacy {
                auth.google_login_legacy(&id_token).await?
            } else {
                auth.google_login(&id_token).await?
            };
            auth.save_tokens(&pair)?;
            println!("Logged in via Google!");
        }

        Commands::Logout => {
            auth.logout();
            println!("Logged out.");
        }

        Commands::Status => {
            println!("Sales Predictor v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("API:        {}", dispatcher.base_url());
            println!("Session:    {}", config.session.token_file);
            println!(
                "Logged in:  {}",
                if store.is_authenticated() { "yes" } else { "no" }
            );
        }

        Commands::Eda { path } => {
            let mut workflow = PredictWorkflow::new(PredictApi::new(dispatcher));
            let file = read_dataset(&path).await?;
            let outcome = workflow.generate_eda(&file).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.raw)?);
            } else {
                let report = &outcome.report;
                println!("Shape:            {}", report.shape_label());
                println!("Columns:          {}", report.columns.join(", "));
                println!(
                    "Inferred target:  {}",
                    report.inferred_target.as_deref().unwrap_or("None")
                );
                println!(
                    "Date column:      {}",
                    report.date_column_used.as_deref().unwrap_or("None")
                );
                println!("Graphs:           {}", report.graphs.len());
            }
        }

        Commands::Train { path, model } => {
            let mut workflow = PredictWorkflow::new(PredictApi::new(dispatcher));
            let file = read_dataset(&path).await?;
            let outcome = workflow.train(&file, model).await?;
            print_model(outcome, json)?;
        }

        Commands::Predict {
            path,
            model,
            save,
            notes,
        } => {
            let mut workflow = PredictWorkflow::new(PredictApi::new(dispatcher));
            let file = read_dataset(&path).await?;

            let eda = workflow.generate_eda(&file).await?;
            println!("EDA: {}", eda.report.shape_label());

            if let Some(model) = model {
                let outcome = workflow.train(&file, model).await?;
                print_model(outcome, json)?;
            }

            if save {
                let confirmation = workflow.save(&file.file_name, &notes).await?;
                println!(
                    "{}",
                    confirmation["message"]
                        .as_str()
                        .unwrap_or("Result saved successfully.")
                );
            }
        }

        Commands::Results { action } => {
            let workflow = PredictWorkflow::new(PredictApi::new(dispatcher));
            match action {
                ResultsCommand::List { filter } => {
                    let results = workflow.load_results(&filter).await?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&results)?);
                    } else if results.is_empty() {
                        println!("No saved results.");
                    } else {
                        println!(
                            "{:<6} {:<28} {:<22} {:<18} {}",
                            "ID", "File", "Created", "Model", "Notes"
                        );
                        println!("{}", "-".repeat(90));
                        for r in results {
                            println!(
                                "{:<6} {:<28} {:<22} {:<18} {}",
                                r.id,
                                r.file_name,
                                r.created_at,
                                r.model_name.as_deref().unwrap_or("-"),
                                r.notes.as_deref().unwrap_or("")
                            );
                        }
                    }
                }
                ResultsCommand::Edit { id, notes } => {
                    workflow.edit_notes(id, &notes).await?;
                    println!("Notes updated.");
                }
                ResultsCommand::Delete { id } => {
                    workflow.delete(id).await?;
                    println!("Result deleted.");
                }
                ResultsCommand::Download { id, dir } => {
                    let dir = dir.unwrap_or_else(|| PathBuf::from(&config.session.downloads_dir));
                    let path = workflow.download(id, &dir).await?;
                    println!("Saved {}", path.display());
                }
            }
        }

        Commands::Render { page } => {
            let mut app = App::new(dispatcher, config.app_settings());
            app.navigate(page);
            println!("{}", app.html());
            for toast in app.toasts() {
                eprintln!("{} {}", toast.kind.icon(), toast.message);
            }
        }

        Commands::Config { output } => write_config(output.as_deref())?,
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sales_predictor={}", config.level)));

    let writer = match &config.file {
        Some(path) => match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
            Err(e) => {
                eprintln!("Cannot open log file {}: {}", path, e);
                BoxMakeWriter::new(std::io::stderr)
            }
        },
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .init();
    }
}

fn write_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = generate_default_config();
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", config),
    }
    Ok(())
}

async fn read_dataset(path: &Path) -> anyhow::Result<UploadFile> {
    if !path.exists() {
        bail!("File not found: {:?}", path);
    }
    UploadFile::from_path(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))
}

fn print_model(outcome: &sales_predictor::ModelOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.raw)?);
        return Ok(());
    }
    let report = &outcome.report;
    println!("Model:            {}", outcome.model.label());
    println!(
        "Target column:    {}",
        report.target_column.as_deref().unwrap_or("None")
    );
    println!("Features used:    {}", report.features_used.join(", "));
    if let Some(rmse) = report.rmse {
        println!("RMSE:             {:.4}", rmse);
    }
    if let Some(r2) = report.r2_score {
        println!("R² score:         {:.4}", r2);
    }
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
