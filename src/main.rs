use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use registry_client::api::{LenientClient, RegistryClient};
use registry_client::checkout::Checkout;
use registry_client::config::validation::validate_config;
use registry_client::config::{load_config, ConfigError};
use registry_client::lifecycle::{signals, Shutdown};
use registry_client::models::{
    DocumentUpload, EntityId, EstateInput, LoginRequest, RegisterRequest, VerifyOtpRequest,
};
use registry_client::observability::logging;
use registry_client::session::SessionStore;

#[derive(Parser)]
#[command(name = "registry-cli")]
#[command(about = "Command-line client for the land registry portal", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "REGISTRY_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and VITE_API_URL).
    #[arg(short, long)]
    url: Option<String>,

    /// Session file.
    #[arg(long, env = "REGISTRY_SESSION")]
    session: Option<PathBuf>,

    /// Print empty lists instead of failing on read errors.
    #[arg(long)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, env = "REGISTRY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Confirm an account with the emailed one-time code
    VerifyOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "REGISTRY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored login
    Logout,
    /// Show the stored user
    Whoami,
    /// List estates
    Estates,
    /// Show one estate by slug or id
    Estate { slug: String },
    /// List plots in an estate
    Plots { estate_id: String },
    /// List your transactions
    Transactions,
    /// Buy a plot (simulated payment)
    Pay {
        /// Estate slug or id
        estate: String,
        /// Plot id or label such as B3/12
        plot: String,
    },
    /// Pay the title-search fee for an estate
    SearchFee { estate: String },
    /// Show plots bought from this machine
    Portfolio,
    /// List your documents
    Documents,
    /// Upload a document for verification
    Upload {
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        doc_type: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Dump the session store (token redacted)
    Session,
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List all users
    Users,
    /// List all transactions
    Transactions,
    /// Create an estate
    CreateEstate(EstateArgs),
    /// Update an estate
    UpdateEstate {
        id: String,
        #[command(flatten)]
        estate: EstateArgs,
    },
    /// Delete an estate
    DeleteEstate { id: String },
}

#[derive(Args)]
struct EstateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    plot_size: Option<String>,
    #[arg(long = "amenity")]
    amenities: Vec<String>,
    #[arg(long)]
    description: Option<String>,
}

impl From<EstateArgs> for EstateInput {
    fn from(args: EstateArgs) -> Self {
        EstateInput {
            name: args.name,
            slug: args.slug,
            location: args.location,
            plot_size: args.plot_size,
            amenities: args.amenities,
            description: args.description,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.api.base_url = url;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    if let Some(path) = cli.session {
        config.session.path = Some(path);
    }

    logging::init(&config.observability);
    tracing::debug!(base_url = %config.api.base_url, "Configuration loaded");

    let session = match config.session.resolved_path() {
        Some(path) => SessionStore::open(path)?,
        None => SessionStore::in_memory(),
    };

    let shutdown = Shutdown::new();
    signals::cancel_on_interrupt(shutdown.clone());

    let client = RegistryClient::from_config(&config)?
        .with_token(session.token())
        .with_shutdown(shutdown.clone());
    let lenient = LenientClient::new(client.clone());
    let checkout = Checkout::new(session.clone(), config.checkout.clone())
        .with_client(client.clone())
        .with_shutdown(shutdown);

    match cli.command {
        Commands::Register {
            full_name,
            email,
            phone,
            password,
        } => {
            let request = RegisterRequest {
                full_name,
                email,
                phone,
                password,
            };
            let response = client.register(&request).await?;
            session.save_login(response.user.as_ref(), response.token.as_deref())?;
            print_json(&response)?;
        }
        Commands::VerifyOtp { email, otp } => {
            let response = client.verify_otp(&VerifyOtpRequest { email, otp }).await?;
            session.save_login(response.user.as_ref(), response.token.as_deref())?;
            print_json(&response)?;
        }
        Commands::Login { email, password } => {
            let response = client.login(&LoginRequest { email, password }).await?;
            if !session.save_login(response.user.as_ref(), response.token.as_deref())? {
                eprintln!("No token in reply; not logged in");
            }
            print_json(&response)?;
        }
        Commands::Logout => {
            session.logout()?;
            client.set_token(None);
            eprintln!("Logged out");
        }
        Commands::Whoami => {
            print_json(&serde_json::json!({
                "user": session.user(),
                "isAuthenticated": session.is_authenticated(),
            }))?;
        }
        Commands::Estates => {
            if cli.lenient {
                print_json(&lenient.get_estates().await)?;
            } else {
                print_json(&client.get_estates().await?)?;
            }
        }
        Commands::Estate { slug } => {
            print_json(&client.get_estate(&slug).await?)?;
        }
        Commands::Plots { estate_id } => {
            let id = EntityId::from(estate_id);
            if cli.lenient {
                print_json(&lenient.get_plots(&id).await)?;
            } else {
                print_json(&client.get_plots(&id).await?)?;
            }
        }
        Commands::Transactions => {
            if cli.lenient {
                print_json(&lenient.get_transactions().await)?;
            } else {
                print_json(&client.get_transactions().await?)?;
            }
        }
        Commands::Pay { estate, plot } => {
            let estate = client.get_estate(&estate).await?;
            let plots = client.get_plots(&estate.id).await?;
            let plot = plots
                .into_iter()
                .find(|p| p.id.matches(&plot) || p.label() == plot)
                .ok_or_else(|| format!("Plot '{}' not found in {}", plot, estate.name))?;
            let fees = checkout.select(&estate, &plot)?;
            eprintln!(
                "Paying {} {} for plot {} in {}...",
                fees.total,
                config.checkout.currency,
                plot.label(),
                estate.name
            );
            let receipt = checkout.pay().await?;
            print_json(&receipt)?;
        }
        Commands::SearchFee { estate } => {
            let estate = client.get_estate(&estate).await?;
            let charged = checkout.pay_search_fee(&estate).await?;
            print_json(&serde_json::json!({
                "estate": estate.slug,
                "charged": charged,
                "currency": config.checkout.currency,
            }))?;
        }
        Commands::Portfolio => {
            print_json(&session.portfolio())?;
        }
        Commands::Documents => {
            if cli.lenient {
                print_json(&lenient.get_documents().await)?;
            } else {
                print_json(&client.get_documents().await?)?;
            }
        }
        Commands::Upload {
            file,
            name,
            doc_type,
            category,
        } => {
            let upload = DocumentUpload {
                path: file,
                name,
                doc_type,
                category,
            };
            print_json(&client.upload_document(&upload).await?)?;
        }
        Commands::Session => {
            let mut entries = session.entries();
            if let Some(token) = entries.get_mut("token") {
                *token = "<redacted>".to_string();
            }
            print_json(&entries)?;
        }
        Commands::Admin { command } => match command {
            AdminCommands::Users => {
                if cli.lenient {
                    print_json(&lenient.get_users().await)?;
                } else {
                    print_json(&client.get_users().await?)?;
                }
            }
            AdminCommands::Transactions => {
                if cli.lenient {
                    print_json(&lenient.get_all_transactions().await)?;
                } else {
                    print_json(&client.get_all_transactions().await?)?;
                }
            }
            AdminCommands::CreateEstate(args) => {
                print_json(&client.create_estate(&args.into()).await?)?;
            }
            AdminCommands::UpdateEstate { id, estate } => {
                let id = EntityId::from(id);
                print_json(&client.update_estate(&id, &estate.into()).await?)?;
            }
            AdminCommands::DeleteEstate { id } => {
                let id = EntityId::from(id);
                print_json(&client.delete_estate(&id).await?)?;
            }
        },
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
