use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "recipebook")]
#[command(version, about = "Family recipe authoring client")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Backend API base URL. Overrides recipebook.toml and RECIPEBOOK_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Image upload endpoint. Overrides recipebook.toml and RECIPEBOOK_UPLOAD_URL.
    #[arg(long, global = true)]
    pub upload_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the .recipebook directory
    Init,
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Log in to the backend
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create an account
    Register,
    /// Log out and forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Create, edit and browse recipes
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Locally saved drafts
    Drafts {
        #[command(subcommand)]
        command: Option<DraftsCommands>,
    },
    /// Family groups
    Family {
        #[command(subcommand)]
        command: FamilyCommands,
    },
    /// Run the image upload proxy
    Serve {
        /// Port to serve on (defaults to the configured upload port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Permissive CORS for a browser front end on another origin
        #[arg(long)]
        dev: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    Show,
    Validate,
    Init,
}

#[derive(Subcommand, Clone)]
pub enum RecipeCommands {
    /// Author a new recipe in the wizard
    New,
    /// Edit an existing recipe in the wizard
    Edit { id: String },
    /// List your recipes
    List,
    Show { id: String },
    Delete {
        id: String,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum DraftsCommands {
    List,
    /// Show a draft by identity (recipe id or temp-<millis>)
    Show { identity: String },
    /// Continue a draft in the wizard
    Resume { identity: String },
    Delete {
        identity: String,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum FamilyCommands {
    List,
    Create { name: String },
    Members { id: String },
    AddMember {
        id: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        relation: Option<String>,
    },
    RemoveMember { family: String, member: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    recipebook::logging::init_logging(cli.verbose, cli.log_json);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Init => cmd::cmd_init(&project_dir)?,
        Commands::Config { command } => cmd::cmd_config(&project_dir, &cli, command.clone())?,
        Commands::Login { email } => cmd::cmd_login(&project_dir, &cli, email.clone()).await?,
        Commands::Register => cmd::cmd_register(&project_dir, &cli).await?,
        Commands::Logout => cmd::cmd_logout(&project_dir, &cli).await?,
        Commands::Whoami => cmd::cmd_whoami(&project_dir, &cli).await?,
        Commands::Recipe { command } => {
            cmd::cmd_recipe(&project_dir, &cli, command.clone()).await?
        }
        Commands::Drafts { command } => {
            cmd::cmd_drafts(&project_dir, &cli, command.clone()).await?
        }
        Commands::Family { command } => {
            cmd::cmd_family(&project_dir, &cli, command.clone()).await?
        }
        Commands::Serve { port, dev } => cmd::cmd_serve(&project_dir, &cli, *port, *dev).await?,
    }

    Ok(())
}
