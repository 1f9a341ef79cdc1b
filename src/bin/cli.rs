use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use hrdesk::cli::{create_admin, run_migrations};
use hrdesk_db::init_db_pool;

#[derive(Parser)]
#[command(name = "hrdesk-cli")]
#[command(about = "hrdesk CLI - Administrative tools for hrdesk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Full name of the administrator
        #[arg(short = 'n', long)]
        full_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Run pending database migrations
    Migrate,
}

fn prompt(label: &str) -> anyhow::Result<String> {
    Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .with_context(|| format!("Failed to read {}", label.to_lowercase()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let pool = init_db_pool()
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateAdmin {
            full_name,
            email,
            password,
        } => {
            let full_name = match full_name {
                Some(name) => name,
                None => prompt("Full name")?,
            };
            let email = match email {
                Some(email) => email,
                None => prompt("Email address")?,
            };
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()
                    .context("Failed to read password")?,
            };

            match create_admin(&pool, &full_name, &email, &password).await {
                Ok(user) => {
                    println!("\n✅ Admin created successfully!");
                    println!("   Email: {}", user.email);
                    println!("   Name: {}", user.full_name);
                }
                Err(e) => {
                    eprintln!("\n❌ Error creating admin: {}", e.public_message());
                    std::process::exit(1);
                }
            }
        }
        Commands::Migrate => {
            run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;
            println!("✅ Migrations applied");
        }
    }

    Ok(())
}
