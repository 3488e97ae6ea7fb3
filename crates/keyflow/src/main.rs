use std::env;
use std::sync::Arc;

mod tui;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use keyflow_core::auth::{
    AuthError, AuthenticatedSession, ClientConfig, OAuthFlow, OAuthProvider, OtpFlow,
    RestAuthClient, ServiceEndpoints,
};
use keyflow_core::phone::PhoneNumber;
use keyflow_core::presenter::identity_rows;
use tokio::task;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal demo for phone/OTP and OAuth sign-in")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and print the authenticated identity
    #[command(subcommand)]
    Login(LoginCommand),
    /// Launch the interactive TUI
    Tui,
}

#[derive(Subcommand, Debug)]
enum LoginCommand {
    /// Sign in with a one-time code sent over SMS
    Phone(PhoneArgs),
    /// Sign in through a third-party provider
    Oauth(OauthArgs),
}

#[derive(Args, Debug)]
struct PhoneArgs {
    /// Phone number including country code, e.g. "+1 415 555 0100"
    #[arg(long)]
    number: String,
}

#[derive(Args, Debug)]
struct OauthArgs {
    /// Identity provider
    #[arg(long, value_parser = parse_provider)]
    provider: OAuthProvider,
}

fn parse_provider(value: &str) -> Result<OAuthProvider, String> {
    match value.to_ascii_lowercase().as_str() {
        "google" => Ok(OAuthProvider::Google),
        "apple" => Ok(OAuthProvider::Apple),
        other => Err(format!("unknown provider '{other}' (expected google or apple)")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Login(cmd) => match cmd {
            LoginCommand::Phone(args) => login_phone(args).await?,
            LoginCommand::Oauth(args) => login_oauth(args).await?,
        },
        Commands::Tui => tui::run(build_client()?).await?,
    }
    Ok(())
}

fn init_tracing() {
    // Logs go to stderr so the TUI's alternate screen stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the one service client for this process from environment
/// configuration; every flow gets a handle to the same instance.
fn build_client() -> Result<Arc<RestAuthClient>> {
    let public_token = env::var("KEYFLOW_PUBLIC_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| anyhow!("KEYFLOW_PUBLIC_TOKEN is not set"))?;
    let config = ClientConfig::new(public_token);

    let client = match env::var("KEYFLOW_API_URL") {
        Ok(base) if !base.trim().is_empty() => {
            let base_url = Url::parse(base.trim()).context("invalid KEYFLOW_API_URL")?;
            RestAuthClient::with_endpoints(config, ServiceEndpoints { base_url })
        }
        _ => RestAuthClient::new(config),
    }
    .context("failed to build auth client")?;

    Ok(Arc::new(client))
}

async fn login_phone(args: PhoneArgs) -> Result<()> {
    let phone = PhoneNumber::parse(&args.number).context("invalid phone number")?;
    let mut flow = OtpFlow::new(build_client()?);

    let challenge = flow
        .request_code(phone)
        .await
        .context("failed to request a one-time code")?;
    println!(
        "Code sent to {} (expires at {} UTC).",
        challenge.phone.display(),
        challenge.expires_at.format("%H:%M:%S")
    );

    let session = loop {
        let code = prompt_for_code().await?;
        if code.is_empty() {
            return Err(anyhow!("aborted"));
        }
        match flow.verify(&code).await {
            Ok(session) => break session,
            Err(err @ AuthError::CodeExpired) => {
                return Err(anyhow!("{err}"));
            }
            Err(err) => {
                eprintln!("Verification failed: {err}. Try again.");
            }
        }
    };

    println!("You're logged in!");
    render_identity(&session);
    Ok(())
}

async fn login_oauth(args: OauthArgs) -> Result<()> {
    let client = build_client()?;
    let flow = OAuthFlow::new(client);

    let outcome = flow
        .start(args.provider)
        .await
        .with_context(|| format!("{} sign-in failed", args.provider))?;

    println!("{}", outcome.completion.greeting());
    render_identity(&outcome.session);
    Ok(())
}

fn render_identity(session: &AuthenticatedSession) {
    for row in identity_rows(&session.user) {
        println!("{:<16} {}", row.title, row.content);
    }
}

async fn prompt_for_code() -> Result<String, AuthError> {
    task::spawn_blocking(|| {
        use std::io::{self, Write};
        print!("Enter the code (blank to abort): ");
        io::stdout().flush().map_err(AuthError::Io)?;
        let mut input = String::new();
        io::stdin().read_line(&mut input).map_err(AuthError::Io)?;
        Ok(input.trim().to_owned())
    })
    .await
    .map_err(|_| AuthError::Cancelled)?
}
