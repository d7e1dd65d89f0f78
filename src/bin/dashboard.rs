use std::{
    env,
    error::Error,
    fs::OpenOptions,
    io,
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use clap::{Parser, Subcommand};
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use finance_dashboard::{
    ApiConfig, DASHBOARD_VIEW, DEFAULT_API_BASE_URL, DEFAULT_RECENT_LIMIT, DEFAULT_REFRESH_INTERVAL,
    DEFAULT_TOAST_TTL, Dashboard, DashboardConfig, DashboardPhase, DashboardState,
    NewTransactionDraft, Navigator, Session, SessionProvider, ToastId, ToastKind, ToastQueue,
    TransactionFilter, TransactionKind, format,
    http::{self, ApiClient, HttpTransactionGateway, HttpUserGateway},
    local_input_to_transport, shutdown_signal,
};

/// The environment variable holding the bearer token from `dashboard login`.
const TOKEN_VAR: &str = "FINANCE_TOKEN";

/// A terminal dashboard for your personal finances.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The URL of the finance service.
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Seconds between refreshes of the balance and transactions, 0 to disable.
    #[arg(long, default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs())]
    refresh_secs: u64,

    /// How many transactions to list when no filter is set.
    #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
    recent_limit: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print the token to export as FINANCE_TOKEN.
    Login {
        /// Your email address.
        login: String,
    },
    /// Show the dashboard and keep it up to date until interrupted.
    Watch {
        /// Which transactions to list: all, inflow or outflow.
        #[arg(long, default_value_t = TransactionFilter::All)]
        filter: TransactionFilter,
    },
    /// Add a transaction.
    Add {
        /// Either inflow or outflow.
        kind: TransactionKind,
        /// The amount of money moved, greater than zero.
        amount: f64,
        /// When it happened, as yyyy-mm-ddThh:mm. Defaults to now.
        #[arg(long)]
        date: Option<String>,
        /// What it was for.
        #[arg(long)]
        note: Option<String>,
    },
    /// Show your details.
    Profile,
    /// Permanently delete your account.
    DeleteAccount {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

impl Args {
    fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            refresh_interval: Duration::from_secs(self.refresh_secs),
            recent_limit: self.recent_limit,
            toast_ttl: DEFAULT_TOAST_TTL,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(error);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let token = env::var(TOKEN_VAR).ok();
    let session = Arc::new(Session::new(token));
    let client = ApiClient::new(
        &ApiConfig {
            base_url: args.api_url.clone(),
        },
        session.clone(),
    )?;

    if let Command::Login { login } = &args.command {
        return log_in(&client, login).await;
    }

    if session.token().is_none() {
        return Err(
            format!("{TOKEN_VAR} is not set, log in with `dashboard login <email>` first.").into(),
        );
    }

    let dashboard = Arc::new(Dashboard::new(
        Arc::new(HttpTransactionGateway::new(client.clone())),
        Arc::new(HttpUserGateway::new(client)),
        session,
        ToastQueue::new(DEFAULT_TOAST_TTL),
        Arc::new(Navigator::new(DASHBOARD_VIEW)),
        args.dashboard_config(),
    ));

    match args.command {
        Command::Login { .. } => Ok(()),
        Command::Watch { filter } => watch(dashboard, filter).await,
        Command::Add {
            kind,
            amount,
            date,
            note,
        } => add(&dashboard, kind, amount, date, note).await,
        Command::Profile => profile(&dashboard).await,
        Command::DeleteAccount { yes } => delete_account(&dashboard, yes).await,
    }
}

async fn log_in(client: &ApiClient, login: &str) -> Result<(), Box<dyn Error>> {
    let password = match rpassword::prompt_password("Password: ") {
        Ok(password) => password,
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
        Err(error) => return Err(format!("Could not read password from stdin: {error}").into()),
    };

    let token = http::log_in(client, login, &password).await?;

    println!("export {TOKEN_VAR}={token}");

    Ok(())
}

async fn watch(dashboard: Arc<Dashboard>, filter: TransactionFilter) -> Result<(), Box<dyn Error>> {
    let mut states = dashboard.subscribe();
    let mut toasts = dashboard.toasts().subscribe();
    let scope = dashboard.mount()?;

    if filter != TransactionFilter::All {
        dashboard.set_filter(filter).await;
    }

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut last_render = String::new();
    let mut last_toast: Option<ToastId> = None;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }

                let state = states.borrow_and_update().clone();

                if state.phase == DashboardPhase::Unauthorized {
                    return Err(session_expired());
                }

                if state.phase != DashboardPhase::Ready {
                    continue;
                }

                let rendered = render(&state);
                if rendered != last_render {
                    println!("{rendered}");
                    last_render = rendered;
                }
            }
            changed = toasts.changed() => {
                if changed.is_err() {
                    break;
                }

                for toast in toasts.borrow_and_update().iter() {
                    if Some(toast.id) > last_toast {
                        print_toast(toast.kind, &toast.text);
                        last_toast = Some(toast.id);
                    }
                }
            }
        }
    }

    scope.unmount();

    Ok(())
}

async fn add(
    dashboard: &Dashboard,
    kind: TransactionKind,
    amount: f64,
    date: Option<String>,
    note: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let occurred_at_local = date.unwrap_or_default();

    if !occurred_at_local.is_empty() && local_input_to_transport(&occurred_at_local).is_none() {
        return Err(format!(
            "invalid date \"{occurred_at_local}\", expected yyyy-mm-ddThh:mm"
        )
        .into());
    }

    let draft = NewTransactionDraft {
        kind: Some(kind),
        amount,
        occurred_at_local,
        note: note.unwrap_or_default(),
    };

    let created = dashboard.submit_new_transaction(draft).await?;
    let state = dashboard.state();

    println!(
        "Added {} of {}. Your balance is now {}.",
        created.kind.label().to_lowercase(),
        format::currency(created.amount),
        format::currency(state.balance)
    );

    Ok(())
}

async fn profile(dashboard: &Dashboard) -> Result<(), Box<dyn Error>> {
    dashboard.load_profile().await;
    let state = dashboard.state();

    if state.phase == DashboardPhase::Unauthorized {
        return Err(session_expired());
    }

    let Some(profile) = state.profile else {
        return Err(state
            .profile_error
            .unwrap_or_else(|| "Could not load your details.".to_owned())
            .into());
    };

    println!("Name:    {}", profile.name);
    println!("Email:   {}", profile.email);
    println!("CPF:     {}", profile.tax_id);
    println!(
        "Created: {}",
        profile.created_at.as_deref().unwrap_or("-")
    );

    Ok(())
}

async fn delete_account(dashboard: &Dashboard, confirmed: bool) -> Result<(), Box<dyn Error>> {
    if !confirmed {
        return Err("deleting your account cannot be undone, pass --yes to confirm.".into());
    }

    dashboard.delete_account().await?;
    println!("Your account has been deleted. Unset {TOKEN_VAR}.");

    Ok(())
}

fn render(state: &DashboardState) -> String {
    let mut lines = Vec::with_capacity(state.transactions.len() + 4);

    if let Some(profile) = &state.profile {
        lines.push(format!("{} <{}>", profile.name, profile.email));
    }

    lines.push(format!("Balance: {}", format::currency(state.balance)));
    lines.push(format!("Transactions ({}):", state.filter));

    if state.transactions.is_empty() {
        lines.push("  No transactions yet.".to_owned());
    }

    for transaction in &state.transactions {
        lines.push(format!(
            "  {:<19}  {:<7}  {:>12}  {}",
            format::occurred_at_label(transaction),
            transaction.kind.label(),
            format::currency(transaction.signed_amount()),
            format::truncate_note(transaction.note.as_deref().unwrap_or_default())
        ));
    }

    lines.join("\n")
}

fn session_expired() -> Box<dyn Error> {
    "your session has expired, log in again with `dashboard login <email>`.".into()
}

fn print_toast(kind: ToastKind, text: &str) {
    match kind {
        ToastKind::Success => println!("\x1b[32;1m{text}\x1b[0m"),
        ToastKind::Error => print_error(text),
        ToastKind::Info => println!("{text}"),
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}

fn setup_logging() {
    let stdout_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(stdout_filter);

    let debug_log = match OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
    {
        Ok(log_file) => Some(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(Arc::new(log_file))
                .with_filter(LevelFilter::DEBUG),
        ),
        Err(error) => {
            eprintln!("Could not open debug.log, only logging to stdout: {error}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}
