use axum::{
    http::header::CACHE_CONTROL,
    http::HeaderValue,
    response::Redirect,
    routing::get,
    Router,
};
use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use terminal_size::{terminal_size, Width};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use userdeck::api::HttpUserStore;
use userdeck::config::{self, DEFAULT_HOST, DEFAULT_PORT};
use userdeck::handlers;
use userdeck::models::{AppState, RoleFilter, User, UserDraft};
use userdeck::reconciler::{filter_users, FieldErrors, ListReconciler, ReconcileError};

// Embed the default stylesheet in the binary
const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

async fn build_state_from_env(env_file: Option<&str>) -> AppState {
    config::load_env_file(env_file);
    let api_base_url = config::get_api_base_url();

    let client = reqwest::Client::builder()
        .user_agent(format!("Userdeck/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client");

    let store = HttpUserStore::new(client, api_base_url.clone());
    AppState {
        reconciler: Arc::new(Mutex::new(ListReconciler::new(store))),
        api_base_url,
        custom_css: None,
    }
}

fn build_app(state: AppState) -> Router {
    // Always serve styles.css - use custom if provided, otherwise use embedded default
    let stylesheet_content = state
        .custom_css
        .clone()
        .unwrap_or_else(|| DEFAULT_STYLESHEET.to_string());

    Router::new()
        .route("/", get(|| async { Redirect::to("/users") }))
        .route("/users", get(handlers::users::users_list))
        .route(
            "/users/new",
            get(handlers::users::user_new_get).post(handlers::users::user_new_post),
        )
        .route(
            "/users/:id/edit",
            get(handlers::users::user_edit_get).post(handlers::users::user_edit_post),
        )
        .route(
            "/users/:id/delete",
            get(handlers::users::user_delete_get).post(handlers::users::user_delete_post),
        )
        .route("/static/styles.css", get(move || {
            let css = stylesheet_content.clone();
            async move {
                (
                    [(axum::http::header::CONTENT_TYPE, "text/css")],
                    css
                )
            }
        }))
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=31536000, immutable"),
                ))
                .service(ServeDir::new("static")),
        )
        .with_state(state)
}

async fn start_server(mut state: AppState, host: &str, port: u16, stylesheet: Option<String>) {
    if let Some(path) = stylesheet {
        match std::fs::read_to_string(&path) {
            Ok(css) => {
                state.custom_css = Some(css);
                tracing::info!("Loaded custom stylesheet from {}", path);
            }
            Err(e) => {
                tracing::error!(%e, "Failed to read custom stylesheet");
                eprintln!("{} {}: {}", yansi::Paint::red("Failed to read custom stylesheet at"), path, e);
                process::exit(1);
            }
        }
    }

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::red("Invalid host/port format"), e);
            process::exit(1);
        }
    };
    let app = build_app(state.clone());
    tracing::info!(%addr, "Starting Userdeck server");
    println!(
        "{} {}",
        yansi::Paint::new("Web server running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new("Please stop any process using this port, or start the server with a different --port value.").yellow()
            );
            process::exit(1);
        }
    }
}

fn print_users_table(users: &[User]) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w - 4);
    }

    table.set_header(vec!["ID", "Name", "Email", "Role"]);
    for u in users {
        table.add_row(vec![
            u.id.to_string(),
            u.name.clone(),
            u.email.clone(),
            u.role.to_string(),
        ]);
    }
    println!("\n{table}\n");
}

fn print_user_detail(user: &User) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["id".to_string(), user.id.to_string()]);
    table.add_row(vec!["name".to_string(), user.name.clone()]);
    table.add_row(vec!["email".to_string(), user.email.clone()]);
    table.add_row(vec!["role".to_string(), user.role.to_string()]);
    println!("\n{table}\n");
}

fn print_field_errors(errors: &FieldErrors) {
    for (field, message) in [
        ("name", &errors.name),
        ("email", &errors.email),
        ("role", &errors.role),
    ] {
        if let Some(msg) = message {
            eprintln!("{} {}: {}", yansi::Paint::red("✗"), field, msg);
        }
    }
}

fn confirm_delete(user: &User) -> bool {
    use std::io::Write;
    print!("Delete user '{}' ({})? [y/N]: ", user.name, user.email);
    std::io::stdout().flush().ok();
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

#[derive(Parser)]
#[command(
    name = "userdeck",
    author,
    version,
    about = "Userdeck command-line tool",
    long_about = r#"Userdeck — a dashboard and CLI for a user-directory REST backend.

This tool surfaces a small set of commands to run the web dashboard, validate configuration and manage user records through the API. Use the `--env-file` option or environment variables (API_BASE_URL) to point it at the backend.

Examples:
  1) Build & run (dev):
      cargo run -- serve --host 127.0.0.1 --port 8080
  2) Manage users:
      userdeck users list
      userdeck users add "Ann Harper" ann@example.com admin
"#,
    after_help = "Use `userdeck <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web dashboard
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Validate configuration (env vars / backend connectivity)
    #[command(
        about = "Validate configuration and ensure backend connectivity.",
        long_about = "Validate the API_BASE_URL environment variable and confirm the backend answers by fetching the user list once."
    )]
    CheckConfig { env_file: Option<String> },
    /// Manage user records via the configured backend
    #[command(
        about = "Manage user records via the backend (list, show, add, update, delete)",
        long_about = "These commands perform the same actions the web dashboard performs; they make API requests against the configured backend. Deletion asks for confirmation unless `--yes` is given."
    )]
    Users {
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
        #[command(subcommand)]
        sub: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List users (optionally filtered)
    #[command(
        about = "List users",
        long_about = "Fetch and display the user collection. `--search` matches name or email case-insensitively; `--role` restricts to one role (default: all)."
    )]
    List {
        /// Substring to match against name or email
        #[arg(long)]
        search: Option<String>,
        /// Restrict to one role (admin, user, moderator, ...)
        #[arg(long)]
        role: Option<String>,
    },
    /// Show one user
    #[command(about = "Show one user", long_about = "Display a single user record by id.")]
    Show { id: i64 },
    /// Add a new user
    #[command(
        about = "Add a new user",
        long_about = "Create a user record. The draft is validated locally (name, email shape, role) before any request is made; the backend may still reject it, e.g. for a duplicate email."
    )]
    Add {
        name: String,
        email: String,
        role: String,
    },
    /// Update an existing user
    #[command(
        about = "Update an existing user",
        long_about = "Update a user record by id. Omitted fields keep their current value."
    )]
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Delete a user
    #[command(
        about = "Delete a user",
        long_about = "Permanently delete a user record. Asks for confirmation unless `--yes` is given."
    )]
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

async fn run_user_command(state: AppState, cmd: UserCommands) {
    let mut reconciler = state.reconciler.lock().await;

    match cmd {
        UserCommands::List { search, role } => {
            if let Err(e) = reconciler.reload().await {
                eprintln!("{}: {}", yansi::Paint::red("Failed to load users"), e);
                process::exit(1);
            }
            let search = search.unwrap_or_default();
            let role_filter = RoleFilter::parse(role.as_deref().unwrap_or("all"));
            let users = filter_users(reconciler.users(), &search, role_filter);
            if users.is_empty() {
                println!("(no users)");
            } else {
                print_users_table(&users);
            }
            println!("{} of {} users", users.len(), reconciler.users().len());
        }
        UserCommands::Show { id } => {
            if let Err(e) = reconciler.reload().await {
                eprintln!("{}: {}", yansi::Paint::red("Failed to load users"), e);
                process::exit(1);
            }
            match reconciler.get(id) {
                Some(user) => print_user_detail(user),
                None => {
                    eprintln!("{}", yansi::Paint::new(format!("No user with id {}", id)).red());
                    process::exit(1);
                }
            }
        }
        UserCommands::Add { name, email, role } => {
            let draft = UserDraft { name, email, role };
            match reconciler.create(&draft).await {
                Ok(user) => {
                    println!("{}", yansi::Paint::new("User added successfully!").green());
                    print_user_detail(&user);
                }
                Err(ReconcileError::Validation(errors)) => {
                    print_field_errors(&errors);
                    process::exit(1);
                }
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::red("Failed to add user"), e);
                    process::exit(1);
                }
            }
        }
        UserCommands::Update {
            id,
            name,
            email,
            role,
        } => {
            if let Err(e) = reconciler.reload().await {
                eprintln!("{}: {}", yansi::Paint::red("Failed to load users"), e);
                process::exit(1);
            }
            let Some(existing) = reconciler.get(id) else {
                eprintln!("{}", yansi::Paint::new(format!("No user with id {}", id)).red());
                process::exit(1);
            };
            let mut draft = UserDraft::from_user(existing);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(email) = email {
                draft.email = email;
            }
            if let Some(role) = role {
                draft.role = role;
            }
            match reconciler.update(id, &draft).await {
                Ok(user) => {
                    println!("{}", yansi::Paint::new("User updated successfully!").green());
                    print_user_detail(&user);
                }
                Err(ReconcileError::Validation(errors)) => {
                    print_field_errors(&errors);
                    process::exit(1);
                }
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::red("Failed to update user"), e);
                    process::exit(1);
                }
            }
        }
        UserCommands::Delete { id, yes } => {
            if let Err(e) = reconciler.reload().await {
                eprintln!("{}: {}", yansi::Paint::red("Failed to load users"), e);
                process::exit(1);
            }
            let Some(user) = reconciler.get(id) else {
                eprintln!("{}", yansi::Paint::new(format!("No user with id {}", id)).red());
                process::exit(1);
            };
            let user = user.clone();
            if !yes && !confirm_delete(&user) {
                println!("Aborted.");
                return;
            }
            match reconciler.remove(id).await {
                Ok(()) => {
                    println!("{}", yansi::Paint::new("User deleted successfully!").green());
                }
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::red("Failed to delete user"), e);
                    process::exit(1);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // CLI parsing
    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    if cli.silent {
        userdeck::api::set_silent(true);
    }

    // Dispatch CLI commands. If no command provided, serve the web app by default
    if cli.command.is_none() {
        let state = build_state_from_env(None).await;
        start_server(state, DEFAULT_HOST, DEFAULT_PORT, None).await;
        return;
    }
    match cli.command.unwrap() {
        Commands::Serve {
            host,
            port,
            env_file,
            stylesheet,
        } => {
            let state = build_state_from_env(env_file.as_deref()).await;
            start_server(state, &host, port, stylesheet).await;
        }
        Commands::CheckConfig { env_file } => {
            let state = build_state_from_env(env_file.as_deref()).await;
            if state.api_base_url.trim().is_empty() {
                eprintln!("{}", yansi::Paint::new("API_BASE_URL is not configured").red());
                process::exit(1);
            }
            let mut reconciler = state.reconciler.lock().await;
            match reconciler.reload().await {
                Ok(()) => {
                    println!(
                        "{}",
                        yansi::Paint::new(format!(
                            "Configuration looks valid ({} users returned)",
                            reconciler.users().len()
                        ))
                        .green()
                    );
                }
                Err(e) => {
                    eprintln!(
                        "{}: {}",
                        yansi::Paint::new("Configuration appears invalid").red(),
                        e
                    );
                    process::exit(1);
                }
            }
        }
        Commands::Users { env_file, sub } => {
            let state = build_state_from_env(env_file.as_deref()).await;
            run_user_command(state, sub).await;
        }
    }
}
