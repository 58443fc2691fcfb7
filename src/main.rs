mod app_state;
mod handlers;
mod routes;
mod templates;

use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use ec2dash::api::{self, ApiClient, InstanceBackend};
use ec2dash::config::{self, ControllerConfig, DEFAULT_HOST, DEFAULT_PORT};
use ec2dash::models::{CreateInstanceRequest, Instance, InstanceAction, MachineImage};
use ec2dash::services::{ActionOutcome, InstanceController};
use ec2dash::ControllerError;

use app_state::AppState;

type Controller = InstanceController<ApiClient>;

fn build_client(env_file: Option<&str>) -> (ApiClient, String) {
    config::load_env_file(env_file);
    let api_base_url = config::get_api_base_url();
    match ApiClient::new(&api_base_url, config::get_request_timeout()) {
        Ok(client) => (client, api_base_url),
        Err(e) => {
            tracing::error!(%e, "Failed to create HTTP client");
            eprintln!("{}: {}", yansi::Paint::red("Failed to create HTTP client"), e);
            process::exit(1);
        }
    }
}

fn build_controller(env_file: Option<&str>) -> (Controller, String) {
    let (client, api_base_url) = build_client(env_file);
    let controller = InstanceController::new(Arc::new(client), ControllerConfig::from_env());
    (controller, api_base_url)
}

async fn start_server(controller: Controller, api_base_url: String, host: &str, port: u16) {
    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::red("Invalid host/port format"), e);
            process::exit(1);
        }
    };

    // Populate the table before the first page load; failures show up as a notification.
    let _ = controller.refresh_instances().await;

    let app = routes::build_router(AppState {
        controller,
        api_base_url: api_base_url.clone(),
    });
    tracing::info!(%addr, backend = %api_base_url, "Starting dashboard server");
    println!(
        "{} {}",
        yansi::Paint::new("Dashboard running on").green(),
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

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn state_cell(instance: &Instance) -> Cell {
    let color = match instance.power_state.badge_variant() {
        "success" => Color::Green,
        "warning" => Color::Yellow,
        _ => Color::Red,
    };
    Cell::new(instance.power_state.as_str()).fg(color)
}

fn print_instances(instances: &[Instance]) {
    if instances.is_empty() {
        println!("(no instances)");
        return;
    }
    let mut table = new_table();
    table.set_header(vec!["Instance ID", "Name", "Type", "State", "Public IP", "Private IP", "Launched"]);
    for i in instances {
        table.add_row(vec![
            Cell::new(&i.id),
            Cell::new(i.display_name()),
            Cell::new(i.instance_type_display()),
            state_cell(i),
            Cell::new(i.public_ip_display()),
            Cell::new(i.private_ip_display()),
            Cell::new(i.launched_display()),
        ]);
    }
    println!("\n{table}\n");
}

fn print_amis(amis: &[MachineImage]) {
    if amis.is_empty() {
        println!("(no images)");
        return;
    }
    let mut table = new_table();
    table.set_header(vec!["Image ID", "Name", "Architecture", "State", "Created"]);
    for a in amis {
        table.add_row(vec![
            a.image_id.as_str(),
            a.name.as_deref().unwrap_or(""),
            a.architecture.as_deref().unwrap_or(""),
            a.state.as_deref().unwrap_or(""),
            a.creation_date.as_deref().unwrap_or(""),
        ]);
    }
    println!("\n{table}\n");
}

fn fail(context: &str, e: &ControllerError) -> ! {
    eprintln!("{}: {}", yansi::Paint::new(context).red(), e);
    process::exit(1);
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(message);
    pb
}

/// Run a controller operation while a spinner shows the pending action's stage.
async fn with_progress<T, F>(controller: &Controller, message: String, work: F) -> T
where
    F: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let pb = spinner(message.clone());
    let handle = tokio::spawn(work);
    while !handle.is_finished() {
        if let Some(pending) = controller.snapshot().pending {
            pb.set_message(format!("{} ({})", message, pending.stage.label()));
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    pb.finish_and_clear();
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}: {}", yansi::Paint::red("Background task failed"), e);
            process::exit(1);
        }
    }
}

fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{} [y/N] ", yansi::Paint::new(prompt).yellow());
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

#[derive(Parser)]
#[command(
    name = "ec2dash",
    author,
    version,
    about = "EC2 instance dashboard",
    long_about = r#"ec2dash: list, create, start, stop and terminate EC2 instances through the dashboard backend.

Run `ec2dash serve` for the web dashboard, or use the `instances` and `amis` commands from a terminal. The backend address comes from API_BASE_URL (default http://localhost:8000), read from the environment or a `.env` file.

Examples:
  1) Web dashboard:
      ec2dash serve --port 3000
  2) Start an instance and wait until it is running:
      ec2dash instances start i-0123456789abcdef0
  3) Terminate without the interactive prompt:
      ec2dash instances terminate i-0123456789abcdef0 --yes
"#,
    after_help = "Use `ec2dash <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
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
    },
    /// Validate configuration and backend connectivity
    #[command(about = "Validate configuration and ensure the backend answers.", long_about = "Print the effective configuration and try to list instances from the configured backend.")]
    CheckConfig,
    /// Manage instances through the backend
    #[command(about = "Manage instances (list, status, create, start, stop, terminate)", long_about = "These commands perform the same actions as the dashboard. Start and stop wait until the backend reports the new state; terminate asks for confirmation unless --yes is given.")]
    Instances {
        #[command(subcommand)]
        sub: InstanceCommands,
    },
    /// Browse machine images
    Amis {
        #[command(subcommand)]
        sub: AmiCommands,
    },
}

#[derive(Subcommand)]
enum InstanceCommands {
    /// List all instances
    List,
    /// Show the power state of one instance
    Status { instance_id: String },
    /// Create a new instance
    #[command(about = "Create an instance", long_about = "Create an instance from a machine image. `--image-id` is required; see `ec2dash amis list`.")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        image_id: String,
        /// Instance type (defaults to DEFAULT_INSTANCE_TYPE)
        #[arg(long)]
        instance_type: Option<String>,
        /// Request an on-demand instance instead of a spot instance
        #[arg(long, default_value_t = false)]
        on_demand: bool,
    },
    /// Start an instance and wait until it is running
    Start { instance_id: String },
    /// Stop an instance and wait until it is stopped
    Stop { instance_id: String },
    /// Terminate an instance
    Terminate {
        instance_id: String,
        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AmiCommands {
    /// List the images offered for new instances
    List,
}

async fn run_lifecycle(controller: Controller, action: InstanceAction, instance_id: String) {
    controller.open_instance(&instance_id);
    let message = format!(
        "{} {} (gives up after {}s)",
        action,
        instance_id,
        controller.config().max_poll_duration().as_secs()
    );
    let worker = controller.clone();
    let id = instance_id.clone();
    let result = with_progress(&controller, message, async move { worker.perform_action(action, &id).await }).await;
    match result {
        Ok(ActionOutcome::Completed { attempts }) => {
            println!(
                "{} {} {} ({} checks)",
                yansi::Paint::new("Instance").green(),
                instance_id,
                yansi::Paint::new(action.desired_state().to_string()).green(),
                attempts
            );
            print_instances(&controller.snapshot().instances);
        }
        Ok(ActionOutcome::AwaitingConfirmation) => {}
        Err(e) => fail(&format!("Failed to {} instance", action), &e),
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }
    if cli.silent {
        api::set_silent(true);
    }

    let env_file = cli.env_file.as_deref();
    let Some(command) = cli.command else {
        let (controller, api_base_url) = build_controller(env_file);
        start_server(controller, api_base_url, DEFAULT_HOST, DEFAULT_PORT).await;
        return;
    };

    match command {
        Commands::Serve { host, port } => {
            let (controller, api_base_url) = build_controller(env_file);
            start_server(controller, api_base_url, &host, port).await;
        }
        Commands::CheckConfig => {
            let (controller, api_base_url) = build_controller(env_file);
            let cfg = controller.config();
            println!("API_BASE_URL          {}", api_base_url);
            println!("POLL_INTERVAL_SECS    {}", cfg.poll_interval.as_secs());
            println!("POLL_MAX_ATTEMPTS     {}", cfg.max_poll_attempts);
            println!("TERMINATE_GRACE_SECS  {}", cfg.terminate_grace.as_secs());
            println!("NOTIFICATION_TTL_SECS {}", cfg.notification_ttl.as_secs());
            println!("DEFAULT_INSTANCE_TYPE {}", cfg.default_instance_type);
            println!("Poll timeout          {}s", cfg.max_poll_duration().as_secs());
            match controller.refresh_instances().await {
                Ok(count) => {
                    println!(
                        "{}",
                        yansi::Paint::new(format!("Configuration looks valid ({} instances returned)", count)).green()
                    );
                }
                Err(e) => fail("Configuration appears invalid", &e),
            }
        }
        Commands::Instances { sub } => {
            let (client, _) = build_client(env_file);
            let client = Arc::new(client);
            let controller = InstanceController::new(Arc::clone(&client), ControllerConfig::from_env());
            match sub {
                InstanceCommands::List => match controller.refresh_instances().await {
                    Ok(_) => print_instances(&controller.snapshot().instances),
                    Err(e) => fail("Error fetching instances", &e),
                },
                InstanceCommands::Status { instance_id } => {
                    match client.instance_status(&instance_id).await {
                        Ok(state) => println!("{} {}", instance_id, state),
                        Err(e) => fail("Error fetching status", &ControllerError::from(e)),
                    }
                }
                InstanceCommands::Create {
                    name,
                    owner,
                    department,
                    image_id,
                    instance_type,
                    on_demand,
                } => {
                    let mut request = CreateInstanceRequest::new(&controller.config().default_instance_type);
                    request.name = name;
                    request.owner = owner;
                    request.department = department;
                    request.image_id = image_id;
                    request.is_spot = !on_demand;
                    if let Some(t) = instance_type {
                        request.instance_type = t;
                    }
                    let worker = controller.clone();
                    let result = with_progress(
                        &controller,
                        format!("Creating {}", request.name),
                        async move { worker.create_instance(request).await },
                    )
                    .await;
                    match result {
                        Ok(created) => {
                            println!(
                                "{} {}",
                                yansi::Paint::new("Instance created:").green(),
                                created.instance_id.as_deref().unwrap_or("(no id returned)")
                            );
                            print_instances(&controller.snapshot().instances);
                        }
                        Err(e) => fail("Error creating instance", &e),
                    }
                }
                InstanceCommands::Start { instance_id } => {
                    run_lifecycle(controller, InstanceAction::Start, instance_id).await;
                }
                InstanceCommands::Stop { instance_id } => {
                    run_lifecycle(controller, InstanceAction::Stop, instance_id).await;
                }
                InstanceCommands::Terminate { instance_id, yes } => {
                    controller.request_terminate(&instance_id);
                    if !yes && !confirm_on_stdin(&format!("Terminate instance {}?", instance_id)) {
                        controller.close_view();
                        println!("Aborted.");
                        return;
                    }
                    let worker = controller.clone();
                    let result = with_progress(
                        &controller,
                        format!("terminate {}", instance_id),
                        async move { worker.confirm_terminate().await },
                    )
                    .await;
                    match result {
                        Ok(()) => {
                            println!("{} {}", yansi::Paint::new("Termination requested for").green(), instance_id);
                            print_instances(&controller.snapshot().instances);
                        }
                        Err(e) => fail("Error terminating instance", &e),
                    }
                }
            }
        }
        Commands::Amis { sub } => {
            let (controller, _) = build_controller(env_file);
            match sub {
                AmiCommands::List => match controller.refresh_amis().await {
                    Ok(_) => print_amis(&controller.snapshot().amis),
                    Err(e) => fail("Error fetching AMIs", &e),
                },
            }
        }
    }
}
