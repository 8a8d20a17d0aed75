use std::io::{self, BufRead, IsTerminal, Read};
use std::path::Path;

use anyhow::Result;
use clap::Parser;

use receipt_capture_rust::{CaptureSession, Config, ReimbursementForm};

#[derive(Parser, Debug)]
#[command(
    name = "receipt-capture-rust",
    version,
    about = "Capture receipt photos, preview OCR fields, and submit reimbursements"
)]
struct Cli {
    /// Receipt image file to capture (or pipe the image via stdin)
    #[arg(short = 'r', long = "receipt")]
    receipt: Option<String>,

    /// Submit the captured receipt with the form fields
    #[arg(short = 's', long = "submit")]
    submit: bool,

    /// Backend base URL (overrides RECEIPT_BACKEND_URL and settings)
    #[arg(short = 'u', long = "base-url")]
    base_url: Option<String>,

    /// Employee name
    #[arg(long = "name")]
    name: Option<String>,

    /// Employee ID number
    #[arg(long = "id-number")]
    id_number: Option<String>,

    /// Position title
    #[arg(long = "position")]
    position: Option<String>,

    /// Division name
    #[arg(long = "division")]
    division: Option<String>,

    /// Team head name
    #[arg(long = "team-head")]
    team_head: Option<String>,

    /// Reimbursement month
    #[arg(long = "month")]
    month: Option<String>,

    /// Project ID
    #[arg(long = "pid")]
    pid: Option<String>,

    /// Read extra settings from a local TOML file
    #[arg(long = "read-settings")]
    read_settings: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,

    /// Interactive mode
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,
}

impl Cli {
    fn into_config(self, receipt_attachment: Option<receipt_capture_rust::ReceiptFile>) -> Config {
        Config {
            receipt: self.receipt,
            receipt_attachment,
            submit: self.submit,
            base_url: self.base_url,
            settings_path: self.read_settings,
            name: self.name,
            id_number: self.id_number,
            position: self.position,
            division: self.division,
            team_head: self.team_head,
            month: self.month,
            pid: self.pid,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    receipt_capture_rust::logging::init(cli.verbose)?;
    if cli.interactive {
        return run_interactive(cli).await;
    }

    let mut stdin_attachment = None;
    if cli.receipt.is_none() && !io::stdin().is_terminal() {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        if !buffer.is_empty() {
            stdin_attachment = Some(receipt_capture_rust::receipt::load_receipt_from_bytes(
                buffer, None,
            )?);
        }
    }

    let output = receipt_capture_rust::run(cli.into_config(stdin_attachment)).await?;
    println!("{}", output);
    Ok(())
}

struct InteractiveState {
    client: receipt_capture_rust::BackendClient,
    session: CaptureSession,
    form: ReimbursementForm,
}

async fn run_interactive(cli: Cli) -> Result<()> {
    use std::io::Write;

    let settings_path = cli.read_settings.as_deref().map(Path::new);
    let settings = receipt_capture_rust::settings::load_settings(settings_path)?;
    let base_url = receipt_capture_rust::client::resolve_base_url(
        cli.base_url.as_deref(),
        settings.base_url.as_deref(),
    );
    let config = cli.into_config(None);
    let mut state = InteractiveState {
        client: receipt_capture_rust::BackendClient::new(base_url),
        session: CaptureSession::new(),
        form: receipt_capture_rust::build_form(&config, &settings),
    };

    println!("Interactive mode. Use /quit or /exit to finish.");
    println!("Type /help to see available commands.");

    let mut line = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();
    loop {
        line.clear();
        print!("> ");
        io::stdout().flush()?;
        if stdin_lock.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.starts_with('/') {
            if handle_interactive_command(input, &mut state).await? {
                break;
            }
            continue;
        }
        eprintln!("unknown input; type /help for commands");
    }
    Ok(())
}

async fn handle_interactive_command(input: &str, state: &mut InteractiveState) -> Result<bool> {
    let trimmed = input.trim();
    if matches!(trimmed, "/quit" | "/exit") {
        return Ok(true);
    }
    if trimmed == "/help" {
        print_interactive_help();
        return Ok(false);
    }
    if trimmed == "/form" {
        print_form(&state.form);
        return Ok(false);
    }
    if trimmed == "/discard" {
        state.session.clear();
        println!("capture discarded");
        return Ok(false);
    }
    if trimmed == "/preview" {
        match receipt_capture_rust::capture::refresh_preview(&state.client, &state.session).await {
            Ok(rendered) => println!("{}", rendered),
            Err(err) => eprintln!("{:#}", err),
        }
        return Ok(false);
    }
    if trimmed == "/submit" {
        match receipt_capture_rust::submit::run_submission(
            &state.client,
            &state.session,
            &state.form,
        )
        .await
        {
            Ok(rendered) => println!("{}", rendered),
            Err(err) => eprintln!("{:#}", err),
        }
        return Ok(false);
    }

    if let Some(arg) = trimmed.strip_prefix("/capture") {
        let value = arg.trim();
        if value.is_empty() {
            println!(
                "capture: {}",
                if state.session.has_image() {
                    "(stored)"
                } else {
                    "(none)"
                }
            );
            return Ok(false);
        }
        match receipt_capture_rust::receipt::load_receipt(Path::new(value)) {
            Ok(receipt) => {
                match receipt_capture_rust::capture::run_capture(
                    &state.client,
                    &mut state.session,
                    &receipt,
                )
                .await
                {
                    Ok(rendered) => println!("{}", rendered),
                    Err(err) => eprintln!("{:#}", err),
                }
            }
            Err(err) => eprintln!("{:#}", err),
        }
        return Ok(false);
    }
    if let Some(arg) = trimmed.strip_prefix("/base-url") {
        let value = arg.trim();
        if value.is_empty() {
            println!("base-url: {}", state.client.base_url());
        } else {
            state.client = receipt_capture_rust::BackendClient::new(value);
            println!("base-url set to {}", state.client.base_url());
        }
        return Ok(false);
    }
    if let Some(arg) = trimmed.strip_prefix("/name") {
        set_field(&mut state.form.name, "name", arg);
        return Ok(false);
    }
    if let Some(arg) = trimmed.strip_prefix("/id-number") {
        set_field(&mut state.form.id_number, "id-number", arg);
        return Ok(false);
    }
    if let Some(arg) = trimmed.strip_prefix("/position") {
        set_field(&mut state.form.position, "position", arg);
        return Ok(false);
    }
    if let Some(arg) = trimmed.strip_prefix("/division") {
        set_field(&mut state.form.division, "division", arg);
        return Ok(false);
    }
    if let Some(arg) = trimmed.strip_prefix("/team-head") {
        set_field(&mut state.form.team_head, "team-head", arg);
        return Ok(false);
    }
    if let Some(arg) = trimmed.strip_prefix("/month") {
        set_field(&mut state.form.month, "month", arg);
        return Ok(false);
    }
    if let Some(arg) = trimmed.strip_prefix("/pid") {
        set_field(&mut state.form.pid, "pid", arg);
        return Ok(false);
    }

    eprintln!("unknown command: {}", trimmed);
    Ok(false)
}

fn set_field(slot: &mut String, label: &str, arg: &str) {
    let value = arg.trim();
    if value.is_empty() {
        let shown = if slot.is_empty() { "(empty)" } else { slot };
        println!("{}: {}", label, shown);
    } else {
        *slot = value.to_string();
        println!("{} set to {}", label, value);
    }
}

fn print_form(form: &ReimbursementForm) {
    for (key, value) in form.fields() {
        let shown = if value.is_empty() { "(empty)" } else { value };
        println!("{}: {}", key, shown);
    }
}

fn print_interactive_help() {
    println!("Commands:");
    println!("  /quit, /exit            Exit interactive mode");
    println!("  /capture <path>         Capture a receipt image and preview OCR");
    println!("  /preview                Re-run OCR on the stored capture");
    println!("  /discard                Drop the stored capture");
    println!("  /submit                 Submit the stored capture with the form");
    println!("  /form                   Show the form fields");
    println!("  /name <value>           Set employee name (or show current)");
    println!("  /id-number <value>      Set employee ID number");
    println!("  /position <value>       Set position title");
    println!("  /division <value>       Set division");
    println!("  /team-head <value>      Set team head");
    println!("  /month <value>          Set reimbursement month");
    println!("  /pid <value>            Set project ID");
    println!("  /base-url <url>         Set backend base URL (or show current)");
}
