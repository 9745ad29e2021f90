use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{DocsApi, DocsClient};
use controllers::{
    navigation::FILE_STATE,
    ApproveOutcome, DialogService, FileModalView, FileRoute, MessageCatalog, PendingRequest,
    PreviewState, RegisterRequestController, RegistrationForm, RejectOutcome,
    SettingsUserController, SubmitOutcome, TranslateOutcome, Translator,
};
use shared::domain::{DocumentId, FileId, RequestId, UserSort};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{load_settings, Settings, DEFAULT_CONFIG_PATH};
use terminal::{TerminalBrowser, TerminalDialogs, TerminalNavigator, TerminalView};

const SETTINGS_USER_STATE: &str = "settings.user";

#[derive(Parser, Debug)]
#[command(name = "docs-admin", about = "Registration and file administration for the document server")]
struct Cli {
    /// Settings file; missing files fall back to defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides the API base URL from settings and environment.
    #[arg(long)]
    api_url: Option<String>,
    /// TOML message catalog used for dialog text.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a registration request.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
    /// List pending registration requests.
    Requests,
    /// Approve a pending request, creating the user.
    Approve {
        request_id: String,
        #[arg(long)]
        password: String,
        /// Storage quota in megabytes (1 MB = 1,000,000 bytes).
        #[arg(long)]
        quota_mb: Option<u64>,
    },
    /// Reject a pending request after confirmation.
    Reject { request_id: String },
    /// List users.
    Users {
        #[arg(long)]
        sort_column: Option<u32>,
        #[arg(long)]
        desc: bool,
    },
    /// Request the edit page of a user.
    EditUser { username: String },
    /// Load a file preview and report its state.
    File(FileArgs),
    /// Translate a file into a PDF rendition.
    Translate(FileArgs),
    /// Open the raw file data.
    Open {
        #[command(flatten)]
        file: FileArgs,
        /// Open the extracted content rendition instead.
        #[arg(long)]
        content: bool,
    },
    /// Print the raw file data.
    Print(FileArgs),
}

#[derive(Args, Debug, Clone)]
struct FileArgs {
    #[arg(long)]
    document: String,
    #[arg(long)]
    file: String,
}

impl FileArgs {
    fn route(&self) -> FileRoute {
        FileRoute {
            document_id: DocumentId::new(self.document.clone()),
            file_id: FileId::new(self.file.clone()),
        }
    }
}

struct App {
    settings: Settings,
    api: Arc<dyn DocsApi>,
    dialogs: Arc<dyn DialogService>,
    translator: Arc<dyn Translator>,
}

impl App {
    fn build(settings: Settings) -> Result<Self> {
        let client = DocsClient::with_timeout(&settings.api_url, settings.timeout())
            .context("invalid api url")?;
        let translator = match &settings.catalog_path {
            Some(path) => MessageCatalog::load(path)?,
            None => MessageCatalog::default(),
        };
        info!(api_url = %client.base_url(), entries = translator.len(), "admin client ready");
        Ok(Self {
            settings,
            api: Arc::new(client),
            dialogs: Arc::new(TerminalDialogs::stdio()),
            translator: Arc::new(translator),
        })
    }

    fn settings_controller(&self, sort: UserSort) -> SettingsUserController {
        SettingsUserController::new(
            self.api.clone(),
            self.dialogs.clone(),
            self.translator.clone(),
            Arc::new(TerminalNavigator::at(SETTINGS_USER_STATE)),
        )
        .with_sort(sort)
    }

    fn file_view(&self, args: &FileArgs) -> FileModalView {
        FileModalView::new(
            args.route(),
            self.api.clone(),
            self.dialogs.clone(),
            self.translator.clone(),
            Arc::new(TerminalNavigator::at(FILE_STATE)),
            Arc::new(TerminalView::default()),
            Arc::new(TerminalBrowser),
        )
    }

    async fn run(&self, command: Command) -> Result<()> {
        let sort = self.settings.user_sort;
        match command {
            Command::Register { username, email } => {
                let mut controller = RegisterRequestController::new(
                    self.api.clone(),
                    self.dialogs.clone(),
                    self.translator.clone(),
                    Arc::new(TerminalView::default()),
                );
                controller.request = RegistrationForm { username, email };
                match controller.submit().await {
                    SubmitOutcome::Submitted { .. } => println!("registration request submitted"),
                    SubmitOutcome::Failed(failure) => return Err(failure.into()),
                }
            }
            Command::Requests => {
                let mut controller = self.settings_controller(sort);
                controller.load_data().await;
                for pending in controller.requests() {
                    let request = &pending.request;
                    let created = request
                        .create_date
                        .map(|date| date.to_rfc3339())
                        .unwrap_or_else(|| "-".into());
                    println!("{}\t{}\t{}\t{created}", request.id, request.username, request.email);
                }
            }
            Command::Approve {
                request_id,
                password,
                quota_mb,
            } => {
                let mut controller = self.settings_controller(sort);
                controller.load_data().await;
                let id = RequestId::new(request_id);
                let Some(entry) = controller.request_mut(&id) else {
                    bail!("no pending registration request {id}");
                };
                entry.password = password;
                entry.storage_quota_mb = quota_mb;
                let pending: PendingRequest = entry.clone();
                match controller.approve_request(&pending).await {
                    ApproveOutcome::Approved => println!("approved {}", pending.request.username),
                    ApproveOutcome::Failed(failure) => return Err(failure.into()),
                }
            }
            Command::Reject { request_id } => {
                let mut controller = self.settings_controller(sort);
                controller.load_data().await;
                let id = RequestId::new(request_id);
                let Some(pending) = controller.requests().iter().find(|r| r.request.id == id).cloned()
                else {
                    bail!("no pending registration request {id}");
                };
                match controller.reject_request(&pending).await {
                    RejectOutcome::Cancelled => println!("rejection cancelled"),
                    RejectOutcome::Rejected => println!("rejected {}", pending.request.username),
                    RejectOutcome::Failed(failure) => return Err(failure.into()),
                }
            }
            Command::Users { sort_column, desc } => {
                let sort = UserSort {
                    column: sort_column.unwrap_or(sort.column),
                    ascending: if desc { false } else { sort.ascending },
                };
                let mut controller = self.settings_controller(sort);
                controller.load_data().await;
                for user in controller.users() {
                    println!(
                        "{}\t{}\t{}/{} bytes{}",
                        user.username,
                        user.email,
                        user.storage_current,
                        user.storage_quota,
                        if user.disabled { "\tdisabled" } else { "" }
                    );
                }
            }
            Command::EditUser { username } => {
                let mut controller = self.settings_controller(sort);
                controller.load_data().await;
                let Some(user) = controller.users().iter().find(|u| u.username == username) else {
                    bail!("unknown user {username}");
                };
                controller.edit_user(user);
            }
            Command::File(args) => {
                let mut view = self.file_view(&args);
                view.load().await;
                report_file(&view);
            }
            Command::Translate(args) => {
                let mut view = self.file_view(&args);
                view.load().await;
                match view.translate_file().await {
                    TranslateOutcome::Translated => report_file(&view),
                    TranslateOutcome::Ignored => bail!("file {} cannot be translated now", args.file),
                    TranslateOutcome::Failed(failure) => return Err(failure.into()),
                }
            }
            Command::Open { file, content } => {
                let view = self.file_view(&file);
                if content {
                    view.open_file_content()?;
                } else {
                    view.open_file()?;
                }
            }
            Command::Print(args) => self.file_view(&args).print_file().await?,
        }
        Ok(())
    }
}

fn report_file(view: &FileModalView) {
    match view.state() {
        PreviewState::Missing => println!("file {} not found", view.route().file_id),
        state => {
            if let Some(file) = view.file() {
                println!(
                    "{}\t{}\t{}",
                    file.id,
                    file.name.as_deref().unwrap_or("-"),
                    view.displayed_mimetype().unwrap_or("-")
                );
            }
            println!("state: {state:?}");
            println!("preview: {}", view.can_display_preview());
            if let Some(url) = view.trusted_url() {
                println!("url: {}", url.as_str());
            }
            if let Some(previous) = view.previous_file() {
                println!("previous: {}", previous.id);
            }
            if let Some(next) = view.next_file() {
                println!("next: {}", next.id);
            }
        }
    }
}

fn apply_flags(settings: &mut Settings, cli: &Cli) {
    if let Some(v) = &cli.api_url {
        settings.api_url = v.clone();
    }
    if let Some(v) = &cli.catalog {
        settings.catalog_path = Some(v.clone());
    }
    if let Some(v) = cli.timeout_secs {
        settings.timeout_secs = Some(v);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config)?;
    apply_flags(&mut settings, &cli);

    let app = App::build(settings)?;
    app.run(cli.command).await
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
