use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use padbridge_client::{
    CommandRegistry, EditWithEditorCommand, EditorClient, EntryData, FileBrowserHost, FileEntry,
    Notifier, SaveHandler, SaveTarget,
};
use padbridge_client::ClientError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "padbridge")]
#[command(about = "Open gallery documents in the collaborative editor and save them back")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the edit page for a gallery file and open it in the browser
    EditUrl {
        /// File name as shown in the gallery (used for the type check)
        #[arg(long)]
        name: String,

        /// MIME type reported for the file
        #[arg(long)]
        mime: Option<String>,

        /// Explicit gallery file ID
        #[arg(long)]
        file_id: Option<i64>,

        /// Download URL carrying `fileId=<n>` when no explicit ID is known
        #[arg(long)]
        url: Option<String>,

        /// Gallery the file belongs to
        #[arg(long)]
        gallery_id: Option<i64>,

        /// Path of the page hosting the file browser
        #[arg(long, default_value = "/")]
        page_path: String,

        /// Print the URL without opening a browser
        #[arg(long)]
        no_open: bool,

        /// Check first that the bridge serves an editor session for the file
        #[arg(long)]
        check: bool,
    },
    /// Upload a local document through the save endpoint
    Save {
        /// Local file to upload
        path: PathBuf,

        /// Gallery file ID to replace (0 creates a new file)
        #[arg(long, default_value = "0")]
        file_id: i64,

        /// Gallery for a new file
        #[arg(long)]
        gallery_id: Option<i64>,

        /// Display name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,

        /// Format (defaults to the file extension)
        #[arg(long)]
        format: Option<String>,
    },
}

struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Command-line stand-in for the file browser page.
struct CliHost {
    origin: String,
    page_path: String,
    gallery_id: Option<i64>,
    open_browser: bool,
    registry: CommandRegistry,
}

impl Notifier for CliHost {
    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

impl FileBrowserHost for CliHost {
    fn page_origin(&self) -> String {
        self.origin.clone()
    }

    fn page_path(&self) -> String {
        self.page_path.clone()
    }

    fn current_directory(&self) -> Option<FileEntry> {
        self.gallery_id.map(|gallery_id| FileEntry {
            data: EntryData {
                file_id: None,
                gallery_id: Some(gallery_id),
            },
            ..Default::default()
        })
    }

    fn open_in_new_context(&self, url: &str) -> Result<(), ClientError> {
        if !self.open_browser {
            return Ok(());
        }
        webbrowser::open(url).map_err(|e| ClientError::OpenFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    fn registry(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let client = EditorClient::from_env()?;

    match args.command {
        Command::EditUrl {
            name,
            mime,
            file_id,
            url,
            gallery_id,
            page_path,
            no_open,
            check,
        } => {
            let entry = FileEntry {
                name,
                mime,
                url,
                hash: String::new(),
                data: EntryData {
                    file_id,
                    gallery_id: None,
                },
            };
            let mut host = CliHost {
                origin: client.base_url().to_string(),
                page_path,
                gallery_id,
                open_browser: !no_open,
                registry: CommandRegistry::new(),
            };
            EditWithEditorCommand::register(&mut host);

            let selection = [entry];
            if EditWithEditorCommand::get_state(&selection).as_code() != 0 {
                anyhow::bail!("Selected file is not an Office document the editor can open");
            }
            if check {
                let file_id = padbridge_client::resolve_file_id(&selection[0])?;
                client.check_editor(file_id).await?;
            }
            let url = EditWithEditorCommand::exec(&selection, &host)?;
            println!("{}", url);
        }
        Command::Save {
            path,
            file_id,
            gallery_id,
            name,
            format,
        } => {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("File name is not valid UTF-8")?
                .to_string();
            let format = match format {
                Some(format) => format,
                None => path
                    .extension()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_ascii_lowercase())
                    .context("Cannot derive a format; pass --format")?,
            };
            let target = SaveTarget {
                file_id,
                gallery_id,
                name: name.unwrap_or(stem),
                format,
            };
            let handler = SaveHandler::new(client, target, Arc::new(StderrNotifier));
            let saved_id = handler.on_save_file(&path, |_| {}).await?;
            println!("{}", saved_id);
        }
    }

    Ok(())
}
