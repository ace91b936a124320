use clap::{Parser, Subcommand};
use photoboard::{board, config, grouping, output, run, source};
use photoboard::source::PhotoApi;
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "photoboard")]
#[command(about = "Copy a photo album to a visual board as grouped image tiles")]
#[command(long_about = "\
Copy a photo album to a visual board as grouped image tiles

Each photo becomes one tile on the board: the image, a caption banner below
it, and a text label with the photo's title and a clickable link back to its
page. The three elements are grouped so they move together. Tiles are placed
on a grid in album order, left to right, top to bottom.

Credentials come from the environment:

  FLICKR_API_KEY        Flickr REST API key
  FLICKR_USER_ID        Album owner NSID, e.g. 12345678@N00
  FLICKR_PHOTOSET_ID    Album (photoset) id
  MIRO_TOKEN            Miro OAuth token (needs boards:write)
  MIRO_BOARD_ID         Target board id

Layout comes from photoboard.toml next to where you run, all optional:

  columns = 6             # tiles per row
  cell_width = 440        # cell size in board pixels
  cell_height = 420
  origin_x = 0            # grid top-left; shift origin_y to resume a run
  origin_y = 0
  banner_height = 60
  banner_margin = 8
  banner_color = \"#FFFFFF\"
  text_size = 18
  text_padding_x = 8

Nothing is rolled back on failure: tiles already placed stay on the board,
and the recovery path for an interrupted run is re-running with origin_y
shifted below the previous grid.

Run 'photoboard gen-config' to generate a documented photoboard.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Layout config file
    #[arg(long, default_value = "photoboard.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the album and place grouped tiles on the board
    Sync {
        /// Disable the pacing pause between tiles
        #[arg(long)]
        no_pacing: bool,
    },
    /// Fetch the album and print the computed layout without touching the board
    Plan,
    /// Validate credentials and config without fetching or placing anything
    Check,
    /// Print a stock photoboard.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Sync { no_pacing } => {
            let layout = config::load_config(&cli.config)?;
            let source_creds = config::SourceCredentials::from_env()?;
            let board_creds = config::BoardCredentials::from_env()?;

            let photos = fetch_photos(&source_creds)?;
            if photos.is_empty() {
                println!("No photos found (album may be private or IDs incorrect).");
                return Ok(());
            }
            println!(
                "Found {} photos. Copying to board {}...",
                photos.len(),
                board_creds.board_id
            );

            let board = board::MiroBoard::new(&board_creds.token, &board_creds.board_id)?;
            let pacing = if no_pacing {
                std::time::Duration::ZERO
            } else {
                run::DEFAULT_PACING
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_tile_event(&event);
                }
            });
            let summary = run::sync_photos(
                &board,
                &photos,
                &layout,
                &grouping::default_variants(),
                pacing,
                Some(tx),
            );
            printer.join().unwrap();

            output::print_summary(&summary);
            if let Some(fatal) = summary.fatal {
                return Err(fatal.into());
            }
        }
        Command::Plan => {
            let layout = config::load_config(&cli.config)?;
            let source_creds = config::SourceCredentials::from_env()?;
            let photos = fetch_photos(&source_creds)?;
            output::print_plan(&photos, &layout);
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            match config::load_config(&cli.config) {
                Ok(_) => {
                    if cli.config.exists() {
                        println!("Config: valid");
                    } else {
                        println!("Config: not found, defaults apply");
                    }
                }
                Err(e) => {
                    println!("Config: {e}");
                    return Err(e.into());
                }
            }

            let mut missing = false;
            match config::SourceCredentials::from_env() {
                Ok(_) => println!("Flickr credentials: OK"),
                Err(e) => {
                    println!("Flickr credentials: {e}");
                    missing = true;
                }
            }
            match config::BoardCredentials::from_env() {
                Ok(_) => println!("Board credentials: OK"),
                Err(e) => {
                    println!("Board credentials: {e}");
                    missing = true;
                }
            }
            if missing {
                return Err("missing credentials".into());
            }
            println!("==> Ready to sync");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// List the album, degrading a listing failure to an empty batch. A private
/// album or bad id is an operational condition the summary reports, not a
/// process failure.
fn fetch_photos(
    creds: &config::SourceCredentials,
) -> Result<Vec<source::PhotoRecord>, Box<dyn std::error::Error>> {
    let flickr = source::FlickrSource::new(&creds.api_key, &creds.user_id, &creds.photoset_id)?;
    match flickr.list_photos() {
        Ok(photos) => Ok(photos),
        Err(e) => {
            eprintln!("warning: {e}");
            Ok(Vec::new())
        }
    }
}
