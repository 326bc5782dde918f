use std::io::{self, Write};

use serde_json::{json, Value};

use crate::app::AppError;
use crate::domain::settings::Settings;
use crate::store::handle::{HandleDesc, HandleStore};
use crate::store::{self, Store, StoreError};

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_BOLD_CYAN: &str = "\x1b[1;36m";
const ANSI_BOLD_GREEN: &str = "\x1b[1;32m";
const ANSI_BOLD_MAGENTA: &str = "\x1b[1;35m";
const ANSI_BOLD_YELLOW: &str = "\x1b[1;33m";
const ANSI_DIM: &str = "\x1b[2m";

pub(crate) fn init_all(store: &Store, handles: &HandleStore) -> Result<(), AppError> {
    print_banner("BREAKING GROUND 🏗️")?;
    progress(&format!(
        "preparing {} storage at {}",
        store.kind(),
        store.location().display()
    ))?;
    seed_resources(store)?;
    progress_ok("all resources present")?;
    progress("remembering storage root for future sessions")?;
    handles.save_root(&HandleDesc {
        kind: store.kind(),
        path: store.location().to_path_buf(),
    });
    match handles.root() {
        Some(_) => progress_ok("storage root remembered")?,
        None => progress_warn("could not persist the root handle; pass --root next time")?,
    }
    Ok(())
}

pub(crate) fn uninit_all(handles: &HandleStore) -> Result<(), AppError> {
    print_banner("PACKING UP THE SITE OFFICE")?;
    progress("forgetting the remembered storage root")?;
    handles.clear_root();
    progress_ok("root handle cleared; your data stays where it is")?;
    Ok(())
}

/// Idempotent: safe to run every session, never clobbers existing data.
pub(crate) fn seed_resources(store: &Store) -> Result<(), AppError> {
    let empty = json!([]);
    for resource in store::COLLECTION_RESOURCES {
        store.ensure_resource(resource, &empty)?;
    }
    store.ensure_resource(store::SETTINGS, &default_settings_value()?)?;
    Ok(())
}

fn default_settings_value() -> Result<Value, AppError> {
    serde_json::to_value(Settings::default()).map_err(|source| {
        AppError::Store(StoreError::Serialize {
            resource: store::SETTINGS.to_string(),
            source,
        })
    })
}

fn progress(message: &str) -> Result<(), AppError> {
    println!("{ANSI_BOLD_CYAN}•{ANSI_RESET} {message}");
    io::stdout().flush()?;
    Ok(())
}

fn progress_ok(message: &str) -> Result<(), AppError> {
    println!("{ANSI_BOLD_GREEN}✓{ANSI_RESET} {message}");
    io::stdout().flush()?;
    Ok(())
}

fn progress_warn(message: &str) -> Result<(), AppError> {
    println!("{ANSI_BOLD_YELLOW}!{ANSI_RESET} {message}");
    io::stdout().flush()?;
    Ok(())
}

fn print_banner(title: &str) -> Result<(), AppError> {
    println!("{ANSI_BOLD_MAGENTA}{title}{ANSI_RESET}");
    println!("{ANSI_BOLD_CYAN}Welcome to sitebook!{ANSI_RESET}");
    println!(
        "{ANSI_DIM}version {}{ANSI_RESET}",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    io::stdout().flush()?;
    Ok(())
}
