//! `routemap url`: the stored proxy URL.

use crate::cli::{GlobalOpts, UrlArgs, UrlCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &UrlArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = config::url_store(global);

    match args.command {
        UrlCommand::Get => {
            let url = store.url()?.ok_or_else(|| CliError::NotFound {
                what: "Stored URL".into(),
                hint: "Store one with: routemap url set http://traefik:8080".into(),
            })?;
            output::print_output(&url, global.quiet);
            Ok(())
        }

        UrlCommand::Set { ref url } => {
            let parsed = routemap_config::parse_url(url)?;
            store.set_url(&parsed)?;
            if !global.quiet {
                eprintln!("Stored {parsed} in {}", store.path().display());
            }
            Ok(())
        }

        UrlCommand::Clear => {
            let removed = store.clear_url()?;
            if !global.quiet {
                if removed {
                    eprintln!("Stored URL removed");
                } else {
                    eprintln!("No stored URL");
                }
            }
            Ok(())
        }
    }
}
