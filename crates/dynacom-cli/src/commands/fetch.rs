use crate::cli::FetchArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::parse_pdb_id;
use dynacom::core::io::StructureFormat;
use std::path::PathBuf;
use tracing::{info, warn};

const RCSB_VIEW_URL: &str = "https://files.rcsb.org/view";

pub fn download_url(id: &str, format: StructureFormat) -> String {
    format!("{RCSB_VIEW_URL}/{id}.{}", format.extension())
}

/// `<save_name or id>.<extension>` in the working directory.
pub fn output_path(id: &str, save_name: Option<&str>, format: StructureFormat) -> PathBuf {
    PathBuf::from(format!("{}.{}", save_name.unwrap_or(id), format.extension()))
}

/// Downloads a structure from RCSB.
///
/// Network and write failures are logged and do not fail the command; only a malformed
/// identifier is an error.
pub fn run(args: FetchArgs) -> Result<()> {
    let id = parse_pdb_id(&args.id).map_err(|e| CliError::Argument(e.to_string()))?;
    let url = download_url(id, args.format);
    let path = output_path(id, args.save_name.as_deref(), args.format);

    info!("Sending request to {}", url);
    let body = match fetch(&url) {
        Ok(body) => body,
        Err(e) => {
            warn!("Download of {} failed: {}", url, e);
            return Ok(());
        }
    };

    match std::fs::write(&path, &body) {
        Ok(()) => {
            info!("Saved {} bytes to {:?}", body.len(), &path);
            println!("✓ Structure saved to: {}", path.display());
        }
        Err(e) => warn!("Could not save {:?}: {}", &path, e),
    }
    Ok(())
}

fn fetch(url: &str) -> reqwest::Result<Vec<u8>> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_follows_rcsb_view_layout() {
        assert_eq!(
            download_url("1ubq", StructureFormat::Cif),
            "https://files.rcsb.org/view/1ubq.cif"
        );
        assert_eq!(
            download_url("4HHB", StructureFormat::Pdb),
            "https://files.rcsb.org/view/4HHB.pdb"
        );
    }

    #[test]
    fn save_name_replaces_identifier_but_keeps_extension() {
        assert_eq!(
            output_path("1ubq", None, StructureFormat::Cif),
            PathBuf::from("1ubq.cif")
        );
        assert_eq!(
            output_path("1ubq", Some("ubiquitin"), StructureFormat::Pdb),
            PathBuf::from("ubiquitin.pdb")
        );
    }

    #[test]
    fn malformed_identifier_is_an_argument_error() {
        let args = FetchArgs {
            id: "not-an-id".to_string(),
            format: StructureFormat::Cif,
            save_name: None,
        };
        assert!(matches!(run(args), Err(CliError::Argument(_))));
    }
}
