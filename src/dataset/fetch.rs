/// Dataset download for `launchdash fetch`.
///
/// Downloads the launch CSV over HTTP with the synchronous `ureq` client,
/// checks that it parses as a [`Dataset`], and only then writes it to disk so
/// a bad download never replaces a good local copy.
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use super::Dataset;

/// Download timeout for the dataset request.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a successful download.
#[derive(Debug, Clone)]
pub struct FetchSummary {
    pub bytes: usize,
    pub records: usize,
    pub sites: usize,
}

/// Download the dataset at `url` and write it to `output`.
pub fn fetch_dataset(url: &str, output: &Path) -> Result<FetchSummary> {
    let resp = ureq::get(url)
        .timeout(FETCH_TIMEOUT)
        .call()
        .with_context(|| format!("failed to download dataset from {url}"))?;

    let mut body = Vec::new();
    resp.into_reader()
        .read_to_end(&mut body)
        .context("failed to read dataset response body")?;

    let summary = validate(&body)?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(output, &body)
        .with_context(|| format!("failed to write dataset to {}", output.display()))?;

    Ok(summary)
}

/// Parse downloaded bytes as a dataset and summarize them.
fn validate(body: &[u8]) -> Result<FetchSummary> {
    let dataset = Dataset::from_reader(body).context("downloaded file is not a valid dataset")?;
    Ok(FetchSummary {
        bytes: body.len(),
        records: dataset.len(),
        sites: dataset.sites().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_launch_csv() {
        let body = b"Launch Site,Payload Mass (kg),class,Booster Version Category\n\
                     KSC LC-39A,2490,1,FT\n\
                     VAFB SLC-4E,500,0,v1.1\n";
        let summary = validate(body).unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.sites, 2);
        assert_eq!(summary.bytes, body.len());
    }

    #[test]
    fn validate_rejects_html_error_page() {
        let body = b"<html><body>Not Found</body></html>";
        assert!(validate(body).is_err());
    }
}
