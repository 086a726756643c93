use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};
use ureq::Agent;

use crate::config::{resolve_token, ApiSettings};
use crate::error::{BillsError, Result};
use crate::model::{parse_payload, Invoice};

/// Where the bills list comes from
#[derive(Debug, Clone)]
pub enum BillSource {
    /// The accounting backend's invoices endpoint
    Http {
        base_url: String,
        company_id: String,
        token: String,
        timeout_secs: u64,
    },
    /// A saved copy of the endpoint's response
    File(PathBuf),
}

impl BillSource {
    /// Build the HTTP source from config, requiring a company id and token
    pub fn from_api(api: &ApiSettings) -> Result<Self> {
        let company_id = api
            .company_id
            .clone()
            .filter(|c| !c.trim().is_empty())
            .ok_or(BillsError::MissingCredentials("api.company_id"))?;
        let token = resolve_token(api).ok_or(BillsError::MissingCredentials("API token"))?;

        Ok(BillSource::Http {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            company_id,
            token,
            timeout_secs: api.timeout_secs,
        })
    }
}

/// Load and normalize the bills list
pub fn load_bills(source: &BillSource) -> Result<Vec<Invoice>> {
    let body = match source {
        BillSource::Http {
            base_url,
            company_id,
            token,
            timeout_secs,
        } => fetch_invoices(base_url, company_id, token, *timeout_secs)?,
        BillSource::File(path) => {
            debug!(path = %path.display(), "reading bills from file");
            std::fs::read_to_string(path)?
        }
    };

    let bills = parse_payload(&body)?;
    info!(count = bills.len(), "loaded bills");
    Ok(bills)
}

fn fetch_invoices(base_url: &str, company_id: &str, token: &str, timeout_secs: u64) -> Result<String> {
    let url = format!("{}/invoices/", base_url);

    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .build()
        .into();

    debug!(%url, company_id, "fetching bills");
    let mut response = match agent
        .get(&url)
        .query("company", company_id)
        .header("Authorization", &format!("Bearer {}", token))
        .call()
    {
        Ok(response) => response,
        Err(ureq::Error::StatusCode(status)) => return Err(BillsError::Http { url, status }),
        Err(e) => return Err(BillsError::Fetch(e.to_string())),
    };

    response
        .body_mut()
        .read_to_string()
        .map_err(|e| BillsError::Fetch(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_source_requires_company() {
        let api = ApiSettings {
            token: Some("secret".to_string()),
            ..ApiSettings::default()
        };
        assert!(matches!(
            BillSource::from_api(&api),
            Err(BillsError::MissingCredentials("api.company_id"))
        ));
    }

    #[test]
    fn api_source_trims_trailing_slash() {
        let api = ApiSettings {
            base_url: "https://books.example.com/api/".to_string(),
            company_id: Some("7".to_string()),
            token: Some("secret".to_string()),
            timeout_secs: 5,
        };
        match BillSource::from_api(&api).unwrap() {
            BillSource::Http { base_url, company_id, .. } => {
                assert_eq!(base_url, "https://books.example.com/api");
                assert_eq!(company_id, "7");
            }
            other => panic!("unexpected source {:?}", other),
        }
    }
}
