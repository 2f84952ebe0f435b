use analysis_core::{
    AnalysisError, CompanyFacts, CompanyFactsProvider, OptionChain, OptionsProvider, QuoteProvider, QuoteSummary,
};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

const SEC_FACTS_URL: &str = "https://data.sec.gov/api/xbrl/companyfacts";

/// Serves a previously saved payload from disk, whatever symbol is asked for.
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<String, AnalysisError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AnalysisError::NotFound(self.path.display().to_string()),
            _ => AnalysisError::Unknown(format!("{}: {}", self.path.display(), e)),
        })
    }
}

#[async_trait]
impl CompanyFactsProvider for JsonFileProvider {
    async fn company_facts(&self, _cik: &str) -> Result<CompanyFacts, AnalysisError> {
        CompanyFacts::from_json(&self.read().await?)
    }
}

#[async_trait]
impl QuoteProvider for JsonFileProvider {
    async fn quote_summary(&self, _symbol: &str) -> Result<QuoteSummary, AnalysisError> {
        QuoteSummary::from_json(&self.read().await?)
    }
}

#[async_trait]
impl OptionsProvider for JsonFileProvider {
    async fn option_chain(&self, _symbol: &str) -> Result<OptionChain, AnalysisError> {
        OptionChain::from_json(&self.read().await?)
    }
}

/// Zero-padded ten digit form used in SEC URLs.
pub fn padded_cik(cik: &str) -> Result<String, AnalysisError> {
    let digits = cik.trim().trim_start_matches("CIK");
    if digits.is_empty() || digits.len() > 10 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AnalysisError::InvalidData(format!("not a CIK: {:?}", cik)));
    }
    Ok(format!("{:0>10}", digits))
}

/// Client for the SEC XBRL company-facts endpoint.
pub struct SecCompanyFactsClient {
    client: Client,
    base_url: String,
}

impl SecCompanyFactsClient {
    pub fn new(user_agent: &str) -> Self {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: SEC_FACTS_URL.to_string(),
        }
    }

    pub fn facts_url(&self, cik: &str) -> Result<String, AnalysisError> {
        Ok(format!("{}/CIK{}.json", self.base_url, padded_cik(cik)?))
    }
}

#[async_trait]
impl CompanyFactsProvider for SecCompanyFactsClient {
    async fn company_facts(&self, cik: &str) -> Result<CompanyFacts, AnalysisError> {
        let url = self.facts_url(cik)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(AnalysisError::NotFound(format!("company facts for CIK {}", cik)));
        }
        if !response.status().is_success() {
            return Err(AnalysisError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;
        CompanyFacts::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_cik() {
        assert_eq!(padded_cik("320193").unwrap(), "0000320193");
        assert_eq!(padded_cik("CIK0000320193").unwrap(), "0000320193");
        assert!(padded_cik("AAPL").is_err());
        assert!(padded_cik("").is_err());
    }

    #[test]
    fn test_facts_url() {
        let client = SecCompanyFactsClient::new("test agent test@example.com");
        assert_eq!(
            client.facts_url("789019").unwrap(),
            "https://data.sec.gov/api/xbrl/companyfacts/CIK0000789019.json"
        );
    }

    #[tokio::test]
    async fn test_file_provider() {
        let path = std::env::temp_dir().join(format!("report-cli-chain-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{ "expirations": [ { "calls": [ { "strike": 100, "openInterest": 5 } ] } ] }"#)
            .await
            .unwrap();

        let provider = JsonFileProvider::new(&path);
        let chain = provider.option_chain("ABC").await.unwrap();
        assert_eq!(chain.nearest().unwrap().calls[0].oi(), 5);

        tokio::fs::remove_file(&path).await.unwrap();
        let missing = provider.option_chain("ABC").await;
        assert!(matches!(missing, Err(AnalysisError::NotFound(_))));
    }
}
