use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::ensembl::orthologs::Homology;

/// Public Ensembl REST server
pub const DEFAULT_SERVER: &str = "https://rest.ensembl.org";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Cannot decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The Ensembl queries the fetch stage needs. `Ok(None)` means the server has
/// no such entry.
pub trait EnsemblApi {
    /// # Errors
    ///
    /// Returns a `FetchError` if the request fails or the response cannot be decoded.
    fn gene_symbol(&self, gene_id: &str) -> Result<Option<String>, FetchError>;

    /// Orthologs of a human gene, unfiltered
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if the request fails or the response cannot be decoded.
    fn orthologues(&self, gene_id: &str) -> Result<Vec<Homology>, FetchError>;

    /// # Errors
    ///
    /// Returns a `FetchError` if the request fails or the response cannot be decoded.
    fn parent_transcript(&self, protein_id: &str) -> Result<Option<String>, FetchError>;

    /// # Errors
    ///
    /// Returns a `FetchError` if the request fails or the response cannot be decoded.
    fn cds_sequence(&self, transcript_id: &str) -> Result<Option<String>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HomologyResponse {
    #[serde(default)]
    data: Vec<HomologyEntry>,
}

#[derive(Debug, Deserialize)]
struct HomologyEntry {
    #[serde(default)]
    homologies: Vec<Homology>,
}

impl HomologyResponse {
    /// Homologies of the first (queried) gene
    fn into_homologies(self) -> Vec<Homology> {
        self.data
            .into_iter()
            .next()
            .map(|entry| entry.homologies)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct OverlapFeature {
    #[serde(rename = "Parent")]
    parent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SequenceResponse {
    seq: Option<String>,
}

/// Blocking client for the Ensembl REST API
pub struct EnsemblClient {
    server: String,
    client: reqwest::blocking::Client,
}

impl EnsemblClient {
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be initialized.
    pub fn new(server: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ortho-pipeline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FetchError::Http {
                url: server.to_string(),
                source,
            })?;

        Ok(Self {
            server: server.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<T>, FetchError> {
        let url = format!("{}{endpoint}", self.server);
        debug!("GET {url}");

        let http_error = |source| FetchError::Http {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .map_err(http_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(http_error)?;
        decode(&url, &body).map(Some)
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}

impl EnsemblApi for EnsemblClient {
    fn gene_symbol(&self, gene_id: &str) -> Result<Option<String>, FetchError> {
        let lookup: Option<LookupResponse> = self.get_json(&format!("/lookup/id/{gene_id}"))?;
        Ok(lookup.and_then(|l| l.display_name))
    }

    fn orthologues(&self, gene_id: &str) -> Result<Vec<Homology>, FetchError> {
        let response: Option<HomologyResponse> = self.get_json(&format!(
            "/homology/id/human/{gene_id}?type=orthologues;format=condensed"
        ))?;
        Ok(response.map(HomologyResponse::into_homologies).unwrap_or_default())
    }

    fn parent_transcript(&self, protein_id: &str) -> Result<Option<String>, FetchError> {
        let features: Option<Vec<OverlapFeature>> =
            self.get_json(&format!("/overlap/translation/{protein_id}"))?;
        Ok(features
            .and_then(|f| f.into_iter().next())
            .and_then(|f| f.parent))
    }

    fn cds_sequence(&self, transcript_id: &str) -> Result<Option<String>, FetchError> {
        let response: Option<SequenceResponse> =
            self.get_json(&format!("/sequence/id/{transcript_id}?type=cds"))?;
        Ok(response.and_then(|r| r.seq))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory Ensembl for exercising the fetch stage offline.

    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    use super::{EnsemblApi, FetchError, Homology};

    #[derive(Default)]
    pub struct FakeEnsembl {
        pub symbols: HashMap<String, String>,
        pub orthologues: HashMap<String, Vec<Homology>>,
        pub transcripts: HashMap<String, String>,
        pub cds: HashMap<String, String>,
        /// IDs whose requests fail with HTTP 500
        pub failing: HashSet<String>,
        pub requests: RefCell<Vec<String>>,
    }

    impl FakeEnsembl {
        fn answer<T>(&self, id: &str, value: Option<T>) -> Result<Option<T>, FetchError> {
            self.requests.borrow_mut().push(id.to_string());
            if self.failing.contains(id) {
                return Err(FetchError::Status {
                    url: format!("fake://{id}"),
                    status: 500,
                });
            }
            Ok(value)
        }
    }

    impl EnsemblApi for FakeEnsembl {
        fn gene_symbol(&self, gene_id: &str) -> Result<Option<String>, FetchError> {
            self.answer(gene_id, self.symbols.get(gene_id).cloned())
        }

        fn orthologues(&self, gene_id: &str) -> Result<Vec<Homology>, FetchError> {
            Ok(self
                .answer(gene_id, self.orthologues.get(gene_id).cloned())?
                .unwrap_or_default())
        }

        fn parent_transcript(&self, protein_id: &str) -> Result<Option<String>, FetchError> {
            self.answer(protein_id, self.transcripts.get(protein_id).cloned())
        }

        fn cds_sequence(&self, transcript_id: &str) -> Result<Option<String>, FetchError> {
            self.answer(transcript_id, self.cds.get(transcript_id).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONDENSED: &str = r#"{
        "data": [{
            "id": "ENSG00000106077",
            "homologies": [
                {"type": "ortholog_one2one", "species": "danio_rerio", "id": "ENSDARG00000001",
                 "protein_id": "ENSDARP00000001", "taxonomy_level": "Euteleostomi",
                 "method_link_type": "ENSEMBL_ORTHOLOGUES"},
                {"type": "ortholog_one2one", "species": "mus_musculus", "id": "ENSMUSG00000001",
                 "protein_id": "ENSMUSP00000001", "taxonomy_level": "Euarchontoglires"}
            ]
        }]
    }"#;

    #[test]
    fn test_decode_condensed_homologies() {
        let response: HomologyResponse = decode("u", CONDENSED).unwrap();
        let homologies = response.into_homologies();
        assert_eq!(homologies.len(), 2);
        assert_eq!(homologies[0].species.as_deref(), Some("danio_rerio"));
        assert_eq!(homologies[0].homology_type.as_deref(), Some("ortholog_one2one"));
        assert_eq!(homologies[0].taxonomy_level.as_deref(), Some("Euteleostomi"));
        assert_eq!(homologies[1].protein_id.as_deref(), Some("ENSMUSP00000001"));
    }

    #[test]
    fn test_decode_empty_homology_data() {
        let response: HomologyResponse = decode("u", r#"{"data": []}"#).unwrap();
        assert!(response.into_homologies().is_empty());

        let response: HomologyResponse = decode("u", "{}").unwrap();
        assert!(response.into_homologies().is_empty());
    }

    #[test]
    fn test_decode_lookup_and_sequence() {
        let lookup: LookupResponse =
            decode("u", r#"{"display_name": "ABHD11", "biotype": "protein_coding"}"#).unwrap();
        assert_eq!(lookup.display_name.as_deref(), Some("ABHD11"));

        let seq: SequenceResponse = decode("u", r#"{"id": "T1", "seq": "ATGCCC"}"#).unwrap();
        assert_eq!(seq.seq.as_deref(), Some("ATGCCC"));
    }

    #[test]
    fn test_decode_overlap_parent() {
        let features: Vec<OverlapFeature> =
            decode("u", r#"[{"Parent": "ENSDART1", "feature_type": "translation"}, {"Parent": "X"}]"#)
                .unwrap();
        assert_eq!(features[0].parent.as_deref(), Some("ENSDART1"));
    }

    #[test]
    fn test_decode_error_names_url() {
        let err = decode::<LookupResponse>("https://rest.ensembl.org/lookup/id/X", "<html>")
            .unwrap_err();
        assert!(err.to_string().contains("/lookup/id/X"));
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = EnsemblClient::new("https://rest.ensembl.org/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.server, "https://rest.ensembl.org");
    }
}
