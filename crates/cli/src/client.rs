//! Thin HTTP client for the ResQ REST API.

use anyhow::{anyhow, Context, Result};
use api_shared::{
    AdmissionReq, CandidatesRes, CensusRes, ErrorRes, Mission, MissionSnapshotRes, Patient,
    TriageReq, TriageRes, Vitals,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct ResqClient {
    base: String,
    http: reqwest::Client,
}

impl ResqClient {
    pub fn new(server: &str) -> Self {
        Self {
            base: server.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("could not reach ResQ server at {}", self.base))?;
        decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: Option<&B>) -> Result<T> {
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("could not reach ResQ server at {}", self.base))?;
        decode(response).await
    }

    pub async fn mission(&self) -> Result<MissionSnapshotRes> {
        self.get("/mission").await
    }

    pub async fn census(&self) -> Result<CensusRes> {
        self.get("/hospitals").await
    }

    pub async fn lookup(&self, patient_id: &str) -> Result<Patient> {
        self.get(&format!("/patients/{}", patient_id.trim())).await
    }

    pub async fn triage(&self, req: &TriageReq) -> Result<TriageRes> {
        self.post("/ems/triage", Some(req)).await
    }

    pub async fn candidates(&self) -> Result<CandidatesRes> {
        self.get("/ems/candidates").await
    }

    pub async fn request_admission(&self, hospital: &str) -> Result<Mission> {
        let req = AdmissionReq {
            hospital: hospital.to_string(),
        };
        self.post("/ems/admission", Some(&req)).await
    }

    pub async fn acknowledge(&self) -> Result<Mission> {
        self.post::<(), _>("/ems/diversion/acknowledge", None).await
    }

    pub async fn authorize(&self) -> Result<Mission> {
        self.post::<(), _>("/command/authorize", None).await
    }

    pub async fn divert(&self) -> Result<Mission> {
        self.post::<(), _>("/command/divert", None).await
    }

    pub async fn vitals(&self, vitals: &Vitals) -> Result<Mission> {
        self.post("/mission/vitals", Some(vitals)).await
    }

    pub async fn handover(&self) -> Result<Mission> {
        self.post::<(), _>("/mission/handover", None).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.context("unexpected response body");
    }
    match response.json::<ErrorRes>().await {
        Ok(err) => Err(anyhow!("{} ({}): {}", status, err.error, err.message)),
        Err(_) => Err(anyhow!("server returned {status}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ResqClient::new("http://127.0.0.1:3000/");
        assert_eq!(client.url("/mission"), "http://127.0.0.1:3000/mission");
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_address() {
        let client = ResqClient::new("http://127.0.0.1:1");
        let err = client.mission().await.unwrap_err();
        assert!(err.to_string().contains("127.0.0.1:1"));
    }
}
