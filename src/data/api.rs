//! Client for the emergency transport statistics API.
//!
//! The endpoint returns the whole table in one response:
//!
//! ```json
//! [{"year": 2015, "Dispatch_Transport": "Dispatch", "Type": "Traffic_accident", "Number": 5012}, ...]
//! ```

use log::info;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::Settings;
use crate::data::cache::DatasetSource;
use crate::domain::{Dataset, Record};
use crate::error::DataError;

pub struct ApiClient {
    client: Client,
    url: String,
}

impl ApiClient {
    /// Client without a request timeout; a slow API blocks the caller.
    pub fn new(url: impl Into<String>) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| DataError::Network(e.to_string()))?;
        Ok(Self { client, url: url.into() })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, DataError> {
        Self::new(settings.api_url.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One GET, no retry. The body must be a JSON array of records.
    pub fn fetch(&self) -> Result<Dataset, DataError> {
        info!("fetching emergency transport data from {}", self.url);

        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| DataError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DataError::Status(resp.status().as_u16()));
        }

        let body = resp.text().map_err(|e| DataError::Network(e.to_string()))?;
        let dataset = parse_records(&body)?;

        info!("fetched {} records", dataset.len());
        Ok(dataset)
    }
}

impl DatasetSource for ApiClient {
    fn load(&self) -> Result<Dataset, DataError> {
        self.fetch()
    }

    fn location(&self) -> &str {
        self.url()
    }
}

#[derive(Debug, Deserialize)]
struct WireRecord {
    year: i32,
    #[serde(rename = "Type")]
    category: String,
    #[serde(rename = "Dispatch_Transport")]
    mode: String,
    #[serde(rename = "Number", default)]
    count: Option<f64>,
}

/// Decode an API response body into a dataset, keeping row order.
pub fn parse_records(body: &str) -> Result<Dataset, DataError> {
    let rows: Vec<WireRecord> = serde_json::from_str(body).map_err(|e| DataError::Parse(e.to_string()))?;

    let records = rows
        .into_iter()
        .map(|r| Record::new(r.year, r.category, r.mode, r.count))
        .collect();

    Ok(Dataset::new(records))
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Answer exactly one request on a loopback port with a canned response.
    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/emergencytransports/")
    }

    fn ok_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn fetch_decodes_a_successful_response() {
        let url = serve_once(ok_response(
            r#"[{"year": 2015, "Dispatch_Transport": "Dispatch", "Type": "Other", "Number": 7}]"#,
        ));
        let dataset = ApiClient::new(url).unwrap().fetch().unwrap();
        assert_eq!(dataset.records, vec![Record::new(2015, "Other", "Dispatch", Some(7.0))]);
    }

    #[test]
    fn server_error_status_is_reported() {
        let url = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
        );
        let err = ApiClient::new(url).unwrap().fetch().unwrap_err();
        assert_eq!(err, DataError::Status(500));
    }

    #[test]
    fn non_array_body_is_a_parse_error() {
        let url = serve_once(ok_response("{}"));
        match ApiClient::new(url).unwrap().fetch() {
            Err(DataError::Parse(_)) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn unreachable_host_is_a_network_error() {
        // Bind then drop so the port is known to be closed.
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let client = ApiClient::new(format!("http://{addr}/emergencytransports/")).unwrap();
        match client.fetch() {
            Err(DataError::Network(_)) => {}
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[test]
    fn parses_array_of_records() {
        let body = r#"[
            {"year": 2015, "Dispatch_Transport": "Dispatch", "Type": "Traffic_accident", "Number": 100},
            {"year": 2016, "Dispatch_Transport": "Transport", "Type": "Other", "Number": 12.5}
        ]"#;
        let dataset = parse_records(body).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[0], Record::new(2015, "Traffic_accident", "Dispatch", Some(100.0)));
        assert_eq!(dataset.records[1].mode, "Transport");
        assert_eq!(dataset.records[1].count, Some(12.5));
        assert_eq!(dataset.columns.category, "Type");
    }

    #[test]
    fn null_or_missing_number_is_absent() {
        let body = r#"[
            {"year": 2015, "Dispatch_Transport": "Dispatch", "Type": "Perpetrator", "Number": null},
            {"year": 2016, "Dispatch_Transport": "Dispatch", "Type": "Perpetrator"}
        ]"#;
        let dataset = parse_records(body).unwrap();
        assert_eq!(dataset.records[0].count, None);
        assert_eq!(dataset.records[1].count, None);
    }

    #[test]
    fn unknown_fields_and_values_pass_through() {
        let body = r#"[{"year": 2020, "Dispatch_Transport": "Rescue", "Type": "Fire", "Number": 3, "id": 9}]"#;
        let dataset = parse_records(body).unwrap();
        assert_eq!(dataset.records[0].category, "Fire");
        assert_eq!(dataset.records[0].mode, "Rescue");
    }

    #[test]
    fn empty_array_is_an_empty_dataset() {
        assert!(parse_records("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_bodies_are_parse_errors() {
        for body in [
            "not json",
            r#"{"year": 2015}"#,
            r#"[1, 2, 3]"#,
            r#"[{"year": "2015", "Dispatch_Transport": "Dispatch", "Type": "Other", "Number": 1}]"#,
            r#"[{"Dispatch_Transport": "Dispatch", "Type": "Other", "Number": 1}]"#,
        ] {
            match parse_records(body) {
                Err(DataError::Parse(_)) => {}
                other => panic!("expected parse error for {body}, got {other:?}"),
            }
        }
    }

    #[test]
    fn client_keeps_configured_url() {
        let settings = Settings {
            api_url: "http://127.0.0.1:9/emergencytransports/".to_string(),
            ..Settings::default()
        };
        let client = ApiClient::from_settings(&settings).unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:9/emergencytransports/");
        assert_eq!(client.location(), client.url());
    }
}
