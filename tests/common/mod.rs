#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use survey_geocode::app::ports::{ClockPort, DatasetOutputPort, HttpClientPort, HttpGetResult};
use survey_geocode::error::Result;
use survey_geocode::types::OutputDataset;

/// Clock whose time only moves when something sleeps on it.
#[derive(Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
    pub sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn recorded_sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClockPort for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        *self.now.lock().unwrap() += duration;
    }
}

/// Replies by the `q` parameter; unknown queries get an empty result list.
#[derive(Default)]
pub struct MockGeocoder {
    replies: HashMap<String, String>,
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl MockGeocoder {
    pub fn reply(mut self, query: &str, body: &str) -> Self {
        self.replies.insert(query.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl HttpClientPort for MockGeocoder {
    async fn get(&self, url: &str) -> std::result::Result<HttpGetResult, String> {
        let parsed = reqwest::Url::parse(url).map_err(|e| e.to_string())?;
        let query = parsed
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        self.queries.lock().unwrap().push(query.clone());
        let body = self.replies.get(&query).cloned().unwrap_or_else(|| "[]".to_string());
        Ok(HttpGetResult {
            status: 200,
            bytes: body.into_bytes(),
        })
    }
}

pub fn california(lat: f64, lon: f64) -> String {
    format!(
        r#"[{{"lat": "{}", "lon": "{}", "address": {{"state": "California", "county": "Los Angeles County"}}}}]"#,
        lat, lon
    )
}

#[derive(Default)]
pub struct MemoryOutput {
    pub written: Arc<Mutex<Vec<OutputDataset>>>,
}

#[async_trait]
impl DatasetOutputPort for MemoryOutput {
    async fn write_dataset(&self, dataset: &OutputDataset) -> Result<()> {
        self.written.lock().unwrap().push(dataset.clone());
        Ok(())
    }
}
