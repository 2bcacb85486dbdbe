use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::app::geocode_use_case::GeocodeUseCase;
use crate::app::ports::{ClockPort, DatasetOutputPort};
use crate::error::Result;
use crate::types::{DatasetMetadata, OutputDataset, SurveyRow};

/// Drives one batch run: geocodes every survey row in order, then writes the
/// dataset once.
pub struct SurveyGeocodeUseCase {
    geocoder: GeocodeUseCase,
    clock: Arc<dyn ClockPort>,
    output: Box<dyn DatasetOutputPort>,
    row_delay: Duration,
}

impl SurveyGeocodeUseCase {
    pub fn new(
        geocoder: GeocodeUseCase,
        clock: Arc<dyn ClockPort>,
        output: Box<dyn DatasetOutputPort>,
        row_delay: Duration,
    ) -> Self {
        Self {
            geocoder,
            clock,
            output,
            row_delay,
        }
    }

    pub async fn run(&self, rows: &[SurveyRow]) -> Result<OutputDataset> {
        let total = rows.len();
        info!("Found {} organizations", total);

        let mut organizations = Vec::new();
        let mut failed = 0usize;

        for (i, row) in rows.iter().enumerate() {
            let name = row.organization_name();
            info!("Processing {}/{}: {}", i + 1, total, name);

            match self.geocoder.resolve(row.street(), row.zip_code(), name).await {
                Ok(resolution) => organizations.push(row.to_record(i, resolution.coordinate)),
                Err(e) => {
                    failed += 1;
                    info!("Failed to geocode: {} ({})", name, e);
                }
            }

            // Rows are paced evenly, including table hits and skipped rows.
            if i + 1 < total {
                self.clock.sleep(self.row_delay).await;
            }
        }

        let metadata = DatasetMetadata::summarize(total, &organizations, Utc::now());
        info!(
            "Geocoded {} of {} organizations ({} failed)",
            metadata.geocoded_organizations, total, failed
        );

        let dataset = OutputDataset {
            organizations,
            metadata,
        };
        self.output.write_dataset(&dataset).await?;
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::geocode_use_case::GeocoderSettings;
    use crate::app::ports::{HttpClientPort, HttpGetResult, RateLimiterPort};
    use crate::config::GeocoderConfig;
    use crate::error::PipelineError;
    use crate::fallback::FallbackTable;
    use crate::types::Coordinate;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers with a California match when the query contains "Real".
    struct KeywordHttp;

    #[async_trait]
    impl HttpClientPort for KeywordHttp {
        async fn get(&self, url: &str) -> std::result::Result<HttpGetResult, String> {
            let body = if url.contains("Real") {
                r#"[{"lat": "34.0", "lon": "-118.0", "address": {"state": "California"}}]"#
            } else {
                "[]"
            };
            Ok(HttpGetResult {
                status: 200,
                bytes: body.as_bytes().to_vec(),
            })
        }
    }

    struct NoLimit;

    #[async_trait]
    impl RateLimiterPort for NoLimit {
        async fn acquire(&self) {}
    }

    #[derive(Default)]
    struct RecordingClock {
        sleeps: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl ClockPort for RecordingClock {
        fn now(&self) -> Duration {
            self.sleeps.lock().unwrap().iter().sum()
        }

        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    struct MemoryOutput {
        written: Arc<Mutex<Vec<OutputDataset>>>,
        fail: bool,
    }

    #[async_trait]
    impl DatasetOutputPort for MemoryOutput {
        async fn write_dataset(&self, dataset: &OutputDataset) -> Result<()> {
            if self.fail {
                return Err(PipelineError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            self.written.lock().unwrap().push(dataset.clone());
            Ok(())
        }
    }

    fn row(name: &str, street: &str, zip: &str, sector: &str) -> SurveyRow {
        SurveyRow {
            organization_name: Some(name.to_string()),
            street: Some(street.to_string()),
            zip_code: Some(zip.to_string()),
            sector: Some(sector.to_string()),
            ..Default::default()
        }
    }

    fn use_case(
        clock: Arc<RecordingClock>,
        written: Arc<Mutex<Vec<OutputDataset>>>,
        fail: bool,
    ) -> SurveyGeocodeUseCase {
        let table = FallbackTable::from_entries([(
            "9 Table Pl, Los Angeles, CA, 90012",
            Coordinate::new(34.3, -118.3),
        )]);
        let geocoder = GeocodeUseCase::new(
            Box::new(KeywordHttp),
            Box::new(NoLimit),
            table,
            GeocoderSettings::from(&GeocoderConfig::default()),
        );
        SurveyGeocodeUseCase::new(
            geocoder,
            clock,
            Box::new(MemoryOutput { written, fail }),
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn aggregates_successes_and_failures() {
        let clock = Arc::new(RecordingClock::default());
        let written = Arc::new(Mutex::new(Vec::new()));
        let rows = vec![
            row("Alpha", "1 Real St", "90001", "Nonprofit"),
            row("Beta", "2 Fake St", "90001", "Business"),
            row("Gamma", "9 Table Pl", "90012", "Government"),
            row("Delta", "", "90001", "Business"),
            row("Epsilon", "3 Real Ave, Suite 7", "90002", "Nonprofit"),
            row("Zeta", "4 Real Blvd", "", "Farm"),
        ];

        let dataset = use_case(clock.clone(), written.clone(), false)
            .run(&rows)
            .await
            .unwrap();

        let ids: Vec<&str> = dataset.organizations.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["org-0", "org-2", "org-4"]);
        assert_eq!(dataset.metadata.total_organizations, 6);
        assert_eq!(dataset.metadata.geocoded_organizations, 3);
        assert_eq!(dataset.metadata.failed_geocode, 3);
        assert_eq!(dataset.metadata.success_rate, 50.0);
        assert_eq!(dataset.metadata.sectors, vec!["Nonprofit", "Government"]);
        assert_eq!(dataset.metadata.districts, vec!["Unknown"]);
        assert_eq!(dataset.organizations[2].address, "3 Real Ave, Suite 7");
        assert!(dataset
            .organizations
            .iter()
            .all(|o| o.coordinates.is_valid()));

        assert_eq!(written.lock().unwrap().len(), 1);
        // One pause between each pair of rows, none after the last
        assert_eq!(clock.sleeps.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn empty_survey_writes_empty_dataset() {
        let clock = Arc::new(RecordingClock::default());
        let written = Arc::new(Mutex::new(Vec::new()));
        let dataset = use_case(clock.clone(), written.clone(), false)
            .run(&[])
            .await
            .unwrap();
        assert!(dataset.organizations.is_empty());
        assert_eq!(dataset.metadata.success_rate, 0.0);
        assert!(clock.sleeps.lock().unwrap().is_empty());
        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn output_failure_is_fatal() {
        let clock = Arc::new(RecordingClock::default());
        let written = Arc::new(Mutex::new(Vec::new()));
        let rows = vec![row("Alpha", "1 Real St", "90001", "Nonprofit")];
        let result = use_case(clock, written.clone(), true).run(&rows).await;
        assert!(matches!(result, Err(PipelineError::Io(_))));
        assert!(written.lock().unwrap().is_empty());
    }
}
