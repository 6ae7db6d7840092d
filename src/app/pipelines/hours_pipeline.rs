use crate::adapters::html;
use crate::app::pipelines::{
    csv_filename, current_timestamp, finish_csv, output_location, to_json,
};
use crate::core::{ConfigProvider, DiagnosticSink, PageSource, Pipeline, RangeFormatter, Storage};
use crate::domain::model::{HoursCategory, HoursReport, Weekday};
use crate::utils::error::{EtlError, Result};
use crate::utils::logger::TracingSink;

/// 設施營業時間：抓取 hours 頁面、正規化每一天的時段並輸出 JSON
pub struct HoursPipeline<S: Storage, F: PageSource, C: ConfigProvider> {
    storage: S,
    fetcher: F,
    config: C,
}

impl<S: Storage, F: PageSource, C: ConfigProvider> HoursPipeline<S, F, C> {
    pub fn new(storage: S, fetcher: F, config: C) -> Self {
        Self {
            storage,
            fetcher,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, F: PageSource, C: ConfigProvider> Pipeline for HoursPipeline<S, F, C> {
    type Raw = String;
    type Output = HoursReport;

    fn name(&self) -> &str {
        "hours"
    }

    async fn extract(&self) -> Result<String> {
        tracing::info!("🌐 Fetching hours page: {}", self.config.hours_url());
        self.fetcher.fetch_page(self.config.hours_url()).await
    }

    async fn transform(&self, html: String) -> Result<HoursReport> {
        let report = build_hours_report(&html, &TracingSink, current_timestamp())?;
        tracing::info!("🕒 Normalized hours for {} days", report.day_count());
        Ok(report)
    }

    async fn load(&self, report: HoursReport) -> Result<String> {
        let filename = self.config.hours_filename();
        let json = to_json(&report)?;
        self.storage.write_file(filename, &json).await?;

        if self.config.wants_format("csv") {
            let csv_name = csv_filename(filename);
            let csv = hours_csv(&report)?;
            self.storage.write_file(&csv_name, &csv).await?;
            tracing::debug!("Wrote {}", csv_name);
        }

        Ok(output_location(self.config.output_path(), filename))
    }
}

/// Builds the report from the raw hours page.
///
/// Every table row whose first cell is a weekday name contributes one entry
/// per category; a missing column yields empty hours for that day. Fails
/// only when no weekday row exists at all.
pub fn build_hours_report(
    page: &str,
    sink: &dyn DiagnosticSink,
    current_time: String,
) -> Result<HoursReport> {
    let formatter = RangeFormatter::new(sink);
    let mut report = HoursReport {
        current_time,
        ..Default::default()
    };

    for row in html::table_rows(page) {
        let Some(day) = row.first().and_then(|cell| Weekday::from_name(cell)) else {
            continue;
        };

        for category in HoursCategory::ALL {
            let hours = row
                .get(category.column())
                .map(|cell| formatter.format(cell))
                .unwrap_or_default();
            if hours.is_unknown() {
                tracing::debug!("No hours found for {} {}", day, category.label());
            }
            report.hours_mut(category).insert(day, hours);
        }
    }

    if report.day_count() == 0 {
        return Err(EtlError::ExtractionError {
            message: "no weekday rows found in the hours table".to_string(),
        });
    }

    report.updated_time = html::paragraphs(page)
        .into_iter()
        .find(|p| p.contains("Updated"));

    Ok(report)
}

/// One row per category and day: `category,day,hours`.
pub fn hours_csv(report: &HoursReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["category", "day", "hours"])?;

    for category in HoursCategory::ALL {
        for (day, hours) in report.hours(category) {
            let text = hours.to_string();
            writer.write_record([category.label(), day.name(), text.as_str()])?;
        }
    }

    finish_csv(writer)
}
