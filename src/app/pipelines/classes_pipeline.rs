use crate::adapters::html::{self, ClassBlock};
use crate::app::pipelines::{
    csv_filename, current_timestamp, finish_csv, output_location, to_json,
};
use crate::core::{ConfigProvider, DiagnosticSink, PageSource, Pipeline, RangeFormatter, Storage};
use crate::domain::model::{ClassRecord, ClassReport};
use crate::utils::error::{EtlError, Result};
use crate::utils::logger::TracingSink;
use regex::Regex;
use std::sync::LazyLock;

const INSTRUCTOR_LABEL: &str = "Instructor:";
const LOCATION_LABEL: &str = "Location:";

static EM_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\x{2014}\s*").expect("em dash pattern"));

/// 團體課程：抓取課程頁面並拆解每堂課的時間、教練與地點
pub struct ClassesPipeline<S: Storage, F: PageSource, C: ConfigProvider> {
    storage: S,
    fetcher: F,
    config: C,
}

impl<S: Storage, F: PageSource, C: ConfigProvider> ClassesPipeline<S, F, C> {
    pub fn new(storage: S, fetcher: F, config: C) -> Self {
        Self {
            storage,
            fetcher,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, F: PageSource, C: ConfigProvider> Pipeline for ClassesPipeline<S, F, C> {
    type Raw = String;
    type Output = ClassReport;

    fn name(&self) -> &str {
        "classes"
    }

    async fn extract(&self) -> Result<String> {
        tracing::info!("🌐 Fetching classes page: {}", self.config.classes_url());
        self.fetcher.fetch_page(self.config.classes_url()).await
    }

    async fn transform(&self, html: String) -> Result<ClassReport> {
        let report = build_class_report(&html, &TracingSink, current_timestamp())?;
        tracing::info!("🏋️ Parsed {} group classes", report.classes.len());
        Ok(report)
    }

    async fn load(&self, report: ClassReport) -> Result<String> {
        let filename = self.config.classes_filename();
        let json = to_json(&report)?;
        self.storage.write_file(filename, &json).await?;

        if self.config.wants_format("csv") {
            let csv_name = csv_filename(filename);
            let csv = classes_csv(&report)?;
            self.storage.write_file(&csv_name, &csv).await?;
            tracing::debug!("Wrote {}", csv_name);
        }

        Ok(output_location(self.config.output_path(), filename))
    }
}

pub fn build_class_report(
    page: &str,
    sink: &dyn DiagnosticSink,
    current_time: String,
) -> Result<ClassReport> {
    let blocks = html::class_blocks(page).ok_or_else(|| EtlError::ExtractionError {
        message: "could not find the group classes container".to_string(),
    })?;

    let formatter = RangeFormatter::new(sink);
    let classes = blocks
        .iter()
        .map(|block| class_record(block, &formatter))
        .collect();

    Ok(ClassReport {
        classes,
        current_time,
    })
}

/// Splits a class listing into its fields.
///
/// The first `<strong>` holds `"Day, Time"` and sometimes runs on into the
/// instructor and location; the second and third hold the labelled
/// instructor and location. Whatever text is left over is the description.
pub fn class_record(block: &ClassBlock, formatter: &RangeFormatter<'_>) -> ClassRecord {
    let strong = |i: usize| block.strongs.get(i).map(String::as_str).unwrap_or("");

    let mut time_and_day = strong(0).to_string();
    let mut instructor = strong(1).replace("Instructor: ", "").trim().to_string();
    let mut location = strong(2).replace("Location: ", "").trim().to_string();

    if let Some((head, rest)) = time_and_day.split_once(INSTRUCTOR_LABEL) {
        instructor = rest.trim().to_string();
        time_and_day = head.to_string();
    }
    if let Some((head, rest)) = instructor.split_once(LOCATION_LABEL) {
        location = rest.trim().to_string();
        instructor = head.to_string();
    }

    let time_and_day = strip_em_dashes(&time_and_day);
    let instructor = strip_em_dashes(&instructor);
    let location = strip_em_dashes(&location);

    let mut description = block.text.clone();
    for value in [&time_and_day, &instructor, &location] {
        if !value.is_empty() {
            description = description.replace(value.as_str(), "");
        }
    }
    let description = description
        .replace(INSTRUCTOR_LABEL, "")
        .replace(LOCATION_LABEL, "");
    let description = html::normalize_ws(&strip_em_dashes(&description));

    let (day, time) = match time_and_day.split_once(',') {
        Some((day, time)) => (day.trim().to_string(), time.trim().to_string()),
        None => (time_and_day, String::new()),
    };
    let time_ranges = formatter.format(&time).ranges().to_vec();

    ClassRecord {
        class_name: block.name.clone(),
        day,
        time,
        instructor,
        location,
        description,
        time_ranges,
    }
}

fn strip_em_dashes(s: &str) -> String {
    EM_DASH.replace_all(s, "").trim().to_string()
}

pub fn classes_csv(report: &ClassReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "class_name",
        "day",
        "time",
        "instructor",
        "location",
        "description",
    ])?;

    for class in &report.classes {
        writer.write_record([
            &class.class_name,
            &class.day,
            &class.time,
            &class.instructor,
            &class.location,
            &class.description,
        ])?;
    }

    finish_csv(writer)
}
