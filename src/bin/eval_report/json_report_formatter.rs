use ocr_eval::AggregateReport;
use serde::Serialize;

const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub ground_truth_files: usize,
    pub prediction_files: usize,
    pub workers: usize,
    pub normalize_text: bool,
    pub skip_empty_ground_truth: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    schema_version: u32,
    meta: &'a Meta,
    report: &'a AggregateReport,
}

pub fn render_report(meta: &Meta, report: &AggregateReport) -> Result<String, String> {
    let wrapped = JsonReport {
        schema_version: SCHEMA_VERSION,
        meta,
        report,
    };
    let mut rendered = serde_json::to_string_pretty(&wrapped)
        .map_err(|err| format!("Failed to serialize report JSON: {err}"))?;
    rendered.push('\n');
    Ok(rendered)
}
