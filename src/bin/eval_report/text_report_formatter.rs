use std::fmt::Write;

use ocr_eval::AggregateReport;

pub fn render_report(report: &AggregateReport, top_n: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Evaluation result");
    let _ = writeln!(out, "=================");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Got mean normalized label error rate of {:.2}% ({} errs, {} total chars, {} sync errs)",
        report.avg_label_error_rate * 100.0,
        report.total_char_errors,
        report.total_chars,
        report.total_sync_errors
    );

    if !report.skipped_pairs.is_empty() {
        let _ = writeln!(
            out,
            "Skipped {} of {} pairs with empty ground truth",
            report.skipped_pairs.len(),
            report.input_count()
        );
    }

    if top_n == 0 || report.confusion.is_empty() {
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<8} {:<8} {:<8} {:<10}", "GT", "PRED", "COUNT", "PERCENT");

    let mut shown_share = 0.0;
    for entry in report.top_confusions(top_n) {
        let share = report.confusion_share(&entry);
        shown_share += share;
        let _ = writeln!(
            out,
            "{:<8} {:<8} {:<8} {:>9.2}%",
            format!("{{{}}}", entry.ground_truth),
            format!("{{{}}}", entry.prediction),
            entry.count,
            share * 100.0
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "The remaining but hidden errors make up {:.2}%",
        ((1.0 - shown_share) * 100.0).max(0.0)
    );
    out
}
