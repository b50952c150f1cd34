use super::Report;
use crate::utils::error::AppError;

pub const CONTENT_TYPE: &str = "text/csv; charset=utf-8";

pub fn to_csv(report: &impl Report) -> Result<Vec<u8>, AppError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());

    writer.write_record(report.headers()).map_err(csv_error)?;
    for row in report.rows() {
        writer.write_record(&row).map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(format!("CSV buffer: {}", e.error())))
}

fn csv_error(err: ::csv::Error) -> AppError {
    AppError::InternalServerError(format!("CSV export failed: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::tests::{event, profile};
    use crate::reports::EventReport;

    #[test]
    fn test_header_then_one_line_per_event() {
        let ann = profile("Ann");
        let mut tricky = event("Bake, Sale", Some(ann.id));
        tricky.description = "Bring \"cookies\"".to_string();
        let report = EventReport::build(&[tricky, event("Cleanup", None)], &[ann]);

        let text = String::from_utf8(to_csv(&report).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Event Name,Description,Location,Urgency"));
        assert!(lines[1].starts_with("\"Bake, Sale\",\"Bring \"\"cookies\"\"\",78701,High"));
        assert!(lines[2].ends_with(",Unassigned"));
    }
}
