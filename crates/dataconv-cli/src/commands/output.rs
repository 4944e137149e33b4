//! Record export formats.

use serde::Serialize;

use dataconv_core::OutputRecord;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON array of records
    Json,
    /// CSV with spreadsheet column headers
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// A record together with the document it came from.
#[derive(Debug, Clone, Serialize)]
pub struct NamedRecord {
    pub file: String,
    #[serde(flatten)]
    pub record: OutputRecord,
}

pub fn format_records(records: &[NamedRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_csv(records: &[NamedRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["File"];
    header.extend(OutputRecord::HEADERS);
    wtr.write_record(&header)?;

    for named in records {
        let mut row = vec![named.file.as_str()];
        row.extend(named.record.columns());
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[NamedRecord]) -> String {
    let mut output = String::new();

    for named in records {
        let record = &named.record;
        output.push_str(&format!("== {} ==\n", named.file));
        output.push_str(&format!("Company:    {}\n", record.company_name));
        output.push_str(&format!("E-Mail:     {}\n", record.email));
        output.push_str("Contact:\n");
        for line in record.contact_info.lines() {
            output.push_str(&format!("  {}\n", line));
        }
        output.push_str(&format!("Products:   {}\n", record.products));
        output.push_str(&format!("NACE Codes: {}\n", record.nace_codes));
        output.push_str(&format!("HS Codes:   {}\n", record.hs_codes));
        output.push('\n');
    }

    output
}

/// CSV of failed documents: file name and error message.
pub fn format_failures(failures: &[(String, String)]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["File", "Error"])?;
    for (file, error) in failures {
        wtr.write_record([file, error])?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<NamedRecord> {
        vec![NamedRecord {
            file: "acme.pdf".to_string(),
            record: OutputRecord {
                company_name: "Acme Group Inc.".to_string(),
                contact_info: "Tel: 1\nwww.acme.com".to_string(),
                email: "info@acme.com".to_string(),
                products: "PVC Resin, Calcium Chloride".to_string(),
                nace_codes: "20.16, 20.13".to_string(),
                hs_codes: "3904.10, 2827.20".to_string(),
            },
        }]
    }

    #[test]
    fn test_csv_quotes_multiline_cells() {
        let csv = format_records(&sample(), OutputFormat::Csv).unwrap();
        assert!(csv.starts_with("File,Company Name,Contact Info,E-Mail,Products,NACE Codes,HS Codes\n"));
        assert!(csv.contains("\"Tel: 1\nwww.acme.com\""));
        assert!(csv.contains("\"PVC Resin, Calcium Chloride\""));
    }

    #[test]
    fn test_json_flattens_record() {
        let json = format_records(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["file"], "acme.pdf");
        assert_eq!(value[0]["companyName"], "Acme Group Inc.");
        assert_eq!(value[0]["hsCodes"], "3904.10, 2827.20");
    }

    #[test]
    fn test_text_lists_contact_lines() {
        let text = format_records(&sample(), OutputFormat::Text).unwrap();
        assert!(text.contains("== acme.pdf =="));
        assert!(text.contains("  www.acme.com\n"));
    }

    #[test]
    fn test_failures_csv() {
        let csv = format_failures(&[("bad.pdf".to_string(), "PDF error: PDF has no pages".to_string())]).unwrap();
        assert_eq!(csv, "File,Error\nbad.pdf,PDF error: PDF has no pages\n");
    }
}
