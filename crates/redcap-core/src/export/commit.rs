//! Default commit messages for exports

/// Column at which commit message bodies are wrapped
pub const BODY_WIDTH: usize = 70;

/// Message for a forms export, listing the forms in a wrapped body
pub fn forms_message(forms: &[String]) -> String {
    let sentence = format!("Contains the following forms: {}.", forms.join(", "));
    let body = textwrap::wrap(&sentence, BODY_WIDTH).join("\n");
    format!("Export REDCap forms\n\n{}", body)
}

pub fn report_message() -> String {
    "Export REDCap report".to_string()
}

/// Message with a header and an option list; the list is omitted when empty
pub fn options_message(header: &str, options: &[(&str, bool)]) -> String {
    if options.is_empty() {
        return header.to_string();
    }
    let list: Vec<String> = options
        .iter()
        .map(|(name, value)| format!("- {}: {}", name, py_bool(*value)))
        .collect();
    format!("{}\n\nExport options:\n{}", header, list.join("\n"))
}

pub fn project_xml_message(metadata_only: bool, survey_fields: bool) -> String {
    options_message(
        "Export REDCap Project XML",
        &[
            ("metadata_only", metadata_only),
            ("survey_fields", survey_fields),
        ],
    )
}

// Options are listed as True / False
fn py_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forms_message() {
        let forms = vec!["demographics".to_string(), "baseline".to_string()];
        assert_eq!(
            forms_message(&forms),
            "Export REDCap forms\n\nContains the following forms: demographics, baseline."
        );
    }

    #[test]
    fn test_forms_message_wraps_body() {
        let forms: Vec<String> = (1..=12).map(|i| format!("instrument_{}", i)).collect();
        let message = forms_message(&forms);
        let mut lines = message.lines();
        assert_eq!(lines.next(), Some("Export REDCap forms"));
        assert_eq!(lines.next(), Some(""));
        let body: Vec<&str> = lines.collect();
        assert!(body.len() > 1);
        assert!(body.iter().all(|line| line.len() <= BODY_WIDTH));
        assert!(body.last().unwrap().ends_with("instrument_12."));
    }

    #[test]
    fn test_project_xml_message() {
        assert_eq!(
            project_xml_message(false, true),
            "Export REDCap Project XML\n\nExport options:\n- metadata_only: False\n- survey_fields: True"
        );
    }

    #[test]
    fn test_options_message_without_options() {
        assert_eq!(options_message("Header", &[]), "Header");
        assert_eq!(report_message(), "Export REDCap report");
    }
}
