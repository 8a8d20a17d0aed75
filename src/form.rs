use anyhow::{Result, anyhow};

/// The named reimbursement form fields, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReimbursementForm {
    pub name: String,
    pub id_number: String,
    pub position: String,
    pub division: String,
    pub team_head: String,
    pub month: String,
    pub pid: String,
}

impl ReimbursementForm {
    /// Wire name and value for every field, in the order they are posted.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("name", self.name.as_str()),
            ("idNumber", self.id_number.as_str()),
            ("position", self.position.as_str()),
            ("division", self.division.as_str()),
            ("teamHead", self.team_head.as_str()),
            ("month", self.month.as_str()),
            ("pid", self.pid.as_str()),
        ]
    }

    pub fn ensure_complete(&self) -> Result<()> {
        let missing = self
            .fields()
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(key, _)| *key)
            .collect::<Vec<_>>();
        if missing.is_empty() {
            return Ok(());
        }
        Err(anyhow!(
            "form is incomplete (missing: {})",
            missing.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::ReimbursementForm;

    fn filled_form() -> ReimbursementForm {
        ReimbursementForm {
            name: "Jane Doe".to_string(),
            id_number: "11542".to_string(),
            position: "Engineer".to_string(),
            division: "Platform".to_string(),
            team_head: "A. Reyes".to_string(),
            month: "January".to_string(),
            pid: "P-0042".to_string(),
        }
    }

    #[test]
    fn complete_form_passes() {
        assert!(filled_form().ensure_complete().is_ok());
    }

    #[test]
    fn incomplete_form_names_the_missing_fields() {
        let mut form = filled_form();
        form.id_number = String::new();
        form.month = "  ".to_string();
        let err = form.ensure_complete().unwrap_err();
        assert!(err.to_string().contains("idNumber, month"));
    }

    #[test]
    fn fields_keep_submission_order() {
        let form = filled_form();
        let keys = form.fields().map(|(key, _)| key);
        assert_eq!(
            keys,
            [
                "name", "idNumber", "position", "division", "teamHead", "month", "pid"
            ]
        );
    }
}
