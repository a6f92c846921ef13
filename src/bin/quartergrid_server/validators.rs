use super::*;

pub(super) fn valid_color_hex(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

pub(super) fn validate_sheet_date(s: &str) -> anyhow::Result<()> {
    quartergrid::model::parse_sheet_date(s)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_shapes() {
        assert!(valid_color_hex("#fff"));
        assert!(valid_color_hex("#FF0000"));
        assert!(valid_color_hex("#a1b2c3"));
        assert!(!valid_color_hex("fff"));
        assert!(!valid_color_hex("#ff"));
        assert!(!valid_color_hex("#ff000"));
        assert!(!valid_color_hex("#gggggg"));
        assert!(!valid_color_hex(""));
    }

    #[test]
    fn sheet_dates() {
        assert!(validate_sheet_date("2013-02-05").is_ok());
        assert!(validate_sheet_date("2013-13-05").is_err());
        assert!(validate_sheet_date("today").is_err());
    }
}
