//! Display formatting shared by the templates.

const MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Format a `YYYY-MM` date as a readable month + year ("2022-03" -> "Marzo
/// 2022"). Anything that does not match the expected shape passes through
/// unchanged.
pub fn format_date(date: &str) -> String {
    let Some((year, month)) = date.split_once('-') else {
        return date.to_string();
    };
    let Ok(month_num) = month.parse::<usize>() else {
        return date.to_string();
    };
    if year.len() != 4 || !(1..=12).contains(&month_num) {
        return date.to_string();
    }
    format!("{} {}", MONTHS[month_num - 1], year)
}

/// Format a date range, substituting the template's "current" label for an
/// open end date.
pub fn format_date_range(
    start: &str,
    end: Option<&str>,
    current: bool,
    current_label: &str,
    dash: &str,
) -> String {
    let start = format_date(start);
    let end = if current {
        current_label.to_string()
    } else {
        end.map(format_date).unwrap_or_default()
    };
    format!("{} {} {}", start, dash, end)
}

/// Group a Spanish phone number for display; anything unrecognized passes
/// through unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.starts_with("34") && digits.len() == 11 {
        return format!("+34 {} {} {}", &digits[2..5], &digits[5..8], &digits[8..]);
    }
    if digits.len() == 9 {
        return format!("{} {} {}", &digits[0..3], &digits[3..6], &digits[6..]);
    }
    phone.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_month_and_year() {
        assert_eq!(format_date("2022-03"), "Marzo 2022");
        assert_eq!(format_date("2019-06"), "Junio 2019");
    }

    #[test]
    fn passes_through_unexpected_shapes() {
        assert_eq!(format_date("Junio 2019"), "Junio 2019");
        assert_eq!(format_date("2022"), "2022");
        assert_eq!(format_date("2022-13"), "2022-13");
    }

    #[test]
    fn range_honors_the_current_label() {
        assert_eq!(
            format_date_range("2022-01", None, true, "Actual", "-"),
            "Enero 2022 - Actual"
        );
        assert_eq!(
            format_date_range("2020-03", Some("2021-12"), false, "Presente", "–"),
            "Marzo 2020 – Diciembre 2021"
        );
    }

    #[test]
    fn groups_spanish_phone_numbers() {
        assert_eq!(format_phone("+34612345678"), "+34 612 345 678");
        assert_eq!(format_phone("612345678"), "612 345 678");
        assert_eq!(format_phone("+1 555 0100"), "+1 555 0100");
    }
}
