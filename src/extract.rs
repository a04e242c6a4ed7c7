use std::str::FromStr;

use crate::{
    error::Error,
    page::{Locator, Page},
    prelude::*,
    quantity::{KilowattHours, Won},
};

/// Locale decoration wrapped around a displayed number.
#[derive(Copy, Clone, Debug)]
pub struct Decoration {
    pub unit: &'static str,
    pub thousands_separator: char,
}

/// Extracted numbers carry their own decoration.
pub trait Decorated: FromStr {
    const DECORATION: Decoration;

    fn is_number(&self) -> bool {
        true
    }
}

impl Decorated for KilowattHours {
    const DECORATION: Decoration = Decoration { unit: Self::UNIT, thousands_separator: ',' };

    /// `NaN` and `inf` parse as floats but are never shown by the portal.
    fn is_number(&self) -> bool {
        self.0.is_finite()
    }
}

impl Decorated for Won {
    const DECORATION: Decoration = Decoration { unit: Self::UNIT, thousands_separator: ',' };
}

/// Strip the decoration and parse the remaining number.
pub fn parse<T: Decorated>(field: &str, text: &str) -> Result<T, Error> {
    let Decoration { unit, thousands_separator } = T::DECORATION;
    let bare: String = text.replace(unit, "").chars().filter(|c| *c != thousands_separator).collect();
    bare.trim().parse::<T>().ok().filter(T::is_number).ok_or_else(|| Error::FieldUnparseable {
        field: field.to_owned(),
        text: text.trim().to_owned(),
    })
}

/// Read and parse the element's text.
///
/// An absent element is [`Error::FieldMissing`], while unparseable text is [`Error::FieldUnparseable`].
#[instrument(skip_all, level = Level::DEBUG, fields(locator = %locator))]
pub fn extract<T: Decorated>(page: &mut impl Page, locator: &Locator) -> Result<T> {
    let text = page
        .find_text(locator)?
        .ok_or_else(|| Error::FieldMissing { field: locator.to_string() })?;
    trace!(%text, "extracted");
    Ok(parse(&locator.to_string(), &text)?)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::page::fake::FakePage;

    #[test]
    fn test_parse_kilowatt_hours_ok() -> Result {
        assert_abs_diff_eq!(parse::<KilowattHours>("usage", "12,345 kWh")?.0, 12345.0);
        assert_abs_diff_eq!(parse::<KilowattHours>("usage", " 0.532kWh\n")?.0, 0.532);
        Ok(())
    }

    #[test]
    fn test_parse_won_ok() -> Result {
        assert_eq!(parse::<Won>("charge", "1,234,567원")?, Won(1_234_567));
        assert_eq!(parse::<Won>("charge", "  980 원 ")?, Won(980));
        Ok(())
    }

    #[test]
    fn test_parse_is_idempotent() -> Result {
        let first = parse::<Won>("charge", "1,234,567원")?;
        let second = parse::<Won>("charge", &first.0.to_string())?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_parse_unparseable() {
        let error = parse::<KilowattHours>("usage", "-").unwrap_err();
        assert!(matches!(error, Error::FieldUnparseable { text, .. } if text == "-"));
    }

    #[test]
    fn test_parse_non_finite_is_unparseable() {
        for text in ["NaN kWh", "inf kWh", "-infinity kWh"] {
            let error = parse::<KilowattHours>("usage", text).unwrap_err();
            assert!(matches!(error, Error::FieldUnparseable { .. }), "{text}");
        }
    }

    #[test]
    fn test_parse_empty_is_unparseable() {
        assert!(parse::<Won>("charge", " ").unwrap_err().is_field_error());
    }

    #[test]
    fn test_extract_ok() -> Result {
        let mut page = FakePage::default();
        page.dom.set_text(&Locator::id("TOTAL_CHARGE"), "12,340원");
        assert_eq!(extract::<Won>(&mut page, &Locator::id("TOTAL_CHARGE"))?, Won(12_340));
        Ok(())
    }

    #[test]
    fn test_extract_missing() {
        let mut page = FakePage::default();
        let error = extract::<Won>(&mut page, &Locator::id("TOTAL_CHARGE")).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::FieldMissing { field }) if field == "#TOTAL_CHARGE",
        ));
    }

    #[test]
    fn test_extract_unparseable() {
        let mut page = FakePage::default();
        page.dom.set_text(&Locator::id("F_AP_QT"), "n/a kWh");
        let error = extract::<KilowattHours>(&mut page, &Locator::id("F_AP_QT")).unwrap_err();
        assert!(matches!(error.downcast_ref::<Error>(), Some(Error::FieldUnparseable { .. })));
    }
}
