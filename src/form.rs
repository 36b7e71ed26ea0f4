//! Form-state helpers: product option metadata, quantity and price text.

use crate::error::{ConfiguratorError, Result};
use crate::types::{PriceDisplay, Product, ProductOption};

/// `Ok(None)` for the empty placeholder option.
pub fn parse_product(option: &ProductOption) -> Result<Option<Product>> {
    let value = option.value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let id = leading_integer(value)
        .ok_or_else(|| ConfiguratorError::InvalidProduct(format!("option value {:?} is not an id", value)))?;

    let price = match option.price.as_deref().map(str::trim) {
        Some(raw) => raw.parse::<f64>().ok().filter(|p| p.is_finite()).unwrap_or_else(|| {
            log::warn!("product {} has unreadable price {:?}", id, raw);
            0.0
        }),
        None => 0.0,
    };

    let sizes = match option.sizes.as_deref().map(str::trim) {
        None | Some("") => Vec::new(),
        Some(raw) => serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|e| {
            log::warn!("product {} has unreadable sizes {:?}: {}", id, raw, e);
            Vec::new()
        }),
    };

    Ok(Some(Product {
        id,
        price,
        image_url: option.image.clone().unwrap_or_default(),
        sizes,
    }))
}

/// Leading integer of an input value; 1 when missing, unreadable or not positive.
pub fn parse_quantity(raw: &str) -> u32 {
    match leading_integer(raw) {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => 1,
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let n = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * n)
}

pub fn format_price(symbol: &str, amount: f64) -> String {
    format!("{}{:.2}", symbol, amount)
}

pub fn price_display(product: Option<&Product>, quantity: u32, symbol: &str) -> PriceDisplay {
    let unit = product.map(|p| p.price).unwrap_or(0.0);
    PriceDisplay {
        unit: format_price(symbol, unit),
        quantity,
        total: format_price(symbol, unit * quantity as f64),
    }
}

/// Which options stay visible for a `?category=` filter. Options without a
/// category, and the empty placeholder, are always kept; when nothing
/// matches, everything is kept.
pub fn category_visibility(options: &[ProductOption], category: &str) -> Vec<bool> {
    let wanted = category.trim();
    let matches = |o: &ProductOption| {
        o.category.as_deref().map_or(false, |c| c.eq_ignore_ascii_case(wanted))
    };
    if wanted.is_empty() || !options.iter().any(matches) {
        return vec![true; options.len()];
    }
    options
        .iter()
        .map(|o| o.value.is_empty() || o.category.is_none() || matches(o))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn option(value: &str, price: &str, sizes: &str) -> ProductOption {
        ProductOption {
            value: value.into(),
            price: Some(price.into()),
            image: Some("/static/img/tumbler.png".into()),
            sizes: Some(sizes.into()),
            category: None,
        }
    }

    #[test]
    fn parses_option_metadata() {
        let product = parse_product(&option("7", "24.99", r#"["20oz", "30oz", "40oz"]"#)).unwrap().unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.price, 24.99);
        assert_eq!(product.image_url, "/static/img/tumbler.png");
        assert_eq!(product.sizes, vec!["20oz", "30oz", "40oz"]);
    }

    #[test]
    fn empty_option_clears_selection() {
        assert_eq!(parse_product(&ProductOption::default()).unwrap(), None);
    }

    #[test]
    fn empty_size_list() {
        let product = parse_product(&option("2", "9.5", "[]")).unwrap().unwrap();
        assert!(product.sizes.is_empty());
        let product = parse_product(&ProductOption { sizes: None, ..option("2", "9.5", "") }).unwrap().unwrap();
        assert!(product.sizes.is_empty());
    }

    #[test]
    fn bad_metadata_degrades() {
        let product = parse_product(&option("4", "n/a", "not json")).unwrap().unwrap();
        assert_eq!(product.price, 0.0);
        assert!(product.sizes.is_empty());
        assert!(parse_product(&option("mug", "1", "[]")).is_err());
    }

    #[test]
    fn quantity_parsing() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(" 12 "), 12);
        assert_eq!(parse_quantity("2.7"), 2);
        assert_eq!(parse_quantity("4 mugs"), 4);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity("-5"), 1);
        assert_eq!(parse_quantity("abc"), 1);
        assert_eq!(parse_quantity(""), 1);
    }

    #[test]
    fn price_for_three_at_twelve_fifty() {
        let product = parse_product(&option("1", "12.50", "[]")).unwrap().unwrap();
        let display = price_display(Some(&product), parse_quantity("3"), "$");
        assert_eq!(display, PriceDisplay { unit: "$12.50".into(), quantity: 3, total: "$37.50".into() });
    }

    #[test]
    fn unreadable_quantity_charges_one_unit() {
        let product = parse_product(&option("1", "12.50", "[]")).unwrap().unwrap();
        for raw in ["0", "abc"] {
            let display = price_display(Some(&product), parse_quantity(raw), "$");
            assert_eq!(display.quantity, 1);
            assert_eq!(display.total, display.unit);
        }
    }

    #[test]
    fn no_product_prices_at_zero() {
        let display = price_display(None, 5, "$");
        assert_eq!(display.unit, "$0.00");
        assert_eq!(display.total, "$0.00");
    }

    #[test]
    fn category_filter() {
        let mut opts = vec![
            ProductOption::default(),
            ProductOption { value: "1".into(), category: Some("mug".into()), ..Default::default() },
            ProductOption { value: "2".into(), category: Some("glass".into()), ..Default::default() },
            ProductOption { value: "3".into(), category: None, ..Default::default() },
        ];
        assert_eq!(category_visibility(&opts, "mug"), vec![true, true, false, true]);
        assert_eq!(category_visibility(&opts, "keychain"), vec![true; 4]);
        opts.truncate(1);
        assert_eq!(category_visibility(&opts, "mug"), vec![true]);
    }
}
