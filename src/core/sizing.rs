//! Size Classifier & Sorter.
//!
//! Internally coded barcodes look like `CFRST<n>`. The number encodes the
//! packaging size through a small rule table; a couple of reserved codes sit
//! outside the ranges and map straight to a size. Everything that does not
//! match a rule has no size. Classification is total: malformed barcodes
//! never error.

use crate::domain::model::{CatalogRecord, SizeLabel};

pub const BARCODE_PREFIX: &str = "CFRST";

/// Water bottle, 500ml.
pub const WATER_500ML_BARCODE: &str = "CFRST92";
/// Water bottle, 1 litre.
pub const WATER_1_LITRE_BARCODE: &str = "CFRST91";
pub const TENDER_COCONUT_90ML_CODE: i64 = 90;
pub const TENDER_COCONUT_50ML_CODE: i64 = 93;

/// Products known to come without a liquid size. Purely informational.
const NO_SIZE_MARKERS: [(&str, &str); 4] = [
    ("canesicle", "canesicles have no standard liquid size"),
    ("blast", "blast products have no standard liquid size"),
    ("barfi", "non-liquid product"),
    ("packaging", "non-liquid product"),
];

const UNSIZED_PRIORITY: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeSuffix {
    Parsed(i64),
    Unparseable,
}

#[derive(Debug, Clone, Copy)]
enum SizeRule {
    SuffixRange { low: i64, high: i64, size: SizeLabel },
    Barcode { code: &'static str, size: SizeLabel },
    Suffix { code: i64, size: SizeLabel },
}

impl SizeRule {
    fn matches(&self, barcode: &str, suffix: i64) -> Option<SizeLabel> {
        match *self {
            SizeRule::SuffixRange { low, high, size } => {
                (low..=high).contains(&suffix).then_some(size)
            }
            SizeRule::Barcode { code, size } => (barcode == code).then_some(size),
            SizeRule::Suffix { code, size } => (suffix == code).then_some(size),
        }
    }
}

/// Evaluated top to bottom, first match wins.
const SIZE_RULES: [SizeRule; 6] = [
    SizeRule::SuffixRange {
        low: 1,
        high: 27,
        size: SizeLabel::Ml240,
    },
    SizeRule::SuffixRange {
        low: 28,
        high: 55,
        size: SizeLabel::Ml500,
    },
    SizeRule::Barcode {
        code: WATER_500ML_BARCODE,
        size: SizeLabel::Ml500,
    },
    SizeRule::Barcode {
        code: WATER_1_LITRE_BARCODE,
        size: SizeLabel::Litre1,
    },
    SizeRule::Suffix {
        code: TENDER_COCONUT_90ML_CODE,
        size: SizeLabel::Ml90,
    },
    SizeRule::Suffix {
        code: TENDER_COCONUT_50ML_CODE,
        size: SizeLabel::Ml50,
    },
];

/// Splits off the numeric part of an internal barcode.
///
/// Returns `None` when the barcode is not internally coded at all.
pub fn parse_barcode_suffix(barcode: &str) -> Option<BarcodeSuffix> {
    let suffix = barcode.strip_prefix(BARCODE_PREFIX)?;
    Some(match suffix.trim().parse::<i64>() {
        Ok(number) => BarcodeSuffix::Parsed(number),
        Err(_) => BarcodeSuffix::Unparseable,
    })
}

pub fn classify_barcode(barcode: &str) -> Option<SizeLabel> {
    match parse_barcode_suffix(barcode)? {
        BarcodeSuffix::Parsed(suffix) => SIZE_RULES
            .iter()
            .find_map(|rule| rule.matches(barcode, suffix)),
        BarcodeSuffix::Unparseable => {
            tracing::debug!("Barcode '{}' has a non-numeric suffix", barcode);
            None
        }
    }
}

/// Explains why a product name is expected to carry no size, if it is a known case.
pub fn no_size_marker(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    NO_SIZE_MARKERS
        .iter()
        .find(|(marker, _)| name.contains(marker))
        .map(|(_, reason)| *reason)
}

pub fn classify_record(record: &CatalogRecord) -> Option<SizeLabel> {
    let size = classify_barcode(&record.barcode);
    if size.is_none() {
        match no_size_marker(&record.name) {
            Some(reason) => tracing::debug!("'{}' has no size: {}", record.name, reason),
            None => tracing::debug!(
                "'{}' has no size mapping for barcode '{}'",
                record.name,
                record.barcode
            ),
        }
    }
    size
}

pub fn size_priority(size: Option<SizeLabel>) -> u8 {
    match size {
        Some(SizeLabel::Ml240) => 1,
        Some(SizeLabel::Ml500) => 2,
        Some(SizeLabel::Ml50) => 3,
        Some(SizeLabel::Ml90) => 4,
        Some(SizeLabel::Litre1) => 5,
        None => UNSIZED_PRIORITY,
    }
}

/// Stable sort by size priority, then case-insensitive name.
pub fn sort_catalog(records: &mut [CatalogRecord]) {
    records.sort_by_cached_key(|record| (size_priority(record.size), record.name.to_lowercase()));
}

/// Assigns every record its size and returns the catalog in display order.
pub fn classify_and_sort(mut records: Vec<CatalogRecord>) -> Vec<CatalogRecord> {
    for record in &mut records {
        record.size = classify_record(record);
    }
    sort_catalog(&mut records);

    let sized = records.iter().filter(|r| r.size.is_some()).count();
    tracing::debug!(
        "Classified {} records: {} sized, {} without size",
        records.len(),
        sized,
        records.len() - sized
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sized(name: &str, size: Option<SizeLabel>) -> CatalogRecord {
        CatalogRecord {
            size,
            ..CatalogRecord::new(name, "")
        }
    }

    fn names(records: &[CatalogRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_reserved_and_out_of_range_barcodes() {
        assert_eq!(classify_barcode("CFRST91"), Some(SizeLabel::Litre1));
        assert_eq!(classify_barcode("CFRST92"), Some(SizeLabel::Ml500));
        assert_eq!(classify_barcode("CFRST60"), None);
    }

    #[test]
    fn test_range_boundaries() {
        assert_eq!(classify_barcode("CFRST0"), None);
        assert_eq!(classify_barcode("CFRST01"), Some(SizeLabel::Ml240));
        assert_eq!(classify_barcode("CFRST27"), Some(SizeLabel::Ml240));
        assert_eq!(classify_barcode("CFRST28"), Some(SizeLabel::Ml500));
        assert_eq!(classify_barcode("CFRST55"), Some(SizeLabel::Ml500));
        assert_eq!(classify_barcode("CFRST56"), None);
    }

    #[test]
    fn test_tender_coconut_codes() {
        assert_eq!(classify_barcode("CFRST90"), Some(SizeLabel::Ml90));
        assert_eq!(classify_barcode("CFRST93"), Some(SizeLabel::Ml50));
        assert_eq!(classify_barcode("CFRST090"), Some(SizeLabel::Ml90));
    }

    #[test]
    fn test_reserved_water_codes_match_exact_barcode_only() {
        assert_eq!(classify_barcode("CFRST091"), None);
        assert_eq!(classify_barcode("CFRST092"), None);
    }

    #[test]
    fn test_malformed_barcodes_have_no_size() {
        assert_eq!(classify_barcode(""), None);
        assert_eq!(classify_barcode("CFRST"), None);
        assert_eq!(classify_barcode("CFRSTXL"), None);
        assert_eq!(classify_barcode("cfrst05"), None);
        assert_eq!(classify_barcode("8901234567890"), None);
        assert_eq!(classify_barcode("CFRST99999999999999999999"), None);
    }

    #[test]
    fn test_parse_barcode_suffix() {
        assert_eq!(parse_barcode_suffix("CFRST07"), Some(BarcodeSuffix::Parsed(7)));
        assert_eq!(
            parse_barcode_suffix("CFRST7A"),
            Some(BarcodeSuffix::Unparseable)
        );
        assert_eq!(parse_barcode_suffix("ABC07"), None);
    }

    #[test]
    fn test_no_size_marker_is_case_insensitive() {
        assert!(no_size_marker("Mango CANESICLE").is_some());
        assert!(no_size_marker("Kesar Barfi").is_some());
        assert!(no_size_marker("Watermelon").is_none());
    }

    #[test]
    fn test_name_marker_never_assigns_size() {
        let record = CatalogRecord::new("Berry Blast", "CFRST05");
        assert_eq!(classify_record(&record), Some(SizeLabel::Ml240));

        let record = CatalogRecord::new("Berry Blast", "CFRST70");
        assert_eq!(classify_record(&record), None);
    }

    #[test]
    fn test_same_size_sorted_by_name_case_insensitively() {
        let mut records = vec![
            sized("Mango Fizz", Some(SizeLabel::Ml240)),
            sized("apple Fizz", Some(SizeLabel::Ml240)),
            sized("Apple Fizz", Some(SizeLabel::Ml240)),
        ];
        sort_catalog(&mut records);
        assert_eq!(names(&records), vec!["apple Fizz", "Apple Fizz", "Mango Fizz"]);
    }

    #[test]
    fn test_unsized_records_sort_last() {
        let mut records = vec![
            sized("Aam Panna", None),
            sized("Zesty Lime", Some(SizeLabel::Litre1)),
            sized("Orange", Some(SizeLabel::Ml90)),
            sized("Coconut", Some(SizeLabel::Ml50)),
            sized("Kiwi", Some(SizeLabel::Ml500)),
            sized("Lychee", Some(SizeLabel::Ml240)),
        ];
        sort_catalog(&mut records);
        assert_eq!(
            names(&records),
            vec!["Lychee", "Kiwi", "Coconut", "Orange", "Zesty Lime", "Aam Panna"]
        );
    }

    #[test]
    fn test_classify_and_sort_assigns_sizes() {
        let records = vec![
            CatalogRecord::new("Water 1L", "CFRST91"),
            CatalogRecord::new("Canesicle", ""),
            CatalogRecord::new("Mango Fizz", "CFRST30"),
            CatalogRecord::new("Apple Fizz", "CFRST02"),
        ];

        let sorted = classify_and_sort(records);

        assert_eq!(
            names(&sorted),
            vec!["Apple Fizz", "Mango Fizz", "Water 1L", "Canesicle"]
        );
        assert_eq!(sorted[0].size, Some(SizeLabel::Ml240));
        assert_eq!(sorted[1].size, Some(SizeLabel::Ml500));
        assert_eq!(sorted[2].size, Some(SizeLabel::Litre1));
        assert_eq!(sorted[3].size, None);
    }

    proptest! {
        #[test]
        fn low_range_is_240ml(n in 1i64..=27) {
            prop_assert_eq!(classify_barcode(&format!("CFRST{:02}", n)), Some(SizeLabel::Ml240));
        }

        #[test]
        fn high_range_is_500ml(n in 28i64..=55) {
            prop_assert_eq!(classify_barcode(&format!("CFRST{}", n)), Some(SizeLabel::Ml500));
        }

        #[test]
        fn foreign_prefixes_have_no_size(code in "[A-Z]{0,4}[0-9]{0,4}") {
            prop_assume!(!code.starts_with(BARCODE_PREFIX));
            prop_assert_eq!(classify_barcode(&code), None);
        }

        #[test]
        fn non_numeric_suffixes_have_no_size(suffix in "[A-Za-z][A-Za-z0-9]{0,6}") {
            prop_assert_eq!(classify_barcode(&format!("CFRST{}", suffix)), None);
        }

        #[test]
        fn sorting_is_idempotent_and_stable(
            rows in prop::collection::vec((0usize..6, prop::sample::select(vec!["kiwi", "Kiwi", "apple", "Mango"])), 0..20)
        ) {
            let sizes = [None, Some(SizeLabel::Ml240), Some(SizeLabel::Ml500), Some(SizeLabel::Ml50), Some(SizeLabel::Ml90), Some(SizeLabel::Litre1)];
            let records: Vec<CatalogRecord> = rows
                .iter()
                .enumerate()
                .map(|(i, (size, name))| CatalogRecord {
                    stock: i as i64,
                    ..sized(name, sizes[*size])
                })
                .collect();

            let mut once = records.clone();
            sort_catalog(&mut once);
            let mut twice = once.clone();
            sort_catalog(&mut twice);
            prop_assert_eq!(&once, &twice);

            // Equal keys keep their input order; `stock` carries the input index.
            for pair in once.windows(2) {
                let a = (size_priority(pair[0].size), pair[0].name.to_lowercase());
                let b = (size_priority(pair[1].size), pair[1].name.to_lowercase());
                prop_assert!(a <= b);
                if a == b {
                    prop_assert!(pair[0].stock < pair[1].stock);
                }
            }
        }
    }
}
