use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const ITEM_NAME: &str = "Item Name";
pub const CATEGORY: &str = "Category";
pub const MRP: &str = "MRP";
pub const BARCODE: &str = "Barcode";
pub const TAX_TYPE: &str = "Tax type";
pub const TAX_PERCENTAGE: &str = "Tax percentage";

/// The only POS export columns that survive cleaning, in output order.
pub const ALLOWED_FIELDS: [&str; 6] = [ITEM_NAME, CATEGORY, MRP, BARCODE, TAX_TYPE, TAX_PERCENTAGE];

pub const DEFAULT_PRICE: u64 = 0;
pub const DEFAULT_TAX_PERCENTAGE: u64 = 12;
pub const DEFAULT_STOCK: i64 = 50;

/// One object of the POS export, untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    pub data: Map<String, Value>,
}

impl RawRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// A POS record restricted to [`ALLOWED_FIELDS`]. Absent fields are skipped on output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    #[serde(rename = "Item Name", default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<Value>,
    #[serde(rename = "Category", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(rename = "MRP", default, skip_serializing_if = "Option::is_none")]
    pub mrp: Option<Value>,
    #[serde(rename = "Barcode", default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<Value>,
    #[serde(rename = "Tax type", default, skip_serializing_if = "Option::is_none")]
    pub tax_type: Option<Value>,
    #[serde(rename = "Tax percentage", default, skip_serializing_if = "Option::is_none")]
    pub tax_percentage: Option<Value>,
}

impl CleanedRecord {
    /// Builds a record by asking `lookup` for each allowed field.
    pub fn from_lookup(mut lookup: impl FnMut(&'static str) -> Option<Value>) -> Self {
        Self {
            item_name: lookup(ITEM_NAME),
            category: lookup(CATEGORY),
            mrp: lookup(MRP),
            barcode: lookup(BARCODE),
            tax_type: lookup(TAX_TYPE),
            tax_percentage: lookup(TAX_PERCENTAGE),
        }
    }

    /// Projects a raw record onto the allowed fields without judging the values.
    pub fn project(raw: &RawRecord) -> Self {
        Self::from_lookup(|key| raw.get(key).filter(|v| !v.is_null()).cloned())
    }

    pub fn fields(&self) -> [(&'static str, Option<&Value>); 6] {
        [
            (ITEM_NAME, self.item_name.as_ref()),
            (CATEGORY, self.category.as_ref()),
            (MRP, self.mrp.as_ref()),
            (BARCODE, self.barcode.as_ref()),
            (TAX_TYPE, self.tax_type.as_ref()),
            (TAX_PERCENTAGE, self.tax_percentage.as_ref()),
        ]
    }

    pub fn field_count(&self) -> usize {
        self.fields().iter().filter(|(_, v)| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    pub fn into_raw(self) -> RawRecord {
        let mut data = Map::new();
        for (key, value) in [
            (ITEM_NAME, self.item_name),
            (CATEGORY, self.category),
            (MRP, self.mrp),
            (BARCODE, self.barcode),
            (TAX_TYPE, self.tax_type),
            (TAX_PERCENTAGE, self.tax_percentage),
        ] {
            if let Some(value) = value {
                data.insert(key.to_string(), value);
            }
        }
        RawRecord { data }
    }
}

/// Packaging volume of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeLabel {
    #[serde(rename = "240ml")]
    Ml240,
    #[serde(rename = "500ml")]
    Ml500,
    #[serde(rename = "50ml")]
    Ml50,
    #[serde(rename = "90ml")]
    Ml90,
    #[serde(rename = "1 Litre")]
    Litre1,
}

impl SizeLabel {
    /// All labels in catalog order.
    pub const ALL: [SizeLabel; 5] = [
        SizeLabel::Ml240,
        SizeLabel::Ml500,
        SizeLabel::Ml50,
        SizeLabel::Ml90,
        SizeLabel::Litre1,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SizeLabel::Ml240 => "240ml",
            SizeLabel::Ml500 => "500ml",
            SizeLabel::Ml50 => "50ml",
            SizeLabel::Ml90 => "90ml",
            SizeLabel::Litre1 => "1 Litre",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.as_str() == label)
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads `size` leniently: `null`, `""`, `"null"` and unknown labels all mean no size.
fn deserialize_size<'de, D>(deserializer: D) -> std::result::Result<Option<SizeLabel>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(label)) => {
            let size = SizeLabel::from_label(&label);
            if size.is_none() && !label.is_empty() && label != "null" {
                tracing::warn!("Ignoring unknown size label '{}'", label);
            }
            size
        }
        _ => None,
    })
}

fn default_price() -> Value {
    Value::from(DEFAULT_PRICE)
}

fn default_tax_percentage() -> Value {
    Value::from(DEFAULT_TAX_PERCENTAGE)
}

fn default_stock() -> i64 {
    DEFAULT_STOCK
}

/// Internal catalog schema, as stored in the formatted inventory file.
///
/// `price` and `tax_percentage` carry the POS value as exported, whatever
/// its JSON type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_price")]
    pub price: Value,
    #[serde(default)]
    pub barcode: String,
    #[serde(default = "default_tax_percentage")]
    pub tax_percentage: Value,
    #[serde(default = "default_stock")]
    pub stock: i64,
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: Option<SizeLabel>,
}

impl CatalogRecord {
    pub fn new(name: impl Into<String>, barcode: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            barcode: barcode.into(),
            ..Self::default()
        }
    }
}

impl Default for CatalogRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            price: default_price(),
            barcode: String::new(),
            tax_percentage: default_tax_percentage(),
            stock: DEFAULT_STOCK,
            size: None,
        }
    }
}

/// Storefront-facing record. `size` is left out entirely when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicRecord {
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "MRP")]
    pub mrp: Value,
    #[serde(rename = "Barcode")]
    pub barcode: String,
    #[serde(rename = "Tax percentage")]
    pub tax_percentage: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeLabel>,
}

/// Locations of the record store documents for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelinePaths {
    pub input_path: String,
    /// Where the `clean` stage writes; `None` rewrites the input in place.
    pub cleaned_path: Option<String>,
    pub intermediate_path: String,
    pub output_path: String,
}

impl PipelinePaths {
    pub fn cleaned_target(&self) -> &str {
        self.cleaned_path.as_deref().unwrap_or(&self.input_path)
    }
}

impl Default for PipelinePaths {
    fn default() -> Self {
        Self {
            input_path: "Canefrost_Inventory_Upload.json".to_string(),
            cleaned_path: None,
            intermediate_path: "formatted_inventory.json".to_string(),
            output_path: "public/Canefrost_Inventory_Upload.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub input: usize,
    pub kept: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub total: usize,
    pub with_size: usize,
    pub without_size: usize,
}

/// Everything the transform step produces, held in memory until the load step.
#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub cleaned: Vec<CleanedRecord>,
    pub catalog: Vec<CatalogRecord>,
    pub public: Vec<PublicRecord>,
    pub clean_summary: CleanSummary,
    pub publish_summary: PublishSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub backend: String,
    /// True when the no-op backend was active and nothing left the machine.
    pub skipped: bool,
    pub uploaded: usize,
    pub batches_committed: usize,
    pub batches_failed: usize,
    pub failures: Vec<String>,
    pub note: Option<String>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.batches_failed == 0
    }
}

/// What a full run left behind.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub written: Vec<String>,
    pub clean_summary: CleanSummary,
    pub publish_summary: PublishSummary,
    pub sync: Option<SyncReport>,
}
